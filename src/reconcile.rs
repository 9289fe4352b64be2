use crate::names::{closest_match, Domain};
use crate::types::LabelTable;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    /// Position of the originating row in the left table.
    pub row: usize,
    pub object: String,
    pub map_value: f64,
    pub data_value: f64,
}

fn canonicalize(table: &LabelTable, domain: Domain) -> LabelTable {
    let mut out = table.clone();
    for row in &mut out.rows {
        row.object = closest_match(&row.object, domain).to_string();
    }
    out
}

/// Rewrites the `Object` column of both tables to canonical names.
///
/// Inputs are left untouched. Distinct labels may collapse onto the same
/// canonical name; that is reported but not rejected.
pub fn match_names(
    map_table: &LabelTable,
    data_table: &LabelTable,
    domain: Domain,
) -> (LabelTable, LabelTable) {
    let map_out = canonicalize(map_table, domain);
    let data_out = canonicalize(data_table, domain);

    warn_collisions("map", &map_out);
    warn_collisions("data", &data_out);

    (map_out, data_out)
}

fn warn_collisions(side: &str, table: &LabelTable) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for object in table.objects() {
        *counts.entry(object).or_default() += 1;
    }
    let mut repeated: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    repeated.sort();
    for (object, n) in repeated {
        warn!(side, object, count = n, "several labels resolved to the same name");
    }
}

/// Inner join on `Object`, keeping the left table's row order.
pub fn join_tables(map_table: &LabelTable, data_table: &LabelTable) -> Vec<JoinedRow> {
    let mut by_object: HashMap<&str, Vec<f64>> = HashMap::new();
    for row in &data_table.rows {
        by_object.entry(row.object.as_str()).or_default().push(row.value);
    }

    let mut joined = Vec::new();
    for (i, row) in map_table.rows.iter().enumerate() {
        if let Some(values) = by_object.get(row.object.as_str()) {
            for &value in values {
                joined.push(JoinedRow {
                    row: i,
                    object: row.object.clone(),
                    map_value: row.value,
                    data_value: value,
                });
            }
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::{DISTRICTS, STATES};
    use crate::types::LabelRecord;

    fn table(labels: &[&str]) -> LabelTable {
        LabelTable::new(
            "Value",
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| LabelRecord::new(*l, i as f64))
                .collect(),
        )
    }

    #[test]
    fn outputs_only_canonical_names() {
        let map = table(&["Mhrashtr", "orissa", "", "???", "Tamilnadu", "Telangana"]);
        let data = table(&["zzzz", "Bengal", "1234", "Delhi NCR"]);
        let (m, d) = match_names(&map, &data, Domain::Country);
        assert!(m.objects().all(|o| STATES.contains(&o)));
        assert!(d.objects().all(|o| STATES.contains(&o)));
        assert_eq!(m.rows.len(), map.rows.len());
        assert_eq!(d.rows.len(), data.rows.len());

        let (m, _) = match_names(&map, &data, Domain::Region);
        assert!(m.objects().all(|o| DISTRICTS.contains(&o)));
    }

    #[test]
    fn inputs_are_not_mutated() {
        let map = table(&["Mhrashtr"]);
        let data = table(&["Pondicherry"]);
        let before = (map.clone(), data.clone());
        let _ = match_names(&map, &data, Domain::Country);
        assert_eq!((map, data), before);
    }

    #[test]
    fn values_travel_with_their_rows() {
        let data = table(&["Pune", "Nasik"]);
        let (_, d) = match_names(&table(&[]), &data, Domain::Region);
        assert_eq!(d.rows[1], LabelRecord::new("Nashik", 1.0));
        assert_eq!(d.value_column, "Value");
    }

    #[test]
    fn idempotent_on_canonical_tables() {
        let map = table(&["Mhrashtr", "Orissa", "Goa"]);
        let data = table(&["Jammu & Kashmir", "Uttaranchal"]);
        let (m1, d1) = match_names(&map, &data, Domain::Country);
        let (m2, d2) = match_names(&m1, &d1, Domain::Country);
        assert_eq!(m1, m2);
        assert_eq!(d1, d2);
    }

    #[test]
    fn join_keeps_left_order_and_drops_unmatched() {
        let map = table(&["Goa", "Assam", "Bihar"]);
        let data = LabelTable::new(
            "Rate",
            vec![LabelRecord::new("Bihar", 7.0), LabelRecord::new("Goa", 3.0)],
        );
        let joined = join_tables(&map, &data);
        let objects: Vec<_> = joined.iter().map(|r| r.object.as_str()).collect();
        assert_eq!(objects, vec!["Goa", "Bihar"]);
        assert_eq!(joined[1].row, 2);
        assert_eq!(joined[0].data_value, 3.0);
        assert_eq!(joined[1].map_value, 2.0);
    }

    #[test]
    fn colliding_labels_fan_out_in_join() {
        let map = table(&["Mumbai City"]);
        let data = table(&["Mumbai City", "Mumbai Cty"]);
        let (m, d) = match_names(&map, &data, Domain::Region);
        let joined = join_tables(&m, &d);
        assert_eq!(joined.len(), 2);
        assert!(joined.iter().all(|r| r.object == "Mumbai City"));
    }
}
