use crate::error::{ChoroplethError, Result};
use crate::map::MapFrame;
use crate::names::Domain;
use crate::reconcile::{join_tables, match_names};
use crate::simplify::{get_shp_xy, KeepRatio};
use crate::types::{Feature, LabelRecord, LabelTable};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Columns handed to the patch renderer, one entry per feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchSource {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub name: Vec<String>,
    pub rate: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethLayer {
    pub title: String,
    pub hover_key: &'static str,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub frame: Option<MapFrame>,
    pub source: PatchSource,
}

/// Joins feature geometry with the data table on canonical names.
///
/// Every feature needs a value; the first matching data row is used.
pub fn build_layer(
    domain: Domain,
    features: &[Feature],
    data: &LabelTable,
    keep_ratio: KeepRatio,
) -> Result<ChoroplethLayer> {
    let map_table = LabelTable::new(
        domain.hover_key(),
        features
            .iter()
            .map(|f| LabelRecord::new(f.label.as_str(), 0.0))
            .collect(),
    );
    let (map_table, data_table) = match_names(&map_table, data, domain);

    // map rows stay in feature order, so row i belongs to feature i
    let mut found: Vec<Option<f64>> = vec![None; map_table.rows.len()];
    for joined in join_tables(&map_table, &data_table) {
        found[joined.row].get_or_insert(joined.data_value);
    }
    let rate = found
        .into_iter()
        .zip(&map_table.rows)
        .map(|(value, row)| value.ok_or_else(|| ChoroplethError::MissingValue(row.object.clone())))
        .collect::<Result<Vec<f64>>>()?;

    let (x, y) = get_shp_xy(features.iter().map(|f| &f.geometry), keep_ratio);

    let low = rate.iter().copied().reduce(f64::min);
    let high = rate.iter().copied().reduce(f64::max);

    Ok(ChoroplethLayer {
        title: data.value_column.clone(),
        hover_key: domain.hover_key(),
        low,
        high,
        frame: None,
        source: PatchSource {
            x,
            y,
            name: map_table.rows.into_iter().map(|r| r.object).collect(),
            rate,
        },
    })
}

/// Writes the layer as JSON. NaN part separators come out as `null`.
pub fn write_layer(path: &Path, layer: &ChoroplethLayer) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create layer file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), layer).context("Failed to serialize layer")?;

    info!(path = ?path, features = layer.source.name.len(), "wrote choropleth layer");
    Ok(())
}
