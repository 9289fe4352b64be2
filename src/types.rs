use geo::{MultiPolygon, Polygon};

/// Shape of a single state or district as read from the shapefile.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl FeatureGeometry {
    /// Collapses a converted shapefile geometry: one part stays a Polygon.
    pub fn from_multi(mut multi: MultiPolygon<f64>) -> Self {
        if multi.0.len() == 1 {
            FeatureGeometry::Polygon(multi.0.remove(0))
        } else {
            FeatureGeometry::MultiPolygon(multi)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub label: String,
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub object: String,
    pub value: f64,
}

impl LabelRecord {
    pub fn new(object: impl Into<String>, value: f64) -> Self {
        Self {
            object: object.into(),
            value,
        }
    }
}

/// Two column table: the `Object` label plus one named value column.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    pub value_column: String,
    pub rows: Vec<LabelRecord>,
}

impl LabelTable {
    pub fn new(value_column: impl Into<String>, rows: Vec<LabelRecord>) -> Self {
        Self {
            value_column: value_column.into(),
            rows,
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.object.as_str())
    }
}

/// Thinned coordinates of one feature. NaN separates disjoint parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateLists {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}
