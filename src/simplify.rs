use crate::error::{ChoroplethError, Result};
use crate::types::{CoordinateLists, FeatureGeometry};
use geo::LineString;
use serde::Deserialize;

/// Rings shorter than this are never thinned.
pub const MIN_THINNED_RING: usize = 20;

/// Ratio used for browser layers when the config does not set one.
pub const DEFAULT_KEEP_RATIO: f64 = 0.15;

/// Target fraction of ring points to keep, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub struct KeepRatio(f64);

impl KeepRatio {
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio > 0.0 && ratio <= 1.0 {
            Ok(KeepRatio(ratio))
        } else {
            Err(ChoroplethError::InvalidArgument(format!(
                "keep ratio must be in (0, 1], got {}",
                ratio
            )))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for KeepRatio {
    type Error = ChoroplethError;

    fn try_from(value: f64) -> Result<Self> {
        KeepRatio::new(value)
    }
}

impl Default for KeepRatio {
    fn default() -> Self {
        KeepRatio(DEFAULT_KEEP_RATIO)
    }
}

/// Index stride used when thinning a ring of `ring_len` points.
///
/// The float division is kept as is, so long rings at a ratio of 1 may still
/// come out at a stride other than exactly `1 / keep_ratio`.
pub fn compute_skip_rate(ring_len: usize, keep_ratio: KeepRatio) -> usize {
    if ring_len < MIN_THINNED_RING {
        return 1;
    }
    let len = ring_len as f64;
    (len / (len * keep_ratio.get())) as usize
}

fn thin_ring(ring: &LineString<f64>, keep_ratio: KeepRatio, out: &mut CoordinateLists) {
    let skip = compute_skip_rate(ring.0.len(), keep_ratio).max(1);
    for coord in ring.0.iter().step_by(skip) {
        out.xs.push(coord.x);
        out.ys.push(coord.y);
    }
}

/// Thinned outer boundary of one feature. Interior rings are dropped.
pub fn simplify_geometry(geometry: &FeatureGeometry, keep_ratio: KeepRatio) -> CoordinateLists {
    let mut out = CoordinateLists::default();
    match geometry {
        FeatureGeometry::Polygon(polygon) => {
            thin_ring(polygon.exterior(), keep_ratio, &mut out);
        }
        FeatureGeometry::MultiPolygon(multi) => {
            for part in &multi.0 {
                thin_ring(part.exterior(), keep_ratio, &mut out);
                out.xs.push(f64::NAN);
                out.ys.push(f64::NAN);
            }
        }
    }
    out
}

/// One x list and one y list per geometry, in input order.
pub fn get_shp_xy<'a, I>(geometries: I, keep_ratio: KeepRatio) -> (Vec<Vec<f64>>, Vec<Vec<f64>>)
where
    I: IntoIterator<Item = &'a FeatureGeometry>,
{
    geometries
        .into_iter()
        .map(|g| {
            let lists = simplify_geometry(g, keep_ratio);
            (lists.xs, lists.ys)
        })
        .unzip()
}
