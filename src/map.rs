use crate::data::load_features;
use crate::names::Domain;
use crate::types::{Feature, FeatureGeometry};
use anyhow::Result;
use geo::{BoundingRect, Rect};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Lower-left and upper-right corners of the drawn area, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub llcrnrlon: f64,
    pub llcrnrlat: f64,
    pub urcrnrlon: f64,
    pub urcrnrlat: f64,
}

/// Transverse Mercator on WGS84, centred on the shapefile bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub projection: &'static str,
    pub ellps: &'static str,
    pub lon_0: f64,
    pub lat_0: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub name: &'static str,
    pub shapefile: PathBuf,
    pub bounds: [f64; 4],
    pub extent: Extent,
    pub projection: Projection,
}

impl MapFrame {
    pub fn new(domain: Domain, shapefile: PathBuf, bounds: Rect<f64>) -> Self {
        let (min, max) = (bounds.min(), bounds.max());

        // the country outline runs off the frame without the extra margin
        let extent = match domain {
            Domain::Country => Extent {
                llcrnrlon: min.x,
                llcrnrlat: min.y - 1.0,
                urcrnrlon: max.x + 3.0,
                urcrnrlat: max.y,
            },
            Domain::Region => Extent {
                llcrnrlon: min.x - 0.5,
                llcrnrlat: min.y - 0.5,
                urcrnrlon: max.x + 0.5,
                urcrnrlat: max.y + 0.5,
            },
        };

        MapFrame {
            name: domain.map_name(),
            shapefile,
            bounds: [min.x, min.y, max.x, max.y],
            extent,
            projection: Projection {
                projection: "tmerc",
                ellps: "WGS84",
                lon_0: (min.x + max.x) / 2.0,
                lat_0: (min.y + max.y) / 2.0,
            },
        }
    }
}

/// Union of the bounding boxes of every feature, `None` when there are none.
pub fn feature_bounds(features: &[Feature]) -> Option<Rect<f64>> {
    features
        .iter()
        .filter_map(|f| match &f.geometry {
            FeatureGeometry::Polygon(p) => p.bounding_rect(),
            FeatureGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        })
        .reduce(|a, b| {
            Rect::new(
                geo::Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                geo::Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                },
            )
        })
}

/// Frame for one of the supported maps under `maps_dir`.
///
/// Only `india` and `maharashtra` exist; any other name is reported and
/// yields `None` rather than an error.
pub fn create_map(name: &str, maps_dir: &Path) -> Result<Option<MapFrame>> {
    let domain = match name {
        "india" => Domain::Country,
        "maharashtra" => Domain::Region,
        _ => {
            warn!(name, "Name not supported as of yet");
            return Ok(None);
        }
    };

    let shapefile = maps_dir.join(name).join(format!("{}.shp", name));
    let features = load_features(&shapefile, domain)?;
    match feature_bounds(&features) {
        Some(bounds) => Ok(Some(MapFrame::new(domain, shapefile, bounds))),
        None => {
            warn!(path = ?shapefile, "shapefile has no polygon features");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::{scratch_dir, write_india};
    use geo::{polygon, Coord, MultiPolygon};

    fn feature(label: &str, geometry: FeatureGeometry) -> Feature {
        Feature {
            label: label.to_string(),
            geometry,
        }
    }

    fn sample() -> Vec<Feature> {
        vec![
            feature(
                "Goa",
                FeatureGeometry::Polygon(polygon![
                    (x: 74.0, y: 15.0),
                    (x: 74.5, y: 15.8),
                    (x: 73.7, y: 15.2),
                ]),
            ),
            feature(
                "Lakshadweep",
                FeatureGeometry::MultiPolygon(MultiPolygon::new(vec![
                    polygon![(x: 72.0, y: 10.0), (x: 72.2, y: 10.1), (x: 72.1, y: 10.3)],
                    polygon![(x: 73.0, y: 8.0), (x: 73.1, y: 8.2), (x: 73.2, y: 8.1)],
                ])),
            ),
        ]
    }

    #[test]
    fn bounds_cover_every_part() {
        let bounds = feature_bounds(&sample()).unwrap();
        assert_eq!(bounds.min(), Coord { x: 72.0, y: 8.0 });
        assert_eq!(bounds.max(), Coord { x: 74.5, y: 15.8 });
        assert!(feature_bounds(&[]).is_none());
    }

    #[test]
    fn country_frame_pads_south_and_east() {
        let bounds = feature_bounds(&sample()).unwrap();
        let frame = MapFrame::new(Domain::Country, PathBuf::from("india.shp"), bounds);
        assert_eq!(frame.name, "india");
        assert_eq!(
            frame.extent,
            Extent {
                llcrnrlon: 72.0,
                llcrnrlat: 7.0,
                urcrnrlon: 77.5,
                urcrnrlat: 15.8,
            }
        );
        assert_eq!(frame.projection.lon_0, 73.25);
        assert_eq!(frame.projection.lat_0, 11.9);
    }

    #[test]
    fn region_frame_pads_evenly() {
        let bounds = Rect::new(Coord { x: 72.6, y: 15.6 }, Coord { x: 80.9, y: 22.0 });
        let frame = MapFrame::new(Domain::Region, PathBuf::from("maharashtra.shp"), bounds);
        assert_eq!(frame.extent.llcrnrlat, 15.1);
        assert_eq!(frame.extent.urcrnrlat, 22.5);
        assert_eq!(frame.projection.projection, "tmerc");
    }

    #[test]
    fn unsupported_map_is_not_an_error() {
        let frame = create_map("kerala", Path::new("/nonexistent")).unwrap();
        assert!(frame.is_none());
    }

    #[test]
    fn missing_shapefile_is_an_error() {
        assert!(create_map("india", Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn frame_from_shapefile_on_disk() {
        let dir = scratch_dir("frame");
        std::fs::create_dir_all(dir.join("india")).unwrap();
        write_india(&dir.join("india").join("india.shp"));

        let frame = create_map("india", &dir).unwrap().unwrap();
        assert_eq!(frame.name, "india");
        assert_eq!(frame.shapefile, dir.join("india").join("india.shp"));
        assert_eq!(frame.bounds, [0.0, 0.0, 5.0, 1.0]);
        assert_eq!(
            frame.extent,
            Extent {
                llcrnrlon: 0.0,
                llcrnrlat: -1.0,
                urcrnrlon: 8.0,
                urcrnrlat: 1.0,
            }
        );
        assert_eq!(frame.projection.lon_0, 2.5);
        assert_eq!(frame.projection.lat_0, 0.5);
    }
}
