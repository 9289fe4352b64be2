use crate::names::Domain;
use crate::types::{Feature, FeatureGeometry, LabelRecord, LabelTable};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use geo::MultiPolygon;
use shapefile::dbase::{FieldValue, TableWriterBuilder};
use shapefile::{Reader, Shape, Writer};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// dBase attribute naming the state in the all-India district shapefile.
const STATE_KEY: &str = "ST_NM";

pub fn load_features(path: &Path, domain: Domain) -> Result<Vec<Feature>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s: &str| s.to_lowercase())
        .ok_or_else(|| anyhow!("Input geometry file has no extension"))?;

    let features = match extension.as_str() {
        "shp" => load_shapefile(path, domain.label_key())?,
        "json" | "geojson" => load_geojson(path, domain.label_key())?,
        _ => return Err(anyhow!("Unsupported geometry format: {}", extension)),
    };

    info!(count = features.len(), path = ?path, "loaded features");
    Ok(features)
}

fn shape_to_geometry(shape: Shape) -> Result<Option<FeatureGeometry>> {
    let multi: MultiPolygon<f64> = match shape {
        Shape::Polygon(polygon) => polygon
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e))?,
        Shape::PolygonM(polygon) => polygon
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e))?,
        Shape::PolygonZ(polygon) => polygon
            .try_into()
            .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e))?,
        _ => return Ok(None),
    };
    Ok(Some(FeatureGeometry::from_multi(multi)))
}

fn load_shapefile(path: &Path, label_key: &str) -> Result<Vec<Feature>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open Shapefile: {:?}", path))?;

    let mut features = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let label = match record.get(label_key) {
            Some(FieldValue::Character(Some(s))) => s.trim().to_string(),
            Some(FieldValue::Character(None)) => {
                warn!(key = label_key, "skipping shape with empty label");
                continue;
            }
            Some(_) => {
                return Err(anyhow!("Shapefile label column '{}' must be a string", label_key))
            }
            None => return Err(anyhow!("Label column '{}' not found in Shapefile", label_key)),
        };

        match shape_to_geometry(shape)? {
            Some(geometry) => features.push(Feature { label, geometry }),
            None => warn!(label = %label, "skipping non-polygon shape"),
        }
    }

    Ok(features)
}

fn load_geojson(path: &Path, label_key: &str) -> Result<Vec<Feature>> {
    use geojson::GeoJson;
    use std::io::BufReader;

    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let geojson = GeoJson::from_reader(BufReader::new(file)).context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut features = Vec::new();

    for feature in collection.features {
        let label = match feature.properties.as_ref().and_then(|props| props.get(label_key)) {
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(_) => {
                return Err(anyhow!("GeoJSON label property '{}' must be a string", label_key))
            }
            None => {
                return Err(anyhow!("Label property '{}' not found in GeoJSON feature", label_key))
            }
        };

        let geometry = match feature.geometry {
            Some(geometry) => {
                let value: geo::Geometry<f64> = geometry
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;
                match value {
                    geo::Geometry::Polygon(p) => FeatureGeometry::Polygon(p),
                    geo::Geometry::MultiPolygon(mp) => FeatureGeometry::MultiPolygon(mp),
                    _ => {
                        warn!(label = %label, "skipping non-polygon feature");
                        continue;
                    }
                }
            }
            None => continue,
        };

        features.push(Feature { label, geometry });
    }

    Ok(features)
}

/// Reads the user's measurements: one label column and one numeric column.
pub fn load_data_table(path: &Path, label_column: &str, value_column: &str) -> Result<LabelTable> {
    let file = File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let headers = rdr.headers()?.clone();

    let label_idx = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| anyhow!("Label column '{}' not found in CSV", label_column))?;
    let value_idx = headers
        .iter()
        .position(|h| h == value_column)
        .ok_or_else(|| anyhow!("Value column '{}' not found in CSV", value_column))?;

    let mut rows = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let label = record.get(label_idx).unwrap_or("");
        if label.is_empty() {
            continue;
        }

        let raw = record.get(value_idx).unwrap_or("");
        let value: f64 = raw.parse().with_context(|| {
            format!("Row {} ('{}'): '{}' is not a number", line + 1, label, raw)
        })?;
        rows.push(LabelRecord::new(label, value));
    }

    info!(rows = rows.len(), path = ?path, "loaded data table");
    Ok(LabelTable::new(value_column, rows))
}

/// Directory and file stem for a state: `Tamil Nadu` becomes `tamil_nadu`.
fn state_dir_name(state: &str) -> String {
    state.trim().to_lowercase().replace(' ', "_")
}

/// Writes the districts of `state` from an all-India district shapefile into
/// `out_dir/<state>/<state>.shp`, keeping the attribute schema and CRS.
pub fn create_state_shapefile(
    india_shp: &Path,
    state: &str,
    out_dir: &Path,
) -> Result<(PathBuf, usize)> {
    let table_info = Reader::from_path(india_shp)
        .with_context(|| format!("Failed to open Shapefile: {:?}", india_shp))?
        .into_table_info();
    let mut reader = Reader::from_path(india_shp)
        .with_context(|| format!("Failed to open Shapefile: {:?}", india_shp))?;

    let name = state_dir_name(state);
    let target_dir = out_dir.join(&name);
    fs::create_dir_all(&target_dir).with_context(|| format!("Failed to create {:?}", target_dir))?;
    let out_path = target_dir.join(format!("{}.shp", name));

    let mut writer = Writer::from_path(&out_path, TableWriterBuilder::from_table_info(table_info))
        .with_context(|| format!("Failed to create Shapefile: {:?}", out_path))?;

    let mut written = 0;
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        let selected = matches!(
            record.get(STATE_KEY),
            Some(FieldValue::Character(Some(s))) if s.trim() == state
        );
        if !selected {
            continue;
        }

        match shape {
            Shape::Polygon(p) => writer.write_shape_and_record(&p, &record)?,
            Shape::PolygonM(p) => writer.write_shape_and_record(&p, &record)?,
            Shape::PolygonZ(p) => writer.write_shape_and_record(&p, &record)?,
            other => {
                warn!(shape = ?other.shapetype(), "skipping non-polygon shape");
                continue;
            }
        }
        written += 1;
    }
    drop(writer);

    let prj = india_shp.with_extension("prj");
    if prj.exists() {
        fs::copy(&prj, out_path.with_extension("prj"))
            .with_context(|| format!("Failed to copy projection file {:?}", prj))?;
    }

    if written == 0 {
        warn!(state, "no features matched state name");
    }
    info!(state, written, path = ?out_path, "wrote state shapefile");
    Ok((out_path, written))
}
