use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use super::model::{approx_insolation, PlanetCatalog, PlanetRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a planet catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – NASA Exoplanet Archive export; `#` lines are comments
/// * `.json`    – `[{ "pl_name": "...", "st_teff": 3050, ... }, ...]`
/// * `.parquet` – one row per planet, archive column names
pub fn load_file(path: &Path) -> Result<PlanetCatalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (records, retrieved) = match ext.as_str() {
        "csv" => (load_csv(path)?, read_stamp(path)?),
        "json" => (load_json(path)?, None),
        "parquet" | "pq" => (load_parquet(path)?, None),
        other => bail!("Unsupported file extension: .{other}"),
    };
    let mut catalog = PlanetCatalog::from_records(records);
    catalog.retrieved = retrieved;
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// ArchiveRow – one row as exported by the archive
// ---------------------------------------------------------------------------

/// Raw archive columns. Every cell is optional and a malformed cell is read
/// as missing rather than failing the whole file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArchiveRow {
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    hostname: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    hip_name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    hd_name: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    st_teff: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    sy_dist: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_orbper: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_bmasse: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_insol: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    st_lum: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_orbsmax: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    pl_eqt: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    st_rad: Option<f64>,
    #[serde(deserialize_with = "flag")]
    tran_flag: bool,
    #[serde(deserialize_with = "flag")]
    in_mirecle: bool,
    #[serde(deserialize_with = "flag")]
    in_hwo: bool,
}

/// A boolean-ish cell: `1`/`0`, `true`/`false`, `yes`/`no`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagCell {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn flag<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<bool, D::Error> {
    let cell: Option<FlagCell> = csv::invalid_option(de)?;
    Ok(match cell {
        Some(FlagCell::Bool(b)) => b,
        Some(FlagCell::Number(n)) => n != 0.0 && n.is_finite(),
        Some(FlagCell::Text(s)) => parse_flag(&s),
        None => false,
    })
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "1.0" | "true" | "t" | "yes" | "y"
    )
}

impl ArchiveRow {
    fn into_record(self) -> PlanetRecord {
        // The approximate insolation is preferred: the archive's own column
        // is sparse for non-transiting planets.
        let insolation = match (self.st_lum, self.pl_orbsmax) {
            (Some(lum), Some(a)) => approx_insolation(lum, a),
            _ => None,
        }
        .or(self.pl_insol);

        PlanetRecord {
            name: self.pl_name.unwrap_or_default(),
            host: self.hostname.unwrap_or_default(),
            hip_name: self.hip_name.filter(|s| !s.trim().is_empty()),
            hd_name: self.hd_name.filter(|s| !s.trim().is_empty()),
            teff: self.st_teff,
            distance: self.sy_dist,
            period: self.pl_orbper,
            mass: self.pl_bmasse,
            insolation,
            eq_temp: self.pl_eqt,
            star_radius: self.st_rad,
            transiting: self.tran_flag,
            in_mirecle: self.in_mirecle,
            in_hwo: self.in_hwo,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// The retrieval stamp of an archive download: the text of a leading `#`
/// line, if the file starts with one.
fn read_stamp(path: &Path) -> Result<Option<String>> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .context("reading CSV header")?;
    Ok(first
        .strip_prefix('#')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string))
}

/// CSV layout: header row with archive column names (`pl_name`, `st_teff`,
/// `sy_dist`, ...). Unknown columns are ignored. Lines starting with `#`
/// (the archive's query timestamp, for instance) are skipped. Short rows are
/// accepted; their missing trailing cells read as missing values.
fn load_csv(path: &Path) -> Result<Vec<PlanetRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<ArchiveRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(row.into_record());
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "pl_name": "Proxima Cen b", "st_teff": 2900, "sy_dist": 1.3, "tran_flag": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<PlanetRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            if !row.is_object() {
                bail!("Row {i} is not a JSON object");
            }
            let row = ArchiveRow::deserialize(row).with_context(|| format!("Row {i}"))?;
            Ok(row.into_record())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with archive column names. Numeric columns may be
/// any of Float64/Float32/Int64/Int32; flag columns Boolean or integer.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<PlanetRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        if column("pl_name").is_none() {
            bail!("Parquet file missing 'pl_name' column");
        }

        let text = |name: &str, row: usize| column(name).and_then(|c| text_at(c, row));
        let number = |name: &str, row: usize| column(name).and_then(|c| numeric_at(c, row));
        let truthy = |name: &str, row: usize| column(name).is_some_and(|c| flag_at(c, row));

        for row in 0..batch.num_rows() {
            let archive_row = ArchiveRow {
                pl_name: text("pl_name", row),
                hostname: text("hostname", row),
                hip_name: text("hip_name", row),
                hd_name: text("hd_name", row),
                st_teff: number("st_teff", row),
                sy_dist: number("sy_dist", row),
                pl_orbper: number("pl_orbper", row),
                pl_bmasse: number("pl_bmasse", row),
                pl_insol: number("pl_insol", row),
                st_lum: number("st_lum", row),
                pl_orbsmax: number("pl_orbsmax", row),
                pl_eqt: number("pl_eqt", row),
                st_rad: number("st_rad", row),
                tran_flag: truthy("tran_flag", row),
                in_mirecle: truthy("in_mirecle", row),
                in_hwo: truthy("in_hwo", row),
            };
            records.push(archive_row.into_record());
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Read a numeric cell as `f64`. Nulls and non-numeric columns are missing.
fn numeric_at(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        _ => None,
    }
}

/// Read a string cell.
fn text_at(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Read a flag cell stored as Boolean, number or text.
fn flag_at(col: &Arc<dyn Array>, row: usize) -> bool {
    if col.is_null(row) {
        return false;
    }
    match col.data_type() {
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .is_some_and(|a| a.value(row)),
        DataType::Utf8 | DataType::LargeUtf8 => text_at(col, row).is_some_and(|s| parse_flag(&s)),
        _ => numeric_at(col, row).is_some_and(|v| v != 0.0),
    }
}
