//! CSV source loading.
//!
//! Each source is read fully into memory, decoded as UTF-8 (a leading BOM is
//! dropped) and parsed with its first row as the header.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AuditError;
use crate::model::{funnel_columns, offer_columns, FunnelRecord, OfferMapping};

const BOM: char = '\u{feff}';
const INLINE_SOURCE: &str = "<inline>";

/// A parsed row: header name → cell text.
pub type RawRow = HashMap<String, String>;

pub fn load_funnels(path: &Path) -> Result<Vec<FunnelRecord>, AuditError> {
    let data = read_source(path)?;
    let (headers, rows) = parse_rows(path, &data)?;
    warn_missing_columns(path, &headers, &[funnel_columns::ID, funnel_columns::NAME]);
    debug!(path = %path.display(), rows = rows.len(), "loaded funnels");
    Ok(rows.into_iter().map(FunnelRecord::from_fields).collect())
}

pub fn load_offers(path: &Path) -> Result<Vec<OfferMapping>, AuditError> {
    let data = read_source(path)?;
    let (headers, rows) = parse_rows(path, &data)?;
    warn_missing_columns(path, &headers, &OFFER_COLUMNS);
    debug!(path = %path.display(), rows = rows.len(), "loaded offer mappings");
    Ok(rows.into_iter().map(OfferMapping::from_fields).collect())
}

/// Parse funnels from CSV text already in memory.
pub fn parse_funnels(csv_data: &str) -> Result<Vec<FunnelRecord>, AuditError> {
    let (_, rows) = parse_rows(Path::new(INLINE_SOURCE), csv_data)?;
    Ok(rows.into_iter().map(FunnelRecord::from_fields).collect())
}

/// Parse offer mappings from CSV text already in memory.
pub fn parse_offers(csv_data: &str) -> Result<Vec<OfferMapping>, AuditError> {
    let (_, rows) = parse_rows(Path::new(INLINE_SOURCE), csv_data)?;
    Ok(rows.into_iter().map(OfferMapping::from_fields).collect())
}

const OFFER_COLUMNS: [&str; 6] = [
    offer_columns::FUNNEL_ID,
    offer_columns::PROJECT_ID,
    offer_columns::NOME_PRODUTO,
    offer_columns::NOME_OFERTA,
    offer_columns::ORIGEM,
    offer_columns::ID_FUNIL,
];

/// Read a source file as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, AuditError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AuditError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => format_error(path, e.to_string()),
    })?;

    String::from_utf8(bytes).map_err(|e| format_error(path, format!("invalid UTF-8: {e}")))
}

/// Split CSV text into its header and rows.
///
/// Short rows are allowed; their trailing columns are simply absent. Cells
/// beyond the header width are dropped.
pub fn parse_rows(path: &Path, csv_data: &str) -> Result<(Vec<String>, Vec<RawRow>), AuditError> {
    let csv_data = csv_data.strip_prefix(BOM).unwrap_or(csv_data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format_error(path, e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format_error(path, e.to_string()))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}

fn warn_missing_columns(path: &Path, headers: &[String], expected: &[&str]) {
    for column in expected {
        if !headers.iter().any(|h| h == column) {
            warn!(path = %path.display(), column = *column, "column missing from header; treating as empty");
        }
    }
}

fn format_error(path: &Path, message: String) -> AuditError {
    AuditError::SourceFormat {
        path: PathBuf::from(path),
        message,
    }
}
