use crate::config;
use crate::types::{NumericField, ProjectRecord, TextField};
use crate::util::parse_f64_safe;
use calamine::{Data, Reader, Xlsx};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// Network or HTTP failure, including non-2xx statuses and timeouts.
    #[error("fetch failed: {0}")]
    Transport(String),
    /// Body downloaded but not readable as a multi-sheet workbook.
    #[error("workbook unreadable: {0}")]
    Parse(String),
}

/// Diagnostics for one successful load, reported back to the console.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub sheet: String,
    pub total_rows: usize,
    pub coercion_failures: usize,
}

/// A column the rename table recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Text(TextField),
    Number(NumericField),
}

// One fetch per URL per process. The dataset is immutable after load, so
// callers share it through an `Arc` and never re-download within a session.
type CacheEntry = (Arc<Vec<ProjectRecord>>, LoadReport);
static DATASET_CACHE: Lazy<Mutex<HashMap<String, CacheEntry>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Fetch and normalize the registry workbook at `source_url`.
///
/// The result is cached for the remainder of the process: a second call
/// with the same URL returns the cached dataset without touching the
/// network. A failed attempt is not cached and not retried here.
pub fn load_dataset(source_url: &str) -> Result<CacheEntry, LoadError> {
    if let Some(entry) = DATASET_CACHE.lock().unwrap().get(source_url) {
        log::info!("dataset cache hit for {source_url}");
        return Ok(entry.clone());
    }

    log::info!("fetching workbook from {source_url}");
    let bytes = fetch_bytes(source_url)?;
    let (records, report) = parse_workbook(&bytes)?;
    log::info!(
        "loaded {} rows from sheet {:?} ({} cells failed numeric coercion)",
        report.total_rows,
        report.sheet,
        report.coercion_failures
    );
    if report.coercion_failures > 0 {
        log::warn!(
            "{} numeric cells were unparseable and treated as missing",
            report.coercion_failures
        );
    }

    let entry = (Arc::new(records), report);
    DATASET_CACHE
        .lock()
        .unwrap()
        .insert(source_url.to_string(), entry.clone());
    Ok(entry)
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| LoadError::Transport(e.to_string()))?;
    let resp = client
        .get(url)
        .send()
        .map_err(|e| LoadError::Transport(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(LoadError::Transport(format!(
            "HTTP {} from {url}",
            resp.status()
        )));
    }
    let body = resp
        .bytes()
        .map_err(|e| LoadError::Transport(e.to_string()))?;
    Ok(body.to_vec())
}

fn parse_workbook(bytes: &[u8]) -> Result<(Vec<ProjectRecord>, LoadReport), LoadError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| LoadError::Parse(e.to_string()))?;
    let names = workbook.sheet_names();
    let sheet = pick_sheet(&names, &config::target_sheet(), config::SHEET_KEYWORD)
        .ok_or_else(|| LoadError::Parse("workbook has no sheets".to_string()))?;
    log::info!("selected sheet {sheet:?} out of {names:?}");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Parse(e.to_string()))?;
    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => map_header(cells),
        None => return Err(LoadError::Parse(format!("sheet {sheet:?} is empty"))),
    };

    let mut records = Vec::new();
    let mut coercion_failures = 0usize;
    for cells in rows {
        let rec = record_from_cells(&header, cells, &mut coercion_failures);
        // Workbook tails often carry formatting-only rows; drop them.
        if rec.is_empty() {
            continue;
        }
        records.push(rec);
    }

    let report = LoadReport {
        sheet,
        total_rows: records.len(),
        coercion_failures,
    };
    Ok((records, report))
}

/// Sheet selection: exact target name, then case-insensitive keyword
/// substring (first match wins), then the first sheet. The upstream file's
/// sheet naming is not stable, hence the fallbacks.
pub fn pick_sheet(names: &[String], target: &str, keyword: &str) -> Option<String> {
    if names.iter().any(|n| n == target) {
        return Some(target.to_string());
    }
    let kw = keyword.to_lowercase();
    if let Some(n) = names.iter().find(|n| n.to_lowercase().contains(&kw)) {
        return Some(n.clone());
    }
    names.first().cloned()
}

/// Map a header row to canonical columns. Unrecognized labels become
/// `None` and their cells are ignored on every data row.
pub fn map_header(cells: &[Data]) -> Vec<Option<Column>> {
    cells
        .iter()
        .map(|c| cell_to_text(c).as_deref().and_then(canonical_column))
        .collect()
}

/// Resolve a free-text source label to a canonical column.
///
/// Labels in the published workbook carry line-break markup and erratic
/// spacing, so matching runs on a lowercased, markup-stripped,
/// whitespace-collapsed form of the label.
pub fn canonical_column(label: &str) -> Option<Column> {
    let norm = normalize_label(label);
    let col = match norm.as_str() {
        "project id" => Column::Text(TextField::ProjectId),
        "project name" => Column::Text(TextField::ProjectName),
        "voluntary registry" => Column::Text(TextField::VoluntaryRegistry),
        "arb project" => Column::Text(TextField::ArbProject),
        "voluntary status" => Column::Text(TextField::VoluntaryStatus),
        "scope" => Column::Text(TextField::Scope),
        "type" => Column::Text(TextField::ProjectType),
        "reduction / removal" | "reduction/removal" => {
            Column::Text(TextField::ReductionOrRemoval)
        }
        "methodology / protocol" | "methodology/protocol" => {
            Column::Text(TextField::MethodologyProtocol)
        }
        "region" => Column::Text(TextField::Region),
        "country" => Column::Text(TextField::Country),
        "state" => Column::Text(TextField::State),
        "country income level" | "income level" => Column::Text(TextField::IncomeLevel),
        "total credits issued" => Column::Number(NumericField::TotalCreditsIssued),
        "total credits retired" => Column::Number(NumericField::TotalCreditsRetired),
        "total credits remaining" => Column::Number(NumericField::TotalCreditsRemaining),
        "total buffer pool deposits" => Column::Number(NumericField::TotalBufferPoolDeposits),
        _ => return None,
    };
    Some(col)
}

fn normalize_label(label: &str) -> String {
    let mut s = label.to_lowercase();
    for tag in ["<br/>", "<br />", "<br>"] {
        s = s.replace(tag, " ");
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build one record from a data row. Numeric cells that are present but
/// unparseable stay missing and bump `coercion_failures`; blank cells are
/// plain missing.
pub fn record_from_cells(
    header: &[Option<Column>],
    cells: &[Data],
    coercion_failures: &mut usize,
) -> ProjectRecord {
    let mut rec = ProjectRecord::default();
    for (col, cell) in header.iter().zip(cells.iter()) {
        match col {
            Some(Column::Text(field)) => {
                if let Some(text) = cell_to_text(cell) {
                    rec.set_text(*field, text);
                }
            }
            Some(Column::Number(field)) => match cell_to_number(cell) {
                Some(v) => rec.set_number(*field, v),
                None => {
                    if !cell_is_blank(cell) {
                        *coercion_failures += 1;
                    }
                }
            },
            None => {}
        }
    }
    rec
}

fn cell_is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty) || matches!(cell, Data::String(s) if s.trim().is_empty())
}

pub fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        // Identifier columns sometimes arrive as numeric cells.
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(if *b { "Yes" } else { "No" }.to_string()),
        Data::DateTimeIso(s) => Some(s.clone()),
        _ => None,
    }
}

pub fn cell_to_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_f64_safe(s),
        _ => None,
    }
}
