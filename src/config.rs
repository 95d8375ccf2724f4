// Fixed external endpoints and filenames, overridable through the
// environment for local workbook mirrors.
use std::env;

/// Published registry offsets workbook (multi-sheet XLSX).
pub const SOURCE_URL: &str =
    "https://gspp.berkeley.edu/assets/uploads/page/Voluntary-Registry-Offsets-Database.xlsx";

/// Sheet holding the agricultural project rows. The upstream file has
/// renamed this sheet before, so the loader also keyword-matches and
/// finally falls back to the first sheet.
pub const TARGET_SHEET: &str = "Agriculture Projects";
pub const SHEET_KEYWORD: &str = "agri";

pub const EXPORT_CSV: &str = "agriculture_projects_filtered.csv";
pub const SUMMARY_JSON: &str = "summary.json";

pub fn source_url() -> String {
    env::var("AGRI_DATA_URL").unwrap_or_else(|_| SOURCE_URL.to_string())
}

pub fn target_sheet() -> String {
    env::var("AGRI_DATA_SHEET").unwrap_or_else(|_| TARGET_SHEET.to_string())
}
