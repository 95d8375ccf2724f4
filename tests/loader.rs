use agri_carbon_report::loader::{
    canonical_column, load_dataset, map_header, pick_sheet, record_from_cells, Column, LoadError,
};
use agri_carbon_report::types::{NumericField, TextField};
use calamine::Data;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn strings(labels: &[&str]) -> Vec<Data> {
    labels.iter().map(|l| Data::String(l.to_string())).collect()
}

fn names(sheets: &[&str]) -> Vec<String> {
    sheets.iter().map(|s| s.to_string()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Source labels carry markup fragments and erratic spacing; the rename
/// table matches them case-insensitively on the cleaned-up form.
#[test]
fn header_labels_normalize_before_matching() {
    assert_eq!(
        canonical_column("Total Credits<br>Issued"),
        Some(Column::Number(NumericField::TotalCreditsIssued))
    );
    assert_eq!(
        canonical_column("  voluntary   REGISTRY "),
        Some(Column::Text(TextField::VoluntaryRegistry))
    );
    assert_eq!(
        canonical_column("Methodology / Protocol"),
        Some(Column::Text(TextField::MethodologyProtocol))
    );
    assert_eq!(
        canonical_column("Reduction/Removal"),
        Some(Column::Text(TextField::ReductionOrRemoval))
    );
}

/// A label the rename table does not know is skipped, not an error and not
/// a placeholder column.
#[test]
fn unknown_header_ignored() {
    assert_eq!(canonical_column("Project Developer"), None);

    let header = map_header(&strings(&["Project ID", "Project Developer"]));
    assert_eq!(header.len(), 2);
    assert!(header[0].is_some());
    assert!(header[1].is_none());
}

/// Sheet policy: exact target first, then case-insensitive keyword
/// substring (first match wins), then the first sheet.
#[test]
fn sheet_selection_policy() {
    let sheets = names(&["About", "Agriculture Projects", "AGRI extras"]);
    assert_eq!(
        pick_sheet(&sheets, "Agriculture Projects", "agri"),
        Some("Agriculture Projects".to_string())
    );

    let renamed = names(&["About", "AGRI extras", "Other agri data"]);
    assert_eq!(
        pick_sheet(&renamed, "Agriculture Projects", "agri"),
        Some("AGRI extras".to_string())
    );

    let unrelated = names(&["Sheet1", "Sheet2"]);
    assert_eq!(
        pick_sheet(&unrelated, "Agriculture Projects", "agri"),
        Some("Sheet1".to_string())
    );

    assert_eq!(pick_sheet(&[], "Agriculture Projects", "agri"), None);
}

/// Numeric cells coerce from native numbers and from numeric strings with
/// thousands separators; junk text stays missing and is counted, blank
/// cells are plain missing.
#[test]
fn numeric_coercion_is_best_effort() {
    let header = map_header(&strings(&[
        "Project ID",
        "Total Credits Issued",
        "Total Credits Retired",
        "Total Credits Remaining",
    ]));
    let mut failures = 0usize;

    let rec = record_from_cells(
        &header,
        &[
            Data::String("ACR123".to_string()),
            Data::String("1,234,567".to_string()),
            Data::Float(250.5),
            Data::String("n/a".to_string()),
        ],
        &mut failures,
    );

    assert_eq!(rec.project_id.as_deref(), Some("ACR123"));
    assert_eq!(rec.total_credits_issued, Some(1_234_567.0));
    assert_eq!(rec.total_credits_retired, Some(250.5));
    assert_eq!(rec.total_credits_remaining, None);
    assert_eq!(failures, 1);

    let mut blank_failures = 0usize;
    let blank = record_from_cells(
        &header,
        &[
            Data::String("ACR124".to_string()),
            Data::Empty,
            Data::String("   ".to_string()),
            Data::Empty,
        ],
        &mut blank_failures,
    );
    assert_eq!(blank.total_credits_issued, None);
    assert_eq!(blank_failures, 0);
}

/// A row with no values at all is recognized so the loader can drop
/// workbook-tail noise.
#[test]
fn fully_blank_row_is_empty() {
    let header = map_header(&strings(&["Project ID", "Total Credits Issued"]));
    let mut failures = 0usize;

    let rec = record_from_cells(&header, &[Data::Empty, Data::Empty], &mut failures);

    assert!(rec.is_empty());
    assert_eq!(failures, 0);
}

/// A raw sheet without the Voluntary Registry column leaves the attribute
/// absent on every record, not an empty string and not an error.
#[test]
fn missing_registry_column_stays_absent() {
    let header = map_header(&strings(&["Project ID", "Voluntary Status"]));
    let mut failures = 0usize;

    let rec = record_from_cells(
        &header,
        &[
            Data::String("VCS42".to_string()),
            Data::String("Registered".to_string()),
        ],
        &mut failures,
    );

    assert_eq!(rec.voluntary_registry, None);
    assert_eq!(rec.text(TextField::VoluntaryRegistry), None);
}

/// An unreachable host surfaces as `LoadError::Transport`; nothing
/// downstream of the loader ever runs.
#[test]
fn unreachable_url_is_transport_error() {
    let err = load_dataset("http://127.0.0.1:1/workbook.xlsx").unwrap_err();
    assert!(matches!(err, LoadError::Transport(_)), "got {err:?}");
}
