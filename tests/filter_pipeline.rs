use agri_carbon_report::filters::{
    apply_filters, distinct_values, FacetSelection, FilterSelection,
};
use agri_carbon_report::types::{ProjectRecord, TextField};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn project(id: &str, status: Option<&str>, issued: Option<f64>) -> ProjectRecord {
    ProjectRecord {
        project_id: Some(id.to_string()),
        voluntary_status: status.map(str::to_string),
        total_credits_issued: issued,
        ..ProjectRecord::default()
    }
}

fn unrestricted() -> FilterSelection {
    FilterSelection {
        statuses: FacetSelection::All,
        registries: FacetSelection::All,
        countries: FacetSelection::All,
        project_types: FacetSelection::All,
        only_with_issued: false,
    }
}

fn ids(rows: &[ProjectRecord]) -> Vec<&str> {
    rows.iter().map(|r| r.project_id.as_deref().unwrap()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The filtered view is always a subset of the input and keeps the input's
/// relative row order.
#[test]
fn output_is_subset_and_preserves_order() {
    let data = vec![
        project("a", Some("Registered"), Some(1.0)),
        project("b", Some("Completed"), Some(2.0)),
        project("c", Some("Registered"), Some(3.0)),
        project("d", Some("Withdrawn"), Some(4.0)),
    ];
    let mut sel = unrestricted();
    sel.statuses = FacetSelection::Only(vec!["Registered".to_string()]);

    let out = apply_filters(&data, &sel);

    assert!(out.len() <= data.len());
    assert_eq!(ids(&out), vec!["a", "c"]);
}

/// Filtering an already-filtered view with the same selection changes
/// nothing.
#[test]
fn apply_filters_is_idempotent() {
    let data = vec![
        project("a", Some("Registered"), Some(10.0)),
        project("b", Some("Completed"), None),
        project("c", Some("Registered"), Some(0.0)),
    ];
    let sel = FilterSelection::default();

    let once = apply_filters(&data, &sel);
    let twice = apply_filters(&once, &sel);

    assert_eq!(once, twice);
}

/// The "All" sentinel disables a facet even when concrete values are also
/// selected.
#[test]
fn all_sentinel_disables_facet() {
    let sel = FacetSelection::from_choices(vec!["all".to_string(), "Registered".to_string()]);
    assert_eq!(sel, FacetSelection::All);

    let data = vec![
        project("a", Some("Registered"), Some(1.0)),
        project("b", Some("Withdrawn"), Some(1.0)),
    ];
    let mut selection = unrestricted();
    selection.statuses = sel;
    assert_eq!(apply_filters(&data, &selection).len(), 2);
}

/// An empty choice list is the same as unrestricted.
#[test]
fn empty_choices_mean_unrestricted() {
    assert_eq!(FacetSelection::from_choices(Vec::new()), FacetSelection::All);
}

/// Status facet {"Registered"}, everything else "All", issued-credits flag
/// on: only the Registered row with positive issuance survives.
#[test]
fn status_facet_with_issued_flag() {
    let data = vec![
        project("a", Some("Registered"), Some(10.0)),
        project("b", Some("Completed"), Some(20.0)),
        project("c", Some("Registered"), Some(0.0)),
    ];
    let sel = FilterSelection {
        statuses: FacetSelection::Only(vec!["Registered".to_string()]),
        only_with_issued: true,
        ..unrestricted()
    };

    let out = apply_filters(&data, &sel);

    assert_eq!(ids(&out), vec!["a"]);
}

/// A facet whose column never appears in the dataset is a no-op filter,
/// not an error and not an empty result.
#[test]
fn absent_column_facet_is_noop() {
    // No row carries a registry value, so the registry column is absent.
    let data = vec![
        project("a", Some("Registered"), Some(1.0)),
        project("b", Some("Completed"), Some(2.0)),
    ];
    let sel = FilterSelection {
        registries: FacetSelection::Only(vec!["Verra".to_string()]),
        ..unrestricted()
    };

    assert_eq!(apply_filters(&data, &sel).len(), 2);
}

/// When the column is present, a row missing its facet value cannot match
/// a concrete accepted set.
#[test]
fn missing_facet_value_fails_concrete_set() {
    let data = vec![
        project("a", Some("Registered"), Some(1.0)),
        project("b", None, Some(2.0)),
    ];
    let sel = FilterSelection {
        statuses: FacetSelection::Only(vec!["Registered".to_string()]),
        ..unrestricted()
    };

    assert_eq!(ids(&apply_filters(&data, &sel)), vec!["a"]);
}

/// Under the issued-credits flag, rows with a missing issued quantity are
/// excluded along with the zero-issuance rows.
#[test]
fn issued_flag_excludes_missing_and_zero() {
    let data = vec![
        project("a", None, Some(5.0)),
        project("b", None, None),
        project("c", None, Some(0.0)),
    ];
    let sel = FilterSelection {
        only_with_issued: true,
        ..unrestricted()
    };

    assert_eq!(ids(&apply_filters(&data, &sel)), vec!["a"]);
}

/// The initial selection restricts status to Registered/Completed and
/// enables the issued-credits flag; every other facet starts unrestricted.
#[test]
fn default_selection_matches_initial_controls() {
    let sel = FilterSelection::default();

    assert_eq!(
        sel.statuses,
        FacetSelection::Only(vec!["Registered".to_string(), "Completed".to_string()])
    );
    assert_eq!(sel.registries, FacetSelection::All);
    assert_eq!(sel.countries, FacetSelection::All);
    assert_eq!(sel.project_types, FacetSelection::All);
    assert!(sel.only_with_issued);
}

/// Distinct values come back sorted and deduplicated, and an absent column
/// yields an empty list for the controls.
#[test]
fn distinct_values_sorted_and_deduplicated() {
    let data = vec![
        project("a", Some("Registered"), None),
        project("b", Some("Completed"), None),
        project("c", Some("Registered"), None),
    ];

    assert_eq!(
        distinct_values(&data, TextField::VoluntaryStatus),
        vec!["Completed".to_string(), "Registered".to_string()]
    );
    assert!(distinct_values(&data, TextField::Country).is_empty());
}
