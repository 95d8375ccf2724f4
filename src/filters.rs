use crate::types::{NumericField, ProjectRecord, TextField};
use std::collections::BTreeSet;

/// Sentinel choice that leaves a facet unrestricted.
pub const ALL_SENTINEL: &str = "All";

/// Accepted-value set for one facet.
///
/// Convention: a choice list that is empty or contains the `"All"` sentinel
/// (case-insensitive) applies no restriction for that facet, even when
/// concrete values are also listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetSelection {
    All,
    Only(Vec<String>),
}

impl FacetSelection {
    pub fn from_choices(choices: Vec<String>) -> Self {
        if choices.is_empty() || choices.iter().any(|c| c.eq_ignore_ascii_case(ALL_SENTINEL)) {
            FacetSelection::All
        } else {
            FacetSelection::Only(choices)
        }
    }

    /// A row with a missing facet value never matches a concrete set.
    fn accepts(&self, value: Option<&str>) -> bool {
        match self {
            FacetSelection::All => true,
            FacetSelection::Only(allowed) => {
                value.is_some_and(|v| allowed.iter().any(|a| a == v))
            }
        }
    }
}

/// The only user-driven state: one accepted-value set per facet plus the
/// issued-credits-positive flag. Rebuilt wholesale from the controls on
/// every cycle; there are no merge semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub statuses: FacetSelection,
    pub registries: FacetSelection,
    pub countries: FacetSelection,
    pub project_types: FacetSelection,
    pub only_with_issued: bool,
}

impl Default for FilterSelection {
    fn default() -> Self {
        FilterSelection {
            statuses: FacetSelection::Only(vec![
                "Registered".to_string(),
                "Completed".to_string(),
            ]),
            registries: FacetSelection::All,
            countries: FacetSelection::All,
            project_types: FacetSelection::All,
            only_with_issued: true,
        }
    }
}

/// Apply the current selection: status, then registry, country, type, and
/// the issued-credits flag last. AND composition makes the order irrelevant
/// to the result; it is fixed so partial-pipeline debugging has one
/// canonical sequence. Pure and order-preserving; the output is always a
/// subset of the input rows.
///
/// A facet whose column is absent from the dataset is a no-op rather than
/// an error. Under the issued-credits flag, rows with a missing issued
/// quantity are excluded.
pub fn apply_filters(data: &[ProjectRecord], sel: &FilterSelection) -> Vec<ProjectRecord> {
    let mut rows: Vec<ProjectRecord> = data.to_vec();
    for (field, facet) in [
        (TextField::VoluntaryStatus, &sel.statuses),
        (TextField::VoluntaryRegistry, &sel.registries),
        (TextField::Country, &sel.countries),
        (TextField::ProjectType, &sel.project_types),
    ] {
        if facet == &FacetSelection::All {
            continue;
        }
        if !column_present(data, field) {
            log::debug!("facet column {field:?} absent, filter skipped");
            continue;
        }
        rows.retain(|r| facet.accepts(r.text(field)));
    }
    if sel.only_with_issued {
        rows.retain(|r| {
            r.number(NumericField::TotalCreditsIssued)
                .is_some_and(|v| v > 0.0)
        });
    }
    log::debug!("{} of {} rows pass filters", rows.len(), data.len());
    rows
}

/// A column counts as present when any row carries a value for it.
pub fn column_present(data: &[ProjectRecord], field: TextField) -> bool {
    data.iter().any(|r| r.text(field).is_some())
}

/// Distinct values of a facet column in sorted order, for the filter
/// controls. Empty when the column is absent.
pub fn distinct_values(data: &[ProjectRecord], field: TextField) -> Vec<String> {
    let set: BTreeSet<&str> = data.iter().filter_map(|r| r.text(field)).collect();
    set.into_iter().map(|s| s.to_string()).collect()
}
