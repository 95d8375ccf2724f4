use crate::types::{
    NumericField, ProjectExportRow, ProjectRecord, SummaryStats, TextField,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Everything one render cycle needs, computed in a single pass over the
/// filtered view. A host surface (console here, could be a web page or an
/// API) renders this bundle and feeds the next `FilterSelection` back in.
#[derive(Debug, Clone)]
pub struct DisplayBundle {
    pub total_projects: usize,
    pub total_issued: f64,
    pub total_retired: f64,
    pub total_remaining: f64,
    pub retirement_rate_pct: Option<f64>,
    /// Credits issued by registry, top 10.
    pub registry_credits: Vec<(String, f64)>,
    /// Project counts by type.
    pub type_counts: Vec<(String, usize)>,
    /// Issued vs retired credits per status.
    pub status_credits: Vec<(String, f64, f64)>,
    /// Credits issued by country, top 15.
    pub country_credits: Vec<(String, f64)>,
    pub issued_stats: Option<DescriptiveStats>,
    /// Methodology frequencies, top 10.
    pub methodology_counts: Vec<(String, usize)>,
    /// The ten largest projects by issued credits.
    pub top_projects: Vec<ProjectRecord>,
    /// The project holding the most issued credits.
    pub top_project: Option<ProjectRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    pub max: f64,
    pub min: f64,
}

/// Sum over present values; missing is the additive identity, so an empty
/// view or an entirely missing column sums to 0.
pub fn sum_of(rows: &[ProjectRecord], field: NumericField) -> f64 {
    rows.iter().filter_map(|r| r.number(field)).sum()
}

/// `100 * sum(retired) / sum(issued)`, undefined when nothing was issued.
pub fn retirement_rate(rows: &[ProjectRecord]) -> Option<f64> {
    let issued = sum_of(rows, NumericField::TotalCreditsIssued);
    if issued > 0.0 {
        Some(100.0 * sum_of(rows, NumericField::TotalCreditsRetired) / issued)
    } else {
        None
    }
}

/// Sum `value` per distinct `by` key, sorted descending by sum with ties
/// keeping first-seen group order. Rows with a missing group key are
/// skipped; a group whose values are all missing is retained at 0.
pub fn group_sum(
    rows: &[ProjectRecord],
    by: TextField,
    value: NumericField,
) -> Vec<(String, f64)> {
    struct Acc {
        first_seen: usize,
        total: f64,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for (idx, r) in rows.iter().enumerate() {
        let Some(key) = r.text(by) else { continue };
        let e = map.entry(key.to_string()).or_insert(Acc {
            first_seen: idx,
            total: 0.0,
        });
        if let Some(v) = r.number(value) {
            e.total += v;
        }
    }
    let mut groups: Vec<(String, Acc)> = map.into_iter().collect();
    groups.sort_by(|a, b| {
        b.1.total
            .partial_cmp(&a.1.total)
            .unwrap_or(Ordering::Equal)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });
    groups.into_iter().map(|(k, acc)| (k, acc.total)).collect()
}

/// Row count per distinct `by` key, sorted descending with ties keeping
/// first-seen group order.
pub fn group_count(rows: &[ProjectRecord], by: TextField) -> Vec<(String, usize)> {
    struct Acc {
        first_seen: usize,
        count: usize,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for (idx, r) in rows.iter().enumerate() {
        let Some(key) = r.text(by) else { continue };
        let e = map.entry(key.to_string()).or_insert(Acc {
            first_seen: idx,
            count: 0,
        });
        e.count += 1;
    }
    let mut groups: Vec<(String, Acc)> = map.into_iter().collect();
    groups.sort_by(|a, b| {
        b.1.count
            .cmp(&a.1.count)
            .then(a.1.first_seen.cmp(&b.1.first_seen))
    });
    groups.into_iter().map(|(k, acc)| (k, acc.count)).collect()
}

/// The `n` rows with the greatest value of `field`. The sort is stable, so
/// ties keep original row order; rows missing the attribute rank after all
/// present values, and a view smaller than `n` comes back whole.
pub fn top_by(rows: &[ProjectRecord], field: NumericField, n: usize) -> Vec<ProjectRecord> {
    let mut ranked: Vec<ProjectRecord> = rows.to_vec();
    ranked.sort_by(|a, b| cmp_desc(a.number(field), b.number(field)));
    ranked.truncate(n);
    ranked
}

fn cmp_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Mean/median/max/min over present values only; `None` when the view has
/// no value for the attribute, so the caller omits the card instead of
/// rendering NaN.
pub fn descriptive_stats(rows: &[ProjectRecord], field: NumericField) -> Option<DescriptiveStats> {
    let mut values: Vec<f64> = rows.iter().filter_map(|r| r.number(field)).collect();
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    // Sorting once gives median, min and max together.
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    };
    Some(DescriptiveStats {
        mean,
        median,
        max: values[values.len() - 1],
        min: values[0],
    })
}

/// The record holding the maximum value of `field`; first occurrence wins
/// on ties. `None` when the view is empty or the attribute entirely missing.
pub fn argmax_row<'a>(rows: &'a [ProjectRecord], field: NumericField) -> Option<&'a ProjectRecord> {
    let mut best: Option<(&ProjectRecord, f64)> = None;
    for r in rows {
        if let Some(v) = r.number(field) {
            if best.map_or(true, |(_, bv)| v > bv) {
                best = Some((r, v));
            }
        }
    }
    best.map(|(r, _)| r)
}

/// Assemble the full dashboard for one filtered view.
pub fn build_dashboard(rows: &[ProjectRecord]) -> DisplayBundle {
    let status_credits = {
        let issued = group_sum(
            rows,
            TextField::VoluntaryStatus,
            NumericField::TotalCreditsIssued,
        );
        let retired: HashMap<String, f64> = group_sum(
            rows,
            TextField::VoluntaryStatus,
            NumericField::TotalCreditsRetired,
        )
        .into_iter()
        .collect();
        issued
            .into_iter()
            .map(|(status, i)| {
                let r = retired.get(&status).copied().unwrap_or(0.0);
                (status, i, r)
            })
            .collect()
    };

    DisplayBundle {
        total_projects: rows.len(),
        total_issued: sum_of(rows, NumericField::TotalCreditsIssued),
        total_retired: sum_of(rows, NumericField::TotalCreditsRetired),
        total_remaining: sum_of(rows, NumericField::TotalCreditsRemaining),
        retirement_rate_pct: retirement_rate(rows),
        registry_credits: group_sum(
            rows,
            TextField::VoluntaryRegistry,
            NumericField::TotalCreditsIssued,
        )
        .into_iter()
        .take(10)
        .collect(),
        type_counts: group_count(rows, TextField::ProjectType),
        status_credits,
        country_credits: group_sum(rows, TextField::Country, NumericField::TotalCreditsIssued)
            .into_iter()
            .take(15)
            .collect(),
        issued_stats: descriptive_stats(rows, NumericField::TotalCreditsIssued),
        methodology_counts: group_count(rows, TextField::MethodologyProtocol)
            .into_iter()
            .take(10)
            .collect(),
        top_projects: top_by(rows, NumericField::TotalCreditsIssued, 10),
        top_project: argmax_row(rows, NumericField::TotalCreditsIssued).cloned(),
    }
}

pub fn generate_summary(rows: &[ProjectRecord]) -> SummaryStats {
    SummaryStats {
        total_projects: rows.len(),
        total_credits_issued: sum_of(rows, NumericField::TotalCreditsIssued),
        total_credits_retired: sum_of(rows, NumericField::TotalCreditsRetired),
        total_credits_remaining: sum_of(rows, NumericField::TotalCreditsRemaining),
        retirement_rate_pct: retirement_rate(rows),
    }
}

/// The filtered view's selectable columns, shaped for the table widget and
/// the CSV download. Missing attributes render as empty cells.
pub fn export_rows(rows: &[ProjectRecord]) -> Vec<ProjectExportRow> {
    rows.iter()
        .map(|r| ProjectExportRow {
            project_id: r.project_id.clone().unwrap_or_default(),
            project_name: r.project_name.clone().unwrap_or_default(),
            registry: r.voluntary_registry.clone().unwrap_or_default(),
            status: r.voluntary_status.clone().unwrap_or_default(),
            project_type: r.project_type.clone().unwrap_or_default(),
            methodology: r.methodology_protocol.clone().unwrap_or_default(),
            country: r.country.clone().unwrap_or_default(),
            credits_issued: fmt_opt(r.total_credits_issued),
            credits_retired: fmt_opt(r.total_credits_retired),
            credits_remaining: fmt_opt(r.total_credits_remaining),
        })
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.0}")).unwrap_or_default()
}
