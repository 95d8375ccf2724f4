// Entry point and high-level console flow.
//
// - Option [1] fetches and normalizes the registry workbook, printing
//   diagnostics.
// - Option [2] runs the filter pipeline and renders the dashboard: metric
//   cards, chart-ready tables, a CSV export and a JSON summary.
// - Option [3] edits the facet selections consumed on the next cycle.
use agri_carbon_report::config;
use agri_carbon_report::filters::{self, FacetSelection, FilterSelection};
use agri_carbon_report::loader;
use agri_carbon_report::output;
use agri_carbon_report::reports::{self, DisplayBundle};
use agri_carbon_report::types::{
    GroupCountRow, GroupCreditsRow, ProjectRecord, StatRow, StatusCreditsRow, TextField,
};
use agri_carbon_report::util::{format_credits, format_int, format_pct};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

// Simple in-memory app state: the dataset loads once per session, the
// selection is replaced wholesale by the filter editor and consumed on the
// next dashboard cycle.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        selection: FilterSelection::default(),
    })
});

struct AppState {
    data: Option<Arc<Vec<ProjectRecord>>>,
    selection: FilterSelection,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after a dashboard render.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: fetch and normalize the workbook.
///
/// On success the shared dataset lands in `APP_STATE`; on failure one
/// error banner is printed and nothing downstream runs.
fn handle_load() {
    let url = config::source_url();
    match loader::load_dataset(&url) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} projects loaded from sheet {:?})",
                format_int(report.total_rows as i64),
                report.sheet
            );
            if report.coercion_failures > 0 {
                println!(
                    "Note: {} numeric cells could not be parsed and are treated as missing.",
                    format_int(report.coercion_failures as i64)
                );
            }
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load dataset: {e}\n");
        }
    }
}

/// Handle option [2]: one full pipeline run against the cached dataset.
///
/// This function is intentionally side-effectful: it prints the metric
/// cards and table previews, writes the filtered-view CSV and the JSON
/// summary.
fn handle_dashboard() {
    let (data, selection) = {
        let state = APP_STATE.lock().unwrap();
        (state.data.clone(), state.selection.clone())
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return;
    };

    let filtered = filters::apply_filters(&data, &selection);
    let bundle = reports::build_dashboard(&filtered);

    render_metrics(&bundle);
    render_tables(&bundle);
    render_top_project(bundle.top_project.as_ref());

    let rows = reports::export_rows(&filtered);
    if let Err(e) = output::export_filtered_csv(config::EXPORT_CSV, &rows) {
        eprintln!("Write error: {e}");
    }
    println!("(Filtered table exported to {})", config::EXPORT_CSV);

    let summary = reports::generate_summary(&filtered);
    if let Err(e) = output::export_summary_json(config::SUMMARY_JSON, &summary) {
        eprintln!("Write error: {e}");
    }
    println!("(Summary stats exported to {})\n", config::SUMMARY_JSON);
}

fn render_metrics(b: &DisplayBundle) {
    println!("Agricultural Carbon Projects\n");
    println!("Projects:                {}", format_int(b.total_projects as i64));
    println!("Credits issued (tCO2eq): {}", format_credits(b.total_issued));
    println!("Credits retired:         {}", format_credits(b.total_retired));
    println!("Credits remaining:       {}", format_credits(b.total_remaining));
    // No card at all when nothing was issued.
    if let Some(rate) = b.retirement_rate_pct {
        println!("Retirement rate:         {}%", format_pct(rate));
    }
    println!();
}

fn render_tables(b: &DisplayBundle) {
    let registry: Vec<GroupCreditsRow> = b
        .registry_credits
        .iter()
        .map(|(group, credits)| GroupCreditsRow {
            group: group.clone(),
            credits: format_credits(*credits),
        })
        .collect();
    output::preview_table("Credits issued by registry (top 10)", &registry, 10);

    let types: Vec<GroupCountRow> = b
        .type_counts
        .iter()
        .map(|(group, projects)| GroupCountRow {
            group: group.clone(),
            projects: *projects,
        })
        .collect();
    output::preview_table("Projects by type", &types, 10);

    let statuses: Vec<StatusCreditsRow> = b
        .status_credits
        .iter()
        .map(|(status, issued, retired)| StatusCreditsRow {
            status: status.clone(),
            credits_issued: format_credits(*issued),
            credits_retired: format_credits(*retired),
        })
        .collect();
    output::preview_table("Issued vs retired credits by status", &statuses, 10);

    let countries: Vec<GroupCreditsRow> = b
        .country_credits
        .iter()
        .map(|(group, credits)| GroupCreditsRow {
            group: group.clone(),
            credits: format_credits(*credits),
        })
        .collect();
    output::preview_table("Credits issued by country (top 15)", &countries, 15);

    // Stats table is omitted entirely when no issued values are present.
    if let Some(stats) = &b.issued_stats {
        let rows = vec![
            StatRow {
                statistic: "Mean".to_string(),
                value: format_credits(stats.mean),
            },
            StatRow {
                statistic: "Median".to_string(),
                value: format_credits(stats.median),
            },
            StatRow {
                statistic: "Max".to_string(),
                value: format_credits(stats.max),
            },
            StatRow {
                statistic: "Min".to_string(),
                value: format_credits(stats.min),
            },
        ];
        output::preview_table("Issued credits per project (tCO2eq)", &rows, 4);
    }

    let methodologies: Vec<GroupCountRow> = b
        .methodology_counts
        .iter()
        .map(|(group, projects)| GroupCountRow {
            group: group.clone(),
            projects: *projects,
        })
        .collect();
    output::preview_table("Most common methodologies (top 10)", &methodologies, 10);

    let largest = reports::export_rows(&b.top_projects);
    output::preview_table("Largest projects by issued credits (top 10)", &largest, 10);
}

fn render_top_project(top: Option<&ProjectRecord>) {
    let Some(p) = top else { return };
    println!("Largest project by issued credits:");
    println!(
        "  {}: {} ({}, {})",
        p.project_id.as_deref().unwrap_or("n/a"),
        p.project_name.as_deref().unwrap_or("unnamed"),
        p.voluntary_registry.as_deref().unwrap_or("no registry"),
        p.country.as_deref().unwrap_or("no country"),
    );
    if let Some(issued) = p.total_credits_issued {
        println!("  {} tCO2eq issued", format_credits(issued));
    }
    println!();
}

/// Handle option [3]: capture a fresh `FilterSelection` from the console.
/// The previous selection is fully replaced, never merged.
fn handle_filters() {
    let data = { APP_STATE.lock().unwrap().data.clone() };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return;
    };

    println!("Enter comma-separated values per facet; blank or 'All' keeps every value.\n");
    let statuses = prompt_facet(&data, TextField::VoluntaryStatus, "Status");
    let registries = prompt_facet(&data, TextField::VoluntaryRegistry, "Registry");
    let countries = prompt_facet(&data, TextField::Country, "Country");
    let project_types = prompt_facet(&data, TextField::ProjectType, "Project type");
    let only_with_issued = prompt_issued_flag();

    let mut state = APP_STATE.lock().unwrap();
    state.selection = FilterSelection {
        statuses,
        registries,
        countries,
        project_types,
        only_with_issued,
    };
    println!("Filters updated.\n");
}

fn prompt_facet(data: &[ProjectRecord], field: TextField, label: &str) -> FacetSelection {
    let values = filters::distinct_values(data, field);
    if values.is_empty() {
        // Column absent from this dataset; the facet has nothing to offer.
        println!("{label}: column unavailable in this dataset, filter skipped.");
        return FacetSelection::All;
    }
    let preview: Vec<&str> = values.iter().take(12).map(|s| s.as_str()).collect();
    if values.len() > preview.len() {
        println!(
            "{label} options: {} ... ({} total)",
            preview.join(", "),
            values.len()
        );
    } else {
        println!("{label} options: {}", preview.join(", "));
    }
    let input = read_line(&format!("{label} selection: "));
    let choices: Vec<String> = input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    FacetSelection::from_choices(choices)
}

fn prompt_issued_flag() -> bool {
    loop {
        match read_line("Only projects with issued credits (Y/N): ")
            .to_uppercase()
            .as_str()
        {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn main() {
    env_logger::init();
    loop {
        println!("Agricultural Carbon Credits Report");
        println!("[1] Load the dataset");
        println!("[2] Render dashboard");
        println!("[3] Adjust filters\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_dashboard();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                handle_filters();
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2 or 3.\n");
            }
        }
    }
}
