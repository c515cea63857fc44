// Entry point and high-level CLI flow.
//
// The interactive menu stands in for the dashboard's two dropdowns:
// - Option [1] loads and cleans the sales CSV, printing diagnostics.
// - Options [2]/[3] pick a report type; a year prompt follows, then the
//   four aggregate tables are previewed and exported.
// - After generating a report, the user can choose to go back to the
//   selection menu or exit.
mod loader;
mod output;
mod reports;
mod types;
mod util;

use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{ReportOutcome, ReportRequest, ReportType, SalesRecord, YEAR_MAX, YEAR_MIN};

const DATA_PATH: &str = "historical_automobile_sales.csv";

// Simple in-memory app state so we only load/clean the CSV once but can
// generate reports multiple times in a single run. The dataset is never
// mutated after loading.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<SalesRecord>>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
///
/// The prompt is reused for both the main menu and simple numeric inputs.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Prompt for the report year. Blank or out-of-range input leaves the year
/// unselected, which the aggregator answers with `NotReady` (nothing is
/// rendered). Only reachable once a valid report type is chosen, mirroring
/// the dashboard's disabled year selector.
fn prompt_year() -> Option<i32> {
    print!("Select a year ({}-{}): ", YEAR_MIN, YEAR_MAX);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    match buf.trim().parse::<i32>() {
        Ok(y) if (YEAR_MIN..=YEAR_MAX).contains(&y) => Some(y),
        _ => None,
    }
}

/// Ask the user whether to go back to the report selection menu after
/// generating a report.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load and clean the sales CSV.
///
/// On success, we store the `Vec<SalesRecord>` in `APP_STATE` and print
/// a short textual summary of what happened.
fn handle_load() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DATA_PATH.to_string());
    match loader::load_and_clean(&path) {
        Ok((data, load_report)) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                util::format_int(load_report.total_rows as i64),
                util::format_int(load_report.loaded_rows as i64)
            );
            println!(
                "Note: {} rows skipped due to parse/validation errors.",
                util::format_int(load_report.parse_errors as i64)
            );
            if let (Some(first), Some(last)) = (load_report.first_date, load_report.last_date) {
                println!("Coverage: {} to {}.", first, last);
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle options [2]/[3]: prompt for a year, compute the selected report,
/// and render it.
///
/// This function is intentionally side-effectful:
/// - writes one CSV per aggregate table,
/// - writes the JSON chart bundle,
/// - and prints markdown previews of each table to the console.
fn handle_report(report_type: ReportType) {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };

    let request = ReportRequest {
        report_type: Some(report_type),
        year: prompt_year(),
    };
    match reports::compute(&data, &request) {
        ReportOutcome::Bundle(bundle) => {
            println!("\nGenerating report...\n");
            for table in &bundle.tables {
                let file = format!("{}.csv", table.role.file_stem());
                if let Err(e) = output::write_csv(&file, table) {
                    eprintln!("Write error: {}", e);
                }
                output::preview_table(table, 8);
                println!("(Full table exported to {})\n", file);
            }
            if let Err(e) = output::write_json("report_bundle.json", &bundle) {
                eprintln!("Write error: {}", e);
            }
            println!("(Chart bundle exported to report_bundle.json)\n");
        }
        ReportOutcome::NoData(kind) => {
            println!("\n{}\n", kind.message());
        }
        // Placeholder selection: render nothing and fall back to the menu.
        ReportOutcome::NotReady => {
            println!("");
        }
    }
}

fn main() {
    loop {
        println!("Select Report Type:");
        println!("[1] Load the dataset");
        println!("[2] Yearly Statistics");
        println!("[3] Recession Period Statistics\n");
        let choice = read_choice();
        match choice.as_str() {
            "1" => {
                handle_load();
            }
            "2" | "3" => {
                let report_type = if choice == "2" {
                    ReportType::Yearly
                } else {
                    ReportType::RecessionPeriod
                };
                handle_report(report_type);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, or 3.\n");
            }
        }
    }
}
