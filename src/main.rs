// Entry point and interactive CLI flow.
//
// - Option [1] rebuilds the snapshot from the data directory.
// - Option [2] prints the dashboard views and exports them to CSV/JSON.
// - Options [3] and [4] call the weather and narrative collaborators.
// - After a report the user can go back to the menu or exit.
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use surveillance_report::narrative::NarrativeClient;
use surveillance_report::output;
use surveillance_report::scheduler::spawn_refresh_loop;
use surveillance_report::types::{DiseaseSurveillance, HighRiskArea};
use surveillance_report::util;
use surveillance_report::weather::{self, WeatherClient};
use surveillance_report::{logger, Alert, Config, DashboardStats, HealthStore, RefreshOutcome};

const HIGH_RISK_FILE: &str = "report_high_risk_areas.csv";
const BREAKDOWN_FILE: &str = "report_disease_breakdown.csv";
const SUMMARY_FILE: &str = "dashboard_summary.json";

#[derive(Serialize)]
struct DashboardExport {
    last_updated: String,
    dashboard_stats: DashboardStats,
    disease_surveillance: DiseaseSurveillance,
    high_risk_areas: Vec<HighRiskArea>,
    alerts: Vec<Alert>,
}

/// One trimmed line, or `None` once the input is closed.
fn read_line_from(input: &mut impl BufRead) -> Option<String> {
    let mut buf = String::new();
    match input.read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice(input: &mut impl BufRead) -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    read_line_from(input)
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N` or closed the input.
fn prompt_back_to_menu(input: &mut impl BufRead) -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let Some(answer) = read_line_from(input) else {
            return false;
        };
        match answer.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: rebuild the snapshot and say which path it took.
fn handle_refresh(store: &HealthStore) {
    match store.refresh() {
        RefreshOutcome::Loaded { path, sheets } => {
            println!(
                "Loaded {} sheet(s) from {}",
                util::format_int(sheets as u64),
                path.display()
            );
        }
        RefreshOutcome::MinimalFallback => {
            println!("No spreadsheet found. Place an .xlsx/.xls file in the data directory.");
        }
        RefreshOutcome::RealisticFallback => {
            println!("Note: the spreadsheet could not be read; showing synthetic data.");
        }
    }
    let snapshot = store.get_current_snapshot();
    println!(
        "Snapshot {}: {} summarized diseases, {} trend series, {} locations.\n",
        snapshot.stamp(),
        snapshot.national_summary.len(),
        snapshot.disease_trends.len(),
        util::format_int(snapshot.map_data.len() as u64)
    );
}

/// Handle option [2]: print the dashboard views and export them.
fn handle_generate_reports(store: &HealthStore) {
    let stats = store.get_dashboard_stats();
    let surveillance = store.get_disease_surveillance();
    let areas = store.get_high_risk_areas();
    let alerts = store.get_alerts();

    println!("Generating reports...\n");

    output::preview_table("Dashboard Summary", None, &stats.rows(), 4);

    if let Err(e) = output::write_csv(Path::new(HIGH_RISK_FILE), &areas) {
        eprintln!("Write error: {:#}", e);
    }
    output::preview_table("High-Risk Areas", Some("Top 5 locations by cases"), &areas, 5);
    println!("(Full table exported to {})\n", HIGH_RISK_FILE);

    if let Err(e) = output::write_csv(Path::new(BREAKDOWN_FILE), &surveillance.disease_breakdown) {
        eprintln!("Write error: {:#}", e);
    }
    output::preview_table(
        "Disease Breakdown",
        Some("Share of national cases"),
        &surveillance.disease_breakdown,
        10,
    );
    println!(
        "Total cases: {} across {} diseases, {} monitored districts. (Exported to {})\n",
        util::format_int(surveillance.total_cases),
        surveillance.active_diseases,
        surveillance.monitoring_districts,
        BREAKDOWN_FILE
    );

    println!("Alerts ({}):", alerts.len());
    for alert in &alerts {
        println!("  [{}] {} ({})", alert.priority, alert.message, alert.date);
    }
    println!();

    let export = DashboardExport {
        last_updated: store.get_current_snapshot().stamp(),
        dashboard_stats: stats,
        disease_surveillance: surveillance,
        high_risk_areas: areas,
        alerts,
    };
    if let Err(e) = output::write_json(Path::new(SUMMARY_FILE), &export) {
        eprintln!("Write error: {:#}", e);
    }
    println!("Summary saved to {}\n", SUMMARY_FILE);
}

/// Handle option [3]: live weather and weather-driven health alerts.
async fn handle_weather(client: &WeatherClient) {
    let report = client.current_weather().await;
    if let Some(e) = &report.error {
        println!("{}\n", e);
    }
    let s = &report.national_summary;
    println!(
        "National weather ({} cities, {}): avg {}°C (min {}, max {}), humidity {}%, pressure {} hPa\n",
        s.total_cities,
        s.conditions,
        util::format_number(s.avg_temperature, 1),
        util::format_number(s.min_temperature, 1),
        util::format_number(s.max_temperature, 1),
        util::format_number(s.avg_humidity, 1),
        util::format_number(s.avg_pressure, 1)
    );
    output::preview_table_rows(&report.cities, report.cities.len());
    let alerts = weather::weather_alerts(&report.cities);
    output::preview_table("Weather Health Alerts", None, &alerts, alerts.len());

    let climate = weather::climate_monitoring(&report);
    let t = &climate.temperature_trends;
    let r = &climate.health_correlations;
    println!(
        "Climate monitoring ({}): {:?} temperature, heat index {}°C, {:?} pressure",
        climate.monitoring_status,
        t.trend,
        util::format_number(t.heat_index, 1),
        climate.pressure_trends.stability
    );
    println!(
        "Disease risk from climate: malaria {}, dengue {}, respiratory {}\n",
        r.malaria_risk, r.dengue_risk, r.respiratory_risk
    );
}

/// Handle option [4]: recommendations and outlook scenarios.
async fn handle_narrative(store: &HealthStore, client: &NarrativeClient) {
    let snapshot = store.get_current_snapshot();
    let recommendations = client.recommendations(&snapshot).await;
    println!(
        "Overall risk: {}",
        recommendations.risk_assessment.overall_risk
    );
    for concern in &recommendations.risk_assessment.key_concerns {
        println!("  - {}", concern);
    }
    println!("\nPriority actions:");
    for action in &recommendations.priority_actions {
        println!("  [{}] {} ({})", action.priority, action.action, action.timeline);
    }
    println!("\nScenarios (next 3 months):");
    for scenario in client.scenarios(&snapshot).await.scenarios {
        println!("  {} - {}", scenario.name, scenario.probability);
        for (measure, projection) in &scenario.expected_outcomes {
            println!("      {}: {}", measure, projection);
        }
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    logger::init(config.log_level).map_err(|e| anyhow::anyhow!("{}", e))?;
    let store = Arc::new(HealthStore::open(&config));
    if let Some(every) = config.refresh_interval {
        spawn_refresh_loop(Arc::clone(&store), every);
    }
    let weather = WeatherClient::new(&config.weather)?;
    let narrative = NarrativeClient::new(&config.narrative)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("Health Surveillance Menu:");
        println!("[1] Refresh health data");
        println!("[2] Generate Reports");
        println!("[3] Weather Conditions");
        println!("[4] Recommendations & Scenarios");
        println!("[5] Exit\n");
        let Some(choice) = read_choice(&mut input) else {
            println!("Exiting the program.");
            break;
        };
        let shown = match choice.as_str() {
            "1" => {
                handle_refresh(&store);
                continue;
            }
            "2" => {
                println!();
                handle_generate_reports(&store);
                true
            }
            "3" => {
                handle_weather(&weather).await;
                true
            }
            "4" => {
                handle_narrative(&store, &narrative).await;
                true
            }
            "5" => false,
            _ => {
                println!("Invalid choice. Please enter 1 to 5.\n");
                continue;
            }
        };
        if !shown || !prompt_back_to_menu(&mut input) {
            println!("Exiting the program.");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_reads_as_none() {
        let mut input = Cursor::new("2\n");
        assert_eq!(read_choice(&mut input).as_deref(), Some("2"));
        assert_eq!(read_choice(&mut input), None);
    }

    #[test]
    fn back_to_menu_stops_at_end_of_input() {
        let mut input = Cursor::new("maybe\n");
        assert!(!prompt_back_to_menu(&mut input));
        let mut input = Cursor::new("x\ny\n");
        assert!(prompt_back_to_menu(&mut input));
    }
}
