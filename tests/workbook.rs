use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use surveillance_report::types::Priority;
use surveillance_report::{Config, HealthStore, RefreshOutcome};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/health.xlsx")
}

fn store_with_fixture(dir: &Path) -> HealthStore {
    std::fs::copy(fixture(), dir.join("health.xlsx")).unwrap();
    HealthStore::new(&Config {
        data_dir: dir.to_path_buf(),
        seed: Some(7),
        ..Config::default()
    })
}

#[test]
fn real_workbook_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_fixture(dir.path());
    match store.refresh() {
        RefreshOutcome::Loaded { path, sheets } => {
            assert_eq!(sheets, 3);
            assert_eq!(path, dir.path().join("health.xlsx"));
        }
        other => panic!("expected a loaded workbook, got {:?}", other),
    }

    let snapshot = store.get_current_snapshot();
    let expected: BTreeMap<String, u64> =
        BTreeMap::from([("malaria".to_string(), 62096), ("dengue".to_string(), 76)]);
    assert_eq!(snapshot.national_summary, expected);

    let map_data = store.get_map_data();
    assert_eq!(map_data.len(), 5);
    let districts: Vec<&str> = map_data
        .iter()
        .filter(|r| r.province.as_deref() == Some("Sindh"))
        .map(|r| r.location.as_str())
        .collect();
    assert_eq!(districts, vec!["Larkana, Sindh", "Khairpur, Sindh", "Sanghar, Sindh"]);
}

#[test]
fn loaded_workbook_drives_the_views() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_fixture(dir.path());
    store.refresh();

    let stats = store.get_dashboard_stats();
    assert_eq!(stats.malaria_cases, 62096);
    assert_eq!(stats.dengue_cases, 76);
    assert!((stats.vaccination_coverage - 80.0).abs() < 1e-9);

    let surveillance = store.get_disease_surveillance();
    assert_eq!(surveillance.total_cases, 62172);
    assert_eq!(surveillance.active_diseases, 2);

    let areas = store.get_high_risk_areas();
    assert_eq!(areas[0].location, "Karachi");
    assert_eq!(areas[0].cases, 8500);

    let alerts = store.get_alerts();
    assert!(alerts
        .iter()
        .any(|a| a.priority == Priority::High && a.message.starts_with("Malaria epidemic")));
}
