//! Synthetic snapshots used when real input is unavailable.
//!
//! Both fidelities are fixed in shape: the same keys and record counts on
//! every call. Only the realistic series values vary, and they come from the
//! random source the caller passes in.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;

use crate::derive;
use crate::types::{Alert, DashboardStats, LocationRecord, Priority, Snapshot, TrendPoint};

pub const SERIES_DAYS: i64 = 30;

pub struct Baseline {
    pub disease: &'static str,
    pub mean: f64,
    pub std_dev: f64,
}

pub const BASELINES: [Baseline; 3] = [
    Baseline {
        disease: "malaria",
        mean: 24_000.0,
        std_dev: 2_000.0,
    },
    Baseline {
        disease: "dengue",
        mean: 1_200.0,
        std_dev: 200.0,
    },
    Baseline {
        disease: "respiratory",
        mean: 8_500.0,
        std_dev: 800.0,
    },
];

pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub cases: u64,
    pub population: u64,
    pub vaccinated: u64,
}

pub const CITIES: [City; 8] = [
    City {
        name: "Karachi",
        lat: 24.8607,
        lng: 67.0011,
        cases: 8500,
        population: 15_000_000,
        vaccinated: 12_000_000,
    },
    City {
        name: "Lahore",
        lat: 31.5204,
        lng: 74.3587,
        cases: 6200,
        population: 11_000_000,
        vaccinated: 8_800_000,
    },
    City {
        name: "Islamabad",
        lat: 33.6844,
        lng: 73.0479,
        cases: 1800,
        population: 2_000_000,
        vaccinated: 1_600_000,
    },
    City {
        name: "Faisalabad",
        lat: 31.4154,
        lng: 73.0747,
        cases: 3200,
        population: 3_200_000,
        vaccinated: 2_500_000,
    },
    City {
        name: "Rawalpindi",
        lat: 33.5651,
        lng: 73.0169,
        cases: 2100,
        population: 2_100_000,
        vaccinated: 1_650_000,
    },
    City {
        name: "Multan",
        lat: 30.1575,
        lng: 71.5249,
        cases: 1900,
        population: 1_900_000,
        vaccinated: 1_480_000,
    },
    City {
        name: "Peshawar",
        lat: 34.0151,
        lng: 71.5249,
        cases: 1500,
        population: 1_970_000,
        vaccinated: 1_520_000,
    },
    City {
        name: "Quetta",
        lat: 30.1798,
        lng: 66.9750,
        cases: 900,
        population: 1_001_000,
        vaccinated: 780_000,
    },
];

/// "No data yet": every tracked disease present with an empty series.
pub fn minimal(now: NaiveDateTime) -> Snapshot {
    let disease_trends = BASELINES
        .iter()
        .map(|b| (b.disease.to_string(), Vec::new()))
        .collect();
    Snapshot {
        last_updated: now,
        national_summary: BTreeMap::new(),
        disease_trends,
        map_data: Vec::new(),
        alerts: Vec::new(),
        dashboard_stats: DashboardStats::default(),
    }
}

/// A plausible month of data for demonstrations and degraded operation.
pub fn realistic<R: Rng + ?Sized>(now: NaiveDateTime, rng: &mut R) -> Snapshot {
    let start = now.date() - Duration::days(SERIES_DAYS);
    let disease_trends = BASELINES
        .iter()
        .map(|baseline| {
            let noise = Normal::new(0.0, baseline.std_dev).ok();
            let series = (0..SERIES_DAYS)
                .map(|day| {
                    let jitter = noise.as_ref().map(|n| n.sample(&mut *rng)).unwrap_or(0.0);
                    TrendPoint {
                        date: start + Duration::days(day),
                        cases: (baseline.mean + jitter).round().max(0.0) as u64,
                    }
                })
                .collect();
            (baseline.disease.to_string(), series)
        })
        .collect();

    let map_data = CITIES
        .iter()
        .map(|city| LocationRecord {
            location: city.name.to_string(),
            lat: city.lat,
            lng: city.lng,
            cases: city.cases,
            population: Some(city.population),
            vaccinated: Some(city.vaccinated),
            province: None,
        })
        .collect();

    let date = now.format("%Y-%m-%d").to_string();
    let alerts = [
        (
            "Malaria cases increasing in Karachi - enhanced surveillance recommended",
            Priority::High,
        ),
        (
            "Dengue breeding sites detected in Lahore - immediate vector control needed",
            Priority::Medium,
        ),
        (
            "Vaccination coverage target achieved in Islamabad",
            Priority::Low,
        ),
    ]
    .into_iter()
    .map(|(message, priority)| Alert {
        message: message.to_string(),
        priority,
        date: date.clone(),
        location: None,
        case_count: None,
    })
    .collect();

    let mut snapshot = Snapshot {
        last_updated: now,
        national_summary: BTreeMap::new(),
        disease_trends,
        map_data,
        alerts,
        dashboard_stats: DashboardStats::default(),
    };
    snapshot.dashboard_stats = derive::dashboard_stats(&snapshot);
    snapshot
}
