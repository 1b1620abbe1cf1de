use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

use crate::util::format_number;

/// One day of case counts in a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub cases: u64,
}

/// One geographic unit (city or district) on the case map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub cases: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaccinated: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lenient parse of a priority/level/severity cell. Unknown text is medium.
    pub fn parse(s: &str) -> Priority {
        match s.trim().to_lowercase().as_str() {
            "high" | "critical" | "severe" | "urgent" => Priority::High,
            "low" | "minor" | "info" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub message: String,
    pub priority: Priority,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_count: Option<u64>,
}

/// Headline numbers for the dashboard, derived from the rest of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub malaria_cases: u64,
    pub malaria_trend: f64,
    pub dengue_cases: u64,
    pub dengue_trend: f64,
    pub respiratory_cases: u64,
    pub respiratory_trend: f64,
    pub vaccination_coverage: f64,
    pub vaccination_trend: f64,
}

/// The canonical health-data aggregate. Rebuilt wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub last_updated: NaiveDateTime,
    pub national_summary: BTreeMap<String, u64>,
    pub disease_trends: BTreeMap<String, Vec<TrendPoint>>,
    pub map_data: Vec<LocationRecord>,
    pub alerts: Vec<Alert>,
    pub dashboard_stats: DashboardStats,
}

impl Snapshot {
    /// Stamp used on alerts derived from this snapshot.
    pub fn stamp(&self) -> String {
        self.last_updated.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_cases(cases: u64) -> RiskLevel {
        if cases > 2000 {
            RiskLevel::High
        } else if cases > 1000 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        };
        f.write_str(s)
    }
}

fn display_coord(v: &f64) -> String {
    format!("{:.4}", v)
}

fn display_pct(v: &f64) -> String {
    format_number(*v, 2)
}

fn display_trend(v: &f64) -> String {
    format!("{:+.2}", v)
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct HighRiskArea {
    #[serde(rename = "Location")]
    #[tabled(rename = "Location")]
    pub location: String,
    #[serde(rename = "Cases")]
    #[tabled(rename = "Cases")]
    pub cases: u64,
    #[serde(rename = "Province")]
    #[tabled(rename = "Province")]
    pub province: String,
    #[serde(rename = "Lat")]
    #[tabled(rename = "Lat", display_with = "display_coord")]
    pub lat: f64,
    #[serde(rename = "Lng")]
    #[tabled(rename = "Lng", display_with = "display_coord")]
    pub lng: f64,
    #[serde(rename = "RiskLevel")]
    #[tabled(rename = "RiskLevel")]
    pub risk_level: RiskLevel,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DiseaseShare {
    #[serde(rename = "Disease")]
    #[tabled(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Cases")]
    #[tabled(rename = "Cases")]
    pub cases: u64,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage", display_with = "display_pct")]
    pub percentage: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiseaseSurveillance {
    pub total_cases: u64,
    pub active_diseases: usize,
    pub surveillance_status: String,
    pub last_updated: String,
    pub disease_breakdown: Vec<DiseaseShare>,
    pub monitoring_districts: usize,
    pub coverage_percentage: f64,
}

/// Row of the dashboard preview table.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct StatRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Current")]
    #[tabled(rename = "Current")]
    pub current: String,
    #[serde(rename = "Trend")]
    #[tabled(rename = "Trend", display_with = "display_trend")]
    pub trend: f64,
}

impl DashboardStats {
    pub fn rows(&self) -> Vec<StatRow> {
        vec![
            StatRow {
                metric: "Malaria".to_string(),
                current: crate::util::format_int(self.malaria_cases),
                trend: self.malaria_trend,
            },
            StatRow {
                metric: "Dengue".to_string(),
                current: crate::util::format_int(self.dengue_cases),
                trend: self.dengue_trend,
            },
            StatRow {
                metric: "Respiratory".to_string(),
                current: crate::util::format_int(self.respiratory_cases),
                trend: self.respiratory_trend,
            },
            StatRow {
                metric: "Vaccination coverage (%)".to_string(),
                current: format_number(self.vaccination_coverage, 1),
                trend: self.vaccination_trend,
            },
        ]
    }
}
