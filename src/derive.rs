use std::cmp::Ordering;

use crate::classify::{matches, MatchMode};
use crate::types::{
    Alert, DashboardStats, DiseaseShare, DiseaseSurveillance, HighRiskArea, LocationRecord,
    Priority, RiskLevel, Snapshot, TrendPoint,
};
use crate::util::{format_int, title_case};

pub const DEFAULT_HIGH_RISK_COUNT: usize = 5;

pub const MALARIA_EPIDEMIC_THRESHOLD: u64 = 50_000;
pub const DENGUE_VECTOR_THRESHOLD: u64 = 50;
pub const VACCINATION_TARGET: f64 = 70.0;

const SURVEILLANCE_COVERAGE: f64 = 95.5;

/// How a series or summary key is recognized as one of the dashboard diseases.
pub struct TrackedDisease {
    pub key: &'static str,
    substrings: &'static [&'static str],
    tokens: &'static [&'static str],
}

impl TrackedDisease {
    pub fn matches(&self, name: &str) -> bool {
        matches(name, self.substrings, MatchMode::Substring)
            || name
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| self.tokens.contains(&token))
    }

    /// Exact key first, then the first matching name in map order.
    fn find<'a, V>(
        &self,
        entries: &'a std::collections::BTreeMap<String, V>,
    ) -> Option<&'a V> {
        entries.get(self.key).or_else(|| {
            entries
                .iter()
                .find(|(name, _)| self.matches(name))
                .map(|(_, v)| v)
        })
    }
}

pub const MALARIA: TrackedDisease = TrackedDisease {
    key: "malaria",
    substrings: &["malaria"],
    tokens: &[],
};

pub const DENGUE: TrackedDisease = TrackedDisease {
    key: "dengue",
    substrings: &["dengue"],
    tokens: &[],
};

/// Influenza-like illness is reported as respiratory.
pub const RESPIRATORY: TrackedDisease = TrackedDisease {
    key: "respiratory",
    substrings: &["respiratory"],
    tokens: &["ili"],
};

pub const VACCINATION: TrackedDisease = TrackedDisease {
    key: "vaccination",
    substrings: &["vaccin"],
    tokens: &[],
};

/// `(latest - previous) / previous * 100` over the last two points.
///
/// Fewer than two points, or a previous value of zero, gives 0.
pub fn trend_percent(series: &[TrendPoint]) -> f64 {
    match series {
        [.., prev, last] if prev.cases > 0 => {
            (last.cases as f64 - prev.cases as f64) / prev.cases as f64 * 100.0
        }
        _ => 0.0,
    }
}

/// `sum(vaccinated) / sum(population) * 100` over records reporting a
/// population, clamped to [0, 100].
pub fn vaccination_coverage(map_data: &[LocationRecord]) -> f64 {
    let (vaccinated, population) = map_data
        .iter()
        .filter_map(|r| r.population.map(|p| (r.vaccinated.unwrap_or(0), p)))
        .fold((0u64, 0u64), |(v, p), (rv, rp)| {
            (v.saturating_add(rv), p.saturating_add(rp))
        });
    if population == 0 {
        return 0.0;
    }
    (vaccinated as f64 / population as f64 * 100.0).clamp(0.0, 100.0)
}

fn current_and_trend(disease: &TrackedDisease, snapshot: &Snapshot) -> (u64, f64) {
    match disease.find(&snapshot.disease_trends) {
        Some(series) if !series.is_empty() => (
            series.last().map(|p| p.cases).unwrap_or(0),
            trend_percent(series),
        ),
        _ => (
            disease
                .find(&snapshot.national_summary)
                .copied()
                .unwrap_or(0),
            0.0,
        ),
    }
}

pub fn dashboard_stats(snapshot: &Snapshot) -> DashboardStats {
    let (malaria_cases, malaria_trend) = current_and_trend(&MALARIA, snapshot);
    let (dengue_cases, dengue_trend) = current_and_trend(&DENGUE, snapshot);
    let (respiratory_cases, respiratory_trend) = current_and_trend(&RESPIRATORY, snapshot);
    let vaccination_trend = VACCINATION
        .find(&snapshot.disease_trends)
        .map(|series| trend_percent(series))
        .unwrap_or(0.0);
    DashboardStats {
        malaria_cases,
        malaria_trend,
        dengue_cases,
        dengue_trend,
        respiratory_cases,
        respiratory_trend,
        vaccination_coverage: vaccination_coverage(&snapshot.map_data),
        vaccination_trend,
    }
}

/// Top `n` locations by cases, zero-case entries removed.
pub fn high_risk_areas(snapshot: &Snapshot, n: usize) -> Vec<HighRiskArea> {
    let mut sorted: Vec<&LocationRecord> = snapshot.map_data.iter().collect();
    sorted.sort_by(|a, b| b.cases.cmp(&a.cases));
    sorted
        .into_iter()
        .take(n)
        .filter(|r| r.cases > 0)
        .map(|r| HighRiskArea {
            location: r.location.clone(),
            cases: r.cases,
            province: r.province.clone().unwrap_or_else(|| "Unknown".to_string()),
            lat: r.lat,
            lng: r.lng,
            risk_level: RiskLevel::from_cases(r.cases),
        })
        .collect()
}

pub fn disease_surveillance(snapshot: &Snapshot) -> DiseaseSurveillance {
    let summary = &snapshot.national_summary;
    let total_cases = summary
        .values()
        .fold(0u64, |total, cases| total.saturating_add(*cases));
    let mut breakdown: Vec<DiseaseShare> = summary
        .iter()
        .filter(|(_, cases)| **cases > 0)
        .map(|(disease, cases)| DiseaseShare {
            disease: title_case(disease),
            cases: *cases,
            percentage: if total_cases == 0 {
                0.0
            } else {
                *cases as f64 / total_cases as f64 * 100.0
            },
        })
        .collect();
    breakdown.sort_by(|a, b| b.cases.cmp(&a.cases).then_with(|| a.disease.cmp(&b.disease)));
    DiseaseSurveillance {
        total_cases,
        active_diseases: summary.len(),
        surveillance_status: "Active".to_string(),
        last_updated: snapshot.last_updated.format("%Y-%m-%dT%H:%M:%S").to_string(),
        disease_breakdown: breakdown,
        monitoring_districts: snapshot.map_data.len(),
        coverage_percentage: SURVEILLANCE_COVERAGE,
    }
}

/// Threshold alerts over the snapshot's dashboard numbers, followed by the
/// standing hotspot advisory.
pub fn alerts(snapshot: &Snapshot) -> Vec<Alert> {
    let stats = &snapshot.dashboard_stats;
    let date = snapshot.stamp();
    let mut alerts = Vec::new();

    if stats.malaria_cases > MALARIA_EPIDEMIC_THRESHOLD {
        alerts.push(Alert {
            message: format!(
                "Malaria epidemic in progress ({} cases) - immediate emergency response required",
                format_int(stats.malaria_cases)
            ),
            priority: Priority::High,
            date: date.clone(),
            location: Some("Sindh Province (Larkana, Khairpur, Sanghar districts)".to_string()),
            case_count: Some(stats.malaria_cases),
        });
    }

    if stats.dengue_cases > DENGUE_VECTOR_THRESHOLD {
        alerts.push(Alert {
            message: "Dengue cases detected - enhanced vector control and surveillance needed"
                .to_string(),
            priority: Priority::Medium,
            date: date.clone(),
            location: Some("Urban centers (Karachi, Lahore, Islamabad)".to_string()),
            case_count: Some(stats.dengue_cases),
        });
    }

    if stats.vaccination_coverage.partial_cmp(&VACCINATION_TARGET) == Some(Ordering::Less) {
        alerts.push(Alert {
            message: format!(
                "Vaccination coverage below target ({:.1}%) - intensify immunization campaigns",
                stats.vaccination_coverage
            ),
            priority: Priority::Medium,
            date: date.clone(),
            location: Some("Rural areas across all provinces".to_string()),
            case_count: None,
        });
    }

    alerts.push(Alert {
        message: "Critical malaria hotspots identified requiring immediate attention".to_string(),
        priority: Priority::High,
        date,
        location: Some(
            "Larkana (5,620 cases), Khairpur (5,151 cases), Sanghar (4,489 cases)".to_string(),
        ),
        case_count: Some(15_260),
    });

    alerts
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::DashboardStats;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn empty_snapshot() -> Snapshot {
        Snapshot {
            last_updated: NaiveDate::from_ymd_opt(2024, 8, 1)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            national_summary: BTreeMap::new(),
            disease_trends: BTreeMap::new(),
            map_data: Vec::new(),
            alerts: Vec::new(),
            dashboard_stats: DashboardStats::default(),
        }
    }

    fn series(values: &[u64]) -> Vec<TrendPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, cases)| TrendPoint {
                date: start + chrono::Duration::days(i as i64),
                cases: *cases,
            })
            .collect()
    }

    fn location(name: &str, cases: u64) -> LocationRecord {
        LocationRecord {
            location: name.to_string(),
            lat: 25.0,
            lng: 68.0,
            cases,
            population: None,
            vaccinated: None,
            province: None,
        }
    }

    #[test]
    fn trend_uses_last_two_points() {
        assert!((trend_percent(&series(&[5, 80, 100])) - 25.0).abs() < 1e-9);
        assert!((trend_percent(&series(&[200, 150])) + 25.0).abs() < 1e-9);
        assert_eq!(trend_percent(&series(&[42])), 0.0);
        assert_eq!(trend_percent(&[]), 0.0);
    }

    #[test]
    fn trend_from_zero_previous_is_zero() {
        assert_eq!(trend_percent(&series(&[0, 12])), 0.0);
    }

    #[test]
    fn empty_snapshot_derives_zeroes() {
        let snapshot = empty_snapshot();
        assert_eq!(dashboard_stats(&snapshot), DashboardStats::default());
        assert!(high_risk_areas(&snapshot, 5).is_empty());
        let surveillance = disease_surveillance(&snapshot);
        assert_eq!(surveillance.total_cases, 0);
        assert_eq!(surveillance.active_diseases, 0);
        assert!(surveillance.disease_breakdown.is_empty());
    }

    #[test]
    fn stats_fall_back_to_national_summary() {
        let mut snapshot = empty_snapshot();
        snapshot.national_summary.insert("malaria".into(), 62096);
        snapshot.national_summary.insert("ili".into(), 31000);
        snapshot.disease_trends.insert("dengue".into(), series(&[40, 60]));
        let stats = dashboard_stats(&snapshot);
        assert_eq!(stats.malaria_cases, 62096);
        assert_eq!(stats.malaria_trend, 0.0);
        assert_eq!(stats.respiratory_cases, 31000);
        assert_eq!(stats.dengue_cases, 60);
        assert!((stats.dengue_trend - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ili_token_does_not_match_inside_words() {
        assert!(RESPIRATORY.matches("ILI (influenza-like illness)"));
        assert!(!RESPIRATORY.matches("bacillary dysentery"));
    }

    #[test]
    fn coverage_is_bounded() {
        let mut snapshot = empty_snapshot();
        let mut a = location("A", 10);
        a.population = Some(1000);
        a.vaccinated = Some(5000);
        snapshot.map_data.push(a);
        assert_eq!(vaccination_coverage(&snapshot.map_data), 100.0);

        let mut b = location("B", 10);
        b.population = Some(15_000);
        b.vaccinated = Some(1_000);
        snapshot.map_data.push(b);
        let coverage = vaccination_coverage(&snapshot.map_data);
        assert!((coverage - 6000.0 / 16000.0 * 100.0).abs() < 1e-9);

        // records without a population do not move the ratio
        snapshot.map_data.push(location("C", 3));
        assert_eq!(vaccination_coverage(&snapshot.map_data), coverage);
    }

    #[test]
    fn high_risk_ranking_and_levels() {
        let mut snapshot = empty_snapshot();
        for (name, cases) in [
            ("a", 1000),
            ("b", 2001),
            ("c", 0),
            ("d", 1001),
            ("e", 2000),
            ("f", 1),
            ("g", 5620),
        ] {
            snapshot.map_data.push(location(name, cases));
        }
        let areas = high_risk_areas(&snapshot, 5);
        assert_eq!(areas.len(), 5);
        assert!(areas.windows(2).all(|w| w[0].cases >= w[1].cases));
        assert!(areas.iter().all(|a| a.cases > 0));
        let levels: Vec<(u64, RiskLevel)> = areas.iter().map(|a| (a.cases, a.risk_level)).collect();
        assert_eq!(
            levels,
            vec![
                (5620, RiskLevel::High),
                (2001, RiskLevel::High),
                (2000, RiskLevel::Medium),
                (1001, RiskLevel::Medium),
                (1000, RiskLevel::Low),
            ]
        );
        assert_eq!(areas[0].province, "Unknown");
    }

    #[test]
    fn high_risk_drops_zero_case_entries() {
        let mut snapshot = empty_snapshot();
        snapshot.map_data.push(location("a", 0));
        snapshot.map_data.push(location("b", 12));
        let areas = high_risk_areas(&snapshot, 5);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].risk_level, RiskLevel::Low);
    }

    #[test]
    fn surveillance_percentages_sum_to_100() {
        let mut snapshot = empty_snapshot();
        snapshot.national_summary.insert("malaria".into(), 62096);
        snapshot.national_summary.insert("dengue".into(), 76);
        snapshot.national_summary.insert("typhoid".into(), 4120);
        snapshot.national_summary.insert("polio".into(), 0);
        let surveillance = disease_surveillance(&snapshot);
        assert_eq!(surveillance.total_cases, 66292);
        assert_eq!(surveillance.active_diseases, 4);
        assert_eq!(surveillance.disease_breakdown.len(), 3);
        assert_eq!(surveillance.disease_breakdown[0].disease, "Malaria");
        let sum: f64 = surveillance
            .disease_breakdown
            .iter()
            .map(|d| d.percentage)
            .sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn surveillance_total_saturates_instead_of_overflowing() {
        let mut snapshot = empty_snapshot();
        snapshot.national_summary.insert("malaria".into(), u64::MAX);
        snapshot.national_summary.insert("dengue".into(), u64::MAX);
        let surveillance = disease_surveillance(&snapshot);
        assert_eq!(surveillance.total_cases, u64::MAX);
        assert_eq!(surveillance.disease_breakdown.len(), 2);
        assert!(surveillance
            .disease_breakdown
            .iter()
            .all(|d| d.percentage.is_finite() && d.percentage <= 100.0));
    }

    #[test]
    fn epidemic_alert_follows_threshold() {
        let mut snapshot = empty_snapshot();
        snapshot.dashboard_stats.malaria_cases = 62096;
        snapshot.dashboard_stats.vaccination_coverage = 80.0;
        let fired = alerts(&snapshot);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].priority, Priority::High);
        assert_eq!(fired[0].case_count, Some(62096));
        assert!(fired[0].message.contains("epidemic"));

        snapshot.dashboard_stats.malaria_cases = 40000;
        let quiet = alerts(&snapshot);
        assert!(quiet.iter().all(|a| !a.message.contains("epidemic")));
    }

    #[test]
    fn alert_order_is_fixed_with_advisory_last() {
        let mut snapshot = empty_snapshot();
        snapshot.dashboard_stats.malaria_cases = 60000;
        snapshot.dashboard_stats.dengue_cases = 76;
        snapshot.dashboard_stats.vaccination_coverage = 65.0;
        let fired = alerts(&snapshot);
        let priorities: Vec<Priority> = fired.iter().map(|a| a.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::Medium, Priority::Medium, Priority::High]
        );
        assert!(fired[1].message.starts_with("Dengue"));
        assert!(fired[2].message.starts_with("Vaccination"));
        assert!(fired[3].message.contains("hotspots"));
        assert!(fired.iter().all(|a| a.date == "2024-08-01 06:00"));
    }
}
