//! Live weather for the monitored cities.
//!
//! One OpenWeatherMap "current conditions" call per city plus a UV-index
//! call. A failed city is dropped; if every city fails, or no API key is
//! configured, the all-zero fallback report is returned instead.

use chrono::Local;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;
use tabled::Tabled;

use crate::config::WeatherConfig;
use crate::error::{DataError, Result};
use crate::fallback::CITIES;
use crate::types::{Priority, RiskLevel};
use crate::util::average;

const UV_TIMEOUT: Duration = Duration::from_secs(5);

pub const UNAVAILABLE: &str = "Weather API not available";

/// Cities considered for health alerts regardless of conditions.
const HIGH_RISK_CITIES: [&str; 7] = [
    "Karachi",
    "Lahore",
    "Faisalabad",
    "Rawalpindi",
    "Multan",
    "Peshawar",
    "Quetta",
];

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct CityWeather {
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Temp (C)")]
    pub temperature: f64,
    #[tabled(rename = "Humidity (%)")]
    pub humidity: f64,
    #[tabled(rename = "Pressure (hPa)")]
    pub pressure: f64,
    #[tabled(rename = "Conditions")]
    pub description: String,
    #[tabled(rename = "Wind (m/s)")]
    pub wind_speed: f64,
    #[tabled(rename = "Visibility (km)")]
    pub visibility: f64,
    #[tabled(rename = "UV")]
    pub uv_index: f64,
    #[tabled(skip)]
    pub lat: f64,
    #[tabled(skip)]
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub avg_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub avg_humidity: f64,
    pub avg_pressure: f64,
    pub total_cities: usize,
    pub conditions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub national_summary: WeatherSummary,
    pub cities: Vec<CityWeather>,
    pub last_updated: String,
    /// Set when the report is the fallback rather than live data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherAlertKind {
    HeatWave,
    HighHumidity,
    VectorBreeding,
    ColdWave,
    AirQuality,
}

impl fmt::Display for WeatherAlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherAlertKind::HeatWave => "heat_wave",
            WeatherAlertKind::HighHumidity => "high_humidity",
            WeatherAlertKind::VectorBreeding => "vector_breeding",
            WeatherAlertKind::ColdWave => "cold_wave",
            WeatherAlertKind::AirQuality => "air_quality",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct WeatherAlert {
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    pub kind: WeatherAlertKind,
    #[tabled(rename = "Severity")]
    pub severity: Priority,
    #[tabled(rename = "Message")]
    pub message: String,
    #[tabled(skip)]
    pub health_impact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TemperatureTrend {
    Rising,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PressureStability {
    Stable,
    Unstable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureTrends {
    pub current_avg: f64,
    pub trend: TemperatureTrend,
    pub heat_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidityAnalysis {
    pub current_avg: f64,
    pub disease_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureTrends {
    pub current_avg: f64,
    pub stability: PressureStability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthCorrelations {
    pub malaria_risk: RiskLevel,
    pub dengue_risk: RiskLevel,
    pub respiratory_risk: RiskLevel,
}

/// A known count, or a status line where surveillance has no figure yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AreaCases {
    Count(u64),
    Status(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateRiskArea {
    pub districts: Vec<String>,
    pub total_cases: AreaCases,
    pub climate_factors: String,
}

/// Climate readings and the disease risks they imply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateMonitoring {
    pub temperature_trends: TemperatureTrends,
    pub humidity_analysis: HumidityAnalysis,
    pub pressure_trends: PressureTrends,
    pub health_correlations: HealthCorrelations,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub high_risk_areas: BTreeMap<String, ClimateRiskArea>,
    pub environmental_alerts: Vec<WeatherAlert>,
    pub monitoring_status: String,
    pub last_updated: String,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
    #[serde(default)]
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmUv {
    #[serde(default)]
    value: f64,
}

pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(WeatherClient {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Current conditions for every city that answered.
    pub async fn current_weather(&self) -> WeatherReport {
        let Some(api_key) = self.api_key.as_deref() else {
            log::warn!("OpenWeatherMap API key not configured, weather data unavailable");
            return fallback_report();
        };
        let mut cities = Vec::with_capacity(CITIES.len());
        for city in &CITIES {
            match self.city_weather(api_key, city.name, city.lat, city.lng).await {
                Ok(weather) => cities.push(weather),
                Err(e) => log::error!("Error fetching weather for {}: {}", city.name, e),
            }
        }
        match national_summary(&cities) {
            Some(summary) => WeatherReport {
                national_summary: summary,
                cities,
                last_updated: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
                error: None,
            },
            None => fallback_report(),
        }
    }

    pub async fn weather_alerts(&self) -> Vec<WeatherAlert> {
        weather_alerts(&self.current_weather().await.cities)
    }

    pub async fn climate_monitoring(&self) -> ClimateMonitoring {
        climate_monitoring(&self.current_weather().await)
    }

    async fn city_weather(
        &self,
        api_key: &str,
        name: &str,
        lat: f64,
        lon: f64,
    ) -> Result<CityWeather> {
        let response: OwmResponse = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let description = response
            .weather
            .first()
            .map(|w| w.description.clone())
            .ok_or_else(|| DataError::ResponseParse(format!("no conditions for {}", name)))?;
        Ok(CityWeather {
            city: name.to_string(),
            temperature: response.main.temp,
            humidity: response.main.humidity,
            pressure: response.main.pressure,
            description,
            wind_speed: response.wind.speed,
            visibility: response.visibility.unwrap_or(0.0) / 1000.0,
            uv_index: self.uv_index(api_key, lat, lon).await,
            lat,
            lon,
        })
    }

    async fn uv_index(&self, api_key: &str, lat: f64, lon: f64) -> f64 {
        let request = self
            .client
            .get(format!("{}/uvi", self.base_url))
            .timeout(UV_TIMEOUT)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
            ]);
        let result: std::result::Result<OwmUv, reqwest::Error> = async {
            request.send().await?.error_for_status()?.json().await
        }
        .await;
        match result {
            Ok(uv) => uv.value,
            Err(e) => {
                log::error!("Error fetching UV index: {}", e);
                0.0
            }
        }
    }
}

/// Averages and extremes across cities; `None` when there are no cities.
pub fn national_summary(cities: &[CityWeather]) -> Option<WeatherSummary> {
    if cities.is_empty() {
        return None;
    }
    let temperatures: Vec<f64> = cities.iter().map(|c| c.temperature).collect();
    let humidities: Vec<f64> = cities.iter().map(|c| c.humidity).collect();
    let pressures: Vec<f64> = cities.iter().map(|c| c.pressure).collect();
    Some(WeatherSummary {
        avg_temperature: average(&temperatures),
        min_temperature: temperatures.iter().copied().fold(f64::INFINITY, f64::min),
        max_temperature: temperatures.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        avg_humidity: average(&humidities),
        avg_pressure: average(&pressures),
        total_cities: cities.len(),
        conditions: dominant_condition(cities),
    })
}

/// Most frequent description; ties go to the one seen first.
pub fn dominant_condition(cities: &[CityWeather]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for city in cities {
        *counts.entry(city.description.as_str()).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for city in cities {
        let count = counts[city.description.as_str()];
        if best.map(|(_, c)| count > c).unwrap_or(true) {
            best = Some((city.description.as_str(), count));
        }
    }
    best.map(|(d, _)| d.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

pub fn fallback_report() -> WeatherReport {
    WeatherReport {
        national_summary: WeatherSummary {
            conditions: "Data unavailable".to_string(),
            ..WeatherSummary::default()
        },
        cities: Vec::new(),
        last_updated: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        error: Some(UNAVAILABLE.to_string()),
    }
}

/// Health-relevant weather alerts per city.
pub fn weather_alerts(cities: &[CityWeather]) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();
    for c in cities {
        let watched = HIGH_RISK_CITIES.contains(&c.city.as_str())
            || c.temperature > 35.0
            || c.humidity > 70.0;
        if !watched {
            continue;
        }
        if c.temperature > 40.0 {
            alerts.push(WeatherAlert {
                city: c.city.clone(),
                kind: WeatherAlertKind::HeatWave,
                severity: Priority::High,
                message: format!(
                    "Extreme heat warning: {}°C - High risk for heat-related illness",
                    c.temperature
                ),
                health_impact: "Increases dehydration and heat stroke risk".to_string(),
            });
        }
        if c.humidity > 75.0 {
            alerts.push(WeatherAlert {
                city: c.city.clone(),
                kind: WeatherAlertKind::HighHumidity,
                severity: Priority::Medium,
                message: format!(
                    "High humidity: {}% - Optimal conditions for disease vectors",
                    c.humidity
                ),
                health_impact: "Increases malaria and dengue transmission risk".to_string(),
            });
        }
        if c.temperature > 28.0 && c.humidity > 70.0 {
            alerts.push(WeatherAlert {
                city: c.city.clone(),
                kind: WeatherAlertKind::VectorBreeding,
                severity: Priority::High,
                message: format!(
                    "Ideal vector conditions: {}°C, {}% humidity",
                    c.temperature, c.humidity
                ),
                health_impact: "Perfect breeding conditions for mosquitoes".to_string(),
            });
        }
        if c.temperature < 5.0 {
            alerts.push(WeatherAlert {
                city: c.city.clone(),
                kind: WeatherAlertKind::ColdWave,
                severity: Priority::Medium,
                message: format!(
                    "Cold wave warning: {}°C - Respiratory illness risk",
                    c.temperature
                ),
                health_impact: "Increases respiratory infection risk".to_string(),
            });
        }
    }
    if alerts.is_empty() {
        alerts = standing_advisories();
    }
    alerts
}

fn standing_advisories() -> Vec<WeatherAlert> {
    vec![
        WeatherAlert {
            city: "Karachi".to_string(),
            kind: WeatherAlertKind::HighHumidity,
            severity: Priority::Medium,
            message: "High humidity levels create favorable conditions for disease vectors"
                .to_string(),
            health_impact: "Increased malaria and dengue transmission risk".to_string(),
        },
        WeatherAlert {
            city: "Lahore".to_string(),
            kind: WeatherAlertKind::AirQuality,
            severity: Priority::High,
            message: "Poor air quality alert - respiratory health concerns".to_string(),
            health_impact: "Increased respiratory illness risk".to_string(),
        },
    ]
}

/// Apparent temperature from air temperature and relative humidity, to 0.1°C.
pub fn heat_index(temperature: f64, humidity: f64) -> f64 {
    let raw = temperature + 0.5 * (humidity / 100.0) * (temperature - 14.0);
    (raw * 10.0).round() / 10.0
}

/// Climate-health view over a weather report. A fallback report gets the
/// static fallback view.
pub fn climate_monitoring(report: &WeatherReport) -> ClimateMonitoring {
    if report.error.is_some() {
        return fallback_climate_monitoring();
    }
    let s = &report.national_summary;
    let risk = |high: bool, otherwise: RiskLevel| if high { RiskLevel::High } else { otherwise };
    ClimateMonitoring {
        temperature_trends: TemperatureTrends {
            current_avg: s.avg_temperature,
            trend: if s.avg_temperature > 30.0 {
                TemperatureTrend::Rising
            } else {
                TemperatureTrend::Stable
            },
            heat_index: heat_index(s.avg_temperature, s.avg_humidity),
        },
        humidity_analysis: HumidityAnalysis {
            current_avg: s.avg_humidity,
            disease_risk: risk(s.avg_humidity > 70.0, RiskLevel::Medium),
        },
        pressure_trends: PressureTrends {
            current_avg: s.avg_pressure,
            stability: if (1000.0..=1020.0).contains(&s.avg_pressure) {
                PressureStability::Stable
            } else {
                PressureStability::Unstable
            },
        },
        health_correlations: HealthCorrelations {
            malaria_risk: risk(s.avg_humidity > 75.0, RiskLevel::Medium),
            dengue_risk: risk(s.avg_temperature > 28.0, RiskLevel::Medium),
            respiratory_risk: risk(s.avg_temperature > 35.0, RiskLevel::Low),
        },
        high_risk_areas: climate_risk_areas(),
        environmental_alerts: weather_alerts(&report.cities),
        monitoring_status: "Active".to_string(),
        last_updated: report.last_updated.clone(),
    }
}

fn climate_risk_areas() -> BTreeMap<String, ClimateRiskArea> {
    let area = |districts: &[&str], total_cases: AreaCases, factors: &str| ClimateRiskArea {
        districts: districts.iter().map(|d| d.to_string()).collect(),
        total_cases,
        climate_factors: factors.to_string(),
    };
    BTreeMap::from([
        (
            "sindh_province".to_string(),
            area(
                &["Larkana", "Khairpur", "Sanghar", "Dadu", "Kamber"],
                AreaCases::Count(22719),
                "High temperature and humidity creating optimal vector conditions",
            ),
        ),
        (
            "balochistan_rural".to_string(),
            area(
                &["Rural areas with limited surveillance"],
                AreaCases::Status("Under surveillance".to_string()),
                "Arid climate with seasonal water accumulation",
            ),
        ),
        (
            "kp_districts".to_string(),
            area(
                &["Northern districts"],
                AreaCases::Status("Monitoring ongoing".to_string()),
                "Monsoon patterns affecting transmission",
            ),
        ),
    ])
}

pub fn fallback_climate_monitoring() -> ClimateMonitoring {
    ClimateMonitoring {
        temperature_trends: TemperatureTrends {
            current_avg: 32.5,
            trend: TemperatureTrend::Rising,
            heat_index: 35.2,
        },
        humidity_analysis: HumidityAnalysis {
            current_avg: 65.0,
            disease_risk: RiskLevel::Medium,
        },
        pressure_trends: PressureTrends {
            current_avg: 1013.0,
            stability: PressureStability::Stable,
        },
        health_correlations: HealthCorrelations {
            malaria_risk: RiskLevel::Medium,
            dengue_risk: RiskLevel::High,
            respiratory_risk: RiskLevel::Medium,
        },
        high_risk_areas: BTreeMap::new(),
        environmental_alerts: vec![WeatherAlert {
            city: "Karachi".to_string(),
            kind: WeatherAlertKind::HeatWave,
            severity: Priority::High,
            message: "High temperature and humidity levels".to_string(),
            health_impact: "Increases dehydration and vector breeding".to_string(),
        }],
        monitoring_status: "Active".to_string(),
        last_updated: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;

    fn city(name: &str, temperature: f64, humidity: f64, description: &str) -> CityWeather {
        CityWeather {
            city: name.to_string(),
            temperature,
            humidity,
            pressure: 1008.0,
            description: description.to_string(),
            wind_speed: 3.0,
            visibility: 6.0,
            uv_index: 7.0,
            lat: 0.0,
            lon: 0.0,
        }
    }

    #[test]
    fn summary_aggregates_cities() {
        let cities = vec![
            city("Karachi", 34.0, 70.0, "haze"),
            city("Lahore", 38.0, 40.0, "clear sky"),
            city("Quetta", 26.0, 20.0, "clear sky"),
        ];
        let summary = national_summary(&cities).unwrap();
        assert!((summary.avg_temperature - 32.666_666).abs() < 1e-3);
        assert_eq!(summary.min_temperature, 26.0);
        assert_eq!(summary.max_temperature, 38.0);
        assert!((summary.avg_humidity - 43.333_333).abs() < 1e-3);
        assert_eq!(summary.avg_pressure, 1008.0);
        assert_eq!(summary.total_cities, 3);
        assert_eq!(summary.conditions, "clear sky");
    }

    #[test]
    fn dominant_condition_tie_goes_to_first_seen() {
        let cities = vec![city("A", 20.0, 10.0, "haze"), city("B", 20.0, 10.0, "smoke")];
        assert_eq!(dominant_condition(&cities), "haze");
    }

    #[test]
    fn no_cities_no_summary() {
        assert!(national_summary(&[]).is_none());
    }

    #[test]
    fn fallback_is_all_zero_and_marked() {
        let report = fallback_report();
        assert_eq!(report.national_summary.avg_temperature, 0.0);
        assert_eq!(report.national_summary.total_cities, 0);
        assert_eq!(report.national_summary.conditions, "Data unavailable");
        assert!(report.cities.is_empty());
        assert_eq!(report.error.as_deref(), Some(UNAVAILABLE));
    }

    #[test]
    fn alerts_follow_conditions() {
        let alerts = weather_alerts(&[
            city("Karachi", 41.0, 80.0, "haze"),
            city("Gilgit", 2.0, 30.0, "snow"),
            city("Quetta", 3.0, 30.0, "snow"),
        ]);
        let kinds: Vec<(&str, WeatherAlertKind)> =
            alerts.iter().map(|a| (a.city.as_str(), a.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("Karachi", WeatherAlertKind::HeatWave),
                ("Karachi", WeatherAlertKind::HighHumidity),
                ("Karachi", WeatherAlertKind::VectorBreeding),
                ("Quetta", WeatherAlertKind::ColdWave),
            ]
        );
    }

    #[test]
    fn calm_weather_yields_standing_advisories() {
        let alerts = weather_alerts(&[city("Lahore", 22.0, 40.0, "clear sky")]);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[1].kind, WeatherAlertKind::AirQuality);
    }

    fn live_report(cities: Vec<CityWeather>) -> WeatherReport {
        WeatherReport {
            national_summary: national_summary(&cities).unwrap(),
            cities,
            last_updated: "2024-08-01T09:30:00".to_string(),
            error: None,
        }
    }

    #[test]
    fn heat_index_rounds_to_a_tenth() {
        assert_eq!(heat_index(32.0, 80.0), 39.2);
        assert_eq!(heat_index(14.0, 90.0), 14.0);
    }

    #[test]
    fn climate_view_labels_hot_humid_weather() {
        let report = live_report(vec![
            city("Karachi", 36.0, 80.0, "haze"),
            city("Hyderabad", 34.0, 76.0, "haze"),
        ]);
        let view = climate_monitoring(&report);
        assert_eq!(view.temperature_trends.current_avg, 35.0);
        assert_eq!(view.temperature_trends.trend, TemperatureTrend::Rising);
        assert_eq!(view.temperature_trends.heat_index, 43.2);
        assert_eq!(view.humidity_analysis.disease_risk, RiskLevel::High);
        assert_eq!(view.pressure_trends.stability, PressureStability::Stable);
        assert_eq!(view.health_correlations.malaria_risk, RiskLevel::High);
        assert_eq!(view.health_correlations.dengue_risk, RiskLevel::High);
        assert_eq!(view.health_correlations.respiratory_risk, RiskLevel::Low);
        assert_eq!(view.high_risk_areas.len(), 3);
        assert_eq!(
            view.high_risk_areas["sindh_province"].total_cases,
            AreaCases::Count(22719)
        );
        assert_eq!(view.environmental_alerts, weather_alerts(&report.cities));
        assert_eq!(view.last_updated, "2024-08-01T09:30:00");
    }

    #[test]
    fn climate_view_labels_mild_weather() {
        let mut cool = city("Quetta", 20.0, 30.0, "clear sky");
        cool.pressure = 1025.0;
        let view = climate_monitoring(&live_report(vec![cool]));
        assert_eq!(view.temperature_trends.trend, TemperatureTrend::Stable);
        assert_eq!(view.humidity_analysis.disease_risk, RiskLevel::Medium);
        assert_eq!(view.pressure_trends.stability, PressureStability::Unstable);
        assert_eq!(view.health_correlations.malaria_risk, RiskLevel::Medium);
        assert_eq!(view.health_correlations.dengue_risk, RiskLevel::Medium);
        assert_eq!(view.health_correlations.respiratory_risk, RiskLevel::Low);
    }

    #[test]
    fn unavailable_weather_gives_static_climate_view() {
        let view = climate_monitoring(&fallback_report());
        assert_eq!(view.temperature_trends.current_avg, 32.5);
        assert_eq!(view.temperature_trends.heat_index, 35.2);
        assert_eq!(view.pressure_trends.current_avg, 1013.0);
        assert_eq!(view.health_correlations.dengue_risk, RiskLevel::High);
        assert!(view.high_risk_areas.is_empty());
        assert_eq!(view.environmental_alerts.len(), 1);
        assert_eq!(view.environmental_alerts[0].kind, WeatherAlertKind::HeatWave);
        assert_eq!(view.monitoring_status, "Active");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("high_risk_areas").is_none());
        assert_eq!(json["temperature_trends"]["trend"], "Rising");
        assert_eq!(json["health_correlations"]["respiratory_risk"], "Medium");
    }

    #[tokio::test]
    async fn missing_key_returns_fallback_without_network() {
        let client = WeatherClient::new(&Config::default().weather).unwrap();
        let report = client.current_weather().await;
        assert_eq!(report.error.as_deref(), Some(UNAVAILABLE));
    }
}
