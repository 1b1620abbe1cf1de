//! Recommendations and outlook scenarios from a chat-completions model.
//!
//! Every public call returns something usable: without a key, or when the
//! request or its JSON fails, the static fallback of the same shape is
//! returned instead.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::NarrativeConfig;
use crate::derive;
use crate::error::{DataError, Result};
use crate::types::Snapshot;

pub const SCENARIO_COUNT: usize = 3;

const RECOMMENDATION_ROLE: &str = "You are a public health expert specializing in disease surveillance and health crisis management for Pakistan.";
const SCENARIO_ROLE: &str = "You are a public health expert specializing in epidemic modeling and scenario planning for Pakistan.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAction {
    pub action: String,
    pub priority: String,
    pub timeline: String,
    pub resources_needed: String,
    #[serde(default)]
    pub target_areas: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: String,
    pub key_concerns: Vec<String>,
    pub potential_outcomes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreventionStrategy {
    pub strategy: String,
    pub target_population: String,
    pub expected_impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub priority_actions: Vec<PriorityAction>,
    pub risk_assessment: RiskAssessment,
    pub prevention_strategies: Vec<PreventionStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub probability: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_factors: Vec<String>,
    /// Projection per measure, e.g. "malaria_cases" -> "~36,000".
    #[serde(default)]
    pub expected_outcomes: BTreeMap<String, String>,
    #[serde(default)]
    pub interventions_needed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenarios: Vec<Scenario>,
}

/// Plain-text digest of a snapshot, used as model context.
pub fn data_summary(snapshot: &Snapshot) -> String {
    let stats = &snapshot.dashboard_stats;
    let alert_count = snapshot.alerts.len() + derive::alerts(snapshot).len();
    format!(
        "Current Cases:\n\
         - Malaria: {} cases ({:+.1}% change)\n\
         - Dengue: {} cases ({:+.1}% change)\n\
         - Respiratory: {} cases ({:+.1}% change)\n\
         - Vaccination Coverage: {:.1}%\n\
         \n\
         Active Alerts: {}\n\
         Data Sources: {} disease categories tracked\n\
         Last Updated: {}\n",
        stats.malaria_cases,
        stats.malaria_trend,
        stats.dengue_cases,
        stats.dengue_trend,
        stats.respiratory_cases,
        stats.respiratory_trend,
        stats.vaccination_coverage,
        alert_count,
        snapshot.disease_trends.len(),
        snapshot.last_updated.format("%Y-%m-%dT%H:%M:%S"),
    )
}

fn recommendation_prompt(summary: &str) -> String {
    format!(
        "Based on the following health data for Pakistan, provide actionable recommendations.\n\n\
         Current Health Data:\n{}\n\
         Respond with a JSON object with the keys \"priority_actions\" (list of objects with \
         \"action\", \"priority\" (high/medium/low), \"timeline\" (immediate/short-term/long-term), \
         \"resources_needed\"), \"risk_assessment\" (object with \"overall_risk\", \"key_concerns\" \
         list, \"potential_outcomes\") and \"prevention_strategies\" (list of objects with \
         \"strategy\", \"target_population\", \"expected_impact\").",
        summary
    )
}

fn scenario_prompt(summary: &str) -> String {
    format!(
        "Based on the following health data for Pakistan, simulate three different scenarios \
         for the next 3 months: best case, most likely and worst case.\n\n\
         Current Health Data:\n{}\n\
         Respond with a JSON object {{\"scenarios\": [...]}} holding exactly three objects, each \
         with \"name\", \"probability\" (percentage), \"description\", \"key_factors\" list, \
         \"expected_outcomes\" (object with \"malaria_cases\", \"dengue_cases\", \
         \"mortality_rate\" as strings) and \"interventions_needed\" list.",
        summary
    )
}

pub fn parse_recommendations(content: &str) -> Result<Recommendations> {
    parse_json(content)
}

/// Parse a scenario answer, which must hold exactly three scenarios.
pub fn parse_scenarios(content: &str) -> Result<ScenarioReport> {
    let report: ScenarioReport = parse_json(content)?;
    if report.scenarios.len() != SCENARIO_COUNT {
        return Err(DataError::ResponseParse(format!(
            "expected {} scenarios, got {}",
            SCENARIO_COUNT,
            report.scenarios.len()
        )));
    }
    Ok(report)
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|e| DataError::ResponseParse(e.to_string()))
}

pub struct NarrativeClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl NarrativeClient {
    pub fn new(config: &NarrativeConfig) -> Result<Self> {
        if config.api_key.is_none() {
            log::warn!("OpenAI API key not found, narrative features will use static content");
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(NarrativeClient {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub async fn recommendations(&self, snapshot: &Snapshot) -> Recommendations {
        let prompt = recommendation_prompt(&data_summary(snapshot));
        let answer = self.complete(RECOMMENDATION_ROLE, &prompt).await;
        match answer.and_then(|content| parse_recommendations(&content)) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                log::error!("Error generating recommendations: {}", e);
                fallback_recommendations()
            }
        }
    }

    pub async fn scenarios(&self, snapshot: &Snapshot) -> ScenarioReport {
        let prompt = scenario_prompt(&data_summary(snapshot));
        let answer = self.complete(SCENARIO_ROLE, &prompt).await;
        match answer.and_then(|content| parse_scenarios(&content)) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Error simulating scenarios: {}", e);
                fallback_scenarios()
            }
        }
    }

    /// One chat-completions round trip; returns the message content.
    async fn complete(&self, role: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| DataError::ResponseParse("no API key configured".to_string()))?;
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": role},
                {"role": "user", "content": prompt}
            ],
            "response_format": {"type": "json_object"},
            "temperature": 0.7
        });
        let response: serde_json::Value = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DataError::ResponseParse("no content in completion".to_string()))
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn fallback_recommendations() -> Recommendations {
    let action = |action: &str, priority: &str, timeline: &str, resources: &str, areas: &[&str]| {
        PriorityAction {
            action: action.to_string(),
            priority: priority.to_string(),
            timeline: timeline.to_string(),
            resources_needed: resources.to_string(),
            target_areas: strings(areas),
        }
    };
    Recommendations {
        priority_actions: vec![
            action(
                "Urgent malaria control in highest-case districts",
                "high",
                "immediate",
                "Emergency response teams, antimalarial drugs, rapid diagnostic tests",
                &["Larkana", "Khairpur", "Sanghar", "Dadu", "Kamber"],
            ),
            action(
                "Enhanced vector control in Sindh province",
                "high",
                "immediate",
                "Vector control teams, larvicides, insecticides",
                &["Sindh Province", "High-case districts"],
            ),
            action(
                "Strengthen preventive measures in rural areas",
                "medium",
                "short-term",
                "Public health campaigns, community health workers",
                &["Rural Sindh", "Balochistan", "KP rural districts"],
            ),
            action(
                "Improve diagnostic capacity in affected areas",
                "medium",
                "short-term",
                "Laboratory equipment, trained staff",
                &["Larkana", "Khairpur", "Sanghar"],
            ),
        ],
        risk_assessment: RiskAssessment {
            overall_risk: "high".to_string(),
            key_concerns: strings(&[
                "Malaria surge in Sindh",
                "Vector breeding conditions",
                "Resource strain",
            ]),
            potential_outcomes: "Immediate intervention required to prevent further spread"
                .to_string(),
        },
        prevention_strategies: vec![
            PreventionStrategy {
                strategy: "Community-based vector control".to_string(),
                target_population: "Rural communities in high-case areas".to_string(),
                expected_impact: "30-50% reduction in transmission".to_string(),
            },
            PreventionStrategy {
                strategy: "Early detection and treatment".to_string(),
                target_population: "Health facilities in affected districts".to_string(),
                expected_impact: "Reduced case fatality rates".to_string(),
            },
        ],
    }
}

pub fn fallback_scenarios() -> ScenarioReport {
    let outcomes = |malaria: &str, dengue: &str, mortality: &str| {
        BTreeMap::from([
            ("malaria_cases".to_string(), malaria.to_string()),
            ("dengue_cases".to_string(), dengue.to_string()),
            ("mortality_rate".to_string(), mortality.to_string()),
        ])
    };
    ScenarioReport {
        scenarios: vec![
            Scenario {
                name: "Optimized Intervention Success".to_string(),
                probability: "32%".to_string(),
                description: "Targeted interventions achieve maximum impact with strategic \
                              resource allocation in the top 5 high-risk districts"
                    .to_string(),
                key_factors: strings(&[
                    "Immediate vector control in Larkana (5,620 cases)",
                    "Early warning system implementation",
                    "Weather-pattern based intervention timing",
                ]),
                expected_outcomes: outcomes(
                    "42% reduction (from 62,096 to ~36,000)",
                    "58% reduction (from 76 to ~32)",
                    "28% decrease in high-risk areas",
                ),
                interventions_needed: strings(&[
                    "Vector control deployment",
                    "Diagnostic monitoring",
                    "Community engagement",
                ]),
            },
            Scenario {
                name: "Adaptive Response Scenario".to_string(),
                probability: "46%".to_string(),
                description: "Continuous monitoring enables response adjustments based on \
                              disease patterns and environmental factors"
                    .to_string(),
                key_factors: strings(&[
                    "Seasonal disease pattern recognition",
                    "Cross-district transmission modeling",
                    "Climate correlation (temperature, humidity, cases)",
                ]),
                expected_outcomes: outcomes(
                    "18% reduction (from 62,096 to ~51,000)",
                    "26% reduction (from 76 to ~56)",
                    "12% decrease overall",
                ),
                interventions_needed: strings(&[
                    "Dynamic surveillance deployment",
                    "Case management protocols",
                    "Inter-district coordination",
                ]),
            },
            Scenario {
                name: "Crisis Escalation Alert".to_string(),
                probability: "22%".to_string(),
                description: "System overload requiring emergency protocols and external \
                              support activation"
                    .to_string(),
                key_factors: strings(&[
                    "Multiple outbreak convergence",
                    "Healthcare capacity breach",
                    "Cross-border transmission",
                ]),
                expected_outcomes: outcomes(
                    "38% increase (from 62,096 to ~85,000)",
                    "165% increase (from 76 to ~201)",
                    "45% increase in affected regions",
                ),
                interventions_needed: strings(&[
                    "Emergency response protocols",
                    "External medical support",
                    "Mass treatment campaigns",
                ]),
            },
        ],
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::fallback;
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        let now = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let mut snapshot = fallback::minimal(now);
        snapshot.dashboard_stats.malaria_cases = 62096;
        snapshot.dashboard_stats.malaria_trend = -3.4;
        snapshot.dashboard_stats.vaccination_coverage = 79.54;
        snapshot
    }

    #[test]
    fn summary_shows_signed_trends() {
        let text = data_summary(&snapshot());
        assert!(text.contains("- Malaria: 62096 cases (-3.4% change)"));
        assert!(text.contains("- Dengue: 0 cases (+0.0% change)"));
        assert!(text.contains("Vaccination Coverage: 79.5%"));
        assert!(text.contains("Last Updated: 2025-03-01T09:30:00"));
    }

    #[test]
    fn parses_recommendations() {
        let content = r#"{
            "priority_actions": [{"action": "Spray", "priority": "high",
                "timeline": "immediate", "resources_needed": "Teams"}],
            "risk_assessment": {"overall_risk": "medium", "key_concerns": ["rain"],
                "potential_outcomes": "Contained"},
            "prevention_strategies": []
        }"#;
        let parsed = parse_recommendations(content).unwrap();
        assert_eq!(parsed.priority_actions[0].action, "Spray");
        assert!(parsed.priority_actions[0].target_areas.is_empty());
        assert_eq!(parsed.risk_assessment.overall_risk, "medium");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_recommendations("not json"),
            Err(DataError::ResponseParse(_))
        ));
    }

    #[test]
    fn scenario_count_must_be_three() {
        let two = r#"{"scenarios": [
            {"name": "a", "probability": "50%"},
            {"name": "b", "probability": "50%"}
        ]}"#;
        assert!(parse_scenarios(two).is_err());
        let three = r#"{"scenarios": [
            {"name": "a", "probability": "30%"},
            {"name": "b", "probability": "50%",
             "expected_outcomes": {"malaria_cases": "~50,000"}},
            {"name": "c", "probability": "20%"}
        ]}"#;
        let report = parse_scenarios(three).unwrap();
        assert_eq!(report.scenarios[1].expected_outcomes["malaria_cases"], "~50,000");
    }

    #[test]
    fn fallbacks_have_expected_shape() {
        assert_eq!(fallback_scenarios().scenarios.len(), SCENARIO_COUNT);
        let recommendations = fallback_recommendations();
        assert_eq!(recommendations.priority_actions.len(), 4);
        assert_eq!(recommendations.risk_assessment.overall_risk, "high");
    }

    #[tokio::test]
    async fn missing_key_falls_back() {
        let client = NarrativeClient::new(&Config::default().narrative).unwrap();
        let snapshot = snapshot();
        assert_eq!(client.recommendations(&snapshot).await, fallback_recommendations());
        assert_eq!(client.scenarios(&snapshot).await, fallback_scenarios());
    }
}
