use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub extensions: Vec<String>,
    /// Fixes the random source used for jitter and synthetic data.
    pub seed: Option<u64>,
    /// Background refresh period; `None` disables the scheduler.
    pub refresh_interval: Option<Duration>,
    pub weather: WeatherConfig,
    pub narrative: NarrativeConfig,
    pub log_level: log::LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        let timeout = Duration::from_secs(10);
        Config {
            data_dir: PathBuf::from("data"),
            extensions: vec!["xlsx".to_string(), "xls".to_string()],
            seed: None,
            refresh_interval: Some(Duration::from_secs(2 * 60 * 60)),
            weather: WeatherConfig {
                api_key: None,
                base_url: DEFAULT_WEATHER_URL.to_string(),
                timeout,
            },
            narrative: NarrativeConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_URL.to_string(),
                model: DEFAULT_OPENAI_MODEL.to_string(),
                timeout: Duration::from_secs(30),
            },
            log_level: log::LevelFilter::Info,
        }
    }
}

impl Config {
    /// Read the process environment, after loading `.env` if there is one.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Config::default();
        let timeout = parsed("HTTP_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.weather.timeout);
        Config {
            data_dir: non_empty("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            extensions: non_empty("DATA_EXTENSIONS")
                .map(|v| split_list(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.extensions),
            seed: parsed("HEALTH_SEED"),
            refresh_interval: match parsed::<u64>("REFRESH_INTERVAL_SECS") {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.refresh_interval,
            },
            weather: WeatherConfig {
                api_key: non_empty("OPENWEATHER_API_KEY"),
                base_url: non_empty("OPENWEATHER_BASE_URL").unwrap_or(defaults.weather.base_url),
                timeout,
            },
            narrative: NarrativeConfig {
                api_key: non_empty("OPENAI_API_KEY"),
                base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.narrative.base_url),
                model: non_empty("OPENAI_MODEL").unwrap_or(defaults.narrative.model),
                timeout: defaults.narrative.timeout.max(timeout),
            },
            log_level: parsed("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = non_empty(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

/// "xlsx, .XLS" -> ["xlsx", "xls"]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
