use hydrotemp_core::schema::{
    DEFAULT_SAMPLE_DATE, DEFAULT_TURBIDITY, DEFAULT_WEATHER_KELVIN, DEFAULT_WEATHER_TIME,
};
use hydrotemp_core::{SessionSchema, WaterQualitySchema, WeatherSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WEATHER_PATH: &str = "weather.csv";
pub const DEFAULT_WATER_QUALITY_PATH: &str =
    "Drinking_Water_Quality_Distribution_Monitoring_Data_20250313.csv";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub weather_path: Option<String>,
    pub water_quality_path: Option<String>,
}

/// Column-name overrides for the two sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub weather_time: Option<String>,
    pub weather_kelvin: Option<String>,
    pub sample_date: Option<String>,
    pub turbidity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub turbidity_csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub data: Option<DataConfig>,
    pub columns: Option<ColumnsConfig>,
    pub dashboard: Option<DashboardConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl AppConfig {
    /// Load configuration from HYDROTEMP_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> ConfigResult<Self> {
        let path = std::env::var("HYDROTEMP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_path(path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    pub fn weather_path(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.weather_path.clone())
            .unwrap_or_else(|| DEFAULT_WEATHER_PATH.to_string())
            .into()
    }

    pub fn water_quality_path(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.water_quality_path.clone())
            .unwrap_or_else(|| DEFAULT_WATER_QUALITY_PATH.to_string())
            .into()
    }

    /// Get dashboard bind address (default 0.0.0.0:8080)
    pub fn bind(&self) -> String {
        self.dashboard
            .as_ref()
            .and_then(|d| d.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Destination for the processed turbidity CSV, if exporting is enabled
    pub fn turbidity_export_path(&self) -> Option<PathBuf> {
        self.export
            .as_ref()
            .and_then(|e| e.turbidity_csv.clone())
            .map(PathBuf::from)
    }

    /// Column names resolved against the defaults
    pub fn session_schema(&self) -> SessionSchema {
        let columns = self.columns.clone().unwrap_or_default();
        SessionSchema {
            weather: WeatherSchema {
                time_field: columns
                    .weather_time
                    .unwrap_or_else(|| DEFAULT_WEATHER_TIME.to_string()),
                kelvin_field: columns
                    .weather_kelvin
                    .unwrap_or_else(|| DEFAULT_WEATHER_KELVIN.to_string()),
            },
            water_quality: WaterQualitySchema {
                sample_date_field: columns
                    .sample_date
                    .unwrap_or_else(|| DEFAULT_SAMPLE_DATE.to_string()),
                turbidity_field: columns
                    .turbidity
                    .unwrap_or_else(|| DEFAULT_TURBIDITY.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind(), "0.0.0.0:8080");
        assert_eq!(cfg.weather_path(), PathBuf::from("weather.csv"));
        assert_eq!(
            cfg.water_quality_path(),
            PathBuf::from(DEFAULT_WATER_QUALITY_PATH)
        );
        assert!(cfg.turbidity_export_path().is_none());
        assert_eq!(cfg.session_schema(), SessionSchema::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.bind(), DEFAULT_BIND);
    }

    #[test]
    fn reads_partial_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[data]
weather_path = "/data/nyc.csv"

[columns]
weather_kelvin = "temp_k"
turbidity = "NTU"

[dashboard]
bind = "127.0.0.1:9000"

[export]
turbidity_csv = "out/processed_turbidity.csv"
"#,
        )
        .unwrap();

        let cfg = AppConfig::from_path(&path).unwrap();
        assert_eq!(cfg.weather_path(), PathBuf::from("/data/nyc.csv"));
        assert_eq!(
            cfg.water_quality_path(),
            PathBuf::from(DEFAULT_WATER_QUALITY_PATH)
        );
        assert_eq!(cfg.bind(), "127.0.0.1:9000");
        assert_eq!(
            cfg.turbidity_export_path(),
            Some(PathBuf::from("out/processed_turbidity.csv"))
        );

        let schema = cfg.session_schema();
        assert_eq!(schema.weather.time_field, "time");
        assert_eq!(schema.weather.kelvin_field, "temp_k");
        assert_eq!(schema.water_quality.sample_date_field, "Sample Date");
        assert_eq!(schema.water_quality.turbidity_field, "NTU");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[dashboard\nbind = ").unwrap();

        assert!(matches!(
            AppConfig::from_path(&path),
            Err(ConfigError::Toml(_))
        ));
    }
}
