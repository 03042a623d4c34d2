use crate::error::SweepError;
use crate::frequency::FrequencySweepPlan;
use crate::transport::SCPI_PORT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Linear sweep settings as written in a configuration file
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SweepSettings {
    pub start_hz: f64,
    pub stop_hz: f64,
    pub points: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            start_hz: 300e3,
            stop_hz: 20e9,
            points: 1001,
        }
    }
}

/// Settings for one acquisition run
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Host name or IP of the analyzer
    pub address: String,
    pub port: u16,
    /// Bound on every ordinary command exchange
    pub io_timeout_ms: u64,
    /// Bound on the sweep-complete handshake
    pub sweep_timeout_ms: u64,
    pub channel: u8,
    pub source_power_dbm: f64,
    pub sweep: SweepSettings,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: SCPI_PORT,
            io_timeout_ms: 5000,
            sweep_timeout_ms: 60_000,
            channel: 1,
            source_power_dbm: -10.0,
            sweep: SweepSettings::default(),
        }
    }
}

impl AcquisitionConfig {
    pub fn from_json_str(json: &str) -> Result<AcquisitionConfig, SweepError> {
        let config: AcquisitionConfig =
            serde_json::from_str(json).map_err(|e| SweepError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<AcquisitionConfig, SweepError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SweepError::ConfigError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, SweepError> {
        serde_json::to_string_pretty(self).map_err(|e| SweepError::ConfigError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SweepError> {
        if self.channel == 0 {
            return Err(SweepError::ConfigError(
                "channel numbers start at 1".to_string(),
            ));
        }
        if self.io_timeout_ms == 0 || self.sweep_timeout_ms == 0 {
            return Err(SweepError::ConfigError(
                "timeouts must be non-zero".to_string(),
            ));
        }
        if !self.source_power_dbm.is_finite() {
            return Err(SweepError::ConfigError(
                "source power must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_millis(self.sweep_timeout_ms)
    }

    pub fn plan(&self) -> Result<FrequencySweepPlan, SweepError> {
        FrequencySweepPlan::new(self.sweep.start_hz, self.sweep.stop_hz, self.sweep.points)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = AcquisitionConfig::from_json_str("{}").unwrap();
        assert_eq!(AcquisitionConfig::default(), config);
        assert_eq!(5025, config.port);
        assert_eq!(Duration::from_secs(5), config.io_timeout());
        let plan = config.plan().unwrap();
        assert_eq!(300e3, plan.start_hz());
        assert_eq!(20e9, plan.stop_hz());
        assert_eq!(1001, plan.npts());
    }

    #[test]
    fn config_partial() {
        let config = AcquisitionConfig::from_json_str(
            r#"{ "address": "10.0.0.7", "source_power_dbm": -20.0, "sweep": { "points": 201 } }"#,
        )
        .unwrap();
        assert_eq!("10.0.0.7", config.address);
        assert_eq!(-20.0, config.source_power_dbm);
        assert_eq!(201, config.sweep.points);
        assert_eq!(20e9, config.sweep.stop_hz);
    }

    #[test]
    fn config_invalid() {
        assert!(matches!(
            AcquisitionConfig::from_json_str(r#"{ "channel": 0 }"#),
            Err(SweepError::ConfigError(_))
        ));
        assert!(matches!(
            AcquisitionConfig::from_json_str("{ not json"),
            Err(SweepError::ConfigError(_))
        ));
        let config =
            AcquisitionConfig::from_json_str(r#"{ "sweep": { "points": 1 } }"#).unwrap();
        assert!(matches!(config.plan(), Err(SweepError::InvalidSweepPlan(_))));
    }

    #[test]
    fn config_round_trip() {
        let config = AcquisitionConfig {
            channel: 2,
            ..Default::default()
        };
        let json = config.to_json_string().unwrap();
        assert_eq!(config, AcquisitionConfig::from_json_str(&json).unwrap());
    }

    #[test]
    fn config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vna.json");
        fs::write(&path, r#"{ "address": "vna.lab", "sweep": { "stop_hz": 8.5e9 } }"#).unwrap();
        let config = AcquisitionConfig::from_file(&path).unwrap();
        assert_eq!("vna.lab", config.address);
        assert_eq!(8.5e9, config.plan().unwrap().stop_hz());

        assert!(matches!(
            AcquisitionConfig::from_file(dir.path().join("missing.json")),
            Err(SweepError::ConfigError(_))
        ));
    }
}
