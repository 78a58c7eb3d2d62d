use std::env;
use std::path::Path;

use scene::ViewMode;
use scene::{MAX_SATELLITE_COUNT, NOMINAL_CONSTELLATION_SIZE};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::globe_controller::{AutoRotation, DEFAULT_DRAG_PX_PER_RADIAN};

pub const ENV_AUTO_ROTATE: &str = "GLOBE_AUTO_ROTATE";
pub const ENV_DRAG_PX_PER_RADIAN: &str = "GLOBE_DRAG_PX_PER_RADIAN";
pub const ENV_SATELLITE_COUNT: &str = "GLOBE_SATELLITE_COUNT";
pub const ENV_SATELLITE_SEED: &str = "GLOBE_SATELLITE_SEED";
pub const ENV_DEVICE_PIXEL_RATIO: &str = "GLOBE_DEVICE_PIXEL_RATIO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub auto_rotate: bool,
    pub auto_rotation: AutoRotation,
    pub drag_px_per_radian: f64,
    /// Ignore clicks that end a drag longer than this. `None` hit-tests every click.
    pub click_drag_threshold_px: Option<f64>,
    pub satellite_count: usize,
    /// Fixed seed for the satellite scatter; entropy when unset.
    pub satellite_seed: Option<u64>,
    pub device_pixel_ratio: f64,
    /// Camera tilt passed to the renderer (radians).
    pub theta: f64,
    pub initial_mode: ViewMode,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            auto_rotation: AutoRotation::default(),
            drag_px_per_radian: DEFAULT_DRAG_PX_PER_RADIAN,
            click_drag_threshold_px: None,
            satellite_count: NOMINAL_CONSTELLATION_SIZE,
            satellite_seed: None,
            device_pixel_ratio: 2.0,
            theta: 0.3,
            initial_mode: ViewMode::Countries,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid { field: &'static str, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "config parse error: {msg}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid config `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GlobeConfig {
    /// Defaults, then the JSON file at `path` if given, then `GLOBE_*` env vars.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        let cfg = base.with_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("read {path:?}: {e}")))?;
        Self::from_json_str(&raw)
    }

    /// Apply environment overrides. Unparseable values are ignored with a warning.
    pub fn with_env_overrides(mut self) -> Self {
        self.auto_rotate = env_var_bool(ENV_AUTO_ROTATE, self.auto_rotate);
        self.drag_px_per_radian = env_var_f64(ENV_DRAG_PX_PER_RADIAN, self.drag_px_per_radian);
        self.satellite_count = env_var_usize(ENV_SATELLITE_COUNT, self.satellite_count);
        self.device_pixel_ratio = env_var_f64(ENV_DEVICE_PIXEL_RATIO, self.device_pixel_ratio);
        if let Some(seed) = env_var_parsed::<u64>(ENV_SATELLITE_SEED) {
            self.satellite_seed = Some(seed);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.drag_px_per_radian.is_finite() && self.drag_px_per_radian > 0.0) {
            return Err(invalid("drag_px_per_radian", "must be a positive number"));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(invalid("device_pixel_ratio", "must be a positive number"));
        }
        if !self.auto_rotation.is_finite() {
            return Err(invalid("auto_rotation", "rate must be finite"));
        }
        if self.satellite_count > MAX_SATELLITE_COUNT {
            return Err(ConfigError::Invalid {
                field: "satellite_count",
                reason: format!("must be at most {MAX_SATELLITE_COUNT}"),
            });
        }
        if !self.theta.is_finite() {
            return Err(invalid("theta", "must be finite"));
        }
        if let Some(t) = self.click_drag_threshold_px {
            if !(t.is_finite() && t >= 0.0) {
                return Err(invalid("click_drag_threshold_px", "must be a non-negative number"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn env_var_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

fn env_var_f64(key: &str, default: f64) -> f64 {
    env_var_parsed(key).unwrap_or(default)
}

fn env_var_usize(key: &str, default: usize) -> usize {
    env_var_parsed(key).unwrap_or(default)
}

fn env_var_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!(key, value = %v, "ignoring unparseable environment override");
                default
            }
        },
        Err(_) => default,
    }
}
