// src/config.rs - Printer configuration for the dispatch core
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;

/// Top-level configuration, loaded from a TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub printer: PrinterConfig,

    /// One table per extruder; position in the array is the extruder index
    #[serde(default = "default_extruders")]
    pub extruders: Vec<ExtruderConfig>,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Printer base configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PrinterConfig {
    #[serde(default)]
    pub printer_name: String,
}

/// Per-extruder motion limits, folded into the E axis when the tool is selected
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtruderConfig {
    #[serde(default = "default_max_feedrate")]
    pub max_feedrate: f64,

    #[serde(default = "default_max_print_accel")]
    pub max_print_accel: f64,

    #[serde(default = "default_max_travel_accel")]
    pub max_travel_accel: f64,

    #[serde(default = "default_steps_per_mm")]
    pub steps_per_mm: f64,

    #[serde(default = "default_max_start_feedrate")]
    pub max_start_feedrate: f64,
}

/// Dispatcher scheduling policy
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DispatchConfig {
    /// Route tool-change commands through the buffered queue so they stay
    /// ordered with respect to queued motion, instead of applying them
    /// immediately out-of-band.
    #[serde(default)]
    pub buffer_tool_changes: bool,
}

fn default_extruders() -> Vec<ExtruderConfig> {
    vec![ExtruderConfig::default()]
}

fn default_max_feedrate() -> f64 {
    100.0
}

fn default_max_print_accel() -> f64 {
    2000.0
}

fn default_max_travel_accel() -> f64 {
    3000.0
}

fn default_steps_per_mm() -> f64 {
    480.0
}

fn default_max_start_feedrate() -> f64 {
    10.0
}

impl Default for ExtruderConfig {
    fn default() -> Self {
        Self {
            max_feedrate: default_max_feedrate(),
            max_print_accel: default_max_print_accel(),
            max_travel_accel: default_max_travel_accel(),
            steps_per_mm: default_steps_per_mm(),
            max_start_feedrate: default_max_start_feedrate(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            printer: PrinterConfig::default(),
            extruders: default_extruders(),
            dispatch: DispatchConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(config_path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Config = toml::from_str(&contents)?;
        if config.extruders.is_empty() {
            return Err(format!("configuration '{}' declares no extruders", config_path).into());
        }

        tracing::info!("Loaded configuration from TOML file: {}", config_path);
        Ok(config)
    }
}
