use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use directories::ProjectDirs;

use crate::shared::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Metric,
    Imperial,
    Custom,
}

/// Per-user conversion targets, consumed read-only by the converter and
/// detector. Unknown fields in a stored settings file are ignored so older
/// files keep loading across releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    pub length_unit: String,
    pub weight_unit: String,
    pub temperature_unit: String,
    pub volume_unit: String,
    pub area_unit: String,
    pub speed_unit: String,
    pub acceleration_unit: String,
    pub flow_rate_unit: String,
    pub torque_unit: String,
    pub pressure_unit: String,
    /// Zone name, or `"auto"` to follow the machine's UTC offset.
    pub timezone_unit: String,
    /// Three-letter target currency code.
    pub currency_unit: String,
    /// Consumed by the time formatter, not by detection.
    pub is_12hr: bool,
    pub preset: Preset,
}

impl Default for UserSettings {
    fn default() -> Self {
        let mut settings = Self {
            length_unit: String::new(),
            weight_unit: String::new(),
            temperature_unit: String::new(),
            volume_unit: String::new(),
            area_unit: String::new(),
            speed_unit: String::new(),
            acceleration_unit: String::new(),
            flow_rate_unit: String::new(),
            torque_unit: String::new(),
            pressure_unit: String::new(),
            timezone_unit: "auto".to_string(),
            currency_unit: "USD".to_string(),
            is_12hr: true,
            preset: Preset::Metric,
        };
        settings.apply_preset(Preset::Metric);
        settings
    }
}

impl UserSettings {
    /// Overwrite every per-dimension target with the preset's units.
    /// `Custom` leaves the targets untouched and only records the label.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.preset = preset;
        let units: [&str; 10] = match preset {
            Preset::Metric => ["m", "kg", "c", "l", "m2", "kmh", "ms2", "lmin", "Nm", "kpa"],
            Preset::Imperial => [
                "ft", "lb", "f", "gal", "ft2", "mph", "fts2", "galmin", "lbft", "psi",
            ],
            Preset::Custom => return,
        };
        let [length, weight, temp, volume, area, speed, accel, flow, torque, pressure] = units;
        self.length_unit = length.to_string();
        self.weight_unit = weight.to_string();
        self.temperature_unit = temp.to_string();
        self.volume_unit = volume.to_string();
        self.area_unit = area.to_string();
        self.speed_unit = speed.to_string();
        self.acceleration_unit = accel.to_string();
        self.flow_rate_unit = flow.to_string();
        self.torque_unit = torque.to_string();
        self.pressure_unit = pressure.to_string();
    }

    /// Target unit for a dimension, if the settings carry one.
    pub fn target_for(&self, dimension: crate::shared::types::Dimension) -> Option<&str> {
        use crate::shared::types::Dimension::*;
        let unit = match dimension {
            Length => &self.length_unit,
            Weight => &self.weight_unit,
            Temperature => &self.temperature_unit,
            Volume => &self.volume_unit,
            Area => &self.area_unit,
            Speed => &self.speed_unit,
            Acceleration => &self.acceleration_unit,
            FlowRate => &self.flow_rate_unit,
            Torque => &self.torque_unit,
            Pressure => &self.pressure_unit,
            Timezone => &self.timezone_unit,
            Currency => &self.currency_unit,
        };
        if unit.is_empty() {
            None
        } else {
            Some(unit)
        }
    }

    pub fn settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "omniconvert", "omniconvert")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Io("Failed to determine config directory".to_string()))
    }

    pub fn load() -> AppResult<Self> {
        let path = Self::settings_path()?;

        if !path.exists() {
            let settings = Self::default();
            settings.save()?;
            return Ok(settings);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    pub fn save(&self) -> AppResult<()> {
        let path = Self::settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(&path, content)
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_metric() {
        let settings = UserSettings::default();
        assert_eq!(settings.preset, Preset::Metric);
        assert_eq!(settings.length_unit, "m");
        assert_eq!(settings.torque_unit, "Nm");
        assert_eq!(settings.currency_unit, "USD");
        assert_eq!(settings.timezone_unit, "auto");
        assert!(settings.is_12hr);
    }

    #[test]
    fn imperial_preset_swaps_targets() {
        let mut settings = UserSettings::default();
        settings.apply_preset(Preset::Imperial);
        assert_eq!(settings.length_unit, "ft");
        assert_eq!(settings.pressure_unit, "psi");
        // Non-dimension fields are preserved.
        assert_eq!(settings.currency_unit, "USD");
    }

    #[test]
    fn unknown_fields_tolerated() {
        let json = r#"{"lengthUnit": "km", "someFutureKnob": 3}"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.length_unit, "km");
        // Everything else falls back to the defaults.
        assert_eq!(settings.weight_unit, "kg");
    }
}
