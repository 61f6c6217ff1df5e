use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::movement::Direction;
use crate::stage::ViewStatus;
use crate::units::parse_length;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DanmakuConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    /// Viewport width in pixels
    #[serde(default = "default_width")]
    pub width: f64,
    /// Viewport height in pixels
    #[serde(default = "default_height")]
    pub height: f64,
    /// Traversal direction: "left", "right" or "none"
    #[serde(default)]
    pub direction: Direction,
    /// Playback speed multiplier
    #[serde(default = "default_rate")]
    pub rate: f64,
    /// Minimum horizontal gap between items sharing a lane (pixels)
    #[serde(default)]
    pub gap: f64,
    /// Delay between two items entering the stage
    #[serde(default = "default_interval")]
    pub interval_ms: u64,
    /// Range of traversal durations at rate 1, [min, max]
    #[serde(default = "default_times")]
    pub times_ms: [u64; 2],
    /// Lane height, absolute ("24px") or relative to the stage height ("20%")
    #[serde(default = "default_track_height")]
    pub track_height: String,
    /// Initial global visibility
    #[serde(default)]
    pub view_status: ViewStatus,
    /// Host frame interval
    #[serde(default = "default_frame")]
    pub frame_ms: u64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            direction: Direction::default(),
            rate: default_rate(),
            gap: 0.0,
            interval_ms: default_interval(),
            times_ms: default_times(),
            track_height: default_track_height(),
            view_status: ViewStatus::default(),
            frame_ms: default_frame(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of items waiting to enter the stage
    #[serde(default = "default_stash")]
    pub stash: usize,
    /// Maximum number of items on screen (unlimited when absent)
    #[serde(default)]
    pub view: Option<usize>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            stash: default_stash(),
            view: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    450.0
}

fn default_rate() -> f64 {
    1.0
}

fn default_interval() -> u64 {
    500
}

fn default_times() -> [u64; 2] {
    [4000, 6000]
}

fn default_track_height() -> String {
    "20%".to_string()
}

fn default_frame() -> u64 {
    16 // ~60fps
}

fn default_stash() -> usize {
    1024
}

impl StageConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    /// Lane height in pixels
    pub fn track_height_px(&self) -> crate::Result<f64> {
        parse_length(&self.track_height, self.height)
    }

    /// Number of whole lanes that fit the stage, at least one
    pub fn track_count(&self) -> crate::Result<usize> {
        let h = self.track_height_px()?;
        if h <= 0.0 {
            return Err(crate::Error::Config(format!(
                "track_height must be positive, got '{}'",
                self.track_height
            )));
        }
        let count = (self.height / h).floor() as usize;
        if count == 0 {
            return Err(crate::Error::Config(format!(
                "track_height '{}' leaves no lane on a {}px stage",
                self.track_height, self.height
            )));
        }
        Ok(count)
    }

    /// Traversal duration for the `index`-th of `count` items, spread evenly
    /// over `times_ms`
    pub fn duration_for(&self, index: usize, count: usize) -> Duration {
        let [min, max] = self.times_ms;
        if count <= 1 || max <= min {
            return Duration::from_millis(min);
        }
        let step = (max - min) as f64 * (index % count) as f64 / (count - 1) as f64;
        Duration::from_millis(min + step.round() as u64)
    }
}

impl DanmakuConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/facile-danmaku/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("facile-danmaku")
            .join("config.toml")
    }

    /// Reject values the engines assume never happen
    pub fn validate(&self) -> crate::Result<()> {
        let stage = &self.stage;
        if stage.gap.is_nan() || stage.gap < 0.0 {
            return Err(crate::Error::Config(r#"The "gap" must be >= 0"#.to_string()));
        }
        if !stage.rate.is_finite() || stage.rate <= 0.0 {
            return Err(crate::Error::Config(r#"The "rate" must be > 0"#.to_string()));
        }
        if self.limits.stash == 0 {
            return Err(crate::Error::Config(
                r#"The "limits.stash" must be > 0"#.to_string(),
            ));
        }
        let [min, max] = stage.times_ms;
        if min == 0 || min > max {
            return Err(crate::Error::Config(format!(
                r#"The "times_ms" range is invalid: [{}, {}]"#,
                min, max
            )));
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(stage.width) || !positive(stage.height) {
            return Err(crate::Error::Config(
                "stage width and height must be positive".to_string(),
            ));
        }
        stage.track_count()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DanmakuConfig::default();
        assert_eq!(config.stage.gap, 0.0);
        assert_eq!(config.stage.rate, 1.0);
        assert_eq!(config.stage.direction, Direction::Right);
        assert_eq!(config.stage.times_ms, [4000, 6000]);
        assert_eq!(config.stage.interval(), Duration::from_millis(500));
        assert_eq!(config.limits.stash, 1024);
        assert_eq!(config.stage.track_count().unwrap(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: DanmakuConfig = toml::from_str(
            r#"
            [stage]
            direction = "left"
            track_height = "30px"
            gap = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.stage.direction, Direction::Left);
        assert_eq!(config.stage.track_height_px().unwrap(), 30.0);
        assert_eq!(config.stage.rate, 1.0);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.stage.view_status, ViewStatus::Show);
    }

    #[test]
    fn test_validation() {
        let mut config = DanmakuConfig::default();
        config.stage.gap = -1.0;
        assert!(config.validate().is_err());

        let mut config = DanmakuConfig::default();
        config.limits.stash = 0;
        assert!(config.validate().is_err());

        let mut config = DanmakuConfig::default();
        config.stage.times_ms = [6000, 4000];
        assert!(config.validate().is_err());

        let mut config = DanmakuConfig::default();
        config.stage.track_height = "tall".to_string();
        assert!(config.validate().is_err());

        let mut config = DanmakuConfig::default();
        config.stage.gap = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stage_without_lanes_rejected() {
        let mut config = DanmakuConfig::default();
        config.stage.height = 10.0;
        config.stage.track_height = "20px".to_string();
        assert!(matches!(
            config.stage.track_count(),
            Err(crate::Error::Config(_))
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_spread() {
        let stage = StageConfig::default();
        assert_eq!(stage.duration_for(0, 3), Duration::from_millis(4000));
        assert_eq!(stage.duration_for(1, 3), Duration::from_millis(5000));
        assert_eq!(stage.duration_for(2, 3), Duration::from_millis(6000));
        assert_eq!(stage.duration_for(0, 1), Duration::from_millis(4000));
    }

    #[test]
    fn test_save_and_load_round_trip_file() {
        let path = std::env::temp_dir()
            .join(format!("danmaku-config-{}", std::process::id()))
            .join("config.toml");
        let mut config = DanmakuConfig::default();
        config.stage.rate = 1.5;
        config.save_to(&path).unwrap();

        let loaded = DanmakuConfig::load_from(&path).unwrap();
        assert_eq!(loaded.stage.rate, 1.5);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
