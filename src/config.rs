use crate::brush::Brush;
use crate::error::SimError;
use crate::scheduler::DEFAULT_WORKERS;
use crate::settings::SimParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Gravity, wind, cell size and magic dust palette
    pub params: SimParams,
    /// Number of column bands updated in parallel
    pub workers: usize,
    /// Simulation ticks per rendered frame
    pub ticks_per_frame: usize,
    /// Fixed RNG seed; a fresh one is drawn when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Brush state (magic dust, glue, sand colour)
    #[serde(default)]
    pub brush: Brush,
}

impl AppConfig {
    /// Export config to a JSON file, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), SimError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("config saved to {}", path.display());
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.brush.sand_color = config.brush.sand_color.clamped();
        log::info!("config loaded from {}", path.display());
        Ok(config)
    }

    /// `<config dir>/pixel-sand/config.json`, or the working directory when
    /// the platform has no config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("pixel-sand"))
            .unwrap_or_default()
            .join("config.json")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            params: SimParams::default(),
            workers: DEFAULT_WORKERS,
            ticks_per_frame: 1,
            seed: None,
            brush: Brush::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::SandColor;
    use crate::settings::MagicDust;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            params: SimParams {
                gravity: -2.5,
                wind: 4.0,
                cell_size: 3,
                dust: MagicDust::FairySparkles,
            },
            workers: 8,
            ticks_per_frame: 3,
            seed: Some(99),
            brush: Brush {
                magic: true,
                glue: true,
                sand_color: SandColor::Fixed(7),
                ..Brush::default()
            },
        };

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();
        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "version": 1,
            "params": { "gravity": 1.0, "wind": 0.0, "cell_size": 2, "dust": "RainbowMist" },
            "workers": 2,
            "ticks_per_frame": 1
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.brush, Brush::default());
        assert_eq!(config.params.dust, MagicDust::RainbowMist);
    }

    #[test]
    fn test_load_clamps_sand_color_index() {
        let temp_file = NamedTempFile::new().unwrap();
        let json = r#"{
            "version": 1,
            "params": { "gravity": 1.0, "wind": 0.0, "cell_size": 1, "dust": "StarDust" },
            "workers": 2,
            "ticks_per_frame": 1,
            "brush": { "magic": false, "glue": false, "sand_color": { "Fixed": 18446744073709551615 } }
        }"#;
        std::fs::write(temp_file.path(), json).unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.brush.sand_color,
            SandColor::Fixed(crate::color::SAND_PALETTE.len() - 1)
        );
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(SimError::Io(_))));
    }
}
