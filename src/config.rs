use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::middle::{DEFAULT_VOLUME, DEFAULT_VOLUME_STEP};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    volume: Option<f32>,
    volume_step: Option<f32>,
    time_scale: Option<f64>,
}

#[derive(Deserialize, Default)]
struct DisplayConfig {
    tick_rate_ms: Option<u64>,
}

pub struct Config {
    playback: PlaybackConfig,
    display: DisplayConfig,
}

impl Config {
    /// Embedded defaults, overlaid with the user file if there is one.
    /// `path` replaces the default user file location.
    pub fn load(path: Option<&Path>) -> Self {
        let user_path = path.map(Path::to_path_buf).or_else(user_config_path);
        let user = user_path.as_deref().and_then(read_user_config);
        Self::from_parts(user)
    }

    fn from_parts(user: Option<ConfigFile>) -> Self {
        let mut base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {e}");
                ConfigFile::default()
            }
        };
        if let Some(user) = user {
            merge_playback(&mut base.playback, user.playback);
            merge_display(&mut base.display, user.display);
        }
        Config {
            playback: base.playback,
            display: base.display,
        }
    }

    /// Command-line values win over both files.
    pub fn with_overrides(mut self, volume: Option<f32>, time_scale: Option<f64>) -> Self {
        if volume.is_some() {
            self.playback.volume = volume;
        }
        if time_scale.is_some() {
            self.playback.time_scale = time_scale;
        }
        self
    }

    pub fn volume(&self) -> f32 {
        self.playback
            .volume
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VOLUME)
            .clamp(0.0, 1.0)
    }

    pub fn volume_step(&self) -> f32 {
        self.playback
            .volume_step
            .filter(|v| v.is_finite())
            .unwrap_or(DEFAULT_VOLUME_STEP)
            .clamp(0.01, 0.5)
    }

    /// Multiplier on every step duration (clamped to 0.01..10).
    pub fn time_scale(&self) -> f64 {
        self.playback
            .time_scale
            .filter(|v| v.is_finite())
            .unwrap_or(1.0)
            .clamp(0.01, 10.0)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.display.tick_rate_ms.unwrap_or(16).clamp(5, 250))
    }
}

fn read_user_config(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
            Ok(user) => {
                log::info!(target: "config", "loaded {}", path.display());
                Some(user)
            }
            Err(e) => {
                log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
            None
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("panseared").join("config.toml"))
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.volume.is_some() {
        base.volume = user.volume;
    }
    if user.volume_step.is_some() {
        base.volume_step = user.volume_step;
    }
    if user.time_scale.is_some() {
        base.time_scale = user.time_scale;
    }
}

fn merge_display(base: &mut DisplayConfig, user: DisplayConfig) {
    if user.tick_rate_ms.is_some() {
        base.tick_rate_ms = user.tick_rate_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn embedded_defaults() {
        let config = Config::from_parts(None);
        assert_eq!(config.volume(), 0.5);
        assert_eq!(config.volume_step(), 0.05);
        assert_eq!(config.time_scale(), 1.0);
        assert_eq!(config.tick_rate(), Duration::from_millis(16));
    }

    #[test]
    fn user_file_overrides_only_what_it_sets() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[playback]\nvolume = 0.8\n");
        let config = Config::load(Some(path.as_path()));
        assert_eq!(config.volume(), 0.8);
        assert_eq!(config.volume_step(), 0.05);
        assert_eq!(config.tick_rate(), Duration::from_millis(16));
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[playback\nvolume = ");
        let config = Config::load(Some(path.as_path()));
        assert_eq!(config.volume(), 0.5);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("nope.toml").as_path()));
        assert_eq!(config.time_scale(), 1.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "[playback]\nvolume = 4.0\nvolume_step = 0.0\ntime_scale = 100.0\n\n[display]\ntick_rate_ms = 1\n",
        );
        let config = Config::load(Some(path.as_path()));
        assert_eq!(config.volume(), 1.0);
        assert_eq!(config.volume_step(), 0.01);
        assert_eq!(config.time_scale(), 10.0);
        assert_eq!(config.tick_rate(), Duration::from_millis(5));
    }

    #[test]
    fn command_line_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[playback]\nvolume = 0.8\ntime_scale = 2.0\n");
        let config = Config::load(Some(path.as_path())).with_overrides(Some(0.2), None);
        assert_eq!(config.volume(), 0.2);
        assert_eq!(config.time_scale(), 2.0);
    }
}
