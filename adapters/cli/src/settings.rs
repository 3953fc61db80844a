//! Video settings persisted between runs.

use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Window sizes the game can be configured with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) enum Resolution {
    R800x600,
    #[default]
    R1024x768,
    R1280x1024,
    R1920x1080,
}

impl Resolution {
    const ALL: [Resolution; 4] = [
        Resolution::R800x600,
        Resolution::R1024x768,
        Resolution::R1280x1024,
        Resolution::R1920x1080,
    ];

    pub(crate) const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::R800x600 => (800, 600),
            Self::R1024x768 => (1024, 768),
            Self::R1280x1024 => (1280, 1024),
            Self::R1920x1080 => (1920, 1080),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "{width}x{height}")
    }
}

impl FromStr for Resolution {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match Self::ALL
            .into_iter()
            .find(|resolution| resolution.to_string() == trimmed)
        {
            Some(resolution) => Ok(resolution),
            None => bail!(
                "unsupported resolution `{trimmed}`; expected one of 800x600, 1024x768, 1280x1024, 1920x1080"
            ),
        }
    }
}

impl TryFrom<String> for Resolution {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(resolution: Resolution) -> Self {
        resolution.to_string()
    }
}

/// Window configuration stored in the settings file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct VideoSettings {
    pub(crate) resolution: Resolution,
    pub(crate) fullscreen: bool,
}

impl VideoSettings {
    /// Reads settings from `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse settings at {}", path.display()))
    }

    /// Writes the settings to `path`, creating parent directories as needed.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialise settings")?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("failed to write settings to {}", path.display()))?;
        info!(path = %path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolutions_parse_from_their_display_form() {
        for resolution in Resolution::ALL {
            assert_eq!(resolution.to_string().parse::<Resolution>().ok(), Some(resolution));
        }
        assert_eq!(Resolution::R1280x1024.dimensions(), (1280, 1024));
    }

    #[test]
    fn unsupported_resolution_names_the_value() {
        let error = "640x480".parse::<Resolution>().expect_err("not in the supported list");
        assert!(error.to_string().contains("`640x480`"));

        let error = toml::from_str::<VideoSettings>("resolution = \"1x1\"")
            .expect_err("file values are validated too");
        assert!(error.to_string().contains("1x1"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let settings: VideoSettings = toml::from_str("fullscreen = true").expect("parses");
        assert_eq!(settings.resolution, Resolution::R1024x768);
        assert!(settings.fullscreen);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("does-not-exist.toml");
        assert_eq!(
            VideoSettings::load(&path).expect("defaults"),
            VideoSettings::default()
        );
    }

    #[test]
    fn saved_settings_load_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("saved/settings.toml");
        let settings = VideoSettings {
            resolution: Resolution::R1920x1080,
            fullscreen: true,
        };
        settings.save(&path).expect("settings save");

        let contents = fs::read_to_string(&path).expect("file written");
        assert!(contents.contains("resolution = \"1920x1080\""));
        assert_eq!(VideoSettings::load(&path).expect("settings load"), settings);
    }

    #[test]
    fn scratch_files_go_away_with_their_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = dir.path().to_path_buf();
        VideoSettings::default()
            .save(&root.join("nested/settings.toml"))
            .expect("settings save");
        assert!(root.join("nested").is_dir());

        dir.close().expect("temp dir removed");
        assert!(!root.exists());
    }
}
