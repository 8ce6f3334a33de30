use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::{Result, WizardError};
use crate::utils::paths::{app_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

/// Front-end preferences. Form data is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quiet_mode: bool,
    pub high_contrast_mode: bool,
    pub screen_reader_mode: bool,
    pub show_record_on_submit: bool,
}

impl Config {
    pub const KEYS: [&'static str; 4] = [
        "quiet_mode",
        "high_contrast_mode",
        "screen_reader_mode",
        "show_record_on_submit",
    ];

    /// Every preference paired with its current value, in `KEYS` order.
    pub fn flags(&self) -> [(&'static str, bool); 4] {
        [
            ("quiet_mode", self.quiet_mode),
            ("high_contrast_mode", self.high_contrast_mode),
            ("screen_reader_mode", self.screen_reader_mode),
            ("show_record_on_submit", self.show_record_on_submit),
        ]
    }

    /// Sets a preference by key. Dashes are accepted in place of underscores.
    pub fn set_flag(&mut self, key: &str, value: bool) -> Result<()> {
        let slot = match key.to_ascii_lowercase().replace('-', "_").as_str() {
            "quiet_mode" => &mut self.quiet_mode,
            "high_contrast_mode" => &mut self.high_contrast_mode,
            "screen_reader_mode" => &mut self.screen_reader_mode,
            "show_record_on_submit" => &mut self.show_record_on_submit,
            _ => {
                return Err(WizardError::Config(format!(
                    "unknown config key `{}` (expected one of: {})",
                    key,
                    Self::KEYS.join(", ")
                )))
            }
        };
        *slot = value;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet_mode: false,
            high_contrast_mode: false,
            screen_reader_mode: false,
            show_record_on_submit: true,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_base_dir(app_dir())
    }

    /// The directory is only created on the first `save`.
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: config_file_in(&base),
        }
    }

    /// Reads the stored preferences, falling back to defaults when no file
    /// exists yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            WizardError::Config(format!("{} is not valid: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
