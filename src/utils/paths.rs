use std::{env, fs, io, path::Path, path::PathBuf};

use dirs::config_dir;

const APP_DIR_NAME: &str = "checkout_wizard";
const CONFIG_FILE: &str = "config.json";

/// Returns the application directory, defaulting to `<config dir>/checkout_wizard`.
/// `CHECKOUT_WIZARD_HOME` overrides the location.
pub fn app_dir() -> PathBuf {
    if let Some(custom) = env::var_os("CHECKOUT_WIZARD_HOME") {
        return PathBuf::from(custom);
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
