use crate::error::Error;
use crate::settings::Settings;
use platform_dirs::AppDirs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.toml";

/// Creates the directory `APP_DATA/repolens` if it does not exist,
/// writes the default settings file there on first run,
/// and loads the settings from it.
pub fn init_app_settings() -> Result<Settings, Error> {
    let path = app_settings_path()?;
    if !path.exists() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let str = toml::to_string_pretty(&Settings::default())
            .map_err(|err| Error::Config(err.to_string()))?;
        std::fs::write(&path, str)?;
    }
    load_settings(&path)
}

/// Read settings from a TOML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
    let path = path.as_ref();
    toml::from_str(&std::fs::read_to_string(path)?)
        .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))
}

/// Location of the per-user settings file.
pub fn app_settings_path() -> Result<PathBuf, Error> {
    let dirs = AppDirs::new(Some("repolens"), false).ok_or_else(|| {
        Error::Config("unable to determine the application data directory".to_string())
    })?;
    Ok(dirs.config_dir.join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use crate::settings::Settings;

    #[test]
    fn settings_roundtrip() {
        let settings = Settings::default();
        let str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&str).unwrap();
        assert_eq!(parsed.server.port, settings.server.port);
        assert_eq!(parsed.server.commit_limit, settings.server.commit_limit);
    }

    #[test]
    fn partial_settings_use_defaults() {
        let parsed: Settings = toml::from_str("[server]\nport = 4000\n").unwrap();
        assert_eq!(parsed.server.port, 4000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.layout.commit_spacing, 60.0);
    }
}
