use crate::settings::Settings;
use eyre::Result;
use serde_json::{Map, Value};
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    filepath: PathBuf,
}

impl Config {
    /// Load `configuration.json` from the app data prefix, writing the
    /// defaults there on first run.
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");

        if filepath.exists() {
            return Self::load_from(filepath);
        }

        let config = Self {
            settings: Settings::default(),
            filepath,
        };
        config.save()?;
        Ok(config)
    }

    /// Load configuration from a custom path. Missing files, invalid JSON and
    /// individual invalid values all fall back to defaults.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            if let Ok(user_config) = serde_json::from_str::<Value>(&config_str)
                && let Some(user_settings_map) =
                    user_config.get("Setting").and_then(|v| v.as_object())
            {
                apply_user_settings(&mut settings, user_settings_map);
            }
        }

        Ok(Self { settings, filepath })
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
        });

        let config_str = serde_json::to_string_pretty(&config_json)?;

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.filepath, config_str)?;
        Ok(())
    }
}

fn apply_user_settings(settings: &mut Settings, map: &Map<String, Value>) {
    if let Some(val) = map.get("server_url").and_then(|v| v.as_str()) {
        settings.server_url = val.to_string();
    }
    if let Some(val) = map.get("max_display_pages").and_then(|v| v.as_u64())
        && val > 0
    {
        settings.max_display_pages = u32::try_from(val).unwrap_or(u32::MAX);
    }
    if let Some(val) = map.get("request_timeout_secs").and_then(|v| v.as_u64()) {
        settings.request_timeout_secs = val;
    }
    if let Some(val) = map.get("exit_timeout_secs").and_then(|v| v.as_u64()) {
        settings.exit_timeout_secs = val;
    }
    if let Some(val) = map.get("search_path").and_then(|v| v.as_str()) {
        settings.search_path = val.to_string();
    }
    if let Some(val) = map.get("search_field").and_then(|v| v.as_str()) {
        settings.search_field = val.to_string();
    }
    if let Some(val) = map.get("show_time_nav").and_then(|v| v.as_bool()) {
        settings.show_time_nav = val;
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("picnav"));
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("picnav");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".picnav"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".picnav"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    struct EnvGuard {
        home: Option<std::ffi::OsString>,
        xdg_config_home: Option<std::ffi::OsString>,
        userprofile: Option<std::ffi::OsString>,
    }

    impl EnvGuard {
        fn isolate(dir: &tempfile::TempDir) -> Self {
            let guard = Self {
                home: env::var_os("HOME"),
                xdg_config_home: env::var_os("XDG_CONFIG_HOME"),
                userprofile: env::var_os("USERPROFILE"),
            };
            unsafe {
                env::set_var("XDG_CONFIG_HOME", dir.path());
                env::remove_var("HOME");
                env::remove_var("USERPROFILE");
            }
            guard
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            unsafe {
                match self.home.take() {
                    Some(home) => env::set_var("HOME", home),
                    None => env::remove_var("HOME"),
                }
                match self.xdg_config_home.take() {
                    Some(xdg) => env::set_var("XDG_CONFIG_HOME", xdg),
                    None => env::remove_var("XDG_CONFIG_HOME"),
                }
                match self.userprofile.take() {
                    Some(profile) => env::set_var("USERPROFILE", profile),
                    None => env::remove_var("USERPROFILE"),
                }
            }
        }
    }

    #[test]
    fn test_config_new_writes_defaults() -> Result<()> {
        let _env_lock = lock_env();
        let dir = tempdir()?;
        let _env = EnvGuard::isolate(&dir);

        let config = Config::new()?;
        let expected_filepath = dir.path().join("picnav").join("configuration.json");

        assert_eq!(config.filepath(), &expected_filepath);
        assert!(expected_filepath.exists());

        let config_str = fs::read_to_string(&expected_filepath)?;
        let json_value: Value = serde_json::from_str(&config_str)?;
        let loaded: Settings = serde_json::from_value(json_value["Setting"].clone())?;
        assert_eq!(loaded, Settings::default());
        Ok(())
    }

    #[test]
    fn test_config_new_with_existing_file() -> Result<()> {
        let _env_lock = lock_env();
        let dir = tempdir()?;
        let _env = EnvGuard::isolate(&dir);

        let config_path = dir.path().join("picnav").join("configuration.json");
        fs::create_dir_all(dir.path().join("picnav"))?;
        let config_json = serde_json::json!({
            "Setting": {
                "server_url": "http://photos.lan:8080",
                "max_display_pages": 12
            }
        });
        fs::write(&config_path, serde_json::to_string(&config_json)?)?;

        let config = Config::new()?;
        assert_eq!(config.settings.server_url, "http://photos.lan:8080");
        assert_eq!(config.settings.max_display_pages, 12);
        assert!(config.settings.show_time_nav);
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("nested").join("configuration.json");

        let mut config = Config::load_from(config_path.clone())?;
        assert!(!config_path.exists());
        config.settings.max_display_pages = 25;
        config.settings.show_time_nav = false;
        config.save()?;

        let loaded = Config::load_from(config_path)?;
        assert_eq!(loaded.settings, config.settings);
        Ok(())
    }

    #[test]
    fn test_config_invalid_values_fall_back() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("odd.json");

        fs::write(&config_path, "{ invalid json }")?;
        let config = Config::load_from(config_path.clone())?;
        assert_eq!(config.settings, Settings::default());

        let odd = serde_json::json!({
            "Setting": {
                "max_display_pages": 0,
                "request_timeout_secs": "soon",
                "search_field": "q"
            }
        });
        fs::write(&config_path, serde_json::to_string(&odd)?)?;
        let config = Config::load_from(config_path)?;
        assert_eq!(config.settings.max_display_pages, 20);
        assert_eq!(config.settings.request_timeout_secs, 10);
        assert_eq!(config.settings.search_field, "q");
        Ok(())
    }

    #[test]
    fn test_get_app_data_prefix() {
        let _env_lock = lock_env();
        let xdg_dir = tempdir().unwrap();
        let _env = EnvGuard::isolate(&xdg_dir);

        assert_eq!(get_app_data_prefix().unwrap(), xdg_dir.path().join("picnav"));

        unsafe {
            let home_dir = tempdir().unwrap();
            env::remove_var("XDG_CONFIG_HOME");
            env::set_var("HOME", home_dir.path());
            assert_eq!(
                get_app_data_prefix().unwrap(),
                home_dir.path().join(".picnav")
            );

            let config_dir = home_dir.path().join(".config").join("picnav");
            fs::create_dir_all(&config_dir).unwrap();
            assert_eq!(get_app_data_prefix().unwrap(), config_dir);

            env::remove_var("HOME");
            assert!(get_app_data_prefix().is_err());
        }
    }
}
