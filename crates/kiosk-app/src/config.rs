use std::path::{Path, PathBuf};

use kiosk_core::language::Language;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const APP_DIR: &str = "com.kiosk.health";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_BASE_URL: &str = "KIOSK_API_BASE_URL";
pub const ENV_HOST_URL: &str = "KIOSK_HOST_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Backend root, e.g. `https://api.example.com/api`. Empty runs the
    /// kiosk against the in-memory backend.
    pub api_base_url: String,
    /// Where the scanner redirects once a measurement is saved.
    pub host_url: String,
    #[serde(default)]
    pub scanner_api_key: String,
    /// Session storage root. Defaults to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Added in v1.
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: String::new(),
            host_url: "http://localhost:3000".to_string(),
            scanner_api_key: String::new(),
            data_dir: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            language: Language::En,
            json_logs: false,
        }
    }
}

/// Config view safe to log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigInfo {
    pub api_base_url: String,
    pub host_url: String,
    pub scanner_key_hint: Option<String>,
    pub data_dir: String,
    pub request_timeout_secs: u64,
    pub language: Language,
}

impl KioskConfig {
    /// Apply `KIOSK_API_BASE_URL` and `KIOSK_HOST_URL` from the environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = non_empty(ENV_API_BASE_URL) {
            tracing::debug!(%url, "api base url overridden from environment");
            self.api_base_url = url;
        }
        if let Some(url) = non_empty(ENV_HOST_URL) {
            tracing::debug!(%url, "host url overridden from environment");
            self.host_url = url;
        }
        self
    }

    pub fn data_dir(&self) -> eyre::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let base =
                    dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
                Ok(base.join(APP_DIR))
            }
        }
    }

    pub fn redacted(&self) -> ConfigInfo {
        ConfigInfo {
            api_base_url: self.api_base_url.clone(),
            host_url: self.host_url.clone(),
            scanner_key_hint: (!self.scanner_api_key.is_empty())
                .then(|| redact_key(&self.scanner_api_key)),
            data_dir: self
                .data_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            request_timeout_secs: self.request_timeout_secs,
            language: self.language,
        }
    }
}

fn redact_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join(APP_DIR))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Load the config from its default location, writing a default one on
/// first run.
pub fn load_or_init() -> eyre::Result<KioskConfig> {
    let path = config_path()?;
    if path.exists() {
        load_config_from(&path)
    } else {
        let config = KioskConfig::default();
        save_config_to(&path, &config)?;
        tracing::info!(path = %path.display(), "wrote default config");
        Ok(config)
    }
}

pub fn load_config_from(path: &Path) -> eyre::Result<KioskConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: KioskConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update the kiosk."
        ));
    }

    // v0 → v1: add request_timeout_secs
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("request_timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added request_timeout_secs)");
    }

    Ok(json)
}

pub fn save_config_to(path: &Path, config: &KioskConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
