use crate::LunaError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct LunaConfig {
    #[serde(default)]
    pub advice: AdviceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdviceConfig {
    #[serde(default = "default_advice_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_advice_model")]
    pub model: String,
    #[serde(default = "default_advice_timeout")]
    pub timeout_secs: u64,
    /// Name of the env var holding a bearer token for the endpoint.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_advice_endpoint(),
            model: default_advice_model(),
            timeout_secs: default_advice_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl AdviceConfig {
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_advice_endpoint() -> String {
    "http://localhost:1234/v1/chat/completions".into()
}

fn default_advice_model() -> String {
    "ibm/granite-4-h-tiny".into()
}

fn default_advice_timeout() -> u64 {
    30
}

fn default_api_key_env() -> String {
    "LUNA_API_KEY".into()
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    pub key_file: Option<PathBuf>,
}

/// `~/.luna`, falling back to `/tmp/.luna` without a HOME.
pub fn luna_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".luna")
}

pub fn default_db_path() -> PathBuf {
    luna_dir().join("luna.db")
}

/// Load config from LUNA_CONFIG env var, ~/.luna/config.toml, or defaults.
pub fn load_config() -> Result<LunaConfig, LunaError> {
    match config_path() {
        Some(p) if p.exists() => load_config_from(&p),
        _ => Ok(LunaConfig::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<LunaConfig, LunaError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LunaError::Config(format!("{}: {e}", path.display())))?;
    let config: LunaConfig = toml::from_str(&content)
        .map_err(|e| LunaError::Config(format!("{}: {e}", path.display())))?;
    validate_config(&config)?;
    Ok(config)
}

fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("LUNA_CONFIG") {
        return Some(PathBuf::from(p));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| Path::new(&home).join(".luna").join("config.toml"))
}

fn validate_config(config: &LunaConfig) -> Result<(), LunaError> {
    let endpoint = &config.advice.endpoint;
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(LunaError::Config(format!(
            "advice.endpoint must be an http(s) URL, got {endpoint:?}"
        )));
    }
    if config.advice.timeout_secs == 0 {
        return Err(LunaError::Config("advice.timeout_secs must be positive".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_file() {
        let config = LunaConfig::default();
        assert_eq!(config.advice.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(config.advice.timeout_secs, 30);
        assert_eq!(config.advice.api_key_env, "LUNA_API_KEY");
        assert_eq!(config.storage.key_file, None);
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[advice]
endpoint = "https://llm.example.com/v1/chat/completions"
model = "small-chat"
timeout_secs = 10
api_key_env = "MY_TOKEN"

[storage]
key_file = "/home/user/.luna/custom-key"
"#;
        let config: LunaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.advice.model, "small-chat");
        assert_eq!(config.advice.timeout_secs, 10);
        assert_eq!(config.advice.api_key_env, "MY_TOKEN");
        assert_eq!(
            config.storage.key_file,
            Some(PathBuf::from("/home/user/.luna/custom-key"))
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn partial_advice_section_keeps_defaults() {
        let config: LunaConfig = toml::from_str("[advice]\nmodel = \"x\"\n").unwrap();
        assert_eq!(config.advice.model, "x");
        assert_eq!(config.advice.timeout_secs, 30);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config: LunaConfig =
            toml::from_str("[advice]\nendpoint = \"ftp://nope\"\n").unwrap();
        assert!(matches!(validate_config(&config), Err(LunaError::Config(_))));
    }

    #[test]
    fn load_from_file_names_path_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[advice\n").unwrap();
        let err = load_config_from(&path).unwrap_err().to_string();
        assert!(err.contains("config.toml"), "{err}");
    }

    #[test]
    fn unreadable_file_is_config_error_naming_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, LunaError::Config(_)), "{err}");
        assert!(err.to_string().contains("config.toml"), "{err}");
    }
}
