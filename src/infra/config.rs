use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::clients::gemini::DEFAULT_API_BASE;
use crate::tools::search::DEFAULT_MODEL;

pub const DEFAULT_PORT: u16 = 3000;
pub const CONFIG_PATH_VAR: &str = "SEARCH_GATEWAY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing GEMINI_API_KEY environment variable or --apiKey flag.")]
    MissingApiKey,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Server,
    Stdio,
}

impl Mode {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" | "mcp" => Mode::Stdio,
            _ => Mode::Server,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Server => "server",
            Mode::Stdio => "stdio",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub port: u16,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Server,
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Optional TOML layer; every key may be omitted.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    mode: Option<String>,
    port: Option<u16>,
    model: Option<String>,
    api_key: Option<String>,
    api_base: Option<String>,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Defaults, then the TOML file named by `SEARCH_GATEWAY_CONFIG`, then env.
    pub fn from_env_and_toml() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(path) = env_nonempty(CONFIG_PATH_VAR) {
            cfg.merge_file(Path::new(&path))?;
        }
        cfg.merge_env();
        Ok(cfg)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(m) = file.mode {
            self.mode = Mode::parse(&m);
        }
        if let Some(p) = file.port {
            self.port = p;
        }
        if let Some(m) = file.model {
            self.model = m;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if let Some(b) = file.api_base {
            self.api_base = b;
        }
        Ok(())
    }

    fn merge_env(&mut self) {
        if let Some(m) = env_nonempty("MODE") {
            self.mode = Mode::parse(&m);
        }
        if let Some(p) = env_nonempty("PORT").and_then(|s| s.parse::<u16>().ok()) {
            self.port = p;
        }
        if let Some(m) = env_nonempty("GEMINI_MODEL") {
            self.model = m;
        }
        if let Some(k) = env_nonempty("GEMINI_API_KEY") {
            self.api_key = Some(k);
        }
        if let Some(b) = env_nonempty("GEMINI_API_BASE") {
            self.api_base = b;
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const VARS: &[&str] = &["MODE", "PORT", "GEMINI_MODEL", "GEMINI_API_KEY", "GEMINI_API_BASE", CONFIG_PATH_VAR];

    fn clear_env() {
        for v in VARS {
            std::env::remove_var(v);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_server_3000_and_default_model() {
        clear_env();
        let cfg = Config::from_env_and_toml().unwrap();
        assert_eq!(cfg.mode, Mode::Server);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert!(matches!(cfg.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    #[serial]
    fn parses_env_overrides() {
        clear_env();
        std::env::set_var("MODE", "stdio");
        std::env::set_var("PORT", "9090");
        std::env::set_var("GEMINI_MODEL", "gemini-2.5-flash");
        std::env::set_var("GEMINI_API_KEY", "secret");
        let cfg = Config::from_env_and_toml().unwrap();
        assert_eq!(cfg.mode, Mode::Stdio);
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.api_key().unwrap(), "secret");
        clear_env();
    }

    #[test]
    #[serial]
    fn env_wins_over_toml_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"stdio\"\nport = 4000\nmodel = \"gemini-2.0-flash\"\napi_key = \"from-file\"").unwrap();
        std::env::set_var(CONFIG_PATH_VAR, file.path());
        std::env::set_var("PORT", "5000");
        let cfg = Config::from_env_and_toml().unwrap();
        assert_eq!(cfg.mode, Mode::Stdio);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.api_key().unwrap(), "from-file");
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_toml_is_reported() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        std::env::set_var(CONFIG_PATH_VAR, file.path());
        let err = Config::from_env_and_toml().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        clear_env();
    }

    #[test]
    fn missing_api_key_message_names_both_sources() {
        assert_eq!(
            ConfigError::MissingApiKey.to_string(),
            "Missing GEMINI_API_KEY environment variable or --apiKey flag."
        );
    }
}
