use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SyncError;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 60;
pub const ORDER_VOLUME_FIELD: &str = "Order Volume";
pub const TRELLO_BASE_URL: &str = "https://api.trello.com/1";

const LOCAL_CONFIG_FILE: &str = "offer-sync.toml";

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub sync: SyncConfig,
    pub sheet: SheetLayout,
    pub reclass: ReclassConfig,
    pub log: LogConfig,
    pub trello: TrelloConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    pub batch_size: usize,
    pub batch_delay_secs: u64,
    pub custom_field: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay_secs: DEFAULT_BATCH_DELAY_SECS,
            custom_field: ORDER_VOLUME_FIELD.into(),
        }
    }
}

impl SyncConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }

    pub fn validate(&self) -> std::result::Result<(), SyncError> {
        if self.batch_size == 0 {
            return Err(SyncError::InvalidConfig("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Where the offer list lives inside the workbook.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SheetLayout {
    pub extension: String,
    pub sheet_name: String,
    /// 0-based index of the header line; data starts on the next row.
    pub header_row: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            extension: "xlsm".into(),
            sheet_name: "Angebotsliste".into(),
            header_row: 9,
        }
    }
}

/// Code -> full value tables. A table present in the file replaces the default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReclassConfig {
    pub status: HashMap<String, String>,
    pub members: HashMap<String, String>,
}

impl Default for ReclassConfig {
    fn default() -> Self {
        Self {
            status: [("H", "HOT"), ("W", "WON"), ("L", "LOST")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            members: [("PS", "Pedro J Sanchez"), ("GG", "Gema Gomez")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub upload_file: PathBuf,
    pub update_file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            upload_file: PathBuf::from("trello_integration.log"),
            update_file: PathBuf::from("trello_integration_update.log"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrelloConfig {
    pub base_url: String,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            base_url: TRELLO_BASE_URL.into(),
        }
    }
}

/// API credentials, read from the environment after `.env` has been loaded.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    /// Only needed for OAuth flows; key + token auth ignores it.
    pub api_secret: Option<String>,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("token", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> std::result::Result<Self, SyncError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, SyncError> {
        let get = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());
        Ok(Self {
            api_key: get("TRELLO_API_KEY").ok_or(SyncError::MissingCredential("TRELLO_API_KEY"))?,
            api_secret: get("TRELLO_API_SECRET"),
            token: get("TRELLO_TOKEN").ok_or(SyncError::MissingCredential("TRELLO_TOKEN"))?,
        })
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("offer-sync").join("config.toml"))
}

/// Load the config file: an explicit path must exist; otherwise the local
/// `offer-sync.toml`, then the user config dir, then built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {} does not exist", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let local = PathBuf::from(LOCAL_CONFIG_FILE);
            match std::iter::once(local)
                .chain(user_config_path())
                .find(|p| p.exists())
            {
                Some(path) => path,
                None => return Ok(AppConfig::default()),
            }
        }
    };
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    config.sync.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.sync.batch_size, 100);
        assert_eq!(config.sync.batch_delay(), Duration::from_secs(60));
        assert_eq!(config.sync.custom_field, "Order Volume");
        assert_eq!(config.sheet.sheet_name, "Angebotsliste");
        assert_eq!(config.sheet.header_row, 9);
        assert_eq!(config.reclass.status.get("H").map(String::as_str), Some("HOT"));
        assert_eq!(
            config.reclass.members.get("GG").map(String::as_str),
            Some("Gema Gomez")
        );
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
            [sync]
            batch_delay_secs = 5

            [reclass.members]
            AB = "Ana Blanco"
            "#,
        )
        .unwrap();
        assert_eq!(config.sync.batch_size, 100);
        assert_eq!(config.sync.batch_delay_secs, 5);
        assert_eq!(config.reclass.members.len(), 1);
        assert_eq!(config.reclass.status.len(), 3);
        assert_eq!(config.trello.base_url, TRELLO_BASE_URL);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = parse_config("[sync]\nbatch_size = 0").unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync.toml");
        std::fs::write(&path, "[sheet]\nsheet_name = \"Offers\"\nheader_row = 0\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.sheet.sheet_name, "Offers");
        assert_eq!(config.sheet.header_row, 0);
        assert_eq!(config.sheet.extension, "xlsm");
    }

    #[test]
    fn credentials_require_key_and_token() {
        let env: HashMap<&str, &str> =
            [("TRELLO_API_KEY", "k"), ("TRELLO_TOKEN", "t")].into_iter().collect();
        let creds = Credentials::from_lookup(|n| env.get(n).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.api_key, "k");
        assert_eq!(creds.token, "t");
        assert!(creds.api_secret.is_none());

        let err = Credentials::from_lookup(|n| {
            (n == "TRELLO_API_KEY").then(|| "k".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, SyncError::MissingCredential("TRELLO_TOKEN")));
    }

    #[test]
    fn credentials_debug_hides_secrets() {
        let creds = Credentials {
            api_key: "secret-key".into(),
            api_secret: None,
            token: "secret-token".into(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("secret-key"));
        assert!(!shown.contains("secret-token"));
    }
}
