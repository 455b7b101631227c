use crate::error::{AcgetError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Validated contents of the `appcenter-secrets.json` settings file.
///
/// Loaded once at startup; every stage of the pipeline borrows from it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_token: String,
    pub app_secret: String,
    pub owner_name: String,
    pub app_name: String,
    pub distribution_group_name: String,
    pub distribution_group_id: String,
    pub download_path: PathBuf,
    pub installer_filetype: String,
    pub installer_args: Option<String>,
}

/// Raw shape of the settings document before required-key validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    api_token: Option<String>,
    app_secret: Option<String>,
    owner_name: Option<String>,
    app_name: Option<String>,
    distribution_group_name: Option<String>,
    distribution_group_id: Option<String>,
    download_path: Option<String>,
    installer_filetype: Option<String>,
    installer_args: Option<String>,
}

fn require(value: Option<String>, key: &'static str) -> Result<String> {
    value.ok_or(AcgetError::ConfigIncomplete { key })
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AcgetError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let raw: RawSettings =
            serde_json::from_str(&content).map_err(|e| AcgetError::ConfigMalformed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Settings {
            api_token: require(raw.api_token, "api_token")?,
            app_secret: require(raw.app_secret, "app_secret")?,
            owner_name: require(raw.owner_name, "owner_name")?,
            app_name: require(raw.app_name, "app_name")?,
            distribution_group_name: require(
                raw.distribution_group_name,
                "distribution_group_name",
            )?,
            distribution_group_id: require(raw.distribution_group_id, "distribution_group_id")?,
            download_path: PathBuf::from(require(raw.download_path, "download_path")?),
            installer_filetype: require(raw.installer_filetype, "installer_filetype")?,
            installer_args: raw.installer_args,
        })
    }

    /// Local path for a downloaded artifact: `{download_path}/{version}.{extension}`.
    pub fn artifact_path(&self, version: &str, extension: &str) -> PathBuf {
        self.download_path.join(format!("{version}.{extension}"))
    }

    /// Destination directory for extracted archives: `{download_path}/{version} Unzipped`.
    pub fn unzip_dir(&self, version: &str) -> PathBuf {
        self.download_path.join(format!("{version} Unzipped"))
    }
}
