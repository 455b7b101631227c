use crate::error::{AcgetError, Result};
use serde::Deserialize;

const API_BASE: &str = "https://api.appcenter.ms/v0.1";

/// One entry from the distribution-group release listing.
///
/// Only the fields this tool needs; App Center returns many more.
#[derive(Debug, Deserialize, Clone)]
pub struct ReleaseSummary {
    pub id: u64,
    pub uploaded_at: String,
}

/// Release-detail response before required-field validation.
#[derive(Debug, Deserialize)]
struct RawReleaseDetail {
    download_url: Option<String>,
    #[serde(rename = "fileExtension")]
    file_extension: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReleaseDetail {
    pub download_url: String,
    pub file_extension: String,
    pub version: String,
}

impl RawReleaseDetail {
    fn validate(self) -> Result<ReleaseDetail> {
        Ok(ReleaseDetail {
            download_url: self
                .download_url
                .ok_or(AcgetError::ReleaseFieldMissing {
                    field: "download_url",
                })?,
            file_extension: self
                .file_extension
                .ok_or(AcgetError::ReleaseFieldMissing {
                    field: "fileExtension",
                })?,
            version: self
                .version
                .ok_or(AcgetError::ReleaseFieldMissing { field: "version" })?,
        })
    }
}

/// Select the newest release from a listing. Identifiers are unique, so
/// the maximum id wins regardless of response ordering.
pub fn latest_release(releases: &[ReleaseSummary]) -> Result<&ReleaseSummary> {
    releases
        .iter()
        .max_by_key(|r| r.id)
        .ok_or(AcgetError::ReleaseListEmpty)
}

pub struct AppCenterClient {
    client: reqwest::blocking::Client,
    api_token: String,
    base_url: String,
}

impl AppCenterClient {
    pub fn new(api_token: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("acget/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_token,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn get_releases(
        &self,
        owner_name: &str,
        app_name: &str,
        group_name: &str,
    ) -> Result<Vec<ReleaseSummary>> {
        let url = format!(
            "{}/apps/{owner_name}/{app_name}/distribution_groups/{group_name}/releases",
            self.base_url
        );
        let body = self.get_text(&url)?;
        let releases: Vec<ReleaseSummary> = serde_json::from_str(&body)
            .map_err(|_| AcgetError::ReleaseFieldMissing { field: "id" })?;
        Ok(releases)
    }

    pub fn get_release(
        &self,
        owner_name: &str,
        app_name: &str,
        group_name: &str,
        release_id: u64,
    ) -> Result<ReleaseDetail> {
        let url = format!(
            "{}/apps/{owner_name}/{app_name}/distribution_groups/{group_name}/releases/{release_id}",
            self.base_url
        );
        let body = self.get_text(&url)?;
        let raw: RawReleaseDetail = serde_json::from_str(&body)
            .map_err(|_| AcgetError::ReleaseFieldMissing { field: "version" })?;
        raw.validate()
    }

    /// GET with the API token header; non-success statuses surface the
    /// raw response body for API-side diagnostics.
    fn get_text(&self, url: &str) -> Result<String> {
        log::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .header("X-API-Token", &self.api_token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcgetError::Http {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        Ok(response.text()?)
    }
}
