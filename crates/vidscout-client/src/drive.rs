use std::path::Path;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;
use vidscout_core::error::AppError;
use vidscout_core::traits::Uploader;

use crate::config::DriveConfig;
use crate::response::{decode, send_error};

const BOUNDARY: &str = "vidscout-upload-boundary";

/// Google Drive v3 uploader.
///
/// Sends the export as a single `multipart/related` request (metadata + media)
/// authenticated with a pre-issued access token.
#[derive(Clone)]
pub struct DriveUploader {
    client: Client,
    config: DriveConfig,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

impl DriveUploader {
    pub fn new(config: DriveConfig) -> Result<Self, AppError> {
        if config.access_token.trim().is_empty() {
            return Err(AppError::ConfigError("Drive access token is empty".into()));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn metadata(&self, name: &str) -> serde_json::Value {
        match &self.config.folder_id {
            Some(folder) => serde_json::json!({ "name": name, "parents": [folder] }),
            None => serde_json::json!({ "name": name }),
        }
    }
}

impl Uploader for DriveUploader {
    async fn upload(&self, path: &Path) -> Result<String, AppError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(AppError::FileNotFound(path.to_path_buf()));
        }

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Generic(format!("Failed to read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("export.csv");

        let body = multipart_body(&self.metadata(name), &contents);
        let url = Url::parse_with_params(
            &self.config.upload_url,
            &[("uploadType", "multipart"), ("fields", "id")],
        )
        .map_err(|e| AppError::ConfigError(format!("Invalid Drive upload URL: {e}")))?;

        tracing::debug!(file = %name, bytes = contents.len(), "Uploading to Drive");
        let timeout_secs = self.config.timeout.as_secs();
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| send_error(e, timeout_secs))?;

        let file: DriveFile = decode(response, "drive upload", timeout_secs).await?;
        Ok(file.id)
    }
}

fn multipart_body(metadata: &serde_json::Value, media: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(media.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n\
             --{BOUNDARY}\r\nContent-Type: text/csv\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(media);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
