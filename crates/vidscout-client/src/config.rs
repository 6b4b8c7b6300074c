use std::fmt;
use std::time::Duration;

use vidscout_core::AppError;

pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`YouTubeClient`](crate::YouTubeClient).
#[derive(Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    /// Applied to every single request, search and detail lookups alike.
    pub timeout: Duration,
}

impl YouTubeConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigError("YouTube API key is empty".into()));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for [`DriveUploader`](crate::DriveUploader).
#[derive(Clone)]
pub struct DriveConfig {
    /// OAuth access token scoped to `drive.file`.
    pub access_token: String,
    pub upload_url: String,
    /// Parent folder for uploaded files; Drive root when `None`.
    pub folder_id: Option<String>,
    pub timeout: Duration,
}

impl DriveConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            upload_url: DEFAULT_DRIVE_UPLOAD_URL.to_string(),
            folder_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Read configuration from environment variables.
    ///
    /// - `GOOGLE_DRIVE_TOKEN` (required)
    /// - `GOOGLE_DRIVE_UPLOAD_URL` (optional, defaults to the public endpoint)
    /// - `GOOGLE_DRIVE_FOLDER_ID` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let token = var("GOOGLE_DRIVE_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("GOOGLE_DRIVE_TOKEN not set. Required for --upload.".into())
            })?;

        let mut config = Self::new(token);
        if let Some(url) = var("GOOGLE_DRIVE_UPLOAD_URL").filter(|u| !u.trim().is_empty()) {
            config = config.with_upload_url(url);
        }
        if let Some(folder) = var("GOOGLE_DRIVE_FOLDER_ID").filter(|f| !f.trim().is_empty()) {
            config = config.with_folder(folder);
        }
        Ok(config)
    }
}

impl fmt::Debug for DriveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveConfig")
            .field("access_token", &"<redacted>")
            .field("upload_url", &self.upload_url)
            .field("folder_id", &self.folder_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}
