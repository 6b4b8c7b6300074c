pub mod config;
pub mod drive;
mod response;
pub mod youtube;

pub use config::{DriveConfig, YouTubeConfig};
pub use drive::DriveUploader;
pub use youtube::YouTubeClient;
