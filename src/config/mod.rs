//! Configuration module for the Mizuki admin backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Every content path is derived from the site root unless overridden.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Default upload limit (25 MiB).
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the site repository; git commands run here
    pub site_root: PathBuf,
    /// Directory holding markdown posts (nested directories allowed)
    pub posts_dir: PathBuf,
    /// Flat directory holding uploaded media
    pub assets_dir: PathBuf,
    /// Directory holding the derived `<type>.ts` source files
    pub data_dir: PathBuf,
    /// Directory holding `<type>.json` collections and their backups
    pub json_dir: PathBuf,
    /// Site configuration document
    pub site_config_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text
    pub log_json: bool,
    /// Remote used by the one-click publish
    pub git_remote: String,
    /// Branch used by the one-click publish
    pub git_branch: String,
    /// Fixed commit message used by the one-click publish
    pub publish_message: String,
    /// Maximum accepted request body size for uploads
    pub max_upload_bytes: usize,
}

impl Config {
    /// Build a configuration whose content paths all live under `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let data_dir = root.join("src").join("data");

        Self {
            posts_dir: root.join("src").join("content").join("posts"),
            assets_dir: root.join("public").join("assets"),
            json_dir: data_dir.join("json"),
            data_dir,
            site_config_path: root.join("mizuki.config.json"),
            site_root: root,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            log_level: "info".to_string(),
            log_json: false,
            git_remote: "origin".to_string(),
            git_branch: "master".to_string(),
            publish_message: "add posts".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let site_root = env::var("MIZUKI_SITE_ROOT").unwrap_or_else(|_| "..".to_string());
        let mut config = Self::with_root(site_root);

        if let Ok(dir) = env::var("MIZUKI_POSTS_DIR") {
            config.posts_dir = dir.into();
        }
        if let Ok(dir) = env::var("MIZUKI_ASSETS_DIR") {
            config.assets_dir = dir.into();
        }
        if let Ok(dir) = env::var("MIZUKI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.json_dir = config.data_dir.join("json");
        }
        if let Ok(path) = env::var("MIZUKI_CONFIG_PATH") {
            config.site_config_path = path.into();
        }

        if let Ok(addr) = env::var("MIZUKI_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e| {
                AppError::Validation(format!("Invalid MIZUKI_BIND_ADDR {:?}: {}", addr, e))
            })?;
        }

        if let Ok(limit) = env::var("MIZUKI_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.parse().map_err(|e| {
                AppError::Validation(format!("Invalid MIZUKI_MAX_UPLOAD_BYTES {:?}: {}", limit, e))
            })?;
        }

        config.log_level = env::var("MIZUKI_LOG_LEVEL").unwrap_or(config.log_level);
        config.log_json = env::var("MIZUKI_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        config.git_remote = env::var("MIZUKI_GIT_REMOTE").unwrap_or(config.git_remote);
        config.git_branch = env::var("MIZUKI_GIT_BRANCH").unwrap_or(config.git_branch);
        config.publish_message =
            env::var("MIZUKI_PUBLISH_MESSAGE").unwrap_or(config.publish_message);

        Ok(config)
    }
}
