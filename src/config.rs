use serde::Deserialize;
use std::path::Path;
use url::Url;

use crate::auth::{Credentials, Token};
use crate::error::{JenlogsError, Result};

/// Configuration file structure for jenlogs.
///
/// Lets users keep the server URL and credentials of their Jenkins
/// instance out of the command line. Loaded from the working directory;
/// command-line flags and environment variables take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Jenkins instance base URL
    pub url: Option<String>,

    /// Jenkins username for basic auth
    pub user: Option<String>,

    /// Jenkins API token for basic auth
    pub token: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./jenlogs.toml
    /// 3. ./jenlogs.json
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["jenlogs.toml", "jenlogs.json"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).map_err(|e| {
                JenlogsError::Config(format!(
                    "Failed to parse JSON config {}: {e}",
                    path.display()
                ))
            }),
            _ => toml::from_str(&contents).map_err(|e| {
                JenlogsError::Config(format!(
                    "Failed to parse TOML config {}: {e}",
                    path.display()
                ))
            }),
        }
    }
}

/// Resolved connection settings, passed explicitly into the client.
///
/// The resolver layers never read the process environment themselves;
/// everything they need arrives through this value.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub credentials: Option<Credentials>,
}

impl Settings {
    /// Resolves settings from command-line/environment values plus the
    /// configuration file in the working directory.
    pub fn resolve(
        url: Option<String>,
        user: Option<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let file = ConfigFile::load(None)?;
        Self::merge(url, user, token, &file)
    }

    fn merge(
        url: Option<String>,
        user: Option<String>,
        token: Option<String>,
        file: &ConfigFile,
    ) -> Result<Self> {
        let url = url.or_else(|| file.url.clone()).ok_or_else(|| {
            JenlogsError::ConfigMissing(
                "Jenkins server URL (--url, JENKINS_URL, or `url` in jenlogs.toml)".to_string(),
            )
        })?;

        let mut base_url = Url::parse(&url)
            .map_err(|e| JenlogsError::Config(format!("Invalid Jenkins URL {url}: {e}")))?;

        // Joins against the base replace the last path segment unless the
        // path ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let user = user.or_else(|| file.user.clone());
        let token = token.or_else(|| file.token.clone());

        let credentials = match (user, token) {
            (Some(username), Some(token)) => {
                Some(Credentials::new(username, Token::from(token.as_str())))
            }
            (None, None) => None,
            _ => {
                return Err(JenlogsError::Config(
                    "Both --user and --token are required for authentication".to_string(),
                ))
            }
        };

        Ok(Self {
            base_url,
            credentials,
        })
    }
}
