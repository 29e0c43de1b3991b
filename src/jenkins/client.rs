use log::debug;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::auth::Credentials;
use crate::config::Settings;
use crate::error::{JenlogsError, Result};

/// Jenkins REST API client.
///
/// Performs plain GET requests against the JSON API; basic-auth
/// credentials, when configured, are attached to every request.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl JenkinsClient {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("jenlogs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| JenlogsError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url,
            credentials: settings.credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(credentials) = &self.credentials {
            credentials.apply(request)
        } else {
            request
        }
    }

    /// Fetches the raw build description (`api/json?depth=2`).
    ///
    /// Depth 2 is what makes the server inline the flow-graph nodes.
    pub async fn fetch_build_description(
        &self,
        job: &str,
        build: u32,
    ) -> Result<serde_json::Value> {
        let url = self
            .base_url
            .join(&build_path(job, build))
            .and_then(|u| u.join("api/json?depth=2"))
            .map_err(|e| JenlogsError::Config(format!("Invalid build URL: {e}")))?;
        debug!("Query: {url}");

        let response = self.auth_request(self.client.get(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(JenlogsError::NotFound {
                job: job.to_string(),
                build,
            }),
            StatusCode::UNAUTHORIZED => Err(JenlogsError::AuthRequired),
            StatusCode::FORBIDDEN => Err(JenlogsError::AuthRejected),
            status if !status.is_success() => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                Err(JenlogsError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
            _ => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| {
                    JenlogsError::MalformedResponse(format!(
                        "Build description is not valid JSON: {e}"
                    ))
                })
            }
        }
    }

    /// Fetches one node's console log page.
    ///
    /// Returns `None` on 404: the node exists but produced no console
    /// output of its own.
    pub async fn fetch_node_log(&self, log_url: &Url) -> Result<Option<String>> {
        debug!("Query: {log_url}");

        let response = self
            .auth_request(self.client.get(log_url.clone()))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("No log file for {log_url}");
                Ok(None)
            }
            StatusCode::UNAUTHORIZED => Err(JenlogsError::AuthRequired),
            StatusCode::FORBIDDEN => Err(JenlogsError::AuthRejected),
            status if !status.is_success() => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                Err(JenlogsError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
            _ => Ok(Some(response.text().await?)),
        }
    }
}

/// Expands a job path into the server's URL layout.
///
/// `a/b` with build 7 becomes `job/a/job/b/7/`; folders nest the same
/// way jobs do.
pub fn build_path(job: &str, build: u32) -> String {
    let mut parts = Vec::new();
    for segment in job.split('/') {
        parts.push("job");
        parts.push(segment);
    }
    format!("{}/{build}/", parts.join("/"))
}

/// Absolute URL of a node's console-log endpoint.
///
/// Node URLs in the payload are server-relative (`/job/.../node/5/`);
/// the log endpoint hangs off them as a trailing segment.
pub fn node_log_url(base_url: &Url, node_path: &str) -> Result<Url> {
    let mut url = base_url.join(node_path).map_err(|e| {
        JenlogsError::MalformedResponse(format!("Invalid node URL {node_path}: {e}"))
    })?;

    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }

    url.join("log")
        .map_err(|e| JenlogsError::MalformedResponse(format!("Invalid node URL {node_path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_path_simple_job() {
        assert_eq!(build_path("app", 7), "job/app/7/");
    }

    #[test]
    fn test_build_path_nested_job() {
        assert_eq!(build_path("team/app/main", 42), "job/team/job/app/job/main/42/");
    }

    #[test]
    fn test_node_log_url_joins_relative_path() {
        let base = Url::parse("https://ci.example.com/jenkins/").unwrap();
        let url = node_log_url(&base, "/job/app/7/execution/node/5/").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/job/app/7/execution/node/5/log");
    }

    #[test]
    fn test_node_log_url_adds_missing_slash() {
        let base = Url::parse("https://ci.example.com/").unwrap();
        let url = node_log_url(&base, "/job/app/7/execution/node/5").unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/job/app/7/execution/node/5/log");
    }
}
