use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

use crate::config::Settings;
use crate::error::Result;

use super::client::JenkinsClient;
use super::tree::{ExecutionTree, NodeKind};
use super::types::BuildDescription;

/// One resolved log download: where it comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Server-assigned node id
    pub node_id: String,
    /// Step display name
    pub display_name: String,
    /// Owning parallel branch, `_` outside any branch
    pub branch: String,
    /// Status encoding of the step
    pub icon_color: String,
    /// Output file stem, unique within one resolution
    pub filename: String,
    /// Absolute URL of the node's console-log endpoint
    pub url: Url,
}

/// Result of resolving one build.
#[derive(Debug)]
pub struct Resolution {
    /// Log-bearing targets in server document order
    pub targets: Vec<LogTarget>,
    /// Raw build description, persisted alongside the logs
    pub description: serde_json::Value,
}

/// Jenkins pipeline log provider.
///
/// Fetches a build's pipeline execution description and resolves it into
/// the ordered list of per-step log download targets.
pub struct JenkinsProvider {
    client: JenkinsClient,
}

impl JenkinsProvider {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = JenkinsClient::new(settings)?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &JenkinsClient {
        &self.client
    }

    /// Resolves the build's execution tree into log download targets.
    ///
    /// One request, no writes, no per-log fetches. Targets come back in
    /// server document order, so repeated resolutions of the same
    /// completed build return the same sequence.
    ///
    /// # Errors
    ///
    /// Fails with `NotFound` if the job or build does not exist, with
    /// `AuthRequired`/`AuthRejected` on credential problems, and with
    /// `MalformedResponse` if the payload is not the expected
    /// workflow-run shape.
    pub async fn resolve(
        &self,
        job: &str,
        build: u32,
        color_filter: Option<&str>,
    ) -> Result<Resolution> {
        let raw = self.client.fetch_build_description(job, build).await?;

        let description = BuildDescription::deserialize(&raw).map_err(|e| {
            crate::error::JenlogsError::MalformedResponse(format!(
                "Build description is not the expected shape: {e}"
            ))
        })?;

        let tree = ExecutionTree::from_build(&description)?;
        if tree.is_empty() {
            warn!("Build {job} #{build} has no pipeline step nodes");
        }
        info!("Execution tree has {} step nodes", tree.len());

        let targets = resolve_targets(&tree, self.client.base_url(), color_filter)?;
        info!("Resolved {} log targets", targets.len());

        Ok(Resolution {
            targets,
            description: raw,
        })
    }
}

/// Walks the tree in document order and emits one target per log-bearing
/// node that passes the color filter.
///
/// Sequence numbers count all action nodes, before filtering, so a
/// step's filename is stable whether or not a filter is applied.
pub fn resolve_targets(
    tree: &ExecutionTree,
    base_url: &Url,
    color_filter: Option<&str>,
) -> Result<Vec<LogTarget>> {
    if let Some(color) = color_filter {
        debug!("Filter nodes: icon_color {color}");
    }

    let mut targets = Vec::new();
    let mut sequence = 0usize;

    for node in tree.iter() {
        if node.kind != NodeKind::Action {
            continue;
        }
        sequence += 1;

        if let Some(color) = color_filter {
            if node.icon_color != color {
                continue;
            }
        }

        let branch = tree.branch_name(node);
        let filename = filename_safe(&format!(
            "{sequence:03}.{branch}.{}",
            node.display_name
        ));
        let url = super::client::node_log_url(base_url, &node.url)?;

        targets.push(LogTarget {
            node_id: node.id.clone(),
            display_name: node.display_name.clone(),
            branch,
            icon_color: node.icon_color.clone(),
            filename,
            url,
        });
    }

    Ok(targets)
}

/// Replaces characters that are awkward in filenames with `_`.
fn filename_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "-_.() ".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect()
}
