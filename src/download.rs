use std::path::Path;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::error::{JenlogsError, Result};
use crate::jenkins::{JenkinsClient, LogTarget};
use crate::output::DownloadProgress;

const CONSOLE_PRE_START: &str = "<pre class=\"console-output\">";
const CONSOLE_PRE_END: &str = "</pre>";

/// Outcome of the download phase.
#[derive(Debug, Default)]
pub struct DownloadReport {
    /// Targets whose log files were written
    pub written: usize,
    /// Targets whose node produced no console output (log endpoint 404)
    pub skipped: usize,
    /// Failed targets, with the error already formatted for display
    pub failed: Vec<String>,
}

impl DownloadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Creates the output directory if needed and checks that it is empty.
///
/// The check runs before any network download so a stray rerun never
/// mixes two builds' logs in one directory.
pub fn prepare_outdir(outdir: &Path) -> Result<()> {
    std::fs::create_dir_all(outdir)?;
    if std::fs::read_dir(outdir)?.next().is_some() {
        return Err(JenlogsError::Config(format!(
            "Output directory {} is not empty",
            outdir.display()
        )));
    }
    Ok(())
}

/// Downloads every target's log into `outdir`.
///
/// Downloads run concurrently; each target fails independently and is
/// reported without aborting its siblings.
pub async fn download_all(
    client: &JenkinsClient,
    targets: &[LogTarget],
    outdir: &Path,
) -> DownloadReport {
    let progress = DownloadProgress::start(targets.len());

    let progress_ref = &progress;
    let futures: Vec<_> = targets
        .iter()
        .map(|target| async move {
            let outcome = download_one(client, target, outdir).await;
            progress_ref.tick(&target.display_name);
            outcome
        })
        .collect();
    let results = join_all(futures).await;

    let mut report = DownloadReport::default();
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(true) => report.written += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                let error = JenlogsError::FetchFailed {
                    node_id: target.node_id.clone(),
                    node_name: target.display_name.clone(),
                    reason: e.to_string(),
                };
                warn!("{error}");
                report.failed.push(error.to_string());
            }
        }
    }

    progress.finish(report.written);
    report
}

/// Fetches one node's log page and writes the `.html` and `.log` files.
///
/// Returns `Ok(false)` when the node produced no console output.
async fn download_one(client: &JenkinsClient, target: &LogTarget, outdir: &Path) -> Result<bool> {
    let Some(html) = client.fetch_node_log(&target.url).await? else {
        debug!("Node {} ({}) has no log", target.node_id, target.display_name);
        return Ok(false);
    };

    let html_path = outdir.join(format!("{}.html", target.filename));
    std::fs::write(&html_path, &html)?;
    info!("Wrote {}", html_path.display());

    let log_path = outdir.join(format!("{}.log", target.filename));
    std::fs::write(&log_path, extract_console_text(&html))?;
    info!("Wrote {}", log_path.display());

    Ok(true)
}

/// Pulls the console text out of the log page's `<pre>` element.
///
/// Falls back to the whole body when the markers are absent, so a
/// changed page layout degrades to a noisier log instead of an empty
/// file.
fn extract_console_text(html: &str) -> &str {
    let Some(start) = html.find(CONSOLE_PRE_START) else {
        return html;
    };
    let body = &html[start + CONSOLE_PRE_START.len()..];
    match body.find(CONSOLE_PRE_END) {
        Some(end) => &body[..end],
        None => body,
    }
}
