mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::DownloadProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_download_summary, print_targets};

/// Prints the jenlogs banner to stderr.
///
/// Displays the tool name, version, and description at the start of
/// execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🪵 jenlogs"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Jenkins pipeline log downloader")
    );
}
