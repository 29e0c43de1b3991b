use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::Settings;
use crate::download;
use crate::jenkins::JenkinsProvider;
use crate::output;

#[derive(Parser)]
#[command(name = "jenlogs")]
#[command(author, version, about = "Jenkins pipeline log downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download all step logs of a build into a directory
    Fetch {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        build: BuildArgs,

        /// Directory to write log files. Must be empty, created if needed.
        #[arg(short, long)]
        outdir: PathBuf,
    },

    /// Resolve the step logs of a build without downloading anything
    List {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        build: BuildArgs,
    },
}

#[derive(Args)]
struct ServerArgs {
    /// Jenkins instance base URL
    #[arg(short, long, env = "JENKINS_URL")]
    url: Option<String>,

    /// Jenkins username for basic auth
    #[arg(short = 'U', long, env = "JENKINS_USER")]
    user: Option<String>,

    /// Jenkins API token for basic auth
    #[arg(short, long, env = "JENKINS_TOKEN")]
    token: Option<String>,
}

impl ServerArgs {
    fn into_settings(self) -> Result<Settings> {
        Ok(Settings::resolve(self.url, self.user, self.token)?)
    }
}

#[derive(Args)]
struct BuildArgs {
    /// Job name or path, e.g. "team/app"
    #[arg(short, long)]
    job: String,

    /// Build number
    #[arg(short, long)]
    build: u32,

    /// Filter steps by icon color, e.g. "red" to get only failed build steps
    #[arg(short = 'c', long, value_name = "COLOR")]
    only_icon_color: Option<String>,
}

impl Cli {
    /// Default to warnings only; `--debug` mirrors the server traffic to
    /// stderr. `RUST_LOG` overrides both.
    pub fn init_logging(&self) {
        let default_filter = if self.debug { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .init();
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Fetch {
                server,
                build,
                outdir,
            } => execute_fetch(server, build, outdir).await,
            Commands::List { server, build } => execute_list(server, build).await,
        }
    }
}

async fn execute_fetch(server: ServerArgs, build: BuildArgs, outdir: PathBuf) -> Result<()> {
    let provider = JenkinsProvider::new(server.into_settings()?)?;

    download::prepare_outdir(&outdir)?;

    info!("Resolving logs for {} #{}", build.job, build.build);
    let resolution = provider
        .resolve(&build.job, build.build, build.only_icon_color.as_deref())
        .await?;

    let info_path = outdir.join("build_info.json");
    std::fs::write(
        &info_path,
        serde_json::to_string_pretty(&resolution.description)?,
    )?;
    info!("Wrote {}", info_path.display());

    let report = download::download_all(provider.client(), &resolution.targets, &outdir).await;
    output::print_download_summary(&report);

    if !report.is_clean() {
        bail!(
            "{} of {} logs failed to download",
            report.failed.len(),
            resolution.targets.len()
        );
    }

    Ok(())
}

async fn execute_list(server: ServerArgs, build: BuildArgs) -> Result<()> {
    let provider = JenkinsProvider::new(server.into_settings()?)?;

    info!("Resolving logs for {} #{}", build.job, build.build);
    let resolution = provider
        .resolve(&build.job, build.build, build.only_icon_color.as_deref())
        .await?;

    output::print_targets(&resolution.targets);

    Ok(())
}
