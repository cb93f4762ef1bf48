/// # lsif-upload CLI Interface (Module)
///
/// This module implements the command-line interface for lsif-upload: argument parsing,
/// configuration assembly and the `run` entrypoint used by `main` and by integration tests.
///
/// All pipeline logic (context resolution, request building, compression, transport and
/// response handling) lives in the [`lsif-upload-core`] crate. This module is CLI glue only.
///
/// [`lsif-upload-core`]: ../../lsif-upload-core/
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lsif_upload_core::context::{UploadOptions, DEFAULT_DUMP_FILE};
use lsif_upload_core::git::GitWorkspace;
use lsif_upload_core::pipeline::{UploadPipeline, UploadReport};

use crate::browser::SystemBrowser;
use crate::load_config::load_config;

const UPLOAD_EXAMPLES: &str = "\
Examples:

  Upload an LSIF dump with explicit repo, commit, and upload files:

    $ lsif-upload upload --repo=FOO --commit=BAR --file=dump.lsif

  Upload an LSIF dump for a subproject:

    $ lsif-upload upload --root=cmd/

  Upload an LSIF dump when lsifEnforceAuth is enabled:

    $ lsif-upload upload --github-token=BAZ

  Upload an LSIF dump when the LSIF indexer does not declare a tool name:

    $ lsif-upload upload --indexer-name=lsif-elixir
";

/// CLI for lsif-upload: send LSIF dumps to a code intelligence service.
#[derive(Parser, Debug)]
#[clap(
    name = "lsif-upload",
    version,
    about = "Upload LSIF dumps to a code intelligence service"
)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// URL of the code intelligence service (overrides the config file)
    #[clap(long, global = true, env = "SRC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Access token for the service (overrides the config file)
    #[clap(long, global = true, env = "SRC_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Path to a JSON config file with `endpoint` and `accessToken` keys
    #[clap(long, global = true, env = "SRC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the equivalent curl command instead of sending the request
    #[clap(long, global = true)]
    pub get_curl: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload an LSIF dump file
    #[clap(after_help = UPLOAD_EXAMPLES)]
    Upload(UploadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// The name of the repository (e.g. github.com/gorilla/mux). By default, derived from the origin remote.
    #[clap(long)]
    pub repo: Option<String>,

    /// The 40-character hash of the commit. Defaults to the currently checked-out commit.
    #[clap(long)]
    pub commit: Option<String>,

    /// The path to the LSIF dump file.
    #[clap(long, default_value = DEFAULT_DUMP_FILE)]
    pub file: PathBuf,

    /// A GitHub access token with 'public_repo' scope that the service uses to verify you have access to the repository.
    #[clap(long)]
    pub github_token: Option<String>,

    /// The path in the repository that matches the LSIF projectRoot (e.g. cmd/project1). Defaults to the directory where the dump file is located.
    #[clap(long)]
    pub root: Option<String>,

    /// The name of the indexer that generated the dump. Overrides the 'toolInfo.name' field in the metadata vertex of the dump.
    #[clap(long, alias = "indexerName")]
    pub indexer_name: Option<String>,

    /// Open the LSIF upload page in your browser.
    #[clap(long)]
    pub open: bool,
}

impl UploadArgs {
    pub fn into_options(self, render_curl: bool) -> UploadOptions {
        UploadOptions {
            repo: self.repo,
            commit: self.commit,
            file: self.file,
            root: self.root,
            github_token: self.github_token,
            indexer_name: self.indexer_name,
            open: self.open,
            render_curl,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Upload(args) => {
            tracing::info!(command = "upload", "Starting LSIF upload");
            let options = args.into_options(cli.global.get_curl);
            let pipeline = UploadPipeline::new(config, GitWorkspace::current(), SystemBrowser);
            match pipeline.run(&options).await {
                Ok(UploadReport::Rendered(command)) => {
                    println!("{command}");
                    Ok(())
                }
                Ok(UploadReport::Uploaded(receipt)) => {
                    tracing::info!(command = "upload", artifact_id = %receipt.artifact_id, "Upload complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::debug!(command = "upload", error = %e, classification = ?e.classification(), "Upload failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}

/// Renders `err` with its chain of causes, skipping any cause whose text an earlier message
/// already includes.
pub fn error_report(err: &anyhow::Error) -> String {
    let mut report = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !report.contains(&cause) {
            report.push_str(": ");
            report.push_str(&cause);
        }
    }
    report
}
