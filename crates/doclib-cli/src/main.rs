use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use doclib_core::Config;
use tracing::error;

mod logging;
mod package;
mod upload;

#[derive(Parser, Debug)]
#[command(name = "doclib", version, about = "Document library audit and deployment tools")]
struct Cli {
    /// TOML config file. Built-in defaults apply when omitted.
    #[arg(long, global = true, env = "DOCLIB_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare `type=` references in the catalog markup with metadata ids.
    AuditTypes {
        #[arg(long)]
        markup: Option<PathBuf>,
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Exit 1 when either side has ids the other lacks.
        #[arg(long)]
        fail_on_mismatch: bool,
    },
    /// Check that every template-based document has its template file.
    AuditTemplates {
        #[arg(long)]
        metadata: Option<PathBuf>,
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Exit 1 when any template file is missing.
        #[arg(long)]
        fail_on_mismatch: bool,
    },
    /// Upload every library PDF to remote storage.
    Upload {
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Stage the library into a local deployment package.
    Package {
        #[arg(long)]
        package_dir: Option<PathBuf>,
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

impl Command {
    fn log_file(&self, config: &Config) -> Option<PathBuf> {
        match self {
            Command::Upload { log_file } => {
                Some(log_file.clone().unwrap_or_else(|| config.logging.upload_log.clone()))
            }
            Command::Package { log_file, .. } => {
                Some(log_file.clone().unwrap_or_else(|| config.logging.package_log.clone()))
            }
            Command::AuditTypes { .. } | Command::AuditTemplates { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init(None);
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(cli.command.log_file(&config).as_deref()) {
        eprintln!("doclib: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, config: &Config) -> anyhow::Result<ExitCode> {
    match command {
        Command::AuditTypes {
            markup,
            metadata,
            fail_on_mismatch,
        } => {
            let markup = markup.unwrap_or_else(|| config.catalog.markup.clone());
            let metadata = metadata.unwrap_or_else(|| config.catalog.metadata.clone());
            let report = doclib_audit::run_type_audit(&markup, &metadata)
                .context("type audit failed")?;
            print!("{}", report.render());
            Ok(exit_for(fail_on_mismatch && !report.is_consistent()))
        }
        Command::AuditTemplates {
            metadata,
            templates,
            fail_on_mismatch,
        } => {
            let metadata = metadata.unwrap_or_else(|| config.catalog.metadata.clone());
            let templates = templates.unwrap_or_else(|| config.catalog.templates.clone());
            let report = doclib_audit::run_template_audit(
                &metadata,
                &templates,
                &config.catalog.template_extension,
            )
            .context("template audit failed")?;
            print!("{}", report.render());
            Ok(exit_for(fail_on_mismatch && !report.is_complete()))
        }
        Command::Upload { .. } => upload::run(config).await,
        Command::Package { package_dir, .. } => {
            let package_dir = package_dir.unwrap_or_else(|| config.package.dir.clone());
            package::run(config, &package_dir)
        }
    }
}

fn exit_for(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
