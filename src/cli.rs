use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{self, AppConfig, Credentials, SyncConfig};
use crate::logging;
use crate::providers::trello::TrelloProvider;
use crate::sync::{self, batch::TokioPause, update, UploadRequest};

pub const COMPLETION_BANNER: &str = "OLE OLE LOS CARACOLEEE \nUploading process completed successfully!";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Create Trello cards from the offer list spreadsheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create one card per offer row on the given list.
    Upload(UploadArgs),
    /// Resolve a board and print its lists.
    Update(UpdateArgs),
}

#[derive(clap::Args, Debug)]
pub struct UploadArgs {
    /// Name of the Trello board.
    #[arg(long = "board_name")]
    pub board_name: String,

    /// Name of the Trello list.
    #[arg(long = "list_name")]
    pub list_name: String,

    /// Folder holding the offer list workbook.
    #[arg(long = "input_folder", default_value = "input")]
    pub input_folder: PathBuf,

    /// Rows per batch.
    #[arg(long = "batch_size")]
    pub batch_size: Option<usize>,

    /// Seconds to wait between batches.
    #[arg(long = "batch_delay")]
    pub batch_delay: Option<u64>,

    /// Configuration file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl UploadArgs {
    fn apply(&self, sync: &mut SyncConfig) {
        if let Some(size) = self.batch_size {
            sync.batch_size = size;
        }
        if let Some(delay) = self.batch_delay {
            sync.batch_delay_secs = delay;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Name of the Trello board.
    #[arg(long = "board_name")]
    pub board_name: String,

    /// Configuration file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(cli: Cli, env_file: dotenvy::Result<PathBuf>) -> Result<()> {
    match cli.command {
        Command::Upload(args) => handle_upload(args, env_file).await,
        Command::Update(args) => handle_update(args, env_file).await,
    }
}

fn log_env_file(env_file: dotenvy::Result<PathBuf>) {
    match env_file {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Could not load .env file: {e}"),
    }
}

fn provider_for(config: &AppConfig) -> Result<TrelloProvider> {
    let credentials = Credentials::from_env()?;
    Ok(TrelloProvider::new(&credentials, config.trello.base_url.as_str()))
}

pub async fn handle_upload(args: UploadArgs, env_file: dotenvy::Result<PathBuf>) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    args.apply(&mut config.sync);
    config.sync.validate()?;

    logging::init_file_logging(&config.log.upload_file)?;
    log_env_file(env_file);

    let provider = provider_for(&config)?;
    let request = UploadRequest {
        board_name: &args.board_name,
        list_name: &args.list_name,
        input_folder: &args.input_folder,
    };
    let report = sync::upload(&provider, &config, &request, &TokioPause).await?;

    println!("{COMPLETION_BANNER}");
    println!("{}", report.summary());
    info!("{}", report.summary());
    let attention = report.failed_offers();
    if !attention.is_empty() {
        println!("Rows needing attention: {}", attention.join(", "));
    }
    info!("Uploading process completed successfully!");
    Ok(())
}

pub async fn handle_update(args: UpdateArgs, env_file: dotenvy::Result<PathBuf>) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    logging::init_file_logging(&config.log.update_file)?;
    log_env_file(env_file);

    let provider = provider_for(&config)?;
    let (board, lists) = update::enumerate_lists(&provider, &args.board_name).await?;

    println!("Lists on board '{}':", board.name);
    for list in &lists {
        println!("  {} ({})", list.name, list.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("offer-sync").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_requires_board_and_list() {
        assert!(parse(&["upload", "--board_name", "Sales"]).is_err());
        assert!(parse(&["upload", "--list_name", "Offers"]).is_err());
    }

    #[test]
    fn upload_defaults_input_folder() {
        let cli = parse(&["upload", "--board_name", "Sales", "--list_name", "Offers"]).unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.board_name, "Sales");
        assert_eq!(args.list_name, "Offers");
        assert_eq!(args.input_folder, PathBuf::from("input"));
        assert_eq!(args.batch_size, None);
    }

    #[test]
    fn upload_flags_override_sync_settings() {
        let cli = parse(&[
            "upload",
            "--board_name",
            "Sales Board",
            "--list_name",
            "Neue Angebote",
            "--input_folder",
            "/data/in",
            "--batch_size",
            "25",
            "--batch_delay",
            "5",
        ])
        .unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        let mut sync = SyncConfig::default();
        args.apply(&mut sync);
        assert_eq!(sync.batch_size, 25);
        assert_eq!(sync.batch_delay_secs, 5);
        assert_eq!(args.board_name, "Sales Board");
        assert_eq!(args.input_folder, PathBuf::from("/data/in"));
    }

    #[test]
    fn update_takes_only_board_name() {
        let cli = parse(&["update", "--board_name", "Sales"]).unwrap();
        assert!(matches!(cli.command, Command::Update(ref a) if a.board_name == "Sales"));
        assert!(parse(&["update"]).is_err());
        assert!(parse(&["update", "--board_name", "Sales", "--list_name", "x"]).is_err());
    }
}
