use anyhow::Result;
use clap::Parser;
use interview_coach::cli::{handle_command, Cli, Command};
use interview_coach::config::load_env_file;
use interview_coach::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<()> {
    // .env may carry RUST_LOG and LOG_FILE, so it loads before logging starts
    load_env_file();
    init_tracing()?;

    let cli = Cli::parse();
    match cli.command() {
        Command::Serve => run_server().await,
        command => handle_command(command).await,
    }
}
