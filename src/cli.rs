// src/cli.rs
use crate::avatar::Persona;
use crate::config::require_env;
use crate::link_resolver::LinkResolver;
use crate::scraping::ScrapflyClient;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "interview-coach")]
#[command(about = "Mock interview server with avatar videos and recorded-answer feedback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the web server (default)
    Serve,
    /// Replace the first resolvable job link in TEXT with the posting it points to
    Resolve {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List the supported interviewer personas
    Personas,
}

impl Cli {
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}

pub fn persona_lines() -> Vec<String> {
    Persona::ALL
        .iter()
        .map(|p| format!("{:<8} presenter={} voice={}", p.display_name(), p.presenter_id(), p.voice_id()))
        .collect()
}

/// Runs the non-server subcommands.
pub async fn handle_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve => anyhow::bail!("serve is handled by the server entry point"),
        Command::Personas => {
            for line in persona_lines() {
                println!("{}", line);
            }
        }
        Command::Resolve { text } => {
            let proxy = ScrapflyClient::new(require_env("SCRAPFLY_API_KEY")?)?;
            let resolver = LinkResolver::new(Arc::new(proxy));

            let resolution = resolver.resolve_detailed(&text.join(" ")).await;
            match &resolution.source {
                Some(source) => info!("Resolved {} posting {} from {}", source.board, source.job_id, source.url),
                None => info!("No job link could be resolved, keeping the input text"),
            }
            println!("{}", resolution.text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["interview-coach"]);
        assert_eq!(cli.command(), &Command::Serve);
    }

    #[test]
    fn test_resolve_collects_words() {
        let cli = Cli::parse_from(["interview-coach", "resolve", "see", "https://uk.indeed.com/m/basecamp/viewjob?jk=1"]);
        assert_eq!(
            cli.command(),
            &Command::Resolve {
                text: vec![
                    "see".to_string(),
                    "https://uk.indeed.com/m/basecamp/viewjob?jk=1".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_resolve_requires_text() {
        assert!(Cli::try_parse_from(["interview-coach", "resolve"]).is_err());
    }

    #[test]
    fn test_persona_lines() {
        let lines = persona_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Sophia"));
        assert!(lines[2].contains("en-US-TonyNeural"));
    }
}
