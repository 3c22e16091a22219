use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mollusk")]
#[command(about = "List and create mollusks over REST, or serve them locally")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Resource URL template, e.g. http://localhost\\:31415/mollusk/:id")]
    pub url_template: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Resource queried after a create")]
    pub refresh_target: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the in-memory development server
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        root: Option<String>,
    },
    /// Load the page and print the mollusk list
    List,
    /// Fill the form with key=value pairs and add a mollusk
    Add {
        #[arg(value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Fetch one mollusk
    Get { id: String },
    /// Delete one mollusk
    Remove { id: String },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

impl CliConfig {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(template) = &self.url_template {
            config.client.url_template = template.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.client.timeout_seconds = timeout;
        }
        if let Some(target) = &self.refresh_target {
            config.controller.refresh_target = target.clone();
        }
        if let Command::Serve { bind, root } = &self.command {
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
            if let Some(root) = root {
                config.server.root = root.clone();
            }
        }

        Ok(config)
    }
}
