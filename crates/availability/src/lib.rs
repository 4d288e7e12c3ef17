mod command;
mod error;
mod fetch;
pub mod prelude;
mod report;
mod resolve;
mod timestamp;
mod window;

use std::path::PathBuf;

use crate::prelude::AvailabilityError;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::{ConfigPaths, DEFAULT_CONFIG_FILE, DEFAULT_TEMPLATE_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "Resource Availability",
    version,
    about = "Reports inventory reservations for a window of time"
)]
pub struct Cli {
    /// Path to the config file, created from the template when missing
    #[arg(
        short,
        long,
        env = "RESOURCE_AVAILABILITY_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Path to the config template
    #[arg(long, default_value = DEFAULT_TEMPLATE_FILE)]
    pub template: PathBuf,

    /// Replace the config file with the template before loading it
    #[arg(
        long,
        env = "RESOURCE_AVAILABILITY_OVERWRITE_CONFIG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub overwrite_config: bool,

    #[command(subcommand)]
    pub command: Option<AvailabilityCommand>,
}

impl Cli {
    pub fn config_paths(&self) -> ConfigPaths {
        ConfigPaths {
            config_file: self.config.clone(),
            template_file: self.template.clone(),
            overwrite: self.overwrite_config,
        }
    }
}

#[derive(Subcommand, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityCommand {
    /// Query the inventory and write the availability report (default)
    #[default]
    Generate,
    /// Resolve resources and print the query window without writing anything
    Validate,
}

pub fn match_and_print(result: Result<(), AvailabilityError>) -> ! {
    match result {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!(
                "{}{}",
                "Error encountered: ".red().bold(),
                e.to_string().red()
            );
            std::process::exit(1);
        }
    }
}
