use clap::{Parser, Subcommand};

pub mod common;
pub mod extract;
pub mod inspect;
pub use common::*;
pub use extract::*;
pub use inspect::*;

#[derive(Parser)]
#[command(
    name = "skillbench",
    version,
    about = "Collect benchmark trial results into a best-run table for the results viewer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract every trial under the selected jobs and write data.json/data.js
    Extract(ExtractArgs),
    /// Show how a single trial directory would be read and classified
    Inspect(InspectArgs),
    Version,
}

#[cfg(test)]
mod tests;
