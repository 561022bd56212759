//! Shared argument types used across multiple commands.

use clap::ValueEnum;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Harness config file (default: ./skillbench.yaml when present)
    #[arg(long, env = "SKILLBENCH_CONFIG")]
    pub config: Option<PathBuf>,
}
