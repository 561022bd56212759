use super::{ConfigArgs, OutputFormat};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Trial directory (the one holding verifier/ and agent/)
    pub trial_dir: PathBuf,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}
