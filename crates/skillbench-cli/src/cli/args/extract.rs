use super::ConfigArgs;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Job directories to process; defaults to every job under --jobs-root
    pub dirs: Vec<PathBuf>,

    /// Only keep jobs whose directory name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Only keep trials whose task horizon matches (e.g. 10m, 8m)
    #[arg(long, env = "SKILLBENCH_HORIZON")]
    pub horizon: Option<String>,

    #[arg(long, env = "SKILLBENCH_JOBS_ROOT")]
    pub jobs_root: Option<PathBuf>,

    /// Output directory for data.json and data.js
    #[arg(long = "out", env = "SKILLBENCH_OUT")]
    pub out_dir: Option<PathBuf>,

    /// Global variable name assigned in data.js
    #[arg(long)]
    pub script_var: Option<String>,

    /// Also write one JSON file per model under <out>/models/
    #[arg(long)]
    pub per_model: bool,

    /// Skip transcript parsing (token usage still falls back to the agent log)
    #[arg(long)]
    pub no_transcripts: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}
