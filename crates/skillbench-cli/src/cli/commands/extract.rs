use super::super::args::ExtractArgs;
use super::super::helpers::{empty_result_exit, fmt_score, load_config};
use crate::exit_codes;
use anyhow::Context;
use skillbench_core::{resolve_jobs, run as run_pipeline, Extractor, GroupedTable, RunOptions};

pub fn run(args: ExtractArgs) -> anyhow::Result<i32> {
    let mut cfg = load_config(args.config.config.as_deref())?;
    if let Some(root) = args.jobs_root {
        cfg.jobs_root = root;
    }
    if let Some(out) = args.out_dir {
        cfg.out_dir = out;
    }
    if let Some(var) = args.script_var {
        cfg.script_var = var;
    }

    let jobs = match resolve_jobs(&cfg.jobs_root, &args.dirs, args.filter.as_deref()) {
        Ok(jobs) => jobs,
        Err(e) => return empty_result_exit(e),
    };
    tracing::info!(jobs = jobs.len(), "selected job directories");

    let opts = RunOptions {
        out_dir: cfg.out_dir.clone(),
        script_var: cfg.script_var.clone(),
        per_model: args.per_model,
    };
    let extractor = Extractor::new(cfg)
        .context("failed to build model classifier")?
        .with_horizon(args.horizon)
        .with_transcripts(!args.no_transcripts);

    let summary = match run_pipeline(&extractor, &jobs, &opts) {
        Ok(summary) => summary,
        Err(e) => return empty_result_exit(e),
    };

    print_table(&summary.table);
    println!(
        "\n{} records from {} job(s), {} kept -> {}",
        summary.extracted,
        summary.jobs,
        summary.table.record_count(),
        summary.outputs.data_json.display()
    );
    for path in &summary.outputs.model_files {
        println!("  {}", path.display());
    }
    Ok(exit_codes::SUCCESS)
}

fn print_table(table: &GroupedTable) {
    println!(
        "{:<22} {:<16} {:>12} {:>8}  SOURCE",
        "MODEL", "VARIANT", "SCORE", "SAMPLES"
    );
    for (model, variants) in table.models() {
        for (variant, rec) in variants {
            println!(
                "{:<22} {:<16} {:>12} {:>8}  {}",
                model,
                variant,
                fmt_score(rec.final_score),
                rec.sample_count(),
                rec.source.as_str()
            );
        }
    }
}
