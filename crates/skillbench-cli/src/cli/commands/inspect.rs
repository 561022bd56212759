use super::super::args::{InspectArgs, OutputFormat};
use super::super::helpers::{fmt_score, load_config};
use crate::exit_codes;
use anyhow::Context;
use skillbench_core::{Extractor, TrialReport};

pub fn run(args: InspectArgs) -> anyhow::Result<i32> {
    if !args.trial_dir.is_dir() {
        anyhow::bail!("trial directory not found: {}", args.trial_dir.display());
    }
    let cfg = load_config(args.config.config.as_deref())?;
    let extractor = Extractor::new(cfg).context("failed to build model classifier")?;
    let report = extractor.inspect_trial(&args.trial_dir);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }

    if report.source.is_some() {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::NO_RESULTS)
    }
}

fn print_text(r: &TrialReport) {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    println!("trial:      {}", r.trial.display());
    println!(
        "job:        {}",
        r.job
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string())
    );
    println!("model:      {}", or_dash(r.model.as_deref()));
    println!("variant:    {}", or_dash(r.variant.as_deref()));
    println!("horizon:    {}", or_dash(r.horizon.as_deref()));
    println!("source:     {}", or_dash(r.source.map(|s| s.as_str())));
    println!("samples:    {}", r.samples);
    println!(
        "score:      {}",
        r.final_score.map_or_else(|| "-".to_string(), fmt_score)
    );
    match r.token_usage {
        Some(u) => println!(
            "tokens:     in={} cache={} out={}",
            u.input_tokens, u.cache_tokens, u.output_tokens
        ),
        None => println!("tokens:     -"),
    }
    match r.transcript_format {
        Some(f) => println!("transcript: {} ({} steps)", f.as_str(), r.transcript_steps),
        None => println!("transcript: -"),
    }
}
