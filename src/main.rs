mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use cli::{Cli, OutputFormat};
use trackscope::config::{self, Config};
use trackscope::{analyze_file, failure_message, AnalysisError, Report};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    config
        .analysis
        .validate()
        .context("Invalid analysis configuration")?;

    log::info!("trackscope - technical audio analysis");
    log::info!(
        "Window: {:.0}s, frame size: {}, locale: {:?}",
        config.analysis.max_window_secs,
        config.analysis.frame_size,
        config.report.locale
    );

    let pb = if cli.inputs.len() > 1 {
        let pb = ProgressBar::new(cli.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
                .context("Invalid progress template")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Each file owns its decoded buffer; nothing is shared between analyses.
    let outcomes: Vec<(PathBuf, Result<Report, AnalysisError>)> = cli
        .inputs
        .par_iter()
        .map(|path| {
            log::info!("Analyzing {}", path.display());
            let outcome = analyze_file(path, &config);
            if let Some(ref pb) = pb {
                pb.inc(1);
            }
            (path.clone(), outcome)
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let multiple = outcomes.len() > 1;
    let mut failures = 0usize;

    for (i, (path, outcome)) in outcomes.iter().enumerate() {
        if multiple {
            if i > 0 {
                println!();
            }
            println!("==> {} <==", path.display());
        }

        match outcome {
            Ok(report) => print_report(report, cli.format)?,
            Err(err) if cli.strict => {
                anyhow::bail!("Failed to analyze {}: {}", path.display(), err);
            }
            Err(err) => {
                failures += 1;
                log::error!("Technical analysis failed for {}: {}", path.display(), err);
                match cli.format {
                    OutputFormat::Text => println!("{}", failure_message(err)),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::json!({ "error": failure_message(err) })
                    ),
                }
            }
        }
    }

    if failures > 0 {
        log::warn!("{} of {} file(s) could not be analyzed", failures, outcomes.len());
    }

    Ok(())
}

fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialize report")?
        ),
    }
    Ok(())
}

/// Config file (explicit, local, or user-level) with CLI flags layered on top.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match find_config_path(cli.config.as_deref()) {
        Some(path) => {
            let cfg = config::load_config(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        None => Config::default(),
    };

    if let Some(secs) = cli.window_secs {
        config.analysis.max_window_secs = secs;
    }
    if let Some(frame_size) = cli.frame_size {
        config.analysis.frame_size = frame_size;
    }
    if let Some(locale) = cli.locale {
        config.report.locale = locale;
    }

    Ok(config)
}

fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("trackscope.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("trackscope").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("trackscope").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
