//! folio-sim - replay disclosure scenarios against a simulated page

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use folio_ui::{FolioConfig, Scenario};

/// Replay a scripted scenario and report the resulting page state
#[derive(Parser, Debug)]
#[command(name = "folio-sim")]
#[command(version)]
#[command(about = "Replay disclosure and scroll scenarios against a simulated page")]
struct Cli {
    /// Scenario file (YAML, or JSON with a .json extension)
    scenario: PathBuf,
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log every engine decision
    #[arg(short, long)]
    verbose: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Take waits in real time, scaled by this factor
    #[arg(long, default_value_t = 0.0, value_parser = parse_pace)]
    pace: f64,
}

fn parse_pace(raw: &str) -> Result<f64, String> {
    let pace: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if pace.is_finite() && pace >= 0.0 {
        Ok(pace)
    } else {
        Err(format!("pace must be a finite non-negative number, got {raw}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report can be piped
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => FolioConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FolioConfig::load().context("Failed to load user config")?,
    };

    let scenario = Scenario::from_path(&cli.scenario)
        .with_context(|| format!("Failed to load scenario {}", cli.scenario.display()))?;
    tracing::info!("Replaying '{}' ({} steps)", scenario.name, scenario.steps.len());

    let report = if cli.pace > 0.0 {
        scenario.run_paced(&config, cli.pace).await?
    } else {
        scenario.run(&config)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if !report.is_success() {
        tracing::error!("{} expectation(s) failed", report.failures.len());
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_parsing() {
        assert_eq!(parse_pace("0.5"), Ok(0.5));
        assert_eq!(parse_pace("0"), Ok(0.0));
        assert!(parse_pace("inf").is_err());
        assert!(parse_pace("NaN").is_err());
        assert!(parse_pace("-2").is_err());
        assert!(parse_pace("fast").is_err());
    }

    #[test]
    fn test_cli_rejects_infinite_pace() {
        assert!(Cli::try_parse_from(["folio-sim", "s.yaml", "--pace", "inf"]).is_err());
        let cli = Cli::try_parse_from(["folio-sim", "s.yaml", "--pace", "2"]).unwrap();
        assert_eq!(cli.pace, 2.0);
    }
}
