mod cli;

use clap::Parser;
use cli::{Cli, OutputFormat};
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;
use wavestorm::{Campaign, CampaignReport, WaveReport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Logs go to stderr, reports to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wavestorm=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = cli.output;

    let config = cli.into_config().wrap_err("Invalid campaign configuration")?;
    let campaign: Campaign = Campaign::new(config).wrap_err("Invalid campaign configuration")?;

    let report = campaign
        .run_with(|wave| print_wave(output, wave))
        .await
        .wrap_err("Campaign could not start")?;

    print_summary(output, &report)?;
    Ok(())
}

fn print_wave(output: OutputFormat, wave: &WaveReport) {
    match output {
        OutputFormat::Human => println!(
            "wave {}: launched={} failures={} unjoined={} elapsed={:.2}s",
            wave.wave_index,
            wave.launched,
            wave.failures,
            wave.unjoined,
            wave.elapsed.as_secs_f64()
        ),
        OutputFormat::Json => match serde_json::to_string(wave) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize wave report"),
        },
    }
}

fn print_summary(output: OutputFormat, report: &CampaignReport) -> Result<()> {
    match output {
        OutputFormat::Human => println!(
            "total: waves={} launched={} failures={} late_discarded={}",
            report.waves.len(),
            report.total_launched(),
            report.total_failures(),
            report.late_discarded
        ),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "waves": report.waves.len(),
                "launched": report.total_launched(),
                "failures": report.total_failures(),
                "late_discarded": report.late_discarded,
            });
            println!(
                "{}",
                serde_json::to_string(&summary).wrap_err("Failed to serialize summary")?
            );
        }
    }
    Ok(())
}
