use anyhow::Context;
use clap::Parser;
use colored::*;
use langusage::{
    config::Config,
    logging,
    progress,
    report,
    GitHubClient,
    UsageAnalyzer,
    UsageReport,
    Weighting,
};
use log::info;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Language usage across your GitHub repositories", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for language_usage.json and LANGUAGE_USAGE.md
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Weight languages by measured lines or by declared bytes
    #[arg(short, long)]
    weighting: Option<Weighting>,

    /// Maximum number of file contents fetched concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log level (error, warn, info, debug, trace, off); unknown values fall back to info
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(weighting) = cli.weighting {
        config.weighting = weighting;
    }
    if let Some(concurrency) = cli.concurrency {
        config.fetch.max_concurrent_fetches = concurrency;
    }
    config.validate().await.context("Invalid configuration")?;

    let client = GitHubClient::new(&config)?;
    let analyzer = UsageAnalyzer::new(client, &config);

    let pb = progress::create_spinner("Starting...", std::io::stderr().is_terminal());
    let usage = analyzer
        .run(&pb)
        .await
        .context("Failed to list repositories")?;

    let paths = report::write_all(&usage, &config.output_dir).await?;
    print_distribution(&usage);
    println!("\n{} {}", "Distribution:".bright_white().bold(), paths.distribution.display());
    println!("{} {}", "Summary:".bright_white().bold(), paths.summary.display());

    analyzer.metrics().report().await;
    info!("Done");
    Ok(())
}

fn print_distribution(usage: &UsageReport) {
    println!(
        "\n{} ({} repositories, weighted by {})",
        "Language usage".bright_green().bold(),
        usage.repositories.len(),
        usage.weighting
    );

    if usage.distribution.is_empty() {
        println!("  {}", "No weighted data collected.".yellow());
        return;
    }

    for (language, share) in usage.distribution.ranked() {
        println!("  {} {:>6.2}%", format!("{:<20}", language).bright_cyan(), share);
    }
}
