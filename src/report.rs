use crate::analyzer::UsageReport;
use crate::error::Result;
use crate::usage::Weighting;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File name of the machine-readable distribution
pub const DISTRIBUTION_FILE: &str = "language_usage.json";
/// File name of the human-readable summary
pub const SUMMARY_FILE: &str = "LANGUAGE_USAGE.md";

const BAR_WIDTH: usize = 40;
const TOP_IMPORTS: usize = 5;

/// Paths of the written report files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// `language_usage.json`
    pub distribution: PathBuf,
    /// `LANGUAGE_USAGE.md`
    pub summary: PathBuf,
}

/// Writes the distribution and the summary into `output_dir`
pub async fn write_all(report: &UsageReport, output_dir: &Path) -> Result<ReportPaths> {
    Ok(ReportPaths {
        distribution: write_distribution(report, output_dir).await?,
        summary: write_summary(report, output_dir).await?,
    })
}

/// Writes the language -> percentage mapping as pretty JSON
pub async fn write_distribution(report: &UsageReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(DISTRIBUTION_FILE);
    let json = serde_json::to_string_pretty(&report.distribution)?;
    save_output_file(&json, &path).await?;
    Ok(path)
}

/// Writes the Markdown summary
pub async fn write_summary(report: &UsageReport, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SUMMARY_FILE);
    save_output_file(&render_summary(report), &path).await?;
    Ok(path)
}

/// Renders the Markdown summary of a run
///
/// Languages are ordered by share, largest first. Languages that have file
/// statistics but no share (zero total, or byte weighting without a declared
/// byte count) follow in name order with `-` as their share.
pub fn render_summary(report: &UsageReport) -> String {
    let mut content = String::new();
    let weighting = match report.weighting {
        Weighting::Lines => "total lines",
        Weighting::Bytes => "declared language bytes",
    };

    content.push_str("# Language Usage\n\n");
    content.push_str(&format!("- **Generated:** {}\n", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    content.push_str(&format!("- **Repositories analyzed:** {}\n", report.repositories.len()));
    content.push_str(&format!("- **Files analyzed:** {}\n", report.accumulator.total_files()));
    content.push_str(&format!("- **Weighted by:** {}\n\n", weighting));

    let mut rows: Vec<(&str, Option<f64>)> = report.distribution
        .ranked()
        .into_iter()
        .map(|(language, share)| (language, Some(share)))
        .collect();
    for language in report.accumulator.languages().keys() {
        if report.distribution.get(language).is_none() {
            rows.push((language.as_str(), None));
        }
    }

    if rows.is_empty() {
        content.push_str("No files were analyzed.\n");
        return content;
    }

    content.push_str("| Language | Share | Files | Total lines | Max lines |\n");
    content.push_str("|----------|------:|------:|------------:|----------:|\n");
    for (language, share) in &rows {
        let share = share.map_or_else(|| "-".to_string(), |s| format!("{:.2}%", s));
        let (files, total, max) = report.accumulator
            .get(language)
            .map_or((0, 0, 0), |s| (s.file_count, s.total_lines, s.max_lines));
        content.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(language), share, files, total, max
        ));
    }

    if !report.distribution.is_empty() {
        let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        content.push_str("\n## Distribution\n\n```text\n");
        for (language, share) in report.distribution.ranked() {
            content.push_str(&format!("{:<width$} {} {:>6.2}%\n", language, bar(share), share, width = width));
        }
        content.push_str("```\n");
    }

    let with_imports: Vec<_> = report.accumulator
        .languages()
        .iter()
        .filter(|(_, stats)| !stats.import_counts.is_empty())
        .collect();
    if !with_imports.is_empty() {
        content.push_str("\n## Top Imports\n");
        for (language, stats) in with_imports {
            content.push_str(&format!("\n### {}\n\n", language));
            for (import, count) in stats.top_imports(TOP_IMPORTS) {
                content.push_str(&format!("- `{}` ({})\n", import.replace('`', "'"), count));
            }
        }
    }

    content
}

fn bar(share: f64) -> String {
    let filled = ((share / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

async fn save_output_file(content: &str, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(output_path, content).await?;
    Ok(())
}
