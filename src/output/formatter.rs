//! Output formatters for match reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use crate::processing::batch::ResumeOutcome;
use crate::processing::matcher::MatchResult;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting match reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors and a keyword diff table
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_strength_badge(&self, strength: MatchStrength) -> String {
        let color = match strength {
            MatchStrength::Strong => Color::Green,
            MatchStrength::Moderate => Color::Yellow,
            MatchStrength::Weak => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", strength.label().color(color).bold())
        } else {
            format!("[{}]", strength.label())
        }
    }

    fn format_result(&self, result: &MatchResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "  Semantic similarity: {:.4}\n",
            result.semantic_score
        ));
        output.push_str(&format!(
            "  Keyword boost: {:.2}\n",
            result.keyword_score
        ));

        if result.common_keywords.is_empty() {
            output.push_str(&format!(
                "  Boost keywords found: {}\n",
                self.colorize("none", Color::BrightBlack)
            ));
        } else {
            output.push_str(&format!(
                "  Boost keywords found: {}\n",
                self.colorize(&result.common_keywords.join(", "), Color::Green)
            ));
        }
        output
    }

    fn format_diff_table(&self, table: &DiffTable) -> String {
        let job_header = "Only in job description";
        let resume_header = "Only in resume";
        let width = table
            .rows
            .iter()
            .map(|row| row.only_in_job.chars().count())
            .chain(std::iter::once(job_header.len()))
            .max()
            .unwrap_or(job_header.len());

        let mut output = String::new();
        output.push_str(&format!(
            "  {:<width$} | {}\n",
            self.colorize(job_header, Color::Cyan),
            self.colorize(resume_header, Color::Cyan),
            width = width + self.color_padding(job_header, Color::Cyan)
        ));
        output.push_str(&format!("  {}-+-{}\n", "-".repeat(width), "-".repeat(resume_header.len())));
        for row in &table.rows {
            output.push_str(&format!(
                "  {:<width$} | {}\n",
                row.only_in_job,
                row.only_in_resume,
                width = width
            ));
        }
        output
    }

    // Escape codes count toward `{:<width$}`, so widen by their length.
    fn color_padding(&self, text: &str, color: Color) -> usize {
        self.colorize(text, color).len() - text.len()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms
        ));
        output.push_str(&format!(
            "Job: {} | Model: {}\n",
            report.job_source, report.embedding_model
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Resumes: {} | Matched: {} | Failed: {} | Skipped: {}\n",
            report.summary.total, report.summary.matched, report.summary.failed, report.summary.skipped
        ));
        if let Some(best) = report.summary.best_score {
            output.push_str(&format!("Best score: {:.2}%\n", best));
        }

        output.push_str(&self.format_header("Results", 2));
        for (index, entry) in report.entries.iter().enumerate() {
            match &entry.outcome {
                ResumeOutcome::Matched { result } => {
                    let badge = entry
                        .strength
                        .map(|s| self.format_strength_badge(s))
                        .unwrap_or_default();
                    output.push_str(&format!(
                        "{}. {} {:.2}% {}\n",
                        index + 1,
                        self.colorize(&entry.name, Color::White),
                        result.final_score,
                        badge
                    ));

                    if self.detailed {
                        output.push_str(&self.format_result(result));
                        if let Some(table) = &entry.keyword_diff {
                            output.push('\n');
                            output.push_str(&self.format_diff_table(table));
                        }
                        output.push('\n');
                    }
                }
                ResumeOutcome::Failed { error } => {
                    output.push_str(&format!(
                        "{}. {} {}\n",
                        index + 1,
                        self.colorize(&entry.name, Color::White),
                        self.colorize(&format!("failed: {}", error), Color::Red)
                    ));
                }
                ResumeOutcome::Skipped => {
                    output.push_str(&format!(
                        "{}. {} {}\n",
                        index + 1,
                        self.colorize(&entry.name, Color::White),
                        self.colorize("skipped (cancelled)", Color::BrightBlack)
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_strength_badge(strength: MatchStrength) -> &'static str {
        match strength {
            MatchStrength::Strong => "🟢 Great Match",
            MatchStrength::Moderate => "🟡 Moderate Match",
            MatchStrength::Weak => "🔴 Poor Match",
        }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.processing_time_ms
            ));
            output.push_str(&format!(
                "**Job:** `{}` | **Model:** `{}`\n\n",
                report.job_source, report.embedding_model
            ));
        }

        output.push_str("## Ranking\n\n");
        output.push_str("| # | Resume | Score | Semantic | Keywords | Verdict |\n");
        output.push_str("|---|--------|-------|----------|----------|---------|\n");
        for (index, entry) in report.entries.iter().enumerate() {
            let name = Self::escape_cell(&entry.name);
            match &entry.outcome {
                ResumeOutcome::Matched { result } => {
                    let verdict = entry
                        .strength
                        .map(Self::markdown_strength_badge)
                        .unwrap_or_default();
                    output.push_str(&format!(
                        "| {} | {} | {:.2}% | {:.4} | {:.2} | {} |\n",
                        index + 1,
                        name,
                        result.final_score,
                        result.semantic_score,
                        result.keyword_score,
                        verdict
                    ));
                }
                ResumeOutcome::Failed { error } => {
                    output.push_str(&format!(
                        "| {} | {} | - | - | - | ❌ {} |\n",
                        index + 1,
                        name,
                        Self::escape_cell(error)
                    ));
                }
                ResumeOutcome::Skipped => {
                    output.push_str(&format!("| {} | {} | - | - | - | ⏭ Skipped |\n", index + 1, name));
                }
            }
        }
        output.push('\n');

        for entry in &report.entries {
            let (Some(result), Some(table)) = (entry.result(), &entry.keyword_diff) else {
                continue;
            };

            output.push_str(&format!("## {}\n\n", entry.name));
            if !result.common_keywords.is_empty() {
                output.push_str(&format!(
                    "**Boost keywords found:** {}\n\n",
                    result
                        .common_keywords
                        .iter()
                        .map(|k| format!("`{}`", k))
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            output.push_str("| Only in job description | Only in resume |\n");
            output.push_str("|-------------------------|----------------|\n");
            for row in &table.rows {
                output.push_str(&format!(
                    "| {} | {} |\n",
                    Self::escape_cell(&row.only_in_job),
                    Self::escape_cell(&row.only_in_resume)
                ));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "job".to_string());

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_matches{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_matches{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_matches{}.md", base_name, timestamp_suffix),
    }
}

/// Where to write a report; a directory gets a generated file name.
pub fn resolve_save_path(path: &Path, format: &OutputFormat, job_source: &str) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format, job_source, true))
    } else {
        path.to_path_buf()
    }
}
