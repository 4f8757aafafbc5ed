//! CLI interface for the resume matcher

use crate::config::{EmbeddingBackendKind, OutputFormat};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Score resumes against a job description")]
#[command(long_about = "Rank resumes by semantic similarity to a job description, boosted by shared skill keywords")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match one or more resumes against a job description
    #[command(group(ArgGroup::new("job_source").required(true).args(["job", "job_text"])))]
    Match {
        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Resume files to score (PDF, DOCX, TXT, MD)
        #[arg(short, long, num_args = 1.., required = true)]
        resume: Vec<PathBuf>,

        /// Embedding model id or Hugging Face repo
        #[arg(short, long)]
        embedding: Option<String>,

        /// Embedding backend: model2vec, hashing
        #[arg(short, long)]
        backend: Option<String>,

        /// Show scores breakdown and keyword differences
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or to a generated file name inside a directory
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Per-resume timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Maximum resumes scored in parallel
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Embedding model management
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download a model into the models directory
    Download {
        /// Model id, display name or Hugging Face repo id
        model: String,
    },

    /// Show model information
    Info {
        /// Model id
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

pub fn parse_backend(backend: &str) -> Result<EmbeddingBackendKind, String> {
    match backend.to_lowercase().as_str() {
        "model2vec" | "m2v" => Ok(EmbeddingBackendKind::Model2Vec),
        "hashing" | "hash" => Ok(EmbeddingBackendKind::Hashing),
        _ => Err(format!(
            "Invalid embedding backend: {}. Supported: model2vec, hashing",
            backend
        )),
    }
}
