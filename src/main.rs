//! Resume matcher: score resumes against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_matcher::config::Config;
use resume_matcher::input::InputManager;
use resume_matcher::output::{resolve_save_path, save_report_to_file, MatchReport, ReportGenerator};
use resume_matcher::processing::batch::{
    BatchMatcher, BatchOptions, CancellationFlag, ResumeMatch, ResumeOutcome,
};
use resume_matcher::processing::embedding_manager::{
    provision_model, resolve_model_id, EmbeddingModelManager,
};
use resume_matcher::processing::matcher::ResumeMatcher;
use resume_matcher::{Result, ResumeMatcherError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        if e.is_fatal() {
            error!("Fatal: {}", e);
        } else {
            error!("Command failed: {}", e);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Match {
            job,
            job_text,
            resume,
            embedding,
            backend,
            detailed,
            output,
            save,
            timeout_ms,
            concurrency,
        } => {
            if let Some(model) = embedding {
                config.models.embedding_model = model;
            }
            if let Some(backend) = backend {
                config.models.backend =
                    cli::parse_backend(&backend).map_err(ResumeMatcherError::InvalidInput)?;
            }
            if let Some(format) = output {
                config.output.format =
                    cli::parse_output_format(&format).map_err(ResumeMatcherError::InvalidInput)?;
            }
            if let Some(timeout_ms) = timeout_ms {
                config.batch.timeout_ms = timeout_ms;
            }
            if let Some(concurrency) = concurrency {
                config.batch.max_concurrency = concurrency;
            }
            config.output.detailed |= detailed;
            config.validate()?;

            run_match(config, job, job_text, resume, save).await?;
        }

        Commands::Models { action } => {
            let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Embedding Models\n");
                    for (model_id, info) in manager.list_available_models() {
                        let status = if manager.is_model_downloaded(model_id) {
                            "✅ Downloaded"
                        } else {
                            "⬇️  Available"
                        };
                        let default_marker = if resolve_model_id(&config.models.embedding_model)
                            .as_deref()
                            == Some(model_id.as_str())
                        {
                            " (default)"
                        } else {
                            ""
                        };
                        println!(
                            "  • {}{} ({}) - {} MB, {} dims [{}]",
                            model_id, default_marker, info.repo_id, info.size_mb, info.dimensions, status
                        );
                        println!("    {}", info.description);
                    }
                }

                ModelAction::Download { model } => {
                    println!("⬇️  Downloading model: {}", model);
                    let model_path = manager.download_model(&model).await?;
                    println!("✅ Model '{}' is ready", model);
                    println!("📁 Location: {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let model_id = resolve_model_id(&model)
                        .ok_or_else(|| ResumeMatcherError::ModelNotFound(model.clone()))?;
                    let info = manager
                        .get_model_info(&model_id)
                        .ok_or_else(|| ResumeMatcherError::ModelNotFound(model.clone()))?;

                    println!("📋 Model Information for '{}'\n", model_id);
                    println!("Name: {}", info.name);
                    println!("Repository: {}", info.repo_id);
                    println!("Dimensions: {}", info.dimensions);
                    println!("Size: {} MB", info.size_mb);
                    println!("Description: {}", info.description);

                    match manager.get_model_path(&model_id) {
                        Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                        None => {
                            println!("Status: ⬇️  Available for download");
                            println!("\n💡 To download this model, run:");
                            println!("   resume-matcher models download {}", model_id);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("⚙️  Current Configuration ({})\n", config_path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset: {}", config_path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }
            }
        }
    }

    Ok(())
}

async fn run_match(
    config: Config,
    job: Option<PathBuf>,
    job_text: Option<String>,
    resumes: Vec<PathBuf>,
    save: Option<PathBuf>,
) -> Result<()> {
    let mut input_manager = InputManager::new();

    let (job_source, job_description) = match (job, job_text) {
        (Some(path), _) => {
            let text = input_manager.extract_text(&path).await?;
            (path.display().to_string(), text)
        }
        (None, Some(text)) => ("inline".to_string(), text),
        (None, None) => {
            return Err(ResumeMatcherError::InvalidInput(
                "A job description is required (--job or --job-text)".to_string(),
            ))
        }
    };

    // A resume that cannot be read fails on its own; the rest still run.
    let mut inputs = Vec::with_capacity(resumes.len());
    let mut load_failures = Vec::new();
    for (index, path) in resumes.iter().enumerate() {
        match input_manager.load_resume(path).await {
            Ok(input) => inputs.push(input),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                load_failures.push((
                    index,
                    ResumeMatch {
                        name: display_name(path),
                        outcome: ResumeOutcome::Failed { error: e.to_string() },
                    },
                ));
            }
        }
    }

    if let Some(model_path) = provision_model(&config).await? {
        debug!("Using local model at {}", model_path.display());
    }

    let load_config = config.clone();
    let matcher = tokio::task::spawn_blocking(move || ResumeMatcher::from_config(&load_config))
        .await
        .map_err(|e| ResumeMatcherError::ModelLoading(format!("Model loader panicked: {}", e)))??;
    let matcher_info = matcher.info();
    info!(
        "Matcher ready: {} ({} dims, {} boost keywords)",
        matcher_info.embedding_model, matcher_info.embedding_dimension, matcher_info.boost_keyword_count
    );

    let cancel = CancellationFlag::new();
    let signal_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight resumes");
            signal_flag.cancel();
        }
    });

    let batch_matcher = BatchMatcher::new(Arc::new(matcher), BatchOptions::from_config(&config));
    let progress = create_progress_bar(inputs.len());
    let batch = batch_matcher
        .match_batch_with_progress(&job_description, inputs, &cancel, |entry| {
            progress.set_message(entry.name.clone());
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    let mut batch = batch?;
    batch.merge_failures(load_failures);
    debug!(
        "Batch finished: {} matched, {} failed, {} skipped",
        batch.matched_count(),
        batch.failed_count(),
        batch.skipped_count()
    );

    let save = save.map(|path| resolve_save_path(&path, &config.output.format, &job_source));
    let report = MatchReport::from_batch(batch, job_source);
    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(use_colors, config.output.detailed, true, true);
    let content = generator.generate_report(&report, &config.output.format)?;

    match save {
        Some(path) => {
            save_report_to_file(&content, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Progress bar over the resumes of a batch
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    match ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} resumes | {msg}") {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(e) => debug!("Invalid progress bar template: {}", e),
    }
    pb
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
