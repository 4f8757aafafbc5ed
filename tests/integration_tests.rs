//! Integration tests for the resume matcher

use resume_matcher::config::{Config, EmbeddingBackendKind, OutputFormat};
use resume_matcher::input::InputManager;
use resume_matcher::output::{MatchReport, MatchStrength, ReportGenerator};
use resume_matcher::processing::batch::{BatchMatcher, BatchOptions, CancellationFlag, ResumeOutcome};
use resume_matcher::processing::matcher::ResumeMatcher;
use resume_matcher::ResumeMatcherError;
use std::path::Path;
use std::sync::Arc;

fn hashing_config() -> Config {
    let mut config = Config::default();
    config.models.backend = EmbeddingBackendKind::Hashing;
    config.models.hashing_dimension = 512;
    config
}

fn hashing_matcher() -> ResumeMatcher {
    ResumeMatcher::from_config(&hashing_config()).unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Machine Learning Engineer"));
    assert!(text.contains("FastAPI"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Jane Doe"));
    assert!(text.contains("spaCy"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_text_extraction_from_docx() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.docx");

    let text = manager.extract_text(path).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Jane Doe");
    assert_eq!(lines[1], "Machine Learning Engineer");
    assert_eq!(lines[2], "");
    assert_eq!(lines.last(), Some(&"Python, Flask, FastAPI, TensorFlow, spaCy, NLP"));
    assert!(!text.contains("<w:"));
}

#[tokio::test]
async fn test_match_docx_resume() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let input = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.docx"))
        .await
        .unwrap();
    assert_eq!(input.name, "sample_resume.docx");

    let result = hashing_matcher().match_resume(&job, &input.text).unwrap();
    assert_eq!(
        result.common_keywords,
        vec!["python", "flask", "fastapi", "tensorflow", "nlp"]
    );
    assert!((result.keyword_score - 0.625).abs() < 1e-9);
    assert!(result.final_score > 0.0);
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();

    let err = manager
        .extract_text(Path::new("tests/fixtures/unsupported.xyz"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeMatcherError::UnsupportedFormat(_)));

    // Suffix is checked before the file is looked up
    let err = manager
        .extract_text(Path::new("tests/fixtures/missing.odt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeMatcherError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let err = manager
        .extract_text(Path::new("tests/fixtures/nonexistent.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, ResumeMatcherError::InvalidInput(_)));
}

#[tokio::test]
async fn test_load_resume_uses_file_name() {
    let mut manager = InputManager::new();
    let input = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.md"))
        .await
        .unwrap();
    assert_eq!(input.name, "sample_resume.md");
    assert!(input.text.contains("FastAPI"));
}

#[tokio::test]
async fn test_match_fixture_resume() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let result = hashing_matcher().match_resume(&job, &resume).unwrap();

    assert_eq!(
        result.common_keywords,
        vec!["python", "flask", "fastapi", "tensorflow", "nlp"]
    );
    assert!((result.keyword_score - 0.625).abs() < 1e-9);
    assert!(result.semantic_score > 0.0);

    let expected = ((result.semantic_score * 0.8 + result.keyword_score * 0.2) * 100.0 * 100.0)
        .round()
        / 100.0;
    assert!((result.final_score - expected).abs() < 1e-9);

    let diff = result.keyword_diff();
    assert!(diff.only_in_job.contains("looking"));
    assert!(diff.only_in_resume.contains("docker"));
    assert!(!diff.only_in_job.contains("python"));
}

#[tokio::test]
async fn test_batch_ranks_fixture_resumes() {
    let mut manager = InputManager::new();
    let job = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();

    let mut inputs = Vec::new();
    for path in [
        "tests/fixtures/chef_resume.txt",
        "tests/fixtures/sample_resume.txt",
        "tests/fixtures/sample_resume.md",
    ] {
        inputs.push(manager.load_resume(Path::new(path)).await.unwrap());
    }

    let config = hashing_config();
    let batch_matcher = BatchMatcher::new(
        Arc::new(ResumeMatcher::from_config(&config).unwrap()),
        BatchOptions::from_config(&config),
    );
    let batch = batch_matcher
        .match_batch(&job, inputs, &CancellationFlag::new())
        .await
        .unwrap();

    let names: Vec<&str> = batch.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["chef_resume.txt", "sample_resume.txt", "sample_resume.md"]);
    assert_eq!(batch.matched_count(), 3);
    assert_eq!(batch.embedding_model, "hashing-512");

    let report = MatchReport::from_batch(batch, "tests/fixtures/job_description.txt");
    assert_eq!(report.entries.last().unwrap().name, "chef_resume.txt");
    let chef = report.entries.last().unwrap().result().unwrap();
    assert!(chef.common_keywords.is_empty());
    assert_eq!(chef.keyword_score, 0.0);
    assert_eq!(report.entries[2].strength, Some(MatchStrength::Weak));

    let scores: Vec<f64> = report
        .entries
        .iter()
        .filter_map(|e| e.result())
        .map(|r| r.final_score)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_cancelled_batch_skips_everything() {
    let config = hashing_config();
    let batch_matcher = BatchMatcher::new(
        Arc::new(ResumeMatcher::from_config(&config).unwrap()),
        BatchOptions::from_config(&config),
    );
    let cancel = CancellationFlag::new();
    cancel.cancel();

    let inputs = vec![
        resume_matcher::ResumeInput::new("a.txt", "python developer"),
        resume_matcher::ResumeInput::new("b.txt", "flask developer"),
    ];
    let batch = batch_matcher
        .match_batch("python flask developer", inputs, &cancel)
        .await
        .unwrap();

    assert_eq!(batch.skipped_count(), 2);
    assert!(batch
        .entries
        .iter()
        .all(|e| matches!(e.outcome, ResumeOutcome::Skipped)));
}

#[tokio::test]
async fn test_report_renders_in_every_format() {
    let matcher = hashing_matcher();
    let job = "Python developer with Flask and NLP";
    let resume = "Python engineer, Flask services, NLP pipelines";

    let config = hashing_config();
    let batch = BatchMatcher::new(Arc::new(matcher), BatchOptions::from_config(&config))
        .match_batch(
            job,
            vec![resume_matcher::ResumeInput::new("jane.txt", resume)],
            &CancellationFlag::new(),
        )
        .await
        .unwrap();
    let report = MatchReport::from_batch(batch, "inline");
    let generator = ReportGenerator::with_options(false, true, true, true);

    let console = generator.generate_report(&report, &OutputFormat::Console).unwrap();
    assert!(console.contains("jane.txt"));
    assert!(console.contains("Boost keywords found: python, flask, nlp"));

    let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["entries"][0]["name"], "jane.txt");
    assert_eq!(value["job_source"], "inline");

    let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
    assert!(markdown.contains("## jane.txt"));
    assert!(markdown.contains("| Only in job description | Only in resume |"));
}

#[test]
fn test_config_round_trip_through_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = hashing_config();
    config.batch.max_concurrency = 2;
    config.save_to(&path).unwrap();

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.models.backend, EmbeddingBackendKind::Hashing);
    assert_eq!(loaded.batch.max_concurrency, 2);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(err.is_fatal());
}
