/// Integration tests for the paper analyzer
///
/// These tests verify that the main functionality of the paper analyzer works
/// correctly, including lexicon detection and report generation.

use std::path::Path;

use paper_analyzer::core::analyzer::{AnalyzerConfig, Methodology};
use paper_analyzer::utils::file_utils::DocumentKind;
use paper_analyzer::{analyze_file, app};

#[test]
fn test_analyze_research_paper() {
    // Analyze the fixture paper
    let analysis = analyze_file("tests/test_paper.txt").expect("Failed to analyze test paper");

    assert_eq!(analysis.source, "tests/test_paper.txt");

    // Document statistics
    assert!(analysis.stats.word_count > 400);
    assert!(analysis.stats.sentence_count > 20);
    assert_eq!(analysis.stats.paragraph_count, 15);

    // The paper is built around qualitative methods language
    assert_eq!(analysis.methodology.primary, Some(Methodology::Qualitative));
    let top = &analysis.methodology.scores[0];
    assert_eq!(top.family, Methodology::Qualitative);
    assert!(top.mentions >= 10);

    // Theories: conflict theory dominates, symbolic interactionism follows
    assert_eq!(analysis.theories[0].theory, "conflict_theory");
    assert!(analysis.theories[0].terms.contains(&"class struggle".to_string()));
    assert!(analysis
        .theories
        .iter()
        .any(|t| t.theory == "symbolic_interactionism"));

    // Concepts: social capital is the most mentioned
    assert_eq!(analysis.concepts[0].concept, "social capital");
    assert!(analysis.concepts[0].mentions >= 5);
    assert!(analysis.concepts.iter().any(|c| c.concept == "stigma"));
    assert!(analysis
        .concepts
        .iter()
        .any(|c| c.concept == "cultural capital"));

    // Research components
    let component = |name: &str| {
        analysis
            .components
            .iter()
            .find(|c| c.component == name)
            .map(|c| c.mentions)
    };
    assert_eq!(component("hypothesis"), Some(1));
    assert_eq!(component("research_question"), Some(2));
    assert_eq!(component("sample"), Some(1));
    assert!(component("findings").unwrap_or(0) >= 3);
    assert!(component("limitations").unwrap_or(0) >= 2);
    assert_eq!(component("future_research"), Some(2));

    // Citations: one duplicate, samples lexicographically ordered
    assert_eq!(analysis.citations.total, 5);
    assert_eq!(analysis.citations.unique, 4);
    assert_eq!(analysis.citations.samples[0], "(Bourdieu, 1986)");
    assert!(analysis
        .citations
        .samples
        .contains(&"Goffman (1959)".to_string()));

    // Keywords: the paper is about community
    assert_eq!(analysis.keywords[0].word, "community");
    assert!(analysis.keywords[0].count >= 10);

    // Document metadata travels with the analysis
    let document = analysis.document.expect("document metadata missing");
    assert_eq!(document.kind, DocumentKind::PlainText);
    assert_eq!(document.sha256.len(), 64);
    assert!(document.file_size > 0);
}

#[test]
fn test_empty_paper() {
    // Create a temporary empty paper
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let empty_path = temp_dir.path().join("empty.txt");
    std::fs::write(&empty_path, "").expect("Failed to write empty paper");

    // An empty paper analyzes cleanly to zeroes
    let analysis = analyze_file(&empty_path).expect("Failed to analyze empty paper");

    assert_eq!(analysis.stats.word_count, 0);
    assert_eq!(analysis.stats.sentence_count, 0);
    assert_eq!(analysis.stats.paragraph_count, 1);
    assert_eq!(analysis.methodology.primary, None);
    assert!(analysis.theories.is_empty());
    assert!(analysis.concepts.is_empty());
    assert!(analysis.components.is_empty());
    assert_eq!(analysis.citations.total, 0);
    assert!(analysis.keywords.is_empty());

    let document = analysis.document.expect("document metadata missing");
    assert_eq!(document.file_size, 0);
}

#[test]
fn test_missing_paper_reports_error() {
    let result = analyze_file("tests/no_such_paper.txt");
    let err = result.expect_err("analyzing a missing paper should fail");
    assert!(err.to_string().contains("Document not found"));
}

#[test]
fn test_batch_analysis_preserves_order() {
    let papers = [
        Path::new("tests/test_paper.txt"),
        Path::new("tests/test_paper.txt"),
    ];
    let analyses =
        app::run_analyzer(&papers, &AnalyzerConfig::default()).expect("batch analysis failed");

    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[0].source, analyses[1].source);
    assert_eq!(
        analyses[0].stats.word_count,
        analyses[1].stats.word_count
    );
    assert_eq!(analyses[0].keywords[0].word, analyses[1].keywords[0].word);
}

#[test]
fn test_top_keywords_config_is_honored() {
    let config = AnalyzerConfig {
        top_keywords: 3,
        ..AnalyzerConfig::default()
    };
    let analyses = app::run_analyzer(&[Path::new("tests/test_paper.txt")], &config)
        .expect("analysis failed");

    assert_eq!(analyses[0].keywords.len(), 3);
    assert_eq!(analyses[0].keywords[0].word, "community");
}

#[test]
fn test_config_file_loading() {
    use paper_analyzer::config::load_config;

    // No file: defaults
    let config = load_config(None).expect("default config failed");
    assert_eq!(config.top_keywords, 20);
    assert_eq!(config.citation_samples, 10);

    // Partial file: listed keys override, the rest stay default
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, r#"{"top_keywords": 5}"#).expect("Failed to write config");

    let config = load_config(Some(&config_path)).expect("config load failed");
    assert_eq!(config.top_keywords, 5);
    assert_eq!(config.citation_samples, 10);
}

#[test]
fn test_config_fallbacks_keep_defaults() {
    use paper_analyzer::config::load_config;

    // A missing config file is logged, not fatal
    let config = load_config(Some(Path::new("/no/such/config.json")))
        .expect("missing config file should fall back to defaults");
    assert_eq!(config.top_keywords, 20);
    assert_eq!(config.citation_samples, 10);

    // So is a file that does not parse
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, "{not valid json").expect("Failed to write config");

    let config = load_config(Some(&config_path))
        .expect("invalid config file should fall back to defaults");
    assert_eq!(config.top_keywords, 20);
}
