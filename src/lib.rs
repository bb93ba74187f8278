/// Paper Analyzer - A comprehensive analysis tool for sociology research papers
///
/// This library provides functionality to analyze research paper text for
/// methodology indicators, theoretical frameworks, sociological concepts,
/// research components, citations, and keyword frequencies.

// Re-export core modules
pub mod core;
pub mod utils;

// Re-export main analyzer types for convenience
pub use crate::core::analyzer::{AnalyzerConfig, Methodology, PaperAnalysis, PaperAnalyzer};
pub use crate::core::lexicon::load_lexicons;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Analyze a single paper and return the results
///
/// This is a convenience function for simple use cases.
///
/// # Arguments
///
/// * `file_path` - Path to the paper to analyze
///
/// # Returns
///
/// The full analysis of the paper
pub fn analyze_file<P: AsRef<std::path::Path>>(
    file_path: P,
) -> anyhow::Result<crate::core::analyzer::PaperAnalysis> {
    let lexicons = load_lexicons();
    let analyzer = PaperAnalyzer::new(&lexicons, AnalyzerConfig::default());

    analyzer.analyze_file(file_path.as_ref())
}

/// Library configuration utilities
pub mod config {
    use crate::core::analyzer::AnalyzerConfig;
    use anyhow::Result;
    use log::error;
    use std::path::Path;

    /// Load analyzer configuration from a JSON file. No path means the
    /// defaults; a missing or unreadable file and invalid JSON log an error
    /// and fall back to the defaults as well.
    pub fn load_config(config_path: Option<&Path>) -> Result<AnalyzerConfig> {
        let path = match config_path {
            Some(path) => path,
            None => return Ok(AnalyzerConfig::default()),
        };

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to read config file {}: {}", path.display(), e);
                return Ok(AnalyzerConfig::default());
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => Ok(config),
            Err(e) => {
                error!("Invalid JSON in config file {}: {}", path.display(), e);
                Ok(AnalyzerConfig::default())
            }
        }
    }
}

/// Command-line application functionality
pub mod app {
    use crate::core::analyzer::{AnalyzerConfig, PaperAnalysis, PaperAnalyzer};
    use crate::core::lexicon::load_lexicons;
    use std::path::Path;

    /// Run the analyzer on multiple papers
    ///
    /// # Arguments
    ///
    /// * `paper_paths` - Paths to papers to analyze
    /// * `config` - Analyzer configuration
    ///
    /// # Returns
    ///
    /// Analyses for all papers, in input order
    pub fn run_analyzer<P: AsRef<Path>>(
        paper_paths: &[P],
        config: &AnalyzerConfig,
    ) -> anyhow::Result<Vec<PaperAnalysis>> {
        let lexicons = load_lexicons();
        let analyzer = PaperAnalyzer::new(&lexicons, config.clone());
        let mut analyses = Vec::new();

        for paper_path in paper_paths {
            analyses.push(analyzer.analyze_file(paper_path.as_ref())?);
        }

        Ok(analyses)
    }
}
