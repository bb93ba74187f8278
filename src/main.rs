/// Paper Analyzer - A comprehensive analysis tool for sociology research papers
/// This tool scans paper text for methodology, theory, and citation signals
///
/// The main entry point for the paper analyzer application. It parses
/// command-line arguments and coordinates the analysis process.

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

// Import modules
mod core;
mod utils;

use crate::core::analyzer::{AnalyzerConfig, PaperAnalysis, PaperAnalyzer};
use crate::core::lexicon::load_lexicons;
use crate::utils::output_formatter;

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "paper_analyzer",
    author = "Paper Analyzer Team",
    version = "0.1.0",
    about = "A comprehensive analysis tool for sociology research papers",
    long_about = "This tool analyzes research paper text and reports:
- Document statistics (words, sentences, paragraphs)
- Research methodology classification (qualitative/quantitative/mixed)
- Sociological theories and key concepts
- Research components (hypotheses, samples, findings)
- Citation counts and samples
- Top keywords by frequency"
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["paper_paths", "dir"]),
))]
struct Args {
    /// Path(s) to the paper(s) to analyze
    paper_paths: Vec<String>,

    /// Analyze all papers in directory (recursively)
    #[arg(long = "dir")]
    dir: Option<String>,

    /// Exclude file pattern (glob syntax, can be used multiple times)
    #[arg(long = "exclude", action = ArgAction::Append)]
    exclude: Option<Vec<String>>,

    /// Include only file pattern (glob syntax, can be used multiple times;
    /// default: *.txt and *.md)
    #[arg(long = "include", action = ArgAction::Append)]
    include: Option<Vec<String>>,

    /// Maximum file size to analyze in MB (default: 10)
    #[arg(long = "max-size", default_value = "10")]
    max_size: usize,

    /// Maximum number of papers to analyze (default: 1000)
    #[arg(long = "max-files", default_value = "1000")]
    max_files: usize,

    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", action = ArgAction::SetTrue)]
    md: bool,

    /// Export results to JSON file
    #[arg(long = "json", visible_alias = "export")]
    json: Option<String>,

    /// Export results to HTML report
    #[arg(long = "html")]
    html: Option<String>,

    /// Export results to CSV file
    #[arg(long = "csv")]
    csv: Option<String>,

    /// Directory to store all output files
    #[arg(long = "output-dir")]
    output_dir: Option<String>,

    /// Suppress terminal output
    #[arg(long = "quiet", action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show only summary information
    #[arg(long = "summary-only", action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Number of keywords to keep per paper (default: 20)
    #[arg(long = "top-keywords")]
    top_keywords: Option<usize>,

    /// Path to configuration file
    #[arg(long = "config")]
    config: Option<String>,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: paper_analyzer.log)
    #[arg(long = "log-file", default_value = "paper_analyzer.log")]
    log_file: String,
}

/// Main entry point function
fn main() -> Result<()> {
    // Record the start time
    let start_time = Instant::now();

    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let _ = setup_logging(&args);

    // Load configuration
    let config = load_config(&args)?;

    // Get papers to analyze
    let papers_to_analyze = get_papers_to_analyze(&args)?;

    if papers_to_analyze.is_empty() {
        eprintln!("{}", "Error: No papers specified or found for analysis".red());
        eprintln!("Run with --help for usage information");
        process::exit(1);
    }

    // Analyze all papers
    let analyses = analyze_papers(&papers_to_analyze, &config, &args);

    // Export results if requested
    export_all_results(&analyses, &args)?;

    // Print results to console if not in quiet mode
    if !args.quiet {
        let elapsed_time = start_time.elapsed();
        println!("\n{}", "Analysis Complete".bold());
        println!("{} {}", "Papers analyzed:".green(), analyses.len());
        println!(
            "{} {:.2} seconds",
            "Time elapsed:".green(),
            elapsed_time.as_secs_f64()
        );

        // Print each paper's full report
        if !args.summary_only {
            for analysis in &analyses {
                let report = output_formatter::format_report(analysis, &args.md, &config);
                println!("{}", report);
            }
        }

        // Print a batch summary when it adds information
        if args.summary_only || analyses.len() > 1 {
            println!("{}", output_formatter::create_summary(&analyses));
        }
    }

    Ok(())
}

/// Set up logging with file and console output
fn setup_logging(args: &Args) -> Result<()> {
    // Configure logging
    let mut builder = env_logger::Builder::new();

    // Set log level from arguments
    builder.filter_level(args.log_level);

    // Set format
    builder.format(|buf, record| {
        use chrono::Local;
        use std::io::Write;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Add file output
    if let Ok(file) = File::create(&args.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // Initialize logger
    builder.init();

    Ok(())
}

/// Load configuration from file if provided, applying CLI overrides
fn load_config(args: &Args) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let path = Path::new(path);
            if !path.exists() {
                error!("Configuration file not found: {}", path.display());
                AnalyzerConfig::default()
            } else {
                let config_str = std::fs::read_to_string(path)?;
                match serde_json::from_str(&config_str) {
                    Ok(config) => {
                        info!("Loaded configuration from {}", path.display());
                        config
                    }
                    Err(e) => {
                        error!("Invalid JSON in configuration file: {}", e);
                        AnalyzerConfig::default()
                    }
                }
            }
        }
        None => AnalyzerConfig::default(),
    };

    if let Some(top_keywords) = args.top_keywords {
        config.top_keywords = top_keywords;
    }

    Ok(config)
}

/// Get list of papers to analyze based on command line arguments
fn get_papers_to_analyze(args: &Args) -> Result<Vec<PathBuf>> {
    let mut papers_to_analyze = Vec::new();
    let max_files = args.max_files;
    let max_size_bytes = args.max_size * 1024 * 1024; // Convert MB to bytes

    // Process individual papers
    if !args.paper_paths.is_empty() {
        for paper_path in &args.paper_paths {
            let path = PathBuf::from(paper_path);
            if path.exists() {
                if path.is_file() {
                    match path.metadata() {
                        Ok(metadata) => {
                            if metadata.len() <= max_size_bytes as u64 {
                                papers_to_analyze.push(path);
                            } else {
                                warn!(
                                    "Skipping {}: exceeds maximum file size ({:.2} MB)",
                                    path.display(),
                                    metadata.len() as f64 / 1024.0 / 1024.0
                                );
                            }
                        }
                        Err(e) => error!("Error reading metadata for {}: {}", path.display(), e),
                    }
                } else {
                    warn!("Skipping {}: not a file", path.display());
                }
            } else {
                error!("Paper not found: {}", path.display());
            }
        }
    }

    // Process directory recursively
    if let Some(dir_path) = &args.dir {
        let dir_path = PathBuf::from(dir_path);
        if !dir_path.exists() || !dir_path.is_dir() {
            error!("Directory not found: {}", dir_path.display());
        } else {
            // Papers are plain text or markdown unless told otherwise
            let include_patterns = args
                .include
                .clone()
                .unwrap_or_else(|| vec!["*.txt".to_string(), "*.md".to_string()]);
            let exclude_patterns = args.exclude.clone().unwrap_or_default();

            use walkdir::WalkDir;
            for entry in WalkDir::new(&dir_path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                // Check if we've reached the maximum number of papers
                if papers_to_analyze.len() >= max_files {
                    warn!("Reached maximum paper limit ({})", max_files);
                    break;
                }

                let paper_path = entry.path();
                if paper_path.is_file() {
                    match paper_path.metadata() {
                        Ok(metadata) => {
                            if metadata.len() > max_size_bytes as u64 {
                                continue;
                            }

                            // Check include/exclude patterns
                            let file_name = paper_path.to_string_lossy();
                            let include_match = include_patterns
                                .iter()
                                .any(|pattern| glob_match(&file_name, pattern));
                            let exclude_match = exclude_patterns
                                .iter()
                                .any(|pattern| glob_match(&file_name, pattern));

                            if include_match && !exclude_match {
                                papers_to_analyze.push(paper_path.to_path_buf());
                            }
                        }
                        Err(e) => {
                            error!("Error reading metadata for {}: {}", paper_path.display(), e)
                        }
                    }
                }
            }
        }
    }

    Ok(papers_to_analyze)
}

/// Simple glob pattern matching
fn glob_match(text: &str, pattern: &str) -> bool {
    let pattern = pattern.replace('*', ".*").replace('?', ".");
    let re = regex::Regex::new(&format!("^{}$", pattern)).unwrap_or_else(|_| {
        regex::Regex::new(".*").unwrap() // Fallback to match everything on error
    });
    re.is_match(text)
}

/// Analyze multiple papers with progress tracking
fn analyze_papers(papers: &[PathBuf], config: &AnalyzerConfig, args: &Args) -> Vec<PaperAnalysis> {
    let total_papers = papers.len();

    if !args.quiet && total_papers > 1 {
        println!("\n{} {} papers...", "Analyzing".bold(), total_papers);
    }

    // Compile lexicons once and reuse the analyzer across the batch
    let lexicons = load_lexicons();
    let analyzer = PaperAnalyzer::new(&lexicons, config.clone());

    // Set up progress bar for batches if not in quiet mode
    let progress_bar = if !args.quiet && total_papers > 1 {
        let pb = ProgressBar::new(total_papers as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} papers ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut analyses = Vec::new();
    for paper_path in papers {
        match analyzer.analyze_file(paper_path) {
            Ok(analysis) => analyses.push(analysis),
            Err(e) => {
                error!("Error analyzing {}: {}", paper_path.display(), e);
                // Log output is piped to the log file, so echo the failure
                // to stderr.
                let line = format!("{} {}: {}", "Error analyzing".red(), paper_path.display(), e);
                match &progress_bar {
                    Some(pb) => pb.suspend(|| eprintln!("{}", line)),
                    None => eprintln!("{}", line),
                }
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    analyses
}

/// Export results for all analyzed papers based on command line arguments
fn export_all_results(analyses: &[PaperAnalysis], args: &Args) -> Result<()> {
    // Create output directory if specified
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)?;
    }

    // Process each paper's analysis
    for analysis in analyses {
        let paper_path = Path::new(&analysis.source);

        // Generate output paths
        if let Some(json_path) = &args.json {
            let json_path = if analyses.len() > 1 {
                generate_output_path(args, paper_path, ".json")
            } else {
                PathBuf::from(json_path)
            };
            output_formatter::export_report_json(analysis, &json_path)?;
            info!("Results exported to: {}", json_path.display());
        }

        if let Some(html_path) = &args.html {
            let html_path = if analyses.len() > 1 {
                generate_output_path(args, paper_path, ".html")
            } else {
                PathBuf::from(html_path)
            };
            output_formatter::create_html_report(analysis, &html_path)?;
        }

        if let Some(csv_path) = &args.csv {
            let csv_path = if analyses.len() > 1 {
                generate_output_path(args, paper_path, ".csv")
            } else {
                PathBuf::from(csv_path)
            };
            output_formatter::create_csv_report(analysis, &csv_path)?;
        }
    }

    Ok(())
}

/// Generate output file path based on input paper and output directory
fn generate_output_path(args: &Args, paper_path: &Path, extension: &str) -> PathBuf {
    let file_stem = paper_path.file_stem().unwrap_or_default();
    let output_filename = format!("{}_analysis{}", file_stem.to_string_lossy(), extension);

    match &args.output_dir {
        Some(output_dir) => PathBuf::from(output_dir).join(output_filename),
        None => PathBuf::from(output_filename),
    }
}
