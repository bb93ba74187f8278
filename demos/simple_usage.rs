/// Simple example demonstrating how to use the Paper Analyzer library

use anyhow::Result;
use paper_analyzer::analyze_file;
use std::path::Path;

fn main() -> Result<()> {
    // Path to paper for analysis
    let paper_path = "demos/sample_paper.txt";

    // Create sample paper
    std::fs::write(
        paper_path,
        r#"This case study uses interview data and participant observation to
examine social capital in a rural community (Putnam, 2000). We found that
community networks reproduce existing inequality, as conflict theory
suggests. Stigma remains a barrier to civic participation.
"#,
    )?;

    println!("Analyzing paper: {}", paper_path);

    // Analyze the paper
    let analysis = analyze_file(Path::new(paper_path))?;

    // Display results
    println!("\nWords: {}", analysis.stats.word_count);
    if let Some(primary) = analysis.methodology.primary {
        println!("Primary methodology: {}", primary);
    }
    for theory in &analysis.theories {
        println!("Theory: {} ({} mentions)", theory.theory, theory.mentions);
    }
    for concept in &analysis.concepts {
        println!("Concept: {} ({} mentions)", concept.concept, concept.mentions);
    }
    println!(
        "Citations: {} total, {} unique",
        analysis.citations.total, analysis.citations.unique
    );

    Ok(())
}
