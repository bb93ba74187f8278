/// Output formatter for analysis results
///
/// This module handles formatting and exporting paper analyses in various
/// formats, including console output, JSON, HTML, and CSV.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use handlebars::Handlebars;
use serde_json::json;

use crate::core::analyzer::{AnalyzerConfig, PaperAnalysis};

/// Format a paper analysis for console output
///
/// # Arguments
///
/// * `analysis` - The analysis to render
/// * `use_markdown` - Whether to wrap the output in markdown triple backticks
/// * `config` - Analyzer configuration (controls list lengths)
///
/// # Returns
///
/// Formatted string for console output
pub fn format_report(
    analysis: &PaperAnalysis,
    use_markdown: &bool,
    config: &AnalyzerConfig,
) -> String {
    let rule = "=".repeat(70);
    let mut output = String::new();

    if *use_markdown {
        output.push_str("```\n");
    }

    output.push_str(&format!(
        "\n{}\n{}\n{}\n\n",
        rule,
        "SOCIOLOGY PAPER ANALYZER".yellow().bold(),
        rule
    ));
    output.push_str(&format!("Analyzing: {}\n", analysis.source));
    output.push_str(&format!(
        "Analysis Date: {}\n\n",
        display_timestamp(&analysis.analyzed_at)
    ));

    // 1. Document statistics
    output.push_str(&format!(
        "{}\n{}\n{}\n",
        rule,
        "1. DOCUMENT STATISTICS".cyan().bold(),
        rule
    ));
    output.push_str(&format!(
        "Word Count: {}\n",
        group_thousands(analysis.stats.word_count)
    ));
    output.push_str(&format!(
        "Sentence Count: {}\n",
        group_thousands(analysis.stats.sentence_count)
    ));
    output.push_str(&format!(
        "Average Sentence Length: {:.1} words\n",
        analysis.stats.avg_sentence_length
    ));
    output.push_str(&format!(
        "Paragraph Count: {}\n",
        group_thousands(analysis.stats.paragraph_count)
    ));

    // 2. Methodology
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "2. RESEARCH METHODOLOGY".cyan().bold(),
        rule
    ));
    if analysis.methodology.total_mentions > 0 {
        for score in &analysis.methodology.scores {
            output.push_str(&format!(
                "{}: {} mentions ({:.1}%)\n",
                score.family.label(),
                score.mentions,
                score.share
            ));
        }
        if let Some(primary) = analysis.methodology.primary {
            output.push_str(&format!("\nPrimary Methodology: {}\n", primary.label()));
        }
    } else {
        output.push_str("No clear methodology indicators found.\n");
    }

    // 3. Theories
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "3. SOCIOLOGICAL THEORIES".cyan().bold(),
        rule
    ));
    if analysis.theories.is_empty() {
        output.push_str("No major sociological theories explicitly identified.\n");
    } else {
        for theory in &analysis.theories {
            output.push_str(&format!("\n{}:\n", title_case(&theory.theory)));
            output.push_str(&format!("  Mentions: {}\n", theory.mentions));
            output.push_str(&format!(
                "  Related terms: {}\n",
                theory.terms.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
            ));
        }
    }

    // 4. Concepts
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "4. KEY SOCIOLOGICAL CONCEPTS".cyan().bold(),
        rule
    ));
    if analysis.concepts.is_empty() {
        output.push_str("No standard sociological concepts identified.\n");
    } else {
        for (i, concept) in analysis.concepts.iter().take(config.report_concepts).enumerate() {
            output.push_str(&format!(
                "{}. {}: {} mentions\n",
                i + 1,
                title_case(&concept.concept),
                concept.mentions
            ));
        }
    }

    // 5. Research components
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "5. RESEARCH COMPONENTS".cyan().bold(),
        rule
    ));
    if analysis.components.is_empty() {
        output.push_str("No clear research components identified.\n");
    } else {
        for component in &analysis.components {
            output.push_str(&format!(
                "{}: {} mentions\n",
                title_case(&component.component),
                component.mentions
            ));
        }
    }

    // 6. Citations
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "6. CITATION ANALYSIS".cyan().bold(),
        rule
    ));
    output.push_str(&format!(
        "Total Citations Found: {}\n",
        analysis.citations.total
    ));
    output.push_str(&format!(
        "Unique Citations: {}\n",
        analysis.citations.unique
    ));
    if !analysis.citations.samples.is_empty() {
        output.push_str("\nSample Citations:\n");
        for citation in analysis.citations.samples.iter().take(5) {
            output.push_str(&format!("  - {}\n", citation));
        }
    }

    // 7. Keywords
    output.push_str(&format!(
        "\n{}\n{}\n{}\n",
        rule,
        "7. TOP KEYWORDS".cyan().bold(),
        rule
    ));
    for (i, keyword) in analysis.keywords.iter().take(config.report_keywords).enumerate() {
        output.push_str(&format!(
            "{}. {}: {} occurrences\n",
            i + 1,
            keyword.word,
            keyword.count
        ));
    }

    output.push_str(&format!("\n{}\nANALYSIS COMPLETE\n{}\n\n", rule, rule));

    if *use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Export an analysis to a JSON file
///
/// # Arguments
///
/// * `analysis` - The analysis to export
/// * `output_path` - Path where the JSON file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn export_report_json(analysis: &PaperAnalysis, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).context(format!(
        "Failed to create JSON output file: {}",
        output_path.display()
    ))?;

    serde_json::to_writer_pretty(file, analysis).context("Failed to write JSON data")?;

    Ok(())
}

/// Create a CSV report from an analysis
///
/// # Arguments
///
/// * `analysis` - The analysis to export
/// * `output_path` - Path where the CSV file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn create_csv_report(analysis: &PaperAnalysis, output_path: &Path) -> Result<()> {
    let file = File::create(output_path).context(format!(
        "Failed to create CSV output file: {}",
        output_path.display()
    ))?;

    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["Section", "Item", "Count"])
        .context("Failed to write CSV header")?;

    let mut rows: Vec<(String, String, String)> = vec![
        (
            "Document Statistics".to_string(),
            "Word Count".to_string(),
            analysis.stats.word_count.to_string(),
        ),
        (
            "Document Statistics".to_string(),
            "Sentence Count".to_string(),
            analysis.stats.sentence_count.to_string(),
        ),
        (
            "Document Statistics".to_string(),
            "Average Sentence Length".to_string(),
            format!("{:.1}", analysis.stats.avg_sentence_length),
        ),
        (
            "Document Statistics".to_string(),
            "Paragraph Count".to_string(),
            analysis.stats.paragraph_count.to_string(),
        ),
    ];

    for score in &analysis.methodology.scores {
        rows.push((
            "Research Methodology".to_string(),
            score.family.label().to_string(),
            score.mentions.to_string(),
        ));
    }
    for theory in &analysis.theories {
        rows.push((
            "Sociological Theories".to_string(),
            title_case(&theory.theory),
            theory.mentions.to_string(),
        ));
    }
    for concept in &analysis.concepts {
        rows.push((
            "Key Concepts".to_string(),
            title_case(&concept.concept),
            concept.mentions.to_string(),
        ));
    }
    for component in &analysis.components {
        rows.push((
            "Research Components".to_string(),
            title_case(&component.component),
            component.mentions.to_string(),
        ));
    }
    rows.push((
        "Citations".to_string(),
        "Total Citations".to_string(),
        analysis.citations.total.to_string(),
    ));
    rows.push((
        "Citations".to_string(),
        "Unique Citations".to_string(),
        analysis.citations.unique.to_string(),
    ));
    for keyword in &analysis.keywords {
        rows.push((
            "Top Keywords".to_string(),
            keyword.word.clone(),
            keyword.count.to_string(),
        ));
    }

    for (section, item, count) in &rows {
        writer
            .write_record([section.as_str(), item.as_str(), count.as_str()])
            .context("Failed to write CSV record")?;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

/// Create an HTML report from an analysis
///
/// # Arguments
///
/// * `analysis` - The analysis to export
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
///
/// Result indicating success or failure
pub fn create_html_report(analysis: &PaperAnalysis, output_path: &Path) -> Result<()> {
    let mut handlebars = Handlebars::new();

    const HTML_TEMPLATE: &str = r#"
    <!DOCTYPE html>
    <html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>Sociology Paper Analysis Report</title>
        <style>
            body {
                font-family: Arial, sans-serif;
                line-height: 1.6;
                color: #333;
                max-width: 1200px;
                margin: 0 auto;
                padding: 20px;
            }
            h1 {
                color: #2c3e50;
                border-bottom: 2px solid #3498db;
                padding-bottom: 10px;
            }
            h2 {
                color: #2980b9;
                margin-top: 30px;
            }
            .section {
                background-color: #f8f9fa;
                border-radius: 5px;
                padding: 15px;
                margin-bottom: 20px;
                box-shadow: 0 2px 5px rgba(0,0,0,0.1);
            }
            .entries {
                list-style-type: none;
                padding-left: 20px;
            }
            .entries li {
                padding: 5px 0;
                border-bottom: 1px solid #eee;
            }
            .entries li:last-child {
                border-bottom: none;
            }
            .count {
                background-color: #3498db;
                color: white;
                border-radius: 20px;
                padding: 2px 8px;
                font-size: 0.8em;
                margin-left: 10px;
            }
            .timestamp {
                color: #7f8c8d;
                font-size: 0.9em;
                margin-bottom: 30px;
            }
            .summary {
                background-color: #e8f4f8;
                padding: 15px;
                border-radius: 5px;
                margin-bottom: 30px;
            }
        </style>
    </head>
    <body>
        <h1>Sociology Paper Analysis Report</h1>
        <div class="timestamp">Generated on: {{timestamp}}</div>

        <div class="summary">
            <h2>Summary</h2>
            <p>Paper: {{source}}</p>
            <p>Words: {{word_count}} | Sentences: {{sentence_count}} | Paragraphs: {{paragraph_count}}</p>
            {{#if primary_methodology}}
            <p>Primary methodology: {{primary_methodology}}</p>
            {{/if}}
            <p>Citations: {{citation_total}} total, {{citation_unique}} unique</p>
        </div>

        <div class="section">
            <h2>Research Methodology</h2>
            <ul class="entries">
                {{#each methodology}}
                <li>{{label}} <span class="count">{{mentions}} mentions ({{share}}%)</span></li>
                {{/each}}
            </ul>
        </div>

        {{#if theories}}
        <div class="section">
            <h2>Sociological Theories</h2>
            <ul class="entries">
                {{#each theories}}
                <li>{{name}} <span class="count">{{mentions}}</span> {{terms}}</li>
                {{/each}}
            </ul>
        </div>
        {{/if}}

        {{#if concepts}}
        <div class="section">
            <h2>Key Sociological Concepts</h2>
            <ul class="entries">
                {{#each concepts}}
                <li>{{name}} <span class="count">{{mentions}}</span></li>
                {{/each}}
            </ul>
        </div>
        {{/if}}

        {{#if components}}
        <div class="section">
            <h2>Research Components</h2>
            <ul class="entries">
                {{#each components}}
                <li>{{name}} <span class="count">{{mentions}}</span></li>
                {{/each}}
            </ul>
        </div>
        {{/if}}

        {{#if citations}}
        <div class="section">
            <h2>Sample Citations</h2>
            <ul class="entries">
                {{#each citations}}
                <li>{{this}}</li>
                {{/each}}
            </ul>
        </div>
        {{/if}}

        {{#if keywords}}
        <div class="section">
            <h2>Top Keywords</h2>
            <ul class="entries">
                {{#each keywords}}
                <li>{{word}} <span class="count">{{count}}</span></li>
                {{/each}}
            </ul>
        </div>
        {{/if}}
    </body>
    </html>
    "#;

    handlebars
        .register_template_string("report", HTML_TEMPLATE)
        .context("Failed to register HTML template")?;

    let methodology: Vec<_> = analysis
        .methodology
        .scores
        .iter()
        .map(|score| {
            json!({
                "label": score.family.label(),
                "mentions": score.mentions,
                "share": format!("{:.1}", score.share),
            })
        })
        .collect();

    let theories: Vec<_> = analysis
        .theories
        .iter()
        .map(|theory| {
            json!({
                "name": title_case(&theory.theory),
                "mentions": theory.mentions,
                "terms": theory.terms.join(", "),
            })
        })
        .collect();

    let concepts: Vec<_> = analysis
        .concepts
        .iter()
        .map(|concept| {
            json!({
                "name": title_case(&concept.concept),
                "mentions": concept.mentions,
            })
        })
        .collect();

    let components: Vec<_> = analysis
        .components
        .iter()
        .map(|component| {
            json!({
                "name": title_case(&component.component),
                "mentions": component.mentions,
            })
        })
        .collect();

    let keywords: Vec<_> = analysis
        .keywords
        .iter()
        .map(|keyword| json!({ "word": keyword.word, "count": keyword.count }))
        .collect();

    let template_data = json!({
        "timestamp": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "source": analysis.source,
        "word_count": group_thousands(analysis.stats.word_count),
        "sentence_count": group_thousands(analysis.stats.sentence_count),
        "paragraph_count": group_thousands(analysis.stats.paragraph_count),
        "primary_methodology": analysis.methodology.primary.map(|m| m.label()),
        "citation_total": analysis.citations.total,
        "citation_unique": analysis.citations.unique,
        "methodology": methodology,
        "theories": theories,
        "concepts": concepts,
        "components": components,
        "citations": analysis.citations.samples,
        "keywords": keywords,
    });

    let html = handlebars
        .render("report", &template_data)
        .context("Failed to render HTML template")?;

    let mut file = File::create(output_path).context(format!(
        "Failed to create HTML output file: {}",
        output_path.display()
    ))?;

    file.write_all(html.as_bytes())
        .context("Failed to write HTML data")?;

    Ok(())
}

/// Create a summary for a batch of analyzed papers
///
/// # Arguments
///
/// * `analyses` - Analyses of every paper in the batch
///
/// # Returns
///
/// Summary string
pub fn create_summary(analyses: &[PaperAnalysis]) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n\n", "Corpus Summary".yellow().bold()));

    output.push_str(&format!("Papers analyzed: {}\n", analyses.len()));

    let total_words: usize = analyses.iter().map(|a| a.stats.word_count).sum();
    output.push_str(&format!("Total words: {}\n", group_thousands(total_words)));

    let total_citations: usize = analyses.iter().map(|a| a.citations.total).sum();
    output.push_str(&format!("Total citations: {}\n\n", total_citations));

    // Primary methodology distribution across the batch.
    let mut methodology_counts: HashMap<&str, usize> = HashMap::new();
    for analysis in analyses {
        if let Some(primary) = analysis.methodology.primary {
            *methodology_counts.entry(primary.label()).or_insert(0) += 1;
        }
    }
    if !methodology_counts.is_empty() {
        output.push_str(&format!("{}\n", "Primary Methodologies".cyan().bold()));
        let mut counts: Vec<_> = methodology_counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (label, count) in counts {
            output.push_str(&format!("  {}: {} papers\n", label, count));
        }
        output.push('\n');
    }

    // Most mentioned concepts across the batch.
    let mut concept_counts: HashMap<&str, usize> = HashMap::new();
    for analysis in analyses {
        for concept in &analysis.concepts {
            *concept_counts.entry(concept.concept.as_str()).or_insert(0) += concept.mentions;
        }
    }
    if !concept_counts.is_empty() {
        output.push_str(&format!("{}\n", "Top Concepts".cyan().bold()));
        let mut counts: Vec<_> = concept_counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (i, (concept, count)) in counts.iter().take(10).enumerate() {
            output.push_str(&format!("{}. {}: {}\n", i + 1, title_case(concept), count));
        }
    }

    output
}

/// Title-case a lexicon label: underscores become spaces and every word
/// (including hyphen/slash-joined parts) starts with a capital.
fn title_case(label: &str) -> String {
    let spaced = label.replace('_', " ");
    let mut output = String::with_capacity(spaced.len());
    let mut at_boundary = true;

    for c in spaced.chars() {
        if at_boundary {
            output.extend(c.to_uppercase());
        } else {
            output.push(c);
        }
        at_boundary = !c.is_alphabetic();
    }

    output
}

/// Render a count with thousands separators ("5234" -> "5,234").
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut output = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            output.push(',');
        }
        output.push(c);
    }

    output
}

/// Display an RFC 3339 timestamp as "YYYY-MM-DD HH:MM:SS", falling back to
/// the raw value when it does not parse.
fn display_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::{AnalyzerConfig, PaperAnalyzer};
    use crate::core::lexicon::load_lexicons;

    const SAMPLE_TEXT: &str = "This ethnographic study draws on interview data and fieldwork. \
        We hypothesize that social capital shapes community outcomes (Putnam, 2000). \
        Findings suggest durable community ties. Bourdieu (1986) framed cultural capital.";

    fn sample_analysis() -> PaperAnalysis {
        let analyzer = PaperAnalyzer::new(&load_lexicons(), AnalyzerConfig::default());
        analyzer.analyze_text("paper.txt", SAMPLE_TEXT)
    }

    #[test]
    fn test_format_report_sections() {
        colored::control::set_override(false);
        let report = format_report(&sample_analysis(), &false, &AnalyzerConfig::default());

        assert!(report.contains("SOCIOLOGY PAPER ANALYZER"));
        assert!(report.contains("1. DOCUMENT STATISTICS"));
        assert!(report.contains("Primary Methodology: Qualitative"));
        assert!(report.contains("Social Capital"));
        assert!(report.contains("Total Citations Found: 2"));
        assert!(report.contains("7. TOP KEYWORDS"));
        assert!(report.contains("ANALYSIS COMPLETE"));
    }

    #[test]
    fn test_format_report_markdown_fences() {
        colored::control::set_override(false);
        let report = format_report(&sample_analysis(), &true, &AnalyzerConfig::default());

        assert!(report.starts_with("```\n"));
        assert!(report.ends_with("```\n"));
    }

    #[test]
    fn test_format_report_empty_document() {
        colored::control::set_override(false);
        let analyzer = PaperAnalyzer::new(&load_lexicons(), AnalyzerConfig::default());
        let analysis = analyzer.analyze_text("empty.txt", "");
        let report = format_report(&analysis, &false, &AnalyzerConfig::default());

        assert!(report.contains("No clear methodology indicators found."));
        assert!(report.contains("No major sociological theories explicitly identified."));
        assert!(report.contains("No standard sociological concepts identified."));
        assert!(report.contains("No clear research components identified."));
    }

    #[test]
    fn test_export_report_json_parses_back() {
        let analysis = sample_analysis();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");

        export_report_json(&analysis, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: PaperAnalysis = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.source, "paper.txt");
        assert_eq!(parsed.citations.total, analysis.citations.total);
        assert_eq!(parsed.stats.word_count, analysis.stats.word_count);
    }

    #[test]
    fn test_create_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.csv");

        create_csv_report(&sample_analysis(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("Section,Item,Count"));
        assert!(raw.contains("Document Statistics,Word Count,"));
        assert!(raw.contains("Research Methodology,Qualitative,"));
    }

    #[test]
    fn test_create_html_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.html");

        create_html_report(&sample_analysis(), &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("<html"));
        assert!(raw.contains("Sociology Paper Analysis Report"));
        assert!(raw.contains("paper.txt"));
        assert!(raw.contains("Qualitative"));
    }

    #[test]
    fn test_create_summary() {
        colored::control::set_override(false);
        let first = sample_analysis();
        let second = sample_analysis();
        let summary = create_summary(&[first, second]);

        assert!(summary.contains("Papers analyzed: 2"));
        assert!(summary.contains("Primary Methodologies"));
        assert!(summary.contains("Qualitative: 2 papers"));
        assert!(summary.contains("Top Concepts"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("conflict_theory"), "Conflict Theory");
        assert_eq!(title_case("social capital"), "Social Capital");
        assert_eq!(title_case("in-group"), "In-Group");
        assert_eq!(title_case("power/knowledge"), "Power/Knowledge");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(5234), "5,234");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
