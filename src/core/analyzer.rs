/// Core paper analyzer implementation
///
/// This file contains the implementation of the PaperAnalyzer which runs the
/// fixed set of lexical scans over a document and aggregates the results into
/// a structured report.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::lexicon::{self, LexiconSet};
use crate::utils::file_utils::{self, DocumentMetadata};

/// Tunable knobs for the analyzer, loadable from a JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// How many keywords the frequency scan keeps.
    pub top_keywords: usize,
    /// How many unique citations the citation summary samples.
    pub citation_samples: usize,
    /// Minimum trimmed length for a fragment to count as a sentence.
    pub min_sentence_chars: usize,
    /// Minimum word length for the keyword scan.
    pub min_keyword_len: usize,
    /// How many concepts the terminal report lists.
    pub report_concepts: usize,
    /// How many keywords the terminal report lists.
    pub report_keywords: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_keywords: 20,
            citation_samples: 10,
            min_sentence_chars: 20,
            min_keyword_len: 4,
            report_concepts: 15,
            report_keywords: 15,
        }
    }
}

/// Research methodology families recognized by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    Qualitative,
    Quantitative,
    MixedMethods,
}

impl Methodology {
    /// Lexicon key for this family.
    pub fn key(&self) -> &'static str {
        match self {
            Methodology::Qualitative => "qualitative",
            Methodology::Quantitative => "quantitative",
            Methodology::MixedMethods => "mixed_methods",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Methodology::Qualitative => "Qualitative",
            Methodology::Quantitative => "Quantitative",
            Methodology::MixedMethods => "Mixed Methods",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        [
            Methodology::Qualitative,
            Methodology::Quantitative,
            Methodology::MixedMethods,
        ]
        .into_iter()
        .find(|family| family.key() == key)
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Document size metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub paragraph_count: usize,
}

/// Mention count and share for one methodology family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyScore {
    pub family: Methodology,
    pub mentions: usize,
    /// Share of all methodology mentions, in percent (0 when nothing matched).
    pub share: f64,
}

/// Methodology classification result. All three families are always listed,
/// sorted by mention count; `primary` is set only when something matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodologyProfile {
    pub scores: Vec<MethodologyScore>,
    pub primary: Option<Methodology>,
    pub total_mentions: usize,
}

/// A detected sociological theory with its matched indicator terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheoryMention {
    pub theory: String,
    pub mentions: usize,
    /// Distinct terms that matched, in lexicon order.
    pub terms: Vec<String>,
}

/// A detected sociological concept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptMention {
    pub concept: String,
    pub mentions: usize,
}

/// A detected research component (hypothesis, sample, findings...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMention {
    pub component: String,
    pub mentions: usize,
}

/// Citation extraction summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationSummary {
    pub total: usize,
    pub unique: usize,
    /// Up to `citation_samples` unique citations, lexicographically ordered.
    pub samples: Vec<String>,
}

/// One entry of the keyword frequency scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// The full analysis report for one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperAnalysis {
    /// Where the text came from (file path, or a caller-supplied label).
    pub source: String,
    /// RFC 3339 timestamp of the analysis run.
    pub analyzed_at: String,
    /// File metadata, present when the text was loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentMetadata>,
    pub stats: DocumentStats,
    pub methodology: MethodologyProfile,
    pub theories: Vec<TheoryMention>,
    pub concepts: Vec<ConceptMention>,
    pub components: Vec<ComponentMention>,
    pub citations: CitationSummary,
    pub keywords: Vec<KeywordCount>,
}

/// A lexicon term with its compiled word-bounded regex.
#[derive(Debug, Clone)]
struct CompiledTerm {
    term: String,
    re: Regex,
}

/// Core paper analyzer. Compiles every lexicon once at construction so the
/// same instance can scan any number of documents.
pub struct PaperAnalyzer {
    config: AnalyzerConfig,
    methodologies: Vec<(Methodology, Vec<CompiledTerm>)>,
    theories: Vec<(String, Vec<CompiledTerm>)>,
    concepts: Vec<CompiledTerm>,
    components: Vec<(String, Regex)>,
    citations: Vec<Regex>,
    stop_words: HashSet<String>,
    word_re: Regex,
}

impl PaperAnalyzer {
    /// Create a new PaperAnalyzer instance
    ///
    /// # Arguments
    ///
    /// * `lexicons` - Lexicon tables and regex patterns to scan with
    /// * `config` - Analyzer configuration
    ///
    /// # Returns
    ///
    /// A new PaperAnalyzer with all patterns compiled
    pub fn new(lexicons: &LexiconSet, config: AnalyzerConfig) -> Self {
        let methodologies = lexicons
            .methodologies
            .iter()
            .filter_map(|(family, terms)| match Methodology::from_key(family) {
                Some(methodology) => Some((methodology, Self::compile_terms(terms))),
                None => {
                    warn!("Skipping unknown methodology family: {}", family);
                    None
                }
            })
            .collect();

        let theories = lexicons
            .theories
            .iter()
            .map(|(theory, terms)| (theory.clone(), Self::compile_terms(terms)))
            .collect();

        let concepts = Self::compile_terms(&lexicons.concepts);

        let components = lexicons
            .components
            .iter()
            .filter_map(|(name, pattern)| {
                lexicon::compile_pattern(pattern).map(|re| (name.clone(), re))
            })
            .collect();

        let citations = lexicons
            .citations
            .iter()
            .filter_map(|pattern| lexicon::compile_pattern(pattern))
            .collect();

        let word_re = lexicon::compile_pattern(&format!(
            r"\b[a-z]{{{},}}\b",
            config.min_keyword_len
        ))
        .unwrap_or_else(|| lexicon::WORD_TOKEN.clone());

        Self {
            config,
            methodologies,
            theories,
            concepts,
            components,
            citations,
            stop_words: lexicons.stop_words.clone(),
            word_re,
        }
    }

    /// Compile word-bounded regexes for a list of lexicon terms, skipping
    /// (and logging) any term that fails to compile.
    fn compile_terms(terms: &[String]) -> Vec<CompiledTerm> {
        terms
            .iter()
            .filter_map(|term| {
                lexicon::compile_pattern(&lexicon::term_pattern(term)).map(|re| CompiledTerm {
                    term: term.clone(),
                    re,
                })
            })
            .collect()
    }

    /// Analyze a paper loaded from disk
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the document to analyze
    ///
    /// # Returns
    ///
    /// The full analysis, with document metadata attached
    pub fn analyze_file(&self, path: &Path) -> Result<PaperAnalysis> {
        info!("Analyzing paper: {}", path.display());
        let start_time = Instant::now();

        let document = file_utils::read_document(path)?;
        let mut analysis = self.analyze_text(&path.display().to_string(), &document.text);
        analysis.document = Some(document.metadata);

        info!(
            "Analysis of {} completed in {:?}",
            path.display(),
            start_time.elapsed()
        );
        Ok(analysis)
    }

    /// Run every scan over the given text. Scans are independent of each
    /// other; keyword scans share one lowercased copy of the text.
    pub fn analyze_text(&self, source: &str, text: &str) -> PaperAnalysis {
        let lowered = text.to_lowercase();

        PaperAnalysis {
            source: source.to_string(),
            analyzed_at: Local::now().to_rfc3339(),
            document: None,
            stats: self.document_stats(text),
            methodology: self.classify_methodology(&lowered),
            theories: self.detect_theories(&lowered),
            concepts: self.extract_concepts(&lowered),
            components: self.count_components(text),
            citations: self.extract_citations(text),
            keywords: self.top_keywords(&lowered),
        }
    }

    /// Word, sentence and paragraph counts plus average sentence length.
    fn document_stats(&self, text: &str) -> DocumentStats {
        let word_count = text.split_whitespace().count();

        let sentence_count = lexicon::SENTENCE_BOUNDARY
            .split(text)
            .map(str::trim)
            .filter(|fragment| fragment.chars().count() > self.config.min_sentence_chars)
            .count();

        // A document with no sentence over the length threshold still gets a
        // finite average.
        let avg_sentence_length = word_count as f64 / sentence_count.max(1) as f64;

        DocumentStats {
            word_count,
            sentence_count,
            avg_sentence_length,
            paragraph_count: text.split("\n\n").count(),
        }
    }

    /// Score the three methodology families by lexicon mentions.
    fn classify_methodology(&self, lowered: &str) -> MethodologyProfile {
        let counts: Vec<(Methodology, usize)> = self
            .methodologies
            .iter()
            .map(|(family, terms)| {
                let mentions = terms
                    .iter()
                    .map(|term| term.re.find_iter(lowered).count())
                    .sum();
                (*family, mentions)
            })
            .collect();

        let total_mentions: usize = counts.iter().map(|(_, mentions)| mentions).sum();

        let mut scores: Vec<MethodologyScore> = counts
            .into_iter()
            .map(|(family, mentions)| MethodologyScore {
                family,
                mentions,
                share: if total_mentions > 0 {
                    mentions as f64 * 100.0 / total_mentions as f64
                } else {
                    0.0
                },
            })
            .collect();
        scores.sort_by(|a, b| b.mentions.cmp(&a.mentions));

        let primary = scores
            .first()
            .filter(|score| score.mentions > 0)
            .map(|score| score.family);

        MethodologyProfile {
            scores,
            primary,
            total_mentions,
        }
    }

    /// Detect theories: mention counts plus the distinct terms that matched.
    fn detect_theories(&self, lowered: &str) -> Vec<TheoryMention> {
        let mut found = Vec::new();

        for (theory, terms) in &self.theories {
            let mut mentions = 0;
            let mut matched_terms = Vec::new();
            for term in terms {
                let count = term.re.find_iter(lowered).count();
                if count > 0 {
                    mentions += count;
                    matched_terms.push(term.term.clone());
                }
            }
            if mentions > 0 {
                found.push(TheoryMention {
                    theory: theory.clone(),
                    mentions,
                    terms: matched_terms,
                });
            }
        }

        found.sort_by(|a, b| b.mentions.cmp(&a.mentions));
        found
    }

    /// Count concept mentions, most frequent first.
    fn extract_concepts(&self, lowered: &str) -> Vec<ConceptMention> {
        let mut found: Vec<ConceptMention> = self
            .concepts
            .iter()
            .map(|term| (term, term.re.find_iter(lowered).count()))
            .filter(|(_, mentions)| *mentions > 0)
            .map(|(term, mentions)| ConceptMention {
                concept: term.term.clone(),
                mentions,
            })
            .collect();

        found.sort_by(|a, b| b.mentions.cmp(&a.mentions));
        found
    }

    /// Count research component matches, in canonical component order.
    fn count_components(&self, text: &str) -> Vec<ComponentMention> {
        self.components
            .iter()
            .map(|(component, re)| (component, re.find_iter(text).count()))
            .filter(|(_, mentions)| *mentions > 0)
            .map(|(component, mentions)| ComponentMention {
                component: component.clone(),
                mentions,
            })
            .collect()
    }

    /// Extract citations: total and unique counts plus an ordered sample.
    fn extract_citations(&self, text: &str) -> CitationSummary {
        let mut all_citations = Vec::new();
        for re in &self.citations {
            for m in re.find_iter(text) {
                all_citations.push(m.as_str().to_string());
            }
        }

        let unique: BTreeSet<&String> = all_citations.iter().collect();
        let samples: Vec<String> = unique
            .iter()
            .take(self.config.citation_samples)
            .map(|citation| (*citation).clone())
            .collect();

        CitationSummary {
            total: all_citations.len(),
            unique: unique.len(),
            samples,
        }
    }

    /// Keyword frequency scan: stop-word-filtered words of at least
    /// `min_keyword_len` letters, top `top_keywords` by count. Ties break
    /// alphabetically so results are stable across runs.
    fn top_keywords(&self, lowered: &str) -> Vec<KeywordCount> {
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        for m in self.word_re.find_iter(lowered) {
            let word = m.as_str();
            if self.stop_words.contains(word) {
                continue;
            }
            *frequencies.entry(word).or_insert(0) += 1;
        }

        let mut keywords: Vec<KeywordCount> = frequencies
            .into_iter()
            .map(|(word, count)| KeywordCount {
                word: word.to_string(),
                count,
            })
            .collect();
        keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        keywords.truncate(self.config.top_keywords);
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lexicon::load_lexicons;

    fn analyzer() -> PaperAnalyzer {
        PaperAnalyzer::new(&load_lexicons(), AnalyzerConfig::default())
    }

    #[test]
    fn test_methodology_counts_are_word_bounded() {
        let analysis = analyzer().analyze_text(
            "test",
            "The interviewer conducted an interview during fieldwork.",
        );
        let qualitative = analysis
            .methodology
            .scores
            .iter()
            .find(|s| s.family == Methodology::Qualitative)
            .unwrap();
        // "interviewer" must not count toward "interview".
        assert_eq!(qualitative.mentions, 2);
        assert_eq!(analysis.methodology.primary, Some(Methodology::Qualitative));
    }

    #[test]
    fn test_every_lexicon_family_maps_to_a_methodology() {
        let lexicons = load_lexicons();
        for (family, _) in &lexicons.methodologies {
            let methodology = Methodology::from_key(family);
            assert!(methodology.is_some(), "unmapped family: {}", family);
            assert_eq!(methodology.unwrap().key(), family.as_str());
        }
    }

    #[test]
    fn test_no_methodology_signal_leaves_primary_unset() {
        let analysis = analyzer().analyze_text("test", "A short note about gardening.");
        assert_eq!(analysis.methodology.primary, None);
        assert_eq!(analysis.methodology.total_mentions, 0);
        assert_eq!(analysis.methodology.scores.len(), 3);
    }

    #[test]
    fn test_mixed_methods_detection() {
        let analysis = analyzer().analyze_text(
            "test",
            "We adopted a mixed-method design with triangulation of sources.",
        );
        assert_eq!(analysis.methodology.primary, Some(Methodology::MixedMethods));
        let mixed = &analysis.methodology.scores[0];
        assert_eq!(mixed.family, Methodology::MixedMethods);
        assert_eq!(mixed.mentions, 2);
        assert!((mixed.share - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_theories_sorted_with_matched_terms() {
        let analysis = analyzer().analyze_text(
            "test",
            "Marx wrote on inequality; Marx again. Goffman described dramaturgy.",
        );
        assert_eq!(analysis.theories.len(), 2);
        assert_eq!(analysis.theories[0].theory, "conflict_theory");
        assert_eq!(analysis.theories[0].mentions, 3);
        assert_eq!(analysis.theories[0].terms, vec!["marx", "inequality"]);
        assert_eq!(analysis.theories[1].theory, "symbolic_interactionism");
        assert_eq!(analysis.theories[1].mentions, 2);
    }

    #[test]
    fn test_concepts_counted_and_sorted() {
        let analysis = analyzer().analyze_text(
            "test",
            "Social capital matters. Social capital interacts with stigma.",
        );
        assert_eq!(analysis.concepts[0].concept, "social capital");
        assert_eq!(analysis.concepts[0].mentions, 2);
        assert!(analysis
            .concepts
            .iter()
            .any(|c| c.concept == "stigma" && c.mentions == 1));
    }

    #[test]
    fn test_components_match_case_insensitively() {
        let analysis = analyzer().analyze_text(
            "test",
            "We Hypothesize that X. The FINDINGS support it. Participants (n = 24) agreed.",
        );
        let get = |name: &str| {
            analysis
                .components
                .iter()
                .find(|c| c.component == name)
                .map(|c| c.mentions)
        };
        assert_eq!(get("hypothesis"), Some(1));
        assert_eq!(get("findings"), Some(1));
        // "Participants (n = 24)" contains two overlapping sample cues; the
        // engine reports non-overlapping leftmost matches, so it counts once.
        assert_eq!(get("sample"), Some(1));
        assert_eq!(get("limitations"), None);
    }

    #[test]
    fn test_citations_totals_and_ordered_samples() {
        let analysis = analyzer().analyze_text(
            "test",
            "As shown (Smith, 2020), then again (Smith, 2020). Brown (2019) disagreed.",
        );
        assert_eq!(analysis.citations.total, 3);
        assert_eq!(analysis.citations.unique, 2);
        assert_eq!(
            analysis.citations.samples,
            vec!["(Smith, 2020)".to_string(), "Brown (2019)".to_string()]
        );
    }

    #[test]
    fn test_citation_samples_truncate_to_the_configured_cap() {
        let authors = [
            "Adams", "Baker", "Chen", "Davis", "Evans", "Fisher", "Garcia", "Harris", "Ibanez",
            "Jones", "Klein", "Lopez",
        ];
        let text = authors
            .iter()
            .map(|author| format!("Prior work ({}, 2020) is relevant.", author))
            .collect::<Vec<_>>()
            .join(" ");

        let analysis = analyzer().analyze_text("test", &text);
        assert_eq!(analysis.citations.total, 12);
        assert_eq!(analysis.citations.unique, 12);
        // Samples keep the first ten unique citations in lexicographic order.
        assert_eq!(analysis.citations.samples.len(), 10);
        assert_eq!(analysis.citations.samples[0], "(Adams, 2020)");
        assert_eq!(analysis.citations.samples[9], "(Jones, 2020)");
    }

    #[test]
    fn test_document_stats() {
        let text = "Tiny one. This sentence is long enough to be counted properly.\n\nNew paragraph here.";
        let stats = analyzer().analyze_text("test", text).stats;
        assert_eq!(stats.word_count, 14);
        assert_eq!(stats.sentence_count, 1);
        assert_eq!(stats.paragraph_count, 2);
        assert!((stats.avg_sentence_length - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_text_analyzes_to_zeroes() {
        let analysis = analyzer().analyze_text("empty", "");
        assert_eq!(analysis.stats.word_count, 0);
        assert_eq!(analysis.stats.sentence_count, 0);
        // str::split on an empty string yields one empty segment.
        assert_eq!(analysis.stats.paragraph_count, 1);
        assert_eq!(analysis.methodology.primary, None);
        assert!(analysis.theories.is_empty());
        assert!(analysis.concepts.is_empty());
        assert!(analysis.components.is_empty());
        assert_eq!(analysis.citations.total, 0);
        assert!(analysis.keywords.is_empty());
    }

    #[test]
    fn test_keywords_filter_stop_words_and_break_ties_alphabetically() {
        let analysis = analyzer().analyze_text(
            "test",
            "the community and the community and zebra apple apple",
        );
        assert_eq!(analysis.keywords.len(), 3);
        assert_eq!(analysis.keywords[0].word, "apple");
        assert_eq!(analysis.keywords[0].count, 2);
        assert_eq!(analysis.keywords[1].word, "community");
        assert_eq!(analysis.keywords[1].count, 2);
        assert_eq!(analysis.keywords[2].word, "zebra");
        assert!(analysis.keywords.iter().all(|k| k.word != "the"));
    }
}
