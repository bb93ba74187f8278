/// Lexicon definitions for the paper analyzer
///
/// This module contains the sociology-specific keyword lexicons and regex
/// patterns used to classify research methodology, detect theories and
/// concepts, count research components, and extract citations.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// The full set of lexicons and patterns the analyzer scans with.
///
/// Keyword terms are stored lowercase; keyword scans run against a lowercased
/// copy of the document, so every listed term is matchable. Regex entries for
/// research components carry their own `(?i)` flag, and citation patterns are
/// case-sensitive on purpose (they key on capitalized author names).
#[derive(Debug, Clone)]
pub struct LexiconSet {
    /// Methodology family -> indicator terms.
    pub methodologies: Vec<(String, Vec<String>)>,
    /// Theory name -> indicator terms.
    pub theories: Vec<(String, Vec<String>)>,
    /// Standalone sociological concepts.
    pub concepts: Vec<String>,
    /// Research component name -> regex.
    pub components: Vec<(String, String)>,
    /// Citation regexes, in match-priority order.
    pub citations: Vec<String>,
    /// Words excluded from keyword frequency counts.
    pub stop_words: HashSet<String>,
}

/// Load all lexicons and scan patterns.
pub fn load_lexicons() -> LexiconSet {
    LexiconSet {
        methodologies: methodology_terms(),
        theories: theory_terms(),
        concepts: concept_terms(),
        components: component_patterns(),
        citations: citation_patterns(),
        stop_words: stop_words(),
    }
}

/// Indicator terms for the three research methodology families.
pub fn methodology_terms() -> Vec<(String, Vec<String>)> {
    vec![
        (
            "qualitative".to_string(),
            to_terms(&[
                "ethnography",
                "ethnographic",
                "interview",
                "focus group",
                "case study",
                "participant observation",
                "grounded theory",
                "narrative analysis",
                "discourse analysis",
                "content analysis",
                "phenomenology",
                "phenomenological",
                "autoethnography",
                "life history",
                "oral history",
                "fieldwork",
                "field notes",
            ]),
        ),
        (
            "quantitative".to_string(),
            to_terms(&[
                "survey",
                "questionnaire",
                "regression",
                "statistical analysis",
                "anova",
                "correlation",
                "sample size",
                "n =",
                "p <",
                "p-value",
                "significance",
                "t-test",
                "chi-square",
                "factor analysis",
                "logistic regression",
                "descriptive statistics",
                "inferential statistics",
                "random sample",
                "probability sample",
                "statistical significance",
            ]),
        ),
        (
            "mixed_methods".to_string(),
            to_terms(&[
                "mixed method",
                "mixed-method",
                "triangulation",
                "sequential design",
                "concurrent design",
                "convergent design",
                "explanatory sequential",
                "exploratory sequential",
            ]),
        ),
    ]
}

/// Indicator terms for major sociological theories.
pub fn theory_terms() -> Vec<(String, Vec<String>)> {
    vec![
        (
            "structural_functionalism".to_string(),
            to_terms(&[
                "structural functionalism",
                "functionalism",
                "functional",
                "parsons",
                "merton",
                "durkheim",
                "social structure",
                "social system",
                "equilibrium",
                "manifest function",
                "latent function",
            ]),
        ),
        (
            "conflict_theory".to_string(),
            to_terms(&[
                "conflict theory",
                "marx",
                "marxist",
                "class conflict",
                "power dynamics",
                "inequality",
                "oppression",
                "hegemony",
                "exploitation",
                "domination",
                "class struggle",
            ]),
        ),
        (
            "symbolic_interactionism".to_string(),
            to_terms(&[
                "symbolic interaction",
                "interactionism",
                "goffman",
                "blumer",
                "mead",
                "dramaturgy",
                "impression management",
                "self concept",
                "looking glass self",
                "significant other",
                "generalized other",
            ]),
        ),
        (
            "feminist_theory".to_string(),
            to_terms(&[
                "feminist",
                "feminism",
                "patriarchy",
                "gender inequality",
                "intersectionality",
                "womens studies",
                "masculine",
                "feminine",
                "gender roles",
                "sex and gender",
                "gender stratification",
            ]),
        ),
        (
            "critical_race_theory".to_string(),
            to_terms(&[
                "critical race",
                "crt",
                "racial formation",
                "systemic racism",
                "structural racism",
                "racial inequality",
                "colorblind",
                "white privilege",
                "racialization",
            ]),
        ),
        (
            "postmodernism".to_string(),
            to_terms(&[
                "postmodern",
                "postmodernism",
                "foucault",
                "derrida",
                "deconstruction",
                "discourse",
                "power/knowledge",
                "grand narrative",
                "metanarrative",
                "fragmentation",
            ]),
        ),
        (
            "rational_choice".to_string(),
            to_terms(&[
                "rational choice",
                "rational actor",
                "cost-benefit",
                "utility maximization",
                "game theory",
                "exchange theory",
                "social exchange",
            ]),
        ),
        (
            "social_constructionism".to_string(),
            to_terms(&[
                "social construction",
                "socially constructed",
                "berger",
                "luckmann",
                "reality construction",
                "social reality",
            ]),
        ),
    ]
}

/// Key sociological concepts counted individually.
///
/// Overlapping terms ("status" and "achieved status") are counted
/// independently, so one occurrence of the longer phrase also counts toward
/// the shorter one.
pub fn concept_terms() -> Vec<String> {
    to_terms(&[
        "social capital",
        "cultural capital",
        "habitus",
        "field",
        "stigma",
        "deviance",
        "anomie",
        "social solidarity",
        "mechanical solidarity",
        "organic solidarity",
        "gemeinschaft",
        "gesellschaft",
        "social mobility",
        "stratification",
        "socialization",
        "social control",
        "social institution",
        "norms",
        "values",
        "roles",
        "status",
        "achieved status",
        "ascribed status",
        "in-group",
        "out-group",
        "reference group",
        "primary group",
        "secondary group",
        "bureaucracy",
        "rationalization",
        "mcdonaldization",
        "globalization",
        "urbanization",
        "modernization",
        "secularization",
        "social movement",
        "collective behavior",
        "social change",
    ])
}

/// Named regexes for research components (hypotheses, samples, findings...).
///
/// These run over the raw text and match case-insensitively.
pub fn component_patterns() -> Vec<(String, String)> {
    vec![
        (
            "hypothesis".to_string(),
            r"(?i)(?:hypothesis|hypotheses|we hypothesize|hypothesized)".to_string(),
        ),
        (
            "research_question".to_string(),
            r"(?i)(?:research question|RQ\d+|this study (?:asks|examines|investigates))".to_string(),
        ),
        (
            "sample".to_string(),
            r"(?i)(?:sample size|n\s*=\s*\d+|participants?\s*\(n\s*=\s*\d+\))".to_string(),
        ),
        (
            "findings".to_string(),
            r"(?i)(?:findings|results show|we found|discovered that|demonstrates? that)".to_string(),
        ),
        (
            "limitations".to_string(),
            r"(?i)(?:limitation|caveat|shortcoming|weakness of this study)".to_string(),
        ),
        (
            "future_research".to_string(),
            r"(?i)(?:future research|further investigation|future studies)".to_string(),
        ),
    ]
}

/// Citation patterns, case-sensitive: author names anchor on a capital.
///
/// Covers "(Author, 2020)", "(Author and Other, 2020)", "(Author et al.,
/// 2020)" and the narrative form "Author (2020)".
pub fn citation_patterns() -> Vec<String> {
    vec![
        r"\([A-Z][a-z]+(?:,?\s+(?:and|&)\s+[A-Z][a-z]+)*,?\s+\d{4}\)".to_string(),
        r"\([A-Z][a-z]+\s+et\s+al\.,?\s+\d{4}\)".to_string(),
        r"[A-Z][a-z]+\s+\(\d{4}\)".to_string(),
    ]
}

/// Words excluded from the keyword frequency scan.
pub fn stop_words() -> HashSet<String> {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do",
        "does", "did", "will", "would", "could", "should", "may", "might", "can", "this", "that",
        "these", "those", "i", "you", "he", "she", "it", "we", "they", "what", "which", "who",
        "when", "where", "why", "how", "all", "each", "every", "both", "few", "more", "most",
        "other", "some", "such", "than", "too", "very",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

/// Build a word-bounded regex for a literal lexicon term.
pub fn term_pattern(term: &str) -> String {
    format!(r"\b{}\b", regex::escape(term))
}

/// Helper function to compile a pattern
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::error!("Error compiling pattern {:?}: {}", pattern, e);
            None
        }
    }
}

fn to_terms(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

lazy_static! {
    /// Sentence boundary used by the document statistics scan.
    pub static ref SENTENCE_BOUNDARY: Regex =
        Regex::new(r"[.!?]+").expect("sentence boundary pattern");
    /// Keyword token: a lowercase word of four or more letters.
    pub static ref WORD_TOKEN: Regex =
        Regex::new(r"\b[a-z]{4,}\b").expect("word token pattern");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for (name, pattern) in component_patterns() {
            assert!(
                compile_pattern(&pattern).is_some(),
                "component pattern {} failed to compile",
                name
            );
        }
        for pattern in citation_patterns() {
            assert!(compile_pattern(&pattern).is_some());
        }
    }

    #[test]
    fn test_term_pattern_escapes_punctuation() {
        let re = compile_pattern(&term_pattern("p-value")).unwrap();
        assert!(re.is_match("the p-value was small"));
        assert!(!re.is_match("the pvalue was small"));

        let re = compile_pattern(&term_pattern("power/knowledge")).unwrap();
        assert!(re.is_match("foucault's power/knowledge nexus"));
    }

    #[test]
    fn test_term_pattern_is_word_bounded() {
        let re = compile_pattern(&term_pattern("interview")).unwrap();
        assert!(re.is_match("an interview with"));
        assert!(!re.is_match("the interviewer asked"));
    }

    #[test]
    fn test_lexicon_terms_are_lowercase() {
        let lexicons = load_lexicons();
        for concept in &lexicons.concepts {
            assert_eq!(concept, &concept.to_lowercase());
        }
        for (_, terms) in &lexicons.methodologies {
            for term in terms {
                assert_eq!(term, &term.to_lowercase());
            }
        }
    }

    #[test]
    fn test_lexicon_shape() {
        let lexicons = load_lexicons();
        assert_eq!(lexicons.methodologies.len(), 3);
        assert_eq!(lexicons.theories.len(), 8);
        assert_eq!(lexicons.concepts.len(), 38);
        assert_eq!(lexicons.components.len(), 6);
        assert_eq!(lexicons.citations.len(), 3);
        assert!(lexicons.stop_words.contains("the"));
    }
}
