/// Core module for paper analysis
///
/// This module contains components for performing paper analysis operations,
/// including lexicon scanning, methodology classification, and report
/// generation.

pub mod analyzer;
pub mod lexicon;
