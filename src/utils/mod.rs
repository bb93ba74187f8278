/// Utility modules for the paper analyzer
///
/// This module contains utility functions for document handling, output
/// formatting, and other helper operations.

pub mod file_utils;
pub mod output_formatter;
