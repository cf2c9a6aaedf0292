//! Diagnostics for fail-soft schema handling.
//!
//! Nothing in the compilation pipeline returns an error. Every recoverable
//! problem is recorded here instead and the pipeline degrades to a safe default.

use std::fmt;

/// Problems recovered while normalizing a payload or resolving relationships
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Payload matches none of the known schema shapes
    UnrecognizedFormat { found: String },
    /// Column definition is not an object
    MalformedColumnDefinition { table: String, column: String },
    /// Reference present but not of the form `table(column)`
    MalformedReference {
        table: String,
        column: String,
        reference: String,
    },
    /// A stringified payload failed to parse as JSON
    InvalidJson { message: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedFormat { found } => {
                write!(f, "Unrecognized schema format ({})", found)
            }
            Diagnostic::MalformedColumnDefinition { table, column } => {
                write!(
                    f,
                    "Malformed column definition: {}.{} (treated as UNKNOWN)",
                    table, column
                )
            }
            Diagnostic::MalformedReference {
                table,
                column,
                reference,
            } => {
                write!(
                    f,
                    "Malformed reference '{}' on {}.{} (relationship omitted)",
                    reference, table, column
                )
            }
            Diagnostic::InvalidJson { message } => {
                write!(f, "Invalid JSON payload: {}", message)
            }
        }
    }
}

/// Collects diagnostics during a normalization pass
#[derive(Debug)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    max_diagnostics: usize,
}

impl Default for DiagnosticCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            max_diagnostics: 100,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            diagnostics: Vec::new(),
            max_diagnostics: limit,
        }
    }

    /// Record a diagnostic and log it. Exact duplicates are dropped.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        if self.diagnostics.len() < self.max_diagnostics && !self.diagnostics.contains(&diagnostic)
        {
            self.diagnostics.push(diagnostic);
        }
    }

    /// Take over diagnostics recorded (and logged) by an earlier pass
    pub fn absorb(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            if self.diagnostics.len() >= self.max_diagnostics {
                break;
            }
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Print a summary to stderr
    pub fn print_summary(&self) {
        if self.diagnostics.is_empty() {
            return;
        }

        eprintln!("\nDiagnostics ({}):", self.diagnostics.len());
        for diagnostic in &self.diagnostics {
            eprintln!("  ⚠ {}", diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_dropped() {
        let mut collector = DiagnosticCollector::new();
        let d = Diagnostic::MalformedColumnDefinition {
            table: "t".to_string(),
            column: "c".to_string(),
        };
        collector.add(d.clone());
        collector.add(d);
        assert_eq!(collector.count(), 1);
    }

    #[test]
    fn test_limit() {
        let mut collector = DiagnosticCollector::with_limit(2);
        for i in 0..5 {
            collector.add(Diagnostic::InvalidJson {
                message: format!("error {}", i),
            });
        }
        assert_eq!(collector.count(), 2);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::MalformedReference {
            table: "productos".to_string(),
            column: "categoria_id".to_string(),
            reference: "categorias.id".to_string(),
        };
        assert_eq!(
            d.to_string(),
            "Malformed reference 'categorias.id' on productos.categoria_id (relationship omitted)"
        );
    }
}
