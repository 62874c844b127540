//! Non-fatal problems collected while importing or exporting
//!
//! Every fallible step of a conversion returns `Result<T, Diagnostic>`; the
//! caller records the diagnostic and carries on with the rest of the batch.

use serde::Serialize;
use thiserror::Error;

/// Kind of a [`Diagnostic`], without its details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnsupportedStatement,
    UnknownTypeMapping,
    DanglingReference,
    MalformedAst,
    DuplicateDefinition,
    UnsupportedDialectFeature,
}

/// A problem local to one statement or entity
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Statement the importer cannot classify; skipped
    #[error("{}unsupported statement `{kind}`", at(.statement))]
    UnsupportedStatement {
        statement: Option<usize>,
        kind: String,
    },

    /// Type unknown to the target dialect; replaced by `fallback`
    #[error("{}type `{data_type}` of `{column}` is not available, using `{fallback}`", at(.statement))]
    UnknownTypeMapping {
        statement: Option<usize>,
        column: String,
        data_type: String,
        fallback: String,
    },

    /// Reference to a table or field that does not exist; the referencing
    /// index/constraint is skipped
    #[error("{}{context} references missing `{target}`", at(.statement))]
    DanglingReference {
        statement: Option<usize>,
        context: String,
        target: String,
    },

    /// Structurally invalid input; the statement is skipped
    #[error("{}malformed {kind}: {reason}", at(.statement))]
    MalformedAst {
        statement: Option<usize>,
        kind: String,
        reason: String,
    },

    /// A table, column or type defined twice; the later definition is skipped
    #[error("{}`{name}` is already defined", at(.statement))]
    DuplicateDefinition {
        statement: Option<usize>,
        name: String,
    },

    /// Construct the target dialect cannot express natively
    #[error("{feature} is not supported by {dialect}: {fallback}")]
    UnsupportedDialectFeature {
        dialect: String,
        feature: String,
        fallback: String,
    },
}

fn at(statement: &Option<usize>) -> String {
    match statement {
        Some(index) => format!("statement {}: ", index + 1),
        None => String::new(),
    }
}

impl Diagnostic {
    /// Kind of this diagnostic
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::UnsupportedStatement { .. } => DiagnosticKind::UnsupportedStatement,
            Diagnostic::UnknownTypeMapping { .. } => DiagnosticKind::UnknownTypeMapping,
            Diagnostic::DanglingReference { .. } => DiagnosticKind::DanglingReference,
            Diagnostic::MalformedAst { .. } => DiagnosticKind::MalformedAst,
            Diagnostic::DuplicateDefinition { .. } => DiagnosticKind::DuplicateDefinition,
            Diagnostic::UnsupportedDialectFeature { .. } => {
                DiagnosticKind::UnsupportedDialectFeature
            }
        }
    }

    /// Zero-based index of the statement this diagnostic belongs to
    pub fn statement(&self) -> Option<usize> {
        match self {
            Diagnostic::UnsupportedStatement { statement, .. }
            | Diagnostic::UnknownTypeMapping { statement, .. }
            | Diagnostic::DanglingReference { statement, .. }
            | Diagnostic::MalformedAst { statement, .. }
            | Diagnostic::DuplicateDefinition { statement, .. } => *statement,
            Diagnostic::UnsupportedDialectFeature { .. } => None,
        }
    }

    /// Attach a statement index to a diagnostic produced without one
    pub fn at_statement(mut self, index: usize) -> Self {
        match &mut self {
            Diagnostic::UnsupportedStatement { statement, .. }
            | Diagnostic::UnknownTypeMapping { statement, .. }
            | Diagnostic::DanglingReference { statement, .. }
            | Diagnostic::MalformedAst { statement, .. }
            | Diagnostic::DuplicateDefinition { statement, .. } => *statement = Some(index),
            Diagnostic::UnsupportedDialectFeature { .. } => {}
        }
        self
    }

    pub(crate) fn dangling(context: impl Into<String>, target: impl Into<String>) -> Self {
        Diagnostic::DanglingReference {
            statement: None,
            context: context.into(),
            target: target.into(),
        }
    }

    pub(crate) fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Diagnostic::MalformedAst {
            statement: None,
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}
