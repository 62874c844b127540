//! SQL front end: raw DDL text to normalized statements using sqlparser-rs

mod adapter;
mod loose;
mod statement;

pub use adapter::normalize;
pub use statement::*;

use sqlparser::dialect::{
    Dialect as SqlDialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect,
};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;
use tracing::{debug, trace};

use crate::dialect::Dialect;

/// sqlparser dialect used to read `dialect`. Oracle has no dedicated
/// dialect and is read with the generic one.
fn parser_dialect(dialect: Dialect) -> Box<dyn SqlDialect> {
    match dialect {
        Dialect::MySql | Dialect::MariaDb => Box::new(MySqlDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::Sqlite => Box::new(SQLiteDialect {}),
        Dialect::MsSql => Box::new(MsSqlDialect {}),
        Dialect::Oracle => Box::new(GenericDialect {}),
    }
}

/// Longest run of `;`-separated pieces joined while looking for the end of
/// a quoted literal that contains `;`
const MAX_JOINED_PIECES: usize = 64;

/// Parse DDL text into normalized statements, one per input statement.
///
/// A statement with a syntax error becomes [`DdlStatement::Malformed`] and
/// parsing resumes after its terminating `;`. When the text as a whole cannot
/// be tokenized, e.g. because of an unterminated string literal, it is split
/// at `;` and each piece is tokenized on its own, so only the broken
/// statement is lost.
pub fn parse_statements(sql: &str, dialect: Dialect) -> Vec<DdlStatement> {
    let sql_dialect = parser_dialect(dialect);
    let mut statements = Vec::new();

    match Parser::new(sql_dialect.as_ref()).try_with_sql(sql) {
        Ok(mut parser) => read_statements(&mut parser, &mut statements),
        Err(err) => {
            debug!("Tokenizing failed ({}), retrying piece by piece", err);
            read_pieces(sql_dialect.as_ref(), sql, &mut statements);
        }
    }

    debug!("Parsed {} statements as {}", statements.len(), dialect);
    statements
}

/// Parse every statement left in `parser`
fn read_statements(parser: &mut Parser<'_>, statements: &mut Vec<DdlStatement>) {
    loop {
        while parser.consume_token(&Token::SemiColon) {}
        let leading = parser.peek_token().token;
        if leading == Token::EOF {
            break;
        }

        let result = parser.parse_statement().and_then(|statement| {
            // same check `Parser::parse_sql` makes between statements
            match parser.peek_token().token {
                Token::SemiColon | Token::EOF => Ok(statement),
                other => Err(ParserError::ParserError(format!(
                    "Expected: end of statement, found: {}",
                    other
                ))),
            }
        });

        match result {
            Ok(statement) => {
                let normalized = normalize(&statement);
                trace!(
                    "Statement {} normalized as {}",
                    statements.len() + 1,
                    normalized.label()
                );
                statements.push(normalized);
            }
            Err(err) => {
                debug!("Statement {} failed to parse: {}", statements.len() + 1, err);
                statements.push(DdlStatement::Malformed {
                    kind: leading.to_string().to_uppercase(),
                    reason: err.to_string(),
                });
                skip_statement(parser);
            }
        }
    }
}

/// Tokenize `sql` piece by piece, splitting at every `;`. A piece that does
/// not tokenize is joined with the following ones until the run reads as
/// whole statements; if no run does, the piece alone becomes a malformed
/// statement.
fn read_pieces(dialect: &dyn SqlDialect, sql: &str, statements: &mut Vec<DdlStatement>) {
    let ends: Vec<usize> = sql
        .match_indices(';')
        .map(|(i, _)| i)
        .chain(std::iter::once(sql.len()))
        .collect();

    let mut start = 0;
    let mut piece = 0;
    while piece < ends.len() {
        let last = ends.len().min(piece + MAX_JOINED_PIECES);
        let mut first_error = None;
        let mut accepted = None;
        for (k, &end) in ends.iter().enumerate().take(last).skip(piece) {
            let mut parser = match Parser::new(dialect).try_with_sql(&sql[start..end]) {
                Ok(parser) => parser,
                Err(err) => {
                    first_error.get_or_insert(err);
                    continue;
                }
            };
            let mut parsed = Vec::new();
            read_statements(&mut parser, &mut parsed);
            // a joined run may only close a literal, not swallow a later quote
            let clean = !parsed
                .iter()
                .any(|s| matches!(s, DdlStatement::Malformed { .. }));
            if k == piece || clean {
                accepted = Some((k, parsed));
                break;
            }
        }

        let consumed = match accepted {
            Some((k, parsed)) => {
                statements.extend(parsed);
                k
            }
            None => {
                let text = &sql[start..ends[piece]];
                let reason = first_error.map(|e| e.to_string()).unwrap_or_default();
                debug!("Statement {} failed to tokenize: {}", statements.len() + 1, reason);
                statements.push(DdlStatement::Malformed {
                    kind: leading_word(text),
                    reason,
                });
                piece
            }
        };
        start = (ends[consumed] + 1).min(sql.len());
        piece = consumed + 1;
    }
}

/// First keyword of a statement, skipping blank lines and `--` comments
fn leading_word(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("--"))
        .and_then(|line| line.split(|c: char| !c.is_alphanumeric() && c != '_').next())
        .unwrap_or_default()
        .to_uppercase()
}

/// Advance past the next `;` or to the end of input
fn skip_statement(parser: &mut Parser<'_>) {
    loop {
        match parser.next_token().token {
            Token::SemiColon | Token::EOF => return,
            _ => {}
        }
    }
}
