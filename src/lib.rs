//! CQL: a small SQL-flavored boolean filter language for cloud-cost and
//! resource records, compiled into parameterized SQL WHERE fragments.
//!
//! ```text
//! costs.provider = 'aws' AND costs.region IN ('us-east-1', 'us-west-2')
//! costs.tag['team'] = 'platform'
//! ```
//!
//! Pipeline: [`lexer`] → [`parser`] → [`validator`] → [`sql_compiler`].
//! Everything is synchronous and stateless per call; the only shared state is
//! the read-only schema table and column maps, so calls can run concurrently
//! without coordination. Malformed input never panics: problems accumulate in
//! [`ast::ParsedQuery::errors`].

pub mod ast;
pub mod config;
pub mod lexer;
pub mod parser;
pub mod sql_compiler;
pub mod token;
pub mod validator;

use crate::ast::{ParsedQuery, Scalar};
use crate::config::SchemaConfig;
use crate::parser::Parser;
use crate::sql_compiler::SqlCompiler;

/// Parse a CQL query: tokenize, build the AST, and validate field namespaces
/// against the default schema. Never fails; syntax and validation errors are
/// collected in order on the returned query.
pub fn parse(query: &str) -> ParsedQuery {
    parse_with_schema(query, validator::default_schema())
}

/// Like [`parse`], but validating against a caller-provided schema table
/// (e.g. one loaded from a JSON config at startup).
pub fn parse_with_schema(query: &str, schema: &SchemaConfig) -> ParsedQuery {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return ParsedQuery {
            raw: query.to_string(),
            root: None,
            errors: vec!["Empty query".to_string()],
        };
    }

    let tokens = lexer::tokenize(trimmed);
    let mut parser = Parser::new(&tokens);
    let root = parser.parse();
    let mut errors = parser.into_errors();

    if let Some(expr) = &root {
        validator::validate_expression(expr, schema, &mut errors);
    }

    ParsedQuery {
        raw: query.to_string(),
        root,
        errors,
    }
}

/// Validate a CQL query without producing SQL, for interactive feedback as a
/// user types a filter. Returns `(is_valid, errors)`.
pub fn validate(query: &str) -> (bool, Vec<String>) {
    let result = parse(query);
    (result.is_valid(), result.errors)
}

/// Compile a CQL query to a WHERE fragment for the relational store:
/// named `:pN` placeholders and `<alias>.<column>` references.
pub fn to_relational_where(query: &str, alias: &str) -> (String, Vec<Scalar>) {
    SqlCompiler::relational(alias).compile(&parse(query))
}

/// Compile a CQL query to a WHERE fragment for the analytics engine:
/// positional `$N` placeholders, FOCUS-schema columns, and
/// `json_extract_string` tag lookups.
pub fn to_analytics_where(query: &str) -> (String, Vec<Scalar>) {
    SqlCompiler::analytics().compile(&parse(query))
}
