//! Field-namespace validation.
//!
//! Every field reference has the form `namespace.attribute` (or
//! `namespace.tag['key']`). The namespace must exist in the schema table and
//! the attribute must be listed, unless the namespace allows wildcard
//! attributes. Problems are appended to the error list and validation keeps
//! walking, so callers get the full set of problems in one pass.

use crate::ast::{Condition, Expr};
use crate::config::SchemaConfig;
use once_cell::sync::Lazy;

/// Process-wide default schema, built once and never mutated.
static DEFAULT_SCHEMA: Lazy<SchemaConfig> = Lazy::new(SchemaConfig::default);

pub fn default_schema() -> &'static SchemaConfig {
    &DEFAULT_SCHEMA
}

/// Walk the expression tree and validate every leaf condition's field.
pub fn validate_expression(expr: &Expr, schema: &SchemaConfig, errors: &mut Vec<String>) {
    match expr {
        Expr::Condition(condition) => validate_condition(condition, schema, errors),
        Expr::Logical { left, right, .. } => {
            validate_expression(left, schema, errors);
            validate_expression(right, schema, errors);
        }
        Expr::Not(inner) => validate_expression(inner, schema, errors),
    }
}

fn validate_condition(condition: &Condition, schema: &SchemaConfig, errors: &mut Vec<String>) {
    if let Some(message) = validate_field(&condition.field, schema) {
        errors.push(message);
    }
}

/// Validate a single field reference, returning an error message if invalid.
pub fn validate_field(field: &str, schema: &SchemaConfig) -> Option<String> {
    let Some((namespace, attribute)) = field.split_once('.') else {
        // The lexer only emits dotted field references; a bare name here is
        // the parser's error placeholder, already reported as a syntax error.
        return None;
    };

    if !schema.has_namespace(namespace) {
        return Some(format!("Unknown field namespace: '{}'", namespace));
    }

    // costs.tag['team'] validates as the `tag` attribute
    let attribute = attribute.split('[').next().unwrap_or(attribute);

    if !schema.allows_attribute(namespace, attribute) {
        return Some(format!(
            "Unknown attribute '{}' for namespace '{}'",
            attribute, namespace
        ));
    }

    None
}
