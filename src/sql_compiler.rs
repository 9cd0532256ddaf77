//! SQL compiler that converts the CQL AST to parameterized WHERE fragments.
//!
//! One recursive tree walk is shared by both backends; a dialect only decides
//! placeholder syntax and field-to-column mapping. Literal values never reach
//! the SQL text: every value travels through the ordered parameter list, and
//! the only identifiers interpolated into the fragment are field names that
//! passed namespace validation against the closed schema table.

use crate::ast::{ConditionValue, Expr, ParsedQuery, Scalar};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Fallback fragment for an absent or invalid AST, safe to splice into any
/// larger WHERE clause.
pub const TAUTOLOGY: &str = "1=1";

/// The per-backend knobs of SQL generation: placeholder rendering and
/// field-to-column resolution. The AND/OR/NOT/condition recursion is written
/// once in [`SqlCompiler`].
pub trait SqlDialect {
    /// Render the placeholder for the parameter at `index` (0-based position
    /// in the parameter list).
    fn placeholder(&self, index: usize) -> String;

    /// Resolve a namespaced CQL field to the column expression for this
    /// backend.
    fn column(&self, field: &str) -> String;
}

/// Columns the relational store maps directly; everything else falls back to
/// `<alias>.<attribute>`.
static RELATIONAL_COLUMN_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("costs.service", "service"),
        ("costs.region", "region"),
        ("costs.provider", "provider"),
        ("costs.account_id", "account_id"),
        ("costs.amount", "amount"),
        ("costs.currency", "currency"),
        ("costs.date", "date"),
        ("costs.resource_id", "resource_id"),
        ("costs.category", "category"),
        ("costs.charge_type", "charge_type"),
    ])
});

/// CQL fields to FOCUS-schema columns for the analytics engine.
static FOCUS_COLUMN_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("costs.service", "service"),
        ("costs.region", "region"),
        ("costs.provider", "provider"),
        ("costs.account_id", "account_id"),
        ("costs.amount", "amount"),
        ("costs.currency", "currency"),
        ("costs.date", "usage_date"),
        ("costs.resource_id", "resource_id"),
        ("costs.charge_type", "charge_type"),
        ("resources.resource_id", "resource_id"),
        ("resources.service", "service"),
        ("resources.region", "region"),
        ("resources.provider", "provider"),
        ("resources.account_id", "account_id"),
    ])
});

/// Relational-store dialect: named `:pN` placeholders, alias-qualified
/// columns.
#[derive(Debug, Clone)]
pub struct RelationalDialect {
    pub alias: String,
}

impl RelationalDialect {
    pub fn new(alias: impl Into<String>) -> Self {
        Self { alias: alias.into() }
    }
}

impl Default for RelationalDialect {
    fn default() -> Self {
        Self::new("c")
    }
}

impl SqlDialect for RelationalDialect {
    fn placeholder(&self, index: usize) -> String {
        format!(":p{}", index)
    }

    fn column(&self, field: &str) -> String {
        let column = RELATIONAL_COLUMN_MAP
            .get(field)
            .copied()
            .unwrap_or_else(|| last_segment(field));
        format!("{}.{}", self.alias, column)
    }
}

/// Analytics/columnar dialect: positional `$N` placeholders (1-indexed),
/// FOCUS-schema columns, and JSON-path extraction for tag lookups.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsDialect;

impl SqlDialect for AnalyticsDialect {
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index + 1)
    }

    fn column(&self, field: &str) -> String {
        // costs.tag['env'] -> json_extract_string(tags, '$.env')
        if field.contains("tag[") {
            return format!("json_extract_string(tags, '$.{}')", tag_key(field));
        }
        FOCUS_COLUMN_MAP
            .get(field)
            .copied()
            .unwrap_or_else(|| last_segment(field))
            .to_string()
    }
}

/// The last `.`-separated segment of a field name.
fn last_segment(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

/// Extract the tag key from a field like `costs.tag['environment']` or
/// `costs.tag[environment]`.
fn tag_key(field: &str) -> &str {
    let Some(start) = field.find('[') else {
        return "unknown";
    };
    let Some(end) = field[start..].find(']') else {
        return "unknown";
    };
    field[start + 1..start + end].trim_matches('\'')
}

/// Compiles a validated AST into `(sql_fragment, ordered_parameter_values)`.
pub struct SqlCompiler<D: SqlDialect> {
    dialect: D,
}

impl SqlCompiler<RelationalDialect> {
    /// Compiler for the relational store, with the given table alias.
    pub fn relational(alias: impl Into<String>) -> Self {
        Self::new(RelationalDialect::new(alias))
    }
}

impl SqlCompiler<AnalyticsDialect> {
    /// Compiler for the analytics engine.
    pub fn analytics() -> Self {
        Self::new(AnalyticsDialect)
    }
}

impl<D: SqlDialect> SqlCompiler<D> {
    pub fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Compile a parsed query. An invalid query or an absent root compiles to
    /// the tautology fragment with no parameters, so callers can compose the
    /// result into a larger WHERE clause unconditionally.
    pub fn compile(&self, query: &ParsedQuery) -> (String, Vec<Scalar>) {
        match &query.root {
            Some(root) if query.is_valid() => self.compile_root(root),
            _ => (TAUTOLOGY.to_string(), Vec::new()),
        }
    }

    /// Compile an expression tree directly.
    pub fn compile_root(&self, root: &Expr) -> (String, Vec<Scalar>) {
        let mut params = Vec::new();
        let sql = self.compile_expr(root, &mut params);
        (sql, params)
    }

    fn compile_expr(&self, expr: &Expr, params: &mut Vec<Scalar>) -> String {
        match expr {
            Expr::Condition(condition) => {
                let col = self.dialect.column(&condition.field);
                let op = condition.operator.as_sql();
                match &condition.value {
                    ConditionValue::List(values) => {
                        let placeholders: Vec<String> = values
                            .iter()
                            .map(|value| {
                                let ph = self.dialect.placeholder(params.len());
                                params.push(value.clone());
                                ph
                            })
                            .collect();
                        format!("{} {} ({})", col, op, placeholders.join(", "))
                    }
                    ConditionValue::Scalar(value) => {
                        let ph = self.dialect.placeholder(params.len());
                        params.push(value.clone());
                        format!("{} {} {}", col, op, ph)
                    }
                }
            }
            Expr::Logical { op, left, right } => {
                let left_sql = self.compile_expr(left, params);
                let right_sql = self.compile_expr(right, params);
                format!("({} {} {})", left_sql, op.as_sql(), right_sql)
            }
            Expr::Not(inner) => {
                let inner_sql = self.compile_expr(inner, params);
                format!("NOT ({})", inner_sql)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn relational(input: &str) -> (String, Vec<Scalar>) {
        SqlCompiler::relational("c").compile(&parse(input))
    }

    fn analytics(input: &str) -> (String, Vec<Scalar>) {
        SqlCompiler::analytics().compile(&parse(input))
    }

    #[test]
    fn test_single_condition_relational() {
        let (sql, params) = relational("costs.service = 'Amazon EC2'");
        assert_eq!(sql, "c.service = :p0");
        assert_eq!(params, vec![Scalar::String("Amazon EC2".to_string())]);
    }

    #[test]
    fn test_and_condition_relational() {
        let (sql, params) = relational("costs.provider = 'aws' AND costs.region = 'us-east-1'");
        assert_eq!(sql, "(c.provider = :p0 AND c.region = :p1)");
        assert_eq!(
            params,
            vec![
                Scalar::String("aws".to_string()),
                Scalar::String("us-east-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_in_expands_one_placeholder_per_value() {
        let (sql, params) = relational("costs.region IN ('us-east-1', 'us-west-2')");
        assert_eq!(sql, "c.region IN (:p0, :p1)");
        assert_eq!(
            params,
            vec![
                Scalar::String("us-east-1".to_string()),
                Scalar::String("us-west-2".to_string()),
            ]
        );
    }

    #[test]
    fn test_not_in() {
        let (sql, params) = relational("costs.provider NOT IN ('aws', 'gcp')");
        assert_eq!(sql, "c.provider NOT IN (:p0, :p1)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_empty_in_list() {
        let query = parse("costs.region IN ()");
        let (sql, params) = SqlCompiler::relational("c").compile(&query);
        assert_eq!(sql, "c.region IN ()");
        assert!(params.is_empty());
    }

    #[test]
    fn test_like_relational() {
        let (sql, params) = relational("costs.service LIKE 'Amazon%'");
        assert_eq!(sql, "c.service LIKE :p0");
        assert_eq!(params, vec![Scalar::String("Amazon%".to_string())]);
    }

    #[test]
    fn test_not_like_relational() {
        let (sql, _) = relational("costs.service NOT LIKE '%S3%'");
        assert_eq!(sql, "c.service NOT LIKE :p0");
    }

    #[test]
    fn test_not_expression_wraps_inner() {
        let (sql, params) = relational("costs.amount > 100 AND NOT costs.service = 'Amazon S3'");
        assert_eq!(sql, "(c.amount > :p0 AND NOT (c.service = :p1))");
        assert_eq!(
            params,
            vec![Scalar::Int(100), Scalar::String("Amazon S3".to_string())]
        );
    }

    #[test]
    fn test_custom_alias() {
        let (sql, _) = SqlCompiler::relational("costs")
            .compile(&parse("costs.provider = 'aws'"));
        assert_eq!(sql, "costs.provider = :p0");
    }

    #[test]
    fn test_unmapped_field_falls_back_to_alias_attribute() {
        let (sql, _) = relational("costs.subcategory = 'storage'");
        assert_eq!(sql, "c.subcategory = :p0");
    }

    #[test]
    fn test_analytics_positional_placeholders() {
        let (sql, params) = analytics("costs.provider = 'aws' AND costs.amount > 100");
        assert_eq!(sql, "(provider = $1 AND amount > $2)");
        assert_eq!(
            params,
            vec![Scalar::String("aws".to_string()), Scalar::Int(100)]
        );
    }

    #[test]
    fn test_analytics_focus_column_remapping() {
        let (sql, _) = analytics("costs.date > '2024-01-01'");
        assert_eq!(sql, "usage_date > $1");
    }

    #[test]
    fn test_analytics_tag_lookup() {
        let (sql, params) = analytics("costs.tag['team'] = 'platform'");
        assert_eq!(sql, "json_extract_string(tags, '$.team') = $1");
        assert_eq!(params, vec![Scalar::String("platform".to_string())]);
    }

    #[test]
    fn test_analytics_tag_lookup_unquoted_key() {
        let (sql, _) = analytics("costs.tag[env] = 'prod'");
        assert_eq!(sql, "json_extract_string(tags, '$.env') = $1");
    }

    #[test]
    fn test_analytics_in_placeholders_stay_positional() {
        let (sql, params) =
            analytics("costs.region IN ('us-east-1', 'us-west-2') AND costs.amount > 5");
        assert_eq!(sql, "(region IN ($1, $2) AND amount > $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_injection_stays_in_params() {
        for input in [
            "costs.service = 'it\\'s'",
            "costs.service = '\\'; DROP TABLE x; --'",
        ] {
            let (sql, params) = relational(input);
            assert_eq!(sql, "c.service = :p0");
            assert_eq!(params.len(), 1);
            // The literal appears only in the parameter list
            let Scalar::String(value) = &params[0] else {
                panic!("Expected string parameter");
            };
            assert!(!sql.contains(value.as_str()));
            assert!(!sql.contains("DROP TABLE"));
        }
    }

    #[test]
    fn test_empty_query_compiles_to_tautology_in_both_dialects() {
        let (sql, params) = relational("");
        assert_eq!((sql.as_str(), params.len()), (TAUTOLOGY, 0));

        let (sql, params) = analytics("");
        assert_eq!((sql.as_str(), params.len()), (TAUTOLOGY, 0));
    }

    #[test]
    fn test_invalid_query_compiles_to_tautology() {
        let (sql, params) = relational("costs.provider = ");
        assert_eq!(sql, TAUTOLOGY);
        assert!(params.is_empty());
    }

    #[test]
    fn test_bool_and_null_parameters() {
        let (sql, params) = analytics("resources.state = TRUE");
        assert_eq!(sql, "state = $1");
        assert_eq!(params, vec![Scalar::Bool(true)]);

        let (_, params) = relational("costs.category = NULL");
        assert_eq!(params, vec![Scalar::Null]);
    }

    #[test]
    fn test_tag_key_extraction() {
        assert_eq!(tag_key("costs.tag['environment']"), "environment");
        assert_eq!(tag_key("costs.tag[environment]"), "environment");
        assert_eq!(tag_key("costs.tag"), "unknown");
    }
}
