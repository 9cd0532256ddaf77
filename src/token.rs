//! The token definition for the CQL filter language.

/// A token is a single unit of the language, with a specific kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Keywords (case-insensitive in the source text)
    And,  // "AND"
    Or,   // "OR"
    Not,  // "NOT"
    In,   // "IN"
    Like, // "LIKE"

    /// A namespaced field reference, e.g. `costs.region` or `costs.tag['team']`.
    /// An identifier run is only classified as a field when it contains a dot.
    Field(&'a str),

    // Literals
    Str(String), // Single-quoted string, backslash escapes resolved
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Bare(&'a str), // An unquoted word, treated as a string value

    // Comparison operators
    Eq,    // =
    NotEq, // !=
    Gt,    // >
    Lt,    // <
    Gte,   // >=
    Lte,   // <=

    // Punctuation
    LParen, // (
    RParen, // )
    Comma,  // ,

    /// End of input. `tokenize` terminates every stream with exactly one.
    Eof,
}

impl<'a> TokenKind<'a> {
    /// Human-readable rendering used in parser error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::And => "AND".to_string(),
            TokenKind::Or => "OR".to_string(),
            TokenKind::Not => "NOT".to_string(),
            TokenKind::In => "IN".to_string(),
            TokenKind::Like => "LIKE".to_string(),
            TokenKind::Field(f) => (*f).to_string(),
            TokenKind::Str(s) => format!("'{}'", s),
            TokenKind::Int(n) => n.to_string(),
            TokenKind::Float(n) => n.to_string(),
            TokenKind::Bool(b) => b.to_string().to_uppercase(),
            TokenKind::Null => "NULL".to_string(),
            TokenKind::Bare(w) => (*w).to_string(),
            TokenKind::Eq => "=".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Gte => ">=".to_string(),
            TokenKind::Lte => "<=".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
