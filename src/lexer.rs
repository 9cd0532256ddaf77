//! CQL的词法分析器
//!
//! 把原始查询文本切分为扁平的token流。词法分析是全函数：任何输入都会产生
//! 一个token流，无法识别的字符被直接跳过，未闭合的字符串一直读到输入末尾。

use crate::token::{Span, Token, TokenKind};

pub struct Lexer<'a> {
    input: &'a str,
    /// 输入字符串中的当前位置（字节索引）
    position: usize,
}

/// 对输入完整分词。返回的token流总是以恰好一个 `Eof` 结尾。
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token> = Lexer::new(input).collect();
    let end = input.len();
    tokens.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    tokens
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// 返回当前位置的字符，不推进位置
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// 推进位置一个字符并返回该字符
    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    /// 跳过空白字符
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// 读取数字字面量，带小数点时为浮点数
    /// 注意：可选的负号已经被调用者消费
    fn read_number(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.bump();
            } else {
                break;
            }
        }
        let value_str = &self.input[start..self.position];
        let kind = if value_str.contains('.') {
            TokenKind::Float(value_str.parse::<f64>().unwrap_or(0.0))
        } else {
            TokenKind::Int(value_str.parse::<i64>().unwrap_or(0))
        };
        Token::new(kind, Span::new(start, self.position))
    }

    /// 读取单引号包围的字符串字面量，反斜杠转义下一个字符
    /// 未闭合的字符串一直消费到输入末尾，不报错
    /// 注意：开始的引号已经被调用者消费
    fn read_string(&mut self, start: usize) -> Token<'a> {
        let mut content = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\'' => break,
                '\\' => {
                    if let Some(escaped) = self.bump() {
                        content.push(escaped);
                    }
                }
                _ => content.push(c),
            }
        }
        Token::new(TokenKind::Str(content), Span::new(start, self.position))
    }

    /// 读取标识符或关键字
    /// 标识符可以包含字母、数字、下划线和点；尾部的 `[...]` 整体并入
    /// （tag查找语法，例如 `costs.tag['team']`）
    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else if c == '[' {
                // 消费到 ']' 为止（含）
                while let Some(c) = self.peek() {
                    self.bump();
                    if c == ']' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
        let word = &self.input[start..self.position];
        let kind = classify_word(word);
        Token::new(kind, Span::new(start, self.position))
    }
}

/// 关键字匹配不区分大小写；带点的词是字段引用，其余是裸字面量
fn classify_word(word: &str) -> TokenKind<'_> {
    match word.to_ascii_lowercase().as_str() {
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "in" => TokenKind::In,
        "like" => TokenKind::Like,
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        "null" => TokenKind::Null,
        _ if word.contains('.') => TokenKind::Field(word),
        _ => TokenKind::Bare(word),
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_whitespace();
            let start = self.position;

            let c = self.bump()?;

            let token = match c {
                '(' => Token::new(TokenKind::LParen, Span::new(start, self.position)),
                ')' => Token::new(TokenKind::RParen, Span::new(start, self.position)),
                ',' => Token::new(TokenKind::Comma, Span::new(start, self.position)),
                '=' => Token::new(TokenKind::Eq, Span::new(start, self.position)),
                '\'' => self.read_string(start),
                '<' => {
                    if self.peek() == Some('=') {
                        self.bump();
                        Token::new(TokenKind::Lte, Span::new(start, self.position))
                    } else {
                        Token::new(TokenKind::Lt, Span::new(start, self.position))
                    }
                }
                '>' => {
                    if self.peek() == Some('=') {
                        self.bump();
                        Token::new(TokenKind::Gte, Span::new(start, self.position))
                    } else {
                        Token::new(TokenKind::Gt, Span::new(start, self.position))
                    }
                }
                '!' => {
                    if self.peek() == Some('=') {
                        self.bump();
                        Token::new(TokenKind::NotEq, Span::new(start, self.position))
                    } else {
                        continue; // 孤立的 '!' 按未识别字符处理
                    }
                }
                '-' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                    self.read_number(start)
                }
                c if c.is_ascii_digit() => self.read_number(start),
                c if c.is_alphabetic() || c == '_' => self.read_identifier(start),
                _ => continue, // 跳过无法识别的字符
            };
            return Some(token);
        }
    }
}
