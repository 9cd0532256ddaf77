//! CQL的语法分析器
//!
//! ## 语法（按结合力从弱到强）
//!
//! ```text
//! query      := or_expr EOF
//! or_expr    := and_expr (OR and_expr)*          -- 左结合
//! and_expr   := not_expr (AND not_expr)*         -- 左结合
//! not_expr   := NOT primary | primary
//! primary    := '(' or_expr ')' | condition
//! condition  := FIELD [NOT] (IN value_list | LIKE value)
//!             | FIELD comparator value
//! value_list := '(' (value (',' value)*)? ')'
//! ```
//!
//! ## 解析流程图
//!
//! ```text
//! parse()
//!   └─ parse_or_expression()
//!        ├─ parse_and_expression()
//!        │    ├─ parse_not_expression()
//!        │    │    └─ parse_primary_expression()
//!        │    │         ├─ "(" → 分组表达式 (递归调用parse_or_expression)
//!        │    │         └─ 其他 → parse_condition()
//!        │    │              ├─ 解析字段名 (Field)
//!        │    │              ├─ [NOT] IN (值列表) / [NOT] LIKE 值
//!        │    │              └─ 比较运算符 + 字面值
//!        │    │
//!        │    └─ 遇到AND时，继续解析右侧NOT表达式
//!        │
//!        └─ 遇到OR时，继续解析右侧AND表达式
//! ```
//!
//! ## 错误处理
//!
//! 解析器累积错误而不是中断：任何输入都会得到一个尽力而为的 AST
//! （或 None）加错误列表，供“只校验不执行”的调用方使用。遇到不是
//! 字段开头的条件时，消费掉出错的token并产出 `unknown = NULL`
//! 占位条件，保证解析向前推进并终止。

use crate::ast::{CompOp, Condition, ConditionValue, Expr, LogicalOp, Scalar};
use crate::token::{Token, TokenKind};

pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    position: usize,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// 返回当前 token 的类型，不推进位置
    /// token流总是以 Eof 结尾，越界时停在最后的 Eof 上
    fn current(&self) -> &TokenKind<'a> {
        let idx = self.position.min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    /// 推进位置一个 token
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// 解析入口。空 token 流（只有 Eof）返回 None 且不算错误；
    /// 末尾多余的 token 记为 "Unexpected token" 错误。
    pub fn parse(&mut self) -> Option<Expr> {
        if self.tokens.is_empty() || self.tokens[0].kind == TokenKind::Eof {
            return None;
        }

        let expr = self.parse_or_expression();

        if *self.current() != TokenKind::Eof {
            let found = self.current().describe();
            self.error(format!("Unexpected token: {}", found));
        }

        Some(expr)
    }

    /// 消费解析器，取出累积的错误列表
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// 解析OR表达式 (最低优先级)，左结合
    fn parse_or_expression(&mut self) -> Expr {
        let mut left = self.parse_and_expression();

        while *self.current() == TokenKind::Or {
            self.advance(); // 消费 OR
            let right = self.parse_and_expression();
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        left
    }

    /// 解析AND表达式 (中等优先级)，左结合
    fn parse_and_expression(&mut self) -> Expr {
        let mut left = self.parse_not_expression();

        while *self.current() == TokenKind::And {
            self.advance(); // 消费 AND
            let right = self.parse_not_expression();
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        left
    }

    /// 解析NOT表达式：NOT 只绑定紧随其后的 primary
    fn parse_not_expression(&mut self) -> Expr {
        if *self.current() == TokenKind::Not {
            self.advance(); // 消费 NOT
            let inner = self.parse_primary_expression();
            Expr::Not(Box::new(inner))
        } else {
            self.parse_primary_expression()
        }
    }

    /// 解析基础表达式：括号分组或单个条件
    fn parse_primary_expression(&mut self) -> Expr {
        if *self.current() == TokenKind::LParen {
            self.advance(); // 消费 (
            let expr = self.parse_or_expression();
            if *self.current() == TokenKind::RParen {
                self.advance(); // 消费 )
            } else {
                self.error("Expected closing parenthesis".to_string());
            }
            expr
        } else {
            self.parse_condition()
        }
    }

    /// 解析单个条件：`FIELD [NOT] (IN 值列表 | LIKE 值) | FIELD 比较符 值`
    fn parse_condition(&mut self) -> Expr {
        let field = match self.current() {
            TokenKind::Field(f) => {
                let field = (*f).to_string();
                self.advance();
                field
            }
            other => {
                let found = other.describe();
                self.error(format!("Expected field name, got: {}", found));
                self.advance(); // 消费出错的token，保证向前推进
                return placeholder_condition();
            }
        };

        // NOT IN / NOT LIKE
        let mut negate = false;
        if *self.current() == TokenKind::Not {
            negate = true;
            self.advance();
        }

        if *self.current() == TokenKind::In {
            self.advance();
            let values = self.parse_value_list();
            let operator = if negate { CompOp::NotIn } else { CompOp::In };
            return Expr::Condition(Condition {
                field,
                operator,
                value: ConditionValue::List(values),
            });
        }

        if *self.current() == TokenKind::Like {
            self.advance();
            let value = self.parse_scalar_value();
            let operator = if negate { CompOp::NotLike } else { CompOp::Like };
            return Expr::Condition(Condition {
                field,
                operator,
                value: ConditionValue::Scalar(value),
            });
        }

        if negate {
            // 语法只允许 NOT IN / NOT LIKE；这里不丢弃 NOT，直接报错
            self.error("Expected IN or LIKE after NOT".to_string());
        }

        if let Some(operator) = self.comparison_operator() {
            self.advance();
            let value = self.parse_scalar_value();
            return Expr::Condition(Condition {
                field,
                operator,
                value: ConditionValue::Scalar(value),
            });
        }

        self.error(format!("Expected operator after field '{}'", field));
        Expr::Condition(Condition {
            field,
            operator: CompOp::Eq,
            value: ConditionValue::Scalar(Scalar::Null),
        })
    }

    /// 当前 token 若是比较运算符则给出对应的 CompOp
    fn comparison_operator(&self) -> Option<CompOp> {
        match self.current() {
            TokenKind::Eq => Some(CompOp::Eq),
            TokenKind::NotEq => Some(CompOp::NotEq),
            TokenKind::Gt => Some(CompOp::Gt),
            TokenKind::Lt => Some(CompOp::Lt),
            TokenKind::Gte => Some(CompOp::Gte),
            TokenKind::Lte => Some(CompOp::Lte),
            _ => None,
        }
    }

    /// 解析条件右侧的标量值；不是值的token不消费，报错后以 NULL 占位
    fn parse_scalar_value(&mut self) -> Scalar {
        match scalar_from_token(self.current()) {
            Some(value) => {
                self.advance();
                value
            }
            None => {
                self.error("Expected value after operator".to_string());
                Scalar::Null
            }
        }
    }

    /// 解析 `(v, v, ...)` 值列表
    ///
    /// 缺少开括号时静默返回空列表，多余的值会在顶层被
    /// "Unexpected token" 检查捕获；列表在输入结束前未闭合则报
    /// "Unclosed value list"。
    fn parse_value_list(&mut self) -> Vec<Scalar> {
        let mut values = Vec::new();

        if *self.current() != TokenKind::LParen {
            return values;
        }
        self.advance(); // 消费 (

        loop {
            match self.current() {
                TokenKind::RParen => {
                    self.advance(); // 消费 )
                    break;
                }
                TokenKind::Eof => {
                    self.error("Unclosed value list".to_string());
                    break;
                }
                TokenKind::Comma => {
                    self.advance();
                }
                other => match scalar_from_token(other) {
                    Some(value) => {
                        values.push(value);
                        self.advance();
                    }
                    None => {
                        let found = other.describe();
                        self.error(format!("Expected value in list, got: {}", found));
                        self.advance(); // 跳过，继续收集后面的值
                    }
                },
            }
        }

        values
    }
}

/// 条件必须以字段开头；不满足时用这个占位条件保证解析终止，
/// 只检查 `is_valid` 的调用方行为仍然正确
fn placeholder_condition() -> Expr {
    Expr::Condition(Condition {
        field: "unknown".to_string(),
        operator: CompOp::Eq,
        value: ConditionValue::Scalar(Scalar::Null),
    })
}

/// 值类 token 对应的标量；字段和裸词按字符串值处理
fn scalar_from_token(kind: &TokenKind) -> Option<Scalar> {
    match kind {
        TokenKind::Str(s) => Some(Scalar::String(s.clone())),
        TokenKind::Int(n) => Some(Scalar::Int(*n)),
        TokenKind::Float(n) => Some(Scalar::Float(*n)),
        TokenKind::Bool(b) => Some(Scalar::Bool(*b)),
        TokenKind::Null => Some(Scalar::Null),
        TokenKind::Bare(w) => Some(Scalar::String((*w).to_string())),
        TokenKind::Field(f) => Some(Scalar::String((*f).to_string())),
        _ => None,
    }
}
