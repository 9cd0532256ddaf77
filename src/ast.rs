//! CQL 的 AST 定义
//!
//! 表达式是封闭的和类型 (`Condition | Logical | Not`)，所有遍历方都用
//! 穷尽匹配，新增节点形态时编译器会强制更新每个消费者。

/// 解析结果的根节点, 持有原始文本、AST（可能缺失）和错误列表
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// 原始查询文本
    pub raw: String,
    /// 解析出的表达式树；空查询或完全无法解析时为 None
    pub root: Option<Expr>,
    /// 按发生顺序累积的语法与校验错误
    pub errors: Vec<String>,
}

impl ParsedQuery {
    /// 错误列表为空即有效
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 按前序遍历收集所有叶子条件，供直接检查 AST 的调用方使用
    /// （例如把保存的过滤器里的 IN 值列表枚举出来做分组）
    pub fn conditions(&self) -> Vec<&Condition> {
        match &self.root {
            Some(expr) => expr.conditions(),
            None => Vec::new(),
        }
    }
}

/// 条件表达式树
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// 叶子节点：单个字段条件
    Condition(Condition),
    /// 逻辑与/或运算
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// 逻辑非运算
    Not(Box<Expr>),
}

impl Expr {
    /// 按前序遍历收集所有叶子条件
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        self.collect_conditions(&mut out);
        out
    }

    fn collect_conditions<'a>(&'a self, out: &mut Vec<&'a Condition>) {
        match self {
            Expr::Condition(c) => out.push(c),
            Expr::Logical { left, right, .. } => {
                left.collect_conditions(out);
                right.collect_conditions(out);
            }
            Expr::Not(inner) => inner.collect_conditions(out),
        }
    }
}

/// 逻辑运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        }
    }
}

/// 单个字段条件, 例如：`costs.amount > 100`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// 带命名空间的字段名，格式 `namespace.attribute`
    pub field: String,
    pub operator: CompOp,
    /// 不变量：IN/NOT IN 时为 List，其余为 Scalar
    pub value: ConditionValue,
}

/// 条件右侧的值
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    Eq,      // =
    NotEq,   // !=
    Gt,      // >
    Lt,      // <
    Gte,     // >=
    Lte,     // <=
    In,      // IN (...)
    NotIn,   // NOT IN (...)
    Like,    // LIKE
    NotLike, // NOT LIKE
}

impl CompOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            CompOp::Eq => "=",
            CompOp::NotEq => "!=",
            CompOp::Gt => ">",
            CompOp::Lt => "<",
            CompOp::Gte => ">=",
            CompOp::Lte => "<=",
            CompOp::In => "IN",
            CompOp::NotIn => "NOT IN",
            CompOp::Like => "LIKE",
            CompOp::NotLike => "NOT LIKE",
        }
    }
}

/// 标量字面量
///
/// `Null` 同时充当 NULL 字面量和解析器错误占位条件的值。
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Scalar {
    /// 转成 JSON 值，方便查询执行方按各自引擎的约定绑定参数
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::String(s) => serde_json::Value::String(s.clone()),
            Scalar::Int(n) => serde_json::Value::from(*n),
            Scalar::Float(n) => serde_json::Value::from(*n),
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Null => serde_json::Value::Null,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(field: &str, op: CompOp, value: Scalar) -> Expr {
        Expr::Condition(Condition {
            field: field.to_string(),
            operator: op,
            value: ConditionValue::Scalar(value),
        })
    }

    #[test]
    fn test_conditions_collects_in_preorder() {
        let expr = Expr::Logical {
            op: LogicalOp::And,
            left: Box::new(cond("costs.provider", CompOp::Eq, Scalar::String("aws".into()))),
            right: Box::new(Expr::Not(Box::new(cond(
                "costs.amount",
                CompOp::Gt,
                Scalar::Int(100),
            )))),
        };
        let fields: Vec<_> = expr.conditions().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["costs.provider", "costs.amount"]);
    }

    #[test]
    fn test_scalar_to_json() {
        assert_eq!(Scalar::String("a".into()).to_json(), serde_json::json!("a"));
        assert_eq!(Scalar::Int(7).to_json(), serde_json::json!(7));
        assert_eq!(Scalar::Bool(true).to_json(), serde_json::json!(true));
        assert_eq!(Scalar::Null.to_json(), serde_json::Value::Null);
    }
}
