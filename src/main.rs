use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cql_compiler::ast::ParsedQuery;
use cql_compiler::config::SchemaConfig;
use cql_compiler::sql_compiler::{SqlCompiler, TAUTOLOGY};
use cql_compiler::{lexer, parse_with_schema};

/// 加载命名空间表，优先使用JSON配置，失败时使用内置默认表
fn load_schema() -> SchemaConfig {
    match SchemaConfig::from_json_file("cql_schema.json") {
        Ok(schema) => {
            println!("✅ 成功从JSON配置文件加载命名空间表");
            schema
        }
        Err(e) => {
            println!("⚠️ 无法加载JSON配置文件 ({}), 使用内置默认表", e);
            SchemaConfig::default()
        }
    }
}

fn main() -> Result<()> {
    println!("--- CQL: 过滤表达式到 SQL 编译器 ---");

    // 显示当前使用的命名空间表
    println!("\n[配置信息]:");
    let schema = load_schema();
    println!("已加载 {} 个命名空间:", schema.get_namespaces().len());
    for (namespace, attrs) in schema.get_namespaces() {
        println!("  {} -> {:?}", namespace, attrs);
    }

    // 1. 示例查询，演示完整流水线
    let example = "costs.provider = 'aws' AND costs.region IN ('us-east-1', 'us-west-2')";
    println!("\n[示例查询]:\n{}\n", example);
    run_pipeline(example, &schema);

    // 2. 交互模式：逐行输入过滤表达式
    println!("\n--- 交互模式 (Ctrl-D 退出) ---");
    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("cql> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;
                run_pipeline(line, &schema);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// 对一条查询跑完整流水线：分词 → 解析+校验 → 两种方言的SQL
fn run_pipeline(query: &str, schema: &SchemaConfig) {
    // 词法分析
    let tokens = lexer::tokenize(query);
    println!("[步骤 1]: 生成了 {} 个 token", tokens.len());

    // 语法分析 + 命名空间校验
    let parsed: ParsedQuery = parse_with_schema(query, schema);
    if parsed.is_valid() {
        println!("[步骤 2]: ✅ 解析成功");
        if let Some(root) = &parsed.root {
            println!("AST 结构: {:#?}", root);
        }
    } else {
        println!("[步骤 2]: ✗ 查询无效");
        for error in &parsed.errors {
            println!("  • {}", error);
        }
        println!("  （两种方言都会退化为 {} 兜底片段）", TAUTOLOGY);
    }

    // SQL 编译：关系库方言
    let (sql, params) = SqlCompiler::relational("c").compile(&parsed);
    println!("\n[关系库方言]:");
    println!("  WHERE {}", sql);
    println!("  参数: {:?}", params);

    // SQL 编译：分析引擎方言
    let (sql, params) = SqlCompiler::analytics().compile(&parsed);
    println!("\n[分析引擎方言]:");
    println!("  WHERE {}", sql);
    println!("  参数: {:?}", params);
}
