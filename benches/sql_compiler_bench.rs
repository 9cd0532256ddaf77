use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use cql_compiler::lexer::{self, Lexer};
use cql_compiler::parser::Parser;
use cql_compiler::sql_compiler::SqlCompiler;

const TEST_CASES: &[(&str, &str)] = &[
    ("simple", "costs.service = 'Amazon EC2'"),
    (
        "medium",
        "costs.provider = 'aws' AND costs.region IN ('us-east-1', 'us-west-2') AND costs.amount > 100",
    ),
    (
        "complex",
        "(costs.provider = 'aws' OR costs.provider = 'gcp') AND NOT costs.service = 'Amazon S3' \
         AND costs.tag['team'] = 'platform' AND costs.date >= '2024-01-01'",
    ),
];

// 基准测试：词法分析性能
fn benchmark_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_performance");

    for (name, query) in TEST_CASES {
        group.bench_with_input(BenchmarkId::new("tokenize", name), query, |b, &query| {
            b.iter(|| {
                let tokens: Vec<_> = Lexer::new(black_box(query)).collect();
                black_box(tokens)
            })
        });
    }

    group.finish();
}

// 基准测试：语法分析性能
fn benchmark_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_performance");

    for (name, query) in TEST_CASES {
        // 预先词法分析
        let tokens = lexer::tokenize(query);

        group.bench_with_input(BenchmarkId::new("parse", name), &tokens, |b, tokens| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(tokens));
                black_box(parser.parse())
            })
        });
    }

    group.finish();
}

// 基准测试：SQL编译性能（两种方言）
fn benchmark_sql_compiler(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_compiler_performance");

    for (name, query) in TEST_CASES {
        // 预处理：词法分析和语法分析
        let parsed = cql_compiler::parse(query);
        assert!(parsed.is_valid(), "基准查询应该有效");

        group.bench_with_input(
            BenchmarkId::new("compile_relational", name),
            &parsed,
            |b, parsed| {
                b.iter(|| {
                    let compiler = SqlCompiler::relational("c");
                    black_box(compiler.compile(black_box(parsed)))
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("compile_analytics", name),
            &parsed,
            |b, parsed| {
                b.iter(|| {
                    let compiler = SqlCompiler::analytics();
                    black_box(compiler.compile(black_box(parsed)))
                })
            },
        );
    }

    group.finish();
}

// 基准测试：完整的端到端处理
fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end_performance");

    for (name, query) in TEST_CASES {
        group.bench_with_input(BenchmarkId::new("full_pipeline", name), query, |b, &query| {
            b.iter(|| {
                // 完整的处理流程：解析 + 校验 + 编译
                let result = cql_compiler::to_analytics_where(black_box(query));
                black_box(result)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_lexer,
    benchmark_parser,
    benchmark_sql_compiler,
    benchmark_end_to_end
);
criterion_main!(benches);
