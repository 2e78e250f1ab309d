//! # Neugram front end benchmarks
//!
//! Criterion.rs benchmarks for each phase.
//!
//! ## Groups
//! - `lexer`: tokenizing
//! - `parser`: parsing to a syntax tree
//! - `checker`: parsing and type checking
//!
//! ## Usage
//! ```bash
//! cargo bench          # all groups
//! cargo bench checker  # only the checker
//! ```

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use neugram::frontend::lexer::tokenize;
use neugram::frontend::parser::parse;
use neugram::util::logger::{self, LogLevel};
use neugram::Compiler;

/// A program touching most of the checker: methodiks, interfaces,
/// `num` functions, maps, closures and control flow
fn program(copies: usize) -> String {
    let mut src = String::from(
        "type Stringer interface {\n\tString() string\n}\n\
         func max(x, y num) num {\n\tif x > y {\n\t\treturn x\n\t}\n\treturn y\n}\n",
    );
    for i in 0..copies {
        src.push_str(&format!(
            "methodik P{i} struct {{\n\tX, Y int\n}} {{\n\
             \tfunc (p) String() string {{\n\t\treturn \"p\"\n\t}}\n\
             \tfunc (p *) Scale(k int) {{\n\t\tp.X *= k\n\t\tp.Y *= k\n\t}}\n\
             }}\n\
             var s{i} Stringer = P{i}{{X: 1, Y: 2}}\n\
             m{i} := map[string]int{{\"a\": {i}}}\n\
             v{i}, ok{i} := m{i}[\"a\"]\n\
             f{i} := func(n int) int {{\n\tt := 0\n\tfor j := 0; j < n; j++ {{\n\t\tt += max(j, v{i})\n\t}}\n\treturn t\n}}\n\
             if ok{i} {{\n\tprint(f{i}(10), s{i}.String())\n}}\n",
            i = i
        ));
    }
    src
}

fn bench_tokenize(c: &mut Criterion) {
    let src = program(50);
    c.bench_function("tokenize_50", |b| b.iter(|| tokenize("bench.ng", black_box(&src))));
}

fn bench_parse(c: &mut Criterion) {
    let src = program(50);
    c.bench_function("parse_50", |b| b.iter(|| parse("bench.ng", black_box(&src))));
}

fn bench_check(c: &mut Criterion) {
    // Keep logging quiet
    logger::init_with_level(LogLevel::Error);

    let src = program(50);
    c.bench_function("check_50", |b| {
        b.iter(|| {
            let mut compiler = Compiler::new();
            compiler
                .check_source("bench.ng", black_box(&src))
                .expect("benchmark program should check")
        })
    });
}

fn bench_check_small(c: &mut Criterion) {
    let src = program(1);
    c.bench_function("check_1", |b| {
        b.iter(|| {
            let mut compiler = Compiler::new();
            compiler
                .check_source("bench.ng", black_box(&src))
                .expect("benchmark program should check")
        })
    });
}

criterion_group!(
    name = lexer;
    config = Criterion::default().sample_size(50);
    targets = bench_tokenize
);

criterion_group!(
    name = parser;
    config = Criterion::default().sample_size(50);
    targets = bench_parse
);

criterion_group!(
    name = checker;
    config = Criterion::default().sample_size(30);
    targets = bench_check, bench_check_small
);

criterion_main!(lexer, parser, checker);
