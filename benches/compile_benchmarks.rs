//! Performance benchmarks for the compilation pipeline.
//!
//! Measures end-to-end compilation across workload sizes, plus the front
//! end on its own so parser regressions are visible separately.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

const SMALL: &str = "\
int answer() {
    return 42;
}

int main() {
    answer();
    return 0;
}
";

/// Build a program with `n` functions that declare locals, bind registers
/// in inline assembly, and call each other forward.
fn synthesize_program(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n {
        source.push_str(&format!(
            "int step{i}(int seed) {{\n    int local{i} = {i};\n    asm(\"nop\" : =rbx(local{i}));\n    return seed;\n}}\n"
        ));
    }
    source.push_str("int main() {\n");
    for i in 0..n {
        source.push_str(&format!("    step{i}({i});\n"));
    }
    source.push_str("    return 0;\n}\n");
    source
}

fn end_to_end_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/end_to_end");

    group.throughput(Throughput::Bytes(SMALL.len() as u64));
    group.bench_function("small", |b| {
        b.iter(|| minic::compile(black_box(SMALL)).unwrap());
    });

    let medium = synthesize_program(50);
    group.throughput(Throughput::Bytes(medium.len() as u64));
    group.bench_function("medium_50_functions", |b| {
        b.iter(|| minic::compile(black_box(&medium)).unwrap());
    });

    let large = synthesize_program(500);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large_500_functions", |b| {
        b.iter(|| minic::compile(black_box(&large)).unwrap());
    });

    group.finish();
}

fn front_end_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile/front_end");

    let medium = synthesize_program(50);
    group.throughput(Throughput::Bytes(medium.len() as u64));
    group.bench_function("lex_and_parse", |b| {
        b.iter(|| {
            let tokens = minic::lexer::tokenize(black_box(&medium)).unwrap();
            minic::parser::parse(tokens).unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, end_to_end_benchmarks, front_end_benchmarks);
criterion_main!(benches);
