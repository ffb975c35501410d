//! Бенчмарки разбора для stepql

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use stepql::parser::{scan, Lexer};
use stepql::{parse_each, parse_many, parse_one};

const STATEMENTS: &[(&str, &str)] = &[
    ("select", "SELECT Sno, Sname FROM Student WHERE Sdept = 'CS' AND Sage <= 20"),
    (
        "insert",
        "INSERT INTO Student (Sno, Sname, Ssex, Sage, Sdept) VALUES ('201215128', 'Chen', 'M', 18, 'IS')",
    ),
    ("update", "UPDATE Student SET Sage = 22 WHERE Sno = '201215121'"),
    (
        "create_table",
        "CREATE TABLE SC (Sno CHAR(9) NOT NULL, Cno CHAR(4), Grade SMALLINT CHECK (Grade >= 0 AND Grade <= 100), PRIMARY KEY (Sno, Cno), FOREIGN KEY (Sno) REFERENCES Student(Sno))",
    ),
    (
        "create_view",
        "CREATE VIEW IS_Student AS SELECT Sno, Sname FROM Student WHERE Sdept = 'IS'",
    ),
];

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    // Самое длинное совпадение перебирает весь словарь
    group.bench_function("phrase", |b| {
        b.iter(|| black_box(scan(black_box("INSERT INTO Student"))));
    });
    group.bench_function("identifier", |b| {
        b.iter(|| black_box(scan(black_box("Sname FROM Student"))));
    });

    let (_, sql) = STATEMENTS[3];
    group.throughput(Throughput::Bytes(sql.len() as u64));
    group.bench_function("tokenize_create_table", |b| {
        b.iter(|| black_box(Lexer::new(black_box(sql)).tokenize()));
    });

    group.finish();
}

fn bench_parse_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_one");

    for (name, sql) in STATEMENTS {
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), sql, |b, sql| {
            b.iter(|| parse_one(black_box(sql)).unwrap());
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    for size in [10usize, 100, 1000] {
        let batch: Vec<&str> = STATEMENTS
            .iter()
            .map(|(_, sql)| *sql)
            .cycle()
            .take(size)
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("parse_many", size), &batch, |b, batch| {
            b.iter(|| parse_many(black_box(batch)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parse_each", size), &batch, |b, batch| {
            b.iter(|| black_box(parse_each(black_box(batch))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_parse_one, bench_batch);
criterion_main!(benches);
