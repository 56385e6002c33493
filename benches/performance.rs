use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;
use yakstra_core::{
    codec::{csv, json},
    domain::{AmountPolicy, Transaction, TransactionType, EXPENSE_CATEGORIES},
    stats,
    storage::{self, JsonFileStore},
};

fn build_sample(txn_count: usize) -> Vec<Transaction> {
    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..txn_count)
        .map(|idx| {
            let date = (start_date + Duration::days((idx % 365) as i64))
                .format("%Y-%m-%d")
                .to_string();
            let txn = if idx % 10 == 0 {
                Transaction::income("Salary", 2500.0, "Salary", date)
            } else {
                let category = EXPENSE_CATEGORIES[idx % EXPENSE_CATEGORIES.len()];
                Transaction::expense("Purchase", 10.0 + (idx % 100) as f64, category, date)
            };
            txn.with_id(idx.to_string())
        })
        .collect()
}

fn bench_codecs(c: &mut Criterion) {
    let txns = build_sample(black_box(10_000));
    let csv_text = csv::encode(&txns);
    let json_text = json::encode(&txns).expect("encode json");

    c.bench_function("csv_encode_10k", |b| b.iter(|| black_box(csv::encode(&txns))));
    c.bench_function("csv_decode_10k", |b| {
        b.iter(|| black_box(csv::decode(&csv_text, AmountPolicy::Lenient).expect("decode csv")))
    });
    c.bench_function("json_decode_10k", |b| {
        b.iter(|| black_box(json::decode(&json_text, AmountPolicy::Lenient).expect("decode json")))
    });
}

fn bench_aggregation(c: &mut Criterion) {
    let txns = build_sample(black_box(10_000));
    let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("monthly_summary_10k", |b| {
        b.iter(|| black_box(stats::summarize_month(&txns, reference)))
    });
    c.bench_function("category_breakdown_10k", |b| {
        b.iter(|| black_box(stats::category_totals(&txns, TransactionType::Expense).breakdown()))
    });
}

fn bench_store_io(c: &mut Criterion) {
    let txns = build_sample(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path()).expect("store");

    c.bench_function("store_save_10k", |b| {
        b.iter(|| storage::save_transactions(&store, &txns).expect("save"))
    });
    c.bench_function("store_load_10k", |b| {
        b.iter(|| black_box(storage::load_transactions(&store)))
    });
}

criterion_group!(benches, bench_codecs, bench_aggregation, bench_store_io);
criterion_main!(benches);
