//! Benchmark suite for tuvung-algo
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tuvung_algo::builder::{build_sequence, session_rng, SessionConfig};
use tuvung_algo::scoring::AnswerKey;
use tuvung_algo::types::{Direction, DirectionMode, Word};

fn bench_build_sequence(c: &mut Criterion) {
    let base: Vec<Word> = (0..200)
        .map(|i| Word::new(format!("w{i}"), "l1", format!("word{i}")).with_order(i))
        .collect();
    let config = SessionConfig {
        question_count: 500,
        shuffle: true,
        direction: DirectionMode::Random,
    };
    c.bench_function("build_sequence 200 words x 500", |b| {
        let mut rng = session_rng(Some(42));
        b.iter(|| build_sequence(black_box(&base), &config, &mut rng))
    });
}

fn bench_meaning_match(c: &mut Criterion) {
    let meanings: Vec<String> = ["con mèo", "mèo nhà", "thành phố Hà Nội", "đường phố"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let key = AnswerKey::new(Direction::WordToMeaning, "cat", &meanings);
    c.bench_function("AnswerKey::accepts accent-folded", |b| {
        b.iter(|| key.accepts(black_box("ha noi")))
    });
}

criterion_group!(benches, bench_build_sequence, bench_meaning_match);
criterion_main!(benches);
