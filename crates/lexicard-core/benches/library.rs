use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lexicard_core::model::QuizMode;
use lexicard_core::quiz::{QuizConfig, QuizEngine};
use lexicard_core::transfer::{import_words, TransferFormat};
use lexicard_core::{WordEntry, WordStore};

fn entries(n: usize) -> Vec<WordEntry> {
    (0..n)
        .map(|i| {
            WordEntry::new(
                format!("word{i}"),
                "n.",
                format!("词{i}"),
                format!("definition number {i}, with a comma"),
            )
        })
        .collect()
}

fn populated_store(n: usize) -> WordStore {
    let mut store = WordStore::default();
    store.add_words("bench", &entries(n));
    store
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let store = populated_store(2_000);

    group.bench_function("hit_one", |b| {
        b.iter(|| store.search(black_box("word1999"), None))
    });
    group.bench_function("hit_many", |b| {
        b.iter(|| store.search(black_box("definition"), Some("bench")))
    });
    group.bench_function("miss", |b| {
        b.iter(|| store.search(black_box("zzz"), None))
    });

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    let mut csv = String::from("word,partOfSpeech,chinese,english\n");
    for e in entries(500) {
        csv.push_str(&format!(
            "{},{},{},\"{}\"\n",
            e.word, e.part_of_speech, e.chinese, e.english
        ));
    }
    let json = serde_json::to_string(&entries(500)).unwrap_or_default();

    group.bench_function("csv_500", |b| {
        b.iter(|| {
            let mut store = WordStore::default();
            import_words(&mut store, black_box(&csv), TransferFormat::Csv, "bench")
        })
    });
    group.bench_function("json_500", |b| {
        b.iter(|| {
            let mut store = WordStore::default();
            import_words(&mut store, black_box(&json), TransferFormat::Json, "bench")
        })
    });

    group.finish();
}

fn bench_quiz(c: &mut Criterion) {
    let words = entries(200);

    c.bench_function("quiz_full_session_200", |b| {
        b.iter(|| {
            let mut engine = QuizEngine::new(QuizConfig {
                shuffle: true,
                seed: Some(1),
            });
            let _ = engine.start(words.clone(), QuizMode::EnToZh);
            while let Ok(question) = engine.current_question() {
                let _ = engine.check_answer(black_box(&question.expected_answer));
                let _ = engine.next_question();
            }
            engine.finish()
        })
    });
}

criterion_group!(benches, bench_search, bench_import, bench_quiz);
criterion_main!(benches);
