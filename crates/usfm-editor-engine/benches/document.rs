use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use usfm_editor_engine::editing::{Cmd, Document};
use usfm_editor_engine::models::VersePath;
mod common;

fn bench_document_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_creation");
    group.sample_size(20);

    let content = common::generate_usfm_content(50);
    group.bench_function("from_bytes", |b| {
        let bytes = content.as_bytes();
        b.iter(|| {
            let doc = Document::from_bytes(black_box(bytes)).unwrap();
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    group.sample_size(20);

    let content = common::generate_usfm_content(50);
    let doc = Document::from_bytes(content.as_bytes()).unwrap();

    group.bench_function("join_then_unjoin", |b| {
        let mut d = doc.clone();
        b.iter(|| {
            let at = VersePath::new(black_box(25), 2);
            d.apply(Cmd::JoinWithPreviousVerse { at }).unwrap();
            let patch = d.apply(Cmd::UnjoinVerses { at: VersePath::new(25, 1) });
            black_box(patch).unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_document_creation, bench_transforms);
criterion_main!(benches);
