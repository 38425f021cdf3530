use criterion::{Criterion, criterion_group, criterion_main};
use notephemeral_engine::{Cmd, Document};
mod common;

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let doc = Document::from_markdown(&common::generate_note(50));

    group.bench_function("type_url_at_end", |b| {
        b.iter(|| {
            let mut d = doc.clone();
            for ch in " https://example.com".chars() {
                let at = d.selection().end;
                let patch = d.apply(Cmd::InsertText {
                    at,
                    text: ch.to_string(),
                });
                std::hint::black_box(patch);
            }
        });
    });

    group.bench_function("enter_twice", |b| {
        b.iter(|| {
            let mut d = doc.clone();
            d.apply(Cmd::Enter);
            std::hint::black_box(d.apply(Cmd::Enter));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_typing);
criterion_main!(benches);
