use criterion::{criterion_group, criterion_main, Criterion};
use phi_engine::{Dataizer, Normalizer, Ruleset};
use phi_parser::parse;
use std::hint::black_box;

fn yegor() -> Ruleset {
    let src = std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../rules/yegor.yaml"
    ))
    .expect("standard ruleset file");
    Ruleset::from_yaml(&src).expect("standard ruleset compiles")
}

fn benchmark_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let rs = yegor();

    group.bench_function("decoration_dispatch", |b| {
        let norm = Normalizer::new(&rs);
        let term =
            parse("⟦ a ↦ ⟦ b ↦ ⟦ c ↦ ∅, d ↦ ⟦ φ ↦ ξ.ρ.c ⟧ ⟧, e ↦ ξ.b(c ↦ ⟦ ⟧).d ⟧.e ⟧")
                .unwrap();
        b.iter(|| black_box(norm.normalize(black_box(&term))));
    });

    group.bench_function("chain_enumeration", |b| {
        let norm = Normalizer::new(&rs);
        // Three independent redexes: six interleavings to walk.
        let term = parse("⟦ a ↦ ⟦ x ↦ Φ ⟧.x, b ↦ ⟦ y ↦ ξ ⟧.y, c ↦ ξ() ⟧").unwrap();
        b.iter(|| black_box(norm.chains(black_box(&term)).count()));
    });

    group.finish();
}

fn benchmark_dataization(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataize");
    let rs = yegor();

    group.bench_function("int_plus", |b| {
        let dz = Dataizer::new(&rs);
        let term = parse(
            "⟦ Δ ⤍ 00-00-00-00-00-00-00-02, plus ↦ ⟦ λ ⤍ Lorg_eolang_int_plus, α0 ↦ ∅ ⟧ ⟧\
             .plus(α0 ↦ ⟦ Δ ⤍ 00-00-00-00-00-00-00-03 ⟧)",
        )
        .unwrap();
        b.iter(|| black_box(dz.dataize(black_box(&term))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_normalization, benchmark_dataization);
criterion_main!(benches);
