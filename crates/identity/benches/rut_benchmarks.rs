use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use brigada_identity::{compute_check_digit, validate_and_canonicalize};

fn bench_check_digit(c: &mut Criterion) {
    let mut group = c.benchmark_group("rut_check_digit");
    group.throughput(Throughput::Elements(1));
    group.bench_function("compute", |b| {
        b.iter(|| compute_check_digit(black_box(19_980_425)));
    });
    group.finish();
}

fn bench_canonicalize(c: &mut Criterion) {
    let inputs = ["19.980.425-1", "199804251", "19980425", "17.124.966-k"];
    let mut group = c.benchmark_group("rut_canonicalize");
    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("mixed_shapes", |b| {
        b.iter(|| {
            for raw in inputs {
                let _ = validate_and_canonicalize(black_box(raw));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_check_digit, bench_canonicalize);
criterion_main!(benches);
