use brew_core::mocks::ConstPin;
use brew_core::{Fixed, PhSensorReader};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn bench_sen0161(c: &mut Criterion) {
    c.bench_function("sen0161_ph_value", |b| {
        b.iter_batched(
            || {
                PhSensorReader::builder()
                    .model("SEN0161")
                    .analog_pin(0, ConstPin(612))
                    .try_build()
                    .unwrap()
            },
            |mut s| black_box(s.ph_value()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("fixed_parse_owfs_text", |b| {
        b.iter(|| black_box("     2.345678".parse::<Fixed>()))
    });
}

criterion_group!(benches, bench_sen0161, bench_parse);
criterion_main!(benches);
