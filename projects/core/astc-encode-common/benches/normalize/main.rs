use astc_encode_common::allocate::ForeignBuffer;
use astc_encode_common::texel::{canonical_len, normalize, normalize_into, PixelFormat};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

#[cfg(not(target_os = "windows"))]
use pprof::criterion::{Output, PProfProfiler};

// 1024x1024, the base level of a typical texture.
const NUM_TEXELS: usize = 1024 * 1024;

fn source_texels(format: PixelFormat) -> Vec<u8> {
    (0..NUM_TEXELS * format.bytes_per_texel())
        .map(|x| (x % 251) as u8)
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Texel Normalization");

    let formats = [
        PixelFormat::Rgb8UNorm,
        PixelFormat::Rgba8UNorm,
        PixelFormat::Rgba16UNorm,
        PixelFormat::Rgb16SFloat,
        PixelFormat::Rgba32SFloat,
    ];

    for format in formats {
        let source = source_texels(format);
        group.throughput(criterion::Throughput::Bytes(source.len() as u64));

        // Includes the staging allocation, as done per mip during compression.
        group.bench_with_input(
            BenchmarkId::new("normalize", format!("{format:?}")),
            &source,
            |b, source| b.iter(|| normalize(format, black_box(source)).unwrap()),
        );

        let mut output = ForeignBuffer::new(canonical_len(format, NUM_TEXELS)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("normalize_into", format!("{format:?}")),
            &source,
            |b, source| {
                b.iter(|| {
                    normalize_into(format, black_box(source), output.as_mut_slice().unwrap())
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

#[cfg(not(target_os = "windows"))]
criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = criterion_benchmark
}

#[cfg(target_os = "windows")]
criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = criterion_benchmark
}

criterion_main!(benches);
