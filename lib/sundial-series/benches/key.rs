use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sundial_series::{key, Tag, TagSet};

type Series = (String, Vec<(String, String)>);

/// Generates the cartesian product of `names` measurement names and the tag values implied by
/// the per-dimension cardinalities in `dims`: dimension `d` contributes a `tag_d` whose value
/// cycles through `dims[d]` distinct values, with earlier dimensions varying fastest.
fn generate_series(names: usize, dims: &[usize]) -> Vec<Series> {
    let card: usize = dims.iter().product();
    let mut out = Vec::with_capacity(names * card);

    for n in 0..names {
        let name = format!("measurement_{:03}", n);
        let mut counters = vec![0usize; dims.len()];
        for _ in 0..card {
            let tags = counters
                .iter()
                .enumerate()
                .map(|(dim, value)| (format!("tag_{:03}", dim), format!("val_{:03}", value)))
                .collect();
            out.push((name.clone(), tags));

            for (counter, dim) in counters.iter_mut().zip(dims) {
                *counter += 1;
                if *counter < *dim {
                    break;
                }
                *counter = 0;
            }
        }
    }

    out
}

fn encode_keyspace(series: &[Series]) -> Vec<bytes::Bytes> {
    let names: Vec<&[u8]> = series.iter().map(|(name, _)| name.as_bytes()).collect();
    let tag_sets: Vec<TagSet<'_>> = series
        .iter()
        .map(|(_, tags)| {
            tags.iter()
                .map(|(tag_key, value)| Tag::new(tag_key.as_bytes(), value.as_bytes()))
                .collect()
        })
        .collect();

    key::encode_many(&names, &tag_sets).unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let series = generate_series(1, &[25, 2, 2]);
    let keys = encode_keyspace(&series);

    let mut group = c.benchmark_group("series_key/parse");
    group.throughput(Throughput::Elements(keys.len() as u64));

    group.bench_function("recycled", |b| {
        b.iter(|| {
            let mut tags = TagSet::new();
            let mut total = 0;
            for encoded in &keys {
                let (name, parsed) = key::parse_with(encoded, tags).unwrap();
                total += name.len() + parsed.len();
                tags = parsed.recycle();
            }
            total
        })
    });

    group.bench_function("fresh", |b| {
        b.iter(|| {
            let mut total = 0;
            for encoded in &keys {
                let (name, parsed) = key::parse(encoded).unwrap();
                total += name.len() + parsed.len();
            }
            total
        })
    });

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let cases: Vec<(&str, Vec<usize>)> = vec![
        ("first_diff/5_tags", {
            let mut dims = vec![1; 5];
            dims[0] = 2;
            dims
        }),
        ("first_diff/15_tags", {
            let mut dims = vec![1; 15];
            dims[0] = 2;
            dims
        }),
        ("last_diff/5_tags", {
            let mut dims = vec![1; 5];
            dims[4] = 2;
            dims
        }),
        ("last_diff/15_tags", {
            let mut dims = vec![1; 15];
            dims[14] = 2;
            dims
        }),
    ];

    let mut group = c.benchmark_group("series_key/compare");
    for (label, dims) in cases {
        let keys = encode_keyspace(&generate_series(1, &dims));
        let (key_a, key_b) = (&keys[0], &keys[1]);

        group.throughput(Throughput::Bytes((key_a.len() + key_b.len()) as u64));
        group.bench_function(label, |b| {
            b.iter(|| key::compare(black_box(key_a), black_box(key_b)))
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let series = generate_series(1, &[5, 10, 2, 7]);
    let mut keys = encode_keyspace(&series);
    let total_bytes: usize = keys.iter().map(|encoded| encoded.len()).sum();
    keys.shuffle(&mut StdRng::seed_from_u64(0));

    let mut group = c.benchmark_group("series_key/sort");
    group.throughput(Throughput::Bytes(total_bytes as u64));
    group.bench_function(BenchmarkId::from_parameter(keys.len()), |b| {
        b.iter_batched(
            || keys.clone(),
            |mut keys| {
                keys.sort_by(|a, b| key::compare(a, b));
                keys
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let series = generate_series(1, &[25, 10, 4]);
    let names: Vec<&[u8]> = series.iter().map(|(name, _)| name.as_bytes()).collect();
    let tag_sets: Vec<TagSet<'_>> = series
        .iter()
        .map(|(_, tags)| {
            tags.iter()
                .map(|(tag_key, value)| Tag::new(tag_key.as_bytes(), value.as_bytes()))
                .collect()
        })
        .collect();

    let mut group = c.benchmark_group("series_key/generate");
    group.throughput(Throughput::Bytes(key::total_size(&names, &tag_sets) as u64));
    group.bench_function(BenchmarkId::from_parameter(names.len()), |b| {
        b.iter(|| key::encode_many(&names, &tag_sets).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_compare, bench_sort, bench_generate);
criterion_main!(benches);
