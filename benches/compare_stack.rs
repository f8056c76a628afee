#[macro_use]
extern crate criterion;

use core::cmp::Ordering;

use criterion::{black_box, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use flex_stack::{alloc::Global, capacity::GrowExact, stack::Custom, Comparator, Stack};

fn cmp_u64(a: &u64, b: &u64) -> Ordering {
    a.cmp(b)
}

fn random_values(count: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(count as u64);
    (0..count).map(|_| rng.gen_range(0..count as u64 * 4)).collect()
}

fn standard_compare(c: &mut Criterion) {
    const SMALL_COUNT: usize = 100;
    const LARGE_COUNT: usize = 1000;

    for count in [SMALL_COUNT, LARGE_COUNT] {
        c.bench_function(&format!("stack push {} values", count), |b| {
            b.iter(|| {
                let mut buf = Stack::<usize>::new();
                for value in 0..count {
                    buf.push(black_box(value));
                }
            });
        });

        c.bench_function(&format!("stack exact push {} values", count), |b| {
            b.iter(|| {
                let mut buf = Stack::<usize, Custom<Global, usize, GrowExact>>::default();
                for value in 0..count {
                    buf.push(black_box(value));
                }
            });
        });

        c.bench_function(
            &format!("stack with_reserve({0}) push {0} values", count),
            |b| {
                b.iter(|| {
                    let mut buf = Stack::<usize>::with_reserve(None, count);
                    for value in 0..count {
                        buf.push(black_box(value));
                    }
                });
            },
        );

        c.bench_function(&format!("stdvec push {} values", count), |b| {
            b.iter(|| {
                let mut buf = Vec::<usize>::new();
                for value in 0..count {
                    buf.push(black_box(value));
                }
            });
        });

        c.bench_function(&format!("stack unshift {} values", count), |b| {
            b.iter(|| {
                let mut buf = Stack::<usize>::new();
                for value in 0..count {
                    buf.unshift(black_box(value));
                }
            });
        });

        c.bench_function(&format!("stdvec insert(0) {} values", count), |b| {
            b.iter(|| {
                let mut buf = Vec::<usize>::new();
                for value in 0..count {
                    buf.insert(0, black_box(value));
                }
            });
        });

        c.bench_function(&format!("stack extend {} values", count), |b| {
            b.iter(|| {
                let mut buf = Stack::<usize>::new();
                buf.extend(black_box(0..count));
            });
        });

        c.bench_function(&format!("stdvec extend {} values", count), |b| {
            b.iter(|| {
                let mut buf = Vec::<usize>::new();
                buf.extend(black_box(0..count));
            });
        });

        let data = random_values(count);

        c.bench_function(&format!("stack sort {} values", count), |b| {
            b.iter(|| {
                let mut buf = Stack::<u64>::with_comparator(Comparator::new(cmp_u64));
                buf.extend(data.iter().copied());
                buf.sort();
                black_box(buf.is_sorted())
            });
        });

        c.bench_function(&format!("stdvec sort {} values", count), |b| {
            b.iter(|| {
                let mut buf = Vec::<u64>::new();
                buf.extend(data.iter().copied());
                buf.sort_unstable_by(cmp_u64);
                black_box(buf.len())
            });
        });

        let mut sorted = Stack::<u64>::with_comparator(Comparator::new(cmp_u64));
        sorted.extend(data.iter().copied());
        sorted.sort();
        let mut vec_sorted = data.clone();
        vec_sorted.sort_unstable();

        c.bench_function(&format!("stack find in {} values", count), |b| {
            let mut key = 0u64;
            b.iter(|| {
                key = (key + 7) % (count as u64 * 4);
                black_box(sorted.find(black_box(&key)))
            });
        });

        c.bench_function(&format!("stdvec binary_search in {} values", count), |b| {
            let mut key = 0u64;
            b.iter(|| {
                key = (key + 7) % (count as u64 * 4);
                black_box(vec_sorted.binary_search(black_box(&key)).ok())
            });
        });

        c.bench_function(&format!("stack dup {} values", count), |b| {
            b.iter(|| black_box(sorted.try_dup().map(|s| s.len())));
        });
    }
}

criterion_group!(benches, standard_compare);
criterion_main!(benches);
