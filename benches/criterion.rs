use std::hint::black_box;

use carmine::{u32_native, ByteMap};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

const NUM_KEYS: u32 = 4096;

fn shuffled_keys(seed: u64) -> Vec<[u8; 4]> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<[u8; 4]> = (0..NUM_KEYS).map(|k| k.to_ne_bytes()).collect();
    keys.shuffle(&mut rng);
    keys
}

fn populated_map(keys: &[[u8; 4]]) -> ByteMap {
    let mut map = ByteMap::with_comparator(4, 4, u32_native);
    for key in keys {
        map.try_insert(Some(key), Some(key)).unwrap();
    }
    map
}

fn bench_insert(c: &mut Criterion) {
    let keys = shuffled_keys(0xB0);
    let mut group = c.benchmark_group("map/insert");
    group.bench_function("shuffled_4096", |b| {
        b.iter_batched(
            || keys.clone(),
            |keys| black_box(populated_map(&keys)),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let keys = shuffled_keys(0xB1);
    let map = populated_map(&keys);
    let absent: Vec<[u8; 4]> = (NUM_KEYS..2 * NUM_KEYS).map(|k| k.to_ne_bytes()).collect();

    let mut group = c.benchmark_group("map/lookup");
    group.bench_function("hit_4096", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(black_box(key)));
            }
        });
    });
    group.bench_function("miss_4096", |b| {
        b.iter(|| {
            for key in &absent {
                black_box(map.find(black_box(key)).is_miss());
            }
        });
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let keys = shuffled_keys(0xB2);
    let map = populated_map(&keys);
    let order = shuffled_keys(0xB3);

    let mut group = c.benchmark_group("map/remove");
    group.bench_function("drain_4096", |b| {
        b.iter_batched(
            || map.clone(),
            |mut map| {
                for key in &order {
                    black_box(map.remove(key));
                }
                map
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_remove);
criterion_main!(benches);
