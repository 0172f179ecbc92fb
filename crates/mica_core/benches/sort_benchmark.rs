//! Benchmarks for the pool sort and view iteration.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bytemuck::{Pod, Zeroable};
use mica_core::{sort_by, ComponentPool, Entity, Registry, View};

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct Depth {
    z: f32,
}

#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct Flag {
    on: u32,
}

const POOL_SIZE: usize = 10_000;

fn shuffled_pool(rng: &mut StdRng) -> ComponentPool {
    let mut pool = ComponentPool::for_type::<Depth>();
    for raw in 0..POOL_SIZE {
        let entity = Entity::from_raw(raw as u32);
        let record = Depth { z: rng.gen_range(-1000.0..1000.0) };
        pool.push(entity, bytemuck::bytes_of(&record)).unwrap();
    }
    pool
}

fn bench_sort(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xB0A7);

    c.bench_function("sort_10k_shuffled", |b| {
        b.iter_batched(
            || shuffled_pool(&mut rng),
            |mut pool| {
                sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);
                black_box(pool.len())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_view(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut registry = Registry::new();
    for _ in 0..POOL_SIZE {
        let entity = registry.create_entity();
        registry
            .add(entity, Depth { z: rng.gen_range(-1000.0..1000.0) })
            .unwrap();
        // Roughly 10% of entities carry the second component
        if rng.gen_ratio(1, 10) {
            registry.add(entity, Flag { on: 1 }).unwrap();
        }
    }

    c.bench_function("view_two_pool_intersection", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            View::<(Depth, Flag)>::new(&mut registry).each(|_, (depth, _)| {
                sum += depth.z;
            });
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_sort, bench_view);
criterion_main!(benches);
