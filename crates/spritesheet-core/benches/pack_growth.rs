use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use spritesheet_core::prelude::*;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("sprite_{}", i), w, h)
        })
        .collect()
}

fn bench_unbounded_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("unbounded_pack");

    for count in [50usize, 200, 800] {
        let sprites = generate_sprites(count, 8, 96);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("area_desc", count), &sprites, |b, sprites| {
            b.iter(|| {
                let mut packer =
                    SpritePacker::from_layout(sprites.clone(), SheetConfig::default()).expect("valid sprites");
                packer.pack().expect("pack");
                black_box(packer.width() as u64 * packer.height() as u64)
            });
        });
    }

    group.finish();
}

fn bench_fixed_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_pack");

    for count in [50usize, 200] {
        let sprites = generate_sprites(count, 8, 48);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("2048", count), &sprites, |b, sprites| {
            b.iter(|| {
                let mut packer =
                    SpritePacker::from_layout(sprites.clone(), SheetConfig::default()).expect("valid sprites");
                black_box(packer.pack_fixed(2048, 2048).is_ok())
            });
        });
    }

    group.finish();
}

fn bench_metadata(c: &mut Criterion) {
    let sprites = generate_sprites(400, 8, 64);
    let mut packer = SpritePacker::from_layout(sprites, SheetConfig::default()).expect("valid sprites");
    packer.pack().expect("pack");
    c.bench_function("metadata_to_lua", |b| {
        b.iter(|| {
            let meta = packer.metadata().expect("metadata");
            black_box(to_lua(&meta).len())
        });
    });
}

criterion_group!(benches, bench_unbounded_pack, bench_fixed_pack, bench_metadata);
criterion_main!(benches);
