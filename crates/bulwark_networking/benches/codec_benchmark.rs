//! Benchmark for frame encode/decode.
//!
//! TARGET: well under a microsecond per `ProjectileCreate` frame
//!
//! Run with: cargo bench --package bulwark_networking --bench codec_benchmark

#![allow(missing_docs)]

use bulwark_networking::{decode, encode, tag, untag, Message, MessageType, ProjectileCreate};
use bulwark_shared::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn sample_create() -> ProjectileCreate {
    ProjectileCreate {
        slot_id: 3,
        owner_index: 1,
        position: Vec3::new(12.5, 0.0, -4.25),
        velocity: Vec3::new(14.142, 0.0, 14.142),
    }
}

fn benchmark_encode(c: &mut Criterion) {
    let create = sample_create();

    c.bench_function("encode_projectile_create", |b| {
        b.iter(|| black_box(tag(&encode(black_box(&create)), MessageType::ProjectileCreate)));
    });
}

fn benchmark_decode(c: &mut Criterion) {
    let frame = Message::from(sample_create()).to_frame();

    c.bench_function("decode_projectile_create", |b| {
        b.iter(|| {
            let (_, payload) = untag(black_box(&frame)).unwrap();
            black_box(decode::<ProjectileCreate>(payload).unwrap())
        });
    });
}

fn benchmark_dispatch(c: &mut Criterion) {
    let frames: Vec<Vec<u8>> = (0..1000)
        .map(|i| {
            let create = ProjectileCreate {
                slot_id: i % 5,
                ..sample_create()
            };
            Message::from(create).to_frame()
        })
        .collect();

    let mut group = c.benchmark_group("frame_dispatch");
    group.throughput(Throughput::Elements(frames.len() as u64));

    group.bench_function("1K_frames", |b| {
        b.iter(|| {
            for frame in &frames {
                black_box(Message::from_frame(frame).unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_decode, benchmark_dispatch);
criterion_main!(benches);
