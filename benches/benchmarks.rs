use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sfs_graph::extract::{mems_from_arrays, merge};
use sfs_graph::io::sfs::{self, SfsRead};
use sfs_graph::model::{RawSfsFragment, ReadMemSummary};

fn make_sequence(len: usize, seed: u32) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

/// 每条 read 150 bp，片段长度 8..=24，相邻片段部分重叠
fn make_reads(n_reads: usize) -> Vec<SfsRead> {
    (0..n_reads)
        .map(|r| {
            let read = make_sequence(150, r as u32 + 1);
            let mut fragments = Vec::new();
            let mut pos = 0usize;
            while pos + 24 <= read.len() {
                let len = 8 + (pos * 7 + r) % 17;
                fragments.push(RawSfsFragment {
                    text: read[pos..pos + len].to_vec(),
                    read_position: pos as u64,
                    reference_position: (r * 1000 + pos) as u64,
                });
                pos += len / 2 + (pos % 5) * 3;
            }
            SfsRead {
                name: format!("read_{}", r),
                summary: ReadMemSummary { position: 0, index: 0, length: 20 },
                fragments,
            }
        })
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let bytes = sfs::encode(&make_reads(1_000));
    c.bench_function("sfs_decode_1k_reads", |b| {
        b.iter(|| {
            black_box(sfs::decode(black_box(&bytes)).unwrap());
        })
    });
}

fn bench_mems(c: &mut Criterion) {
    let n = 10_000;
    let mut x: u32 = 7;
    let lengths: Vec<usize> = (0..n)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (x >> 16) as usize % 40
        })
        .collect();
    let pointers: Vec<usize> = (0..n).collect();

    c.bench_function("mems_from_arrays_10k", |b| {
        b.iter(|| {
            black_box(mems_from_arrays(black_box(&lengths), black_box(&pointers)));
        })
    });
}

fn bench_merge(c: &mut Criterion) {
    let reads = make_reads(100);
    c.bench_function("merge_100_reads", |b| {
        b.iter(|| {
            for r in &reads {
                black_box(merge(black_box(&r.fragments)));
            }
        })
    });
}

criterion_group!(benches, bench_decode, bench_mems, bench_merge);
criterion_main!(benches);
