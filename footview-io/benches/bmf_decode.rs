//! Benchmarks for BMF decoding at scan-sized meshes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use footview_io::{BmfDecoder, BmfDocument, BmfGroup, BmfWriter};

/// A grid of `n x n` quads, split into two material groups
fn generate_grid(n: u32) -> BmfDocument {
    let mut positions = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
    for y in 0..=n {
        for x in 0..=n {
            let (fx, fy) = (x as f32 / n as f32, y as f32 / n as f32);
            positions.push([fx * 0.1, fy * 0.27, (fx * 6.0).sin() * (fy * 4.0).cos() * 0.02]);
        }
    }

    let mut groups = vec![BmfGroup::default(), BmfGroup::default()];
    groups[0].material_name = Some("sole".to_string());
    groups[1].material_name = Some("upper".to_string());
    for y in 0..n {
        for x in 0..n {
            let i = y * (n + 1) + x;
            let group = &mut groups[(y * 2 / n) as usize];
            group.faces.push([i, i + 1, i + n + 2]);
            group.faces.push([i, i + n + 2, i + n + 1]);
        }
    }

    let colors = Some(vec![[0.8, 0.7, 0.6]; positions.len()]);
    BmfDocument {
        positions,
        colors,
        groups,
    }
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("bmf_decode");

    for n in [32u32, 128, 256] {
        let bytes = BmfWriter::encode(&generate_grid(n)).expect("encode grid");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &bytes, |b, bytes| {
            b.iter(|| BmfDecoder::decode(black_box(bytes)).expect("decode grid"))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_decode);
criterion_main!(benches);
