use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use svfind_core::{sort_for_scan, DetectParams, InsertionDetector, Overlap};

/// Chains of alignments along one sequence pair, each separated from the next
/// by a small insertion in `a`, spread over `pairs` sequence pairs.
fn generate_overlaps(pairs: u32, per_pair: u64) -> Vec<Overlap> {
    let mut overlaps = Vec::with_capacity((pairs as u64 * per_pair) as usize);
    for pair in 0..pairs {
        let mut a_pos = 0;
        let mut b_pos = 0;
        for k in 0..per_pair {
            let len = 800 + (k * 37) % 400;
            let gap = 20 + (k * 13) % 200;
            overlaps.push(
                Overlap::new(pair, a_pos, a_pos + len, pair + 1, b_pos, b_pos + len)
                    .with_complement(k % 7 == 0),
            );
            a_pos += len + gap;
            b_pos += len + (k % 3) * 10;
        }
    }
    overlaps
}

fn bench_detect(c: &mut Criterion) {
    let overlaps = generate_overlaps(100, 1000);
    let detector = InsertionDetector::new(DetectParams::default());

    c.bench_function("detect_100k_overlaps", |b| {
        b.iter(|| {
            let mut overlaps = overlaps.clone();
            let result = detector.detect(black_box(&mut overlaps));
            black_box(result)
        })
    });
}

fn bench_scan_sorted(c: &mut Criterion) {
    let mut overlaps = generate_overlaps(100, 1000);
    sort_for_scan(&mut overlaps);
    let detector = InsertionDetector::new(DetectParams::default());

    c.bench_function("scan_sorted_100k_overlaps", |b| {
        b.iter(|| black_box(detector.scan_sorted(black_box(&overlaps))))
    });
}

fn bench_overhang_window(c: &mut Criterion) {
    let mut overlaps = generate_overlaps(10, 5000);
    sort_for_scan(&mut overlaps);
    let mut group = c.benchmark_group("overhang_window");

    for overhang in [10u64, 50, 500, 5000].iter() {
        let detector = InsertionDetector::new(DetectParams::new(*overhang, 50_000).unwrap());
        group.bench_with_input(BenchmarkId::from_parameter(overhang), overhang, |b, _| {
            b.iter(|| black_box(detector.scan_sorted(black_box(&overlaps))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect, bench_scan_sorted, bench_overhang_window);
criterion_main!(benches);
