use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use enveco_algorithms::{calculate_metrics, circular_plot_filter, voxelize, VoxelGridConfig};
use enveco_core::{LidarPoint, LidarPointCloud, Point2d};
use rand::{rngs::StdRng, Rng, SeedableRng};

const POINT_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn synthetic_plot(n: usize) -> LidarPointCloud {
    let mut rng = StdRng::seed_from_u64(n as u64);
    (0..n)
        .map(|_| {
            LidarPoint::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(0.0..30.0),
                rng.gen_range(0.0..255.0),
                rng.gen_range(1..5),
            )
        })
        .collect()
}

fn extraction(c: &mut Criterion) {
    let center = Point2d::new(0.0, 0.0);
    let config = VoxelGridConfig::default().with_binarize(true).with_fill_below_max_occupied(true);

    let mut g = c.benchmark_group("plot extraction");
    g.sample_size(20);

    for n in POINT_COUNTS {
        let cloud = synthetic_plot(n);
        g.bench_with_input(BenchmarkId::new("metrics", n), &cloud, |b, cloud| {
            b.iter(|| {
                let plot = circular_plot_filter(std::hint::black_box(cloud), &center, 9.0).unwrap();
                calculate_metrics(&plot, 1.5)
            });
        });
        g.bench_with_input(BenchmarkId::new("voxels", n), &cloud, |b, cloud| {
            b.iter(|| voxelize(std::hint::black_box(cloud), &center, &config));
        });
    }

    g.finish();
}

criterion_group!(benches, extraction);
criterion_main!(benches);
