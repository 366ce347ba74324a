use criterion::{
    BenchmarkGroup, Criterion, Throughput, criterion_group, criterion_main, measurement::WallTime,
};
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use sharder::{JumpHash, Picker, RoundRobin, ShardContext};

fn get_random_string(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn picker_benchmarks(c: &mut Criterion) {
    benchmark_impl(c, "jumphash", JumpHash::new);
    benchmark_impl(c, "round_robin", RoundRobin::new);
}

fn benchmark_impl<T, F>(c: &mut Criterion, name: &str, init: F)
where
    T: Picker,
    F: Fn(u8) -> T,
{
    let mut group = c.benchmark_group(name);

    // benchmark picker with a fixed key, with varying number of shards
    benchmark_scenario(&mut group, "basic 2 shards", "key", init(2));
    benchmark_scenario(&mut group, "basic 16 shards", "key", init(16));
    benchmark_scenario(&mut group, "basic 255 shards", "key", init(u8::MAX));

    // benchmark picker with random keys of varying length
    for len in [16, 32, 64] {
        benchmark_scenario(
            &mut group,
            &format!("random with key-length {len}"),
            get_random_string(len).as_str(),
            init(64),
        );
    }

    group.finish();
}

fn benchmark_scenario<T>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    bench_name: &str,
    key: &str,
    picker: T,
) where
    T: Picker,
{
    let ctx = ShardContext::new();

    group.throughput(Throughput::Elements(1));
    group.bench_function(bench_name, |b| {
        b.iter(|| {
            picker.pick(&ctx, key);
        });
    });
}

criterion_group!(benches, picker_benchmarks);
criterion_main!(benches);
