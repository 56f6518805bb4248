use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use rdna_addr::{
    AddrContext, DeviceCaps, Generation, ResourceType, SurfaceDescription, SwizzleMode,
};

use criterion::BenchmarkId;

fn surface_info_benchmark(c: &mut Criterion) {
    let context = AddrContext::new(DeviceCaps {
        generation: Generation::Gfx10_3,
        pipes_log2: 3,
        pipe_interleave_log2: 8,
    })
    .unwrap();

    let mut group = c.benchmark_group("compute_surface_info");
    for num_mips in [1u32, 4, 12] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_mips),
            &num_mips,
            |b, &num_mips| {
                let desc = SurfaceDescription {
                    resource: ResourceType::Tex2d,
                    width: 2048,
                    height: 2048,
                    depth: 1,
                    num_mips,
                    num_samples: 1,
                    bpp: 32,
                    swizzle_mode: SwizzleMode::Tiled64Kb2d,
                    custom_pitch: None,
                    custom_height: None,
                    flags: Default::default(),
                };
                b.iter(|| context.compute_surface_info(black_box(&desc)));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, surface_info_benchmark);
criterion_main!(benches);
