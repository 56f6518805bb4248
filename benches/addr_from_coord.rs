use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use rdna_addr::{
    AddrContext, DeviceCaps, Generation, ResourceType, SurfaceDescription, SwizzleMode,
};

use criterion::BenchmarkId;
use criterion::Throughput;

fn addr_from_coord_benchmark(c: &mut Criterion) {
    let context = AddrContext::new(DeviceCaps {
        generation: Generation::Gfx10_3,
        pipes_log2: 3,
        pipe_interleave_log2: 8,
    })
    .unwrap();

    let mut group = c.benchmark_group("surface_addr_from_coord");
    for size in [64u32, 512, 2048] {
        let desc = SurfaceDescription {
            resource: ResourceType::Tex2d,
            width: size,
            height: size,
            depth: 1,
            num_mips: 1,
            num_samples: 1,
            bpp: 32,
            swizzle_mode: SwizzleMode::Tiled64Kb2d,
            custom_pitch: None,
            custom_height: None,
            flags: Default::default(),
        };
        let layout = context.compute_surface_info(&desc).unwrap();

        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                for y in 0..size {
                    for x in 0..size {
                        let addr = context
                            .surface_addr_from_coord(
                                &desc,
                                &layout,
                                0,
                                black_box(x),
                                black_box(y),
                                0,
                                0,
                            )
                            .unwrap();
                        black_box(addr);
                    }
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, addr_from_coord_benchmark);
criterion_main!(benches);
