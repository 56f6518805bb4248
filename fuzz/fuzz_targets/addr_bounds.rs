#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

extern crate rand;
use rand::{rngs::StdRng, Rng, SeedableRng};

use rdna_addr::{
    AddrContext, DeviceCaps, Generation, ResourceType, SurfaceDescription, SwizzleMode,
};

#[derive(Debug)]
struct Input {
    width: u32,
    height: u32,
    depth: u32,
    num_mips: u32,
    bpp_log2: u32,
    swizzle_mode: SwizzleMode,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            width: u.int_in_range(1..=2048)?,
            height: u.int_in_range(1..=2048)?,
            depth: u.int_in_range(1..=64)?,
            num_mips: u.int_in_range(1..=12)?,
            bpp_log2: u.int_in_range(0..=4)?,
            swizzle_mode: u.arbitrary()?,
        })
    }
}

fuzz_target!(|input: Input| {
    let context = AddrContext::new(DeviceCaps {
        generation: Generation::Gfx10_3,
        pipes_log2: 3,
        pipe_interleave_log2: 8,
    })
    .unwrap();

    let desc = SurfaceDescription {
        resource: if input.swizzle_mode.is_3d() {
            ResourceType::Tex3d
        } else {
            ResourceType::Tex2d
        },
        width: input.width,
        height: input.height,
        depth: input.depth,
        num_mips: input.num_mips,
        num_samples: 1,
        bpp: 8 << input.bpp_log2,
        swizzle_mode: input.swizzle_mode,
        custom_pitch: None,
        custom_height: None,
        flags: Default::default(),
    };

    let layout = match context.compute_surface_info(&desc) {
        Ok(layout) => layout,
        Err(_) => return,
    };

    // Every legal coordinate must map strictly below the surface size.
    let seed = [13u8; 32];
    let mut rng: StdRng = SeedableRng::from_seed(seed);
    for mip in 0..input.num_mips {
        let mip_width = (input.width >> mip).max(1);
        let mip_height = (input.height >> mip).max(1);
        for _ in 0..16 {
            let x = rng.gen_range(0..mip_width);
            let y = rng.gen_range(0..mip_height);
            let slice = rng.gen_range(0..layout.num_slices);
            let addr = context
                .surface_addr_from_coord(&desc, &layout, mip, x, y, slice, 0)
                .unwrap();
            assert!(addr < layout.surf_size);
        }
    }
});
