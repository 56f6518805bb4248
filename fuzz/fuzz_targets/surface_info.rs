#![no_main]
use libfuzzer_sys::fuzz_target;

extern crate arbitrary;
use arbitrary::{Arbitrary, Result, Unstructured};

use rdna_addr::{
    validate_layout, AddrContext, DeviceCaps, Generation, SurfaceDescription, SurfaceFlags,
};

#[derive(Debug)]
struct Input {
    desc: SurfaceDescription,
}

impl<'a> Arbitrary<'a> for Input {
    fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
        Ok(Input {
            desc: SurfaceDescription {
                resource: u.arbitrary()?,
                width: u.int_in_range(0..=20000)?,
                height: u.int_in_range(0..=20000)?,
                depth: u.int_in_range(0..=256)?,
                num_mips: u.int_in_range(0..=20)?,
                num_samples: u.int_in_range(0..=9)?,
                bpp: u.int_in_range(0..=130)?,
                swizzle_mode: u.arbitrary()?,
                custom_pitch: u.arbitrary()?,
                custom_height: u.arbitrary()?,
                flags: SurfaceFlags {
                    trim_linear_padding: u.arbitrary()?,
                    depth_stencil: false,
                    oversize: u.arbitrary()?,
                },
            },
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

    // This should never panic no matter how invalid the description is.
    if let Ok(layout) = context.compute_surface_info(&input.desc) {
        assert!(validate_layout(&context, &input.desc, &layout));
        assert!(layout.pitch as u64 >= input.desc.width.max(1) as u64);
        // Linear rows may use the 128 byte trim path; everything else is
        // block aligned.
        let aligned = layout.pitch % layout.block_extent.width == 0
            || (!input.desc.swizzle_mode.is_tiled()
                && layout.pitch % (layout.block_extent.width / 2) == 0);
        assert!(aligned);
    }
});
