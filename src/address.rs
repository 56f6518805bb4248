//! Byte address computation for a texel coordinate within a computed
//! surface layout.
use crate::context::AddrContext;
use crate::modes::BlockSizeClass;
use crate::surface::{validate_description, SurfaceDescription, SurfaceLayout};
use crate::AddrError;

impl AddrContext {
    /// Computes the byte address of a texel within `layout`.
    ///
    /// The layout must have been produced by
    /// [compute_surface_info](AddrContext::compute_surface_info) for the
    /// same description; computing it once per surface and reusing it for
    /// all queries is the intended pattern. Coordinates are expected to be
    /// in range for the given mip level; production callers pre-validate
    /// and only debug builds assert here.
    ///
    /// Returns [AddrError::UnsupportedSwizzle] when the mode, element size
    /// and fragment count have no hardware pattern.
    pub fn surface_addr_from_coord(
        &self,
        desc: &SurfaceDescription,
        layout: &SurfaceLayout,
        mip: u32,
        x: u32,
        y: u32,
        slice: u32,
        sample: u32,
    ) -> Result<u64, AddrError> {
        let p = validate_description(self, desc)?;
        debug_assert!(mip < p.num_mips);
        debug_assert!(x < (p.width >> mip).max(1));
        debug_assert!(y < (p.height >> mip).max(1));
        debug_assert!(slice < layout.num_slices);
        debug_assert!(sample < desc.num_samples);

        let addr = if desc.swizzle_mode.is_tiled() {
            let equation = self
                .equation_for(desc.swizzle_mode, p.samples_log2, p.bpp_log2)
                .ok_or(AddrError::UnsupportedSwizzle {
                    swizzle_mode: desc.swizzle_mode,
                    bpp_log2: p.bpp_log2,
                    num_fragments: desc.num_samples,
                })?;

            let ext = layout.block_extent;
            let mip_info = &layout.mips[mip as usize];
            let block_log2 = self.generation().block_size_log2(desc.swizzle_mode, false);

            // Several app slices share one hardware slice group when 3D
            // tiling packs multiple depths per block.
            let hw_slice_size = layout.slice_size * ext.depth as u64;
            let hw_slice = (slice / ext.depth) as u64;

            // Re-base tail mips into the tail block's local frame before
            // the equation sees the coordinate.
            let (x, y, slice) = if mip >= layout.first_mip_in_tail
                && desc.swizzle_mode.block_size_class() != BlockSizeClass::B256
            {
                (
                    x + mip_info.tail_coord_x,
                    y + mip_info.tail_coord_y,
                    slice + mip_info.tail_coord_z,
                )
            } else {
                (x, y, slice)
            };

            let blocks_per_row = (mip_info.pitch / ext.width) as u64;
            let block_index =
                (y / ext.height) as u64 * blocks_per_row + (x / ext.width) as u64;

            let offset_in_block =
                equation.offset(x << p.bpp_log2, y, slice, sample) as u64;

            hw_slice_size * hw_slice
                + mip_info.macro_block_offset
                + (block_index << block_log2)
                + offset_in_block
        } else {
            // Row major: no equation lookup on the linear path.
            let mip_info = &layout.mips[mip as usize];
            layout.slice_size * slice as u64
                + mip_info.offset
                + ((mip_info.pitch as u64 * y as u64 + x as u64) << p.bpp_log2)
        };

        debug_assert!(addr < layout.surf_size);
        Ok(addr)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::context::{AddrContext, DeviceCaps, Generation};
    use crate::modes::{ResourceType, SwizzleMode};
    use crate::surface::{SurfaceDescription, SurfaceFlags};
    use crate::AddrError;

    fn context() -> AddrContext {
        AddrContext::new(DeviceCaps {
            generation: Generation::Gfx10_3,
            pipes_log2: 3,
            pipe_interleave_log2: 8,
        })
        .unwrap()
    }

    fn desc(
        width: u32,
        height: u32,
        num_mips: u32,
        bpp: u32,
        mode: SwizzleMode,
    ) -> SurfaceDescription {
        SurfaceDescription {
            resource: ResourceType::Tex2d,
            width,
            height,
            depth: 1,
            num_mips,
            num_samples: 1,
            bpp,
            swizzle_mode: mode,
            custom_pitch: None,
            custom_height: None,
            flags: SurfaceFlags::default(),
        }
    }

    #[test]
    fn linear_matches_row_major_formula() {
        let context = context();
        let desc = desc(100, 60, 1, 32, SwizzleMode::Linear);
        let layout = context.compute_surface_info(&desc).unwrap();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (99, 59), (37, 11)] {
            let addr = context
                .surface_addr_from_coord(&desc, &layout, 0, x, y, 0, 0)
                .unwrap();
            assert_eq!((layout.pitch as u64 * y as u64 + x as u64) * 4, addr);
        }
    }

    #[test]
    fn linear_mip_and_slice_offsets_add_up() {
        let context = context();
        let mut desc = desc(64, 64, 3, 32, SwizzleMode::Linear);
        desc.depth = 4;
        let layout = context.compute_surface_info(&desc).unwrap();
        let addr = context
            .surface_addr_from_coord(&desc, &layout, 1, 5, 2, 3, 0)
            .unwrap();
        let mip = &layout.mips[1];
        assert_eq!(
            layout.slice_size * 3 + mip.offset + (mip.pitch as u64 * 2 + 5) * 4,
            addr
        );
    }

    #[test]
    fn origin_of_each_block_is_block_aligned() {
        let context = context();
        let desc = desc(512, 512, 1, 32, SwizzleMode::Tiled64Kb2d);
        let layout = context.compute_surface_info(&desc).unwrap();
        let ext = layout.block_extent;
        for by in 0..(512 / ext.height) {
            for bx in 0..(512 / ext.width) {
                let addr = context
                    .surface_addr_from_coord(&desc, &layout, 0, bx * ext.width, by * ext.height, 0, 0)
                    .unwrap();
                let expected_block = (by * (512 / ext.width) + bx) as u64;
                assert_eq!(expected_block << 16, addr);
            }
        }
    }

    #[test]
    fn first_element_of_surface_is_address_zero() {
        let context = context();
        for mode in [
            SwizzleMode::Linear,
            SwizzleMode::Tiled256B2d,
            SwizzleMode::Tiled4Kb2d,
            SwizzleMode::Tiled64Kb2d,
        ] {
            let desc = desc(64, 64, 1, 32, mode);
            let layout = context.compute_surface_info(&desc).unwrap();
            let addr = context
                .surface_addr_from_coord(&desc, &layout, 0, 0, 0, 0, 0)
                .unwrap();
            assert_eq!(0, addr, "{:?}", mode);
        }
    }

    #[test]
    fn tiled_addresses_are_dense_and_unique_within_a_block() {
        // One 256B micro tile of 4 byte elements is a bijection between
        // the 8x8 pixels and the 256 byte offsets.
        let context = context();
        let desc = desc(8, 8, 1, 32, SwizzleMode::Tiled256B2d);
        let layout = context.compute_surface_info(&desc).unwrap();
        let mut seen = [false; 64];
        for y in 0..8 {
            for x in 0..8 {
                let addr = context
                    .surface_addr_from_coord(&desc, &layout, 0, x, y, 0, 0)
                    .unwrap();
                assert_eq!(0, addr % 4);
                let element = (addr / 4) as usize;
                assert!(!seen[element]);
                seen[element] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn addresses_stay_below_surface_size() {
        let context = context();
        let seed = [13u8; 32];
        let mut rng: StdRng = SeedableRng::from_seed(seed);

        let modes = [
            SwizzleMode::Tiled256B2d,
            SwizzleMode::Tiled4Kb2d,
            SwizzleMode::Tiled64Kb2d,
            SwizzleMode::Tiled256Kb2d,
        ];
        for mode in modes {
            for bpp in [8, 32, 64] {
                let desc = desc(317, 253, 8, bpp, mode);
                let layout = context.compute_surface_info(&desc).unwrap();
                for mip in 0..8 {
                    let mip_width = (317u32 >> mip).max(1);
                    let mip_height = (253u32 >> mip).max(1);
                    for _ in 0..64 {
                        let x = rng.gen_range(0..mip_width);
                        let y = rng.gen_range(0..mip_height);
                        let addr = context
                            .surface_addr_from_coord(&desc, &layout, mip, x, y, 0, 0)
                            .unwrap();
                        assert!(
                            addr < layout.surf_size,
                            "{:?} bpp {} mip {} ({}, {})",
                            mode,
                            bpp,
                            mip,
                            x,
                            y
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn tail_mip_origin_reconstructs_tail_offset() {
        // Addressing texel (0, 0) of a tail mip re-bases it to the tail
        // origin; the equation maps that origin back to the mip's byte
        // offset within the tail block.
        let context = context();
        let desc = desc(256, 256, 9, 32, SwizzleMode::Tiled64Kb2d);
        let layout = context.compute_surface_info(&desc).unwrap();
        assert_eq!(2, layout.first_mip_in_tail);
        for mip in 2..9u32 {
            let addr = context
                .surface_addr_from_coord(&desc, &layout, mip, 0, 0, 0, 0)
                .unwrap();
            assert_eq!(layout.mips[mip as usize].mip_tail_offset, addr);
        }
    }

    #[test]
    fn msaa_fragments_do_not_collide() {
        let context = context();
        let mut d = desc(64, 64, 1, 32, SwizzleMode::Tiled64Kb2d);
        d.num_samples = 4;
        let layout = context.compute_surface_info(&d).unwrap();
        let mut addrs = Vec::new();
        for sample in 0..4 {
            let addr = context
                .surface_addr_from_coord(&d, &layout, 0, 3, 5, 0, sample)
                .unwrap();
            assert!(addr < layout.surf_size);
            addrs.push(addr);
        }
        addrs.sort_unstable();
        addrs.dedup();
        assert_eq!(4, addrs.len());
    }

    #[test]
    fn missing_equation_is_an_error() {
        let context = context();
        let mut d = desc(64, 64, 1, 32, SwizzleMode::Tiled256B2d);
        d.num_samples = 2;
        // Layout queries still work without a pattern...
        let layout = context.compute_surface_info(&d);
        // ...but the 256B class has no MSAA pattern, so addressing fails.
        if let Ok(layout) = layout {
            assert_eq!(
                Err(AddrError::UnsupportedSwizzle {
                    swizzle_mode: SwizzleMode::Tiled256B2d,
                    bpp_log2: 2,
                    num_fragments: 2,
                }),
                context.surface_addr_from_coord(&d, &layout, 0, 0, 0, 0, 0)
            );
        }
    }

    #[test]
    fn tiled_3d_tail_addresses_reconstruct_offsets() {
        let context = context();
        let d = SurfaceDescription {
            resource: ResourceType::Tex3d,
            width: 32,
            height: 32,
            depth: 8,
            num_mips: 6,
            num_samples: 1,
            bpp: 32,
            swizzle_mode: SwizzleMode::Tiled64Kb3d,
            custom_pitch: None,
            custom_height: None,
            flags: SurfaceFlags::default(),
        };
        let layout = context.compute_surface_info(&d).unwrap();
        assert_eq!(1, layout.first_mip_in_tail);
        for mip in 1..6u32 {
            let addr = context
                .surface_addr_from_coord(&d, &layout, mip, 0, 0, 0, 0)
                .unwrap();
            assert_eq!(layout.mips[mip as usize].mip_tail_offset, addr);
            // Every texel of every tail mip stays inside the tail block.
            let mip_width = (32u32 >> mip).max(1);
            let mip_height = (32u32 >> mip).max(1);
            let last = context
                .surface_addr_from_coord(&d, &layout, mip, mip_width - 1, mip_height - 1, 0, 0)
                .unwrap();
            assert!(last < 65536);
        }
    }

    #[test]
    fn tiled_3d_slices_share_blocks() {
        let context = context();
        let d = SurfaceDescription {
            resource: ResourceType::Tex3d,
            width: 32,
            height: 32,
            depth: 32,
            num_mips: 1,
            num_samples: 1,
            bpp: 32,
            swizzle_mode: SwizzleMode::Tiled64Kb3d,
            custom_pitch: None,
            custom_height: None,
            flags: SurfaceFlags::default(),
        };
        let layout = context.compute_surface_info(&d).unwrap();
        // Slices 0 and 15 are in the first hardware slice group, slice 16
        // starts the second.
        let a = context.surface_addr_from_coord(&d, &layout, 0, 0, 0, 0, 0).unwrap();
        let b = context.surface_addr_from_coord(&d, &layout, 0, 0, 0, 15, 0).unwrap();
        let c = context.surface_addr_from_coord(&d, &layout, 0, 0, 0, 16, 0).unwrap();
        assert_eq!(0, a);
        assert!(b < layout.slice_size * 16);
        assert_eq!(layout.slice_size * 16, c);

        // All addresses distinct across a z column.
        let mut addrs: Vec<u64> = (0..32)
            .map(|z| {
                context
                    .surface_addr_from_coord(&d, &layout, 0, 0, 0, z, 0)
                    .unwrap()
            })
            .collect();
        addrs.sort_unstable();
        addrs.dedup();
        assert_eq!(32, addrs.len());
    }
}
