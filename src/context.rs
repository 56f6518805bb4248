//! The device addressing context.
//!
//! All static hardware tables are expanded once at context creation into
//! flat lookup arrays indexed by swizzle mode, fragment rate log2 and
//! element size log2. After that every query function only reads the
//! tables and caller-owned values, so a context is safe to share across
//! threads without locking.
use log::debug;

use crate::block::{block_extent, BlockExtent};
use crate::equation::{from_pattern, BitEquation};
use crate::modes::{BlockSizeClass, ResourceType, SwizzleMode, SwizzleModeSet, TileCategory};
use crate::pattern::pattern_info;
use crate::AddrError;

const NUM_MODES: usize = 8;
const NUM_SAMPLE_RATES: usize = 4;
const NUM_ELEMENT_SIZES: usize = 5;

/// The hardware generation, selected once at device init.
///
/// Per-generation behavior is resolved here instead of being re-dispatched
/// inside hot loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Gfx10,
    /// Adds the 256KB block size classes.
    Gfx10_3,
}

impl Generation {
    /// Whether this generation implements `mode`.
    pub fn supports(self, mode: SwizzleMode) -> bool {
        match mode.block_size_class() {
            BlockSizeClass::K256 => self == Generation::Gfx10_3,
            _ => true,
        }
    }

    /// The log2 block size of `mode`, either for allocation or for pitch
    /// alignment.
    ///
    /// The pitch-qualified value is per-generation configuration data; on
    /// the generations implemented here the two agree for every mode.
    pub fn block_size_log2(self, mode: SwizzleMode, for_pitch: bool) -> u32 {
        let _ = for_pitch;
        mode.block_size_log2()
    }
}

/// The frozen hardware capability facts consumed at context creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    pub generation: Generation,
    /// Log2 of the number of memory pipes.
    pub pipes_log2: u32,
    /// Log2 of the pipe interleave size in bytes, normally 8 (256 bytes).
    pub pipe_interleave_log2: u32,
}

/// Partial surface constraints for
/// [AddrContext::possible_swizzle_modes].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwizzleConstraints {
    pub resource: ResourceType,
    pub bpp: u32,
    pub num_samples: u32,
}

/// A device addressing context: the capability facts plus the equation and
/// block dimension tables, built once and immutable afterwards.
pub struct AddrContext {
    caps: DeviceCaps,
    equations: [[[Option<BitEquation>; NUM_ELEMENT_SIZES]; NUM_SAMPLE_RATES]; NUM_MODES],
    extents: [[[BlockExtent; NUM_ELEMENT_SIZES]; NUM_SAMPLE_RATES]; NUM_MODES],
}

impl AddrContext {
    /// Builds the context for the given capability facts.
    ///
    /// Returns [AddrError::InvalidCapabilities] for capability encodings no
    /// hardware produces.
    pub fn new(caps: DeviceCaps) -> Result<AddrContext, AddrError> {
        // The interleave is 256B..2KB on all supported parts.
        if caps.pipes_log2 > 6
            || caps.pipe_interleave_log2 < 8
            || caps.pipe_interleave_log2 > 11
        {
            return Err(AddrError::InvalidCapabilities {
                pipes_log2: caps.pipes_log2,
                pipe_interleave_log2: caps.pipe_interleave_log2,
            });
        }

        let placeholder = BlockExtent {
            width: 1,
            height: 1,
            depth: 1,
        };
        let mut equations = [[[None; NUM_ELEMENT_SIZES]; NUM_SAMPLE_RATES]; NUM_MODES];
        let mut extents = [[[placeholder; NUM_ELEMENT_SIZES]; NUM_SAMPLE_RATES]; NUM_MODES];

        let mut num_equations = 0;
        for mode in SwizzleMode::ALL {
            for samples_log2 in 0..NUM_SAMPLE_RATES as u32 {
                for bpp_log2 in 0..NUM_ELEMENT_SIZES as u32 {
                    let slot = &mut extents[mode.index()][samples_log2 as usize]
                        [bpp_log2 as usize];
                    // Fragments only shape 2D tiled blocks.
                    let effective_samples = match mode.category() {
                        TileCategory::Tiled2d => samples_log2,
                        _ => 0,
                    };
                    *slot = block_extent(mode, bpp_log2, effective_samples);

                    if !caps.generation.supports(mode) {
                        continue;
                    }
                    let num_fragments = match mode.category() {
                        TileCategory::Tiled2d => 1 << samples_log2,
                        _ if samples_log2 > 0 => continue,
                        _ => 1,
                    };
                    if let Some(info) = pattern_info(mode, bpp_log2, num_fragments) {
                        let block_log2 = caps.generation.block_size_log2(mode, true);
                        equations[mode.index()][samples_log2 as usize][bpp_log2 as usize] =
                            Some(from_pattern(bpp_log2, block_log2, info));
                        num_equations += 1;
                    }
                }
            }
        }

        debug!(
            "addressing context: {:?}, {} pipes, {} swizzle equations",
            caps.generation,
            1u32 << caps.pipes_log2,
            num_equations
        );
        Ok(AddrContext {
            caps,
            equations,
            extents,
        })
    }

    pub fn caps(&self) -> DeviceCaps {
        self.caps
    }

    pub fn generation(&self) -> Generation {
        self.caps.generation
    }

    /// The cached block extent for a mode, fragment rate and element size.
    pub(crate) fn block_extent_for(
        &self,
        mode: SwizzleMode,
        samples_log2: u32,
        bpp_log2: u32,
    ) -> BlockExtent {
        self.extents[mode.index()][samples_log2 as usize][bpp_log2 as usize]
    }

    /// The cached equation, or [None] when the combination has no defined
    /// hardware pattern.
    pub(crate) fn equation_for(
        &self,
        mode: SwizzleMode,
        samples_log2: u32,
        bpp_log2: u32,
    ) -> Option<&BitEquation> {
        self.equations[mode.index()][samples_log2 as usize][bpp_log2 as usize].as_ref()
    }

    /// Returns the set of swizzle modes usable for the given constraints.
    ///
    /// The mask is always valid and may be empty, for example for an
    /// unsupported element size.
    pub fn possible_swizzle_modes(&self, constraints: &SwizzleConstraints) -> SwizzleModeSet {
        let bpp_log2 = match crate::bpp_log2(constraints.bpp) {
            Some(b) => b,
            None => return SwizzleModeSet::empty(),
        };
        if constraints.num_samples == 0 || !constraints.num_samples.is_power_of_two() {
            return SwizzleModeSet::empty();
        }

        let mut set = SwizzleModeSet::empty();
        for mode in SwizzleMode::ALL {
            if !self.caps.generation.supports(mode) {
                continue;
            }
            let ok = match constraints.resource {
                ResourceType::Tex1d => mode == SwizzleMode::Linear,
                ResourceType::Tex2d => mode.category() != TileCategory::Tiled3d,
                ResourceType::Tex3d => true,
            };
            if !ok {
                continue;
            }
            if constraints.num_samples > 1 {
                // MSAA needs a 2D tiled mode with a defined pattern.
                if mode.category() != TileCategory::Tiled2d
                    || constraints.resource != ResourceType::Tex2d
                    || pattern_info(mode, bpp_log2, constraints.num_samples).is_none()
                {
                    continue;
                }
            }
            set |= mode.set_bit();
        }
        set
    }

    /// Computes the XOR value spreading this surface across the memory
    /// pipes. The value occupies address bits above the pipe interleave and
    /// is folded into block-aligned base addresses by the caller.
    ///
    /// Returns 0 when the mode has no bits to decorrelate: linear surfaces
    /// and the 256B block class.
    pub fn pipe_bank_xor(&self, surf_index: u32, mode: SwizzleMode) -> u32 {
        if !mode.is_tiled() || mode.block_size_class() == BlockSizeClass::B256 {
            return 0;
        }
        let block_log2 = self.caps.generation.block_size_log2(mode, false);
        let pipe_bits = self
            .caps
            .pipes_log2
            .min(block_log2 - self.caps.pipe_interleave_log2);
        (surf_index & ((1 << pipe_bits) - 1)) << self.caps.pipe_interleave_log2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(generation: Generation) -> DeviceCaps {
        DeviceCaps {
            generation,
            pipes_log2: 3,
            pipe_interleave_log2: 8,
        }
    }

    #[test]
    fn invalid_capabilities_fail_init() {
        assert!(AddrContext::new(DeviceCaps {
            generation: Generation::Gfx10,
            pipes_log2: 7,
            pipe_interleave_log2: 8,
        })
        .is_err());
        assert!(AddrContext::new(DeviceCaps {
            generation: Generation::Gfx10,
            pipes_log2: 3,
            pipe_interleave_log2: 12,
        })
        .is_err());
        assert!(AddrContext::new(caps(Generation::Gfx10)).is_ok());
    }

    #[test]
    fn equations_cached_for_supported_modes() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        for mode in SwizzleMode::ALL.iter().filter(|m| m.is_tiled()) {
            for bpp_log2 in 0..5 {
                assert!(
                    context.equation_for(*mode, 0, bpp_log2).is_some(),
                    "{:?} bpp_log2 {}",
                    mode,
                    bpp_log2
                );
            }
        }
        assert!(context.equation_for(SwizzleMode::Linear, 0, 2).is_none());
        // No pattern above one fragment for the 256B class.
        assert!(context.equation_for(SwizzleMode::Tiled256B2d, 1, 2).is_none());
        assert!(context.equation_for(SwizzleMode::Tiled64Kb2d, 1, 2).is_some());
    }

    #[test]
    fn gfx10_rejects_256kb_classes() {
        let context = AddrContext::new(caps(Generation::Gfx10)).unwrap();
        assert!(context.equation_for(SwizzleMode::Tiled256Kb2d, 0, 2).is_none());
        assert!(!context.generation().supports(SwizzleMode::Tiled256Kb2d));
        assert!(!context.generation().supports(SwizzleMode::Tiled256Kb3d));
        assert!(context.generation().supports(SwizzleMode::Tiled64Kb2d));
    }

    #[test]
    fn possible_modes_for_2d_textures() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        let set = context.possible_swizzle_modes(&SwizzleConstraints {
            resource: ResourceType::Tex2d,
            bpp: 32,
            num_samples: 1,
        });
        assert!(set.contains_mode(SwizzleMode::Linear));
        assert!(set.contains_mode(SwizzleMode::Tiled64Kb2d));
        assert!(set.contains_mode(SwizzleMode::Tiled256Kb2d));
        assert!(!set.contains_mode(SwizzleMode::Tiled64Kb3d));
    }

    #[test]
    fn possible_modes_msaa_excludes_linear_and_256b() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        let set = context.possible_swizzle_modes(&SwizzleConstraints {
            resource: ResourceType::Tex2d,
            bpp: 32,
            num_samples: 4,
        });
        assert!(!set.contains_mode(SwizzleMode::Linear));
        assert!(!set.contains_mode(SwizzleMode::Tiled256B2d));
        assert!(set.contains_mode(SwizzleMode::Tiled4Kb2d));
        assert!(set.contains_mode(SwizzleMode::Tiled64Kb2d));
    }

    #[test]
    fn possible_modes_1d_is_linear_only() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        let set = context.possible_swizzle_modes(&SwizzleConstraints {
            resource: ResourceType::Tex1d,
            bpp: 32,
            num_samples: 1,
        });
        assert_eq!(SwizzleModeSet::LINEAR, set);
    }

    #[test]
    fn possible_modes_empty_for_bad_bpp() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        let set = context.possible_swizzle_modes(&SwizzleConstraints {
            resource: ResourceType::Tex2d,
            bpp: 24,
            num_samples: 1,
        });
        assert!(set.is_empty());
    }

    #[test]
    fn pipe_bank_xor_values() {
        let context = AddrContext::new(caps(Generation::Gfx10_3)).unwrap();
        assert_eq!(0, context.pipe_bank_xor(5, SwizzleMode::Linear));
        assert_eq!(0, context.pipe_bank_xor(5, SwizzleMode::Tiled256B2d));
        // 3 pipe bits above the 256B interleave.
        assert_eq!(5 << 8, context.pipe_bank_xor(5, SwizzleMode::Tiled64Kb2d));
        assert_eq!(
            (13 & 7) << 8,
            context.pipe_bank_xor(13, SwizzleMode::Tiled64Kb2d)
        );
        // The XOR stays below the block size.
        let xor = context.pipe_bank_xor(u32::MAX, SwizzleMode::Tiled4Kb2d);
        assert!(xor < 4096);
    }
}
