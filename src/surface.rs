//! Surface layout computation.
//!
//! [AddrContext::compute_surface_info] is a pure function of the surface
//! description: it resolves the block extent, applies pitch and height
//! padding, walks the mip chain until the mip tail boundary and assigns the
//! per-mip offsets the hardware expects, with the smallest mip at the base
//! of the chain.
//!
//! [validate_layout] recomputes the total size through an independent
//! block-counting path and is run under `debug_assertions` after every
//! layout computation. It is a plain function so tests and CI can run it in
//! any build configuration.
use core::cmp::max;

use log::trace;

use crate::block::BlockExtent;
use crate::context::AddrContext;
use crate::miptail::{
    compacted_mip_in_tail, is_in_mip_tail, max_mips_in_tail, mip_origin,
    mip_origin_from_equation, mip_tail_extent, mip_tail_offset,
};
use crate::modes::{ResourceType, SwizzleMode, TileCategory};
use crate::{bpp_log2, div_round_up, log2, round_up, AddrError};
use crate::{MAX_MIP_LEVELS, MAX_SAMPLES, MAX_SURFACE_DIM};

// Hybrid depth-stencil metadata may exceed the normal dimension cap, but
// never this one.
const ABSOLUTE_MAX_DIM: u32 = 1 << 16;

/// Behavior flags for a surface description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SurfaceFlags {
    /// Align linear mip 0 rows to 128 bytes instead of 256 when the
    /// resulting slice size stays 256 byte aligned.
    pub trim_linear_padding: bool,
    /// The surface is a hybrid depth-stencil resource. Implies the oversize
    /// bypass.
    pub depth_stencil: bool,
    /// Allow dimensions beyond [MAX_SURFACE_DIM](crate::MAX_SURFACE_DIM).
    pub oversize: bool,
}

/// A complete description of one surface, the input to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct SurfaceDescription {
    pub resource: ResourceType,
    pub width: u32,
    pub height: u32,
    /// Depth for 3D resources, array layer count otherwise.
    pub depth: u32,
    pub num_mips: u32,
    pub num_samples: u32,
    /// Bits per element: 8, 16, 32, 64 or 128.
    pub bpp: u32,
    pub swizzle_mode: SwizzleMode,
    /// Caller-forced pitch in pixels for imported or shared surfaces.
    pub custom_pitch: Option<u32>,
    /// Caller-forced padded height in pixels.
    pub custom_height: Option<u32>,
    pub flags: SurfaceFlags,
}

/// Layout of a single mip level within its slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MipInfo {
    /// Byte offset of this mip within one hardware slice group. For tail
    /// mips this is the offset within the tail block.
    pub offset: u64,
    /// Padded row pitch in pixels.
    pub pitch: u32,
    /// Padded height in pixels.
    pub height: u32,
    /// Depth of this mip (3D) or the layer count.
    pub depth: u32,
    /// Byte offset within the tail block, zero outside the tail.
    pub mip_tail_offset: u64,
    /// Byte offset of the first block of this mip, zero for tail mips.
    pub macro_block_offset: u64,
    pub tail_coord_x: u32,
    pub tail_coord_y: u32,
    pub tail_coord_z: u32,
}

/// The computed memory layout of a surface. Owned by the caller; the
/// context keeps no per-surface state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceLayout {
    pub block_extent: BlockExtent,
    /// Padded mip 0 row pitch in pixels.
    pub pitch: u32,
    /// Padded mip 0 height in pixels.
    pub height: u32,
    /// Depth padded up to a block depth multiple.
    pub num_slices: u32,
    /// Required base address alignment in bytes.
    pub base_alignment: u32,
    /// Bytes per application depth slice or array layer.
    pub slice_size: u64,
    /// Total surface size in bytes.
    pub surf_size: u64,
    /// Index of the first mip packed into the tail, or `num_mips` if none.
    pub first_mip_in_tail: u32,
    /// True when every mip of the chain lives in the tail.
    pub mip_chain_in_tail: bool,
    /// Per-mip layout, one entry per mip level.
    pub mips: Vec<MipInfo>,
}

// Validated, log2-resolved description fields.
pub(crate) struct SurfaceParams {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub num_mips: u32,
    pub bpp_log2: u32,
    pub samples_log2: u32,
}

pub(crate) fn validate_description(
    context: &AddrContext,
    desc: &SurfaceDescription,
) -> Result<SurfaceParams, AddrError> {
    let invalid = AddrError::InvalidSurface {
        width: desc.width,
        height: desc.height,
        depth: desc.depth,
        bpp: desc.bpp,
        num_mips: desc.num_mips,
        num_samples: desc.num_samples,
    };

    let bpp_log2 = bpp_log2(desc.bpp).ok_or(invalid)?;
    let mode = desc.swizzle_mode;

    if desc.num_mips == 0 || desc.num_mips > MAX_MIP_LEVELS {
        return Err(invalid);
    }
    if desc.num_samples == 0
        || !desc.num_samples.is_power_of_two()
        || desc.num_samples > MAX_SAMPLES
    {
        return Err(invalid);
    }
    if desc.num_samples > 1 {
        // MSAA is 2D tiled only and never carries a mip chain.
        if mode.category() != TileCategory::Tiled2d
            || desc.resource != ResourceType::Tex2d
            || desc.num_mips > 1
        {
            return Err(invalid);
        }
    }

    let unsupported = AddrError::UnsupportedSwizzle {
        swizzle_mode: mode,
        bpp_log2,
        num_fragments: desc.num_samples,
    };
    if !context.generation().supports(mode) {
        return Err(unsupported);
    }
    let resource_ok = match desc.resource {
        ResourceType::Tex1d => mode == SwizzleMode::Linear,
        ResourceType::Tex2d => mode.category() != TileCategory::Tiled3d,
        // 3D resources may use thin 2D tiling; the block depth is then 1.
        ResourceType::Tex3d => true,
    };
    if !resource_ok {
        return Err(unsupported);
    }

    let width = max(desc.width, 1);
    let height = max(desc.height, 1);
    let depth = max(desc.depth, 1);

    let bypass = desc.flags.oversize || desc.flags.depth_stencil;
    let cap = if bypass { ABSOLUTE_MAX_DIM } else { MAX_SURFACE_DIM };
    if width > cap || height > cap || depth > cap {
        return Err(AddrError::Oversize {
            width: desc.width,
            height: desc.height,
            depth: desc.depth,
        });
    }

    Ok(SurfaceParams {
        width,
        height,
        depth,
        num_mips: desc.num_mips,
        bpp_log2,
        samples_log2: log2(desc.num_samples),
    })
}

// Row alignment in elements for linear surfaces: 256 bytes, or 128 on the
// trimmed path.
fn linear_pitch_unit(bpp_log2: u32, trimmed: bool) -> u32 {
    (if trimmed { 128 } else { 256 }) >> bpp_log2
}

fn resolve_linear_pitch(
    desc: &SurfaceDescription,
    p: &SurfaceParams,
) -> Result<u32, AddrError> {
    let unit = linear_pitch_unit(p.bpp_log2, false);
    if let Some(pitch) = desc.custom_pitch {
        let required = linear_pitch_unit(p.bpp_log2, true);
        if pitch < p.width || pitch > ABSOLUTE_MAX_DIM || pitch % required != 0 {
            return Err(AddrError::InvalidPitch {
                pitch,
                required_multiple: required,
            });
        }
        return Ok(pitch);
    }

    let pitch = round_up(p.width, unit);
    if desc.flags.trim_linear_padding {
        let trimmed = round_up(p.width, linear_pitch_unit(p.bpp_log2, true));
        // The trimmed pitch only holds if each slice stays 256 byte aligned.
        let slice = (trimmed as u64 * p.height as u64) << p.bpp_log2;
        if slice % 256 == 0 {
            return Ok(trimmed);
        }
    }
    Ok(pitch)
}

impl AddrContext {
    /// Computes the full memory layout for a surface description.
    ///
    /// This is a pure function: the same description always produces the
    /// same layout, and no state is retained. Callers should compute the
    /// layout once per surface and reuse it for address queries.
    ///
    /// # Examples
    /**
    ```rust
    # use rdna_addr::*;
    # let context = AddrContext::new(DeviceCaps {
    #     generation: Generation::Gfx10,
    #     pipes_log2: 3,
    #     pipe_interleave_log2: 8,
    # }).unwrap();
    let layout = context.compute_surface_info(&SurfaceDescription {
        resource: ResourceType::Tex2d,
        width: 64,
        height: 64,
        depth: 1,
        num_mips: 1,
        num_samples: 1,
        bpp: 32,
        swizzle_mode: SwizzleMode::Tiled4Kb2d,
        custom_pitch: None,
        custom_height: None,
        flags: Default::default(),
    }).unwrap();
    assert_eq!(4096, layout.base_alignment);
    assert_eq!(64 * 64 * 4, layout.surf_size);
    ```
    */
    pub fn compute_surface_info(
        &self,
        desc: &SurfaceDescription,
    ) -> Result<SurfaceLayout, AddrError> {
        let p = validate_description(self, desc)?;
        let layout = if desc.swizzle_mode.is_tiled() {
            self.compute_tiled_layout(desc, &p)?
        } else {
            self.compute_linear_layout(desc, &p)?
        };

        trace!(
            "surface {}x{}x{} {:?}: pitch {} slices {} size {}",
            p.width,
            p.height,
            p.depth,
            desc.swizzle_mode,
            layout.pitch,
            layout.num_slices,
            layout.surf_size
        );
        debug_assert!(validate_layout(self, desc, &layout));
        Ok(layout)
    }

    fn compute_linear_layout(
        &self,
        desc: &SurfaceDescription,
        p: &SurfaceParams,
    ) -> Result<SurfaceLayout, AddrError> {
        let pitch = resolve_linear_pitch(desc, p)?;
        let height = match desc.custom_height {
            Some(h) if h < p.height || h > ABSOLUTE_MAX_DIM => {
                return Err(AddrError::InvalidSurface {
                    width: desc.width,
                    height: desc.height,
                    depth: desc.depth,
                    bpp: desc.bpp,
                    num_mips: desc.num_mips,
                    num_samples: desc.num_samples,
                })
            }
            Some(h) => h,
            None => p.height,
        };

        let unit = linear_pitch_unit(p.bpp_log2, false);
        let num_mips = p.num_mips as usize;
        let mut mips = vec![MipInfo::default(); num_mips];
        for (m, mip) in mips.iter_mut().enumerate() {
            let mip_width = max(p.width >> m, 1);
            let mip_height = max(p.height >> m, 1);
            mip.pitch = if m == 0 { pitch } else { round_up(mip_width, unit) };
            mip.height = if m == 0 { height } else { mip_height };
            mip.depth = mip_depth(desc.resource, p.depth, m as u32);
        }

        // The hardware stores small mips first: walk from the last mip to
        // mip 0 assigning offsets.
        let mut running = 0u64;
        for mip in mips.iter_mut().rev() {
            mip.offset = running;
            mip.macro_block_offset = running;
            running += (mip.pitch as u64 * mip.height as u64) << p.bpp_log2;
        }

        let slice_size = running;
        Ok(SurfaceLayout {
            block_extent: BlockExtent {
                width: unit,
                height: 1,
                depth: 1,
            },
            pitch,
            height,
            num_slices: p.depth,
            base_alignment: 256,
            slice_size,
            surf_size: slice_size * p.depth as u64,
            first_mip_in_tail: p.num_mips,
            mip_chain_in_tail: false,
            mips,
        })
    }

    fn compute_tiled_layout(
        &self,
        desc: &SurfaceDescription,
        p: &SurfaceParams,
    ) -> Result<SurfaceLayout, AddrError> {
        let mode = desc.swizzle_mode;
        let ext = self.block_extent_for(mode, p.samples_log2, p.bpp_log2);
        let block_log2 = self.generation().block_size_log2(mode, false);
        let block_size = 1u64 << block_log2;

        let pitch = match desc.custom_pitch {
            Some(pitch)
                if pitch < p.width || pitch > ABSOLUTE_MAX_DIM || pitch % ext.width != 0 =>
            {
                return Err(AddrError::InvalidPitch {
                    pitch,
                    required_multiple: ext.width,
                })
            }
            Some(pitch) => pitch,
            None => round_up(p.width, ext.width),
        };
        let height = match desc.custom_height {
            Some(h) if h < p.height || h > ABSOLUTE_MAX_DIM || h % ext.height != 0 => {
                return Err(AddrError::InvalidPitch {
                    pitch: h,
                    required_multiple: ext.height,
                })
            }
            Some(h) => h,
            None => round_up(p.height, ext.height),
        };
        let num_slices = round_up(p.depth, ext.depth);

        // Find where the tail begins. Dimensions and the remaining level
        // count both shrink monotonically, so the first hit is the boundary.
        let max_tail = max_mips_in_tail(mode, block_log2);
        let tail_max = mip_tail_extent(mode, ext);
        let mut first_mip_in_tail = p.num_mips;
        if p.num_mips > 1 {
            for m in 0..p.num_mips {
                let mip_width = max(p.width >> m, 1);
                let mip_height = max(p.height >> m, 1);
                if is_in_mip_tail(tail_max, mip_width, mip_height, max_tail, p.num_mips - m) {
                    first_mip_in_tail = m;
                    break;
                }
            }
        }

        let num_mips = p.num_mips as usize;
        let mut mips = vec![MipInfo::default(); num_mips];

        // Tail mips share one block; their byte offsets follow the fixed
        // packing ladder and their tail-local origins come from the
        // staggered offset decode. The 3D decode must also recover depth
        // bits, so it inverts the mode's equation, which for 2D is the same
        // stagger.
        let micro = self.block_extent_for(SwizzleMode::Tiled256B2d, p.samples_log2, p.bpp_log2);
        let equation = self.equation_for(mode, p.samples_log2, p.bpp_log2);
        for m in first_mip_in_tail..p.num_mips {
            let compacted = compacted_mip_in_tail(m, first_mip_in_tail, p.num_mips);
            debug_assert!(compacted < MAX_MIP_LEVELS);
            let tail_offset = mip_tail_offset(max_tail, compacted);
            let (tx, ty, tz) = match (mode.category(), equation) {
                (TileCategory::Tiled3d, Some(equation)) => {
                    mip_origin_from_equation(equation, tail_offset, p.bpp_log2)
                }
                _ => mip_origin(tail_offset, micro),
            };

            let mip = &mut mips[m as usize];
            mip.pitch = ext.width;
            mip.height = ext.height;
            mip.depth = mip_depth(desc.resource, p.depth, m);
            mip.offset = tail_offset;
            mip.mip_tail_offset = tail_offset;
            mip.macro_block_offset = 0;
            mip.tail_coord_x = tx;
            mip.tail_coord_y = ty;
            mip.tail_coord_z = tz;
        }

        // Mips outside the tail are assigned backward from just above the
        // tail block, each spanning whole blocks across the hardware slice
        // group.
        let mut running = if first_mip_in_tail < p.num_mips {
            block_size
        } else {
            0
        };
        for m in (0..first_mip_in_tail).rev() {
            let mip_width = max(p.width >> m, 1);
            let mip_height = max(p.height >> m, 1);
            let mip = &mut mips[m as usize];
            mip.pitch = if m == 0 { pitch } else { round_up(mip_width, ext.width) };
            mip.height = if m == 0 {
                height
            } else {
                round_up(mip_height, ext.height)
            };
            mip.depth = mip_depth(desc.resource, p.depth, m);
            mip.offset = running;
            mip.macro_block_offset = running;

            let mip_size = (mip.pitch as u64 * mip.height as u64 * ext.depth as u64)
                << (p.bpp_log2 + p.samples_log2);
            running += mip_size;
        }

        let slice_size = running / ext.depth as u64;
        Ok(SurfaceLayout {
            block_extent: ext,
            pitch,
            height,
            num_slices,
            base_alignment: 1 << block_log2,
            slice_size,
            surf_size: slice_size * num_slices as u64,
            first_mip_in_tail,
            mip_chain_in_tail: first_mip_in_tail == 0,
            mips,
        })
    }
}

fn mip_depth(resource: ResourceType, depth: u32, mip: u32) -> u32 {
    match resource {
        ResourceType::Tex3d => max(depth >> mip, 1),
        _ => depth,
    }
}

/// Recomputes the total surface size through an independent block-counting
/// path and compares it with the walked layout.
///
/// For trimmed linear surfaces the walked size may be smaller than the
/// block-aligned recomputation; everywhere else the two must agree exactly.
/// This is the strongest regression guard against wrong block or tail math,
/// so it is a plain function runnable in any build configuration rather
/// than debug-only code.
pub fn validate_layout(
    context: &AddrContext,
    desc: &SurfaceDescription,
    layout: &SurfaceLayout,
) -> bool {
    let p = match validate_description(context, desc) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let mode = desc.swizzle_mode;

    if !mode.is_tiled() {
        let unit = linear_pitch_unit(p.bpp_log2, false);
        let mut slice = 0u64;
        for m in 0..p.num_mips {
            let mip_width = max(p.width >> m, 1);
            let mip_height = max(p.height >> m, 1);
            let row_elements = if m == 0 {
                match desc.custom_pitch {
                    Some(pitch) => pitch as u64,
                    None => div_round_up(mip_width, unit) as u64 * unit as u64,
                }
            } else {
                div_round_up(mip_width, unit) as u64 * unit as u64
            };
            let rows = if m == 0 {
                desc.custom_height.unwrap_or(mip_height) as u64
            } else {
                mip_height as u64
            };
            slice += (row_elements * rows) << p.bpp_log2;
        }
        let expected = slice * p.depth as u64;
        return if desc.flags.trim_linear_padding && desc.custom_pitch.is_none() {
            layout.surf_size <= expected
        } else {
            layout.surf_size == expected
        };
    }

    let ext = context.block_extent_for(mode, p.samples_log2, p.bpp_log2);
    let block_log2 = context.generation().block_size_log2(mode, false);
    let max_tail = max_mips_in_tail(mode, block_log2);
    let tail_max = mip_tail_extent(mode, ext);

    let mut per_group = 0u64;
    let mut has_tail = false;
    for m in 0..p.num_mips {
        let mip_width = max(p.width >> m, 1);
        let mip_height = max(p.height >> m, 1);
        if p.num_mips > 1
            && is_in_mip_tail(tail_max, mip_width, mip_height, max_tail, p.num_mips - m)
        {
            has_tail = true;
            break;
        }
        let blocks_x = if m == 0 {
            match desc.custom_pitch {
                Some(pitch) => (pitch / ext.width) as u64,
                None => div_round_up(mip_width, ext.width) as u64,
            }
        } else {
            div_round_up(mip_width, ext.width) as u64
        };
        let blocks_y = if m == 0 {
            match desc.custom_height {
                Some(h) => (h / ext.height) as u64,
                None => div_round_up(mip_height, ext.height) as u64,
            }
        } else {
            div_round_up(mip_height, ext.height) as u64
        };
        per_group += (blocks_x * blocks_y) << block_log2;
    }
    if has_tail {
        per_group += 1 << block_log2;
    }

    let groups = round_up(p.depth, ext.depth) as u64 / ext.depth as u64;
    layout.surf_size == per_group * groups
}
