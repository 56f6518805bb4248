//! # rdna_addr
//! rdna_addr is a CPU implementation of the surface layout and tiled
//! addressing rules used by RDNA generation GPUs.
//!
//! Given a description of a texture or render target, the library computes
//! the exact memory layout the hardware expects (pitch, per-mip offsets,
//! total size, alignment) and, for any texel coordinate, the exact byte
//! address within that layout. Small mip levels are packed together into a
//! single tiled block (the "mip tail") using the fixed hardware packing
//! reproduced here bit for bit.
//!
//! # Getting Started
//! All queries go through an [AddrContext] built once from the device's
//! capability facts. The context owns the precomputed swizzle equations and
//! block dimension tables.
/*!
```rust
use rdna_addr::{
    AddrContext, DeviceCaps, Generation, ResourceType, SurfaceDescription, SwizzleMode,
};
# fn main() -> Result<(), rdna_addr::AddrError> {
let context = AddrContext::new(DeviceCaps {
    generation: Generation::Gfx10,
    pipes_log2: 3,
    pipe_interleave_log2: 8,
})?;

// A 256x256 RGBA8 texture with a full mip chain in 64KB tiles.
let desc = SurfaceDescription {
    resource: ResourceType::Tex2d,
    width: 256,
    height: 256,
    depth: 1,
    num_mips: 9,
    num_samples: 1,
    bpp: 32,
    swizzle_mode: SwizzleMode::Tiled64Kb2d,
    custom_pitch: None,
    custom_height: None,
    flags: Default::default(),
};

let layout = context.compute_surface_info(&desc)?;
let addr = context.surface_addr_from_coord(&desc, &layout, 0, 31, 17, 0, 0)?;
assert!(addr < layout.surf_size);
# Ok(())
# }
```
*/
//! # Tiled Addressing
//! Tiled modes arrange the surface as a grid of hardware blocks
//! (256B/4KB/64KB/256KB). Within one block the low address bits are produced
//! by a per-mode bit equation: each address bit takes exactly one bit from
//! the x, y, z or sample coordinate. The equations are derived from static
//! pattern tables at context creation and never change afterwards, so all
//! query functions are read-only and safe to call from multiple threads.
//!
//! # Limitations
//! 2D and 3D tiled surfaces are fully supported. Multisampling is limited to
//! 2D tiled modes with up to 8 fragments, matching the hardware.
mod address;
mod block;
mod context;
mod equation;
mod miptail;
mod modes;
mod pattern;
mod surface;

// Avoid making this module public to prevent people importing it accidentally.
#[cfg(feature = "ffi")]
mod ffi;

pub use block::{block_extent, BlockExtent};
pub use context::{AddrContext, DeviceCaps, Generation, SwizzleConstraints};
pub use equation::{BitEquation, BitSource, Channel};
pub use modes::{BlockSizeClass, ResourceType, SwizzleMode, SwizzleModeSet, TileCategory};
pub use surface::{validate_layout, MipInfo, SurfaceDescription, SurfaceFlags, SurfaceLayout};

use thiserror::Error;

/// The maximum number of mip levels in a chain (a 16384 wide mip 0 chains
/// down to 1x1 in 15 levels).
pub const MAX_MIP_LEVELS: u32 = 16;

/// The maximum width, height or depth unless the oversize bypass flag is set.
/// Hybrid depth-stencil metadata surfaces may legitimately exceed this.
pub const MAX_SURFACE_DIM: u32 = 1 << 14;

/// The maximum number of MSAA fragments carried by a 2D tiled surface.
pub const MAX_SAMPLES: u32 = 8;

/// Errors returned for invalid caller input.
///
/// Corrupted static pattern tables are a programming error, not a runtime
/// condition, and panic instead of surfacing here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddrError {
    /// The surface description is inconsistent or out of the supported range.
    #[error(
        "invalid surface: {width}x{height}x{depth} bpp {bpp} mips {num_mips} samples {num_samples}"
    )]
    InvalidSurface {
        width: u32,
        height: u32,
        depth: u32,
        bpp: u32,
        num_mips: u32,
        num_samples: u32,
    },

    /// No hardware pattern exists for this mode, element size and fragment
    /// count, or the generation does not implement the mode.
    #[error(
        "unsupported swizzle: {swizzle_mode:?} with bpp log2 {bpp_log2} and {num_fragments} fragments"
    )]
    UnsupportedSwizzle {
        swizzle_mode: SwizzleMode,
        bpp_log2: u32,
        num_fragments: u32,
    },

    /// A caller-forced pitch or height is below the natural extent or not
    /// aligned to the block dimensions.
    #[error("invalid custom pitch {pitch}: must be a multiple of {required_multiple}")]
    InvalidPitch { pitch: u32, required_multiple: u32 },

    /// A dimension exceeds [MAX_SURFACE_DIM] without the bypass flag.
    #[error("surface too large: {width}x{height}x{depth}")]
    Oversize { width: u32, height: u32, depth: u32 },

    /// The device capability encoding is invalid.
    #[error(
        "invalid capabilities: pipes log2 {pipes_log2}, pipe interleave log2 {pipe_interleave_log2}"
    )]
    InvalidCapabilities {
        pipes_log2: u32,
        pipe_interleave_log2: u32,
    },
}

/// Calculates the division of `x` by `d` but rounds up rather than truncating.
/**
```rust
# use rdna_addr::div_round_up;
assert_eq!(2, div_round_up(8, 4));
assert_eq!(3, div_round_up(10, 4));
```
 */
#[inline]
pub const fn div_round_up(x: u32, d: u32) -> u32 {
    (x + d - 1) / d
}

pub(crate) const fn round_up(x: u32, n: u32) -> u32 {
    ((x + n - 1) / n) * n
}

// Log2 for values already known to be powers of two.
pub(crate) const fn log2(x: u32) -> u32 {
    x.trailing_zeros()
}

/// Converts bits per element to the table index used throughout the crate.
/// Returns [None] for element sizes the hardware has no patterns for.
/**
```rust
# use rdna_addr::bpp_log2;
assert_eq!(Some(2), bpp_log2(32));
assert_eq!(None, bpp_log2(24));
```
 */
pub const fn bpp_log2(bpp: u32) -> Option<u32> {
    match bpp {
        8 => Some(0),
        16 => Some(1),
        32 => Some(2),
        64 => Some(3),
        128 => Some(4),
        _ => None,
    }
}
