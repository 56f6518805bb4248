//! Pixel dimensions of one hardware tiling block.
use crate::modes::{SwizzleMode, TileCategory};

/// The width, height and depth in pixels of one tiled block for a given
/// swizzle mode, element size and fragment rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockExtent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl BlockExtent {
    /// The total number of pixels covered by one block.
    pub const fn pixels(self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }
}

// Splits a log2 bit budget three ways. x takes the first remainder bit and
// z the second; y always gets the plain third.
const fn split3(n: u32) -> (u32, u32, u32) {
    let base = n / 3;
    let rem = n % 3;
    (
        base + (rem >= 1) as u32,
        base,
        base + (rem >= 2) as u32,
    )
}

/// Computes the pixel dimensions of one block.
///
/// `samples_log2` only participates for 2D tiled modes; 3D tiling never
/// carries fragments and linear blocks are a single row of elements.
/**
```rust
use rdna_addr::{block_extent, BlockExtent, SwizzleMode};

// 64KB blocks of 4 byte elements are 128x128 pixels.
assert_eq!(
    BlockExtent { width: 128, height: 128, depth: 1 },
    block_extent(SwizzleMode::Tiled64Kb2d, 2, 0),
);
```
 */
pub fn block_extent(mode: SwizzleMode, bpp_log2: u32, samples_log2: u32) -> BlockExtent {
    assert!(bpp_log2 <= 4);
    let block_log2 = mode.block_size_log2();

    match mode.category() {
        TileCategory::Linear => BlockExtent {
            width: 1 << (block_log2 - bpp_log2),
            height: 1,
            depth: 1,
        },
        TileCategory::Tiled2d => {
            // The element and sample exponents share the width/height split
            // with the remainder bit going to width first. All block size
            // classes have an even log2, so whenever the remainder bit is
            // present at most one of the two exponents is odd and the
            // hardware's `bppLog2 & samplesLog2 & 1` width correction
            // vanishes; the direct form below is exact.
            let budget = block_log2 - bpp_log2 - samples_log2;
            BlockExtent {
                width: 1 << ((budget + 1) / 2),
                height: 1 << (budget / 2),
                depth: 1,
            }
        }
        TileCategory::Tiled3d => {
            // Split the block budget and the element budget the same way,
            // then subtract per axis. This keeps the scheme exact for
            // element sizes that are not powers of eight.
            let (bx, by, bz) = split3(block_log2);
            let (ex, ey, ez) = split3(bpp_log2);
            BlockExtent {
                width: 1 << (bx - ex),
                height: 1 << (by - ey),
                depth: 1 << (bz - ez),
            }
        }
    }
}
