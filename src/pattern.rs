//! Static hardware swizzle pattern data.
//!
//! The hardware defines the in-block bit interleave per (swizzle mode,
//! element size, fragment count) as four small indices into four shared
//! nibble tables. The tables cover fixed ranges of the block address bits:
//! nibble 1 holds bits 0..8, nibble 2 bits 8..12, nibble 3 bits 12..16 and
//! nibble 4 bits 16..22. Row 0 of each table is all zeros and is selected
//! when the block class does not reach those bits.
//!
//! Each nonzero entry names the single coordinate bit feeding that address
//! bit. X indices are in element units; positions below the element size
//! hold the byte offset bits and are overridden during equation conversion.
use crate::modes::{SwizzleMode, TileCategory};

// Coordinate channel bit flags. One flag per table entry.
pub(crate) const X0: u64 = 1 << 0;
pub(crate) const X1: u64 = 1 << 1;
pub(crate) const X2: u64 = 1 << 2;
pub(crate) const X3: u64 = 1 << 3;
pub(crate) const X4: u64 = 1 << 4;
pub(crate) const X5: u64 = 1 << 5;
pub(crate) const X6: u64 = 1 << 6;
pub(crate) const X7: u64 = 1 << 7;
pub(crate) const X8: u64 = 1 << 8;
pub(crate) const Y0: u64 = 1 << 9;
pub(crate) const Y1: u64 = 1 << 10;
pub(crate) const Y2: u64 = 1 << 11;
pub(crate) const Y3: u64 = 1 << 12;
pub(crate) const Y4: u64 = 1 << 13;
pub(crate) const Y5: u64 = 1 << 14;
pub(crate) const Y6: u64 = 1 << 15;
pub(crate) const Y7: u64 = 1 << 16;
pub(crate) const Y8: u64 = 1 << 17;
pub(crate) const Z0: u64 = 1 << 18;
pub(crate) const Z1: u64 = 1 << 19;
pub(crate) const Z2: u64 = 1 << 20;
pub(crate) const Z3: u64 = 1 << 21;
pub(crate) const Z4: u64 = 1 << 22;
pub(crate) const Z5: u64 = 1 << 23;
pub(crate) const S0: u64 = 1 << 24;
pub(crate) const S1: u64 = 1 << 25;
pub(crate) const S2: u64 = 1 << 26;

pub(crate) const X_BASE: u32 = 0;
pub(crate) const Y_BASE: u32 = 9;
pub(crate) const Z_BASE: u32 = 18;
pub(crate) const S_BASE: u32 = 24;
pub(crate) const FLAG_BITS: u32 = 27;

/// Four indices selecting one row from each shared nibble table.
///
/// A `nibble1` of zero marks a combination with no defined hardware pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwizzlePatternRef {
    pub nibble1: u8,
    pub nibble2: u8,
    pub nibble3: u8,
    pub nibble4: u8,
}

const fn pat(nibble1: u8, nibble2: u8, nibble3: u8, nibble4: u8) -> SwizzlePatternRef {
    SwizzlePatternRef {
        nibble1,
        nibble2,
        nibble3,
        nibble4,
    }
}

// 2D rows are indexed 1 + bppLog2 * 4 + sampleLog2. The first bppLog2
// entries are the byte offset within one element; the geometry bits then
// alternate x, y starting at x, and sample bits occupy the top of the
// 256B micro tile.
//
// 3D rows (21 + bppLog2) cycle x, z, y by absolute bit position so the same
// row serves every 3D block class.
pub(crate) const PATTERN_NIBBLE1: [[u64; 8]; 26] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    // 2D, 1 byte per element
    [X0, Y0, X1, Y1, X2, Y2, X3, Y3],
    [X0, Y0, X1, Y1, X2, Y2, X3, S0],
    [X0, Y0, X1, Y1, X2, Y2, S0, S1],
    [X0, Y0, X1, Y1, X2, S0, S1, S2],
    // 2D, 2 bytes per element
    [X0, X0, Y0, X1, Y1, X2, Y2, X3],
    [X0, X0, Y0, X1, Y1, X2, Y2, S0],
    [X0, X0, Y0, X1, Y1, X2, S0, S1],
    [X0, X0, Y0, X1, Y1, S0, S1, S2],
    // 2D, 4 bytes per element
    [X0, X1, X0, Y0, X1, Y1, X2, Y2],
    [X0, X1, X0, Y0, X1, Y1, X2, S0],
    [X0, X1, X0, Y0, X1, Y1, S0, S1],
    [X0, X1, X0, Y0, X1, S0, S1, S2],
    // 2D, 8 bytes per element
    [X0, X1, X2, X0, Y0, X1, Y1, X2],
    [X0, X1, X2, X0, Y0, X1, Y1, S0],
    [X0, X1, X2, X0, Y0, X1, S0, S1],
    [X0, X1, X2, X0, Y0, S0, S1, S2],
    // 2D, 16 bytes per element
    [X0, X1, X2, X3, X0, Y0, X1, Y1],
    [X0, X1, X2, X3, X0, Y0, X1, S0],
    [X0, X1, X2, X3, X0, Y0, S0, S1],
    [X0, X1, X2, X3, X0, S0, S1, S2],
    // 3D, 1..16 bytes per element
    [X0, Z0, Y0, X1, Z1, Y1, X2, Z2],
    [X0, Z0, Y0, X0, Z1, Y1, X1, Z2],
    [X0, X1, Y0, X0, Z0, Y1, X1, Z1],
    [X0, X1, X2, X0, Z0, Y0, X1, Z1],
    [X0, X1, X2, X3, Z0, Y0, X0, Z1],
];

// Rows 1..=8 continue a 2D micro tile with 1..=8 geometry bits; the macro
// bits alternate y, x starting at y. Rows 9..=13 continue the 3D cycle for
// 1..16 byte elements.
pub(crate) const PATTERN_NIBBLE2: [[u64; 4]; 14] = [
    [0, 0, 0, 0],
    [Y0, X1, Y1, X2],
    [Y1, X1, Y2, X2],
    [Y1, X2, Y2, X3],
    [Y2, X2, Y3, X3],
    [Y2, X3, Y3, X4],
    [Y3, X3, Y4, X4],
    [Y3, X4, Y4, X5],
    [Y4, X4, Y5, X5],
    [Y2, X3, Z3, Y3],
    [Y2, X2, Z3, Y3],
    [Y2, X2, Z2, Y3],
    [Y1, X2, Z2, Y2],
    [Y1, X1, Z2, Y2],
];

pub(crate) const PATTERN_NIBBLE3: [[u64; 4]; 14] = [
    [0, 0, 0, 0],
    [Y2, X3, Y3, X4],
    [Y3, X3, Y4, X4],
    [Y3, X4, Y4, X5],
    [Y4, X4, Y5, X5],
    [Y4, X5, Y5, X6],
    [Y5, X5, Y6, X6],
    [Y5, X6, Y6, X7],
    [Y6, X6, Y7, X7],
    [X4, Z4, Y4, X5],
    [X3, Z4, Y4, X4],
    [X3, Z3, Y4, X4],
    [X3, Z3, Y3, X4],
    [X2, Z3, Y3, X3],
];

// Only the first two entries are ever read; no block class reaches bit 18.
pub(crate) const PATTERN_NIBBLE4: [[u64; 6]; 14] = [
    [0, 0, 0, 0, 0, 0],
    [Y4, X5, 0, 0, 0, 0],
    [Y5, X5, 0, 0, 0, 0],
    [Y5, X6, 0, 0, 0, 0],
    [Y6, X6, 0, 0, 0, 0],
    [Y6, X7, 0, 0, 0, 0],
    [Y7, X7, 0, 0, 0, 0],
    [Y7, X8, 0, 0, 0, 0],
    [Y8, X8, 0, 0, 0, 0],
    [Z5, Y5, 0, 0, 0, 0],
    [Z5, Y5, 0, 0, 0, 0],
    [Z4, Y5, 0, 0, 0, 0],
    [Z4, Y4, 0, 0, 0, 0],
    [Z4, Y4, 0, 0, 0, 0],
];

// Pattern refs per 2D class, indexed [sampleLog2][bppLog2]. The 256B class
// has no patterns above one fragment.
const PATINFO_256B_2D: [[SwizzlePatternRef; 5]; 4] = [
    [
        pat(1, 0, 0, 0),
        pat(5, 0, 0, 0),
        pat(9, 0, 0, 0),
        pat(13, 0, 0, 0),
        pat(17, 0, 0, 0),
    ],
    [pat(0, 0, 0, 0); 5],
    [pat(0, 0, 0, 0); 5],
    [pat(0, 0, 0, 0); 5],
];

const PATINFO_4KB_2D: [[SwizzlePatternRef; 5]; 4] = [
    [
        pat(1, 8, 0, 0),
        pat(5, 7, 0, 0),
        pat(9, 6, 0, 0),
        pat(13, 5, 0, 0),
        pat(17, 4, 0, 0),
    ],
    [
        pat(2, 7, 0, 0),
        pat(6, 6, 0, 0),
        pat(10, 5, 0, 0),
        pat(14, 4, 0, 0),
        pat(18, 3, 0, 0),
    ],
    [
        pat(3, 6, 0, 0),
        pat(7, 5, 0, 0),
        pat(11, 4, 0, 0),
        pat(15, 3, 0, 0),
        pat(19, 2, 0, 0),
    ],
    [
        pat(4, 5, 0, 0),
        pat(8, 4, 0, 0),
        pat(12, 3, 0, 0),
        pat(16, 2, 0, 0),
        pat(20, 1, 0, 0),
    ],
];

const PATINFO_64KB_2D: [[SwizzlePatternRef; 5]; 4] = [
    [
        pat(1, 8, 8, 0),
        pat(5, 7, 7, 0),
        pat(9, 6, 6, 0),
        pat(13, 5, 5, 0),
        pat(17, 4, 4, 0),
    ],
    [
        pat(2, 7, 7, 0),
        pat(6, 6, 6, 0),
        pat(10, 5, 5, 0),
        pat(14, 4, 4, 0),
        pat(18, 3, 3, 0),
    ],
    [
        pat(3, 6, 6, 0),
        pat(7, 5, 5, 0),
        pat(11, 4, 4, 0),
        pat(15, 3, 3, 0),
        pat(19, 2, 2, 0),
    ],
    [
        pat(4, 5, 5, 0),
        pat(8, 4, 4, 0),
        pat(12, 3, 3, 0),
        pat(16, 2, 2, 0),
        pat(20, 1, 1, 0),
    ],
];

const PATINFO_256KB_2D: [[SwizzlePatternRef; 5]; 4] = [
    [
        pat(1, 8, 8, 8),
        pat(5, 7, 7, 7),
        pat(9, 6, 6, 6),
        pat(13, 5, 5, 5),
        pat(17, 4, 4, 4),
    ],
    [
        pat(2, 7, 7, 7),
        pat(6, 6, 6, 6),
        pat(10, 5, 5, 5),
        pat(14, 4, 4, 4),
        pat(18, 3, 3, 3),
    ],
    [
        pat(3, 6, 6, 6),
        pat(7, 5, 5, 5),
        pat(11, 4, 4, 4),
        pat(15, 3, 3, 3),
        pat(19, 2, 2, 2),
    ],
    [
        pat(4, 5, 5, 5),
        pat(8, 4, 4, 4),
        pat(12, 3, 3, 3),
        pat(16, 2, 2, 2),
        pat(20, 1, 1, 1),
    ],
];

// 3D classes never carry fragments; indexed [bppLog2].
const PATINFO_4KB_3D: [SwizzlePatternRef; 5] = [
    pat(21, 9, 0, 0),
    pat(22, 10, 0, 0),
    pat(23, 11, 0, 0),
    pat(24, 12, 0, 0),
    pat(25, 13, 0, 0),
];

const PATINFO_64KB_3D: [SwizzlePatternRef; 5] = [
    pat(21, 9, 9, 0),
    pat(22, 10, 10, 0),
    pat(23, 11, 11, 0),
    pat(24, 12, 12, 0),
    pat(25, 13, 13, 0),
];

const PATINFO_256KB_3D: [SwizzlePatternRef; 5] = [
    pat(21, 9, 9, 9),
    pat(22, 10, 10, 10),
    pat(23, 11, 11, 11),
    pat(24, 12, 12, 12),
    pat(25, 13, 13, 13),
];

/// Looks up the hardware pattern for a mode, element size and fragment count.
///
/// Returns [None] when the combination has no defined pattern: linear
/// surfaces, element sizes outside 1..=16 bytes, non power of two fragment
/// counts, and the 256B class above one fragment. Callers treat [None] as
/// "no equation available" for dimension queries and as an invalid-parameter
/// error for address queries.
pub fn pattern_info(
    mode: SwizzleMode,
    bpp_log2: u32,
    num_fragments: u32,
) -> Option<&'static SwizzlePatternRef> {
    if bpp_log2 > 4 || num_fragments == 0 || !num_fragments.is_power_of_two() {
        return None;
    }
    let b = bpp_log2 as usize;
    let s = num_fragments.trailing_zeros() as usize;

    match mode.category() {
        TileCategory::Linear => None,
        TileCategory::Tiled3d => {
            // 3D tiling never carries MSAA.
            assert_eq!(1, num_fragments);
            match mode {
                SwizzleMode::Tiled4Kb3d => Some(&PATINFO_4KB_3D[b]),
                SwizzleMode::Tiled64Kb3d => Some(&PATINFO_64KB_3D[b]),
                SwizzleMode::Tiled256Kb3d => Some(&PATINFO_256KB_3D[b]),
                _ => unreachable!(),
            }
        }
        TileCategory::Tiled2d => {
            if s > 3 {
                return None;
            }
            let info = match mode {
                SwizzleMode::Tiled256B2d => &PATINFO_256B_2D[s][b],
                SwizzleMode::Tiled4Kb2d => &PATINFO_4KB_2D[s][b],
                SwizzleMode::Tiled64Kb2d => &PATINFO_64KB_2D[s][b],
                SwizzleMode::Tiled256Kb2d => &PATINFO_256KB_2D[s][b],
                _ => unreachable!(),
            };
            if info.nibble1 == 0 {
                None
            } else {
                Some(info)
            }
        }
    }
}

/// Expands a pattern ref into the flat per-bit array covering all 22
/// possible block address bits.
pub(crate) fn expand_pattern(info: &SwizzlePatternRef) -> [u64; 22] {
    let mut bits = [0u64; 22];
    bits[..8].copy_from_slice(&PATTERN_NIBBLE1[info.nibble1 as usize]);
    bits[8..12].copy_from_slice(&PATTERN_NIBBLE2[info.nibble2 as usize]);
    bits[12..16].copy_from_slice(&PATTERN_NIBBLE3[info.nibble3 as usize]);
    bits[16..22].copy_from_slice(&PATTERN_NIBBLE4[info.nibble4 as usize]);
    bits
}
