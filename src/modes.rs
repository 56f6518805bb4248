//! Swizzle mode tags and the static facts attached to them.
//!
//! Every tiled mode carries exactly one category (2D or 3D) and one block
//! size class. Linear surfaces have no block structure; they use the 256B
//! class for alignment purposes only.
use bitflags::bitflags;

/// The dimensionality of the resource being described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum ResourceType {
    Tex1d,
    Tex2d,
    Tex3d,
}

/// An enumeration of the supported swizzle modes.
///
/// The numeric suffix names the hardware block size. 2D modes tile x and y;
/// 3D modes additionally tile the depth axis so several depth slices share
/// one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum SwizzleMode {
    Linear,
    Tiled256B2d,
    Tiled4Kb2d,
    Tiled64Kb2d,
    Tiled256Kb2d,
    Tiled4Kb3d,
    Tiled64Kb3d,
    Tiled256Kb3d,
}

/// The tiling category of a swizzle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileCategory {
    Linear,
    Tiled2d,
    Tiled3d,
}

/// The hardware block size class of a tiled mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSizeClass {
    B256,
    K4,
    K64,
    K256,
}

impl BlockSizeClass {
    /// The log2 byte size of one block of this class.
    pub const fn log2(self) -> u32 {
        match self {
            BlockSizeClass::B256 => 8,
            BlockSizeClass::K4 => 12,
            BlockSizeClass::K64 => 16,
            BlockSizeClass::K256 => 18,
        }
    }
}

impl SwizzleMode {
    /// All modes in table order. The order is stable and matches the
    /// internal cache indexing.
    pub const ALL: [SwizzleMode; 8] = [
        SwizzleMode::Linear,
        SwizzleMode::Tiled256B2d,
        SwizzleMode::Tiled4Kb2d,
        SwizzleMode::Tiled64Kb2d,
        SwizzleMode::Tiled256Kb2d,
        SwizzleMode::Tiled4Kb3d,
        SwizzleMode::Tiled64Kb3d,
        SwizzleMode::Tiled256Kb3d,
    ];

    pub const fn category(self) -> TileCategory {
        match self {
            SwizzleMode::Linear => TileCategory::Linear,
            SwizzleMode::Tiled256B2d
            | SwizzleMode::Tiled4Kb2d
            | SwizzleMode::Tiled64Kb2d
            | SwizzleMode::Tiled256Kb2d => TileCategory::Tiled2d,
            SwizzleMode::Tiled4Kb3d | SwizzleMode::Tiled64Kb3d | SwizzleMode::Tiled256Kb3d => {
                TileCategory::Tiled3d
            }
        }
    }

    /// The block size class. Linear reports 256B, which only matters for
    /// base alignment.
    pub const fn block_size_class(self) -> BlockSizeClass {
        match self {
            SwizzleMode::Linear | SwizzleMode::Tiled256B2d => BlockSizeClass::B256,
            SwizzleMode::Tiled4Kb2d | SwizzleMode::Tiled4Kb3d => BlockSizeClass::K4,
            SwizzleMode::Tiled64Kb2d | SwizzleMode::Tiled64Kb3d => BlockSizeClass::K64,
            SwizzleMode::Tiled256Kb2d | SwizzleMode::Tiled256Kb3d => BlockSizeClass::K256,
        }
    }

    /// The log2 byte size used for allocation. See
    /// [Generation::block_size_log2](crate::Generation::block_size_log2) for
    /// the pitch-qualified variant.
    pub const fn block_size_log2(self) -> u32 {
        self.block_size_class().log2()
    }

    pub const fn is_tiled(self) -> bool {
        !matches!(self, SwizzleMode::Linear)
    }

    pub const fn is_3d(self) -> bool {
        matches!(self.category(), TileCategory::Tiled3d)
    }

    // Stable index for the flat lookup tables, Linear included.
    pub(crate) const fn index(self) -> usize {
        match self {
            SwizzleMode::Linear => 0,
            SwizzleMode::Tiled256B2d => 1,
            SwizzleMode::Tiled4Kb2d => 2,
            SwizzleMode::Tiled64Kb2d => 3,
            SwizzleMode::Tiled256Kb2d => 4,
            SwizzleMode::Tiled4Kb3d => 5,
            SwizzleMode::Tiled64Kb3d => 6,
            SwizzleMode::Tiled256Kb3d => 7,
        }
    }

    pub(crate) const fn set_bit(self) -> SwizzleModeSet {
        SwizzleModeSet::from_bits_truncate(1 << self.index() as u32)
    }
}

bitflags! {
    /// A set of swizzle modes, as returned by
    /// [AddrContext::possible_swizzle_modes](crate::AddrContext::possible_swizzle_modes).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SwizzleModeSet: u32 {
        const LINEAR = 1 << 0;
        const TILED_256B_2D = 1 << 1;
        const TILED_4KB_2D = 1 << 2;
        const TILED_64KB_2D = 1 << 3;
        const TILED_256KB_2D = 1 << 4;
        const TILED_4KB_3D = 1 << 5;
        const TILED_64KB_3D = 1 << 6;
        const TILED_256KB_3D = 1 << 7;
    }
}

impl SwizzleModeSet {
    /// Whether the set contains `mode`.
    pub fn contains_mode(self, mode: SwizzleMode) -> bool {
        self.contains(mode.set_bit())
    }
}
