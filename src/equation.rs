//! Conversion of raw pattern table entries into per-bit equations and the
//! equation evaluation used for every texel address query.
use crate::pattern::{
    expand_pattern, SwizzlePatternRef, FLAG_BITS, S_BASE, X_BASE, Y_BASE, Z_BASE,
};

/// The largest block size is 256KB, so an equation never has more than 18
/// bits. The raw pattern tables cover up to 22.
pub const MAX_EQUATION_BITS: usize = 18;

/// The coordinate channel feeding one address bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    X,
    Y,
    Z,
    S,
}

/// One valid equation entry: take bit `index` of `channel`.
///
/// X indices are in byte units; the low bits of the byte x coordinate are
/// the offset within one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSource {
    pub channel: Channel,
    pub index: u8,
}

/// A swizzle pattern in evaluated form: for each output address bit, the
/// single input coordinate bit that produces it, if any.
///
/// Built once per (swizzle mode, fragment rate, element size) at context
/// creation and immutable afterwards.
#[derive(Debug, Clone, Copy)]
pub struct BitEquation {
    bits: [Option<BitSource>; MAX_EQUATION_BITS],
    num_bits: u8,
}

impl BitEquation {
    /// The number of address bits covered, equal to the block size log2.
    pub fn num_bits(&self) -> u32 {
        self.num_bits as u32
    }

    /// The source for output bit `bit`, if that bit has one.
    pub fn bit(&self, bit: usize) -> Option<BitSource> {
        self.bits[..self.num_bits as usize].get(bit).copied().flatten()
    }

    /// Computes the byte offset within one block for the given coordinate.
    ///
    /// `x_bytes` is the x coordinate in bytes, i.e. the pixel x shifted up
    /// by the element size log2. This is the hot path of every address
    /// query: one shift, mask and or per valid bit.
    pub fn offset(&self, x_bytes: u32, y: u32, z: u32, sample: u32) -> u32 {
        let mut offset = 0;
        for (i, bit) in self.bits[..self.num_bits as usize].iter().enumerate() {
            if let Some(src) = bit {
                let value = match src.channel {
                    Channel::X => x_bytes >> src.index,
                    Channel::Y => y >> src.index,
                    Channel::Z => z >> src.index,
                    Channel::S => sample >> src.index,
                } & 1;
                offset |= value << i;
            }
        }
        offset
    }
}

/// Converts a raw pattern table entry into equation form.
///
/// `block_size_log2` must be the pitch-qualified block size of the swizzle
/// mode the pattern belongs to. Bits below `bpp_log2` are the byte offset
/// within one element and are forced to the matching x byte bits.
///
/// # Panics
/// Panics if any geometry position of the expanded pattern has zero or more
/// than one channel flag set. The hardware pattern is a permutation per bit
/// by construction, so this indicates a corrupted static table, never a
/// runtime condition.
pub(crate) fn from_pattern(
    bpp_log2: u32,
    block_size_log2: u32,
    info: &SwizzlePatternRef,
) -> BitEquation {
    assert!(block_size_log2 as usize <= MAX_EQUATION_BITS);
    let expanded = expand_pattern(info);

    let mut bits = [None; MAX_EQUATION_BITS];
    for (i, slot) in bits[..block_size_log2 as usize].iter_mut().enumerate() {
        if (i as u32) < bpp_log2 {
            // Byte offset within one element.
            *slot = Some(BitSource {
                channel: Channel::X,
                index: i as u8,
            });
            continue;
        }

        let mask = expanded[i];
        assert_eq!(
            1,
            mask.count_ones(),
            "swizzle pattern table is corrupted at bit {}",
            i
        );
        let flag = mask.trailing_zeros();
        assert!(flag < FLAG_BITS);

        *slot = Some(if flag >= S_BASE {
            BitSource {
                channel: Channel::S,
                index: (flag - S_BASE) as u8,
            }
        } else if flag >= Z_BASE {
            BitSource {
                channel: Channel::Z,
                index: (flag - Z_BASE) as u8,
            }
        } else if flag >= Y_BASE {
            BitSource {
                channel: Channel::Y,
                index: (flag - Y_BASE) as u8,
            }
        } else {
            // Table x indices are element relative; the low bpp_log2 byte
            // bits are already consumed by the element offset.
            BitSource {
                channel: Channel::X,
                index: (flag - X_BASE + bpp_log2) as u8,
            }
        });
    }

    BitEquation {
        bits,
        num_bits: block_size_log2 as u8,
    }
}
