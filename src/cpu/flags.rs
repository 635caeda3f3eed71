//! The condition-code engine.

use std::fmt;

//===========================================================================//

/// Extend flag (bit 4 of the CCR).
pub const FLAG_X: u16 = 0b1_0000;
/// Negative flag (bit 3 of the CCR).
pub const FLAG_N: u16 = 0b0_1000;
/// Zero flag (bit 2 of the CCR).
pub const FLAG_Z: u16 = 0b0_0100;
/// Overflow flag (bit 1 of the CCR).
pub const FLAG_V: u16 = 0b0_0010;
/// Carry flag (bit 0 of the CCR).
pub const FLAG_C: u16 = 0b0_0001;

/// The bits of the status register that exist on a 68000 (T, S, I2-I0 and
/// the CCR); the rest always read as zero.
pub const SR_MASK: u16 = 0b1010_0111_0001_1111;

/// The bits of the condition code register.
pub const CCR_MASK: u16 = FLAG_X | FLAG_N | FLAG_Z | FLAG_V | FLAG_C;

//===========================================================================//

/// The width of an operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Size {
    /// 8 bits.
    Byte,
    /// 16 bits.
    Word,
    /// 32 bits.
    Long,
}

impl Size {
    /// Decodes the standard two-bit size field (`00`=byte, `01`=word,
    /// `10`=long).  Only the low two bits of `bits` are examined.  Returns
    /// `None` for the reserved `11` encoding.
    pub fn from_bits(bits: u16) -> Option<Size> {
        match bits & 0b11 {
            0b00 => Some(Size::Byte),
            0b01 => Some(Size::Word),
            0b10 => Some(Size::Long),
            _ => None,
        }
    }

    /// Decodes the size field in bits 7-6 of an opcode.  A reserved encoding
    /// here means the dispatch table sent an opcode to a handler that never
    /// registered it, so this panics.
    pub fn from_opcode(opcode: u16) -> Size {
        match Size::from_bits(opcode >> 6) {
            Some(size) => size,
            None => panic!("malformed size field in opcode ${opcode:04X}"),
        }
    }

    /// Returns the two-bit size field encoding of this size.
    pub fn bits(self) -> u16 {
        match self {
            Size::Byte => 0b00,
            Size::Word => 0b01,
            Size::Long => 0b10,
        }
    }

    /// Returns the number of bytes an operand of this size occupies.
    pub fn bytes(self) -> u32 {
        match self {
            Size::Byte => 1,
            Size::Word => 2,
            Size::Long => 4,
        }
    }

    /// Returns a mask of the bits belonging to this size.
    pub fn mask(self) -> u32 {
        match self {
            Size::Byte => 0xff,
            Size::Word => 0xffff,
            Size::Long => 0xffff_ffff,
        }
    }

    /// Returns the sign bit of this size.
    pub fn sign_bit(self) -> u32 {
        match self {
            Size::Byte => 0x80,
            Size::Word => 0x8000,
            Size::Long => 0x8000_0000,
        }
    }

    /// Returns the assembler suffix letter for this size.
    pub fn suffix(self) -> char {
        match self {
            Size::Byte => 'B',
            Size::Word => 'W',
            Size::Long => 'L',
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.suffix())
    }
}

//===========================================================================//

/// Computes the status register after a compare.
///
/// The three sign arguments are the operands' and the result's bits at the
/// operation's sign position (anything nonzero counts as set); `result` must
/// already be masked to the operation's width.  X and the system byte are
/// preserved.
pub fn set_flags_compare(
    sr: u16,
    src_sign: u32,
    dst_sign: u32,
    res_sign: u32,
    result: u32,
) -> u16 {
    let s = src_sign != 0;
    let d = dst_sign != 0;
    let r = res_sign != 0;
    let mut sr = sr & !(FLAG_N | FLAG_Z | FLAG_V | FLAG_C);
    if r {
        sr |= FLAG_N;
    }
    if result == 0 {
        sr |= FLAG_Z;
    }
    if (!s && d && !r) || (s && !d && r) {
        sr |= FLAG_V;
    }
    if (s && !d) || (r && !d) || (s && r) {
        sr |= FLAG_C;
    }
    sr
}

/// Subtracts `src` from `dst` at the given width and returns the status
/// register with the compare flags applied.
pub fn compare(sr: u16, size: Size, src: u32, dst: u32) -> u16 {
    let mask = size.mask();
    let sign = size.sign_bit();
    let result = dst.wrapping_sub(src) & mask;
    set_flags_compare(sr, src & sign, dst & sign, result & sign, result)
}

//===========================================================================//


//===========================================================================//
