//! Effective-address decoding, legality and bus timing.
//!
//! The six-bit EA field of an opcode selects one of twelve addressing modes.
//! Each mode performs a fixed sequence of bus activities before the operand
//! is available, and that sequence only depends on the mode and on the
//! operand width.  Those sequences come straight from the 68000's published
//! timing tables; nothing here is computed from data.

mod resolve;

pub use resolve::EaResolver;
pub(crate) use resolve::sign_extend_word;

use crate::bus::BusCycle;
use crate::cpu::flags::Size;
use std::ops::BitOr;

//===========================================================================//

/// A decoded addressing mode, including its register selector.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddrMode {
    /// `Dn`
    DataReg(u8),
    /// `An`
    AddrReg(u8),
    /// `(An)`
    Indirect(u8),
    /// `(An)+`
    PostInc(u8),
    /// `-(An)`
    PreDec(u8),
    /// `(d16,An)`
    Disp(u8),
    /// `(d8,An,Xn)`
    Index(u8),
    /// `(xxx).W`
    AbsShort,
    /// `(xxx).L`
    AbsLong,
    /// `(d16,PC)`
    PcDisp,
    /// `(d8,PC,Xn)`
    PcIndex,
    /// `#<data>`
    Immediate,
}

impl AddrMode {
    /// Decodes the low six bits of `field` (mode in bits 5-3, register in bits
    /// 2-0).  Returns `None` for the reserved encodings `111 101` through
    /// `111 111`.
    pub fn decode(field: u16) -> Option<AddrMode> {
        let reg = (field & 0b111) as u8;
        match (field >> 3) & 0b111 {
            0 => Some(AddrMode::DataReg(reg)),
            1 => Some(AddrMode::AddrReg(reg)),
            2 => Some(AddrMode::Indirect(reg)),
            3 => Some(AddrMode::PostInc(reg)),
            4 => Some(AddrMode::PreDec(reg)),
            5 => Some(AddrMode::Disp(reg)),
            6 => Some(AddrMode::Index(reg)),
            _ => match reg {
                0 => Some(AddrMode::AbsShort),
                1 => Some(AddrMode::AbsLong),
                2 => Some(AddrMode::PcDisp),
                3 => Some(AddrMode::PcIndex),
                4 => Some(AddrMode::Immediate),
                _ => None,
            },
        }
    }

    /// Decodes the EA field in the low six bits of an opcode.  A reserved
    /// encoding here means the dispatch table sent an opcode to a handler
    /// that never registered it, so this panics.
    pub fn from_opcode(opcode: u16) -> AddrMode {
        match AddrMode::decode(opcode) {
            Some(mode) => mode,
            None => panic!(
                "unsupported addressing mode {:03b} {:03b} in opcode ${:04X}",
                (opcode >> 3) & 0b111,
                opcode & 0b111,
                opcode
            ),
        }
    }

    /// Returns the six-bit EA field for this mode.
    pub fn encode(self) -> u16 {
        let (mode, reg) = match self {
            AddrMode::DataReg(r) => (0, r),
            AddrMode::AddrReg(r) => (1, r),
            AddrMode::Indirect(r) => (2, r),
            AddrMode::PostInc(r) => (3, r),
            AddrMode::PreDec(r) => (4, r),
            AddrMode::Disp(r) => (5, r),
            AddrMode::Index(r) => (6, r),
            AddrMode::AbsShort => (7, 0),
            AddrMode::AbsLong => (7, 1),
            AddrMode::PcDisp => (7, 2),
            AddrMode::PcIndex => (7, 3),
            AddrMode::Immediate => (7, 4),
        };
        (mode << 3) | u16::from(reg & 0b111)
    }

    /// Returns the legality category this mode belongs to.
    pub fn class(self) -> EaClasses {
        match self {
            AddrMode::DataReg(_) => EaClasses::DATA_REG,
            AddrMode::AddrReg(_) => EaClasses::ADDR_REG,
            AddrMode::Indirect(_)
            | AddrMode::PostInc(_)
            | AddrMode::PreDec(_)
            | AddrMode::Disp(_)
            | AddrMode::Index(_)
            | AddrMode::AbsShort
            | AddrMode::AbsLong => EaClasses::MEMORY,
            AddrMode::PcDisp | AddrMode::PcIndex => EaClasses::PC_RELATIVE,
            AddrMode::Immediate => EaClasses::IMMEDIATE,
        }
    }

    /// Returns the number of extension words that follow the opcode for this
    /// mode at the given operand width.
    pub fn extension_words(self, size: Size) -> u32 {
        match self {
            AddrMode::DataReg(_)
            | AddrMode::AddrReg(_)
            | AddrMode::Indirect(_)
            | AddrMode::PostInc(_)
            | AddrMode::PreDec(_) => 0,
            AddrMode::Disp(_)
            | AddrMode::Index(_)
            | AddrMode::AbsShort
            | AddrMode::PcDisp
            | AddrMode::PcIndex => 1,
            AddrMode::AbsLong => 2,
            AddrMode::Immediate => {
                if size == Size::Long {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// Returns the bus activities performed to fetch an operand of the given
    /// width through this mode, in order.
    pub fn bus_pattern(self, size: Size) -> &'static [BusCycle] {
        use BusCycle::{Idle, Prefetch, Read, ReadHigh};
        let long = size == Size::Long;
        match self {
            AddrMode::DataReg(_) | AddrMode::AddrReg(_) => &[],
            AddrMode::Indirect(_) | AddrMode::PostInc(_) => {
                if long { &[ReadHigh, Read] } else { &[Read] }
            }
            AddrMode::PreDec(_) => {
                if long { &[Idle, ReadHigh, Read] } else { &[Idle, Read] }
            }
            AddrMode::Disp(_) | AddrMode::AbsShort | AddrMode::PcDisp => {
                if long {
                    &[Prefetch, ReadHigh, Read]
                } else {
                    &[Prefetch, Read]
                }
            }
            AddrMode::Index(_) | AddrMode::PcIndex => {
                if long {
                    &[Idle, Prefetch, ReadHigh, Read]
                } else {
                    &[Idle, Prefetch, Read]
                }
            }
            AddrMode::AbsLong => {
                if long {
                    &[Prefetch, Prefetch, ReadHigh, Read]
                } else {
                    &[Prefetch, Prefetch, Read]
                }
            }
            AddrMode::Immediate => {
                if long { &[Prefetch, Prefetch] } else { &[Prefetch] }
            }
        }
    }

    /// Returns the clock cycles this mode adds to an instruction for an
    /// operand of the given width.
    pub fn cycles(self, size: Size) -> u32 {
        self.bus_pattern(size).iter().map(|cycle| cycle.cycles()).sum()
    }
}

//===========================================================================//

/// A set of addressing-mode categories, used to state which modes an
/// instruction form does *not* accept.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EaClasses(u8);

impl EaClasses {
    /// The empty set.
    pub const NONE: EaClasses = EaClasses(0);
    /// `Dn`
    pub const DATA_REG: EaClasses = EaClasses(0b0_0001);
    /// `An`
    pub const ADDR_REG: EaClasses = EaClasses(0b0_0010);
    /// Every mode that addresses memory through registers or absolute
    /// addresses.
    pub const MEMORY: EaClasses = EaClasses(0b0_0100);
    /// `(d16,PC)` and `(d8,PC,Xn)`
    pub const PC_RELATIVE: EaClasses = EaClasses(0b0_1000);
    /// `#<data>`
    pub const IMMEDIATE: EaClasses = EaClasses(0b1_0000);
    /// Everything outside the "data alterable" category.
    pub const NOT_DATA_ALTERABLE: EaClasses = EaClasses(
        EaClasses::ADDR_REG.0
            | EaClasses::PC_RELATIVE.0
            | EaClasses::IMMEDIATE.0,
    );

    /// Returns true if every category in `other` is also in `self`.
    pub fn contains(self, other: EaClasses) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for EaClasses {
    type Output = EaClasses;

    fn bitor(self, rhs: EaClasses) -> EaClasses {
        EaClasses(self.0 | rhs.0)
    }
}

//===========================================================================//

/// Returns true if the six-bit EA field in the low bits of `field` encodes a
/// real addressing mode whose category is not in `excluded`.
pub fn is_valid(field: u16, excluded: EaClasses) -> bool {
    match AddrMode::decode(field) {
        Some(mode) => !excluded.contains(mode.class()),
        None => false,
    }
}

//===========================================================================//


//===========================================================================//
