//! Processor state for a simulated 68000.

pub mod flags;

use crate::bus::BusLedger;
use crate::ea::EaResolver;
use crate::instr::{CmpStep, CmpaStep, CmpiStep, CmpmStep};
use flags::{CCR_MASK, SR_MASK};
use std::fmt;

//===========================================================================//

/// Names a single programmer-visible register.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Register {
    /// Data register D0-D7.
    Data(u8),
    /// Address register A0-A7 (A7 is the active stack pointer).
    Addr(u8),
    /// The program counter.
    Pc,
    /// The full status register.
    Sr,
    /// The condition code register (low byte of SR).
    Ccr,
}

impl Register {
    /// Parses a register name such as `"d3"`, `"A7"`, `"sp"` or `"ccr"`
    /// (case-insensitive).
    pub fn from_name(name: &str) -> Option<Register> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "pc" => return Some(Register::Pc),
            "sr" => return Some(Register::Sr),
            "ccr" => return Some(Register::Ccr),
            "sp" => return Some(Register::Addr(7)),
            _ => {}
        }
        let bytes = lower.as_bytes();
        if bytes.len() != 2 || !(b'0'..=b'7').contains(&bytes[1]) {
            return None;
        }
        let index = bytes[1] - b'0';
        match bytes[0] {
            b'd' => Some(Register::Data(index)),
            b'a' => Some(Register::Addr(index)),
            _ => None,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Data(n) => write!(f, "D{n}"),
            Register::Addr(n) => write!(f, "A{n}"),
            Register::Pc => f.write_str("PC"),
            Register::Sr => f.write_str("SR"),
            Register::Ccr => f.write_str("CCR"),
        }
    }
}

//===========================================================================//

/// The programmer-visible register file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    /// Data registers D0-D7.
    pub d: [u32; 8],
    /// Address registers A0-A7.
    pub a: [u32; 8],
    /// Program counter.  While an instruction executes, this points just past
    /// the last instruction word consumed so far.
    pub pc: u32,
    /// Status register.
    pub sr: u16,
}

impl Registers {
    /// Returns true if the given CCR flag (see [`flags`]) is set.
    pub fn flag(&self, flag: u16) -> bool {
        (self.sr & flag) != 0
    }

    /// Returns the condition code register.
    pub fn ccr(&self) -> u8 {
        (self.sr & CCR_MASK) as u8
    }

    /// Returns the value of the named register.
    pub fn get(&self, register: Register) -> u32 {
        match register {
            Register::Data(n) => self.d[usize::from(n & 7)],
            Register::Addr(n) => self.a[usize::from(n & 7)],
            Register::Pc => self.pc,
            Register::Sr => u32::from(self.sr),
            Register::Ccr => u32::from(self.ccr()),
        }
    }

    /// Sets the named register.  Unimplemented status register bits are
    /// discarded.
    pub fn set(&mut self, register: Register, value: u32) {
        match register {
            Register::Data(n) => self.d[usize::from(n & 7)] = value,
            Register::Addr(n) => self.a[usize::from(n & 7)] = value,
            Register::Pc => self.pc = value,
            Register::Sr => self.sr = (value as u16) & SR_MASK,
            Register::Ccr => {
                self.sr = (self.sr & !CCR_MASK) | ((value as u16) & CCR_MASK)
            }
        }
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, value) in self.d.iter().enumerate() {
            write!(f, "D{n}={value:08X} ")?;
        }
        writeln!(f)?;
        for (n, value) in self.a.iter().enumerate() {
            write!(f, "A{n}={value:08X} ")?;
        }
        writeln!(f)?;
        let flag =
            |mask: u16, chr: char| if self.flag(mask) { chr } else { '-' };
        write!(
            f,
            "PC={:08X} SR={:04X} {}{}{}{}{}",
            self.pc,
            self.sr,
            flag(flags::FLAG_X, 'X'),
            flag(flags::FLAG_N, 'N'),
            flag(flags::FLAG_Z, 'Z'),
            flag(flags::FLAG_V, 'V'),
            flag(flags::FLAG_C, 'C'),
        )
    }
}

//===========================================================================//

/// The progress marker: where the instruction in flight resumes on the next
/// tick.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Progress {
    /// No micro-step has run yet for the current instruction.
    #[default]
    Idle,
    /// A `CMP <ea>,Dn` is in flight.
    Cmp(CmpStep),
    /// A `CMPA <ea>,An` is in flight.
    Cmpa(CmpaStep),
    /// A `CMPI #<data>,<ea>` is in flight.
    Cmpi(CmpiStep),
    /// A `CMPM (Ay)+,(Ax)+` is in flight.
    Cmpm(CmpmStep),
    /// The instruction has completed; the scheduler may fetch the next one.
    Finished,
}

impl Progress {
    /// Returns true if an instruction has started but not yet finished.
    pub fn is_in_flight(self) -> bool {
        !matches!(self, Progress::Idle | Progress::Finished)
    }
}

//===========================================================================//

/// The complete state of the processor as seen by instruction handlers.
///
/// Handlers keep nothing between ticks except what is stored here.
#[derive(Clone, Debug, Default)]
pub struct Cpu {
    /// The register file.
    pub regs: Registers,
    /// The micro-step the current instruction resumes at.
    pub progress: Progress,
    /// The effective-address resolution in progress, if any.
    pub ea: EaResolver,
    /// Cycles charged and bus activity recorded for the current instruction.
    pub ledger: BusLedger,
}

impl Cpu {
    /// Returns a processor with all registers cleared.
    pub fn new() -> Cpu {
        Cpu::default()
    }

    /// Prepares to execute a new instruction: resets the progress marker and
    /// clears the ledger.  Panics if the previous instruction never reached
    /// [`Progress::Finished`].
    pub fn begin_instruction(&mut self) {
        assert!(
            !self.progress.is_in_flight(),
            "new instruction started while {:?} was in flight",
            self.progress
        );
        debug_assert!(!self.ea.is_active());
        self.progress = Progress::Idle;
        self.ledger.reset();
    }

    /// Returns true once the current instruction has completed.
    pub fn is_finished(&self) -> bool {
        self.progress == Progress::Finished
    }
}

//===========================================================================//


//===========================================================================//
