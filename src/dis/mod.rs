//! Facilities for disassembling 68000 machine code.

use crate::bus::SimBus;
use crate::cpu::flags::Size;
use crate::ea::AddrMode;
use crate::instr::OpcodeTable;
use std::fmt;

//===========================================================================//

/// One disassembled instruction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Disassembly {
    /// The address of the opcode word.
    pub address: u32,
    /// The length of the instruction in bytes, including extension words.
    pub size: u32,
    /// The mnemonic, with its size suffix (e.g. `"CMP.B"`).
    pub mnemonic: String,
    /// The operand list (e.g. `"-(A0),D3"`), or an empty string.
    pub operands: String,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operands.is_empty() {
            f.write_str(&self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.operands)
        }
    }
}

//===========================================================================//

/// A cursor over the extension words that follow an opcode.  Reads through
/// [`SimBus::peek_word`], so disassembly never has side effects.
pub struct OperandStream<'a> {
    bus: &'a dyn SimBus,
    start: u32,
    next: u32,
}

impl<'a> OperandStream<'a> {
    /// Returns a stream positioned just after the opcode word at `address`.
    pub fn new(bus: &'a dyn SimBus, address: u32) -> OperandStream<'a> {
        OperandStream { bus, start: address, next: address.wrapping_add(2) }
    }

    /// Returns the address of the next unread extension word.
    pub fn position(&self) -> u32 {
        self.next
    }

    /// Reads the next extension word.
    pub fn next_word(&mut self) -> u16 {
        let word = self.bus.peek_word(self.next);
        self.next = self.next.wrapping_add(2);
        word
    }

    /// Reads the next two extension words as a big-endian long.
    pub fn next_long(&mut self) -> u32 {
        let hi = self.next_word();
        let lo = self.next_word();
        (u32::from(hi) << 16) | u32::from(lo)
    }

    /// Finishes disassembly of the instruction, sizing it by the extension
    /// words consumed so far.
    pub fn into_disassembly(
        self,
        mnemonic: String,
        operands: String,
    ) -> Disassembly {
        Disassembly {
            address: self.start,
            size: self.next.wrapping_sub(self.start),
            mnemonic,
            operands,
        }
    }
}

//===========================================================================//

/// Formats one operand in standard Motorola syntax, consuming its extension
/// words from `stream`.
pub fn format_ea(
    mode: AddrMode,
    size: Size,
    stream: &mut OperandStream,
) -> String {
    match mode {
        AddrMode::DataReg(r) => format!("D{r}"),
        AddrMode::AddrReg(r) => format!("A{r}"),
        AddrMode::Indirect(r) => format!("(A{r})"),
        AddrMode::PostInc(r) => format!("(A{r})+"),
        AddrMode::PreDec(r) => format!("-(A{r})"),
        AddrMode::Disp(r) => {
            let disp = stream.next_word() as i16;
            format!("{}(A{r})", format_signed(i32::from(disp)))
        }
        AddrMode::Index(r) => {
            let ext = stream.next_word();
            format!("{}(A{r},{})", format_signed(brief_disp(ext)), index(ext))
        }
        AddrMode::AbsShort => format!("${:04X}.W", stream.next_word()),
        AddrMode::AbsLong => format!("${:08X}.L", stream.next_long()),
        AddrMode::PcDisp => {
            let disp = stream.next_word() as i16;
            format!("{}(PC)", format_signed(i32::from(disp)))
        }
        AddrMode::PcIndex => {
            let ext = stream.next_word();
            format!("{}(PC,{})", format_signed(brief_disp(ext)), index(ext))
        }
        AddrMode::Immediate => match size {
            Size::Byte => format!("#${:02X}", stream.next_word() & 0xff),
            Size::Word => format!("#${:04X}", stream.next_word()),
            Size::Long => format!("#${:08X}", stream.next_long()),
        },
    }
}

fn format_signed(value: i32) -> String {
    if value < 0 {
        format!("-${:X}", value.unsigned_abs())
    } else {
        format!("${value:X}")
    }
}

fn brief_disp(ext: u16) -> i32 {
    i32::from((ext & 0xff) as u8 as i8)
}

fn index(ext: u16) -> String {
    let kind = if ext & 0x8000 != 0 { 'A' } else { 'D' };
    let width = if ext & 0x0800 != 0 { 'L' } else { 'W' };
    format!("{kind}{}.{width}", (ext >> 12) & 0b111)
}

//===========================================================================//

/// Disassembles the instruction at `address`.  Opcodes with no entry in the
/// table come back as a `DC.W` data word.
pub fn disassemble(
    table: &OpcodeTable,
    bus: &dyn SimBus,
    address: u32,
) -> Disassembly {
    let opcode = bus.peek_word(address);
    match table.printer(opcode) {
        Some(print) => print(bus, address, opcode),
        None => OperandStream::new(bus, address)
            .into_disassembly("DC.W".to_string(), format!("${opcode:04X}")),
    }
}

//===========================================================================//


//===========================================================================//
