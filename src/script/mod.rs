//! Setup scripts: a small line-oriented language for preparing registers and
//! memory and then stepping instructions.
//!
//! ```text
//! ; CMP.L -(A0),D3
//! mem $1000 = $b6a0
//! pc = $1000
//! a0 = $2000
//! step
//! ```

mod lex;
mod parse;
mod types;

pub use lex::{Token, TokenLexer, TokenValue};
pub use parse::{ScriptAst, ScriptStmt};
pub use types::{ParseError, SrcSpan};

use crate::bus::SimBus;
use crate::cpu::Register;
use crate::proc::{M68000, SimBreak, SimProc, StepReport};
use byteorder::{BigEndian, ByteOrder};
use log::debug;
use thiserror::Error;

//===========================================================================//

/// An error that stops a script.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ScriptError {
    /// The script could not be parsed.
    #[error("script has {} syntax error(s)", .0.len())]
    Parse(Vec<ParseError>),
    /// The processor stopped while stepping.
    #[error(transparent)]
    Break(#[from] SimBreak),
}

impl From<Vec<ParseError>> for ScriptError {
    fn from(errors: Vec<ParseError>) -> ScriptError {
        ScriptError::Parse(errors)
    }
}

//===========================================================================//

impl ScriptAst {
    /// Runs every statement against the given processor and bus, returning a
    /// report for each instruction stepped.
    pub fn run(
        &self,
        proc: &mut M68000<'_>,
        bus: &mut dyn SimBus,
    ) -> Result<Vec<StepReport>, ScriptError> {
        let mut reports = Vec::new();
        for stmt in self.statements.iter() {
            match stmt {
                ScriptStmt::SetRegister { register, value, .. } => {
                    debug!("{register} = ${value:08X}");
                    if *register == Register::Pc {
                        proc.set_pc(*value);
                    } else {
                        proc.registers_mut().set(*register, *value);
                    }
                }
                ScriptStmt::Poke { address, words, .. } => {
                    debug!("poke {} word(s) at ${address:06X}", words.len());
                    let mut bytes = vec![0u8; 2 * words.len()];
                    BigEndian::write_u16_into(words, &mut bytes);
                    for (offset, &byte) in bytes.iter().enumerate() {
                        let addr = address.wrapping_add(offset as u32);
                        bus.write_byte(addr, byte);
                    }
                }
                ScriptStmt::Step { count, .. } => {
                    for _ in 0..*count {
                        reports.push(proc.step(bus)?);
                    }
                }
            }
        }
        Ok(reports)
    }
}

/// Parses and runs a script.
pub fn run_script(
    source: &str,
    proc: &mut M68000<'_>,
    bus: &mut dyn SimBus,
) -> Result<Vec<StepReport>, ScriptError> {
    ScriptAst::parse_source(source)?.run(proc, bus)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{ScriptError, run_script};
    use crate::bus::{RamBus, SimBus};
    use crate::instr::OpcodeTable;
    use crate::proc::{M68000, SimBreak};

    #[test]
    fn pokes_are_big_endian() {
        let table = OpcodeTable::build();
        let mut proc = M68000::new(&table);
        let mut bus = RamBus::with_address_bits(12);
        run_script("mem $100 = $1234, $abcd\n", &mut proc, &mut bus).unwrap();
        assert_eq!(bus.peek_byte(0x100), 0x12);
        assert_eq!(bus.peek_byte(0x101), 0x34);
        assert_eq!(bus.peek_word(0x102), 0xabcd);
    }

    #[test]
    fn steps_produce_reports() {
        let table = OpcodeTable::build();
        let mut proc = M68000::new(&table);
        let mut bus = RamBus::with_address_bits(12);
        let reports = run_script(
            "mem $200 = $b607, $b047\npc = $200\nstep 2\n",
            &mut proc,
            &mut bus,
        )
        .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].address, 0x202);
        assert_eq!(proc.registers().pc, 0x204);
    }

    #[test]
    fn illegal_opcode_stops_the_script() {
        let table = OpcodeTable::build();
        let mut proc = M68000::new(&table);
        let mut bus = RamBus::with_address_bits(12);
        assert_eq!(
            run_script("mem 0 = $ffff\nstep\n", &mut proc, &mut bus),
            Err(ScriptError::Break(SimBreak::IllegalOpcode {
                addr: 0,
                opcode: 0xffff,
            }))
        );
    }

    #[test]
    fn parse_errors_are_reported() {
        let table = OpcodeTable::empty();
        let mut proc = M68000::new(&table);
        let mut bus = RamBus::with_address_bits(4);
        let error = run_script("x9 = 1\n", &mut proc, &mut bus).unwrap_err();
        assert_eq!(error.to_string(), "script has 1 syntax error(s)");
    }
}

//===========================================================================//
