//! Facilities for simulating a processor.

mod m68000;

pub use m68000::{M68000, StepReport};

use crate::bus::SimBus;
use thiserror::Error;

//===========================================================================//

/// A condition that pauses or halts the simulation.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum SimBreak {
    /// The processor fetched an opcode with no entry in its dispatch table.
    /// The program counter is left pointing at the opcode.
    #[error("illegal opcode ${opcode:04X} at ${addr:06X}")]
    IllegalOpcode {
        /// The address the opcode was fetched from.
        addr: u32,
        /// The opcode word.
        opcode: u16,
    },
}

//===========================================================================//

/// A simulated processor, advanced one tick at a time.
pub trait SimProc {
    /// Returns a human-readable description of this simulated processor.
    fn description(&self) -> String;

    /// Disassembles the instruction starting at the given address, returning
    /// the length of the instruction in bytes, and a human-readable string
    /// with the assembly code for that instruction.
    fn disassemble(&self, bus: &dyn SimBus, addr: u32) -> (u32, String);

    /// Returns the current address of the program counter.
    fn pc(&self) -> u32;

    /// Sets the current address of the program counter.  Any instruction in
    /// flight is abandoned.
    fn set_pc(&mut self, addr: u32);

    /// Returns the names of this processor's registers.
    fn register_names(&self) -> &'static [&'static str];

    /// Returns the value of the named register, if there is one.
    fn get_register(&self, name: &str) -> Option<u32>;

    /// Sets the named register, if there is one.
    fn set_register(&mut self, name: &str, value: u32);

    /// Advances this processor by one tick.
    fn tick(&mut self, bus: &mut dyn SimBus) -> Result<(), SimBreak>;

    /// Returns true if the processor is partway through an instruction.
    fn is_mid_instruction(&self) -> bool;
}

//===========================================================================//
