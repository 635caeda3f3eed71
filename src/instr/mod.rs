//! Resumable instruction handlers and the opcode dispatch tables.
//!
//! Every instruction class is a small state machine.  Its executor is invoked
//! once per tick with the opcode; it runs micro-steps until one of them has
//! to wait for the bus, stores where it stopped in [`Cpu::progress`], and
//! returns.  The scheduler keeps ticking until the progress marker reads
//! [`Progress::Finished`](crate::cpu::Progress::Finished).

mod cmp;
mod cmpa;
mod cmpi;
mod cmpm;

pub use cmp::{Cmp, CmpStep};
pub use cmpa::{Cmpa, CmpaStep};
pub use cmpi::{Cmpi, CmpiStep};
pub use cmpm::{Cmpm, CmpmStep};

use crate::bus::{BusCycle, BusLedger, SimBus};
use crate::cpu::Cpu;
use crate::dis::Disassembly;
use crate::ea::{EaClasses, is_valid};
use log::debug;
use std::fmt;

//===========================================================================//

/// Clock cycles charged for each tick spent waiting on an operand.
const WAIT_CYCLES: u32 = 2;

/// The number of entries in each dispatch table.
pub const TABLE_SIZE: usize = 0x1_0000;

/// Advances the instruction in flight by one tick.
pub type Executor = fn(&mut Cpu, &mut dyn SimBus, u16);

/// Disassembles the instruction whose opcode word is at the given address.
pub type Printer = fn(&dyn SimBus, u32, u16) -> Disassembly;

//===========================================================================//

/// The capabilities each instruction class supplies to the dispatch tables.
pub trait Instruction {
    /// Runs one tick of the instruction with the given opcode.
    fn execute(cpu: &mut Cpu, bus: &mut dyn SimBus, opcode: u16);

    /// Disassembles the instruction whose opcode word is at `address`.
    fn render(bus: &dyn SimBus, address: u32, opcode: u16) -> Disassembly;

    /// Fills in the execute and print entries for every legal encoding of
    /// this instruction class.  Writing the same entries again is harmless.
    fn register(
        execute: &mut [Option<Executor>],
        print: &mut [Option<Printer>],
    );
}

/// Registers `exec` and `print_fn` at `base | field` for every EA field that
/// encodes a mode outside the `excluded` categories.
fn register_ea_forms(
    execute: &mut [Option<Executor>],
    print: &mut [Option<Printer>],
    base: u16,
    excluded: EaClasses,
    exec: Executor,
    print_fn: Printer,
) {
    for field in 0..0x40 {
        if is_valid(field, excluded) {
            let opcode = usize::from(base | field);
            execute[opcode] = Some(exec);
            print[opcode] = Some(print_fn);
        }
    }
}

/// Charges and records the completion prefetch of the next opcode word.
fn complete_prefetch(ledger: &mut BusLedger) {
    ledger.charge(BusCycle::Prefetch.cycles());
    ledger.prefetch();
}

/// Charges and records one internal (`n`) cycle.
fn internal_cycle(ledger: &mut BusLedger) {
    ledger.charge(BusCycle::Idle.cycles());
    ledger.record(BusCycle::Idle);
}

//===========================================================================//

/// The pair of dispatch tables mapping every opcode to its executor and
/// printer.  Empty entries are illegal or unimplemented opcodes.
///
/// Build it once with [`OpcodeTable::build`] and share it by reference.
pub struct OpcodeTable {
    execute: Box<[Option<Executor>]>,
    print: Box<[Option<Printer>]>,
}

impl OpcodeTable {
    /// Returns a table with no legal opcodes.
    pub fn empty() -> OpcodeTable {
        OpcodeTable {
            execute: vec![None; TABLE_SIZE].into_boxed_slice(),
            print: vec![None; TABLE_SIZE].into_boxed_slice(),
        }
    }

    /// Returns a table populated with every implemented instruction class.
    pub fn build() -> OpcodeTable {
        let mut table = OpcodeTable::empty();
        table.install::<Cmp>();
        table.install::<Cmpa>();
        table.install::<Cmpi>();
        table.install::<Cmpm>();
        debug!("built opcode table: {} legal opcodes", table.legal_count());
        table
    }

    /// Adds one instruction class to the table.
    pub fn install<I: Instruction>(&mut self) {
        I::register(&mut self.execute, &mut self.print);
    }

    /// Returns the executor for the given opcode, if it is legal.
    pub fn executor(&self, opcode: u16) -> Option<Executor> {
        self.execute[usize::from(opcode)]
    }

    /// Returns the printer for the given opcode, if it is legal.
    pub fn printer(&self, opcode: u16) -> Option<Printer> {
        self.print[usize::from(opcode)]
    }

    /// Returns true if the given opcode has an entry.
    pub fn is_legal(&self, opcode: u16) -> bool {
        self.execute[usize::from(opcode)].is_some()
    }

    /// Returns the number of opcodes with an entry.
    pub fn legal_count(&self) -> usize {
        self.execute.iter().filter(|entry| entry.is_some()).count()
    }
}

impl fmt::Debug for OpcodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeTable")
            .field("legal_count", &self.legal_count())
            .finish()
    }
}

//===========================================================================//


//===========================================================================//
