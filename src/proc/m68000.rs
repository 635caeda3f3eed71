use crate::bus::{BusCycle, SimBus};
use crate::cpu::{Cpu, Progress, Register, Registers};
use crate::dis::disassemble;
use crate::ea::EaResolver;
use crate::instr::{Executor, OpcodeTable};
use crate::proc::{SimBreak, SimProc};
use log::{Level, log_enabled, trace};

//===========================================================================//

const REGISTER_NAMES: &[&str] = &[
    "D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7", "A0", "A1", "A2", "A3",
    "A4", "A5", "A6", "A7", "PC", "SR",
];

//===========================================================================//

/// What happened during one complete instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepReport {
    /// The address of the opcode word.
    pub address: u32,
    /// The opcode word.
    pub opcode: u16,
    /// The number of ticks the executor ran for.
    pub ticks: u32,
    /// The clock cycles charged.
    pub cycles: u64,
    /// The bus activity recorded, in order.
    pub transactions: Vec<BusCycle>,
}

#[derive(Clone, Copy)]
struct InFlight {
    address: u32,
    opcode: u16,
    execute: Executor,
}

//===========================================================================//

/// A simulated 68000 that fetches opcodes and ticks their executors until
/// they finish.
pub struct M68000<'t> {
    cpu: Cpu,
    table: &'t OpcodeTable,
    current: Option<InFlight>,
}

impl<'t> M68000<'t> {
    /// Returns a new processor, with all registers cleared, that dispatches
    /// through the given table.
    pub fn new(table: &'t OpcodeTable) -> M68000<'t> {
        M68000 { cpu: Cpu::new(), table, current: None }
    }

    /// Returns the processor state.
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Returns the register file.
    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    /// Returns the register file for modification.
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.cpu.regs
    }

    /// Runs ticks until the current instruction (or, between instructions,
    /// the next one) completes.
    pub fn step(
        &mut self,
        bus: &mut dyn SimBus,
    ) -> Result<StepReport, SimBreak> {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if let Some(done) = self.advance(bus)? {
                return Ok(StepReport {
                    address: done.address,
                    opcode: done.opcode,
                    ticks,
                    cycles: self.cpu.ledger.cycles(),
                    transactions: self.cpu.ledger.transactions().to_vec(),
                });
            }
        }
    }

    /// Runs one tick, returning the instruction if this tick completed it.
    fn advance(
        &mut self,
        bus: &mut dyn SimBus,
    ) -> Result<Option<InFlight>, SimBreak> {
        let inflight = match self.current {
            Some(inflight) => inflight,
            None => {
                let inflight = self.fetch(bus)?;
                self.current = Some(inflight);
                inflight
            }
        };
        (inflight.execute)(&mut self.cpu, bus, inflight.opcode);
        if !self.cpu.is_finished() {
            return Ok(None);
        }
        self.current = None;
        debug_assert!(self.cpu.ledger.count(BusCycle::Prefetch) >= 1);
        debug_assert_eq!(
            self.cpu.ledger.cycles(),
            self.cpu.ledger.nominal_cycles()
        );
        if log_enabled!(target: "instr", Level::Trace) {
            let dis = disassemble(self.table, bus, inflight.address);
            trace!(
                target: "instr",
                "${:06X}  {:<28} {:>3} cycles  {}",
                inflight.address,
                dis.to_string(),
                self.cpu.ledger.cycles(),
                self.cpu.ledger.pattern()
            );
        }
        Ok(Some(inflight))
    }

    fn fetch(&mut self, bus: &mut dyn SimBus) -> Result<InFlight, SimBreak> {
        let address = self.cpu.regs.pc;
        let opcode = bus.read_word(address);
        let execute = match self.table.executor(opcode) {
            Some(execute) => execute,
            None => {
                return Err(SimBreak::IllegalOpcode { addr: address, opcode });
            }
        };
        self.cpu.regs.pc = address.wrapping_add(2);
        self.cpu.begin_instruction();
        Ok(InFlight { address, opcode, execute })
    }
}

impl SimProc for M68000<'_> {
    fn description(&self) -> String {
        "Motorola 68000".to_string()
    }

    fn disassemble(&self, bus: &dyn SimBus, addr: u32) -> (u32, String) {
        let dis = disassemble(self.table, bus, addr);
        (dis.size, dis.to_string())
    }

    fn pc(&self) -> u32 {
        self.cpu.regs.pc
    }

    fn set_pc(&mut self, addr: u32) {
        self.cpu.regs.pc = addr;
        self.current = None;
        self.cpu.progress = Progress::Idle;
        self.cpu.ea = EaResolver::new();
    }

    fn register_names(&self) -> &'static [&'static str] {
        REGISTER_NAMES
    }

    fn get_register(&self, name: &str) -> Option<u32> {
        Register::from_name(name).map(|reg| self.cpu.regs.get(reg))
    }

    fn set_register(&mut self, name: &str, value: u32) {
        if let Some(reg) = Register::from_name(name) {
            if reg == Register::Pc {
                self.set_pc(value);
            } else {
                self.cpu.regs.set(reg, value);
            }
        }
    }

    fn tick(&mut self, bus: &mut dyn SimBus) -> Result<(), SimBreak> {
        self.advance(bus).map(|_| ())
    }

    fn is_mid_instruction(&self) -> bool {
        self.current.is_some()
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::M68000;
    use crate::bus::{BusCycle, RamBus, SimBus};
    use crate::instr::OpcodeTable;
    use crate::proc::{SimBreak, SimProc};

    #[test]
    fn steps_one_instruction() {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(12);
        bus.write_word(0x100, 0xb607);
        let mut proc = M68000::new(&table);
        proc.set_pc(0x100);
        proc.set_register("d3", 5);
        proc.set_register("d7", 7);
        let report = proc.step(&mut bus).unwrap();
        assert_eq!(report.address, 0x100);
        assert_eq!(report.opcode, 0xb607);
        assert_eq!(report.ticks, 1);
        assert_eq!(report.cycles, 4);
        assert_eq!(report.transactions, vec![BusCycle::Prefetch]);
        assert_eq!(proc.pc(), 0x102);
        assert_eq!(proc.get_register("CCR"), Some(0x09));
    }

    #[test]
    fn ticks_suspend_between_bus_items() {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(12);
        // CMP.W (A0),D0
        bus.write_word(0x000, 0xb050);
        let mut proc = M68000::new(&table);
        proc.tick(&mut bus).unwrap();
        assert!(proc.is_mid_instruction());
        proc.tick(&mut bus).unwrap();
        assert!(proc.is_mid_instruction());
        proc.tick(&mut bus).unwrap();
        assert!(!proc.is_mid_instruction());
        assert_eq!(proc.cpu().ledger.pattern(), "nr np");
    }

    #[test]
    fn illegal_opcode_leaves_pc_alone() {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(12);
        bus.write_word(0x200, 0x4afc);
        let mut proc = M68000::new(&table);
        proc.set_pc(0x200);
        assert_eq!(
            proc.step(&mut bus),
            Err(SimBreak::IllegalOpcode { addr: 0x200, opcode: 0x4afc })
        );
        assert_eq!(proc.pc(), 0x200);
        assert!(!proc.is_mid_instruction());
        assert_eq!(
            SimBreak::IllegalOpcode { addr: 0x200, opcode: 0x4afc }.to_string(),
            "illegal opcode $4AFC at $000200"
        );
    }

    #[test]
    fn register_access_by_name() {
        let table = OpcodeTable::empty();
        let mut proc = M68000::new(&table);
        assert_eq!(proc.register_names().len(), 18);
        proc.set_register("sp", 0x8000);
        assert_eq!(proc.get_register("A7"), Some(0x8000));
        proc.set_register("bogus", 1);
        assert_eq!(proc.get_register("bogus"), None);
        assert_eq!(proc.description(), "Motorola 68000");
    }

    #[test]
    fn disassemble_through_the_table() {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(12);
        bus.write_word(0x10, 0xb608);
        let proc = M68000::new(&table);
        assert_eq!(proc.disassemble(&bus, 0x10), (2, "DC.W $B608".to_string()));
        bus.write_word(0x10, 0xb648);
        assert_eq!(
            proc.disassemble(&bus, 0x10),
            (2, "CMP.W A0,D3".to_string())
        );
    }
}

//===========================================================================//
