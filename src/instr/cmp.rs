use super::{
    Executor, Instruction, Printer, WAIT_CYCLES, complete_prefetch,
    internal_cycle, register_ea_forms,
};
use crate::bus::SimBus;
use crate::cpu::flags::{self, Size};
use crate::cpu::{Cpu, Progress};
use crate::dis::{Disassembly, OperandStream, format_ea};
use crate::ea::{AddrMode, EaClasses};

//===========================================================================//

/// Where a `CMP <ea>,Dn` resumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CmpStep {
    /// Waiting for the source operand.
    Read,
    /// Flags are committed; the completion prefetch is next.
    Prefetch,
    /// The extra internal cycle of the long form.
    Long,
}

/// `CMP <ea>,Dn`: subtracts the source from a data register and sets the
/// condition codes, discarding the result.
pub struct Cmp;

impl Instruction for Cmp {
    fn execute(cpu: &mut Cpu, bus: &mut dyn SimBus, opcode: u16) {
        let size = Size::from_opcode(opcode);
        let reg = usize::from((opcode >> 9) & 0b111);
        loop {
            match cpu.progress {
                Progress::Idle => {
                    cpu.ea.begin_read(opcode, size);
                    cpu.progress = Progress::Cmp(CmpStep::Read);
                }
                Progress::Cmp(CmpStep::Read) => {
                    let src =
                        match cpu.ea.poll(&mut cpu.regs, bus, &mut cpu.ledger) {
                            Some(value) => value,
                            None => {
                                cpu.ledger.charge(WAIT_CYCLES);
                                return;
                            }
                        };
                    let dst = cpu.regs.d[reg];
                    cpu.regs.sr = flags::compare(cpu.regs.sr, size, src, dst);
                    cpu.progress = Progress::Cmp(CmpStep::Prefetch);
                }
                Progress::Cmp(CmpStep::Prefetch) => {
                    complete_prefetch(&mut cpu.ledger);
                    cpu.progress = if size == Size::Long {
                        Progress::Cmp(CmpStep::Long)
                    } else {
                        Progress::Finished
                    };
                    return;
                }
                Progress::Cmp(CmpStep::Long) => {
                    internal_cycle(&mut cpu.ledger);
                    cpu.progress = Progress::Finished;
                    return;
                }
                Progress::Finished => return,
                other => panic!("CMP resumed from {other:?}"),
            }
        }
    }

    fn render(bus: &dyn SimBus, address: u32, opcode: u16) -> Disassembly {
        let size = Size::from_opcode(opcode);
        let mut stream = OperandStream::new(bus, address);
        let mode = AddrMode::from_opcode(opcode);
        let source = format_ea(mode, size, &mut stream);
        let operands = format!("{source},D{}", (opcode >> 9) & 0b111);
        stream.into_disassembly(format!("CMP{size}"), operands)
    }

    fn register(
        execute: &mut [Option<Executor>],
        print: &mut [Option<Printer>],
    ) {
        for reg in 0..8 {
            for size in [Size::Byte, Size::Word, Size::Long] {
                // Byte-sized address register sources do not exist.
                let excluded = match size {
                    Size::Byte => EaClasses::ADDR_REG,
                    Size::Word | Size::Long => EaClasses::NONE,
                };
                let base = 0xb000 | (reg << 9) | (size.bits() << 6);
                register_ea_forms(
                    execute,
                    print,
                    base,
                    excluded,
                    Cmp::execute,
                    Cmp::render,
                );
            }
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::CmpStep;
    use crate::bus::{BusCycle, RamBus, SimBus};
    use crate::cpu::flags::{FLAG_C, FLAG_N, FLAG_Z};
    use crate::cpu::{Cpu, Progress};
    use crate::instr::{Cmp, Instruction};

    /// Runs one tick and returns the progress marker it left behind.
    fn tick(cpu: &mut Cpu, bus: &mut RamBus, opcode: u16) -> Progress {
        Cmp::execute(cpu, bus, opcode);
        cpu.progress
    }

    #[test]
    fn register_source_finishes_in_one_tick() {
        let mut cpu = Cpu::new();
        let mut bus = RamBus::with_address_bits(8);
        cpu.regs.d[3] = 0x0000_0005;
        cpu.regs.d[7] = 0x0000_0007;
        cpu.begin_instruction();
        // CMP.B D7,D3
        assert_eq!(tick(&mut cpu, &mut bus, 0xb607), Progress::Finished);
        assert_eq!(cpu.regs.sr & (FLAG_N | FLAG_Z | FLAG_C), FLAG_N | FLAG_C);
        assert_eq!(cpu.regs.d[3], 5);
        assert_eq!(cpu.ledger.cycles(), 4);
        assert_eq!(cpu.ledger.transactions(), &[BusCycle::Prefetch]);
    }

    #[test]
    fn long_predecrement_steps_through_every_state() {
        let mut cpu = Cpu::new();
        let mut bus = RamBus::with_address_bits(16);
        cpu.regs.a[0] = 0x1000;
        cpu.regs.d[3] = 0x1234_5678;
        bus.write_word(0x0ffc, 0x1234);
        bus.write_word(0x0ffe, 0x5678);
        cpu.begin_instruction();
        // CMP.L -(A0),D3
        let opcode = 0xb6a0;
        let mut seen = Vec::new();
        for _ in 0..32 {
            let progress = tick(&mut cpu, &mut bus, opcode);
            if seen.last() != Some(&progress) {
                seen.push(progress);
            }
            if progress == Progress::Finished {
                break;
            }
        }
        assert_eq!(
            seen,
            vec![
                Progress::Cmp(CmpStep::Read),
                Progress::Cmp(CmpStep::Long),
                Progress::Finished,
            ]
        );
        assert_eq!(cpu.regs.a[0], 0x0ffc);
        assert!(cpu.regs.flag(FLAG_Z));
        assert_eq!(cpu.ledger.pattern(), "n nR nr np n");
        assert_eq!(cpu.ledger.cycles(), 16);
    }

    #[test]
    fn finished_instruction_ignores_extra_ticks() {
        let mut cpu = Cpu::new();
        let mut bus = RamBus::with_address_bits(8);
        cpu.begin_instruction();
        Cmp::execute(&mut cpu, &mut bus, 0xb040);
        assert!(cpu.is_finished());
        Cmp::execute(&mut cpu, &mut bus, 0xb040);
        assert_eq!(cpu.ledger.cycles(), 4);
    }

    #[test]
    fn render_forms() {
        let mut bus = RamBus::with_address_bits(8);
        bus.write_word(0x10, 0xb607);
        assert_eq!(Cmp::render(&bus, 0x10, 0xb607).to_string(), "CMP.B D7,D3");
        bus.write_word(0x22, 0xfffe);
        let dis = Cmp::render(&bus, 0x20, 0xb268);
        assert_eq!(dis.to_string(), "CMP.W -$2(A0),D1");
        assert_eq!(dis.size, 4);
        assert_eq!(bus.peek_word(0x22), 0xfffe);
    }
}

//===========================================================================//
