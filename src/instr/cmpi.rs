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

/// Where a `CMPI #<data>,<ea>` resumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CmpiStep {
    /// Fetching the immediate source from the instruction stream.
    Immediate,
    /// Waiting for the destination operand, with the source latched.
    ReadDestination {
        /// The immediate value, already masked to the operation width.
        source: u32,
    },
    /// Flags are committed; the completion prefetch is next.
    Prefetch,
    /// The trailing internal cycle of `CMPI.L #<data>,Dn`.
    Tail,
}

/// `CMPI #<data>,<ea>`: compares a data-alterable operand against an
/// immediate.
pub struct Cmpi;

impl Instruction for Cmpi {
    fn execute(cpu: &mut Cpu, bus: &mut dyn SimBus, opcode: u16) {
        let size = Size::from_opcode(opcode);
        loop {
            match cpu.progress {
                Progress::Idle => {
                    cpu.ea.begin_mode(AddrMode::Immediate, size);
                    cpu.progress = Progress::Cmpi(CmpiStep::Immediate);
                }
                Progress::Cmpi(CmpiStep::Immediate) => {
                    let source =
                        match cpu.ea.poll(&mut cpu.regs, bus, &mut cpu.ledger) {
                            Some(value) => value,
                            None => {
                                cpu.ledger.charge(WAIT_CYCLES);
                                return;
                            }
                        };
                    cpu.ea.begin_read(opcode, size);
                    cpu.progress =
                        Progress::Cmpi(CmpiStep::ReadDestination { source });
                }
                Progress::Cmpi(CmpiStep::ReadDestination { source }) => {
                    let dst =
                        match cpu.ea.poll(&mut cpu.regs, bus, &mut cpu.ledger) {
                            Some(value) => value,
                            None => {
                                cpu.ledger.charge(WAIT_CYCLES);
                                return;
                            }
                        };
                    cpu.regs.sr =
                        flags::compare(cpu.regs.sr, size, source, dst);
                    cpu.progress = Progress::Cmpi(CmpiStep::Prefetch);
                }
                Progress::Cmpi(CmpiStep::Prefetch) => {
                    complete_prefetch(&mut cpu.ledger);
                    let data_reg = matches!(
                        AddrMode::from_opcode(opcode),
                        AddrMode::DataReg(_)
                    );
                    cpu.progress = if size == Size::Long && data_reg {
                        Progress::Cmpi(CmpiStep::Tail)
                    } else {
                        Progress::Finished
                    };
                    return;
                }
                Progress::Cmpi(CmpiStep::Tail) => {
                    internal_cycle(&mut cpu.ledger);
                    cpu.progress = Progress::Finished;
                    return;
                }
                Progress::Finished => return,
                other => panic!("CMPI resumed from {other:?}"),
            }
        }
    }

    fn render(bus: &dyn SimBus, address: u32, opcode: u16) -> Disassembly {
        let size = Size::from_opcode(opcode);
        let mut stream = OperandStream::new(bus, address);
        let source = format_ea(AddrMode::Immediate, size, &mut stream);
        let dest = format_ea(AddrMode::from_opcode(opcode), size, &mut stream);
        let operands = format!("{source},{dest}");
        stream.into_disassembly(format!("CMPI{size}"), operands)
    }

    fn register(
        execute: &mut [Option<Executor>],
        print: &mut [Option<Printer>],
    ) {
        for size in [Size::Byte, Size::Word, Size::Long] {
            register_ea_forms(
                execute,
                print,
                0x0c00 | (size.bits() << 6),
                EaClasses::NOT_DATA_ALTERABLE,
                Cmpi::execute,
                Cmpi::render,
            );
        }
    }
}

//===========================================================================//


//===========================================================================//
