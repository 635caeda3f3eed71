use super::{Executor, Instruction, Printer, WAIT_CYCLES, complete_prefetch};
use crate::bus::SimBus;
use crate::cpu::flags::{self, Size};
use crate::cpu::{Cpu, Progress};
use crate::dis::{Disassembly, OperandStream};
use crate::ea::AddrMode;

//===========================================================================//

/// Where a `CMPM (Ay)+,(Ax)+` resumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CmpmStep {
    /// Reading through `(Ay)+`.
    Source,
    /// Reading through `(Ax)+`, with the source latched.
    Destination {
        /// The value read through `(Ay)+`.
        source: u32,
    },
    /// Flags are committed; the completion prefetch is next.
    Prefetch,
}

/// `CMPM (Ay)+,(Ax)+`: compares two memory operands, post-incrementing both
/// address registers.
pub struct Cmpm;

impl Instruction for Cmpm {
    fn execute(cpu: &mut Cpu, bus: &mut dyn SimBus, opcode: u16) {
        let size = Size::from_opcode(opcode);
        let ax = ((opcode >> 9) & 0b111) as u8;
        let ay = (opcode & 0b111) as u8;
        loop {
            match cpu.progress {
                Progress::Idle => {
                    cpu.ea.begin_mode(AddrMode::PostInc(ay), size);
                    cpu.progress = Progress::Cmpm(CmpmStep::Source);
                }
                Progress::Cmpm(CmpmStep::Source) => {
                    let source =
                        match cpu.ea.poll(&mut cpu.regs, bus, &mut cpu.ledger) {
                            Some(value) => value,
                            None => {
                                cpu.ledger.charge(WAIT_CYCLES);
                                return;
                            }
                        };
                    cpu.ea.begin_mode(AddrMode::PostInc(ax), size);
                    cpu.progress =
                        Progress::Cmpm(CmpmStep::Destination { source });
                }
                Progress::Cmpm(CmpmStep::Destination { source }) => {
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
                    cpu.progress = Progress::Cmpm(CmpmStep::Prefetch);
                }
                Progress::Cmpm(CmpmStep::Prefetch) => {
                    complete_prefetch(&mut cpu.ledger);
                    cpu.progress = Progress::Finished;
                    return;
                }
                Progress::Finished => return,
                other => panic!("CMPM resumed from {other:?}"),
            }
        }
    }

    fn render(bus: &dyn SimBus, address: u32, opcode: u16) -> Disassembly {
        let size = Size::from_opcode(opcode);
        let operands =
            format!("(A{})+,(A{})+", opcode & 0b111, (opcode >> 9) & 0b111);
        OperandStream::new(bus, address)
            .into_disassembly(format!("CMPM{size}"), operands)
    }

    fn register(
        execute: &mut [Option<Executor>],
        print: &mut [Option<Printer>],
    ) {
        for ax in 0..8 {
            for ay in 0..8 {
                for size in [Size::Byte, Size::Word, Size::Long] {
                    let opcode = 0xb108 | (ax << 9) | (size.bits() << 6) | ay;
                    execute[usize::from(opcode)] = Some(Cmpm::execute);
                    print[usize::from(opcode)] = Some(Cmpm::render);
                }
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
