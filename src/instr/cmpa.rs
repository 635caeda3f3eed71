use super::{
    Executor, Instruction, Printer, WAIT_CYCLES, complete_prefetch,
    internal_cycle, register_ea_forms,
};
use crate::bus::SimBus;
use crate::cpu::flags::{self, Size};
use crate::cpu::{Cpu, Progress};
use crate::dis::{Disassembly, OperandStream, format_ea};
use crate::ea::{AddrMode, EaClasses, sign_extend_word};

//===========================================================================//

/// Where a `CMPA <ea>,An` resumes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CmpaStep {
    /// Waiting for the source operand.
    Read,
    /// Flags are committed; the completion prefetch is next.
    Prefetch,
    /// The trailing internal cycle.
    Tail,
}

/// `CMPA <ea>,An`: compares against an address register.  Word sources are
/// sign-extended, and the comparison is always 32 bits wide.
pub struct Cmpa;

impl Cmpa {
    fn size(opcode: u16) -> Size {
        if opcode & 0x0100 != 0 { Size::Long } else { Size::Word }
    }
}

impl Instruction for Cmpa {
    fn execute(cpu: &mut Cpu, bus: &mut dyn SimBus, opcode: u16) {
        let size = Cmpa::size(opcode);
        let reg = usize::from((opcode >> 9) & 0b111);
        loop {
            match cpu.progress {
                Progress::Idle => {
                    cpu.ea.begin_read(opcode, size);
                    cpu.progress = Progress::Cmpa(CmpaStep::Read);
                }
                Progress::Cmpa(CmpaStep::Read) => {
                    let src =
                        match cpu.ea.poll(&mut cpu.regs, bus, &mut cpu.ledger) {
                            Some(value) => value,
                            None => {
                                cpu.ledger.charge(WAIT_CYCLES);
                                return;
                            }
                        };
                    let src = match size {
                        Size::Word => sign_extend_word(src as u16),
                        _ => src,
                    };
                    let dst = cpu.regs.a[reg];
                    cpu.regs.sr =
                        flags::compare(cpu.regs.sr, Size::Long, src, dst);
                    cpu.progress = Progress::Cmpa(CmpaStep::Prefetch);
                }
                Progress::Cmpa(CmpaStep::Prefetch) => {
                    complete_prefetch(&mut cpu.ledger);
                    cpu.progress = Progress::Cmpa(CmpaStep::Tail);
                    return;
                }
                Progress::Cmpa(CmpaStep::Tail) => {
                    internal_cycle(&mut cpu.ledger);
                    cpu.progress = Progress::Finished;
                    return;
                }
                Progress::Finished => return,
                other => panic!("CMPA resumed from {other:?}"),
            }
        }
    }

    fn render(bus: &dyn SimBus, address: u32, opcode: u16) -> Disassembly {
        let size = Cmpa::size(opcode);
        let mut stream = OperandStream::new(bus, address);
        let mode = AddrMode::from_opcode(opcode);
        let source = format_ea(mode, size, &mut stream);
        let operands = format!("{source},A{}", (opcode >> 9) & 0b111);
        stream.into_disassembly(format!("CMPA{size}"), operands)
    }

    fn register(
        execute: &mut [Option<Executor>],
        print: &mut [Option<Printer>],
    ) {
        for reg in 0..8 {
            for base in [0xb0c0, 0xb1c0] {
                register_ea_forms(
                    execute,
                    print,
                    base | (reg << 9),
                    EaClasses::NONE,
                    Cmpa::execute,
                    Cmpa::render,
                );
            }
        }
    }
}

//===========================================================================//


//===========================================================================//
