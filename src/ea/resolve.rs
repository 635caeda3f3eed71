use super::AddrMode;
use crate::bus::{BusCycle, BusLedger, SimBus};
use crate::cpu::Registers;
use crate::cpu::flags::Size;

//===========================================================================//

/// Drives the bus pattern of one operand fetch, one tick at a time.
///
/// An instruction handler starts a resolution with [`EaResolver::begin_read`]
/// (or [`EaResolver::begin_mode`]) and then calls [`EaResolver::poll`] once
/// per tick, charging two cycles to the ledger each time the poll comes back
/// empty.  Each bus item in the mode's pattern therefore spans
/// `cycles / 2` polls, and its tag is recorded on the first of them.
#[derive(Clone, Debug, Default)]
pub struct EaResolver {
    state: Option<Resolution>,
}

#[derive(Clone, Debug)]
struct Resolution {
    mode: AddrMode,
    size: Size,
    pattern: &'static [BusCycle],
    item: usize,
    elapsed: u32,
    started: bool,
    ext: [u16; 2],
    ext_count: usize,
    ext_base: u32,
    addr: Option<u32>,
    value: u32,
}

impl EaResolver {
    /// Returns an idle resolver.
    pub fn new() -> EaResolver {
        EaResolver::default()
    }

    /// Starts resolving the operand whose addressing mode is encoded in the
    /// low six bits of `opcode`.  Panics on the reserved encodings, which the
    /// dispatch table never routes to a handler.
    pub fn begin_read(&mut self, opcode: u16, size: Size) {
        self.begin_mode(AddrMode::from_opcode(opcode), size);
    }

    /// Starts resolving an operand through an explicitly chosen mode.
    pub fn begin_mode(&mut self, mode: AddrMode, size: Size) {
        assert!(
            self.state.is_none(),
            "operand resolution started while another was in progress"
        );
        self.state = Some(Resolution {
            mode,
            size,
            pattern: mode.bus_pattern(size),
            item: 0,
            elapsed: 0,
            started: false,
            ext: [0; 2],
            ext_count: 0,
            ext_base: 0,
            addr: None,
            value: 0,
        });
    }

    /// Returns true if a resolution has begun and not yet produced its value.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Advances the resolution by one tick.  Returns the operand, masked to
    /// the operation width, on the tick after the last bus item completes
    /// (immediately, for register-direct modes).  Panics if no resolution is
    /// in progress.
    pub fn poll(
        &mut self,
        regs: &mut Registers,
        bus: &mut dyn SimBus,
        ledger: &mut BusLedger,
    ) -> Option<u32> {
        let res = match self.state.as_mut() {
            Some(res) => res,
            None => panic!("polled an operand resolver with nothing to do"),
        };
        if !res.started {
            res.start(regs);
        }
        if let Some(&cycle) = res.pattern.get(res.item) {
            if res.elapsed == 0 {
                ledger.record(cycle);
                res.perform(cycle, regs, bus);
            }
            res.elapsed += 1;
            if res.elapsed == cycle.ticks() {
                res.item += 1;
                res.elapsed = 0;
            }
            return None;
        }
        let value = res.finish(regs);
        self.state = None;
        Some(value)
    }
}

//===========================================================================//

impl Resolution {
    /// The amount `(An)+` and `-(An)` move the register by.  Byte accesses
    /// through A7 move it by two to keep the stack word-aligned.
    fn step(&self, reg: u8) -> u32 {
        if self.size == Size::Byte && reg == 7 { 2 } else { self.size.bytes() }
    }

    fn start(&mut self, regs: &mut Registers) {
        self.started = true;
        match self.mode {
            AddrMode::Indirect(r) => {
                self.addr = Some(regs.a[usize::from(r)]);
            }
            AddrMode::PostInc(r) => {
                let index = usize::from(r);
                self.addr = Some(regs.a[index]);
                regs.a[index] = regs.a[index].wrapping_add(self.step(r));
            }
            _ => {}
        }
    }

    fn perform(
        &mut self,
        cycle: BusCycle,
        regs: &mut Registers,
        bus: &mut dyn SimBus,
    ) {
        match cycle {
            BusCycle::Idle => {
                if let AddrMode::PreDec(r) = self.mode {
                    let index = usize::from(r);
                    regs.a[index] = regs.a[index].wrapping_sub(self.step(r));
                    self.addr = Some(regs.a[index]);
                }
            }
            BusCycle::Prefetch => {
                if self.ext_count == 0 {
                    self.ext_base = regs.pc;
                }
                self.ext[self.ext_count] = bus.read_word(regs.pc);
                self.ext_count += 1;
                regs.pc = regs.pc.wrapping_add(2);
            }
            BusCycle::ReadHigh => {
                let addr = self.address(regs);
                self.value = u32::from(bus.read_word(addr)) << 16;
            }
            BusCycle::Read => {
                let addr = self.address(regs);
                self.value = match self.size {
                    Size::Byte => u32::from(bus.read_byte(addr)),
                    Size::Word => u32::from(bus.read_word(addr)),
                    Size::Long => {
                        self.value
                            | u32::from(bus.read_word(addr.wrapping_add(2)))
                    }
                };
            }
            BusCycle::Write | BusCycle::WriteHigh => {
                panic!("operand read pattern contains a write ({cycle})")
            }
        }
    }

    /// Returns the effective address, computing it from the extension words
    /// on first use.
    fn address(&mut self, regs: &Registers) -> u32 {
        if let Some(addr) = self.addr {
            return addr;
        }
        let addr = match self.mode {
            AddrMode::Disp(r) => regs.a[usize::from(r)]
                .wrapping_add(sign_extend_word(self.ext[0])),
            AddrMode::Index(r) => regs.a[usize::from(r)]
                .wrapping_add(brief_extension_offset(self.ext[0], regs)),
            AddrMode::AbsShort => sign_extend_word(self.ext[0]),
            AddrMode::AbsLong => {
                (u32::from(self.ext[0]) << 16) | u32::from(self.ext[1])
            }
            AddrMode::PcDisp => {
                self.ext_base.wrapping_add(sign_extend_word(self.ext[0]))
            }
            AddrMode::PcIndex => self
                .ext_base
                .wrapping_add(brief_extension_offset(self.ext[0], regs)),
            mode => panic!("{mode:?} has no memory operand"),
        };
        self.addr = Some(addr);
        addr
    }

    fn finish(&self, regs: &Registers) -> u32 {
        let value = match self.mode {
            AddrMode::DataReg(r) => regs.d[usize::from(r)],
            AddrMode::AddrReg(r) => regs.a[usize::from(r)],
            AddrMode::Immediate => match self.size {
                Size::Byte | Size::Word => u32::from(self.ext[0]),
                Size::Long => {
                    (u32::from(self.ext[0]) << 16) | u32::from(self.ext[1])
                }
            },
            _ => self.value,
        };
        value & self.size.mask()
    }
}

//===========================================================================//

/// Sign-extends a 16-bit value to 32 bits.
pub(crate) fn sign_extend_word(word: u16) -> u32 {
    word as i16 as i32 as u32
}

/// Returns the offset encoded by a brief extension word: its signed 8-bit
/// displacement plus the selected index register.
fn brief_extension_offset(ext: u16, regs: &Registers) -> u32 {
    let reg = usize::from((ext >> 12) & 0b111);
    let raw = if ext & 0x8000 != 0 { regs.a[reg] } else { regs.d[reg] };
    let index =
        if ext & 0x0800 != 0 { raw } else { sign_extend_word(raw as u16) };
    let disp = (ext & 0xff) as u8 as i8 as i32 as u32;
    index.wrapping_add(disp)
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{EaResolver, brief_extension_offset, sign_extend_word};
    use crate::bus::{BusLedger, RamBus, SimBus};
    use crate::cpu::Registers;
    use crate::cpu::flags::Size;
    use crate::ea::AddrMode;

    /// Polls until the resolver hands back a value, charging two cycles per
    /// empty poll the way instruction handlers do.
    fn resolve(
        resolver: &mut EaResolver,
        regs: &mut Registers,
        bus: &mut RamBus,
        ledger: &mut BusLedger,
    ) -> (u32, u32) {
        let mut polls = 0;
        loop {
            polls += 1;
            assert!(polls < 32, "resolution never completed");
            match resolver.poll(regs, bus, ledger) {
                Some(value) => return (value, polls),
                None => ledger.charge(2),
            }
        }
    }

    #[test]
    fn register_direct_resolves_on_first_poll() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.d[2] = 0x1234_5678;
        let mut bus = RamBus::with_address_bits(8);
        let mut ledger = BusLedger::new();
        resolver.begin_read(0xb002, Size::Word);
        assert!(resolver.is_active());
        let (value, polls) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!((value, polls), (0x5678, 1));
        assert!(!resolver.is_active());
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn post_increment_byte_through_a7_steps_by_two() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.a[7] = 0x40;
        let mut bus = RamBus::with_address_bits(8);
        bus.write_byte(0x40, 0x9a);
        let mut ledger = BusLedger::new();
        resolver.begin_mode(AddrMode::PostInc(7), Size::Byte);
        let (value, polls) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0x9a);
        assert_eq!(polls, 3);
        assert_eq!(regs.a[7], 0x42);
        assert_eq!(ledger.pattern(), "nr");
        assert_eq!(ledger.cycles(), 4);
    }

    #[test]
    fn pre_decrement_byte_through_a7_steps_by_two() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.a[7] = 0x1000;
        let mut bus = RamBus::with_address_bits(16);
        bus.write_byte(0x0ffe, 0x42);
        let mut ledger = BusLedger::new();
        resolver.begin_mode(AddrMode::PreDec(7), Size::Byte);
        let (value, polls) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0x42);
        assert_eq!(polls, 4);
        assert_eq!(regs.a[7], 0x0ffe);
        assert_eq!(ledger.pattern(), "n nr");
        assert_eq!(ledger.cycles(), 6);
    }

    #[test]
    fn pre_decrement_long() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.a[0] = 0x1000;
        let mut bus = RamBus::with_address_bits(16);
        bus.write_word(0x0ffc, 0xdead);
        bus.write_word(0x0ffe, 0xbeef);
        let mut ledger = BusLedger::new();
        resolver.begin_mode(AddrMode::PreDec(0), Size::Long);
        let (value, _) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0xdead_beef);
        assert_eq!(regs.a[0], 0x0ffc);
        assert_eq!(ledger.pattern(), "n nR nr");
        assert_eq!(ledger.cycles(), 10);
    }

    #[test]
    fn displacement_consumes_extension_word() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.a[1] = 0x0200;
        regs.pc = 0x0102;
        let mut bus = RamBus::with_address_bits(16);
        bus.write_word(0x0102, 0xfff0);
        bus.write_word(0x01f0, 0x4321);
        let mut ledger = BusLedger::new();
        resolver.begin_mode(AddrMode::Disp(1), Size::Word);
        let (value, _) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0x4321);
        assert_eq!(regs.pc, 0x0104);
        assert_eq!(ledger.pattern(), "np nr");
        assert_eq!(ledger.cycles(), 8);
    }

    #[test]
    fn pc_relative_index_uses_extension_address() {
        let mut resolver = EaResolver::new();
        let mut regs = Registers::default();
        regs.pc = 0x0102;
        regs.d[3] = 0xffff_0006;
        let mut bus = RamBus::with_address_bits(16);
        // (4,PC,D3.W): base $0102 + 4 + 6.
        bus.write_word(0x0102, 0x3004);
        bus.write_byte(0x010c, 0x77);
        let mut ledger = BusLedger::new();
        resolver.begin_mode(AddrMode::PcIndex, Size::Byte);
        let (value, _) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0x77);
        assert_eq!(ledger.pattern(), "n np nr");
        assert_eq!(ledger.cycles(), 10);
    }

    #[test]
    fn absolute_long_and_immediate() {
        let mut regs = Registers::default();
        let mut bus = RamBus::with_address_bits(16);
        bus.write_word(0x0000, 0x0000);
        bus.write_word(0x0002, 0x2000);
        bus.write_word(0x0004, 0x1122);
        bus.write_word(0x0006, 0x3344);
        bus.write_word(0x2000, 0xaabb);
        let mut ledger = BusLedger::new();
        let mut resolver = EaResolver::new();
        resolver.begin_mode(AddrMode::AbsLong, Size::Word);
        let (value, _) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0xaabb);
        resolver.begin_mode(AddrMode::Immediate, Size::Long);
        let (value, _) =
            resolve(&mut resolver, &mut regs, &mut bus, &mut ledger);
        assert_eq!(value, 0x1122_3344);
        assert_eq!(regs.pc, 8);
        assert_eq!(ledger.pattern(), "np np nr np np");
        assert_eq!(ledger.cycles(), 20);
        assert_eq!(ledger.cycles(), ledger.nominal_cycles());
    }

    #[test]
    fn brief_extension_words() {
        let mut regs = Registers::default();
        regs.a[2] = 0x8000_0000;
        regs.d[1] = 0x0001_fffe;
        // $10(An,A2.L)
        assert_eq!(brief_extension_offset(0xa810, &regs), 0x8000_0010);
        // -$2(An,D1.W)
        assert_eq!(brief_extension_offset(0x10fe, &regs), 0xffff_fffc);
        assert_eq!(sign_extend_word(0x8000), 0xffff_8000);
    }

    #[test]
    #[should_panic(expected = "unsupported addressing mode")]
    fn reserved_mode_panics() {
        EaResolver::new().begin_read(0x003d, Size::Word);
    }

    #[test]
    #[should_panic(expected = "nothing to do")]
    fn polling_idle_resolver_panics() {
        let mut regs = Registers::default();
        let mut bus = RamBus::with_address_bits(4);
        let mut ledger = BusLedger::new();
        EaResolver::new().poll(&mut regs, &mut bus, &mut ledger);
    }
}

//===========================================================================//
