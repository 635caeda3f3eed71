//! Facilities for simulating the memory bus and accounting for bus cycles.

mod ledger;
mod ram;

pub use ledger::{BusCycle, BusLedger};
pub use ram::RamBus;

//===========================================================================//

/// The number of address lines on the 68000's external bus.
pub const ADDRESS_BITS: u32 = 24;

/// Mask for the bits of an address that actually reach the bus.
pub const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;

//===========================================================================//

/// A simulated memory bus.
///
/// This trait uses `u32` for addresses, but the 68000 only drives 24 address
/// lines.  Implementations should ignore the higher bits, as though those
/// lines weren't connected, and should *not* panic when given an address
/// that is out of range.  Words are big-endian.
///
/// The instruction core only decides *when* a transaction happens and what
/// it costs; wait states, address decoding and device side effects belong to
/// the implementation of this trait.
pub trait SimBus {
    /// Returns a human-readable description of this simulated memory bus.
    fn description(&self) -> String;

    /// Returns the value of a single byte in memory, if the processor were to
    /// read it, but without performing any side effects that would occur if
    /// the processor actually read the byte.
    fn peek_byte(&self, addr: u32) -> u8;

    /// Reads a single byte from memory.
    ///
    /// Note that this is a `&mut self` method, since some hardware registers
    /// may have side effects when read.
    fn read_byte(&mut self, addr: u32) -> u8;

    /// Writes a single byte to memory.
    fn write_byte(&mut self, addr: u32, data: u8);

    /// Returns the big-endian word at the given address without side
    /// effects.
    fn peek_word(&self, addr: u32) -> u16 {
        let hi = self.peek_byte(addr);
        let lo = self.peek_byte(addr.wrapping_add(1));
        (u16::from(hi) << 8) | u16::from(lo)
    }

    /// Reads the big-endian word at the given address.
    fn read_word(&mut self, addr: u32) -> u16 {
        let hi = self.read_byte(addr);
        let lo = self.read_byte(addr.wrapping_add(1));
        (u16::from(hi) << 8) | u16::from(lo)
    }

    /// Writes a big-endian word at the given address.
    fn write_word(&mut self, addr: u32, data: u16) {
        self.write_byte(addr, (data >> 8) as u8);
        self.write_byte(addr.wrapping_add(1), (data & 0xff) as u8);
    }
}

//===========================================================================//


//===========================================================================//
