use super::{ADDRESS_MASK, SimBus};
use byteorder::{BigEndian, ByteOrder};

//===========================================================================//

/// A simulated RAM bus.  Reads beyond the RAM size will be mirrored.
pub struct RamBus {
    ram: Box<[u8]>,
}

impl RamBus {
    /// Returns a new simulated RAM bus using the given byte array as the
    /// contents of RAM.  Panics if the length of the byte array is not a power
    /// of 2.
    pub fn new(ram: Box<[u8]>) -> RamBus {
        assert!(ram.len().is_power_of_two());
        assert!(ram.len() >= 2);
        RamBus { ram }
    }

    /// Returns a new simulated RAM bus of `1 << addr_bits` zeroed bytes.
    pub fn with_address_bits(addr_bits: u32) -> RamBus {
        RamBus::new(vec![0u8; 1 << addr_bits].into_boxed_slice())
    }

    /// Returns the raw contents of RAM.
    pub fn as_slice(&self) -> &[u8] {
        &self.ram
    }

    fn index(&self, addr: u32) -> usize {
        ((addr & ADDRESS_MASK) as usize) & (self.ram.len() - 1)
    }
}

impl SimBus for RamBus {
    fn description(&self) -> String {
        let size = self.ram.len();
        if size < 1024 {
            format!("{size}B RAM")
        } else if size < 1024 * 1024 {
            format!("{}kB RAM", size >> 10)
        } else {
            format!("{}MB RAM", size >> 20)
        }
    }

    fn peek_byte(&self, addr: u32) -> u8 {
        self.ram[self.index(addr)]
    }

    fn read_byte(&mut self, addr: u32) -> u8 {
        self.peek_byte(addr)
    }

    fn write_byte(&mut self, addr: u32, data: u8) {
        let index = self.index(addr);
        self.ram[index] = data;
    }

    fn peek_word(&self, addr: u32) -> u16 {
        let index = self.index(addr);
        if index + 1 < self.ram.len() {
            BigEndian::read_u16(&self.ram[index..])
        } else {
            // The low byte wraps around to the start of the mirror.
            (u16::from(self.ram[index]) << 8) | u16::from(self.ram[0])
        }
    }

    fn read_word(&mut self, addr: u32) -> u16 {
        self.peek_word(addr)
    }

    fn write_word(&mut self, addr: u32, data: u16) {
        let index = self.index(addr);
        if index + 1 < self.ram.len() {
            BigEndian::write_u16(&mut self.ram[index..], data);
        } else {
            self.ram[index] = (data >> 8) as u8;
            self.ram[0] = (data & 0xff) as u8;
        }
    }
}

//===========================================================================//


//===========================================================================//
