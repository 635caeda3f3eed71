//! A bus-cycle-accurate instruction core for the Motorola 68000.
//!
//! Instructions are resumable state machines driven one tick at a time.  Each
//! tick either completes some micro-steps or stops where it has to wait for
//! the bus, so the surrounding emulator can interleave other hardware at
//! cycle granularity.  Every cycle charged and every bus activity performed
//! is recorded in a [`bus::BusLedger`], which makes the timing of each
//! instruction observable and testable against the published tables.

#![warn(missing_docs)]

pub mod bus;
pub mod cpu;
pub mod dis;
pub mod ea;
pub mod instr;
pub mod proc;
pub mod script;
