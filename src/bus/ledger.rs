use std::fmt;

//===========================================================================//

/// One discrete bus activity, using the notation of the 68000 timing tables.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BusCycle {
    /// `n`: an internal cycle with no bus access.
    Idle,
    /// `np`: a program-space word fetch into the prefetch queue.
    Prefetch,
    /// `nr`: a data read of a byte or word (the low word of a long).
    Read,
    /// `nR`: a data read of the high word of a long.
    ReadHigh,
    /// `nw`: a data write of a byte or word (the low word of a long).
    Write,
    /// `nW`: a data write of the high word of a long.
    WriteHigh,
}

impl BusCycle {
    /// Returns the number of clock cycles this activity takes, without wait
    /// states.
    pub fn cycles(self) -> u32 {
        match self {
            BusCycle::Idle => 2,
            BusCycle::Prefetch
            | BusCycle::Read
            | BusCycle::ReadHigh
            | BusCycle::Write
            | BusCycle::WriteHigh => 4,
        }
    }

    /// Returns the number of ticks this activity spans when an instruction
    /// handler charges two cycles per tick while it waits.
    pub fn ticks(self) -> u32 {
        self.cycles() / 2
    }

    /// Returns the notation used for this activity in timing tables.
    pub fn notation(self) -> &'static str {
        match self {
            BusCycle::Idle => "n",
            BusCycle::Prefetch => "np",
            BusCycle::Read => "nr",
            BusCycle::ReadHigh => "nR",
            BusCycle::Write => "nw",
            BusCycle::WriteHigh => "nW",
        }
    }
}

impl fmt::Display for BusCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

//===========================================================================//

/// The running cycle count and bus-activity log shared by every part of the
/// instruction core.
///
/// Everything is additive: components charge cycles and record activities,
/// and only the scheduler clears the ledger, at an instruction boundary.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BusLedger {
    cycles: u64,
    log: Vec<BusCycle>,
}

impl BusLedger {
    /// Returns an empty ledger.
    pub fn new() -> BusLedger {
        BusLedger::default()
    }

    /// Adds the given number of clock cycles to the running total.
    pub fn charge(&mut self, cycles: u32) {
        self.cycles += u64::from(cycles);
    }

    /// Records that the fetch of the next opcode into the prefetch queue has
    /// been issued.  The caller charges the cycles for it.
    pub fn prefetch(&mut self) {
        self.record(BusCycle::Prefetch);
    }

    /// Records a bus activity.  Cycles are charged separately.
    pub fn record(&mut self, cycle: BusCycle) {
        self.log.push(cycle);
    }

    /// Returns the total number of cycles charged since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the activities recorded since the last reset, in order.
    pub fn transactions(&self) -> &[BusCycle] {
        &self.log
    }

    /// Returns the number of recorded activities of the given kind.
    pub fn count(&self, kind: BusCycle) -> usize {
        self.log.iter().filter(|&&cycle| cycle == kind).count()
    }

    /// Returns the sum of the nominal costs of the recorded activities.
    pub fn nominal_cycles(&self) -> u64 {
        self.log.iter().map(|cycle| u64::from(cycle.cycles())).sum()
    }

    /// Formats the recorded activities the way timing tables write them,
    /// e.g. `"n nR nr np n"`.
    pub fn pattern(&self) -> String {
        self.log
            .iter()
            .map(|cycle| cycle.notation())
            .collect::<Vec<&str>>()
            .join(" ")
    }

    /// Clears the cycle count and the activity log.
    pub fn reset(&mut self) {
        self.cycles = 0;
        self.log.clear();
    }
}

//===========================================================================//


//===========================================================================//
