//! Grows the resident memory of the process step by step, then holds it.

use std::collections::TryReserveError;
use std::thread;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use yansi::Paint;

/// Size of one allocated block.
pub const BLOCK_SIZE: usize = 10 * 1024 * 1024;

/// Pause between two allocations.
pub const ALLOCATION_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum sleep between two checks of the clock while holding memory.
pub const HOLD_TICK: Duration = Duration::from_secs(1);

/// What a finished memory stress run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryReport {
    /// Number of blocks that were held until the deadline.
    pub blocks: usize,
    /// Total size of all held blocks in bytes.
    pub bytes: u64,
    /// Whether allocation stopped early because the host refused more memory.
    pub exhausted: bool,
    /// Wall-clock time from start until the blocks were released.
    pub elapsed: Duration,
}

/// Allocates memory in fixed-size blocks at a fixed cadence.
///
/// The run has two phases that share one deadline. During the allocation phase, a block is
/// allocated, filled, and kept every [`interval`](Self::interval). If an allocation is refused,
/// the phase ends early. During the hold phase, all blocks stay alive until the deadline. Then
/// they are released at once.
#[derive(Clone, Copy, Debug)]
pub struct MemoryStress {
    block_size: usize,
    interval: Duration,
    hold_tick: Duration,
}

impl Default for MemoryStress {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            interval: ALLOCATION_INTERVAL,
            hold_tick: HOLD_TICK,
        }
    }
}

impl MemoryStress {
    /// The size of each allocated block in bytes.
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// The pause after each allocation.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The longest sleep between clock checks while holding.
    pub fn hold_tick(mut self, hold_tick: Duration) -> Self {
        self.hold_tick = hold_tick;
        self
    }

    /// Runs the stress test on the calling thread for `duration`.
    ///
    /// A duration too long to represent as a deadline holds the memory indefinitely.
    pub fn run(&self, duration: Duration) -> MemoryReport {
        let start = Instant::now();
        let deadline = crate::deadline(start, duration);

        let mut blocks = Vec::new();
        let mut exhausted = false;

        while !crate::expired(deadline) {
            if let Err(err) = allocate_block(&mut blocks, self.block_size) {
                println!("{}", "Memory limit reached during stress test.".yellow());
                println!("  {err}");
                exhausted = true;
                break;
            }

            let total = ByteSize::b((blocks.len() * self.block_size) as u64);
            println!("Allocated ~{} so far...", total.bold());

            thread::sleep(self.interval);
        }

        println!();
        println!("Holding allocated memory until duration completes...");
        loop {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => self.hold_tick,
            };
            if remaining.is_zero() {
                break;
            }
            thread::sleep(self.hold_tick.min(remaining));
        }

        let report = MemoryReport {
            blocks: blocks.len(),
            bytes: (blocks.len() * self.block_size) as u64,
            exhausted,
            elapsed: start.elapsed(),
        };

        drop(blocks);
        report
    }
}

/// Allocates one block filled with spaces and appends it to `blocks`.
///
/// Filling the block makes its pages resident, so the memory actually shows up in monitoring.
/// Both reservations are fallible, which turns a refused allocation into an error instead of an
/// abort.
fn allocate_block(blocks: &mut Vec<Vec<u8>>, size: usize) -> Result<(), TryReserveError> {
    blocks.try_reserve(1)?;

    let mut block = Vec::new();
    block.try_reserve_exact(size)?;
    block.resize(size, b' ');

    blocks.push(block);
    Ok(())
}
