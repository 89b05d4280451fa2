//! Cycle-by-cycle textual scoreboard.
//!
//! The view never influences execution; it observes committed state through
//! the cycle hook and formats it for a human following along. Rendering is
//! separated from printing so tests can assert on the text.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use assembler::parser::REGISTER_ALIASES;
use sim_core::{CycleSnapshot, Observer, WORD_BYTES};

const SEPARATOR_WIDTH: usize = 78;
const REGISTERS_PER_ROW: u8 = 4;

/// Prints a scoreboard of PC, registers, a leading memory window, and
/// statistics after every cycle.
pub struct TextView {
    mem_dump_words: usize,
}

impl TextView {
    /// Memory words shown when the caller has no preference.
    pub const DEFAULT_MEM_DUMP_WORDS: usize = 32;

    /// Creates a view that dumps the first `mem_dump_words` words of memory.
    #[must_use]
    pub const fn new(mem_dump_words: usize) -> Self {
        Self { mem_dump_words }
    }

    fn dump_registers(out: &mut String, snapshot: &CycleSnapshot<'_>) {
        for index in 0u8..32 {
            if index % REGISTERS_PER_ROW == 0 {
                if index != 0 {
                    out.push('\n');
                }
            } else {
                out.push_str("  ");
            }
            let name = REGISTER_ALIASES[usize::from(index)];
            let value = snapshot.registers.read(index);
            let _ = write!(out, "{name:<5}={value:>#10x}");
        }
        out.push('\n');
    }

    fn dump_memory(&self, out: &mut String, snapshot: &CycleSnapshot<'_>) {
        let limit = (self.mem_dump_words * WORD_BYTES as usize).min(snapshot.memory.size());
        let mut addr = 0u32;
        while (addr as usize) < limit {
            if let Ok(word) = snapshot.memory.read_word(addr) {
                let _ = writeln!(out, "{addr:08x}: {word:08x}");
            }
            addr = addr.wrapping_add(WORD_BYTES);
        }
    }

    /// Formats one committed cycle as scoreboard text.
    #[must_use]
    pub fn render(&self, snapshot: &CycleSnapshot<'_>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(
            out,
            "Cycle {:>6} | PC=0x{:08X} | {:?}",
            snapshot.stats.cycles(),
            snapshot.pc,
            snapshot.run_state
        );
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(out, "Registers:");
        Self::dump_registers(&mut out, snapshot);
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let limit = (self.mem_dump_words * WORD_BYTES as usize).min(snapshot.memory.size());
        let _ = writeln!(out, "Memory [0 .. {limit}):");
        self.dump_memory(&mut out, snapshot);
        let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
        let _ = writeln!(out, "Stats:");
        let _ = writeln!(
            out,
            "  cycles={}  instruction_fetches={}  data_reads={}  data_writes={}",
            snapshot.stats.cycles(),
            snapshot.stats.instruction_fetches(),
            snapshot.stats.data_reads(),
            snapshot.stats.data_writes()
        );
        let _ = writeln!(out, "  alu_ops={{ {} }}", format_counts(snapshot.stats.alu_ops()));
        let _ = writeln!(out, "  retired={{ {} }}", format_counts(snapshot.stats.retired()));
        let _ = writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH));
        out
    }
}

impl Default for TextView {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MEM_DUMP_WORDS)
    }
}

impl Observer for TextView {
    fn on_cycle_complete(&mut self, snapshot: &CycleSnapshot<'_>) {
        print!("{}", self.render(snapshot));
    }
}

fn format_counts(map: &BTreeMap<String, u64>) -> String {
    if map.is_empty() {
        return "(none)".to_owned();
    }
    map.iter()
        .map(|(name, count)| format!("{name}:{count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
