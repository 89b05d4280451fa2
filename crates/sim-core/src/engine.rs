//! Single-cycle fetch-decode-execute-writeback engine.
//!
//! One `step` performs the full cycle: fetch the word at PC, decode it,
//! dispatch on the decoded form, commit register/memory effects and
//! statistics, advance PC, and notify observers. Faults abort the step
//! before any register write or statistics update for the faulting
//! instruction, leaving the engine in its pre-fault running state.

use crate::alu::{self, AluOp};
use crate::fault::Fault;
use crate::isa::{self, ImmediateOp, Instruction};
use crate::memory::Memory;
use crate::registers::RegisterFile;
use crate::stats::Statistics;

/// Bytes per instruction word; PC advances by this amount per cycle.
pub const WORD_BYTES: u32 = 4;

/// Engine execution state. `Halted` is terminal; only the halt sentinel
/// enters it and no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Halt sentinel retired; `step` is a no-op from here on.
    Halted,
}

/// Program-counter outcome of executing one instruction.
///
/// `execute` returns this instead of mutating PC through a side channel, so
/// control-flow decisions stay explicit and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPc {
    /// Fall through to PC + 4.
    Sequential,
    /// Override PC with a branch or jump target.
    Jump(u32),
}

/// Read-only view of engine state handed to observers after each cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleSnapshot<'a> {
    /// Program counter after the cycle committed.
    pub pc: u32,
    /// Execution state after the cycle committed.
    pub run_state: RunState,
    /// Register file contents.
    pub registers: &'a RegisterFile,
    /// Memory contents.
    pub memory: &'a Memory,
    /// Statistics including the cycle just completed.
    pub stats: &'a Statistics,
}

/// Callback interface notified once per completed cycle, including the
/// cycle that retires halt. Observers see fully committed state and must
/// not assume they are the only observer.
pub trait Observer {
    /// Called after all state mutation for a cycle is committed.
    fn on_cycle_complete(&mut self, snapshot: &CycleSnapshot<'_>);
}

/// Single-cycle execution engine owning the datapath state.
pub struct Engine {
    memory: Memory,
    registers: RegisterFile,
    stats: Statistics,
    pc: u32,
    run_state: RunState,
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("pc", &self.pc)
            .field("run_state", &self.run_state)
            .field("memory_bytes", &self.memory.size())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_memory(Memory::default())
    }
}

impl Engine {
    /// Creates an engine with a zeroed store of `memory_bytes` bytes,
    /// PC at zero, and state `Running`.
    #[must_use]
    pub fn new(memory_bytes: usize) -> Self {
        Self::with_memory(Memory::new(memory_bytes))
    }

    /// Creates an engine around an existing memory image.
    #[must_use]
    pub fn with_memory(memory: Memory) -> Self {
        Self {
            memory,
            registers: RegisterFile::new(),
            stats: Statistics::new(),
            pc: 0,
            run_state: RunState::Running,
            observers: Vec::new(),
        }
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Repositions the program counter, e.g. after loading at a base address.
    pub const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    /// Current execution state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Register file, read-only.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Register file, writable for program setup.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Memory, read-only.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Memory, writable for program setup.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Statistics accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Registers an observer; notification order is insertion order.
    pub fn attach(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Writes `words` into memory contiguously starting at `base_address`.
    ///
    /// # Errors
    ///
    /// Returns the memory fault for the first word that cannot be written;
    /// words before the faulting one stay written.
    pub fn load(&mut self, words: &[u32], base_address: u32) -> Result<(), Fault> {
        let mut addr = base_address;
        for &word in words {
            self.memory.write_word(addr, word)?;
            addr = addr.wrapping_add(WORD_BYTES);
        }
        Ok(())
    }

    /// Executes one full cycle; a no-op once halted.
    ///
    /// Statistics and register effects for an instruction commit only after
    /// every fault point for that instruction has passed: a faulting fetch
    /// does not count as a fetch, and a faulting load/store tallies neither
    /// its address-computation add nor a data access.
    ///
    /// # Errors
    ///
    /// Propagates memory faults from fetch or load/store, and
    /// [`Fault::UnknownOpcode`] / [`Fault::UnknownFunct`] for decoded forms
    /// outside the supported set. PC is not advanced on a fault.
    pub fn step(&mut self) -> Result<(), Fault> {
        if matches!(self.run_state, RunState::Halted) {
            return Ok(());
        }

        let word = self.memory.read_word(self.pc)?;
        self.stats.record_instruction_fetch();
        let decoded = isa::decode(word);

        if matches!(decoded, Instruction::Halt) {
            self.run_state = RunState::Halted;
            self.stats.record_retired("halt");
            self.stats.record_cycle();
            self.notify();
            return Ok(());
        }

        let next_pc = self.execute(&decoded)?;
        self.stats.record_retired(decoded.mnemonic());
        self.stats.record_cycle();
        self.pc = match next_pc {
            NextPc::Sequential => self.pc.wrapping_add(WORD_BYTES),
            NextPc::Jump(target) => target,
        };
        self.notify();
        Ok(())
    }

    /// Steps until halt, a fault, or an optional cycle cap.
    ///
    /// Returns the number of `step` calls performed. External pacing such as
    /// interactive prompting belongs to the driver, not here.
    ///
    /// # Errors
    ///
    /// Propagates the first fault raised by `step`.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<u64, Fault> {
        let mut steps = 0;
        while matches!(self.run_state, RunState::Running) {
            if max_cycles.is_some_and(|cap| steps >= cap) {
                break;
            }
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Dispatches one decoded instruction, committing its register/memory
    /// effects and statistics, and returns the PC outcome.
    ///
    /// ALU usage is attributed to the underlying operation: load/store
    /// address computation counts as an add, the branch comparison as a sub.
    fn execute(&mut self, decoded: &Instruction) -> Result<NextPc, Fault> {
        match *decoded {
            Instruction::Register {
                op: Some(op),
                rs,
                rt,
                rd,
                ..
            } => {
                let result = op
                    .alu_op()
                    .apply(self.registers.read(rs), self.registers.read(rt));
                self.registers.write(rd, result);
                self.stats.record_alu_op(op.alu_op());
                Ok(NextPc::Sequential)
            }
            Instruction::Register { op: None, funct, .. } => Err(Fault::UnknownFunct { funct }),
            Instruction::Immediate { op, rs, rt, imm } => self.execute_immediate(op, rs, rt, imm),
            Instruction::Jump { target } => Ok(NextPc::Jump(
                (self.pc.wrapping_add(WORD_BYTES) & 0xF000_0000) | (target << 2),
            )),
            // The halt sentinel retires in `step` before dispatch.
            Instruction::Halt => Ok(NextPc::Sequential),
            Instruction::Unknown { opcode } => Err(Fault::UnknownOpcode { opcode }),
        }
    }

    fn execute_immediate(
        &mut self,
        op: ImmediateOp,
        rs: u8,
        rt: u8,
        imm: i32,
    ) -> Result<NextPc, Fault> {
        match op {
            ImmediateOp::Addi => {
                let value = alu::add(self.registers.read(rs), imm as u32);
                self.registers.write(rt, value);
                self.stats.record_alu_op(AluOp::Add);
                Ok(NextPc::Sequential)
            }
            ImmediateOp::Lw => {
                let addr = alu::add(self.registers.read(rs), imm as u32);
                let value = self.memory.read_word(addr)?;
                self.stats.record_alu_op(AluOp::Add);
                self.stats.record_data_read();
                self.registers.write(rt, value);
                Ok(NextPc::Sequential)
            }
            ImmediateOp::Sw => {
                let addr = alu::add(self.registers.read(rs), imm as u32);
                self.memory.write_word(addr, self.registers.read(rt))?;
                self.stats.record_alu_op(AluOp::Add);
                self.stats.record_data_write();
                Ok(NextPc::Sequential)
            }
            ImmediateOp::Beq => {
                let diff = alu::sub(self.registers.read(rs), self.registers.read(rt));
                self.stats.record_alu_op(AluOp::Sub);
                if diff == 0 {
                    let offset = (imm << 2) as u32;
                    Ok(NextPc::Jump(
                        self.pc.wrapping_add(WORD_BYTES).wrapping_add(offset),
                    ))
                } else {
                    Ok(NextPc::Sequential)
                }
            }
        }
    }

    /// Notifies observers in insertion order with fully committed state.
    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        // Observers are moved out for the duration of the call so the
        // snapshot can borrow the rest of the engine immutably.
        let mut observers = std::mem::take(&mut self.observers);
        let snapshot = CycleSnapshot {
            pc: self.pc,
            run_state: self.run_state,
            registers: &self.registers,
            memory: &self.memory,
            stats: &self.stats,
        };
        for observer in &mut observers {
            observer.on_cycle_complete(&snapshot);
        }
        self.observers = observers;
    }
}

#[cfg(test)]
mod tests {
    use super::{CycleSnapshot, Engine, NextPc, Observer, RunState};
    use crate::fault::Fault;
    use crate::isa::{
        encode_immediate, encode_jump, encode_register, FUNCT_ADD, HALT_WORD, OP_ADDI, OP_BEQ,
        OP_J, OP_LW,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn next_pc_variants_compare_by_target() {
        assert_eq!(NextPc::Jump(8), NextPc::Jump(8));
        assert_ne!(NextPc::Sequential, NextPc::Jump(4));
    }

    #[test]
    fn step_is_a_no_op_once_halted() {
        let mut engine = Engine::new(64);
        engine.load(&[HALT_WORD], 0).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.run_state(), RunState::Halted);
        let cycles = engine.stats().cycles();
        engine.step().unwrap();
        assert_eq!(engine.stats().cycles(), cycles);
        assert_eq!(engine.pc(), 0);
    }

    #[test]
    fn unknown_funct_faults_at_execute_time_without_advancing_pc() {
        let mut engine = Engine::new(64);
        engine
            .load(&[encode_register(1, 2, 3, 0, 0x3F)], 0)
            .unwrap();
        assert_eq!(engine.step(), Err(Fault::UnknownFunct { funct: 0x3F }));
        assert_eq!(engine.pc(), 0);
        assert_eq!(engine.run_state(), RunState::Running);
        // The fetch succeeded; nothing after it committed.
        assert_eq!(engine.stats().instruction_fetches(), 1);
        assert_eq!(engine.stats().cycles(), 0);
    }

    #[test]
    fn unknown_opcode_faults_at_execute_time() {
        let mut engine = Engine::new(64);
        engine.load(&[encode_immediate(0x3E, 0, 0, 0)], 0).unwrap();
        assert_eq!(engine.step(), Err(Fault::UnknownOpcode { opcode: 0x3E }));
    }

    #[test]
    fn faulting_load_commits_no_register_or_statistics_effects() {
        let mut engine = Engine::new(64);
        // lw $t1, 0x100($zero) targets past the 64-byte store.
        engine
            .load(&[encode_immediate(OP_LW, 0, 9, 0x100)], 0)
            .unwrap();
        engine.registers_mut().write(9, 0xAAAA_AAAA);

        assert_eq!(
            engine.step(),
            Err(Fault::OutOfBoundsAccess {
                addr: 0x100,
                size: 64,
            })
        );
        assert_eq!(engine.registers().read(9), 0xAAAA_AAAA);
        assert_eq!(engine.stats().data_reads(), 0);
        assert!(engine.stats().alu_ops().is_empty());
        assert_eq!(engine.pc(), 0);
    }

    #[test]
    fn branch_equal_taken_and_not_taken_targets() {
        let mut engine = Engine::new(1024);
        engine.set_pc(0x100);
        engine
            .load(&[encode_immediate(OP_BEQ, 1, 2, 4)], 0x100)
            .unwrap();

        // Equal registers: next PC = 0x100 + 4 + (4 << 2).
        engine.step().unwrap();
        assert_eq!(engine.pc(), 0x114);

        let mut engine = Engine::new(1024);
        engine.set_pc(0x100);
        engine
            .load(&[encode_immediate(OP_BEQ, 1, 2, 4)], 0x100)
            .unwrap();
        engine.registers_mut().write(2, 1);
        engine.step().unwrap();
        assert_eq!(engine.pc(), 0x104);
    }

    #[test]
    fn jump_combines_high_pc_bits_with_shifted_target() {
        let mut engine = Engine::new(1024);
        engine.set_pc(0x200);
        engine.load(&[encode_jump(OP_J, 0x10)], 0x200).unwrap();
        engine.step().unwrap();
        assert_eq!(engine.pc(), 0x40);
    }

    #[test]
    fn load_faults_when_words_run_past_memory() {
        let mut engine = Engine::new(8);
        assert_eq!(
            engine.load(&[1, 2, 3], 0),
            Err(Fault::OutOfBoundsAccess { addr: 8, size: 8 })
        );
        // The in-bounds prefix stays written.
        assert_eq!(engine.memory().read_word(0), Ok(1));
        assert_eq!(engine.memory().read_word(4), Ok(2));
    }

    #[derive(Default)]
    struct CycleLog {
        pcs: Vec<u32>,
        final_state: Option<RunState>,
    }

    struct LogObserver {
        log: Rc<RefCell<CycleLog>>,
        tag: u32,
        order: Rc<RefCell<Vec<u32>>>,
    }

    impl Observer for LogObserver {
        fn on_cycle_complete(&mut self, snapshot: &CycleSnapshot<'_>) {
            self.order.borrow_mut().push(self.tag);
            let mut log = self.log.borrow_mut();
            log.pcs.push(snapshot.pc);
            log.final_state = Some(snapshot.run_state);
        }
    }

    #[test]
    fn observers_run_in_insertion_order_after_each_cycle_including_halt() {
        let log = Rc::new(RefCell::new(CycleLog::default()));
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut engine = Engine::new(64);
        engine
            .load(&[encode_immediate(OP_ADDI, 0, 8, 5), HALT_WORD], 0)
            .unwrap();
        engine.attach(Box::new(LogObserver {
            log: Rc::clone(&log),
            tag: 1,
            order: Rc::clone(&order),
        }));
        engine.attach(Box::new(LogObserver {
            log: Rc::clone(&log),
            tag: 2,
            order: Rc::clone(&order),
        }));

        engine.run(None).unwrap();

        // Two cycles, two observers each, insertion order preserved.
        assert_eq!(*order.borrow(), vec![1, 2, 1, 2]);
        let log = log.borrow();
        assert_eq!(log.pcs, vec![4, 4, 4, 4]);
        assert_eq!(log.final_state, Some(RunState::Halted));
    }

    #[test]
    fn run_respects_the_cycle_cap() {
        let mut engine = Engine::new(64);
        // addi loop with no halt in range; the cap is the only stop.
        engine
            .load(
                &[
                    encode_immediate(OP_ADDI, 8, 8, 1),
                    encode_immediate(OP_ADDI, 8, 8, 1),
                    encode_immediate(OP_ADDI, 8, 8, 1),
                    HALT_WORD,
                ],
                0,
            )
            .unwrap();
        let steps = engine.run(Some(2)).unwrap();
        assert_eq!(steps, 2);
        assert_eq!(engine.run_state(), RunState::Running);
        assert_eq!(engine.registers().read(8), 2);
    }

    #[test]
    fn register_zero_stays_zero_through_writeback() {
        let mut engine = Engine::new(64);
        engine
            .load(
                &[
                    encode_immediate(OP_ADDI, 0, 0, 123), // addi $zero, $zero, 123
                    encode_register(0, 0, 0, 0, FUNCT_ADD),
                    HALT_WORD,
                ],
                0,
            )
            .unwrap();
        engine.run(None).unwrap();
        assert_eq!(engine.registers().read(0), 0);
    }
}
