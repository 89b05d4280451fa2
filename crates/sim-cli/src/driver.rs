//! Run-mode driver: continuous execution or interactive single-stepping.
//!
//! Pacing lives here, outside the engine. Continuous mode delegates to
//! `Engine::run`; interactive mode prompts on stdin before each cycle.

use std::io::{self, BufRead as _, Write as _};

use sim_core::{Engine, Fault, RunState};

/// Drives an engine to completion in either continuous or step mode.
pub struct RunController {
    step_mode: bool,
    max_cycles: Option<u64>,
}

impl RunController {
    /// Creates a controller; `max_cycles` caps both modes.
    #[must_use]
    pub const fn new(step_mode: bool, max_cycles: Option<u64>) -> Self {
        Self {
            step_mode,
            max_cycles,
        }
    }

    /// Runs `engine` until halt, fault, cycle cap, or (in step mode) quit.
    ///
    /// Returns the number of cycles stepped.
    ///
    /// # Errors
    ///
    /// Propagates the first [`Fault`] raised by the engine.
    pub fn run(&self, engine: &mut Engine) -> Result<u64, Fault> {
        if self.step_mode {
            self.run_interactive(engine)
        } else {
            engine.run(self.max_cycles)
        }
    }

    fn run_interactive(&self, engine: &mut Engine) -> Result<u64, Fault> {
        let stdin = io::stdin();
        let mut input = String::new();
        let mut steps = 0u64;
        while matches!(engine.run_state(), RunState::Running) {
            if self.max_cycles.is_some_and(|cap| steps >= cap) {
                break;
            }
            print!("[Enter=step, q=quit] ");
            let _ = io::stdout().flush();
            input.clear();
            // EOF or a read error ends the session like an explicit quit.
            if stdin.lock().read_line(&mut input).unwrap_or(0) == 0 {
                break;
            }
            if input.trim().to_ascii_lowercase().starts_with('q') {
                break;
            }
            engine.step()?;
            steps += 1;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::RunController;
    use sim_core::{Engine, Fault, RunState, HALT_WORD, OP_ADDI};

    fn counting_program() -> Vec<u32> {
        vec![
            sim_core::encode_immediate(OP_ADDI, 8, 8, 1),
            sim_core::encode_immediate(OP_ADDI, 8, 8, 1),
            HALT_WORD,
        ]
    }

    #[test]
    fn continuous_mode_runs_to_halt() {
        let mut engine = Engine::new(64);
        engine.load(&counting_program(), 0).unwrap();
        let steps = RunController::new(false, None).run(&mut engine).unwrap();
        assert_eq!(steps, 3);
        assert_eq!(engine.run_state(), RunState::Halted);
        assert_eq!(engine.registers().read(8), 2);
    }

    #[test]
    fn continuous_mode_honors_the_cycle_cap() {
        let mut engine = Engine::new(64);
        engine.load(&counting_program(), 0).unwrap();
        let steps = RunController::new(false, Some(1)).run(&mut engine).unwrap();
        assert_eq!(steps, 1);
        assert_eq!(engine.run_state(), RunState::Running);
    }

    #[test]
    fn continuous_mode_surfaces_engine_faults() {
        let mut engine = Engine::new(8);
        // No halt in range; the third fetch runs off the store.
        engine
            .load(
                &[
                    sim_core::encode_immediate(OP_ADDI, 8, 8, 1),
                    sim_core::encode_immediate(OP_ADDI, 8, 8, 1),
                ],
                0,
            )
            .unwrap();
        assert_eq!(
            RunController::new(false, None).run(&mut engine),
            Err(Fault::OutOfBoundsAccess { addr: 8, size: 8 })
        );
    }
}
