use crate::error::Error;
use crate::program::{DOT, GREATER, LBRACKET, LESS, MINUS, PLUS, Program, RBRACKET};
use crate::sink::Sink;
use crate::tape::{BoundsPolicy, DEFAULT_TAPE_SIZE, OutOfBounds, Tape};

/// Configuration for a single interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Initial number of tape cells.
    pub tape_size: usize,
    /// What to do when the cursor leaves the tape.
    pub bounds: BoundsPolicy,
    /// Maximum instructions to execute (`None` runs until the program ends).
    pub step_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tape_size: DEFAULT_TAPE_SIZE,
            bounds: BoundsPolicy::Grow,
            step_limit: None,
        }
    }
}

/// The Brainfuck tape machine.
///
/// Holds only configuration: tape, cursor and instruction pointer are built
/// fresh inside every `run`, so one `Machine` can be shared across threads
/// and reused for any number of programs.
///
/// - `>` / `<` move the cursor, subject to the bounds policy
/// - `+` / `-` add or subtract one, wrapping modulo 256
/// - `.` hands the current cell to the sink
/// - `[` jumps past its partner when the cell is zero
/// - `]` jumps back to its partner when the cell is nonzero
///
/// Every other byte (including `,`) is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Machine {
    config: MachineConfig,
}

impl Machine {
    pub fn new(config: MachineConfig) -> Self {
        Self { config }
    }

    /// Execute `source`, sending each printed byte to `sink`.
    ///
    /// Returns the number of steps executed. On error, whatever reached the
    /// sink before the fault stays there.
    pub fn run<S: Sink + ?Sized>(&self, source: &str, sink: &mut S) -> Result<usize, Error> {
        let program = Program::new(source);
        log::debug!(
            "running program of {} bytes (tape {} cells, {:?})",
            program.len(),
            self.config.tape_size,
            self.config.bounds
        );
        let result = self.execute(&program, sink);
        match &result {
            Ok(steps) => log::debug!("program finished after {steps} steps"),
            Err(err) => log::debug!("program stopped: {err}"),
        }
        result
    }

    fn execute<S: Sink + ?Sized>(&self, program: &Program<'_>, sink: &mut S) -> Result<usize, Error> {
        let code = program.code();
        let len = code.len();
        let mut tape = Tape::new(self.config.tape_size, self.config.bounds);
        let step_limit = self.config.step_limit.unwrap_or(usize::MAX);

        let mut ip: usize = 0;
        let mut steps: usize = 0;

        while ip < len {
            if steps >= step_limit {
                return Err(Error::StepLimit { limit: step_limit });
            }
            steps += 1;
            let bounds = move |e: OutOfBounds| Error::TapeBounds {
                cell: e.cell,
                len: e.len,
                offset: ip,
            };
            match code[ip] {
                GREATER => tape.move_right().map_err(bounds)?,
                LESS => tape.move_left().map_err(bounds)?,
                PLUS => tape.increment().map_err(bounds)?,
                MINUS => tape.decrement().map_err(bounds)?,
                DOT => sink.emit(tape.get().map_err(bounds)?),
                LBRACKET => {
                    if tape.get().map_err(bounds)? == 0 {
                        // Land on the partner; the advance below steps past it.
                        ip = program.partner(ip)?;
                    }
                }
                RBRACKET => {
                    if tape.get().map_err(bounds)? != 0 {
                        ip = program.partner(ip)?;
                    }
                }
                _ => {}
            }
            ip += 1;
        }

        Ok(steps)
    }
}

/// Interpret `source` on a default machine, streaming output to `emit`.
pub fn interpret<S: Sink + ?Sized>(source: &str, emit: &mut S) -> Result<(), Error> {
    Machine::default().run(source, emit).map(|_| ())
}
