use std::time::{Duration, Instant};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::machine::Machine;

/// Instructions a generated program is drawn from, brackets excluded.
const BODY: &[u8] = b"<>+-.";

/// Configuration for a throughput benchmark.
pub struct BenchConfig {
    /// Number of random programs to run.
    pub programs: usize,
    /// Bytes per generated program.
    pub program_size: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            programs: 1 << 12, // 4096
            program_size: 256,
        }
    }
}

/// Generate a random program of exactly `len` bytes with balanced brackets.
///
/// Loops are opened with probability 1/8 and closed with the same odds
/// while open; whatever is still open when the tail is reached gets closed.
/// The program starts at cell 1 (`>`) so stray `<` moves are less likely to
/// fall off the left end.
pub fn random_program(rng: &mut SmallRng, len: usize) -> String {
    let mut code = Vec::with_capacity(len);
    let mut open = 0usize;
    if len > 0 {
        code.push(b'>');
    }
    while code.len() < len {
        let remaining = len - code.len();
        if open >= remaining {
            code.push(b']');
            open -= 1;
            continue;
        }
        let roll: u8 = rng.gen_range(0..8);
        if roll == 0 && open + 2 <= remaining {
            code.push(b'[');
            open += 1;
        } else if roll == 1 && open > 0 {
            code.push(b']');
            open -= 1;
        } else {
            code.push(BODY[rng.gen_range(0..BODY.len())]);
        }
    }
    code.into_iter().map(char::from).collect()
}

/// Throughput of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub programs: usize,
    pub completed: usize,
    pub failed: usize,
    pub steps: u64,
    pub elapsed: Duration,
}

impl BenchReport {
    pub fn steps_per_sec(&self) -> f64 {
        self.steps as f64 / self.elapsed.as_secs_f64()
    }

    pub fn programs_per_sec(&self) -> f64 {
        self.programs as f64 / self.elapsed.as_secs_f64()
    }
}

/// Generate `config.programs` programs from `seed` and time running them all.
///
/// Generated programs may loop forever or walk off the tape, so `machine`
/// should carry a step limit; those runs count as failed.
pub fn run_benchmark(machine: &Machine, config: &BenchConfig, seed: u64) -> BenchReport {
    let mut rng = SmallRng::seed_from_u64(seed);
    let programs: Vec<String> = (0..config.programs)
        .map(|_| random_program(&mut rng, config.program_size))
        .collect();

    let mut completed = 0;
    let mut failed = 0;
    let mut steps: u64 = 0;
    let mut sink = |_: u8| {};

    let start = Instant::now();
    for program in &programs {
        match machine.run(program, &mut sink) {
            Ok(n) => {
                completed += 1;
                steps += n as u64;
            }
            Err(_) => failed += 1,
        }
    }
    let elapsed = start.elapsed();

    BenchReport {
        programs: config.programs,
        completed,
        failed,
        steps,
        elapsed,
    }
}
