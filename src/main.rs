use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use bfcheck::bench::{BenchConfig, run_benchmark};
use bfcheck::check::{Summary, check_files, ensure_unique_names, write_output};
use bfcheck::tape::DEFAULT_TAPE_SIZE;
use bfcheck::{BoundsPolicy, IoSink, Machine, MachineConfig};

#[derive(Parser)]
#[command(name = "bfcheck", version, about = "Run Brainfuck programs and check their output")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program, streaming its output to stdout or a file.
    Run {
        /// Brainfuck source file.
        file: PathBuf,

        /// Write output here instead of stdout. Partial output is kept on failure.
        #[arg(long, short)]
        out: Option<PathBuf>,

        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Run programs and compare their output with a known-good file.
    Check {
        /// File holding the expected output.
        #[arg(long, short)]
        expected: PathBuf,

        /// Save each program's output as `<DIR>/<name>.txt`.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Only print the final summary line.
        #[arg(long, short)]
        quiet: bool,

        /// Brainfuck source files to check.
        #[arg(required = true)]
        programs: Vec<PathBuf>,

        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Measure interpreter throughput on random programs.
    Bench {
        /// Random seed for reproducibility.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Number of programs to generate.
        #[arg(long, default_value_t = 1 << 12)]
        programs: usize,

        /// Bytes per generated program.
        #[arg(long, default_value_t = 256)]
        program_size: usize,

        /// Max steps per program execution.
        #[arg(long, default_value_t = 1 << 16)]
        step_limit: usize,
    },
}

#[derive(Args)]
struct MachineArgs {
    /// Initial number of tape cells.
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// What happens when the cursor moves off the tape.
    #[arg(long, value_enum, default_value_t = Bounds::Grow)]
    bounds: Bounds,

    /// Stop with an error after this many steps.
    #[arg(long)]
    step_limit: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Bounds {
    /// Extend the tape to the right as needed.
    Grow,
    /// Fail when the cursor leaves the initial tape.
    Fixed,
}

impl From<&MachineArgs> for MachineConfig {
    fn from(args: &MachineArgs) -> Self {
        MachineConfig {
            tape_size: args.tape_size,
            bounds: match args.bounds {
                Bounds::Grow => BoundsPolicy::Grow,
                Bounds::Fixed => BoundsPolicy::Fixed,
            },
            step_limit: args.step_limit,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { file, out, machine } => run(&file, out.as_deref(), &machine),
        Command::Check {
            expected,
            out_dir,
            quiet,
            programs,
            machine,
        } => check(&expected, out_dir.as_deref(), quiet, &programs, &machine),
        Command::Bench {
            seed,
            programs,
            program_size,
            step_limit,
        } => bench(seed, programs, program_size, step_limit),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(file: &Path, out: Option<&Path>, args: &MachineArgs) -> Result<bool> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let machine = Machine::new(args.into());

    let outcome = match out {
        Some(path) => {
            let f = fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut sink = IoSink::new(io::BufWriter::new(f));
            let outcome = machine.run(&source, &mut sink);
            log::debug!("wrote {} bytes to {}", sink.written(), path.display());
            sink.finish()
                .with_context(|| format!("failed to write {}", path.display()))?;
            outcome
        }
        None => {
            let mut sink = IoSink::new(io::stdout().lock());
            let outcome = machine.run(&source, &mut sink);
            log::debug!("wrote {} bytes to stdout", sink.written());
            let _stdout = sink.finish().context("failed to write to stdout")?;
            outcome
        }
    };

    match outcome {
        Ok(_) => Ok(true),
        Err(err) => {
            eprintln!("{}: {err}", file.display());
            Ok(false)
        }
    }
}

fn check(
    expected: &Path,
    out_dir: Option<&Path>,
    quiet: bool,
    programs: &[PathBuf],
    args: &MachineArgs,
) -> Result<bool> {
    ensure_unique_names(programs)?;
    let expected = fs::read(expected)
        .with_context(|| format!("failed to read {}", expected.display()))?;
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let machine = Machine::new(args.into());
    let checked = check_files(&machine, programs, &expected);

    for c in &checked {
        if let Some(dir) = out_dir {
            if c.verdict.ran() {
                write_output(dir, c)?;
            }
        }
        if !quiet {
            println!("{c}");
        }
    }

    let summary = Summary::from_checked(&checked);
    if !quiet {
        println!();
    }
    println!("{summary}");
    Ok(summary.all_valid())
}

fn bench(seed: u64, programs: usize, program_size: usize, step_limit: usize) -> Result<bool> {
    let machine = Machine::new(MachineConfig {
        step_limit: Some(step_limit),
        ..MachineConfig::default()
    });
    let config = BenchConfig {
        programs,
        program_size,
    };
    let report = run_benchmark(&machine, &config, seed);

    eprintln!("Benchmark results:");
    eprintln!("  Programs:          {}", report.programs);
    eprintln!("  Program size:      {program_size}");
    eprintln!("  Completed:         {}", report.completed);
    eprintln!("  Failed:            {}", report.failed);
    eprintln!("  Total steps:       {}", report.steps);
    eprintln!("  Elapsed:           {:.2?}", report.elapsed);
    eprintln!("  Programs/sec:      {:.1}", report.programs_per_sec());
    eprintln!("  Steps/sec:         {:.0}", report.steps_per_sec());
    Ok(true)
}
