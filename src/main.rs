//! Simpletron - CLI Entry Point
//!
//! Commands:
//! - `simpletron run <program>` - Load and execute a program
//! - `simpletron dump <program>` - Load a program and print the machine dump
//! - `simpletron disasm <program>` - Print a mnemonic listing

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simpletron")]
#[command(version)]
#[command(about = "An interpreter for the Simpletron machine language")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug trace of every instruction)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where to find the program and how big the machine is.
#[derive(clap::Args)]
struct ProgramArgs {
    /// Program file: one integer word per line
    program: String,
    /// Number of memory cells
    #[arg(short, long, default_value = "100")]
    memory_size: usize,
    /// Directory to resolve relative program names against
    #[arg(short, long)]
    search_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts or faults
    Run {
        #[command(flatten)]
        args: ProgramArgs,
        /// Stop after this many instructions
        #[arg(long)]
        max_cycles: Option<u64>,
        /// Print the machine dump even after a normal halt
        #[arg(short, long)]
        dump: bool,
        /// Write the final machine state as JSON to this file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Load a program and print the register and memory dump
    Dump {
        #[command(flatten)]
        args: ProgramArgs,
    },
    /// Print a mnemonic listing of a program
    Disasm {
        #[command(flatten)]
        args: ProgramArgs,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to initialise logging: {}", e);
    }

    match cli.command {
        Commands::Run { args, max_cycles, dump, snapshot } => {
            run_program(&args, max_cycles, dump, snapshot);
        }
        Commands::Dump { args } => {
            let machine = load_machine(&args);
            print!("{}", machine.dump());
        }
        Commands::Disasm { args } => {
            disassemble_file(&args);
        }
    }
}

fn load_machine(args: &ProgramArgs) -> simpletron::Machine {
    use simpletron::program::resolve_path;
    use simpletron::Machine;

    let path = resolve_path(&args.program, args.search_dir.as_deref());
    let mut machine = Machine::new(args.memory_size);

    if let Err(e) = machine.load_file(&path) {
        eprintln!("*** {} ***", e);
        eprintln!("*** Simpletron execution abnormally terminated ***");
        std::process::exit(1);
    }

    machine
}

fn run_program(args: &ProgramArgs, max_cycles: Option<u64>, dump: bool, snapshot: Option<PathBuf>) {
    use simpletron::StreamConsole;

    let mut machine = load_machine(args);
    println!("*** Program loading completed ***");
    println!("*** Program execution begins  ***");

    let mut console = StreamConsole::stdio();
    let result = match max_cycles {
        Some(limit) => machine.run_limited(&mut console, limit),
        None => machine.run(&mut console),
    };

    let status = match result {
        Ok(status) => status,
        Err(e) => {
            eprintln!("*** {} ***", e);
            eprintln!("*** Simpletron execution abnormally terminated ***");
            eprint!("{}", machine.dump());
            std::process::exit(1);
        }
    };

    if let Some(path) = snapshot {
        if let Err(e) = write_snapshot(&machine, &path) {
            eprintln!("failed to write snapshot {}: {}", path.display(), e);
        }
    }

    if status.is_halted() {
        println!("*** Simpletron {} ***", status);
        if dump {
            print!("{}", machine.dump());
        }
    } else if let Some(fault) = status.fault() {
        eprintln!("*** {} ***", fault);
        eprintln!("*** Simpletron execution abnormally terminated ***");
        eprint!("{}", machine.dump());
        std::process::exit(1);
    } else {
        println!("*** Stopped after {} cycles without halting ***", machine.cycles);
        if dump {
            print!("{}", machine.dump());
        }
    }
}

fn write_snapshot(machine: &simpletron::Machine, path: &std::path::Path) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(machine)?;
    std::fs::write(path, json)
}

fn disassemble_file(args: &ProgramArgs) {
    use simpletron::program::{disassemble, load_file, resolve_path};

    let path = resolve_path(&args.program, args.search_dir.as_deref());
    let image = match load_file(&path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("*** {} ***", e);
            std::process::exit(1);
        }
    };

    // Skipped lines still occupy an address; show them as the zero they leave.
    let words: Vec<_> = image.iter().map(|w| w.unwrap_or(0)).collect();
    print!("{}", disassemble(&words));
}
