use clap::{Parser, Subcommand};
use log::{Level, LevelFilter, Log, Metadata, Record};
use m68tick::bus::{RamBus, SimBus};
use m68tick::dis::disassemble;
use m68tick::instr::OpcodeTable;
use m68tick::proc::M68000;
use m68tick::script::{ScriptAst, ScriptError};
use std::io;
use std::path::{Path, PathBuf};

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    /// Logs more detail to stderr (repeat for more).
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Disassembles instruction words given in hex.
    Dis {
        /// The instruction words, e.g. `b6a0` or `$0c79`.
        #[clap(required = true)]
        words: Vec<String>,
        /// The address of the first word.
        #[clap(long, default_value = "0", value_parser = parse_int)]
        base: u32,
    },
    /// Runs a setup script and prints the timing of every instruction.
    Trace {
        /// The script to run.
        script: PathBuf,
        /// The size of simulated RAM, as a power of two.
        #[clap(long, default_value_t = 20)]
        ram_bits: u32,
    },
}

fn parse_int(text: &str) -> Result<u32, String> {
    let result = if let Some(hex) = text.strip_prefix('$') {
        u32::from_str_radix(hex, 16)
    } else if let Some(hex) = text.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    result.map_err(|error| format!("invalid integer {text:?}: {error}"))
}

//===========================================================================//

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let label = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        eprintln!("{label} [{}]: {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

//===========================================================================//

fn invalid_data<E: std::error::Error + Send + Sync + 'static>(
    error: E,
) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

fn run_dis(words: &[String], base: u32) -> io::Result<()> {
    let table = OpcodeTable::build();
    let mut bus = RamBus::with_address_bits(m68tick::bus::ADDRESS_BITS);
    let mut end = base;
    for word in words {
        let text = word.trim_start_matches('$').trim_start_matches("0x");
        let value = u16::from_str_radix(text, 16).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid instruction word: {word}"),
            )
        })?;
        bus.write_word(end, value);
        end = end.wrapping_add(2);
    }
    let mut addr = base;
    while addr != end {
        let dis = disassemble(&table, &bus, addr);
        println!("${addr:06X}  {dis}");
        addr = addr.wrapping_add(dis.size);
        // An instruction may claim extension words past the input.
        if addr.wrapping_sub(base) > end.wrapping_sub(base) {
            break;
        }
    }
    Ok(())
}

fn run_trace(script: &Path, ram_bits: u32) -> io::Result<()> {
    let source = std::fs::read_to_string(script)?;
    let ast = match ScriptAst::parse_source(&source) {
        Ok(ast) => ast,
        Err(errors) => {
            for error in errors.iter() {
                let (line, column) = error.span.line_and_column(&source);
                eprintln!("{}:{line}:{column}: {error}", script.display());
            }
            return Err(invalid_data(ScriptError::Parse(errors)));
        }
    };
    let table = OpcodeTable::build();
    let mut proc = M68000::new(&table);
    let mut bus = RamBus::with_address_bits(ram_bits.clamp(1, 24));
    let reports = ast.run(&mut proc, &mut bus).map_err(invalid_data)?;
    for report in reports.iter() {
        let dis = disassemble(&table, &bus, report.address);
        let pattern: Vec<String> =
            report.transactions.iter().map(|cycle| cycle.to_string()).collect();
        println!(
            "${:06X}  {:<28} {:>3} cycles  {}",
            report.address,
            dis.to_string(),
            report.cycles,
            pattern.join(" ")
        );
    }
    println!("{}", proc.registers());
    Ok(())
}

//===========================================================================//

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Dis { words, base } => run_dis(&words, base),
        Command::Trace { script, ram_bits } => run_trace(&script, ram_bits),
    }
}

//===========================================================================//
