use clap::Parser as ClapParser;
use std::{
    fs,
    io::{self, Read},
    process,
};

use log::{info, warn, LevelFilter};
use object::{Datum, Registry, SymbolId};
use parser::{read_all, Reader};
use slip::{Driver, NoEngine};

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source files, compiled in order
    #[arg(required = false, help = "Files to compile (stdin if none)")]
    files: Vec<String>,

    /// Print what was read instead of compiling
    #[arg(long, help = "Read and print datums only")]
    read_only: bool,

    /// Package unqualified symbols are interned into. Special forms then
    /// need an `SL:` prefix.
    #[arg(long, value_name = "NAME")]
    package: Option<String>,

    /// Mark a symbol as an engine primitive
    #[arg(long = "primitive", value_name = "NAME")]
    primitives: Vec<String>,

    /// Mark a symbol as a special (dynamic) variable
    #[arg(long = "special", value_name = "NAME")]
    specials: Vec<String>,

    /// Check label placement of every compiled form
    #[arg(long)]
    verify_labels: bool,

    /// More logging; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Intern a symbol named on the command line, read the way source is.
fn flag_symbol(registry: &mut Registry, flag: &str, name: &str) -> Option<SymbolId> {
    match read_all(name, registry).as_deref() {
        Ok([Datum::Symbol(id)]) => Some(*id),
        _ => {
            warn!("ignoring --{flag} {name:?}: not a symbol");
            None
        }
    }
}

fn setup_registry(cli: &Cli) -> Registry {
    let mut registry = Registry::new();
    if let Some(name) = &cli.package {
        let package = registry.get_or_create_package(&name.to_ascii_uppercase());
        registry.set_current_package(Some(package));
    }
    for name in &cli.primitives {
        if let Some(id) = flag_symbol(&mut registry, "primitive", name) {
            registry.set_primitive(id, true);
        }
    }
    for name in &cli.specials {
        if let Some(id) = flag_symbol(&mut registry, "special", name) {
            registry.set_special(id, true);
        }
    }
    registry
}

/// Returns the number of forms that failed.
fn process_source(cli: &Cli, name: &str, source: &str, registry: &mut Registry) -> usize {
    let mut failures = 0;

    if cli.read_only {
        let mut reader = Reader::new(source, registry);
        while let Some(result) = reader.next() {
            match result {
                Ok(datum) => println!("{}", reader.registry().display(&datum)),
                Err(err) => {
                    eprintln!("{name}: {err}");
                    failures += 1;
                }
            }
        }
        return failures;
    }

    let mut engine = NoEngine;
    let mut driver = Driver::new(source, registry, &mut engine);
    while let Some(result) = driver.next() {
        match result {
            Ok(compiled) => {
                if cli.verify_labels {
                    if let Err(err) = compiled.code.verify_labels() {
                        eprintln!("{name}:{}: {err}", compiled.end);
                        failures += 1;
                    }
                }
                let registry = driver.registry();
                println!(";; {}", registry.display(&compiled.form));
                print!("{}", compiled.code.listing(registry));
            }
            Err(err) => {
                eprintln!("{name}: {err}");
                failures += 1;
            }
        }
    }
    failures
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut registry = setup_registry(&cli);
    let mut failures = 0;

    if cli.files.is_empty() {
        let mut source = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut source) {
            eprintln!("Error reading stdin: {}", err);
            process::exit(1);
        }
        failures += process_source(&cli, "<stdin>", &source, &mut registry);
    }

    for filename in &cli.files {
        let source = match fs::read_to_string(filename) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Error reading file '{}': {}", filename, err);
                process::exit(1);
            }
        };
        info!("compiling {filename}");
        failures += process_source(&cli, filename, &source, &mut registry);
    }

    if failures > 0 {
        warn!("{failures} form(s) failed");
        process::exit(1);
    }
}
