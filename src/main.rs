use std::{
    io::{self, BufWriter},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bfc::bytecode::disasm::print_bc;
use bfc::bytecode::ir::DEFAULT_MEMORY_SIZE;
use bfc::bytecode::{CompileOptions, compile_source};
use bfc::frontend::lexer::{RunPolicy, compress_with};
use bfc::frontend::token_dumper::TokenDumper;
use bfc::runtime::VmBcConfig;
use bfc::{Error, Result};

/// bfc - compile Brainfuck into a runnable bytecode artifact
#[derive(Parser, Debug)]
#[command(name = "bfc", version)]
#[command(about = "Compile Brainfuck source into a runnable bytecode artifact", long_about = None)]
struct Args {
    /// Brainfuck source file
    input: Option<PathBuf>,

    /// Where to write the compiled artifact
    output: Option<PathBuf>,

    /// Number of memory cells in the generated program
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE, value_parser = parse_memory_size)]
    memory_size: usize,

    /// Merge runs across comment characters (`++x++` becomes one run of 4)
    #[arg(long)]
    filtered_runs: bool,

    /// Trap as soon as the pointer leaves memory
    #[arg(long)]
    bounds_check: bool,

    /// Show the compressed command runs only
    #[arg(long)]
    tokens: bool,

    /// With --tokens: no ANSI colors
    #[arg(long)]
    no_color: bool,

    /// With --tokens: print runs as source text
    #[arg(long)]
    pretty: bool,

    /// Print the bytecode disassembly
    #[arg(long = "bc", alias = "bytecode")]
    bytecode: bool,

    /// Run a compiled artifact with stdin/stdout
    #[arg(long, value_name = "ARTIFACT", conflicts_with_all = ["input", "output", "tokens", "bytecode"])]
    run: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> CompileOptions {
        CompileOptions {
            memory_size: self.memory_size,
            policy: if self.filtered_runs {
                RunPolicy::Filtered
            } else {
                RunPolicy::Adjacent
            },
            bounds_check: self.bounds_check,
        }
    }
}

fn parse_memory_size(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("memory size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            return if e.use_stderr() {
                print_usage();
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match dispatch(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, Error::InvalidArguments(_)) {
                print_usage();
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  bfc <in.bf> <out>          Compile to an artifact");
    eprintln!("  bfc --tokens <in.bf>       Show compressed command runs");
    eprintln!("  bfc --bc <in.bf> [out]     Show bytecode (and compile if out is given)");
    eprintln!("  bfc --run <artifact>       Run a compiled artifact");
}

fn dispatch(args: &Args) -> Result<()> {
    if let Some(artifact) = &args.run {
        return run(artifact);
    }

    let Some(input) = &args.input else {
        return Err(Error::InvalidArguments(
            "expected an input file and an output file".to_string(),
        ));
    };

    if args.tokens {
        return dump_tokens(input, args);
    }

    match &args.output {
        Some(output) => {
            let program = bfc::compile_file(input, output, args.options())?;
            if args.bytecode {
                print_bc(&program);
            }
            Ok(())
        }
        None if args.bytecode => {
            let source = bfc::read_source(input)?;
            print_bc(&compile_source(&source, args.options())?);
            Ok(())
        }
        None => Err(Error::InvalidArguments(
            "expected an output file after the input file".to_string(),
        )),
    }
}

fn dump_tokens(input: &Path, args: &Args) -> Result<()> {
    let source = bfc::read_source(input)?;

    let mut dumper = TokenDumper::new();
    if args.no_color {
        dumper = dumper.no_color();
    }
    if args.pretty {
        dumper = dumper.pretty();
    }

    dumper.dump(&compress_with(&source, args.options().policy));
    Ok(())
}

fn run(artifact: &Path) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = BufWriter::new(stdout.lock());

    bfc::run_artifact(artifact, VmBcConfig::default(), &mut input, &mut output)
}
