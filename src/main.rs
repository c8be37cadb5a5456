use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, LevelFilter};
use native_invoker::bindings::{COMPUTE, SAY_HELLO, TRANSFORM};
use native_invoker::{Bindings, Library, Operation, SignatureFile};
use std::path::PathBuf;

/// Loads a native library and drives its `say_hello`, `compute` and `transform` exports.
#[derive(Debug, Parser)]
#[command(name = "native-invoker", version)]
struct Cli {
    /// Path or platform search name of the library to load
    #[arg(env = "NATIVE_INVOKER_LIBRARY")]
    library: String,

    /// Signature descriptor to verify the bindings against
    #[arg(long, value_name = "FILE")]
    signatures: Option<PathBuf>,

    /// Operation to pass to `compute` (repeatable, defaults to all four)
    #[arg(long = "op", value_name = "OPERATION")]
    ops: Vec<Operation>,

    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }

        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if cli.verbose > 0 || cli.quiet {
        logger.filter_level(cli.log_level());
    }
    logger.init();

    debug!("{:?}", cli);

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    println!();
    println!("• loading {}", cli.library);
    let mut library = Library::load(&cli.library)?;

    if let Some(path) = &cli.signatures {
        let file = SignatureFile::from_file(path)?;
        library = library.with_signatures(file);
    }

    {
        println!();
        let bindings =
            unsafe { Bindings::bind_with(&library, |symbol| println!("• accessing {}", symbol)) }
                .with_context(|| format!("binding the exports of {}", library.name()))?;

        println!("• calling {}", SAY_HELLO);
        bindings.say_hello();

        println!("• calling {}", COMPUTE);
        let ops: &[Operation] = match cli.ops.as_slice() {
            [] => &Operation::ALL,
            ops => ops,
        };
        for &op in ops {
            println!("{} -> {}", op, bindings.compute_op(3.0, 4.0, op));
        }

        println!("• calling {}", TRANSFORM);
        let mut values = [1.0, 2.0, 3.0, 4.0, 5.0];
        println!("before: {:?}", values);
        bindings.transform(&mut values);
        println!("after: {:?}", values);
    }

    library.close()?;

    Ok(())
}
