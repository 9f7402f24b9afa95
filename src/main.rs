use clap::{Parser, Subcommand};
use enigma::cli::{convert_files, keygen, show_info, ConvertOptions, KeygenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("ENIGMA_VERSION");
const BUILD: &str = env!("ENIGMA_BUILD");
const PROFILE: &str = env!("ENIGMA_PROFILE");
const GIT_HASH: &str = env!("ENIGMA_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "enigma")]
#[command(author, about = "Rotor cipher machine simulator", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt or decrypt messages
    #[command(alias = "c")]
    Convert {
        /// Rotor catalog (text layout or JSON)
        config: PathBuf,

        /// Message file (stdin when omitted)
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        output: Option<PathBuf>,

        /// Print rotor positions and the signal path of every symbol to stderr
        #[arg(long)]
        verbose: bool,

        /// Output group width, 0 for none
        #[arg(long, default_value = "5")]
        group: usize,
    },

    /// Show the contents of a rotor catalog
    #[command(alias = "i")]
    Info {
        /// Rotor catalog to inspect
        config: PathBuf,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a random settings line
    #[command(alias = "k")]
    Keygen {
        /// Rotor catalog to draw rotors from
        config: PathBuf,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Number of plugboard pairs
        #[arg(long, default_value = "10")]
        plugs: usize,

        /// Leave ring settings out
        #[arg(long)]
        no_rings: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("enigma {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging();

    let result = match command {
        Commands::Convert {
            config,
            input,
            output,
            verbose,
            group,
        } => {
            let options = ConvertOptions { verbose, group };
            convert_files(&config, input.as_deref(), output.as_deref(), &options).map(|report| {
                for line in &report.trace {
                    eprintln!("{}", line);
                }
            })
        }

        Commands::Info { config, json } => show_info(&config, json).map(|info| print!("{}", info)),

        Commands::Keygen {
            config,
            seed,
            plugs,
            no_rings,
        } => {
            let options = KeygenOptions {
                seed,
                plugs,
                rings: !no_rings,
            };
            keygen(&config, &options).map(|line| println!("{}", line))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
