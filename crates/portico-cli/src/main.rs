mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use portico_compose::{DEFAULT_OUTPUT, Destination};
use portico_core::DEFAULT_SOURCE;

use commands::{GenerateArgs, Generated};

#[derive(Parser)]
#[command(
    name = "portico",
    about = "Generate docker-compose files with Traefik routing from services.toml"
)]
#[command(version)]
struct Cli {
    /// Output file (words are joined with spaces); `-` writes to stdout
    #[arg(value_name = "OUTPUT")]
    output: Vec<String>,
    /// Services definition file
    #[arg(long, short = 's', default_value = DEFAULT_SOURCE)]
    source: PathBuf,
    /// portico.toml to use instead of the one next to the source
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
    /// Regenerate even if the output is newer than the source
    #[arg(long, short = 'f')]
    force: bool,
}

impl Cli {
    fn destination(&self) -> Destination {
        if self.output.is_empty() {
            Destination::parse(DEFAULT_OUTPUT)
        } else {
            Destination::parse(&self.output.join(" "))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let args = GenerateArgs {
        output: cli.destination(),
        source: cli.source,
        config: cli.config,
        force: cli.force,
    };

    match commands::generate(&args).await {
        Ok(Generated::Written) => {
            if let Destination::File(_) = args.output {
                println!("{} file generated", args.output);
            }
            ExitCode::SUCCESS
        }
        Ok(Generated::UpToDate) => {
            eprintln!(
                "Services: {} is same or newer than {}, stop.",
                args.output,
                args.source.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Services: {e:#}");
            ExitCode::from(commands::exit_code(&e))
        }
    }
}
