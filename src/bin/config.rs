//! Schema Config CLI
//!
//! View and manage schema generation configuration.

use clap::{Parser, Subcommand};
use reflect_schema::GeneratorConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-config")]
#[command(about = "View and manage schema generation configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "schema-gen.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = GeneratorConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Schema Generation Configuration\n");
                println!("Docs:");
                match &cfg.docs.path {
                    Some(path) => println!("  Export: {}", path.display()),
                    None => println!("  Export: (none, descriptions disabled)"),
                }

                println!("\nOutput:");
                println!("  Format: {:?}", cfg.output.format);
                println!("  Path: {}", cfg.output_path().display());
            }
        }

        Commands::Init { output } => {
            let cfg = GeneratorConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }
    }

    Ok(())
}
