//! Schema Docs CLI
//!
//! Inspect an XML documentation export the way the generator sees it.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use reflect_schema::{DocKind, DocumentationIndex, GeneratorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-docs")]
#[command(about = "Inspect the documentation export used for schema descriptions")]
struct Cli {
    /// Documentation export (defaults to docs.path from configuration)
    #[arg(short, long, global = true)]
    docs: Option<PathBuf>,

    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the description for a type or member
    Lookup {
        /// Identifier kind
        #[arg(value_enum)]
        kind: Kind,

        /// Fully qualified type name (e.g. Server.Config)
        type_name: String,

        /// Member name, required for properties and fields
        member: Option<String>,
    },

    /// Fuzzy search documented identifiers
    Search {
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show entry counts
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Type,
    Property,
    Field,
}

impl From<Kind> for DocKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Type => DocKind::Type,
            Kind::Property => DocKind::Property,
            Kind::Field => DocKind::Field,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = match cli.docs {
        Some(path) => path,
        None => GeneratorConfig::load_from(cli.config.as_deref())?
            .docs
            .path
            .ok_or_else(|| anyhow::anyhow!("no documentation export given (use --docs or docs.path)"))?,
    };
    let index = DocumentationIndex::try_load(&path)?;

    match cli.command {
        Commands::Lookup { kind, type_name, member } => {
            let kind = DocKind::from(kind);
            let id = kind
                .identifier(&type_name, member.as_deref())
                .ok_or_else(|| anyhow::anyhow!("{} identifiers need a member name", kind))?;

            match index.lookup_id(&id) {
                Some(summary) => println!("{}", summary),
                None => {
                    eprintln!("No description for {}", id);
                    std::process::exit(2);
                }
            }
        }

        Commands::Search { query, limit } => {
            let matches = index.search(&query, limit);
            if matches.is_empty() {
                println!("No matches for '{}'", query);
            }
            for m in matches {
                println!("{:>5}  {}", m.score, m.id);
                if let Some(summary) = m.summary.filter(|s| !s.is_empty()) {
                    println!("       {}", summary);
                }
            }
        }

        Commands::Stats => {
            println!("📚 Documentation export: {}", path.display());
            println!("  Entries:    {}", index.len());
            println!("  Types:      {}", index.count(DocKind::Type));
            println!("  Properties: {}", index.count(DocKind::Property));
            println!("  Fields:     {}", index.count(DocKind::Field));
        }
    }

    Ok(())
}
