use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fieldsmith::assemble::{resolve_columns, template_for_table};
use fieldsmith::mcp::session::Session;
use fieldsmith::naming::{split_join, CaseStyle};
use fieldsmith::schema::SchemaReader;
use fieldsmith::{server, Config};

#[derive(Parser)]
#[command(name = "fieldsmith", about = "Naming conventions and field descriptors for code scaffolding")]
struct Cli {
    /// Config file (defaults to ~/.fieldsmith/config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an identifier to one naming style, or to every style
    Case {
        input: String,

        #[arg(short, long, value_enum)]
        style: Option<CaseStyle>,
    },

    /// Split an identifier into words and join them with a custom joiner
    SplitJoin {
        input: String,

        #[arg(short, long)]
        joiner: String,

        /// Substring removed before splitting (repeatable)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List the tables of a SQLite database
    Tables {
        #[arg(long)]
        db: PathBuf,
    },

    /// Print the resolved column descriptors of a table as JSON
    Columns {
        #[arg(long)]
        db: PathBuf,

        #[arg(short, long)]
        table: String,
    },

    /// Print the template descriptor for generating one file from a table
    Template {
        #[arg(long)]
        db: PathBuf,

        #[arg(short, long)]
        table: String,

        /// Template identifier
        #[arg(short, long)]
        file: String,

        /// Template search location
        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        package: Option<String>,

        #[arg(long)]
        source_folder: Option<String>,

        #[arg(long)]
        class_name: Option<String>,

        /// Keep existing output files
        #[arg(long)]
        no_override: bool,
    },

    /// Start the MCP stdio server
    Serve {
        /// SQLite database exposed to the schema tools
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("Usage: fieldsmith case <input> [--style <style>]");
        eprintln!("       fieldsmith split-join <input> --joiner <joiner> [--exclude <s>]...");
        eprintln!("       fieldsmith tables --db <path>");
        eprintln!("       fieldsmith columns --db <path> --table <table>");
        eprintln!("       fieldsmith template --db <path> --table <table> --file <template>");
        eprintln!("       fieldsmith serve [--db <path>]");
        std::process::exit(1);
    };

    let mut config = Config::load(cli.config.as_deref())?;

    match command {
        Commands::Case { input, style } => {
            let separators = config.separators();
            match style {
                Some(style) => println!("{}", style.apply_with(&input, &separators)),
                None => {
                    for style in CaseStyle::ALL {
                        println!("{:<12} {}", style.name(), style.apply_with(&input, &separators));
                    }
                }
            }
        }

        Commands::SplitJoin {
            input,
            joiner,
            exclude,
        } => {
            println!("{}", split_join(&input, &joiner, &exclude));
        }

        Commands::Tables { db } => {
            let schema = SchemaReader::open(&db)?;
            let tables = schema.tables()?;
            for table in &tables {
                println!("{table}");
            }
            eprintln!("\n{} table(s) total", tables.len());
        }

        Commands::Columns { db, table } => {
            let schema = SchemaReader::open(&db)?;
            let columns = schema.columns(&table)?;
            let resolved = resolve_columns(&columns, &config)
                .with_context(|| format!("Failed to resolve fields of {table}"))?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }

        Commands::Template {
            db,
            table,
            file,
            path,
            package,
            source_folder,
            class_name,
            no_override,
        } => {
            // Command-line values take precedence over the configured defaults.
            if let Some(path) = path {
                config.template.path = Some(path);
            }
            if let Some(package) = package {
                config.template.package_name = Some(package);
            }
            if let Some(folder) = source_folder {
                config.template.source_folder = Some(folder);
            }
            if no_override {
                config.template.overwrite = false;
            }

            let schema = SchemaReader::open(&db)?;
            let columns = schema.columns(&table)?;
            let template =
                template_for_table(&table, &columns, &config, &file, class_name.as_deref())
                    .with_context(|| format!("Failed to assemble template for {table}"))?;

            println!("{}", serde_json::to_string_pretty(&template)?);
        }

        Commands::Serve { db } => {
            let schema = db.as_deref().map(SchemaReader::open).transpose()?;
            tracing::info!(
                "fieldsmith server starting ({})",
                match &db {
                    Some(path) => format!("database {}", path.display()),
                    None => "no database".to_string(),
                }
            );
            server::stdio::run(Session::new(config, schema)).await?;
        }
    }

    Ok(())
}
