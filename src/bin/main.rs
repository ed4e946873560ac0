//! dbdoc CLI - Generate schema documentation from a live database
//!
//! Usage:
//!   dbdoc generate [--connection <name> | --url <url> ...] [--output <dir>] [--type <type>]
//!   dbdoc list [--connection <name> | --url <url> ...] [filter flags]
//!   dbdoc check
//!
//! Examples:
//!   dbdoc generate --url postgres://db/erp -u reader -p secret --table-prefixes t_
//!   dbdoc generate --connection warehouse --output docs --title warehouse-v2
//!   dbdoc list --url sqlite://app.db --ignore-table-suffixes _bak

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dbdoc::config::{ConnectionParams, Settings};
use dbdoc::engine::{CommandEngine, DocumentEngine};
use dbdoc::filter::FilterSpec;
use dbdoc::generate::{self, ConfigError, GenerateError, GenerateRequest, OutputOptions};
use dbdoc::logging;

#[derive(Parser)]
#[command(name = "dbdoc")]
#[command(about = "dbdoc - Generate database schema documentation")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to DBDOC_CONFIG, ./dbdoc.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a document for a database schema
    Generate {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the tables that would be documented
    List {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Validate the settings file and show its connections
    Check,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Named connection from the settings file
    #[arg(short = 'c', long)]
    connection: Option<String>,

    /// Driver: postgres, mysql, sqlite, or a JDBC driver class name
    #[arg(long)]
    driver: Option<String>,

    /// Connection URL
    #[arg(long)]
    url: Option<String>,

    #[arg(short, long)]
    username: Option<String>,

    #[arg(short, long)]
    password: Option<String>,

    /// Schema to document (defaults to the connection's current schema)
    #[arg(short, long)]
    schema: Option<String>,
}

#[derive(Args)]
struct FilterArgs {
    /// Only document these tables
    #[arg(long, value_delimiter = ',')]
    table_names: Vec<String>,

    /// Only document tables starting with one of these prefixes
    #[arg(long, value_delimiter = ',')]
    table_prefixes: Vec<String>,

    /// Only document tables ending with one of these suffixes
    #[arg(long, value_delimiter = ',')]
    table_suffixes: Vec<String>,

    /// Never document these tables
    #[arg(long, value_delimiter = ',')]
    ignore_table_names: Vec<String>,

    /// Never document tables starting with one of these prefixes
    #[arg(long, value_delimiter = ',')]
    ignore_table_prefixes: Vec<String>,

    /// Never document tables ending with one of these suffixes
    #[arg(long, value_delimiter = ',')]
    ignore_table_suffixes: Vec<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document title, used as the file name
    #[arg(short, long)]
    title: Option<String>,

    /// Document type: excel, html, word or md
    #[arg(long = "type")]
    file_type: Option<String>,

    /// Document version (external engine only)
    #[arg(long)]
    doc_version: Option<String>,

    /// Document description (external engine only)
    #[arg(long)]
    description: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let settings = match load_settings(cli.config.as_ref()) {
        Ok(s) => s,
        Err(e) => return report(&e),
    };

    let result = match cli.command {
        Commands::Generate {
            connection,
            filter,
            output,
        } => cmd_generate(&settings, connection, filter, output).await,
        Commands::List { connection, filter } => cmd_list(&settings, connection, filter).await,
        Commands::Check => cmd_check(&settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &GenerateError) -> ExitCode {
    eprintln!("{}: {}", err.kind(), err);
    ExitCode::FAILURE
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, GenerateError> {
    let settings = match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    settings.map_err(|e| ConfigError::from(e).into())
}

async fn cmd_generate(
    settings: &Settings,
    connection: ConnectionArgs,
    filter: FilterArgs,
    output: OutputArgs,
) -> Result<(), GenerateError> {
    let request = GenerateRequest::new(resolve_connection(settings, connection)?)
        .with_filter(resolve_filter(settings, filter))
        .with_output(resolve_output(settings, output)?)
        .with_pool(settings.pool.clone());

    let engine = settings
        .engine
        .command
        .as_ref()
        .map(|command| CommandEngine::new(command).with_args(settings.engine.args.clone()));

    let path = generate::generate(&request, engine.as_ref().map(|e| e as &dyn DocumentEngine)).await?;

    println!("{}", path.display());
    Ok(())
}

async fn cmd_list(
    settings: &Settings,
    connection: ConnectionArgs,
    filter: FilterArgs,
) -> Result<(), GenerateError> {
    let request = GenerateRequest::new(resolve_connection(settings, connection)?)
        .with_filter(resolve_filter(settings, filter))
        .with_pool(settings.pool.clone());

    let tables = generate::preview_tables(&request).await?;

    for table in &tables {
        match &table.comment {
            Some(comment) if !comment.is_empty() => println!("{}\t{}", table.name, comment),
            _ => println!("{}", table.name),
        }
    }
    eprintln!("{} table(s)", tables.len());
    Ok(())
}

fn cmd_check(settings: &Settings) -> Result<(), GenerateError> {
    if settings.connections.is_empty() {
        println!("No connections configured.");
    }

    for (name, conn) in &settings.connections {
        let params = conn.to_params().map_err(ConfigError::from)?;
        let driver = params.validate()?;
        println!("{:<20} {:<10} {}", name, driver.as_str(), params.redacted_url());
    }

    let output = OutputOptions::from_settings(&settings.output)?;
    println!();
    println!("Output:  {}/{}.{}", output.dir.display(), output.title(), output.file_type.extension());
    if !output.file_type.is_workbook() && settings.engine.command.is_none() {
        println!("Warning: '{}' output needs [engine] command to be set", output.file_type);
    }
    Ok(())
}

/// Settings-file connection (named, or the default one) overlaid with flags.
fn resolve_connection(
    settings: &Settings,
    args: ConnectionArgs,
) -> Result<ConnectionParams, GenerateError> {
    let mut params = match (&args.connection, &args.url) {
        (Some(name), _) => settings
            .get_connection(name)
            .and_then(|c| c.to_params())
            .map_err(ConfigError::from)?,
        (None, Some(_)) => ConnectionParams::default(),
        (None, None) => match settings.default_connection() {
            Some((_, conn)) => conn.to_params().map_err(ConfigError::from)?,
            None => ConnectionParams::from_env().unwrap_or_default(),
        },
    };

    if let Some(driver) = args.driver {
        params.driver = Some(driver);
    }
    if let Some(url) = args.url {
        params.url = url;
    }
    if let Some(username) = args.username {
        params.username = Some(username);
    }
    if let Some(password) = args.password {
        params.password = Some(password);
    }
    if let Some(schema) = args.schema {
        params.schema = Some(schema).filter(|s| !s.is_empty());
    }

    Ok(params)
}

/// Filter flags replace the settings file's include or exclude patterns.
fn resolve_filter(settings: &Settings, args: FilterArgs) -> FilterSpec {
    settings.filter.clone().overridden_by(args.into_spec())
}

fn resolve_output(settings: &Settings, args: OutputArgs) -> Result<OutputOptions, GenerateError> {
    let mut output = OutputOptions::from_settings(&settings.output)?;

    if let Some(dir) = args.output {
        output = output.with_dir(dir);
    }
    if let Some(title) = args.title {
        output = output.with_title(title);
    }
    if let Some(file_type) = args.file_type {
        output = output.with_file_type(file_type.parse()?);
    }
    if let Some(version) = args.doc_version {
        output = output.with_version(version);
    }
    if let Some(description) = args.description {
        output = output.with_description(description);
    }

    Ok(output)
}

impl FilterArgs {
    fn into_spec(self) -> FilterSpec {
        FilterSpec::new()
            .include_names(self.table_names)
            .include_prefixes(self.table_prefixes)
            .include_suffixes(self.table_suffixes)
            .exclude_names(self.ignore_table_names)
            .exclude_prefixes(self.ignore_table_prefixes)
            .exclude_suffixes(self.ignore_table_suffixes)
    }
}
