use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};

use sqlobjects::{ParameterBindings, SqlObject, SqlObjectError, SqlObjectsConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlobj", version, about = "Inspect serialized query object trees")]
struct Cli {
    /// Path to a sqlobjects.toml config file
    #[arg(long, global = true, default_value = "sqlobjects.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the query text of a JSON-encoded tree
    Text {
        /// Tree file path, or - for stdin
        file: PathBuf,
        /// Lay out one clause per line
        #[arg(long)]
        pretty: bool,
    },
    /// Obfuscate a tree and print its query text
    Obfuscate {
        /// Tree file path, or - for stdin
        file: PathBuf,
        /// Lay out one clause per line
        #[arg(long)]
        pretty: bool,
    },
    /// Print the stable hash of a tree
    Hash {
        /// Tree file path, or - for stdin
        file: PathBuf,
        /// Combine unordered lists order-sensitively
        #[arg(long, conflicts_with = "loose")]
        strict: bool,
        /// Combine unordered lists order-insensitively
        #[arg(long)]
        loose: bool,
    },
    /// Compare two trees structurally (exit code 1 when they differ)
    Equals {
        /// First tree file path
        a: PathBuf,
        /// Second tree file path
        b: PathBuf,
    },
    /// Print query text with bound literals replaced by parameter names
    Params {
        /// Tree file path, or - for stdin
        file: PathBuf,
        /// JSON array of [value, "@name"] pairs
        bindings: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String, SqlObjectError> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn load_tree(path: &Path) -> Result<SqlObject, SqlObjectError> {
    let tree = serde_json::from_str(&read_input(path)?)?;
    tracing::debug!(path = %path.display(), "loaded tree");
    Ok(tree)
}

fn load_bindings(path: &Path) -> Result<ParameterBindings, SqlObjectError> {
    let pairs: Vec<(serde_json::Value, String)> = serde_json::from_str(&read_input(path)?)?;
    Ok(pairs.into_iter().collect())
}

fn render(tree: &SqlObject, pretty: bool) -> Result<String, SqlObjectError> {
    if pretty {
        sqlobjects::pretty_print(tree)
    } else {
        sqlobjects::serialize(tree)
    }
}

fn run(cli: Cli) -> Result<i32, SqlObjectError> {
    let config = SqlObjectsConfig::load(&cli.config)?;

    match cli.command {
        Commands::Text { file, pretty } => {
            let tree = load_tree(&file)?;
            println!("{}", render(&tree, pretty || config.serializer.pretty)?);
        }
        Commands::Obfuscate { file, pretty } => {
            let tree = load_tree(&file)?;
            let mut session = config.obfuscator();
            let obfuscated = session.obfuscate(&tree)?;
            println!("{}", render(&obfuscated, pretty || config.serializer.pretty)?);
        }
        Commands::Hash { file, strict, loose } => {
            let tree = load_tree(&file)?;
            let strict = if strict || loose { strict } else { config.hasher.strict };
            println!("{}", sqlobjects::hash(&tree, strict));
        }
        Commands::Equals { a, b } => {
            let equal = sqlobjects::equals(&load_tree(&a)?, &load_tree(&b)?);
            println!("{equal}");
            return Ok(if equal { 0 } else { 1 });
        }
        Commands::Params { file, bindings } => {
            let tree = load_tree(&file)?;
            let bindings = load_bindings(&bindings)?;
            println!("{}", sqlobjects::serialize_parameterized(&tree, &bindings)?);
        }
    }
    Ok(0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
