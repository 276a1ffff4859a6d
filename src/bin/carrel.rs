//! Command-line front-end: index document files into a sharded index on
//! disk, and search an existing index.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carrel::core::error::{Error, ErrorKind, Result};
use carrel::index::index::Index;
use carrel::record::decode::DataType;

#[derive(Parser)]
#[command(name = "carrel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Index and search documents backed by static shard files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a document file, or every file under a directory
    #[command(alias = "i")]
    Index {
        /// Document file or directory path
        path: PathBuf,
        /// Document file data type [text, json, jsonl]
        #[arg(long = "type", default_value = "text")]
        data_type: String,
        /// Name of the index
        #[arg(long, default_value = "index")]
        index: String,
        /// Number of shards
        #[arg(long, default_value_t = 1000)]
        shards: u32,
        /// Field to be used for document ID
        #[arg(long)]
        id_field: Option<String>,
        /// Plugin that provides the documents to index
        #[arg(long)]
        plugin: Option<String>,
    },
    /// Search documents containing the specified terms
    #[command(alias = "s")]
    Search {
        /// Query terms
        query: String,
        /// Name of the index
        #[arg(long, default_value = "index")]
        index: String,
        /// Format of the search result output [go, json]
        #[arg(long, default_value = "go")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "carrel=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Index {
            path,
            data_type,
            index,
            shards,
            id_field,
            plugin,
        } => run_index(path, &data_type, &index, shards, id_field.as_deref(), plugin.as_deref()),
        Commands::Search { query, index, format } => run_search(&query, &index, &format),
    }
}

fn run_index(
    path: PathBuf,
    data_type: &str,
    index_name: &str,
    shards: u32,
    id_field: Option<&str>,
    plugin: Option<&str>,
) -> Result<()> {
    let data_type: DataType = data_type.parse()?;
    let mut index = open_or_create(index_name)?;

    if let Some(plugin) = plugin {
        let data = plugin_data(plugin, &path)?;
        match id_field {
            Some(field) => index.index_data_with_id_field(&data, data_type, field)?,
            None => index.index_data(&data, data_type)?,
        }
    } else if path.is_dir() {
        index_directory(&mut index, &path, data_type, id_field)?;
    } else {
        index_path(&mut index, &path, data_type, id_field)?;
    }

    index.save_to_shards(index_name, shards)?;
    Ok(())
}

fn run_search(query: &str, index_name: &str, format: &str) -> Result<()> {
    let mut index = Index::load_deferred(index_name)?;
    let result = index.search(query)?;

    if format == "json" {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{:#?}", result);
    }
    Ok(())
}

/// Reopen an existing index to add to it, or start a fresh one when
/// nothing has been saved under this name yet.
fn open_or_create(index_name: &str) -> Result<Index> {
    match Index::load(index_name) {
        Ok(index) => Ok(index),
        Err(err) if err.kind == ErrorKind::NotFound => Ok(Index::new()),
        Err(err) => Err(err),
    }
}

fn index_directory(
    index: &mut Index,
    dir: &Path,
    data_type: DataType,
    id_field: Option<&str>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            index_directory(index, &path, data_type, id_field)?;
        } else {
            index_path(index, &path, data_type, id_field)?;
        }
    }
    Ok(())
}

fn index_path(
    index: &mut Index,
    path: &Path,
    data_type: DataType,
    id_field: Option<&str>,
) -> Result<()> {
    tracing::info!("indexing {}", path.display());
    match id_field {
        Some(field) => index.index_file_with_id_field(path, data_type, field),
        None => index.index_file(path, data_type),
    }
}

/// A plugin is a dynamic library at `plugins/<name>/<name>.so` exposing a
/// `Data` symbol that turns its argument into the bytes to index.
type DataFn = unsafe fn(&[String]) -> std::result::Result<Vec<u8>, String>;

fn plugin_data(plugin: &str, path: &Path) -> Result<Vec<u8>> {
    let library_path = format!("plugins/{}/{}.so", plugin, plugin);
    let library = unsafe { libloading::Library::new(&library_path) }
        .map_err(|err| Error::new(ErrorKind::SourceUnavailable, err.to_string()))?;

    let data: libloading::Symbol<DataFn> = unsafe { library.get(b"Data") }
        .map_err(|err| Error::new(ErrorKind::SourceUnavailable, err.to_string()))?;

    let args = vec![path.to_string_lossy().into_owned()];
    unsafe { data(&args) }.map_err(|err| Error::new(ErrorKind::SourceUnavailable, err))
}
