//! gridform entrypoint: load a sparse CSV/TSV grid, run the parsing
//! pipeline, print the style map and structural summary as JSON.

mod config;
mod output;

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Once,
};

use anyhow::{Context, Result};
use clap::Parser;
use grid_core::{GridView, InMemoryGrid};
use grid_parse::ParseConfig;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "gridform", version, about = "Spatial structure parser for sparse 2-D cell grids")]
struct Args {
    /// Path to a delimiter-separated input file. Reads stdin if omitted.
    pub path: Option<PathBuf>,
    /// Field delimiter, a single byte (default ',', or '\t' when `path` ends in `.tsv`).
    #[arg(long)]
    pub delimiter: Option<char>,
    /// Override the block-level container expansion parameter (default 2).
    #[arg(long = "expand-block")]
    pub expand_block: Option<i64>,
    /// Optional configuration file path (overrides discovery of `gridform.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Result<Option<WorkerGuard>> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("gridform.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "gridform.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Ok(Some(guard)),
        Err(_) => {
            // Global subscriber already installed (e.g. under a test harness).
            Ok(None)
        }
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "gridform.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => fs::read_to_string(p).with_context(|| format!("reading {}", p.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn resolve_delimiter(args: &Args) -> u8 {
    if let Some(c) = args.delimiter {
        return c as u8;
    }
    let is_tsv = args
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_tsv {
        b'\t'
    } else {
        b','
    }
}

fn main() -> Result<()> {
    let _log_guard = configure_logging()?;
    install_panic_hook();

    let args = Args::parse();
    let config_file = config::load_from(args.config.clone())?;
    let block_expand = args.expand_block.unwrap_or(config_file.container.block_expand);

    let text = read_input(args.path.as_deref())?;
    let delimiter = resolve_delimiter(&args);
    let grid = InMemoryGrid::from_delimited(&text, delimiter);
    let (rows, cols) = grid.dimensions();
    info!(target: "gridform.startup", rows, cols, block_expand, "loaded grid");

    let parse_config = ParseConfig { block_expand };
    let result = grid_parse::parse(&grid, &parse_config);

    let doc = output::render(&result);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
