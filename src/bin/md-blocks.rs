use clap::{Parser, Subcommand};
use md_blocks::{Block, Config, Document, EditOp, check_list_depths, same_structure};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints the block sequence of a Markdown file as JSON
    Parse { file: PathBuf },
    /// Prints the normalized Markdown of a file
    Fmt { file: PathBuf },
    /// Applies a JSON array of edit operations and prints the result
    Apply {
        file: PathBuf,
        #[arg(long)]
        ops: PathBuf,
        /// Print blocks as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Checks list depths and round-trip stability
    Check { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => or_exit(Config::load(path)),
        None => Config::default(),
    };

    match &cli.command {
        Commands::Parse { file } => parse_command(file, config),
        Commands::Fmt { file } => fmt_command(file, config),
        Commands::Apply { file, ops, json } => apply_command(file, ops, *json, config),
        Commands::Check { file } => check_command(file, config),
    }
}

fn or_exit<T, E: Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}

/// Reads Markdown, or a block sequence previously printed by `parse` when the file
/// has a `.json` extension.
fn load(file: &Path, config: Config) -> Document {
    let text = or_exit(fs::read_to_string(file));
    if file.extension().is_some_and(|ext| ext == "json") {
        let blocks: Vec<Block> = or_exit(serde_json::from_str(&text));
        return Document::from_blocks(blocks).with_config(config);
    }
    Document::parse_with_config(&text, config)
}

fn print_blocks(doc: &Document) {
    println!("{}", or_exit(serde_json::to_string_pretty(doc.blocks())));
}

fn parse_command(file: &Path, config: Config) {
    print_blocks(&load(file, config));
}

fn fmt_command(file: &Path, config: Config) {
    println!("{}", load(file, config).serialize());
}

fn apply_command(file: &Path, ops: &Path, json: bool, config: Config) {
    let mut doc = load(file, config);
    let script = or_exit(fs::read_to_string(ops));
    let ops: Vec<EditOp> = or_exit(serde_json::from_str(&script));
    let total = ops.len();
    let applied = doc.apply_all(ops);
    eprintln!("Applied {applied} of {total} operations");

    if json {
        print_blocks(&doc);
    } else {
        println!("{}", doc.serialize());
    }
}

fn check_command(file: &Path, config: Config) {
    let doc = load(file, config.clone());
    let mut failed = false;

    if let Err(violation) = check_list_depths(doc.blocks()) {
        println!("Depth: {violation}");
        failed = true;
    }

    let reparsed = Document::parse_with_config(&doc.serialize(), config);
    if !same_structure(doc.blocks(), reparsed.blocks()) {
        println!(
            "Round trip: {} blocks became {} blocks or changed shape",
            doc.len(),
            reparsed.len()
        );
        failed = true;
    }

    if failed {
        process::exit(1);
    }
    println!("OK: {} blocks", doc.len());
}
