use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use molic::SavedLayout;

#[derive(Parser)]
#[command(name = "molic", about = "Compile MoLIC interaction diagrams into renderable graph JSON")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Saved layout JSON whose positions and anchors are kept
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Write the resulting layout JSON to this file
    #[arg(long)]
    save_layout: Option<PathBuf>,

    /// Pretty-print the graph JSON
    #[arg(long)]
    pretty: bool,

    /// Only check the syntax
    #[arg(long)]
    check: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("ERROR: {message}");
    std::process::exit(1);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format_args!("failed to read {}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .unwrap_or_else(|e| fail(format_args!("failed to read stdin: {e}")));
            buf
        }
    };

    if cli.check {
        match molic::parse_molic(&input) {
            Ok(_) => println!("ok"),
            Err(e) => fail(e),
        }
        return;
    }

    let saved = cli.layout.as_ref().map(|path| match std::fs::read_to_string(path) {
        Ok(json) => SavedLayout::load_or_default(&json),
        Err(e) => {
            log::warn!("ignoring saved layout {}: {e}", path.display());
            SavedLayout::default()
        }
    });

    let graph = molic::compile_with_layout(&input, saved.as_ref()).unwrap_or_else(|e| fail(e));

    let json = if cli.pretty {
        serde_json::to_string_pretty(&graph)
    } else {
        serde_json::to_string(&graph)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }

    if let Some(path) = &cli.save_layout {
        let written = SavedLayout::capture(&graph)
            .to_json()
            .and_then(|json| Ok(std::fs::write(path, json)?));
        if let Err(e) = written {
            fail(format_args!("failed to write {}: {e}", path.display()));
        }
    }
}
