//! Retag a document
//!
//! Replaces a document's tags with a fresh auto-tagged tree, promotes headings,
//! marks the first table row as header cells, sets figure alternate text, and
//! saves the result with a rebuilt parent tree.
//!
//! Usage:
//!   cargo run --release --bin retag -- input.json output.json
//!   cargo run --release --bin retag -- input.json output.json --config retag.json --dump

use pdf_tagtree::session::{DocumentStore, JsonDocumentStore, MarkedContentTagger, Session};
use pdf_tagtree::structure::{dump_tree, extract_reading_order};
use pdf_tagtree::RetagConfig;
use std::path::{Path, PathBuf};
use std::time::Instant;

struct RetagArgs {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    title: Option<String>,
    dump: bool,
    verbose: bool,
}

impl RetagArgs {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut config = None;
        let mut title = None;
        let mut dump = false;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                    config = Some(PathBuf::from(args.get(i)?));
                },
                "--title" => {
                    i += 1;
                    title = Some(args.get(i)?.clone());
                },
                "--dump" => {
                    dump = true;
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other => positional.push(PathBuf::from(other)),
            }
            i += 1;
        }

        if positional.len() != 2 {
            return None;
        }
        let output = positional.pop()?;
        let input = positional.pop()?;
        Some(Self {
            input,
            output,
            config,
            title,
            dump,
            verbose,
        })
    }
}

fn load_config(args: &RetagArgs) -> pdf_tagtree::Result<RetagConfig> {
    let mut config = match &args.config {
        Some(path) => RetagConfig::from_json_file(path)?,
        None => RetagConfig::default(),
    };
    if let Some(title) = &args.title {
        config = config.with_document_title(title.clone());
    }
    Ok(config)
}

fn dump_saved(path: &Path) -> pdf_tagtree::Result<()> {
    let mut store = JsonDocumentStore::new();
    let doc = store.open(path)?;
    if let Some(tree) = doc.struct_tree() {
        print!("{}", dump_tree(tree));
        for page in 0..doc.page_count() as u32 {
            println!("Reading order, page {}: {:?}", page + 1, extract_reading_order(tree, page));
        }
    }
    store.close(doc);
    Ok(())
}

fn main() {
    env_logger::init();

    let Some(args) = RetagArgs::from_args() else {
        eprintln!("Usage: retag <input.json> <output.json> [--config FILE] [--title TITLE] [--dump] [--verbose]");
        std::process::exit(1);
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        },
    };

    let start_time = Instant::now();
    let mut session = Session::new(JsonDocumentStore::new().pretty(true), MarkedContentTagger::new())
        .with_config(config);

    let report = match session.run(&args.input, &args.output) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Retagging {} failed: {}", args.input.display(), e);
            std::process::exit(1);
        },
    };

    println!(
        "Retagged {} -> {} in {:.2}s",
        args.input.display(),
        args.output.display(),
        start_time.elapsed().as_secs_f64()
    );
    println!("  Elements:          {}", report.elements);
    println!("  Headings promoted: {}", report.headings_promoted);
    println!("  Header cells:      {}", report.header_cells);
    println!("  Parent tree size:  {}", report.parent_tree_entries);

    if args.verbose {
        println!("  Pages cleared:     {}", report.pages_cleared);
        if let Some(figure) = report.figure_with_alt {
            println!("  Alt text set on:   {}", figure);
        }
        for lookup in &report.labeled {
            match lookup.node {
                Some(node) => println!("  {} {:?}: {}", lookup.struct_type, lookup.title, node),
                None => println!("  {} {:?}: not found", lookup.struct_type, lookup.title),
            }
        }
    }
    for reason in &report.skipped {
        println!("  Skipped {}", reason);
    }

    if args.dump {
        if let Err(e) = dump_saved(&args.output) {
            eprintln!("Failed to dump {}: {}", args.output.display(), e);
            std::process::exit(1);
        }
    }
}
