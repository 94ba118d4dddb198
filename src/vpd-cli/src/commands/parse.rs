//! Parse command handler

use anyhow::{Context, Result};
use std::path::PathBuf;
use vpd::{ParseOptions, Parser, Store};

use super::load_source;

pub fn handle(
    input: Option<PathBuf>,
    offset: Option<u32>,
    inventory_path: &str,
    options: ParseOptions,
    json: bool,
) -> Result<()> {
    let source = load_source(input, offset)?;
    let parser = Parser::new(&source.image, inventory_path, &source.path, source.offset)
        .with_options(options);

    let store = parser
        .run()
        .with_context(|| format!("Failed to parse VPD from {}", source.path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&store)?);
    } else {
        print!("{}", render(&store));
    }

    for issue in store.issues() {
        eprintln!("warning: {}", issue);
    }

    Ok(())
}

/// Plain-text listing, one record per block
fn render(store: &Store) -> String {
    let mut out = String::new();
    for (name, keywords) in store.records() {
        out.push_str(&format!("{}\n", name));
        for (keyword, value) in keywords.iter() {
            out.push_str(&format!("  {}: {}\n", keyword, value));
        }
    }
    out
}
