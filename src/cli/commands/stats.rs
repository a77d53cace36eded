//! `invcat stats` command - Store statistics

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::open_store;
use crate::cli::output::{effective_format, field, rule};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::StoreStats;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let stats = store.statistics().into_diagnostic()?;
    print_stats(&stats, global.output())
}

pub fn print_stats(stats: &StoreStats, format: OutputFormat) -> Result<()> {
    match effective_format(format) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(stats).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(stats).into_diagnostic()?),
        OutputFormat::Tsv | OutputFormat::Id => {
            for (name, count) in rows(stats) {
                println!("{}\t{}", name, count);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            rule();
            for (name, count) in rows(stats) {
                field(name, style(count).cyan());
            }
            rule();
        }
    }
    Ok(())
}

fn rows(stats: &StoreStats) -> [(&'static str, usize); 6] {
    [
        ("products", stats.products),
        ("suppliers", stats.suppliers),
        ("categories", stats.categories),
        ("images", stats.images),
        ("supplier_links", stats.supplier_links),
        ("category_links", stats.category_links),
    ]
}
