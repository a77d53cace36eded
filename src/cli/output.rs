//! Output formatting utilities

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::OutputFormat;
use crate::core::entity::{Entity, EntityKind};

/// Determine the effective output format based on context
pub fn effective_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => OutputFormat::Table,
        other => other,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Render rows as tab-separated values with a header line
pub fn tsv<R: Tabled>(rows: &[R]) -> String {
    let mut out = R::headers().join("\t");
    out.push('\n');
    for row in rows {
        let fields: Vec<String> = row
            .fields()
            .iter()
            .map(|f| f.replace(['\t', '\n'], " "))
            .collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

/// Render rows as a bordered table
pub fn table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::sharp()).to_string()
}

/// Print a list of entities in the requested format
///
/// `to_row` maps each entity to its table row for the table and TSV formats.
pub fn print_list<T, R, F>(items: &[T], format: OutputFormat, to_row: F) -> Result<()>
where
    T: Entity,
    R: Tabled,
    F: Fn(&T) -> R,
{
    match effective_format(format) {
        OutputFormat::Json => print_json(items)?,
        OutputFormat::Yaml => print_yaml(items)?,
        OutputFormat::Id => {
            for item in items {
                println!("{}", item.id());
            }
        }
        OutputFormat::Tsv => {
            let rows: Vec<R> = items.iter().map(to_row).collect();
            print!("{}", tsv(&rows));
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if items.is_empty() {
                println!("No {} found.", plural(T::KIND));
                return Ok(());
            }
            let rows: Vec<R> = items.iter().map(to_row).collect();
            println!("{}", table(&rows));
            println!(
                "{} {} found.",
                style(items.len()).cyan(),
                if items.len() == 1 {
                    T::KIND.to_string()
                } else {
                    plural(T::KIND).to_string()
                }
            );
        }
    }
    Ok(())
}

/// Print one entity; `detail` renders the styled view used by the table format
pub fn print_entity<T, F>(item: &T, format: OutputFormat, detail: F) -> Result<()>
where
    T: Entity,
    F: FnOnce(&T),
{
    match effective_format(format) {
        OutputFormat::Json => print_json(item)?,
        OutputFormat::Yaml => print_yaml(item)?,
        OutputFormat::Id => println!("{}", item.id()),
        OutputFormat::Tsv => {
            let value = serde_json::to_value(item).into_diagnostic()?;
            if let serde_json::Value::Object(map) = value {
                for (key, value) in map {
                    println!("{}\t{}", key, flatten_value(&value));
                }
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            println!("{} {}", style(T::KIND).dim(), style(item.title()).bold());
            detail(item);
        }
    }
    Ok(())
}

/// Render a JSON value on one line, joining arrays with commas
fn flatten_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(flatten_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Report a newly created entity
pub fn print_created(kind: EntityKind, id: &str, title: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Id => println!("{}", id),
        OutputFormat::Json => print_json(&serde_json::json!({ "kind": kind, "id": id }))?,
        OutputFormat::Yaml => print_yaml(&serde_json::json!({ "kind": kind, "id": id }))?,
        _ => {
            println!(
                "{} Created {} {}",
                style("✓").green(),
                kind,
                style(id).cyan()
            );
            println!("   {}", style(title).yellow());
        }
    }
    Ok(())
}

/// Report a completed change to an existing entity
pub fn print_done(verb: &str, kind: EntityKind, id: &str, format: OutputFormat) {
    match format {
        OutputFormat::Id => println!("{}", id),
        OutputFormat::Json | OutputFormat::Yaml => {}
        _ => println!(
            "{} {} {} {}",
            style("✓").green(),
            verb,
            kind,
            style(id).cyan()
        ),
    }
}

/// Print the horizontal rule used to frame detail views
pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

/// Print a labelled field of a detail view
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("{}: {}", style(label).bold(), value);
}

/// Print a labelled id set, one id per line
pub fn id_set<'a>(label: &str, ids: impl ExactSizeIterator<Item = &'a String>) {
    let count = ids.len();
    println!();
    if count == 0 {
        println!("{}: {}", style(label).bold(), style("none").dim());
        return;
    }
    println!("{} ({}):", style(label).bold(), count);
    for id in ids {
        println!("  • {}", style(id).cyan());
    }
}

pub fn plural(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Product => "products",
        EntityKind::Supplier => "suppliers",
        EntityKind::Category => "categories",
        EntityKind::Image => "images",
    }
}
