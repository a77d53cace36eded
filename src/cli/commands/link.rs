//! `invcat link` command - Relationships between catalog entities

use console::style;
use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::cli::helpers::open_store;
use crate::cli::output::plural;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::EntityKind;
use crate::core::links::{self, Relation};

#[derive(clap::Subcommand, Debug)]
pub enum LinkCommands {
    /// Link two entities (product with supplier, category or image)
    Add(LinkPairArgs),

    /// Remove a link between two entities
    Remove(LinkPairArgs),

    /// Show every entity linked to one entity
    Show(ShowLinksArgs),

    /// Find links that reference entities which no longer exist
    Check(CheckLinksArgs),
}

#[derive(clap::Args, Debug)]
pub struct LinkPairArgs {
    /// Kind of the first entity (product, sup, cat, img)
    pub kind: EntityKind,

    /// Id of the first entity
    pub id: String,

    /// Kind of the second entity
    pub other_kind: EntityKind,

    /// Id of the second entity
    pub other_id: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowLinksArgs {
    /// Entity kind (product, sup, cat, img)
    pub kind: EntityKind,

    /// Entity id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct CheckLinksArgs {
    /// Fix broken links by removing them
    #[arg(long)]
    pub fix: bool,
}

/// Run a link subcommand
pub fn run(cmd: LinkCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LinkCommands::Add(args) => run_add(args, global),
        LinkCommands::Remove(args) => run_remove(args, global),
        LinkCommands::Show(args) => run_show(args, global),
        LinkCommands::Check(args) => run_check(args, global),
    }
}

fn run_add(args: LinkPairArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    links::add_link(
        store.conn_mut(),
        args.kind,
        &args.id,
        args.other_kind,
        &args.other_id,
    )
    .into_diagnostic()?;
    let (id, other_id) = (args.id.trim(), args.other_id.trim());
    info!(%id, %other_id, "link added");

    println!(
        "{} Linked {} {} {} {} {}",
        style("✓").green(),
        args.kind,
        style(id).cyan(),
        style("↔").dim(),
        args.other_kind,
        style(other_id).cyan()
    );
    Ok(())
}

fn run_remove(args: LinkPairArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    links::remove_link(
        store.conn_mut(),
        args.kind,
        &args.id,
        args.other_kind,
        &args.other_id,
    )
    .into_diagnostic()?;
    let (id, other_id) = (args.id.trim(), args.other_id.trim());
    info!(%id, %other_id, "link removed");

    println!(
        "{} Unlinked {} {} {} {} {}",
        style("✓").green(),
        args.kind,
        style(id).cyan(),
        style("↔").dim(),
        args.other_kind,
        style(other_id).cyan()
    );
    Ok(())
}

fn run_show(args: ShowLinksArgs, global: &GlobalOpts) -> Result<()> {
    let id = args.id.trim();
    let store = open_store(global)?;

    let related: Vec<EntityKind> = EntityKind::all()
        .iter()
        .copied()
        .filter(|other| Relation::between(args.kind, *other).is_some())
        .collect();

    let mut groups = Vec::new();
    for other in related {
        let ids = links::links_of(store.conn(), args.kind, id, other).into_diagnostic()?;
        groups.push((other, ids));
    }

    match global.output() {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = groups
                .iter()
                .map(|(kind, ids)| (plural(*kind).to_string(), serde_json::json!(ids)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let map: std::collections::BTreeMap<&str, _> = groups
                .iter()
                .map(|(kind, ids)| (plural(*kind), ids))
                .collect();
            print!("{}", serde_yml::to_string(&map).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for (_, ids) in &groups {
                for linked in ids {
                    println!("{}", linked);
                }
            }
        }
        OutputFormat::Tsv => {
            for (kind, ids) in &groups {
                for linked in ids {
                    println!("{}\t{}", kind, linked);
                }
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            println!("{} {}", args.kind, style(id).cyan());
            for (kind, ids) in &groups {
                println!();
                println!("{} ({}):", style(plural(*kind)).bold(), ids.len());
                if ids.is_empty() {
                    println!("  {}", style("(none)").dim());
                }
                for linked in ids {
                    println!("  {} {}", style("→").dim(), linked);
                }
            }
        }
    }
    Ok(())
}

fn run_check(args: CheckLinksArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;

    println!("{} Checking links...\n", style("→").blue());

    let dangling = links::check_links(store.conn()).into_diagnostic()?;
    for link in &dangling {
        warn!(
            relation = %link.relation,
            product = %link.product_id,
            other = %link.other_id,
            "dangling link"
        );
        println!(
            "  {} {} {} → {} ({})",
            style("✗").red(),
            link.relation,
            link.product_id,
            link.other_id,
            style(format!("{} not found", link.missing)).red()
        );
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());

    if dangling.is_empty() {
        println!("{} All links are valid!", style("✓").green().bold());
        return Ok(());
    }

    if args.fix {
        let removed = links::repair_links(store.conn_mut()).into_diagnostic()?;
        info!(removed, "repaired dangling links");
        println!(
            "{} Removed {} broken row(s)",
            style("✓").green(),
            style(removed).cyan()
        );
        Ok(())
    } else {
        Err(miette::miette!(
            help = "run `invcat link check --fix` to remove them",
            "{} broken link(s) found",
            dangling.len()
        ))
    }
}
