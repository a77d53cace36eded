//! `invcat cat` command - Category management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::Tabled;
use tracing::info;

use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::output::{self, field, id_set, print_created, print_done, rule};
use crate::cli::{prompt, GlobalOpts};
use crate::core::catalog;
use crate::core::entity::EntityKind;
use crate::entities::{Category, CategoryUpdate};

#[derive(Subcommand, Debug)]
pub enum CatCommands {
    /// List categories
    List(ListArgs),

    /// Create a new category
    New(NewArgs),

    /// Show a category's details
    Show(ShowArgs),

    /// Change a category's name or description
    Edit(EditArgs),

    /// Delete a category, removing it from every product
    Delete(DeleteArgs),

    /// Put a product in a category
    AddProduct(LinkArgs),

    /// Take a product out of a category
    RemoveProduct(LinkArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only categories whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Category name
    #[arg(long, short = 'n', required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Use this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Category id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Category id
    pub id: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Prompt for every field, pre-filled with current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Category id
    pub id: String,

    /// Suppress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(clap::Args, Debug)]
pub struct LinkArgs {
    /// Category id
    pub category: String,

    /// Product id
    pub product: String,
}

#[derive(Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
    #[tabled(rename = "PRODUCTS")]
    pub products: usize,
}

pub fn row(cat: &Category) -> CategoryRow {
    CategoryRow {
        id: cat.id.clone(),
        name: truncate_str(&cat.name, 30),
        description: truncate_str(&cat.description, 40),
        products: cat.product_ids.len(),
    }
}

pub fn print_detail(cat: &Category) {
    rule();
    field("ID", style(&cat.id).cyan());
    field("Name", style(&cat.name).yellow());
    rule();
    if !cat.description.is_empty() {
        println!("{}", cat.description);
    }
    id_set("Products", cat.product_ids.iter());
}

/// Run a category subcommand
pub fn run(cmd: CatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatCommands::List(args) => run_list(args, global),
        CatCommands::New(args) => run_new(args, global),
        CatCommands::Show(args) => run_show(args, global),
        CatCommands::Edit(args) => run_edit(args, global),
        CatCommands::Delete(args) => run_delete(args, global),
        CatCommands::AddProduct(args) => run_add_product(args, global),
        CatCommands::RemoveProduct(args) => run_remove_product(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let mut categories = catalog::list_categories(store.conn()).into_diagnostic()?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        categories.retain(|c| c.name.to_lowercase().contains(&needle));
    }

    if args.count {
        println!("{}", categories.len());
        return Ok(());
    }

    output::print_list(&categories, global.output(), row)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (name, description) = if args.interactive {
        (prompt::text("Name")?, prompt::optional_text("Description")?)
    } else {
        (args.name.unwrap_or_default(), args.description)
    };

    let mut store = open_store(global)?;
    let id = catalog::create_category(store.conn_mut(), &name, &description, args.id.as_deref())
        .into_diagnostic()?;
    info!(%id, "category created");

    print_created(EntityKind::Category, &id, &name, global.output())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let cat = catalog::read_category(store.conn(), &args.id).into_diagnostic()?;
    output::print_entity(&cat, global.output(), print_detail)
}

/// Prompt for name and description, keeping only the values that changed
pub fn prompt_category_edits(current: &Category) -> Result<CategoryUpdate> {
    let name = prompt::text_with_default("Name", &current.name)?;
    let description = prompt::text_with_default("Description", &current.description)?;
    Ok(CategoryUpdate {
        name: (name != current.name).then_some(name),
        description: (description != current.description).then_some(description),
    })
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;

    let update = if args.interactive {
        let current = catalog::read_category(store.conn(), &args.id).into_diagnostic()?;
        prompt_category_edits(&current)?
    } else {
        CategoryUpdate {
            name: args.name,
            description: args.description,
        }
    };

    if update.is_empty() {
        println!("{}", style("Nothing to change.").dim());
        return Ok(());
    }

    catalog::update_category(store.conn_mut(), &args.id, &update).into_diagnostic()?;
    info!(id = %args.id, "category updated");
    print_done("Updated", EntityKind::Category, &args.id, global.output());
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::delete_category(store.conn_mut(), &args.id).into_diagnostic()?;
    info!(id = %args.id, "category deleted");

    if !args.quiet {
        print_done("Deleted", EntityKind::Category, &args.id, global.output());
    }
    Ok(())
}

fn run_add_product(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::add_product_to_category(store.conn_mut(), &args.category, &args.product)
        .into_diagnostic()?;
    info!(category = %args.category, product = %args.product, "product added to category");
    println!(
        "{} Added product {} to category {}",
        style("✓").green(),
        style(&args.product).cyan(),
        style(&args.category).cyan()
    );
    Ok(())
}

fn run_remove_product(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::remove_product_from_category(store.conn_mut(), &args.category, &args.product)
        .into_diagnostic()?;
    info!(category = %args.category, product = %args.product, "product removed from category");
    println!(
        "{} Removed product {} from category {}",
        style("✓").green(),
        style(&args.product).cyan(),
        style(&args.category).cyan()
    );
    Ok(())
}
