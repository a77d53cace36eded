//! `invcat sup` command - Supplier management

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
use crate::entities::{Supplier, SupplierUpdate};

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers
    List(ListArgs),

    /// Create a new supplier
    New(NewArgs),

    /// Show a supplier's details
    Show(ShowArgs),

    /// Change a supplier's name or contact
    Edit(EditArgs),

    /// Delete a supplier, unlinking it from every product
    Delete(DeleteArgs),

    /// Link a product to a supplier
    AddProduct(LinkArgs),

    /// Unlink a product from a supplier
    RemoveProduct(LinkArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only suppliers whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Supplier name
    #[arg(long, short = 'n', required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Contact email address
    #[arg(long, short = 'c', required_unless_present = "interactive")]
    pub contact: Option<String>,

    /// Use this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Supplier id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Supplier id
    pub id: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New contact email
    #[arg(long, short = 'c')]
    pub contact: Option<String>,

    /// Prompt for every field, pre-filled with current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Supplier id
    pub id: String,

    /// Suppress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(clap::Args, Debug)]
pub struct LinkArgs {
    /// Supplier id
    pub supplier: String,

    /// Product id
    pub product: String,
}

#[derive(Tabled)]
pub struct SupplierRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "CONTACT")]
    pub contact: String,
    #[tabled(rename = "PRODUCTS")]
    pub products: usize,
}

pub fn row(sup: &Supplier) -> SupplierRow {
    SupplierRow {
        id: sup.id.clone(),
        name: truncate_str(&sup.name, 40),
        contact: sup.contact.clone(),
        products: sup.product_ids.len(),
    }
}

/// Styled detail view
pub fn print_detail(sup: &Supplier) {
    rule();
    field("ID", style(&sup.id).cyan());
    field("Name", style(&sup.name).yellow());
    field("Contact", &sup.contact);
    rule();
    id_set("Products", sup.product_ids.iter());
}

/// Run a supplier subcommand
pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List(args) => run_list(args, global),
        SupCommands::New(args) => run_new(args, global),
        SupCommands::Show(args) => run_show(args, global),
        SupCommands::Edit(args) => run_edit(args, global),
        SupCommands::Delete(args) => run_delete(args, global),
        SupCommands::AddProduct(args) => run_add_product(args, global),
        SupCommands::RemoveProduct(args) => run_remove_product(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let mut suppliers = catalog::list_suppliers(store.conn()).into_diagnostic()?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        suppliers.retain(|s| s.name.to_lowercase().contains(&needle));
    }
    if let Some(limit) = args.limit {
        suppliers.truncate(limit);
    }

    if args.count {
        println!("{}", suppliers.len());
        return Ok(());
    }

    output::print_list(&suppliers, global.output(), row)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (name, contact, id) = if args.interactive {
        (
            prompt::text("Name")?,
            prompt::text("Contact email")?,
            match args.id {
                Some(id) => Some(id),
                None => prompt::optional_id("Id")?,
            },
        )
    } else {
        (
            args.name.unwrap_or_default(),
            args.contact.unwrap_or_default(),
            args.id,
        )
    };

    let mut store = open_store(global)?;
    let id = catalog::create_supplier(store.conn_mut(), &name, &contact, id.as_deref())
        .into_diagnostic()?;
    info!(%id, "supplier created");

    print_created(EntityKind::Supplier, &id, &name, global.output())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let sup = catalog::read_supplier(store.conn(), &args.id).into_diagnostic()?;
    output::print_entity(&sup, global.output(), print_detail)
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;

    let update = if args.interactive {
        let current = catalog::read_supplier(store.conn(), &args.id).into_diagnostic()?;
        let name = prompt::text_with_default("Name", &current.name)?;
        let contact = prompt::text_with_default("Contact email", &current.contact)?;
        edits(&current, name, contact)
    } else {
        SupplierUpdate {
            name: args.name,
            contact: args.contact,
        }
    };

    if update.is_empty() {
        println!("{}", style("Nothing to change.").dim());
        return Ok(());
    }

    catalog::update_supplier(store.conn_mut(), &args.id, &update).into_diagnostic()?;
    info!(id = %args.id, "supplier updated");
    print_done("Updated", EntityKind::Supplier, &args.id, global.output());
    Ok(())
}

/// Build an update holding only the fields that differ from `current`
pub fn edits(current: &Supplier, name: String, contact: String) -> SupplierUpdate {
    SupplierUpdate {
        name: (name != current.name).then_some(name),
        contact: (contact != current.contact).then_some(contact),
    }
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::delete_supplier(store.conn_mut(), &args.id).into_diagnostic()?;
    info!(id = %args.id, "supplier deleted");

    if !args.quiet {
        print_done("Deleted", EntityKind::Supplier, &args.id, global.output());
    }
    Ok(())
}

fn run_add_product(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::add_product_to_supplier(store.conn_mut(), &args.supplier, &args.product)
        .into_diagnostic()?;
    info!(supplier = %args.supplier, product = %args.product, "product linked to supplier");
    print_link("Linked", &args);
    Ok(())
}

fn run_remove_product(args: LinkArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::remove_product_from_supplier(store.conn_mut(), &args.supplier, &args.product)
        .into_diagnostic()?;
    info!(supplier = %args.supplier, product = %args.product, "product unlinked from supplier");
    print_link("Unlinked", &args);
    Ok(())
}

fn print_link(verb: &str, args: &LinkArgs) {
    println!(
        "{} {} product {} {} supplier {}",
        style("✓").green(),
        verb,
        style(&args.product).cyan(),
        style("↔").dim(),
        style(&args.supplier).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn acme() -> Supplier {
        Supplier {
            id: "f47ac10b-58cc-4372-a567-0e02b2c3d479".to_string(),
            name: "Acme".to_string(),
            contact: "a@acme.com".to_string(),
            product_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn test_edits_only_changed_fields() {
        let update = edits(&acme(), "Acme".to_string(), "b@acme.com".to_string());
        assert_eq!(update.name, None);
        assert_eq!(update.contact.as_deref(), Some("b@acme.com"));

        let unchanged = edits(&acme(), "Acme".to_string(), "a@acme.com".to_string());
        assert!(unchanged.is_empty());
    }

    #[test]
    fn test_row() {
        let r = row(&acme());
        assert_eq!(r.name, "Acme");
        assert_eq!(r.products, 0);
    }
}
