//! `invcat shell` - menu-driven interactive session
//!
//! Keeps one store open for the whole session. A failed action prints its
//! error and returns to the menu; only "Quit" (or Esc) ends the loop.

use std::io::IsTerminal;

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use crate::cli::commands::{cat, img, product, stats, sup};
use crate::cli::helpers::open_store;
use crate::cli::output::{self, print_created, print_done};
use crate::cli::{prompt, GlobalOpts, OutputFormat};
use crate::core::catalog;
use crate::core::entity::EntityKind;
use crate::core::links;
use crate::core::Store;
use crate::entities::{ImageUpdate, SupplierUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ListProducts,
    ShowProduct,
    NewProduct,
    EditProduct,
    DeleteProduct,
    ListSuppliers,
    ShowSupplier,
    NewSupplier,
    EditSupplier,
    DeleteSupplier,
    LinkSupplier,
    UnlinkSupplier,
    ListCategories,
    ShowCategory,
    NewCategory,
    EditCategory,
    DeleteCategory,
    LinkCategory,
    UnlinkCategory,
    ListImages,
    NewImage,
    MoveImage,
    DeleteImage,
    CheckLinks,
    Stats,
    Quit,
}

impl Action {
    const ALL: &'static [Action] = &[
        Action::ListProducts,
        Action::ShowProduct,
        Action::NewProduct,
        Action::EditProduct,
        Action::DeleteProduct,
        Action::ListSuppliers,
        Action::ShowSupplier,
        Action::NewSupplier,
        Action::EditSupplier,
        Action::DeleteSupplier,
        Action::LinkSupplier,
        Action::UnlinkSupplier,
        Action::ListCategories,
        Action::ShowCategory,
        Action::NewCategory,
        Action::EditCategory,
        Action::DeleteCategory,
        Action::LinkCategory,
        Action::UnlinkCategory,
        Action::ListImages,
        Action::NewImage,
        Action::MoveImage,
        Action::DeleteImage,
        Action::CheckLinks,
        Action::Stats,
        Action::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            Action::ListProducts => "List products",
            Action::ShowProduct => "Show product",
            Action::NewProduct => "New product",
            Action::EditProduct => "Edit product",
            Action::DeleteProduct => "Delete product",
            Action::ListSuppliers => "List suppliers",
            Action::ShowSupplier => "Show supplier",
            Action::NewSupplier => "New supplier",
            Action::EditSupplier => "Edit supplier",
            Action::DeleteSupplier => "Delete supplier",
            Action::LinkSupplier => "Add product to supplier",
            Action::UnlinkSupplier => "Remove product from supplier",
            Action::ListCategories => "List categories",
            Action::ShowCategory => "Show category",
            Action::NewCategory => "New category",
            Action::EditCategory => "Edit category",
            Action::DeleteCategory => "Delete category",
            Action::LinkCategory => "Add product to category",
            Action::UnlinkCategory => "Remove product from category",
            Action::ListImages => "List images",
            Action::NewImage => "New image",
            Action::MoveImage => "Move image to another product",
            Action::DeleteImage => "Delete image",
            Action::CheckLinks => "Check links",
            Action::Stats => "Statistics",
            Action::Quit => "Quit",
        }
    }
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Err(miette::miette!(
            help = "run `invcat --help` to see the available subcommands",
            "The interactive shell needs a terminal"
        ));
    }

    let mut store = open_store(global)?;
    let format = global.output();
    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let mut last = 0;

    println!(
        "{} invcat {} - interactive catalog shell",
        style("◆").cyan(),
        env!("CARGO_PKG_VERSION")
    );

    loop {
        println!();
        let selection = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels)
            .default(last)
            .interact_opt()
            .into_diagnostic()?;

        let Some(index) = selection else { break };
        last = index;
        let action = Action::ALL[index];
        if action == Action::Quit {
            break;
        }

        debug!(?action, "shell action");
        if let Err(err) = perform(action, &mut store, format) {
            eprintln!("{:?}", err);
        }
    }

    info!("shell session ended");
    Ok(())
}

fn perform(action: Action, store: &mut Store, format: OutputFormat) -> Result<()> {
    match action {
        Action::ListProducts => {
            let products = catalog::list_products(store.conn()).into_diagnostic()?;
            output::print_list(&products, format, product::row)
        }
        Action::ShowProduct => {
            let id = prompt::text("Product id")?;
            let found = catalog::read_product(store.conn(), &id).into_diagnostic()?;
            output::print_entity(&found, format, product::print_detail)
        }
        Action::NewProduct => {
            let input = product::prompt_new_product()?;
            let id = catalog::create_product(store.conn_mut(), &input).into_diagnostic()?;
            print_created(EntityKind::Product, &id, &input.name, format)
        }
        Action::EditProduct => {
            let id = prompt::text("Product id")?;
            let current = catalog::read_product(store.conn(), &id).into_diagnostic()?;
            let update = product::prompt_product_edits(&current)?;
            if !update.is_empty() {
                catalog::update_product(store.conn_mut(), &id, &update).into_diagnostic()?;
            }
            print_done("Updated", EntityKind::Product, &current.id, format);
            Ok(())
        }
        Action::DeleteProduct => delete(store, EntityKind::Product, format),
        Action::ListSuppliers => {
            let suppliers = catalog::list_suppliers(store.conn()).into_diagnostic()?;
            output::print_list(&suppliers, format, sup::row)
        }
        Action::ShowSupplier => {
            let id = prompt::text("Supplier id")?;
            let found = catalog::read_supplier(store.conn(), &id).into_diagnostic()?;
            output::print_entity(&found, format, sup::print_detail)
        }
        Action::NewSupplier => {
            let name = prompt::text("Name")?;
            let contact = prompt::text("Contact email")?;
            let id = catalog::create_supplier(store.conn_mut(), &name, &contact, None)
                .into_diagnostic()?;
            print_created(EntityKind::Supplier, &id, &name, format)
        }
        Action::EditSupplier => {
            let id = prompt::text("Supplier id")?;
            let current = catalog::read_supplier(store.conn(), &id).into_diagnostic()?;
            let name = prompt::text_with_default("Name", &current.name)?;
            let contact = prompt::text_with_default("Contact email", &current.contact)?;
            let update: SupplierUpdate = sup::edits(&current, name, contact);
            if !update.is_empty() {
                catalog::update_supplier(store.conn_mut(), &id, &update).into_diagnostic()?;
            }
            print_done("Updated", EntityKind::Supplier, &current.id, format);
            Ok(())
        }
        Action::DeleteSupplier => delete(store, EntityKind::Supplier, format),
        Action::LinkSupplier => {
            let (supplier_id, product_ids) = prompt_pair("Supplier id")?;
            for product_id in &product_ids {
                catalog::add_product_to_supplier(store.conn_mut(), &supplier_id, product_id)
                    .into_diagnostic()?;
            }
            print_done("Linked", EntityKind::Supplier, &supplier_id, format);
            Ok(())
        }
        Action::UnlinkSupplier => {
            let (supplier_id, product_ids) = prompt_pair("Supplier id")?;
            for product_id in &product_ids {
                catalog::remove_product_from_supplier(store.conn_mut(), &supplier_id, product_id)
                    .into_diagnostic()?;
            }
            print_done("Unlinked", EntityKind::Supplier, &supplier_id, format);
            Ok(())
        }
        Action::ListCategories => {
            let categories = catalog::list_categories(store.conn()).into_diagnostic()?;
            output::print_list(&categories, format, cat::row)
        }
        Action::ShowCategory => {
            let id = prompt::text("Category id")?;
            let found = catalog::read_category(store.conn(), &id).into_diagnostic()?;
            output::print_entity(&found, format, cat::print_detail)
        }
        Action::NewCategory => {
            let name = prompt::text("Name")?;
            let description = prompt::optional_text("Description")?;
            let id = catalog::create_category(store.conn_mut(), &name, &description, None)
                .into_diagnostic()?;
            print_created(EntityKind::Category, &id, &name, format)
        }
        Action::EditCategory => {
            let id = prompt::text("Category id")?;
            let current = catalog::read_category(store.conn(), &id).into_diagnostic()?;
            let update = cat::prompt_category_edits(&current)?;
            if !update.is_empty() {
                catalog::update_category(store.conn_mut(), &id, &update).into_diagnostic()?;
            }
            print_done("Updated", EntityKind::Category, &current.id, format);
            Ok(())
        }
        Action::DeleteCategory => delete(store, EntityKind::Category, format),
        Action::LinkCategory => {
            let (category_id, product_ids) = prompt_pair("Category id")?;
            for product_id in &product_ids {
                catalog::add_product_to_category(store.conn_mut(), &category_id, product_id)
                    .into_diagnostic()?;
            }
            print_done("Linked", EntityKind::Category, &category_id, format);
            Ok(())
        }
        Action::UnlinkCategory => {
            let (category_id, product_ids) = prompt_pair("Category id")?;
            for product_id in &product_ids {
                catalog::remove_product_from_category(store.conn_mut(), &category_id, product_id)
                    .into_diagnostic()?;
            }
            print_done("Unlinked", EntityKind::Category, &category_id, format);
            Ok(())
        }
        Action::ListImages => {
            let images = catalog::list_images(store.conn()).into_diagnostic()?;
            output::print_list(&images, format, img::row)
        }
        Action::NewImage => {
            let product_id = prompt::text("Product id")?;
            let url = prompt::text("URL")?;
            let id = catalog::create_image(store.conn_mut(), &product_id, &url, None)
                .into_diagnostic()?;
            print_created(EntityKind::Image, &id, &url, format)
        }
        Action::MoveImage => {
            let id = prompt::text("Image id")?;
            let product_id = prompt::text("New product id")?;
            let update = ImageUpdate::default().product_id(product_id);
            catalog::update_image(store.conn_mut(), &id, &update).into_diagnostic()?;
            print_done("Moved", EntityKind::Image, &id, format);
            Ok(())
        }
        Action::DeleteImage => delete(store, EntityKind::Image, format),
        Action::CheckLinks => {
            let dangling = links::check_links(store.conn()).into_diagnostic()?;
            if dangling.is_empty() {
                println!("{} All links are valid!", style("✓").green().bold());
                return Ok(());
            }
            for link in &dangling {
                println!(
                    "  {} {} {} → {} ({} not found)",
                    style("✗").red(),
                    link.relation,
                    link.product_id,
                    link.other_id,
                    link.missing
                );
            }
            if prompt::confirm(&format!("Remove {} broken link(s)?", dangling.len()))? {
                let removed = links::repair_links(store.conn_mut()).into_diagnostic()?;
                println!("{} Removed {} broken row(s)", style("✓").green(), removed);
            }
            Ok(())
        }
        Action::Stats => {
            let counts = store.statistics().into_diagnostic()?;
            stats::print_stats(&counts, format)
        }
        Action::Quit => Ok(()),
    }
}

/// Prompt for an owner id and the product ids to (un)link with it
fn prompt_pair(owner_prompt: &str) -> Result<(String, Vec<String>)> {
    let owner = prompt::text(owner_prompt)?;
    let products = prompt::id_list("Product ids")?;
    if products.is_empty() {
        return Err(miette::miette!("No product ids given"));
    }
    Ok((owner, products))
}

fn delete(store: &mut Store, kind: EntityKind, format: OutputFormat) -> Result<()> {
    let id = prompt::text(&format!("{} id", capitalize(kind.as_str())))?;
    if !prompt::confirm(&format!("Delete {} {}?", kind, id))? {
        return Ok(());
    }

    let conn = store.conn_mut();
    let deleted = match kind {
        EntityKind::Product => catalog::delete_product(conn, &id),
        EntityKind::Supplier => catalog::delete_supplier(conn, &id),
        EntityKind::Category => catalog::delete_category(conn, &id),
        EntityKind::Image => catalog::delete_image(conn, &id),
    };
    deleted.into_diagnostic()?;

    print_done("Deleted", kind, &id, format);
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
