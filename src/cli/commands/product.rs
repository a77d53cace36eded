//! `invcat product` command - Product management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::Tabled;
use tracing::info;

use crate::cli::helpers::{collect_ids, open_store, truncate_str};
use crate::cli::output::{self, field, id_set, print_created, print_done, rule};
use crate::cli::{prompt, GlobalOpts};
use crate::core::catalog;
use crate::core::entity::EntityKind;
use crate::entities::{NewProduct, Product, ProductUpdate};

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List products
    List(ListArgs),

    /// Create a new product
    New(NewArgs),

    /// Show a product with its suppliers, categories and images
    Show(ShowArgs),

    /// Change a product's fields
    Edit(EditArgs),

    /// Delete a product, its images and all of its links
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only products whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Only products with fewer than this many units in stock
    #[arg(long)]
    pub below: Option<i64>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    #[arg(long, short = 'n', required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Units in stock
    #[arg(
        long,
        short = 'q',
        allow_negative_numbers = true,
        required_unless_present = "interactive"
    )]
    pub quantity: Option<i64>,

    /// Unit price
    #[arg(
        long,
        short = 'p',
        allow_negative_numbers = true,
        required_unless_present = "interactive"
    )]
    pub price: Option<f64>,

    /// Use this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,

    /// Supplier ids to link (comma-separated or repeated)
    #[arg(long, short = 's')]
    pub suppliers: Vec<String>,

    /// Category ids to link (comma-separated or repeated)
    #[arg(long, short = 'c')]
    pub categories: Vec<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product id
    pub id: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New stock quantity
    #[arg(long, short = 'q', allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// New unit price
    #[arg(long, short = 'p', allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Prompt for every field, pre-filled with current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product id
    pub id: String,

    /// Suppress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "QTY")]
    pub quantity: i64,
    #[tabled(rename = "PRICE")]
    pub price: String,
    #[tabled(rename = "SUPPLIERS")]
    pub suppliers: usize,
    #[tabled(rename = "CATEGORIES")]
    pub categories: usize,
    #[tabled(rename = "IMAGES")]
    pub images: usize,
}

pub fn row(product: &Product) -> ProductRow {
    ProductRow {
        id: product.id.clone(),
        name: truncate_str(&product.name, 30),
        quantity: product.quantity,
        price: format!("{:.2}", product.price),
        suppliers: product.supplier_ids.len(),
        categories: product.category_ids.len(),
        images: product.image_ids.len(),
    }
}

pub fn print_detail(product: &Product) {
    rule();
    field("ID", style(&product.id).cyan());
    field("Name", style(&product.name).yellow());
    field("Quantity", product.quantity);
    field("Price", format!("{:.2}", product.price));
    rule();
    if !product.description.is_empty() {
        println!("{}", product.description);
    }
    id_set("Suppliers", product.supplier_ids.iter());
    id_set("Categories", product.category_ids.iter());
    id_set("Images", product.image_ids.iter());
}

/// Run a product subcommand
pub fn run(cmd: ProductCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProductCommands::List(args) => run_list(args, global),
        ProductCommands::New(args) => run_new(args, global),
        ProductCommands::Show(args) => run_show(args, global),
        ProductCommands::Edit(args) => run_edit(args, global),
        ProductCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let mut products = catalog::list_products(store.conn()).into_diagnostic()?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        products.retain(|p| p.name.to_lowercase().contains(&needle));
    }
    if let Some(below) = args.below {
        products.retain(|p| p.quantity < below);
    }
    if let Some(limit) = args.limit {
        products.truncate(limit);
    }

    if args.count {
        println!("{}", products.len());
        return Ok(());
    }

    output::print_list(&products, global.output(), row)
}

/// Prompt for every field of a new product
pub fn prompt_new_product() -> Result<NewProduct> {
    let name = prompt::text("Name")?;
    let description = prompt::optional_text("Description")?;
    let quantity = prompt::quantity("Quantity", None)?;
    let price = prompt::price("Price", None)?;
    let suppliers = prompt::id_list("Supplier ids")?;
    let categories = prompt::id_list("Category ids")?;

    let mut input = NewProduct::new(name, description, quantity, price)
        .with_suppliers(suppliers)
        .with_categories(categories);
    input.id = prompt::optional_id("Id")?;
    Ok(input)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let input = if args.interactive {
        let mut input = prompt_new_product()?;
        if args.id.is_some() {
            input.id = args.id;
        }
        input
    } else {
        let mut input = NewProduct::new(
            args.name.unwrap_or_default(),
            args.description,
            args.quantity.unwrap_or_default(),
            args.price.unwrap_or_default(),
        )
        .with_suppliers(collect_ids(&args.suppliers)?)
        .with_categories(collect_ids(&args.categories)?);
        input.id = args.id;
        input
    };

    let mut store = open_store(global)?;
    let id = catalog::create_product(store.conn_mut(), &input).into_diagnostic()?;
    info!(
        %id,
        suppliers = input.supplier_ids.len(),
        categories = input.category_ids.len(),
        "product created"
    );

    print_created(EntityKind::Product, &id, &input.name, global.output())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let product = catalog::read_product(store.conn(), &args.id).into_diagnostic()?;
    output::print_entity(&product, global.output(), print_detail)
}

/// Prompt for every scalar field, keeping only the values that changed
pub fn prompt_product_edits(current: &Product) -> Result<ProductUpdate> {
    let name = prompt::text_with_default("Name", &current.name)?;
    let description = prompt::text_with_default("Description", &current.description)?;
    let quantity = prompt::quantity("Quantity", Some(current.quantity))?;
    let price = prompt::price("Price", Some(current.price))?;

    Ok(ProductUpdate {
        name: (name != current.name).then_some(name),
        description: (description != current.description).then_some(description),
        quantity: (quantity != current.quantity).then_some(quantity),
        price: (price != current.price).then_some(price),
    })
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;

    let update = if args.interactive {
        let current = catalog::read_product(store.conn(), &args.id).into_diagnostic()?;
        prompt_product_edits(&current)?
    } else {
        ProductUpdate {
            name: args.name,
            description: args.description,
            quantity: args.quantity,
            price: args.price,
        }
    };

    if update.is_empty() {
        println!("{}", style("Nothing to change.").dim());
        return Ok(());
    }

    catalog::update_product(store.conn_mut(), &args.id, &update).into_diagnostic()?;
    info!(id = %args.id, "product updated");
    print_done("Updated", EntityKind::Product, &args.id, global.output());
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::delete_product(store.conn_mut(), &args.id).into_diagnostic()?;
    info!(id = %args.id, "product deleted");

    if !args.quiet {
        print_done("Deleted", EntityKind::Product, &args.id, global.output());
    }
    Ok(())
}
