//! `invcat img` command - Product image management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::Tabled;
use tracing::info;

use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::output::{self, field, print_created, print_done, rule};
use crate::cli::{prompt, GlobalOpts};
use crate::core::catalog;
use crate::core::entity::EntityKind;
use crate::entities::{Image, ImageUpdate};

#[derive(Subcommand, Debug)]
pub enum ImgCommands {
    /// List images, optionally of one product
    List(ListArgs),

    /// Attach a new image to a product
    New(NewArgs),

    /// Show an image
    Show(ShowArgs),

    /// Change an image's URL or move it to another product
    Edit(EditArgs),

    /// Delete an image
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only images of this product
    #[arg(long, short = 'p')]
    pub product: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product the image belongs to
    #[arg(long, short = 'p', required_unless_present = "interactive")]
    pub product: Option<String>,

    /// Image URL
    #[arg(long, short = 'u', required_unless_present = "interactive")]
    pub url: Option<String>,

    /// Use this id instead of generating one
    #[arg(long)]
    pub id: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Image id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Image id
    pub id: String,

    /// New URL
    #[arg(long, short = 'u')]
    pub url: Option<String>,

    /// Move the image to this product
    #[arg(long, short = 'p')]
    pub product: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Image id
    pub id: String,

    /// Suppress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Tabled)]
pub struct ImageRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "PRODUCT")]
    pub product_id: String,
    #[tabled(rename = "URL")]
    pub url: String,
}

pub fn row(image: &Image) -> ImageRow {
    ImageRow {
        id: image.id.clone(),
        product_id: image.product_id.clone(),
        url: truncate_str(&image.url, 60),
    }
}

pub fn print_detail(image: &Image) {
    rule();
    field("ID", style(&image.id).cyan());
    field("Product", style(&image.product_id).cyan());
    field("URL", style(&image.url).yellow());
    rule();
}

/// Run an image subcommand
pub fn run(cmd: ImgCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ImgCommands::List(args) => run_list(args, global),
        ImgCommands::New(args) => run_new(args, global),
        ImgCommands::Show(args) => run_show(args, global),
        ImgCommands::Edit(args) => run_edit(args, global),
        ImgCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let images = match args.product {
        Some(ref product) => catalog::images_of_product(store.conn(), product),
        None => catalog::list_images(store.conn()),
    }
    .into_diagnostic()?;

    if args.count {
        println!("{}", images.len());
        return Ok(());
    }

    output::print_list(&images, global.output(), row)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (product, url) = if args.interactive {
        let product = match args.product {
            Some(product) => product,
            None => prompt::text("Product id")?,
        };
        (product, prompt::text("URL")?)
    } else {
        (
            args.product.unwrap_or_default(),
            args.url.unwrap_or_default(),
        )
    };

    let mut store = open_store(global)?;
    let id = catalog::create_image(store.conn_mut(), &product, &url, args.id.as_deref())
        .into_diagnostic()?;
    info!(%id, %product, "image created");

    print_created(EntityKind::Image, &id, &url, global.output())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let store = open_store(global)?;
    let image = catalog::read_image(store.conn(), &args.id).into_diagnostic()?;
    output::print_entity(&image, global.output(), print_detail)
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let update = ImageUpdate {
        url: args.url,
        product_id: args.product,
    };
    if update.is_empty() {
        println!("{}", style("Nothing to change.").dim());
        return Ok(());
    }

    let mut store = open_store(global)?;
    catalog::update_image(store.conn_mut(), &args.id, &update).into_diagnostic()?;
    info!(id = %args.id, "image updated");
    print_done("Updated", EntityKind::Image, &args.id, global.output());
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut store = open_store(global)?;
    catalog::delete_image(store.conn_mut(), &args.id).into_diagnostic()?;
    info!(id = %args.id, "image deleted");

    if !args.quiet {
        print_done("Deleted", EntityKind::Image, &args.id, global.output());
    }
    Ok(())
}
