//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::cli::commands::{
    cat::CatCommands, img::ImgCommands, link::LinkCommands, product::ProductCommands,
    sup::SupCommands,
};
use crate::core::Config;

/// invcat - inventory catalog of products, suppliers, categories and images
#[derive(Parser, Debug)]
#[command(name = "invcat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// Command to run; starts the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Database file, or :memory: [env: INVCAT_DB]
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output format [env: INVCAT_FORMAT]
    #[arg(long, short = 'f', global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Fill options not given on the command line from the loaded configuration
    pub fn with_config(mut self, config: &Config) -> miette::Result<Self> {
        if self.db.is_none() {
            self.db = Some(config.database_path());
        }
        if self.format.is_none() {
            if let Some(ref name) = config.format {
                let format = OutputFormat::from_str(name, true).map_err(|_| {
                    miette::miette!("Invalid output format in configuration: '{}'", name)
                })?;
                self.format = Some(format);
            }
        }
        Ok(self)
    }

    /// The requested output format, `Auto` when unset
    pub fn output(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Product management
    #[command(subcommand)]
    Product(ProductCommands),

    /// Supplier management
    #[command(subcommand)]
    Sup(SupCommands),

    /// Category management
    #[command(subcommand)]
    Cat(CatCommands),

    /// Product image management
    #[command(subcommand)]
    Img(ImgCommands),

    /// Relationship integrity checks
    #[command(subcommand)]
    Link(LinkCommands),

    /// Show row counts for every table
    Stats,

    /// Interactive menu-driven session
    Shell,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table for lists, detail view for single entities
    #[default]
    Auto,
    /// Bordered table
    Table,
    /// Tab-separated values with a header row
    Tsv,
    Json,
    Yaml,
    /// Ids only, one per line
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["invcat"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = [
            "invcat", "sup", "list", "--db", "x.db", "-f", "json", "-vv",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.global.db, Some(PathBuf::from("x.db")));
        assert_eq!(cli.global.output(), OutputFormat::Json);
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_config_fills_missing_options() {
        let config = Config {
            database: Some(PathBuf::from("cfg.db")),
            format: Some("yaml".to_string()),
        };

        let global = GlobalOpts::default().with_config(&config).unwrap();
        assert_eq!(global.db, Some(PathBuf::from("cfg.db")));
        assert_eq!(global.output(), OutputFormat::Yaml);

        let flags = GlobalOpts {
            db: Some(PathBuf::from("flag.db")),
            format: Some(OutputFormat::Id),
            verbose: 0,
        };
        let global = flags.with_config(&config).unwrap();
        assert_eq!(global.db, Some(PathBuf::from("flag.db")));
        assert_eq!(global.output(), OutputFormat::Id);
    }

    #[test]
    fn test_bad_configured_format() {
        let config = Config {
            database: None,
            format: Some("xml".to_string()),
        };
        assert!(GlobalOpts::default().with_config(&config).is_err());
    }
}
