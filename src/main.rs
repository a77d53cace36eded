use clap::{CommandFactory, Parser};
use invcat::cli::{Cli, Commands, GlobalOpts};
use invcat::core::Config;
use miette::{IntoDiagnostic, Result};
use tracing::{debug, Level};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = Config::load().into_diagnostic()?;
    let global: GlobalOpts = cli.global.with_config(&config)?;
    debug!(?global, "resolved options");

    match cli.command {
        None | Some(Commands::Shell) => invcat::cli::commands::shell::run(&global),
        Some(Commands::Product(cmd)) => invcat::cli::commands::product::run(cmd, &global),
        Some(Commands::Sup(cmd)) => invcat::cli::commands::sup::run(cmd, &global),
        Some(Commands::Cat(cmd)) => invcat::cli::commands::cat::run(cmd, &global),
        Some(Commands::Img(cmd)) => invcat::cli::commands::img::run(cmd, &global),
        Some(Commands::Link(cmd)) => invcat::cli::commands::link::run(cmd, &global),
        Some(Commands::Stats) => invcat::cli::commands::stats::run(&global),
        Some(Commands::Completions(args)) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "invcat", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Log to stderr; -v info, -vv debug, -vvv trace, warnings otherwise
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
