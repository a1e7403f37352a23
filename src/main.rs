use clap::Parser;
use dint::cli::helpers::load_config;
use dint::cli::{Cli, Commands, GlobalOpts};
use dint::core::Config;
use miette::Result;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` terminates quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
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
    let global = cli.global;
    let config = load_config(&global)?;
    init_tracing(&global, &config);

    match cli.command {
        Commands::Gdt(cmd) => dint::cli::commands::gdt::run(cmd, &global, &config),
        Commands::Sketch(cmd) => dint::cli::commands::sketch::run(cmd, &global, &config),
        Commands::Params(cmd) => dint::cli::commands::params::run(cmd, &global, &config),
        Commands::Batch(args) => dint::cli::commands::batch::run(args, &global),
        Commands::Completions(args) => dint::cli::commands::completions::run(args),
    }
}

fn init_tracing(global: &GlobalOpts, config: &Config) {
    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else if global.quiet {
        EnvFilter::new("error")
    } else {
        config
            .log_level
            .as_deref()
            .and_then(|level| EnvFilter::try_new(level).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
