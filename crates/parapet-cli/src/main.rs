#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "parapet: a compliance dashboard for the terminal",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment, and TTY detection.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Read",
        about = "List risk records",
        long_about = "Fetch the risk register through the service layer and print it.",
        after_help = "EXAMPLES:\n    # List every risk\n    par list\n\n    # Substring filter across all fields\n    par list --filter payroll\n\n    # Emit machine-readable output\n    par list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Mutate",
        about = "Add a risk record",
        long_about = "Append a risk record. The id is computed by the register and the status always starts Open.",
        after_help = "EXAMPLES:\n    # Add a record\n    par add --asset \"New Web Server\" --threat \"SQL Injection\" \\\n        --vuln \"Input validation missing\" --impact high --likelihood high\n\n    # Emit machine-readable output\n    par add --asset X --threat Y --vuln Z --impact low --likelihood low --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Read",
        about = "Export the register as CSV",
        long_about = "Serialize the unfiltered register snapshot to a CSV file.",
        after_help = "EXAMPLES:\n    # Export to the configured path (risk_register.csv)\n    par export\n\n    # Export to an explicit path\n    par export --output /tmp/risks.csv"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show dashboard summary numbers",
        long_about = "Print the compliance posture: framework and domain coverage plus the live status breakdown.",
        after_help = "EXAMPLES:\n    # Human-readable summary\n    par summary\n\n    # Emit machine-readable output\n    par summary --json"
    )]
    Summary(cmd::summary::SummaryArgs),

    #[command(
        next_help_heading = "Interactive",
        about = "Launch the full-screen dashboard",
        long_about = "Open the interactive TUI: dashboard, risk register with live search and add dialog, CSV export."
    )]
    Tui,

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    par completions bash\n\n    # Generate zsh completions\n    par completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PARAPET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "parapet=debug,info"
        } else {
            "parapet=info,warn"
        })
    });

    let format = env::var("PARAPET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::List(ref args) => cmd::list::run_list(args, output, &project_root),
        Commands::Add(ref args) => cmd::add::run_add(args, output, &project_root),
        Commands::Export(ref args) => cmd::export::run_export(args, output, &project_root),
        Commands::Summary(ref args) => cmd::summary::run_summary(args, output, &project_root),
        Commands::Tui => tui::run_tui(&project_root),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
