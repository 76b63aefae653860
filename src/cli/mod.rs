//! Command-line host: loads a page, fires its content-loaded event once and
//! writes the rewritten markup back out.

pub mod output;

use std::{
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::{
    config::ConfigManager,
    currency::{parse_float, PriceFormatter},
    errors::PriceError,
    rewrite::{InvalidPricePolicy, Page, PriceRewriter},
    utils::{build_info, persistence},
};

#[derive(Parser, Debug)]
#[command(name = "price_rewriter_cli", author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rewrite every marked price in an HTML document
    Rewrite(RewriteArgs),
    /// Print the formatted rendering of a raw price value
    Format(FormatArgs),
    /// Write the default configuration file if none exists
    InitConfig(ConfigArgs),
    /// Show build metadata
    Version,
}

#[derive(Args, Debug)]
pub struct RewriteArgs {
    /// HTML file to read (default: stdin)
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Where to write the rewritten HTML (default: stdout)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override the configured handling of prices that do not parse
    #[arg(long, value_enum)]
    pub invalid_policy: Option<InvalidPricePolicy>,

    /// Print the pass report as JSON on stderr
    #[arg(long)]
    pub report: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (default: ~/.price_rewriter/config.json)
    #[arg(long = "config", env = "PRICE_REWRITER_CONFIG", value_hint = ValueHint::FilePath)]
    pub path: Option<PathBuf>,
}

impl ConfigArgs {
    fn manager(&self) -> ConfigManager {
        match &self.path {
            Some(path) => ConfigManager::with_path(path.clone()),
            None => ConfigManager::new(),
        }
    }
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Raw price text, parsed like a `data-price` attribute
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Parses process arguments and runs the selected command.
pub fn run_cli() -> Result<(), PriceError> {
    execute(Cli::parse())
}

pub fn execute(cli: Cli) -> Result<(), PriceError> {
    match cli.command {
        Command::Rewrite(args) => cmd_rewrite(args),
        Command::Format(args) => cmd_format(args),
        Command::InitConfig(args) => cmd_init_config(args),
        Command::Version => cmd_version(),
    }
}

fn cmd_rewrite(args: RewriteArgs) -> Result<(), PriceError> {
    let mut config = args.config.manager().load()?;
    if let Some(policy) = args.invalid_policy {
        config.invalid_policy = policy;
    }
    let rewriter = PriceRewriter::from_config(&config)?;

    let mut page = match &args.input {
        Some(path) => Page::new(persistence::load_document_from_file(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Page::parse(&persistence::decode_markup(&buffer))
        }
    };
    let report = page.content_loaded(&rewriter);

    match &args.output {
        Some(path) => persistence::save_document_to_file(page.document(), path)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(page.to_html().as_bytes())?;
            stdout.flush()?;
        }
    }

    if let Some(report) = report {
        if args.report {
            eprintln!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            output::summary(&report);
        }
    }
    Ok(())
}

fn cmd_format(args: FormatArgs) -> Result<(), PriceError> {
    let formatter = PriceFormatter::default();
    println!("{}", formatter.format(parse_float(Some(&args.value))));
    Ok(())
}

fn cmd_init_config(args: ConfigArgs) -> Result<(), PriceError> {
    let manager = args.manager();
    if manager.path().exists() {
        output::info(format!(
            "Configuration already exists at {}",
            manager.path().display()
        ));
        return Ok(());
    }
    manager.save(&manager.load()?)?;
    output::success(format!("Wrote {}", manager.path().display()));
    Ok(())
}

fn cmd_version() -> Result<(), PriceError> {
    let meta = build_info::current();
    println!("Price Rewriter {}", meta.version);
    println!("  Build hash   : {} ({})", meta.git_hash, meta.git_status);
    println!("  Built at     : {}", meta.timestamp);
    println!("  Target       : {}", meta.target);
    println!("  Profile      : {}", meta.profile);
    println!("  Rustc        : {}", meta.rustc);
    Ok(())
}
