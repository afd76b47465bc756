use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;

use max10_ula::check::{self, CheckOptions, Report, Severity};
use max10_ula::footprint::FootprintLibrary;
use max10_ula::sexpr::SExpr;
use max10_ula::{board, export, Design, NetList};

/// Footprint library directory looked for next to the executable
const SIBLING_LIBRARY: &str = "myelin-kicad.pretty";

#[derive(Parser)]
#[command(name = "max10_ula")]
#[command(about = "Netlist for the Max 10 Electron ULA replacement board", long_about = None)]
struct Cli {
    /// Extra directory to search for .kicad_mod footprints
    #[arg(long = "footprint-dir", global = true, value_name = "DIR")]
    footprint_dirs: Vec<PathBuf>,

    /// Defaults to `generate`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the design and write the netlist
    #[command(alias = "g")]
    Generate(GenerateArgs),

    /// Check the design without writing anything
    Check,

    /// Read back a netlist file and summarise it
    Verify(VerifyArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Netlist file to write
    #[arg(short, long, default_value = board::OUTPUT_FILE)]
    output: PathBuf,

    /// Write the netlist even if the checks find errors
    #[arg(long)]
    no_check: bool,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        GenerateArgs {
            output: PathBuf::from(board::OUTPUT_FILE),
            no_check: false,
        }
    }
}

#[derive(Args)]
struct VerifyArgs {
    /// Netlist file to read
    file: PathBuf,
}

fn footprint_library(extra: Vec<PathBuf>) -> FootprintLibrary {
    let mut library = FootprintLibrary::new(extra);
    let sibling = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SIBLING_LIBRARY)))
        .filter(|dir| dir.is_dir());
    if let Some(dir) = sibling {
        info!("Using footprints from {}", dir.display());
        library.add_dir(dir);
    }
    library
}

fn print_report(report: &Report) {
    for finding in &report.findings {
        let tag = match finding.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => continue,
        };
        eprintln!("{tag}: {finding}");
    }
}

fn run_checks(design: &Design, footprints: &FootprintLibrary) -> anyhow::Result<Report> {
    let report = check::run(design, footprints, &CheckOptions::default())
        .context("Failed to load footprints")?;
    print_report(&report);
    Ok(report)
}

fn generate(args: GenerateArgs, footprints: &FootprintLibrary) -> anyhow::Result<()> {
    let design = board::build().context("Invalid board definition")?;
    let report = run_checks(&design, footprints)?;
    if !report.is_ok() && !args.no_check {
        bail!(
            "{} check errors, netlist not written",
            report.errors().count()
        );
    }
    export::write_netlist(&design, &args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn check_design(footprints: &FootprintLibrary) -> anyhow::Result<()> {
    let design = board::build().context("Invalid board definition")?;
    let report = run_checks(&design, footprints)?;
    if !report.is_ok() {
        bail!("{} check errors", report.errors().count());
    }
    println!(
        "{} components, {} nets, {} warnings",
        design.components().len(),
        design.net_names().len(),
        report.warnings().count()
    );
    Ok(())
}

fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    let input = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let root = SExpr::try_from(&input)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    let netlist = NetList::try_from(&root)
        .with_context(|| format!("{} is not a netlist", args.file.display()))?;
    println!(
        "{} components, {} nets",
        netlist.components.len(),
        netlist.nets.len()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let footprints = footprint_library(cli.footprint_dirs);

    match cli.command {
        None => generate(GenerateArgs::default(), &footprints),
        Some(Commands::Generate(args)) => generate(args, &footprints),
        Some(Commands::Check) => check_design(&footprints),
        Some(Commands::Verify(args)) => verify(args),
    }
}
