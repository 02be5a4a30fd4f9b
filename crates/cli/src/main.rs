use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use abyss_modkit_core::{
    build_install_plan, collect_doctor_info, content_signals, modding_directories, pak_directory,
    render_conflict_summary, render_install_plan, scan_conflicts, test_supported, CommandLister,
    ACCEPTED_EXTENSIONS, EXCLUDED_BASE_ARCHIVES, GAME_ID, GAME_NAME, MOD_ROOT, STEAM_APP_ID,
};
use anyhow::{bail, Context, Result};
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "abyss-modkit",
    version,
    about = "Classify Made in Abyss: BSFD mod archives, plan installs, and report pak conflicts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify an archive from its file listing.
    Classify(ClassifyArgs),
    /// Build the copy instructions for an archive listing.
    Plan(PlanArgs),
    /// Report pak packages that overwrite the same game files.
    Conflicts(ConflictArgs),
    /// Check a game installation for the files and folders mods need.
    Doctor(DoctorArgs),
    /// Print the fixed install layout.
    Layout,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Archive listing, one path per line (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    files: PathBuf,

    /// Game id the archive is being installed for.
    #[arg(long, default_value = GAME_ID)]
    game_id: String,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Archive listing, one path per line (`-` for stdin).
    #[arg(long, value_name = "FILE")]
    files: PathBuf,

    /// Optional JSON output file for the plan.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optional markdown summary output file.
    #[arg(long, value_name = "FILE")]
    md: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ConflictArgs {
    /// Pak directory to scan.
    #[arg(long, value_name = "DIR", conflicts_with = "game_root")]
    pak_dir: Option<PathBuf>,

    /// Game installation root; the pak directory is derived from it.
    #[arg(long, value_name = "DIR")]
    game_root: Option<PathBuf>,

    /// Program that prints the files inside a pak, one per line.
    #[arg(long, default_value = "repak")]
    lister: String,

    /// Lister arguments; `{pak}` is replaced by the package path (repeatable).
    #[arg(
        long = "lister-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    lister_args: Vec<String>,

    /// Optional JSON output file for the report.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optional markdown summary output file.
    #[arg(long, value_name = "FILE")]
    md: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DoctorArgs {
    /// Game installation root.
    #[arg(long, value_name = "DIR")]
    game_root: PathBuf,
}

#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    supported: bool,
    kind: &'a str,
    script_mod_root: Option<String>,
    has_pak: bool,
    has_blueprint_pak: bool,
    has_loader: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => run_classify_command(args),
        Commands::Plan(args) => run_plan_command(args),
        Commands::Conflicts(args) => run_conflicts_command(args),
        Commands::Doctor(args) => {
            run_doctor_command(&args.game_root);
            Ok(())
        }
        Commands::Layout => {
            run_layout_command();
            Ok(())
        }
    }
}

fn run_classify_command(args: ClassifyArgs) -> Result<()> {
    let files = read_listing(&args.files)?;
    let check = test_supported(&files, &args.game_id);
    let signals = content_signals(&files);

    let output = ClassifyOutput {
        supported: check.supported,
        kind: check.kind.label(),
        script_mod_root: signals.script_mod_root,
        has_pak: signals.has_pak,
        has_blueprint_pak: signals.has_blueprint_pak,
        has_loader: signals.has_loader,
    };
    let payload =
        serde_json::to_string_pretty(&output).context("failed to serialize classification")?;
    println!("{payload}");
    Ok(())
}

fn run_plan_command(args: PlanArgs) -> Result<()> {
    let files = read_listing(&args.files)?;
    let plan = build_install_plan(&files);

    println!(
        "Kind: {} | {} instruction(s), {} skipped file(s).",
        plan.kind.label(),
        plan.instructions.len(),
        plan.skipped.len()
    );
    for instruction in &plan.instructions {
        println!("- {} -> {}", instruction.source, instruction.destination);
    }
    if plan.is_empty() {
        println!("Nothing to install; the archive only holds unsupported files.");
    }

    if let Some(output) = args.output {
        let payload = serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
        fs::write(&output, payload)
            .with_context(|| format!("failed to write plan to {}", output.display()))?;
        println!("Plan JSON written to {}", output.display());
    }

    if let Some(md_path) = args.md {
        fs::write(&md_path, render_install_plan(&plan)).with_context(|| {
            format!("failed to write markdown summary to {}", md_path.display())
        })?;
        println!("Markdown summary written to {}", md_path.display());
    }

    Ok(())
}

fn run_conflicts_command(args: ConflictArgs) -> Result<()> {
    let pak_dir = match (args.pak_dir, args.game_root) {
        (Some(pak_dir), _) => pak_dir,
        (None, Some(game_root)) => pak_directory(&game_root),
        (None, None) => bail!("pass either --pak-dir or --game-root"),
    };
    let lister = if args.lister_args.is_empty() && args.lister == "repak" {
        CommandLister::default()
    } else {
        CommandLister::new(args.lister, args.lister_args)
    };

    let report = scan_conflicts(&pak_dir, &lister)?;
    if report.is_empty() {
        println!(
            "No conflicts among {} package(s) in {}.",
            report.scanned_packages.len(),
            pak_dir.display()
        );
    } else {
        println!(
            "{} conflict group(s) among {} package(s):",
            report.groups.len(),
            report.scanned_packages.len()
        );
        for group in &report.groups {
            println!("- {} ({} file(s))", group.owners.join(", "), group.files.len());
        }
    }
    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }

    if let Some(output) = args.output {
        let payload =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        fs::write(&output, payload)
            .with_context(|| format!("failed to write report to {}", output.display()))?;
        println!("Report written to {}", output.display());
    }

    if let Some(md_path) = args.md {
        fs::write(&md_path, render_conflict_summary(&report)).with_context(|| {
            format!("failed to write markdown summary to {}", md_path.display())
        })?;
        println!("Markdown summary written to {}", md_path.display());
    }

    Ok(())
}

fn run_doctor_command(game_root: &Path) {
    let info = collect_doctor_info(game_root);
    println!("OS: {} ({})", info.os, info.arch);
    println!("Game: {}", info.game_name);
    println!("Game root: {}", info.game_root);
    println!("Game install detected: {}", info.is_game_install);
    for check in info.required_files.iter().chain(&info.modding_directories) {
        println!(
            "- [{}] {}",
            if check.present { "ok" } else { "missing" },
            check.path
        );
    }
    println!(
        "Pak directory: {} ({})",
        info.pak_directory.path,
        if info.pak_directory.present {
            "present"
        } else {
            "missing"
        }
    );
    for note in info.notes {
        println!("Note: {}", note);
    }
}

fn run_layout_command() {
    println!("{} (id {}, Steam app {})", GAME_NAME, GAME_ID, STEAM_APP_ID);
    println!("Mod-loading root: {}", MOD_ROOT);
    for dir in modding_directories(Path::new("<game>")) {
        println!("- {}", dir.display());
    }
    println!("Accepted extensions: {}", ACCEPTED_EXTENSIONS.join(", "));
    println!(
        "Base archives ignored by conflict scans: {}",
        EXCLUDED_BASE_ARCHIVES.join(", ")
    );
}

fn read_listing(path: &Path) -> Result<Vec<String>> {
    let text = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read listing from stdin")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
