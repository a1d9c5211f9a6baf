use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use harvest_drift_guard::{
    check_fingerprints, compute_fingerprints, save_snapshots, semantic_guard, snapshot_diff,
    validate_outputs, write_fingerprints, AgentRun, DriftSettings, FingerprintConfig, GateLimits,
    GateVerdict, GuardReport, CURRENT_PATH, SCHEMA_PATH,
};
use harvest_packager::{
    build_manifest, bundle_outputs, stage_release, write_manifest, OutputLayout,
    DEFAULT_MANIFEST_ROOTS, DEFAULT_RELEASES_DIR,
};
use harvest_protocol::deliverable_schema_pretty;
use harvest_vector_store::VectorBackend;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

mod config;
mod pipeline;

use config::AppConfig;
use pipeline::{run_build, BuildOptions};

#[derive(Parser)]
#[command(name = "harvestflow")]
#[command(about = "Turn conversation exports into packaged flows and guard them against drift", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Workspace directory every relative path is resolved against
    #[arg(long, global = true, default_value = ".")]
    base: PathBuf,

    /// Config file (defaults to <base>/harvestflow.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline: ingest, cluster, synthesize, package
    Build(BuildArgs),

    /// Hash the packaged outputs into out/manifest.json
    Manifest,

    /// Hash locked files into drift/fingerprint.current.json
    Fingerprint,

    /// Compare current fingerprints with the baseline (exit 2 on drift)
    #[command(name = "fingerprint-check")]
    FingerprintCheck,

    /// Compare live outputs with golden snapshots (exit 4 on drift)
    #[command(name = "snapshot-diff")]
    SnapshotDiff,

    /// Compare live outputs with golden snapshots by embedding similarity (exit 5 on drift)
    #[command(name = "semantic-guard")]
    SemanticGuard,

    /// Validate JSON outputs against the deliverable schema (exit 3 on failure)
    #[command(name = "validate-outputs")]
    ValidateOutputs,

    /// Copy live markdown/JSON outputs into the golden snapshot tree
    #[command(name = "save-snapshots")]
    SaveSnapshots,

    /// Zip agents/outputs into agents/all-llm-outputs.zip
    #[command(name = "bundle-outputs")]
    BundleOutputs,

    /// Stage the packaged artifacts under releases/
    Release(ReleaseArgs),

    /// Admit or reject an agent run (exit 1 when rejected)
    Gate(GateArgs),

    /// Write the deliverable JSON schema to schema/deliverable.schema.json
    #[command(name = "write-schema")]
    WriteSchema,
}

#[derive(Args)]
struct BuildArgs {
    /// Conversation export to ingest
    #[arg(long, default_value = "chat.json")]
    input: PathBuf,

    /// Output root (overrides [output].root)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Vector index backend (overrides [vector_store].backend)
    #[arg(long, value_enum)]
    vector_store: Option<BackendArg>,
}

#[derive(Args)]
struct ReleaseArgs {
    /// Release label (defaults to the current unix time)
    #[arg(long)]
    label: Option<String>,
}

#[derive(Args)]
struct GateArgs {
    /// JSON file with {steps, costUSD, toolsOk, aligned}
    run: PathBuf,

    /// Maximum cost in USD
    #[arg(long, default_value_t = harvest_drift_guard::DEFAULT_MAX_COST_USD)]
    max_cost: f64,

    /// Maximum number of steps
    #[arg(long, default_value_t = harvest_drift_guard::DEFAULT_MAX_STEPS)]
    max_steps: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Memory,
    File,
}

impl BackendArg {
    const fn as_backend(self) -> VectorBackend {
        match self {
            Self::Memory => VectorBackend::Memory,
            Self::File => VectorBackend::File,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let code = run(cli).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<i32> {
    let base = cli.base;
    let config = AppConfig::load(&base, cli.config.as_deref())?;
    let layout = OutputLayout::new(base.join(&config.output.root));

    match cli.command {
        Commands::Build(args) => run_build_command(&base, config, args).await,
        Commands::Manifest => run_manifest(&base, &layout),
        Commands::Fingerprint => run_fingerprint(&base),
        Commands::FingerprintCheck => {
            let (_, report) = check_fingerprints(&base)?;
            Ok(print_report(&report))
        }
        Commands::SnapshotDiff => {
            let report = snapshot_diff(&base, &DriftSettings::load(&base))?;
            Ok(print_report(&report))
        }
        Commands::SemanticGuard => {
            let report = semantic_guard(&base, &DriftSettings::load(&base))?;
            Ok(print_report(&report))
        }
        Commands::ValidateOutputs => {
            let report = validate_outputs(&base, &DriftSettings::load(&base))?;
            Ok(print_report(&report))
        }
        Commands::SaveSnapshots => {
            let saved = save_snapshots(&base, &DriftSettings::load(&base))?;
            println!("Saved {} golden snapshots", saved.len());
            Ok(0)
        }
        Commands::BundleOutputs => {
            match bundle_outputs(&base)? {
                Some(path) => println!("Bundled outputs into {}", path.display()),
                None => println!("No outputs to bundle"),
            }
            Ok(0)
        }
        Commands::Release(args) => run_release(&base, args),
        Commands::Gate(args) => run_gate(&base, args),
        Commands::WriteSchema => run_write_schema(&base),
    }
}

async fn run_build_command(base: &Path, config: AppConfig, args: BuildArgs) -> Result<i32> {
    let mut vector_store = config.vector_store;
    if let Some(backend) = args.vector_store {
        vector_store.backend = backend.as_backend();
    }
    vector_store.path = Some(base.join(vector_store.file_path()));

    let out = args.out.unwrap_or(config.output.root);
    let options = BuildOptions {
        input: base.join(&args.input),
        layout: OutputLayout::new(base.join(out)),
        vector_store,
        cluster: config.cluster,
    };

    let summary = run_build(&options).await?;
    for flow in &summary.flows {
        println!(
            "{}\t{:.3}\t{}",
            flow.flow_id, flow.quality_score, flow.title
        );
    }
    println!(
        "Built {} flows from {} messages ({} archived) into {}",
        summary.flows.len(),
        summary.stats.messages,
        summary.archives,
        options.layout.root().display()
    );
    Ok(0)
}

fn run_manifest(base: &Path, layout: &OutputLayout) -> Result<i32> {
    let manifest = build_manifest(base, &DEFAULT_MANIFEST_ROOTS)?;
    write_manifest(&layout.manifest(), &manifest)?;
    println!(
        "Wrote {} ({} files)",
        layout.manifest().display(),
        manifest.files.len()
    );
    Ok(0)
}

fn run_fingerprint(base: &Path) -> Result<i32> {
    let config = FingerprintConfig::load(base)?;
    let hashes = compute_fingerprints(base, &config)?;
    let target = base.join(CURRENT_PATH);
    write_fingerprints(&target, &hashes)?;
    println!("Wrote {} ({} files)", target.display(), hashes.len());
    Ok(0)
}

fn run_release(base: &Path, args: ReleaseArgs) -> Result<i32> {
    let label = match args.label {
        Some(label) => label,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock before unix epoch")?
            .as_secs()
            .to_string(),
    };
    let bundle = stage_release(base, Path::new(DEFAULT_RELEASES_DIR), &label)?;
    println!(
        "Release bundle staged at {} ({} artifacts)",
        bundle.dir.display(),
        bundle.copied.len()
    );
    Ok(0)
}

fn run_gate(base: &Path, args: GateArgs) -> Result<i32> {
    let path = base.join(&args.run);
    let run = AgentRun::load(&path)
        .with_context(|| format!("Failed to read agent run {}", path.display()))?;
    let limits = GateLimits {
        max_cost_usd: args.max_cost,
        max_steps: args.max_steps,
    };

    let verdict = GateVerdict::evaluate(&run, &limits);
    if verdict.accepted() {
        println!("Agent run accepted");
        return Ok(0);
    }
    eprintln!("Agent run rejected:");
    for predicate in &verdict.failed {
        eprintln!("  - {predicate}");
    }
    Ok(1)
}

fn run_write_schema(base: &Path) -> Result<i32> {
    let target = base.join(SCHEMA_PATH);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, deliverable_schema_pretty()?)?;
    println!("Wrote {}", target.display());
    Ok(0)
}

/// Passing reports go to stdout, drift to stderr. Returns the exit code.
fn print_report(report: &GuardReport) -> i32 {
    if report.passed() {
        println!("{report}");
    } else {
        eprintln!("{report}");
    }
    report.exit_code()
}
