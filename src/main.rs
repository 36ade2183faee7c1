use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use runoff_hydrograph::report::{detailed_table, storm_table, write_csv};
use runoff_hydrograph::validation::validate;
use runoff_hydrograph::{EngineConfig, IdfCatalog, ProjectFile, RunoffModel};

/// Design storm to outflow hydrograph (SCS curve number + triangular unit hydrograph)
#[derive(Parser)]
#[command(name = "runoff-hydrograph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); falls back to RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the model for a project file
    Run(RunArgs),
    /// Check the inputs of a project file
    Validate(ValidateArgs),
    /// List the formulas of an IDF catalogue
    Idf(IdfArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Project file (TOML)
    #[arg(short, long)]
    project: PathBuf,

    /// Engine settings (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IDF catalogue and formula id, overriding the project's coefficients
    #[arg(long, requires = "formula")]
    catalog: Option<PathBuf>,

    #[arg(long, requires = "catalog")]
    formula: Option<String>,

    /// Write the detailed hydrograph table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Store the run summary back into the project file
    #[arg(long)]
    save: bool,
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(short, long)]
    project: PathBuf,

    /// Engine settings (TOML), for the large-area limit
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct IdfArgs {
    #[arg(short, long, default_value = "idf_parameters.toml")]
    catalog: PathBuf,
}

fn init_logging(level: Option<&str>) {
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .or_else(|| std::env::var("RUST_LOG").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Validate(args) => validate_project(args),
        Commands::Idf(args) => list_formulas(&args.catalog),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    Ok(match path {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    })
}

fn run(args: RunArgs) -> Result<()> {
    let project = ProjectFile::load(&args.project)?;
    let config = load_config(args.config.as_deref())?;

    let mut model = RunoffModel::new(project.inputs, config);
    if let (Some(catalog), Some(id)) = (&args.catalog, &args.formula) {
        let catalog = IdfCatalog::from_path(catalog)?;
        model = model.with_idf_formula(catalog.get(id)?.clone());
    }
    let result = model.run()?;

    println!("Time of concentration : {:>10.1} min", result.tc);
    println!("Intensity             : {:>10.1} mm/h", result.intensity);
    println!("Storm depth           : {:>10.1} mm", result.total_precip);
    println!(
        "Retention S / Ia      : {:>10.1} / {:.1} mm",
        result.abstraction.s, result.abstraction.ia
    );
    println!(
        "Effective rainfall    : {:>10.1} mm",
        result.total_effective_rainfall
    );
    println!(
        "Unit hydrograph       : tp {:.1} min, tb {:.1} min, qp {:.3} m3/s",
        result.unit_hydrograph.tp, result.unit_hydrograph.tb, result.unit_hydrograph.qp
    );
    println!("Peak flow             : {:>10.2} m3/s", result.max_flow);
    println!("Peak time             : {:>10.1} min", result.peak_time);
    println!("Runoff volume         : {:>10.0} m3", result.total_volume);

    println!("\n#  Time [min]  % duration  Cumulative rain [mm]");
    for row in storm_table(&result, model.inputs().duration) {
        println!(
            "{:<2} {:>10.1} {:>10.0}% {:>21.2}",
            row.index, row.time, row.pct_time, row.accum_rain
        );
    }

    if let Some(path) = &args.csv {
        let file =
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_csv(&mut out, &detailed_table(&result))
            .with_context(|| format!("cannot write {}", path.display()))?;
        out.flush()?;
        log::info!("hydrograph table written to {}", path.display());
    }

    if args.save {
        ProjectFile::new(*model.inputs(), Some(&result)).save(&args.project)?;
        log::info!("summary saved to {}", args.project.display());
    }
    Ok(())
}

fn validate_project(args: ValidateArgs) -> Result<()> {
    let project = ProjectFile::load(&args.project)?;
    let config = load_config(args.config.as_deref())?;
    let report = validate(
        &project.inputs.basin(),
        &project.inputs.storm(),
        config.large_area_km2,
    );
    for msg in report.messages() {
        println!("  {msg}");
    }
    let warnings = report.warnings().count();
    if !report.is_valid() {
        bail!("{} has invalid inputs", args.project.display());
    }
    if args.strict && warnings > 0 {
        bail!("{} has {warnings} warning(s)", args.project.display());
    }
    println!("{}: inputs are valid", args.project.display());
    Ok(())
}

fn list_formulas(path: &Path) -> Result<()> {
    let catalog = IdfCatalog::from_path(path)?;
    for (id, f) in catalog.sorted() {
        println!(
            "{id:<24} {:<40} K={} a={} b={} c={}",
            f.label(),
            f.k,
            f.a,
            f.b,
            f.c
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_engine_config() {
        let cli = Cli::try_parse_from([
            "runoff-hydrograph",
            "validate",
            "--project",
            "basin.toml",
            "--config",
            "engine.toml",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.config, Some(PathBuf::from("engine.toml")))
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn config_file_sets_large_area_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "large_area_km2 = 100.0\n").unwrap();
        assert_eq!(load_config(Some(&path)).unwrap().large_area_km2, 100.0);
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
