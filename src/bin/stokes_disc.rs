use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use stokes_disc::{
    dump::write_records, metadata::INCLINATION_KEY, output::AUTO_TAG_KEY, prelude::*,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON file with model parameters.
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Path to a JSON file with the basis tables binned onto the grid.
    #[arg(short, long)]
    tables: PathBuf,

    /// Directory the basis tables are resolved against.
    #[arg(long, env = "XSDIR")]
    table_dir: Option<String>,

    #[arg(long, default_value_t = 1.0)]
    e_min: f64,

    #[arg(long, default_value_t = 100.0)]
    e_max: f64,

    #[arg(long, default_value_t = 200)]
    bins: usize,

    /// Use linearly instead of logarithmically spaced bins.
    #[arg(long)]
    linear: bool,

    /// Data type tag used when the output mode is automatic.
    #[arg(long)]
    tag: Option<f64>,

    /// Optional path to write the model output to.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional path to write per-bin diagnostics to.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Optional path to write a parameter report to.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Register an event subscriber that prints events to STDOUT.
    let subscriber = tracing_subscriber::FmtSubscriber::new();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to register event subscriber")?;

    let args = Args::parse();

    let params: ModelParams = match &args.params {
        Some(path) => read_json(path)?,
        None => {
            warn!("no parameter file provided, using defaults");
            ModelParams::default()
        }
    };
    let tables: MemoryTables = read_json(&args.tables)?;

    let grid = match args.linear {
        true => EnergyGrid::linear(args.e_min, args.e_max, args.bins),
        false => EnergyGrid::log_spaced(args.e_min, args.e_max, args.bins),
    }
    .context("invalid energy grid")?;

    let mut metadata = MetadataStore::new();
    if let Some(tag) = args.tag {
        metadata = metadata.with_filter(AUTO_TAG_KEY, tag);
    }

    let config = TableConfig::resolve(args.table_dir.as_deref());
    let model = Model::try_from(params).context("invalid model parameters")?;
    let evaluation = model
        .evaluate(&grid, &tables, &config, &mut metadata)
        .context("failed to evaluate model")?;

    let inclination = metadata.string(INCLINATION_KEY).unwrap_or_default();
    info!(
        mode = ?evaluation.mode(),
        inc_degrees = inclination.trim(),
        "evaluated model"
    );

    if let Some(path) = &args.report {
        std::fs::write(path, params.to_string())
            .with_context(|| format!("unable to write report to {}", path.display()))?;
        info!("wrote parameter report to {}", path.display());
    }

    if let Some(path) = &args.dump {
        let records = evaluation.diagnostic_records(&grid);
        if records.is_empty() {
            warn!("polarization is switched off, no diagnostics written");
        } else {
            // Using BufWriter avoids a system call per record.
            let mut writer = BufWriter::new(
                File::create(path)
                    .with_context(|| format!("unable to create {}", path.display()))?,
            );
            write_records(&mut writer, &records)?;
            info!("wrote diagnostics to {}", path.display());
        }
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout())),
    };

    for (energy, value) in grid.midpoints().zip(evaluation.output()) {
        writeln!(writer, "{energy:e} {value:e}")?;
    }
    writer.flush()?;

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("unable to parse {}", path.display()))
}
