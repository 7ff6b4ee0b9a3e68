use std::fs;
use std::path::{Path, PathBuf};

use aquascape::config::{ConfigError, StudioConfig};
use aquascape::cutout::{self, Cutout, CutoutError, RemovalMode, RemovalOptions};
use aquascape::tank::{LengthUnit, TANK_PRESETS, TankConfig, TankDimensions, TankError, find_preset};
use aquascape::upload::{self, ImageFile, UploadError};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("i/o error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid tank: {0}")]
    Tank(#[from] TankError),
    #[error("{0}")]
    Upload(#[from] UploadError),
    #[error("cutout failed: {0}")]
    Cutout(#[from] CutoutError),
    #[error("unknown preset `{0}`; run `aquascape presets` for the list")]
    UnknownPreset(String),
    #[error("pass --preset or all of --width, --height and --depth")]
    MissingDimensions,
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "aquascape", about = "Aquascape designer image and tank helpers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove the background from a decor photo.
    Cutout(CutoutCommand),
    /// Print dimensions and volume for a tank.
    Tank(TankCommand),
    /// List the built-in tank presets.
    Presets,
}

#[derive(Args, Debug)]
struct CutoutCommand {
    /// Source image (PNG or JPEG).
    input: PathBuf,

    /// Where to write the processed PNG.
    #[arg(long, short)]
    output: PathBuf,

    /// Optional thumbnail PNG path.
    #[arg(long)]
    thumbnail: Option<PathBuf>,

    #[arg(long, env = "AQUASCAPE_TOLERANCE", default_value_t = 30)]
    tolerance: u8,

    #[arg(long, env = "AQUASCAPE_MODE", default_value = "auto")]
    mode: RemovalMode,

    /// Edge feather radius in pixels.
    #[arg(long, default_value_t = 1)]
    feather: u32,

    /// Mark removed pixels in red instead of clearing them.
    #[arg(long)]
    preview: bool,
}

#[derive(Args, Debug)]
struct TankCommand {
    #[arg(long, conflicts_with_all = ["width", "height", "depth"])]
    preset: Option<String>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    #[arg(long)]
    depth: Option<f64>,

    #[arg(long, value_enum, default_value_t = UnitArg::Cm)]
    unit: UnitArg,

    /// Print the tank config as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum UnitArg {
    Cm,
    Inches,
}

impl From<UnitArg> for LengthUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Cm => Self::Cm,
            UnitArg::Inches => Self::Inches,
        }
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Cutout(cmd) => run_cutout(&StudioConfig::from_env()?, cmd),
        Command::Tank(cmd) => run_tank(cmd),
        Command::Presets => {
            run_presets();
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Io { path: path.to_owned(), source })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    fs::write(path, bytes).map_err(|source| CliError::Io { path: path.to_owned(), source })
}

fn run_cutout(config: &StudioConfig, cmd: CutoutCommand) -> Result<(), CliError> {
    let bytes = read(&cmd.input)?;
    let mime = image::guess_format(&bytes).map_or("application/octet-stream", |f| f.to_mime_type());
    let name = cmd.input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    upload::validate(&ImageFile { name, mime: mime.to_owned(), bytes: bytes.clone() }, config)?;

    let opts = RemovalOptions { tolerance: cmd.tolerance, mode: cmd.mode, feather: cmd.feather };
    if cmd.preview {
        let source = cutout::decode(&bytes)?;
        write(&cmd.output, &cutout::encode_png(&cutout::preview_removal(&source, &opts))?)?;
        eprintln!("wrote preview {}", cmd.output.display());
        return Ok(());
    }

    let result = Cutout::from_bytes(&bytes, &opts, config.thumbnail_max)?;
    let (processed, thumbnail) = result.to_png()?;
    write(&cmd.output, &processed)?;
    eprintln!("wrote {} ({}x{})", cmd.output.display(), result.processed.width(), result.processed.height());
    if let Some(path) = cmd.thumbnail {
        write(&path, &thumbnail)?;
        eprintln!("wrote thumbnail {} ({}x{})", path.display(), result.thumbnail.width(), result.thumbnail.height());
    }
    Ok(())
}

fn run_tank(cmd: TankCommand) -> Result<(), CliError> {
    let mut tank = TankConfig::new();
    if let Some(name) = cmd.preset {
        let preset = find_preset(&name).ok_or(CliError::UnknownPreset(name))?;
        tank.apply_preset(preset);
    } else {
        let (Some(width), Some(height), Some(depth)) = (cmd.width, cmd.height, cmd.depth) else {
            return Err(CliError::MissingDimensions);
        };
        tank.set_dimensions(TankDimensions { width, height, depth, unit: cmd.unit.into() })?;
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&tank)?);
    } else {
        let (dims, volume) = tank.summary();
        println!("{dims}\n{volume}");
    }
    Ok(())
}

fn run_presets() {
    let mut tank = TankConfig::new();
    for preset in &TANK_PRESETS {
        tank.apply_preset(preset);
        let (dims, volume) = tank.summary();
        println!("{:<18} {dims:<24} {volume}", preset.name);
    }
}
