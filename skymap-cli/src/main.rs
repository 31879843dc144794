mod input;

use clap::Parser;
use serde::{Deserialize, Serialize};
use skymap::{
    draw_map, DrawOptions, MapConfig, Orientation, Preset, PresetCoords, RasterRenderer,
    RotatedMap,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Skymap CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for the map pipeline.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InputFormat {
    Csv,
    Ibex,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InstrumentJson {
    Hi,
    Lo,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct IbexSelectionJson {
    root: String,
    instrument: InstrumentJson,
    product: String,
    subfolder: String,
    energy_bin: u32,
    year: String,
    quantity: String,
}

impl Default for IbexSelectionJson {
    fn default() -> Self {
        Self {
            root: String::new(),
            instrument: InstrumentJson::Hi,
            product: "noSP_ram".to_string(),
            subfolder: String::new(),
            energy_bin: 3,
            year: "2009".to_string(),
            quantity: "flux".to_string(),
        }
    }
}

impl From<IbexSelectionJson> for input::IbexSelection {
    fn from(value: IbexSelectionJson) -> Self {
        Self {
            root: PathBuf::from(value.root),
            instrument: match value.instrument {
                InstrumentJson::Hi => input::Instrument::Hi,
                InstrumentJson::Lo => input::Instrument::Lo,
            },
            product: value.product,
            subfolder: value.subfolder,
            energy_bin: value.energy_bin,
            year: value.year,
            quantity: value.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OrientationJson {
    preset: Option<String>,
    alf: f64,
    phi: f64,
    th: f64,
    center_meridian: bool,
}

impl Default for OrientationJson {
    fn default() -> Self {
        Self {
            preset: None,
            alf: 0.0,
            phi: 0.0,
            th: 0.0,
            center_meridian: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PresetCoordsJson {
    nose_lon: f64,
    nose_lat: f64,
    tail_lon: f64,
    tail_lat: f64,
    ribbon_lon: f64,
    ribbon_lat: f64,
    ngp_lon: f64,
    ngp_lat: f64,
    gal_center_lon: f64,
}

impl Default for PresetCoordsJson {
    fn default() -> Self {
        let coords = PresetCoords::default();
        Self {
            nose_lon: coords.nose_lon,
            nose_lat: coords.nose_lat,
            tail_lon: coords.tail_lon,
            tail_lat: coords.tail_lat,
            ribbon_lon: coords.ribbon_lon,
            ribbon_lat: coords.ribbon_lat,
            ngp_lon: coords.ngp_lon,
            ngp_lat: coords.ngp_lat,
            gal_center_lon: coords.gal_center_lon,
        }
    }
}

impl From<PresetCoordsJson> for PresetCoords {
    fn from(value: PresetCoordsJson) -> Self {
        Self {
            nose_lon: value.nose_lon,
            nose_lat: value.nose_lat,
            tail_lon: value.tail_lon,
            tail_lat: value.tail_lat,
            ribbon_lon: value.ribbon_lon,
            ribbon_lat: value.ribbon_lat,
            ngp_lon: value.ngp_lon,
            ngp_lat: value.ngp_lat,
            gal_center_lon: value.gal_center_lon,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MapConfigJson {
    seam_tolerance_sq: f64,
    parallel: bool,
}

impl Default for MapConfigJson {
    fn default() -> Self {
        let cfg = MapConfig::default();
        Self {
            seam_tolerance_sq: cfg.seam_tolerance_sq,
            parallel: cfg.parallel,
        }
    }
}

impl From<MapConfigJson> for MapConfig {
    fn from(value: MapConfigJson) -> Self {
        Self {
            seam_tolerance_sq: value.seam_tolerance_sq,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DrawConfigJson {
    vmin: Option<f64>,
    vmax: Option<f64>,
    normalized: bool,
    grid_on: bool,
    lon_ticks: Vec<f64>,
    lat_ticks: Vec<f64>,
}

impl Default for DrawConfigJson {
    fn default() -> Self {
        let opts = DrawOptions::default();
        Self {
            vmin: opts.vmin,
            vmax: opts.vmax,
            normalized: opts.normalized,
            grid_on: opts.grid_on,
            lon_ticks: opts.lon_ticks,
            lat_ticks: opts.lat_ticks,
        }
    }
}

impl From<DrawConfigJson> for DrawOptions {
    fn from(value: DrawConfigJson) -> Self {
        Self {
            vmin: value.vmin,
            vmax: value.vmax,
            normalized: value.normalized,
            lon_ticks: value.lon_ticks,
            lat_ticks: value.lat_ticks,
            grid_on: value.grid_on,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    format: InputFormat,
    ibex_release: Option<IbexSelectionJson>,
    mask_nonpositive: bool,
    output_path: String,
    summary_path: Option<String>,
    width: u32,
    height: u32,
    orientation: OrientationJson,
    preset_coords: PresetCoordsJson,
    #[serde(rename = "map")]
    map_cfg: MapConfigJson,
    draw: DrawConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: String::new(),
            format: InputFormat::Csv,
            ibex_release: None,
            mask_nonpositive: false,
            output_path: "skymap.png".to_string(),
            summary_path: None,
            width: 1600,
            height: 800,
            orientation: OrientationJson::default(),
            preset_coords: PresetCoordsJson::default(),
            map_cfg: MapConfigJson::default(),
            draw: DrawConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OrientationRecord {
    alf: f64,
    phi: f64,
    th: f64,
}

#[derive(Debug, Serialize)]
struct PatchRecord {
    rows: usize,
    cols: usize,
}

#[derive(Debug, Serialize)]
struct Output {
    orientation: OrientationRecord,
    patches: Vec<PatchRecord>,
    vmin: f64,
    vmax: f64,
    image_path: String,
}

fn resolve_orientation(
    cfg: &OrientationJson,
    coords: &PresetCoords,
) -> Result<Orientation, Box<dyn std::error::Error>> {
    match &cfg.preset {
        Some(name) => Ok(name.parse::<Preset>()?.orientation(coords)),
        None => Ok(Orientation::new(cfg.alf, cfg.phi, cfg.th)
            .with_center_meridian(cfg.center_meridian)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("skymap=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.width == 0 || config.height == 0 {
        return Err("width and height must be at least 1".into());
    }

    let grid = match (config.input_path.as_str(), config.ibex_release) {
        ("", Some(release)) => {
            let path = input::IbexSelection::from(release).path();
            tracing::debug!(path = %path.display(), "resolved IBEX release file");
            input::load_ibex(&path)?
        }
        ("", None) => return Err("input_path or ibex_release must be set in the config".into()),
        (path, _) => match config.format {
            InputFormat::Csv => input::load_csv(Path::new(path))?,
            InputFormat::Ibex => input::load_ibex(Path::new(path))?,
        },
    };
    let grid = if config.mask_nonpositive {
        input::mask_nonpositive(grid)?
    } else {
        grid
    };

    let coords = PresetCoords::from(config.preset_coords);
    let orientation = resolve_orientation(&config.orientation, &coords)?;
    let map = RotatedMap::build(&grid, &orientation, &config.map_cfg.into())?;

    let mut raster = RasterRenderer::new(config.width, config.height)?;
    let range = draw_map(&mut raster, &map, &config.draw.into())?;
    raster.save_png(&config.output_path)?;
    tracing::info!(path = %config.output_path, vmin = range.vmin, vmax = range.vmax, "wrote map image");

    let resolved = map.orientation();
    let output = Output {
        orientation: OrientationRecord {
            alf: resolved.alf,
            phi: resolved.phi,
            th: resolved.th,
        },
        patches: map
            .patches()
            .iter()
            .map(|patch| {
                let (rows, cols) = patch.pixel_shape();
                PatchRecord { rows, cols }
            })
            .collect(),
        vmin: range.vmin,
        vmax: range.vmax,
        image_path: config.output_path,
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.summary_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
