//! Loaders for gridded sky data files.

use skymap::{Grid, Matrix};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

type LoadResult<T> = Result<T, Box<dyn Error>>;

/// Reads a comma-separated map file.
///
/// Lines starting with `#` are skipped. The first remaining line holds the
/// `n + 1` longitude edges, the second the `m + 1` latitude edges, and the
/// following `m` lines hold `n` values each.
pub fn load_csv(path: &Path) -> LoadResult<Grid> {
    parse_csv(&fs::read_to_string(path)?)
}

pub fn parse_csv(text: &str) -> LoadResult<Grid> {
    let mut lines = text
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty());
    let lon = parse_row(lines.next().ok_or("missing longitude line")?, ',')?;
    let lat = parse_row(lines.next().ok_or("missing latitude line")?, ',')?;
    let rows = lines
        .map(|line| parse_row(line, ','))
        .collect::<LoadResult<Vec<_>>>()?;
    Ok(Grid::from_rows(lon, lat, rows)?)
}

/// Reads a map file in the IBEX data release text layout.
///
/// The header line carries the latitude bin count at columns 5..7 and the
/// longitude bin count at 8..10; data rows are whitespace-separated. Bin
/// edges span the full sky evenly.
pub fn load_ibex(path: &Path) -> LoadResult<Grid> {
    parse_ibex(&fs::read_to_string(path)?)
}

pub fn parse_ibex(text: &str) -> LoadResult<Grid> {
    let mut lines = text.lines();
    let header = lines.next().ok_or("empty IBEX file")?;
    let lat_num = header_count(header, 5..7, "latitude")?;
    let lon_num = header_count(header, 8..10, "longitude")?;

    let rows = lines
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .map(|line| parse_values(line.split_whitespace()))
        .collect::<LoadResult<Vec<_>>>()?;

    let lon = even_edges(0.0, 360.0, lon_num);
    let lat = even_edges(-90.0, 90.0, lat_num);
    Ok(Grid::from_rows(lon, lat, rows)?)
}

/// IBEX sensor whose data release layout is addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instrument {
    Hi,
    Lo,
}

/// Picks one map file inside a local IBEX data release directory.
#[derive(Clone, Debug)]
pub struct IbexSelection {
    /// Release folder holding the per-product subfolders.
    pub root: PathBuf,
    pub instrument: Instrument,
    /// Data product tag, e.g. `noSP_ram`.
    pub product: String,
    /// Extra subfolders below the product level, may be empty.
    pub subfolder: String,
    pub energy_bin: u32,
    /// Year, or the `A`/`B` half-set label some Hi products use.
    pub year: String,
    /// Quantity such as `flux`, `fvar` or `fexp`.
    pub quantity: String,
}

impl IbexSelection {
    /// Returns the path of the selected map file.
    pub fn path(&self) -> PathBuf {
        let (set_dir, file_name) = match self.instrument {
            Instrument::Hi => (
                format!("hvset_{}_{}", self.product, self.year),
                format!(
                    "hv60.hide-trp-flux100-hi-{}-{}.txt",
                    self.energy_bin, self.quantity
                ),
            ),
            Instrument::Lo => (
                format!("lvset_h_{}_hb_{}", self.product, self.year),
                format!(
                    "lv60.lohb-trp-flux100-lo-{}-{}.txt",
                    self.energy_bin, self.quantity
                ),
            ),
        };
        let mut path = self.root.join(set_dir);
        let subfolder = self.subfolder.trim_matches('/');
        if !subfolder.is_empty() {
            path.push(subfolder);
        }
        path.join(file_name)
    }
}

/// Replaces zero and negative values with NaN so they render transparent.
pub fn mask_nonpositive(grid: Grid) -> LoadResult<Grid> {
    let data: Matrix = grid.data().map(|v| if v > 0.0 { v } else { f64::NAN });
    Ok(Grid::new(
        grid.lon_edges().to_vec(),
        grid.lat_edges().to_vec(),
        data,
    )?)
}

fn parse_row(line: &str, sep: char) -> LoadResult<Vec<f64>> {
    parse_values(line.split(sep).map(str::trim).filter(|s| !s.is_empty()))
}

fn parse_values<'a>(fields: impl Iterator<Item = &'a str>) -> LoadResult<Vec<f64>> {
    let mut values = Vec::new();
    for field in fields {
        let value = field
            .parse::<f64>()
            .map_err(|err| format!("bad value {field:?}: {err}"))?;
        values.push(value);
    }
    Ok(values)
}

fn header_count(header: &str, range: std::ops::Range<usize>, what: &str) -> LoadResult<usize> {
    let field = header
        .get(range)
        .ok_or_else(|| format!("IBEX header too short for {what} count"))?;
    Ok(field.trim().parse()?)
}

fn even_edges(start: f64, stop: f64, bins: usize) -> Vec<f64> {
    let step = (stop - start) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { stop } else { start + step * i as f64 })
        .collect()
}
