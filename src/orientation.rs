//! Map orientation: the view angles and their named presets.
//!
//! An [`Orientation`] is what the caller asks for; [`Orientation::resolve`]
//! turns it into the normalized angles the pipeline works with. Presets are
//! resolved against an explicit [`PresetCoords`] value rather than any
//! process-wide configuration.

use std::fmt;
use std::str::FromStr;

use crate::sphere::normalize;
use crate::util::{SkyMapError, SkyMapResult};

/// Requested view orientation, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Polar tilt of the view pole away from the source pole.
    pub alf: f64,
    /// Azimuth of the view center before the tilt is applied.
    pub phi: f64,
    /// Final horizontal re-centering angle.
    pub th: f64,
    /// Interpret `th` as the source longitude to place on the central
    /// meridian of the map instead of a raw rotation.
    pub center_meridian: bool,
}

impl Orientation {
    /// Creates an orientation with `th` taken as a raw rotation.
    pub fn new(alf: f64, phi: f64, th: f64) -> Self {
        Self {
            alf,
            phi,
            th,
            center_meridian: false,
        }
    }

    /// Sets whether `th` names the longitude on the central meridian.
    pub fn with_center_meridian(mut self, center_meridian: bool) -> Self {
        self.center_meridian = center_meridian;
        self
    }

    /// Builds the orientation for a named preset.
    pub fn from_preset(preset: Preset, coords: &PresetCoords) -> Self {
        match preset {
            Preset::Ecliptic => Self::new(0.0, 0.0, 0.0),
            Preset::Nose => Self::new(coords.nose_lat, coords.nose_lon, 0.0),
            Preset::Tail => Self::new(coords.tail_lat, coords.tail_lon, 0.0),
            Preset::RibbonLine => {
                Self::new(-coords.ribbon_lat, coords.ribbon_lon, -120.0).with_center_meridian(true)
            }
            Preset::RibbonCircle => Self::new(coords.ribbon_lat, coords.ribbon_lon, 0.0),
            Preset::Galactic => Self::new(coords.ngp_lat - 90.0, coords.ngp_lon, coords.gal_center_lon)
                .with_center_meridian(true),
        }
    }

    /// Normalizes all angles into `[-180, 180)` and, in center-meridian
    /// mode, converts `th` into the equivalent raw rotation.
    ///
    /// The conversion is `th' = atan(tan(phi - th) * cos(alf))`, moved by
    /// 180° when `|phi - th| mod 360` lies in `(90, 270)` so the result
    /// covers the full circle.
    pub fn resolve(&self) -> SkyMapResult<ResolvedOrientation> {
        let alf = normalize(self.alf, -180.0)?;
        let phi = normalize(self.phi, -180.0)?;
        let mut th = normalize(self.th, -180.0)?;

        if self.center_meridian {
            let delta = phi - th;
            let folded = delta.abs().rem_euclid(360.0);
            let back_half = folded > 90.0 && folded < 270.0;
            let mut centered = (delta.to_radians().tan() * alf.to_radians().cos())
                .atan()
                .to_degrees();
            if back_half {
                centered += 180.0;
            }
            th = normalize(centered, -180.0)?;
        }

        Ok(ResolvedOrientation { alf, phi, th })
    }
}

/// Normalized orientation angles used by the pipeline, in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolvedOrientation {
    pub alf: f64,
    pub phi: f64,
    pub th: f64,
}

/// Named map orientations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Plain ecliptic coordinates.
    Ecliptic,
    /// Centered on the interstellar inflow (heliospheric nose).
    Nose,
    /// Centered on the heliotail.
    Tail,
    /// IBEX ribbon center as view pole; the ribbon runs as a line.
    RibbonLine,
    /// Centered on the IBEX ribbon; the ribbon appears as a circle.
    RibbonCircle,
    /// Galactic orientation with the galactic center on the central meridian.
    Galactic,
}

impl Preset {
    /// All presets in declaration order.
    pub const ALL: [Preset; 6] = [
        Preset::Ecliptic,
        Preset::Nose,
        Preset::Tail,
        Preset::RibbonLine,
        Preset::RibbonCircle,
        Preset::Galactic,
    ];

    /// Canonical keyword for the preset.
    pub fn keyword(self) -> &'static str {
        match self {
            Preset::Ecliptic => "ecliptic",
            Preset::Nose => "nose",
            Preset::Tail => "tail",
            Preset::RibbonLine => "ribbon",
            Preset::RibbonCircle => "ribbon_c",
            Preset::Galactic => "galactic",
        }
    }

    /// Shorthand for [`Orientation::from_preset`].
    pub fn orientation(self, coords: &PresetCoords) -> Orientation {
        Orientation::from_preset(self, coords)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Preset {
    type Err = SkyMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ecl" | "ecliptic" => Ok(Preset::Ecliptic),
            "nose" => Ok(Preset::Nose),
            "tail" => Ok(Preset::Tail),
            "ribbon" | "ribbon_line" | "ribbon_l" => Ok(Preset::RibbonLine),
            "ribbon_c" | "ribbon_circle" => Ok(Preset::RibbonCircle),
            "gal" | "galactic" => Ok(Preset::Galactic),
            _ => Err(SkyMapError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}

/// Ecliptic (J2000) reference directions used by the presets, in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetCoords {
    pub nose_lon: f64,
    pub nose_lat: f64,
    pub tail_lon: f64,
    pub tail_lat: f64,
    pub ribbon_lon: f64,
    pub ribbon_lat: f64,
    /// North galactic pole.
    pub ngp_lon: f64,
    pub ngp_lat: f64,
    /// Ecliptic longitude of the galactic center.
    pub gal_center_lon: f64,
}

impl Default for PresetCoords {
    fn default() -> Self {
        Self {
            nose_lon: 255.7,
            nose_lat: 5.1,
            tail_lon: 75.7,
            tail_lat: -5.1,
            ribbon_lon: 221.0,
            ribbon_lat: 39.0,
            ngp_lon: 180.02,
            ngp_lat: 29.81,
            gal_center_lon: 266.84,
        }
    }
}
