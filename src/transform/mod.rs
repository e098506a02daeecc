//! The ten pixel effects and their fixed registry.
//!
//! [`TransformKind`] is the numbered menu (ids 1–10, names, descriptions and
//! the parameters each one needs). [`Transform`] is a kind with its
//! parameters filled in, ready to [`apply`](Transform::apply). Every transform
//! is pure: the input buffer is never modified.

mod geometry;
mod tone;

use core::fmt;
use core::str::FromStr;

use crate::error::BmpError;
use crate::pixel::{Overflow, PixelBuffer};

pub use geometry::{enlarge, rotate90, rotate90x};
pub use tone::{black_white_rgb, claredon, darken, grayscale, high_contrast, lighten, vignette};

/// A numeric input a transform needs from the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    /// Real scaling factor, normally in `0.0..=1.0`.
    Factor,
    /// Number of clockwise quarter turns.
    Rotations,
    XScale,
    YScale,
}

impl Param {
    pub fn name(self) -> &'static str {
        match self {
            Self::Factor => "factor",
            Self::Rotations => "rotations",
            Self::XScale => "x-scale",
            Self::YScale => "y-scale",
        }
    }

    /// Prompt text for interactive collection.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Factor => "Please enter the scaling factor for the effect: (between 0 and 1)",
            Self::Rotations => "Please enter the number of rotations:",
            Self::XScale => "Please enter the x scale factor:",
            Self::YScale => "Please enter the y scale factor:",
        }
    }
}

/// Parameter values gathered by a caller before building a [`Transform`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Params {
    pub factor: Option<f64>,
    pub rotations: Option<u32>,
    pub x_scale: Option<u32>,
    pub y_scale: Option<u32>,
}

/// The fixed set of effects, numbered as in the interactive menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Vignette = 1,
    Claredon = 2,
    Grayscale = 3,
    Rotate90 = 4,
    Rotate90x = 5,
    Enlarge = 6,
    HighContrast = 7,
    Lighten = 8,
    Darken = 9,
    BlackWhiteRgb = 10,
}

impl TransformKind {
    /// All kinds in menu order.
    pub const ALL: [TransformKind; 10] = [
        Self::Vignette,
        Self::Claredon,
        Self::Grayscale,
        Self::Rotate90,
        Self::Rotate90x,
        Self::Enlarge,
        Self::HighContrast,
        Self::Lighten,
        Self::Darken,
        Self::BlackWhiteRgb,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    /// Short name, also used as the output file suffix.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vignette => "vignette",
            Self::Claredon => "claredon",
            Self::Grayscale => "grayscale",
            Self::Rotate90 => "rotate90",
            Self::Rotate90x => "rotate90x",
            Self::Enlarge => "enlarge",
            Self::HighContrast => "highcontrast",
            Self::Lighten => "lighten",
            Self::Darken => "darken",
            Self::BlackWhiteRgb => "bwrgb",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Vignette => "Adds vignette effect to image (dark corners)",
            Self::Claredon => {
                "Adds claredon type effect to image - darks darker and lights lighter"
            }
            Self::Grayscale => "Grayscale image",
            Self::Rotate90 => "Rotates image by 90 degrees clockwise (not counter-clockwise)",
            Self::Rotate90x => "Rotates image by multiples of 90 degrees clockwise",
            Self::Enlarge => "Enlarges the image in the x and y direction",
            Self::HighContrast => "Convert image to high contrast - black and white only",
            Self::Lighten => "Lightens image",
            Self::Darken => "Darkens image",
            Self::BlackWhiteRgb => "Converts image to only black, white, red, blue, and green",
        }
    }

    /// Parameters the caller must supply, in prompt order.
    pub fn params(self) -> &'static [Param] {
        match self {
            Self::Claredon | Self::Lighten | Self::Darken => &[Param::Factor],
            Self::Rotate90x => &[Param::Rotations],
            Self::Enlarge => &[Param::XScale, Param::YScale],
            Self::Vignette
            | Self::Grayscale
            | Self::Rotate90
            | Self::HighContrast
            | Self::BlackWhiteRgb => &[],
        }
    }

    /// Fill in parameters. Fails with [`BmpError::InvalidParameter`] when one
    /// this kind needs is missing.
    pub fn with_params(self, params: &Params) -> Result<Transform, BmpError> {
        fn need<T>(value: Option<T>, param: Param, kind: TransformKind) -> Result<T, BmpError> {
            value.ok_or_else(|| {
                BmpError::InvalidParameter(format!("{} requires {}", kind.name(), param.name()))
            })
        }
        Ok(match self {
            Self::Vignette => Transform::Vignette,
            Self::Claredon => Transform::Claredon {
                factor: need(params.factor, Param::Factor, self)?,
            },
            Self::Grayscale => Transform::Grayscale,
            Self::Rotate90 => Transform::Rotate90,
            Self::Rotate90x => Transform::Rotate90x {
                rotations: need(params.rotations, Param::Rotations, self)?,
            },
            Self::Enlarge => Transform::Enlarge {
                x_scale: need(params.x_scale, Param::XScale, self)?,
                y_scale: need(params.y_scale, Param::YScale, self)?,
            },
            Self::HighContrast => Transform::HighContrast,
            Self::Lighten => Transform::Lighten {
                factor: need(params.factor, Param::Factor, self)?,
            },
            Self::Darken => Transform::Darken {
                factor: need(params.factor, Param::Factor, self)?,
            },
            Self::BlackWhiteRgb => Transform::BlackWhiteRgb,
        })
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts a menu id (`"4"`) or a name (`"rotate90"`, case-insensitive).
impl FromStr for TransformKind {
    type Err = BmpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = match s.parse::<u8>() {
            Ok(id) => Self::from_id(id),
            Err(_) => Self::ALL
                .into_iter()
                .find(|k| k.name().eq_ignore_ascii_case(s)),
        };
        found.ok_or_else(|| BmpError::InvalidParameter(format!("unknown transform {s:?}")))
    }
}

/// A transform with its parameters bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transform {
    Vignette,
    Claredon { factor: f64 },
    Grayscale,
    Rotate90,
    Rotate90x { rotations: u32 },
    Enlarge { x_scale: u32, y_scale: u32 },
    HighContrast,
    Lighten { factor: f64 },
    Darken { factor: f64 },
    BlackWhiteRgb,
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Vignette => TransformKind::Vignette,
            Self::Claredon { .. } => TransformKind::Claredon,
            Self::Grayscale => TransformKind::Grayscale,
            Self::Rotate90 => TransformKind::Rotate90,
            Self::Rotate90x { .. } => TransformKind::Rotate90x,
            Self::Enlarge { .. } => TransformKind::Enlarge,
            Self::HighContrast => TransformKind::HighContrast,
            Self::Lighten { .. } => TransformKind::Lighten,
            Self::Darken { .. } => TransformKind::Darken,
            Self::BlackWhiteRgb => TransformKind::BlackWhiteRgb,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Apply with [`Overflow::Wrap`] channel storage.
    pub fn apply(&self, buf: &PixelBuffer) -> Result<PixelBuffer, BmpError> {
        self.apply_with(buf, Overflow::Wrap)
    }

    /// Apply, storing out-of-range channel values per `overflow`.
    ///
    /// Only [`Transform::Enlarge`] can fail: a zero scale factor, or output
    /// dimensions that overflow.
    pub fn apply_with(&self, buf: &PixelBuffer, overflow: Overflow) -> Result<PixelBuffer, BmpError> {
        let out = match *self {
            Self::Vignette => vignette(buf, overflow),
            Self::Claredon { factor } => claredon(buf, factor, overflow),
            Self::Grayscale => grayscale(buf),
            Self::Rotate90 => rotate90(buf),
            Self::Rotate90x { rotations } => rotate90x(buf, rotations),
            Self::Enlarge { x_scale, y_scale } => enlarge(buf, x_scale, y_scale)?,
            Self::HighContrast => high_contrast(buf),
            Self::Lighten { factor } => lighten(buf, factor, overflow),
            Self::Darken { factor } => darken(buf, factor, overflow),
            Self::BlackWhiteRgb => black_white_rgb(buf),
        };
        log::debug!(
            "{}: {}x{} -> {}x{}",
            self.name(),
            buf.width(),
            buf.height(),
            out.width(),
            out.height()
        );
        Ok(out)
    }
}
