//! Seam handling for rotated maps.
//!
//! `seams` finds where the shifted grid meets the map edge, `patch` cuts
//! the rotated mesh there, and `gridline` applies the same idea to single
//! polylines.

pub mod gridline;
pub mod patch;
pub mod seams;

pub use gridline::{gridline, split_gridline, Gridline, GridlineKind};
pub use patch::{correct_seam_values, split_columns, split_patches, Patch, SEAM_TOLERANCE_SQ};
pub use seams::{find_seams, MAX_SEAMS};
