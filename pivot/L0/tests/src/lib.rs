//! Shared fixtures for pivot integration tests.

#![warn(missing_docs)]

use pivot_dance::{Figure, Result, TangoSession};
use pivot_scene::{studio, MemoryScene};
use pivot_types::{Dancer, PivotConfig};

/// Header line used by the step-file fixtures.
pub const STEP_HEADER: &str = "# dancer | step | qualifier | clock | beats";

/// Walk used by the couple fixtures.
pub const COUPLE_WALK: [&str; 6] = ["forward", "side", "shift", "back", "side", "shift"];

/// The reference scene and a freshly reset figure.
///
/// # Errors
///
/// Returns an error if the figure cannot be created or reset.
pub fn studio_figure(dancer: Dancer) -> Result<(MemoryScene, Figure)> {
    let mut scene = studio::mannequin_studio();
    let mut figure = Figure::new(&scene, dancer, &PivotConfig::default())?;
    figure.reset(&mut scene)?;
    Ok((scene, figure))
}

/// The reference scene and a session over it.
///
/// # Errors
///
/// Returns an error if either figure is missing from the scene.
pub fn studio_session(config: &PivotConfig) -> Result<(MemoryScene, TangoSession)> {
    let scene = studio::mannequin_studio();
    let session = TangoSession::new(&scene, config)?;
    Ok((scene, session))
}

/// A step file from data rows, with the standard header.
#[must_use]
pub fn step_file(rows: &[&str]) -> String {
    let mut text = format!("{STEP_HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}
