//! Choreography for a pair of animated dancers.
//!
//! Turns step requests into placed clips and keys each figure's root so
//! consecutive steps join without a jump:
//!
//! - [`step`] - resolve step names to clips and measure a clip's root
//!   displacement
//! - [`Figure`] - one dancer's timeline: reset, embrace, add motion,
//!   housekeeping
//! - [`StepLoader`] - read pipe-delimited step files
//! - [`TangoSession`] - dance a step file with both figures
//! - [`Diagnostics`] - self-checks against a live scene
//!
//! # Example
//!
//! ```
//! use pivot_dance::{StepLoader, TangoSession};
//! use pivot_scene::studio;
//! use pivot_types::PivotConfig;
//!
//! let mut scene = studio::mannequin_studio();
//! let config = PivotConfig::default();
//! let records = StepLoader::from_config(&config)
//!     .parse_str("# dancer | step | qualifier | clock | beats\nboth | forward | | 0 | 14\n")
//!     .unwrap();
//!
//! let mut session = TangoSession::new(&scene, &config).unwrap();
//! session.run(&mut scene, &records).unwrap();
//! assert_eq!(session.man().last_frame(), 12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod diagnostics;
mod error;
mod figure;
mod session;
pub mod step;
pub mod stepfile;

pub use diagnostics::{Check, Diagnostics, DiagnosticsReport};
pub use error::{DanceError, ErrorKind, Result};
pub use figure::{mirror_steps, Duration, Figure, PlacedClip};
pub use session::{beats_to_frames, TangoSession, EMBRACE};
pub use step::{StepRef, StepSpec};
pub use stepfile::{StepLoader, StepRecord, StepRow};
