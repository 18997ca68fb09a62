//! Integration tests for the pivot crates.
//!
//! These tests drive the engine end to end against the reference studio:
//! - Placement and root compensation across consecutive steps
//! - Step files through the tango session
//! - Couple walks and mirroring
//! - Scene persistence after a dance

pub mod couple_walk;
pub mod root_compensation;
pub mod scene_roundtrip;
pub mod step_files;
