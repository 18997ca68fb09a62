//! Self-checks against a live scene.
//!
//! [`Diagnostics::run`] exercises lookup, frame control, transform math,
//! resolution and placement on whatever scene it is given, and turns every
//! outcome (including errors) into a pass or a fail. It never returns an
//! error itself.

use std::fmt;

use nalgebra::{DMatrix, UnitQuaternion, Vector3};
use tracing::{debug, warn};

use pivot_scene::{DataKind, Scene};
use pivot_types::transform::{compose, max_abs};
use pivot_types::{Dancer, Foot, PivotConfig};

use crate::error::Result;
use crate::figure::{Duration, Figure};
use crate::step::{self, flip, intrinsic_displacement, is_motion};

/// Tolerance for matrix comparisons.
pub const ALLOWED_DIFF: f64 = 1.0e-3;

/// Expected Y of the man after a forward then a side step.
pub const WALK_Y: f64 = -1.007;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// What was checked.
    pub description: String,
    /// Whether it held.
    pub passed: bool,
    /// Error text for a check that could not run.
    pub detail: Option<String>,
}

/// All checks from one diagnostics run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsReport {
    /// Scene description printed ahead of the checks.
    pub summary: String,
    /// Checks in the order they ran.
    pub checks: Vec<Check>,
}

impl DiagnosticsReport {
    /// Number of passing checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Number of failing checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    /// True when nothing failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code: 0 if all passed, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.all_passed())
    }

    fn ok(&mut self, description: impl Into<String>, outcome: Result<bool>) {
        let description = description.into();
        let (passed, detail) = match outcome {
            Ok(passed) => (passed, None),
            Err(err) => (false, Some(err.to_string())),
        };
        if passed {
            debug!(check = %description, "ok");
        } else {
            warn!(check = %description, detail = detail.as_deref(), "not ok");
        }
        self.checks.push(Check {
            description,
            passed,
            detail,
        });
    }
}

impl fmt::Display for DiagnosticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(43);
        writeln!(f, "{rule}")?;
        writeln!(f, "=== pivot {} diagnostics ===", env!("CARGO_PKG_VERSION"))?;
        writeln!(f, "{rule}")?;
        writeln!(f, "=== summaries ===")?;
        write!(f, "{}", self.summary)?;
        writeln!(f, "=== Starting tests. ===")?;
        for check in &self.checks {
            let status = if check.passed { "ok" } else { "not ok" };
            match &check.detail {
                Some(detail) => writeln!(f, " {status:<8}  {} ({detail})", check.description)?,
                None => writeln!(f, " {status:<8}  {}", check.description)?,
            }
        }
        writeln!(f, "=== Finished {} tests. ===", self.checks.len())?;
        match self.failed() {
            0 => writeln!(f, " All tests passed."),
            1 => writeln!(f, " Failed 1 test."),
            n => writeln!(f, " Failed {n} tests."),
        }
    }
}

/// The diagnostics suite.
pub struct Diagnostics;

impl Diagnostics {
    /// Run every check on `scene`.
    ///
    /// The scene is modified: both figures end up reset and walked.
    pub fn run<S: Scene>(scene: &mut S, config: &PivotConfig) -> DiagnosticsReport {
        let mut report = DiagnosticsReport {
            summary: scene_summary(scene),
            checks: Vec::new(),
        };
        report.ok("ok itself", Ok(true));
        lookup_checks(&mut report, scene, config);
        frame_checks(&mut report, scene);
        math_checks(&mut report, scene, config);
        if let Err(err) = figure_checks(&mut report, scene, config) {
            report.ok("figure checks completed", Err(err));
        }
        report
    }
}

fn scene_summary<S: Scene>(scene: &S) -> String {
    let mut out = format!(" objects: {}\n", scene.object_names().join(", "));
    out.push_str(&format!(
        " models: {}\n",
        Dancer::ALL.map(Dancer::nickname).join(", ")
    ));
    out.push_str(" clips:\n");
    for name in scene.clip_names() {
        out.push_str(&format!("  '{name}'\n"));
    }
    out
}

fn lookup_checks<S: Scene>(report: &mut DiagnosticsReport, scene: &S, config: &PivotConfig) {
    let armature = &config.names.armature;
    let idle = &config.names.idle_clip;
    report.ok(
        format!("lookup('{armature}')"),
        scene.lookup(armature).map(|k| k == DataKind::Object).map_err(Into::into),
    );
    report.ok(
        format!("  lookup('{idle}')"),
        scene.lookup(idle).map(|k| k == DataKind::Clip).map_err(Into::into),
    );
    let name = "step forward L to R";
    report.ok(
        "  clip(name)",
        scene.clip(name).map(|c| c.name() == name).map_err(Into::into),
    );
    report.ok(
        "  resolve(clip)",
        scene
            .clip(name)
            .map_err(Into::into)
            .and_then(|c| step::resolve(scene, c, Foot::Left, false, None))
            .map(|c| c.name() == name),
    );
    report.ok("  lookup('') fails", Ok(scene.lookup("").is_err()));
}

fn frame_checks<S: Scene>(report: &mut DiagnosticsReport, scene: &mut S) {
    scene.set_current_frame(1);
    report.ok("frame()", Ok(scene.current_frame() == 1));
    report.ok("  goto_frame(2)", Ok(scene.goto_frame(2, false) == 2));
}

fn math_checks<S: Scene>(report: &mut DiagnosticsReport, scene: &S, config: &PivotConfig) {
    let m = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, -4.0, 3.0, 2.0]);
    report.ok("max_abs()", Ok((max_abs(&m) - 4.0).abs() < f64::EPSILON));

    let name = "step back L to R";
    let expected = compose(&Vector3::new(0.0, 4.91, 0.0), UnitQuaternion::identity());
    report.ok(
        format!("intrinsic_displacement('{name}')"),
        scene
            .clip(name)
            .map_err(Into::into)
            .and_then(|c| intrinsic_displacement(&c, &config.root_bone))
            .map(|motion| max_abs(&(motion - expected)) < ALLOWED_DIFF),
    );
    report.ok(
        "  resolve('forward')",
        step::resolve(scene, "forward", Foot::Left, false, None)
            .map(|c| c.name() == "step forward L to R"),
    );
    report.ok(
        "  resolve mirrored",
        step::resolve(scene, "forward", Foot::Left, true, None)
            .map(|c| c.name() == "step back R to L"),
    );
    report.ok("  flip()", Ok(flip("forward") == Some("back")));
}

fn figure_checks<S: Scene>(
    report: &mut DiagnosticsReport,
    scene: &mut S,
    config: &PivotConfig,
) -> Result<()> {
    let frames = 12;
    let start = config.start_frame;
    let mut man = Figure::new(&*scene, Dancer::Man, config)?;
    report.ok("Figure::new(man)", Ok(true));

    man.reset(scene)?;
    report.ok("  reset() clips", Ok(man.placed().len() == 1));
    report.ok(
        "  reset() keys",
        scene.keyframe_count(man.model()).map(|n| n == 1).map_err(Into::into),
    );

    let forward = "step forward L to R";
    man.add_motion(scene, forward, Duration::Frames(frames), None)?;
    let placed = man.placed().last().filter(|p| is_motion(&p.clip));
    report.ok("  add_motion()", Ok(placed.is_some_and(|p| p.name() == forward)));
    report.ok(
        "    frame length",
        Ok(placed.is_some_and(|p| p.span.len() == frames)),
    );

    man.housekeeping(scene)?;
    report.ok(
        "  housekeeping() idle clip",
        Ok(man.placed()[0].span.end == start + frames),
    );

    man.add_motion(scene, "step side R to L", Duration::Frames(frames), None)?;
    man.housekeeping(scene)?;
    scene.set_current_frame(start + 2 * frames);
    let y = scene.location(man.model())?.y;
    report.ok("  add_motion() moves root", Ok((y - WALK_Y).abs() < 0.01));

    let mut woman = Figure::new(&*scene, Dancer::Woman, config)?;
    let sequence = ["forward", "side", "shift", "back", "side", "shift"];
    man.walk_sequence(scene, Foot::Left, &sequence, Some(&mut woman), frames)?;
    let (_, mirrored) = crate::figure::mirror_steps(Foot::Left, &sequence)?;
    let woman_steps: Vec<&str> = woman
        .placed()
        .iter()
        .filter(|p| p.is_motion())
        .map(|p| p.name())
        .collect();
    let mut foot = Foot::Right;
    let expected: Vec<String> = mirrored
        .iter()
        .map(|name| {
            let long = format!("step {name} {foot} to {}", foot.flip());
            foot = foot.flip();
            long
        })
        .collect();
    report.ok("walk_sequence() mirrors partner", Ok(woman_steps == expected));
    report.ok(
        "  both figures end together",
        Ok(man.last_frame() == woman.last_frame()),
    );
    Ok(())
}
