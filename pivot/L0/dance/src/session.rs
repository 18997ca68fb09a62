//! File-driven sequencing of a dancing couple.

use std::path::Path;

use tracing::info;

use pivot_scene::Scene;
use pivot_types::{Dancer, Frame, PivotConfig, Tempo};

use crate::error::Result;
use crate::figure::{Duration, Figure};
use crate::step;
use crate::stepfile::{StepLoader, StepRecord};

/// Step name that puts a figure into its embrace.
pub const EMBRACE: &str = "embrace";

/// Whole frames in `beats` at the given tempo, truncated toward zero.
///
/// ```
/// use pivot_dance::beats_to_frames;
/// use pivot_types::Tempo;
///
/// assert_eq!(beats_to_frames(&Tempo::default(), 1.0), 0);
/// assert_eq!(beats_to_frames(&Tempo::default(), 14.0), 12);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn beats_to_frames(tempo: &Tempo, beats: f64) -> Frame {
    (beats * tempo.frames_per_beat()) as Frame
}

/// A man and a woman danced from step records.
///
/// Records run in order. Each one goes to the man, the woman, or the man
/// then the woman, and every placement is followed by housekeeping. The
/// first failing record stops the run; placements already made stay in the
/// host.
#[derive(Debug, Clone)]
pub struct TangoSession {
    man: Figure,
    woman: Figure,
    config: PivotConfig,
}

impl TangoSession {
    /// Session with both figures found in `scene`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if either model or the armature is missing.
    pub fn new<S: Scene + ?Sized>(scene: &S, config: &PivotConfig) -> Result<Self> {
        Ok(Self {
            man: Figure::new(scene, Dancer::Man, config)?,
            woman: Figure::new(scene, Dancer::Woman, config)?,
            config: config.clone(),
        })
    }

    /// Figure for `dancer`.
    #[must_use]
    pub const fn figure(&self, dancer: Dancer) -> &Figure {
        match dancer {
            Dancer::Man => &self.man,
            Dancer::Woman => &self.woman,
        }
    }

    /// The man.
    #[must_use]
    pub const fn man(&self) -> &Figure {
        &self.man
    }

    /// The woman.
    #[must_use]
    pub const fn woman(&self) -> &Figure {
        &self.woman
    }

    /// Frames in `beats` at the session tempo.
    #[must_use]
    pub fn beats_to_frames(&self, beats: f64) -> Frame {
        beats_to_frames(&self.config.tempo, beats)
    }

    /// Reset both figures.
    ///
    /// # Errors
    ///
    /// Returns a lookup error from the host.
    pub fn reset<S: Scene>(&mut self, scene: &mut S) -> Result<()> {
        self.man.reset(scene)?;
        self.woman.reset(scene)
    }

    /// Reset, then dance every record in order.
    ///
    /// # Errors
    ///
    /// Returns the first record's error; earlier records stay placed.
    pub fn run<S: Scene>(&mut self, scene: &mut S, records: &[StepRecord]) -> Result<()> {
        self.reset(scene)?;
        for record in records {
            for &dancer in record.dancer.dancers() {
                self.dispatch_one(scene, dancer, record)?;
            }
        }
        info!(
            records = records.len(),
            man_last = self.man.last_frame(),
            woman_last = self.woman.last_frame(),
            "Sequenced step records"
        );
        Ok(())
    }

    /// Read a step file and [`run`](Self::run) it. Returns the record count.
    ///
    /// # Errors
    ///
    /// Returns a file-format error, or see [`Self::run`].
    pub fn run_file<S: Scene>(&mut self, scene: &mut S, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let records = StepLoader::from_config(&self.config).read_file(path)?;
        info!(path = %path.display(), records = records.len(), "Loaded step file");
        self.run(scene, &records)?;
        Ok(records.len())
    }

    /// Dance one record on one figure.
    ///
    /// `embrace` embraces: the man in place, the woman relative to the man.
    /// Anything else is resolved from the figure's current foot and the
    /// record's qualifier, and placed at the record's clock. A duration
    /// shorter than one frame becomes one frame.
    ///
    /// # Errors
    ///
    /// Returns a resolution, lookup or configuration error.
    pub fn dispatch_one<S: Scene>(
        &mut self,
        scene: &mut S,
        dancer: Dancer,
        record: &StepRecord,
    ) -> Result<()> {
        let when = self.beats_to_frames(record.clock);
        let duration = self.beats_to_frames(record.beats).max(1);
        let (figure, partner) = match dancer {
            Dancer::Man => (&mut self.man, None),
            Dancer::Woman => (&mut self.woman, Some(&self.man)),
        };

        if record.step == EMBRACE {
            figure.embrace(scene, partner)?;
        } else {
            let clip = step::resolve(
                &*scene,
                record.step.as_str(),
                figure.foot(),
                false,
                record.qualifier.as_deref(),
            )?;
            figure.add_motion(scene, clip, Duration::Frames(duration), Some(when))?;
        }
        figure.housekeeping(scene)?;
        info!(
            line = record.line,
            dancer = dancer.nickname(),
            step = %record.step,
            when,
            duration,
            "Dispatched step"
        );
        Ok(())
    }

    /// Both figures' summaries, one per line.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{}\n{}", self.man.summary(), self.woman.summary())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::stepfile::parse;
    use pivot_scene::studio;
    use pivot_types::{Foot, FrameSpan};

    const HEADER: &str = "# dancer | step | qualifier | clock | beats";

    fn session() -> (pivot_scene::MemoryScene, TangoSession) {
        let scene = studio::mannequin_studio();
        let session = TangoSession::new(&scene, &PivotConfig::default()).unwrap();
        (scene, session)
    }

    #[test]
    fn beats_truncate() {
        let tempo = Tempo::default();
        assert_eq!(beats_to_frames(&tempo, 0.0), 0);
        assert_eq!(beats_to_frames(&tempo, 1.0), 0);
        assert_eq!(beats_to_frames(&tempo, 2.0), 1);
        assert_eq!(beats_to_frames(&Tempo::with_bpm(5.0), 1.0), 12);
    }

    #[test]
    fn short_beats_promoted_to_one_frame() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "man|forward||0.0|1.0", "woman|forward||0.0|1.0"]).unwrap();
        session.run(&mut scene, &records).unwrap();

        assert_eq!(session.beats_to_frames(1.0), 0);
        for dancer in Dancer::ALL {
            let placed = session.figure(dancer).placed();
            assert_eq!(placed.len(), 2);
            assert_eq!(placed[1].span, FrameSpan::new(0, 1));
        }
        assert_eq!(session.man().placed()[1].name(), "step forward L to R");
        assert_eq!(session.woman().placed()[1].name(), "step forward R to L");
    }

    #[test]
    fn both_dispatches_man_then_woman() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "both|side||0|14", "man|embrace||0|0", "woman|embrace||0|0"]).unwrap();
        session.run(&mut scene, &records).unwrap();

        assert_eq!(session.man().placed()[1].span, FrameSpan::new(0, 12));
        assert_eq!(session.woman().placed()[1].name(), "step side R to L");
        assert_eq!(session.man().placed().last().unwrap().name(), "embrace man");
        assert_eq!(session.woman().placed().last().unwrap().name(), "embrace woman");
        assert_eq!(session.woman().placed().last().unwrap().span.end, 12);
    }

    #[test]
    fn woman_embraces_relative_to_man() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "man|embrace||0|0", "woman|embrace||0|0"]).unwrap();
        session.run(&mut scene, &records).unwrap();
        let at = scene.location("dancer female").unwrap();
        assert!((at.x - -0.407_804).abs() < 1e-9);
        assert!((at.y - -1.579_339).abs() < 1e-9);
        let man_at = scene.location("dancer male").unwrap();
        assert!(man_at.norm() < 1e-12);
    }

    #[test]
    fn qualifier_picks_pose_foot() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "woman|stands|on left|0|14"]).unwrap();
        session.run(&mut scene, &records).unwrap();
        assert_eq!(session.woman().placed()[1].name(), "stand on left foot");
        assert_eq!(session.woman().foot(), Foot::Left);
    }

    #[test]
    fn feet_alternate_across_records() {
        let (mut scene, mut session) = session();
        let records = parse([
            HEADER,
            "man|forward||0|14",
            "man|side||14|14",
            "man|back||28|14",
        ])
        .unwrap();
        session.run(&mut scene, &records).unwrap();
        let names: Vec<_> = session.man().placed()[1..].iter().map(|p| p.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["step forward L to R", "step side R to L", "step back L to R"]
        );
        assert_eq!(session.man().placed()[3].span, FrameSpan::new(24, 36));
    }

    #[test]
    fn bad_record_stops_run() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "man|forward||0|14", "man|twirl||14|14", "man|back||28|14"]).unwrap();
        let err = session.run(&mut scene, &records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
        assert_eq!(session.man().placed().len(), 2);
    }

    #[test]
    fn clock_past_last_frame_is_rejected() {
        let (mut scene, mut session) = session();
        let records = parse([HEADER, "man|forward||1e10|14"]).unwrap();
        let err = session.run(&mut scene, &records).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("past the last frame"), "{err}");
        assert_eq!(session.man().placed().len(), 1);
    }

    #[test]
    fn run_file_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("el_flete.steps");
        std::fs::write(&path, format!("{HEADER}\nboth|forward||0|14\nboth|embrace||0|0\n")).unwrap();
        let (mut scene, mut session) = session();
        assert_eq!(session.run_file(&mut scene, &path).unwrap(), 2);
        assert!(session.summary().contains("woman 'dancer female'"));
    }
}
