//! Couple walks: the partner dances the mirror image.

use approx::assert_relative_eq;
use pivot_dance::{mirror_steps, step, Diagnostics, Figure};
use pivot_scene::{studio, Scene};
use pivot_tests::COUPLE_WALK;
use pivot_types::{Dancer, Foot, PivotConfig};

fn walk_couple() -> (pivot_scene::MemoryScene, Figure, Figure) {
    let mut scene = studio::mannequin_studio();
    let config = PivotConfig::default();
    let mut man = Figure::new(&scene, Dancer::Man, &config).unwrap();
    let mut woman = Figure::new(&scene, Dancer::Woman, &config).unwrap();
    man.walk_sequence(&mut scene, Foot::Left, &COUPLE_WALK, Some(&mut woman), 12)
        .unwrap();
    (scene, man, woman)
}

#[test]
fn partner_steps_are_flipped() {
    let (_, man, woman) = walk_couple();
    let man_steps: Vec<_> = man.placed().iter().filter(|p| p.is_motion()).collect();
    let woman_steps: Vec<_> = woman.placed().iter().filter(|p| p.is_motion()).collect();
    assert_eq!(man_steps.len(), COUPLE_WALK.len());
    assert_eq!(woman_steps.len(), COUPLE_WALK.len());

    for (ours, theirs) in man_steps.iter().zip(&woman_steps) {
        let short = ours.name().split(' ').nth(1).unwrap();
        let mirrored = theirs.name().split(' ').nth(1).unwrap();
        assert_eq!(step::flip(short), Some(mirrored));
        assert_eq!(ours.span, theirs.span);
    }
    assert!(woman_steps[0].name().ends_with("R to L"));
}

#[test]
fn mirror_steps_matches_walk() {
    let (foot, steps) = mirror_steps(Foot::Left, &COUPLE_WALK).unwrap();
    assert_eq!(foot, Foot::Right);
    for (ours, theirs) in COUPLE_WALK.iter().zip(&steps) {
        assert_eq!(step::flip(ours), Some(*theirs));
    }
}

#[test]
fn partners_start_in_embrace() {
    let (mut scene, man, woman) = walk_couple();
    scene.set_current_frame(1);
    let man_at = scene.location(man.model()).unwrap();
    let woman_at = scene.location(woman.model()).unwrap();
    assert_relative_eq!(woman_at.x - man_at.x, -0.407_804, epsilon = 1e-9);
    assert_relative_eq!(woman_at.y - man_at.y, -1.579_339, epsilon = 1e-9);
    assert_eq!(man.placed().last().unwrap().name(), "embrace man");
    assert_eq!(woman.placed().last().unwrap().span.end, woman.last_frame());
}

#[test]
fn embrace_gap_holds_through_the_walk() {
    let (mut scene, man, woman) = walk_couple();
    let last = man.last_frame();
    for frame in (1..=last).step_by(6) {
        scene.set_current_frame(frame);
        let gap = scene.location(woman.model()).unwrap() - scene.location(man.model()).unwrap();
        assert_relative_eq!(gap.x, -0.407_804, epsilon = 1e-9);
        assert_relative_eq!(gap.y, -1.579_339, epsilon = 1e-9);
    }
}

#[test]
fn diagnostics_pass_on_studio() {
    let mut scene = studio::mannequin_studio();
    let report = Diagnostics::run(&mut scene, &PivotConfig::default());
    assert_eq!(report.exit_code(), 0, "{report}");
}
