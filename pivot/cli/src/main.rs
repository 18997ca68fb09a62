//! pivot - choreograph a dancing couple from a step file.
//!
//! # Commands
//!
//! - `pivot run <STEPS>` - dance a step file with both figures
//! - `pivot diagnostics` - run the self-checks, exit 1 on any failure
//! - `pivot clips` - list the clips in the scene
//!
//! Without `--scene` the built-in mannequin studio is used. Logging follows
//! `RUST_LOG`, defaulting to `info` (`debug` with `--verbose`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pivot_dance::{step, Diagnostics, TangoSession};
use pivot_scene::{studio, MemoryScene, Scene};
use pivot_types::PivotConfig;

/// Step sequencing for partnered dancer animation
#[derive(Parser)]
#[command(name = "pivot")]
#[command(about = "Choreograph a dancing couple from a step file", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene JSON to load instead of the built-in studio
    #[arg(long, global = true, value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Config JSON; unset fields keep their defaults
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dance a step file with both figures
    Run {
        /// Pipe-delimited step file
        #[arg(value_name = "STEPS")]
        steps: PathBuf,

        /// Write the danced scene as JSON
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run the self-checks against the scene
    Diagnostics,

    /// List the clips in the scene
    Clips,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let mut scene = load_scene(cli.scene.as_deref(), &config)?;

    match cli.command {
        Commands::Run { steps, output } => {
            run(&mut scene, &config, &steps, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Diagnostics => {
            let report = Diagnostics::run(&mut scene, &config);
            print!("{report}");
            Ok(if report.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Clips => {
            print!("{}", clip_listing(&scene));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PivotConfig> {
    match path {
        Some(path) => PivotConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(PivotConfig::default()),
    }
}

fn load_scene(path: Option<&Path>, config: &PivotConfig) -> Result<MemoryScene> {
    match path {
        Some(path) => MemoryScene::from_json_file(path)
            .with_context(|| format!("loading scene {}", path.display())),
        None => Ok(studio::studio(&config.names)),
    }
}

fn run(
    scene: &mut MemoryScene,
    config: &PivotConfig,
    steps: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let mut session = TangoSession::new(scene, config)?;
    let records = session
        .run_file(scene, steps)
        .with_context(|| format!("dancing {}", steps.display()))?;
    info!(records, "Dance complete");
    println!("{}", session.summary());

    if let Some(output) = output {
        scene
            .write_json_file(output)
            .with_context(|| format!("writing scene {}", output.display()))?;
        info!(path = %output.display(), "Wrote scene");
    }
    Ok(())
}

fn clip_listing<S: Scene>(scene: &S) -> String {
    let mut out = String::new();
    for name in scene.clip_names() {
        let kind = match scene.clip(&name) {
            Ok(clip) if step::is_motion(&clip) => "step",
            Ok(_) => "pose",
            Err(_) => "?",
        };
        out.push_str(&format!(" {kind:<5} '{name}'\n"));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run_with_globals() {
        let cli = Cli::try_parse_from(["pivot", "run", "dance.steps", "-o", "out.json", "--verbose"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Run { steps, output } => {
                assert_eq!(steps, PathBuf::from("dance.steps"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_writes_scene() {
        let dir = tempfile::tempdir().unwrap();
        let steps = dir.path().join("dance.steps");
        let output = dir.path().join("scene.json");
        std::fs::write(
            &steps,
            "# dancer | step | qualifier | clock | beats\nboth|embrace||0|0\nboth|forward||0|14\n",
        )
        .unwrap();

        let config = PivotConfig::default();
        let mut scene = load_scene(None, &config).unwrap();
        run(&mut scene, &config, &steps, Some(&output)).unwrap();

        let reloaded = load_scene(Some(&output), &config).unwrap();
        assert_eq!(reloaded.keyframe_count("dancer male").unwrap(), 3);
    }

    #[test]
    fn missing_inputs_are_reported() {
        let err = load_config(Some(Path::new("/no/such/pivot.json"))).unwrap_err();
        assert!(err.to_string().contains("loading config"));
        let config = PivotConfig::default();
        let mut scene = load_scene(None, &config).unwrap();
        let err = run(&mut scene, &config, Path::new("/no/such.steps"), None).unwrap_err();
        assert!(err.to_string().contains("dancing"));
    }

    #[test]
    fn clip_listing_marks_steps() {
        let text = clip_listing(&studio::mannequin_studio());
        assert!(text.contains(" step  'step side L to R'"));
        assert!(text.contains(" pose  'embrace man'"));
    }
}
