#![deny(unsafe_code)]
//! Headless CLI for the comfort field simulation.
//!
//! Subcommands:
//! - `render [engine]`: step an engine frame by frame, replay scripted key
//!   presses, write PNG snapshots
//! - `list`: print available engines and weather modes

mod error;

use clap::{Parser, Subcommand};
use comfort_field_core::Engine;
use comfort_field_engines::snapshot::write_frame_png;
use comfort_field_engines::EngineKind;
use comfort_field_sim::weather::WeatherMode;
use error::CliError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "comfort-field", about = "Comfort field simulation CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N frames and write PNG snapshots.
    Render {
        /// Engine name.
        #[arg(default_value = "comfort")]
        engine: String,

        /// Playfield width in pixels.
        #[arg(short = 'W', long, default_value_t = 800)]
        width: usize,

        /// Playfield height in pixels.
        #[arg(short = 'H', long, default_value_t = 600)]
        height: usize,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 300)]
        frames: u64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Initial weather mode (sunny, rain, heat); overrides `weather` in --params.
        #[arg(long)]
        weather: Option<String>,

        /// Key press applied before a frame, as FRAME:KEY (e.g. 120:2). Repeatable.
        #[arg(short, long = "key", value_name = "FRAME:KEY")]
        keys: Vec<String>,

        /// Also write a numbered snapshot every N frames.
        #[arg(long, value_name = "N")]
        every: Option<u64>,

        /// Frame rate used to report simulated time.
        #[arg(long, default_value_t = 30.0)]
        fps: f64,

        /// Output file path for the final frame.
        #[arg(short, long, default_value = "comfort.png")]
        output: PathBuf,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available engines and weather modes.
    List,
}

/// A key press scheduled before a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyEvent {
    frame: u64,
    key: char,
}

/// Parses `FRAME:KEY`, where KEY is a single character.
fn parse_key_event(s: &str) -> Result<KeyEvent, CliError> {
    let bad = |reason| CliError::KeyScript {
        arg: s.to_string(),
        reason,
    };
    let (frame, key) = s.split_once(':').ok_or_else(|| bad("expected FRAME:KEY"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|_| bad("frame is not a number"))?;
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) => Ok(KeyEvent { frame, key }),
        _ => Err(bad("key must be a single character")),
    }
}

/// Parses `--params` and folds `--weather` into it.
fn build_params(raw: &str, weather: Option<&str>) -> Result<Value, CliError> {
    let mut params: Value =
        serde_json::from_str(raw).map_err(|e| CliError::Params(e.to_string()))?;
    if let Some(w) = weather {
        let obj = params
            .as_object_mut()
            .ok_or_else(|| CliError::Params("expected a JSON object".into()))?;
        obj.insert("weather".into(), Value::String(w.to_string()));
    }
    Ok(params)
}

/// Path of the numbered snapshot for `frame`, next to `output`.
fn numbered_path(output: &Path, frame: u64) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".into());
    output.with_file_name(format!("{stem}_{frame:05}.png"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

struct RenderArgs {
    engine: String,
    width: usize,
    height: usize,
    frames: u64,
    seed: u64,
    keys: Vec<KeyEvent>,
    every: Option<u64>,
    output: PathBuf,
    params: Value,
}

struct RenderReport {
    frames: u64,
    snapshots: Vec<PathBuf>,
    params: Value,
    mean_comfort: f64,
    agents: usize,
}

fn render(args: &RenderArgs) -> Result<RenderReport, CliError> {
    let mut eng =
        EngineKind::from_name(&args.engine, args.width, args.height, args.seed, &args.params)?;
    let mut snapshots = Vec::new();

    while eng.frame() < args.frames {
        let frame = eng.frame();
        for ev in args.keys.iter().filter(|ev| ev.frame == frame) {
            if eng.key_press(ev.key) {
                debug!(frame, key = %ev.key, "key applied");
            } else {
                warn!(frame, key = %ev.key, "key ignored by engine");
            }
        }
        eng.step()?;
        if let Some(n) = args.every.filter(|&n| n > 0) {
            if eng.frame() % n == 0 {
                let path = numbered_path(&args.output, eng.frame());
                write_frame_png(&eng, args.width, args.height, &path)
                    .map_err(|e| CliError::snapshot(&path, e))?;
                snapshots.push(path);
            }
        }
    }

    write_frame_png(&eng, args.width, args.height, &args.output)
        .map_err(|e| CliError::snapshot(&args.output, e))?;
    snapshots.push(args.output.clone());
    info!(frames = eng.frame(), snapshots = snapshots.len(), "render finished");

    Ok(RenderReport {
        frames: eng.frame(),
        snapshots,
        params: eng.params(),
        mean_comfort: eng.field().mean(),
        agents: eng.agents().len(),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            let weather: Vec<Value> = WeatherMode::ALL
                .iter()
                .map(|m| serde_json::json!({"name": m.name(), "key": m.key().to_string()}))
                .collect();
            if cli.json {
                let info = serde_json::json!({
                    "engines": engines,
                    "weather": weather,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
                println!("Weather modes:");
                for m in WeatherMode::ALL {
                    println!("  {}  {}", m.key(), m.name());
                }
            }
        }
        Command::Render {
            engine,
            width,
            height,
            frames,
            seed,
            weather,
            keys,
            every,
            fps,
            output,
            params,
        } => {
            let args = RenderArgs {
                engine,
                width,
                height,
                frames,
                seed,
                keys: keys
                    .iter()
                    .map(|k| parse_key_event(k))
                    .collect::<Result<_, _>>()?,
                every,
                output,
                params: build_params(&params, weather.as_deref())?,
            };
            let report = render(&args)?;
            let seconds = if fps > 0.0 {
                report.frames as f64 / fps
            } else {
                0.0
            };

            if cli.json {
                let info = serde_json::json!({
                    "engine": args.engine,
                    "width": width,
                    "height": height,
                    "frames": report.frames,
                    "seconds": seconds,
                    "seed": seed,
                    "params": report.params,
                    "mean_comfort": report.mean_comfort,
                    "agents": report.agents,
                    "snapshots": report
                        .snapshots
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({width}x{height}, {} frames / {seconds:.1}s, seed {seed}) -> {}",
                    args.engine,
                    report.frames,
                    args.output.display()
                );
                eprintln!("  mean comfort {:.3}", report.mean_comfort);
                if report.snapshots.len() > 1 {
                    eprintln!("  {} snapshots written", report.snapshots.len());
                }
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_event_accepts_frame_and_key() {
        assert_eq!(
            parse_key_event("120:2").unwrap(),
            KeyEvent {
                frame: 120,
                key: '2'
            }
        );
    }

    #[test]
    fn parse_key_event_rejects_malformed() {
        for bad in ["", "12", "x:2", "3:", "3:ab", "-1:2"] {
            let err = parse_key_event(bad).unwrap_err();
            assert_eq!(err.exit_code(), 12, "{bad} should be an input error");
        }
    }

    #[test]
    fn build_params_folds_weather_in() {
        let p = build_params(r#"{"agent_count": 3}"#, Some("heat")).unwrap();
        assert_eq!(p["weather"], "heat");
        assert_eq!(p["agent_count"], 3);
        assert_eq!(build_params("{}", None).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn build_params_rejects_bad_json() {
        assert_eq!(build_params("{nope", None).unwrap_err().exit_code(), 12);
        assert_eq!(build_params("[1]", Some("rain")).unwrap_err().exit_code(), 12);
    }

    #[test]
    fn numbered_path_keeps_directory() {
        let p = numbered_path(Path::new("/tmp/out/comfort.png"), 42);
        assert_eq!(p, PathBuf::from("/tmp/out/comfort_00042.png"));
    }

    fn args(dir: &Path) -> RenderArgs {
        RenderArgs {
            engine: "comfort".into(),
            width: 80,
            height: 60,
            frames: 6,
            seed: 1,
            keys: vec![KeyEvent { frame: 3, key: '2' }, KeyEvent { frame: 4, key: 'z' }],
            every: Some(2),
            output: dir.join("final.png"),
            params: serde_json::json!({"agent_count": 4}),
        }
    }

    #[test]
    fn render_runs_frames_keys_and_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let report = render(&args(dir)).unwrap();
        assert_eq!(report.frames, 6);
        assert_eq!(report.params["weather"], "rain");
        assert_eq!(report.agents, 4);
        assert_eq!(report.snapshots.len(), 4);
        assert!(report.snapshots.iter().all(|p| p.exists()));
        assert!(dir.join("final_00004.png").exists());
    }

    #[test]
    fn render_unknown_engine_exits_10() {
        let mut a = args(Path::new("."));
        a.engine = "nope".into();
        assert_eq!(render(&a).err().map(|e| e.exit_code()), Some(10));
    }

    #[test]
    fn render_rejects_out_of_range_params() {
        let mut a = args(Path::new("."));
        a.params = serde_json::json!({"max_speed": -1.0});
        assert_eq!(render(&a).err().map(|e| e.exit_code()), Some(10));
    }

    #[test]
    fn render_unknown_weather_is_input_error() {
        let mut a = args(Path::new("."));
        a.params = build_params("{}", Some("hail")).unwrap();
        let err = render(&a).err();
        assert!(matches!(err, Some(CliError::Weather(ref w)) if w == "hail"));
    }

    #[test]
    fn render_reports_unwritable_snapshot_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mut a = args(tmp.path());
        a.output = tmp.path().join("missing").join("final.png");
        a.every = None;
        match render(&a) {
            Err(CliError::Snapshot { path, .. }) => assert_eq!(path, a.output),
            other => panic!("expected snapshot error, got {:?}", other.err()),
        }
    }

    #[test]
    fn fps_defaults_to_the_reference_rate() {
        let cli = Cli::try_parse_from(["comfort-field", "render"]).unwrap();
        match cli.command {
            Command::Render { fps, frames, .. } => {
                assert_eq!(fps, 30.0);
                assert_eq!(frames, 300);
            }
            Command::List => panic!("expected render"),
        }
    }
}
