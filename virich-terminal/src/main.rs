/// Virich - terminal wireframe viewer for the Virich cyclic surface
///
/// Usage:
///   virich [view|dump] [--config FILE] [--params a=1.5,b=3,c=2,d=4,scale=0.2]
///          [--steps 30x30] [--sphere] [--layout concat|sweep] [--spin]
///
/// Controls in the viewer:
///   - Left drag: Rotate the surface
///   - WASD / Arrow Keys: Rotate in fixed steps
///   - E: Roll, R: Reset view
///   - Q/ESC: Quit

use anyhow::{bail, Context};
use log::{info, warn};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use virich_core::params::{apply_assignments, parse_grid};
use virich_core::render::describe;
use virich_core::{SceneConfig, SphereParameters, StripLayout, SurfaceKind, SurfaceWireframe};
use virich_terminal::TerminalApp;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    View,
    Dump,
}

#[derive(Debug, Default)]
struct Options {
    mode: Option<Mode>,
    config: Option<PathBuf>,
    params: Option<String>,
    steps: Option<String>,
    layout: Option<StripLayout>,
    sphere: bool,
    spin: bool,
}

const USAGE: &str = "Usage: virich [view|dump] [--config FILE] [--params a=1.5,b=3,c=2,d=4,scale=0.2] \
[--steps 30x30] [--sphere] [--layout concat|sweep] [--spin]";

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{} expects a value", flag))
        };
        match arg.as_str() {
            "view" if options.mode.is_none() => options.mode = Some(Mode::View),
            "dump" if options.mode.is_none() => options.mode = Some(Mode::Dump),
            "--config" | "-c" => options.config = Some(PathBuf::from(value("--config")?)),
            "--params" | "-p" => options.params = Some(value("--params")?),
            "--steps" | "-s" => options.steps = Some(value("--steps")?),
            "--layout" => {
                let layout = value("--layout")?;
                options.layout = Some(layout.parse().map_err(anyhow::Error::msg)?);
            }
            "--sphere" => options.sphere = true,
            "--spin" => options.spin = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unexpected argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(options)
}

/// Config file first, then command line overrides
fn build_config(options: &Options) -> anyhow::Result<SceneConfig> {
    let mut config = match &options.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };

    if options.sphere {
        if let SurfaceKind::Virich(_) = config.surface {
            config.surface = SurfaceKind::Sphere(SphereParameters::default());
        }
    }
    if let Some(params) = &options.params {
        apply_assignments(&mut config.surface, params)?;
    }
    if let Some(steps) = &options.steps {
        config.grid = parse_grid(steps)?;
    }
    if let Some(layout) = options.layout {
        config.layout = layout;
    }
    if options.spin {
        config.spin = true;
    }

    info!(
        "Scene: {:?}, grid {}x{}, layout {:?}",
        config.surface, config.grid.steps_t, config.grid.steps_v, config.layout
    );
    Ok(config)
}

/// Write both curve families as `family index x y z` lines
fn dump<W: Write>(wireframe: &SurfaceWireframe, out: &mut W) -> io::Result<()> {
    for (family, polyline) in [("t", &wireframe.t), ("v", &wireframe.v)] {
        for (index, p) in polyline.points().iter().enumerate() {
            writeln!(out, "{} {} {:.6} {:.6} {:.6}", family, index, p.x, p.y, p.z)?;
        }
    }
    out.flush()
}

fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    let config = build_config(&options).context("invalid scene configuration")?;

    match options.mode.unwrap_or(Mode::View) {
        Mode::Dump => {
            let wireframe = config
                .surface
                .generate(&config.grid)
                .context("failed to sample surface")?;
            info!("{}", describe(&wireframe));
            let stdout = io::stdout();
            dump(&wireframe, &mut BufWriter::new(stdout.lock()))?;
        }
        Mode::View => {
            if config.layout == StripLayout::Concatenated {
                warn!("Concatenated layout joins consecutive curves with connecting segments");
            }
            let mut app = TerminalApp::new(config).context("failed to start viewer")?;
            app.run().context("viewer failed")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use virich_core::{generate_surface, SampleGrid, ShapeParameters};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_dump_with_overrides() {
        let options = parse_args(args(&["dump", "--params", "a=2,d=5", "--steps", "4x4"])).unwrap();
        assert_eq!(options.mode, Some(Mode::Dump));

        let config = build_config(&options).unwrap();
        assert_eq!(config.grid, SampleGrid::new(4, 4));
        match config.surface {
            SurfaceKind::Virich(p) => {
                assert_eq!(p.a, 2.0);
                assert_eq!(p.d, 5.0);
                assert_eq!(p.b, 3.0);
            }
            other => panic!("unexpected surface {:?}", other),
        }
    }

    #[test]
    fn test_sphere_flag() {
        let options = parse_args(args(&["--sphere", "--params", "radius=2"])).unwrap();
        let config = build_config(&options).unwrap();
        assert_eq!(config.surface, SurfaceKind::Sphere(SphereParameters { radius: 2.0 }));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse_args(args(&["--steps"])).is_err());
        assert!(parse_args(args(&["--layout", "spiral"])).is_err());
        assert!(parse_args(args(&["render"])).is_err());

        let options = parse_args(args(&["--steps", "0x3"])).unwrap();
        assert!(build_config(&options).is_err());
    }

    #[test]
    fn test_dump_format() {
        let wireframe =
            generate_surface(&ShapeParameters::default(), &SampleGrid::new(1, 1)).unwrap();
        let mut out = Vec::new();
        dump(&wireframe, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        let first: Vec<f32> = lines[0]
            .split_whitespace()
            .skip(2)
            .map(|v| v.parse().unwrap())
            .collect();
        assert!(lines[0].starts_with("t 0 0.300000 "));
        assert_eq!(first[1], 0.0);
        assert_eq!(first[2], 0.0);
        assert!(lines[4].starts_with("v 0 "));
    }
}
