use crate::config::{Config, LayoutMode, load_config, merge_layout_settings};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::{InputFormat, parse_graph};
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "relgraph", version, about = "Lay out relationship graphs around an ego node")]
pub struct Args {
    /// Input graph (.json or .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for JSON and SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Config JSON file (layout parameters and themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Node to place at the center of the radial layout
    #[arg(long = "center")]
    pub center: Option<String>,

    /// Layout mode
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Treat stdin as JSON5
    #[arg(long = "json5")]
    pub json5: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Ego,
    Preserve,
}

impl From<ModeArg> for LayoutMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ego => LayoutMode::Ego,
            ModeArg::Preserve => LayoutMode::Preserve,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    let (input, format) = read_input(args.input.as_deref(), args.json5)?;
    let parsed = parse_graph(&input, format)?;
    let mut graph = parsed.graph;
    if let Some(settings) = parsed.layout_settings {
        merge_layout_settings(&mut config, settings)?;
    }
    apply_args(&mut config, &args);
    if let Some(center) = &args.center {
        if graph.node(center).is_none() {
            return Err(anyhow::anyhow!("center node '{}' not found in graph", center));
        }
        graph.center = Some(center.clone());
    }

    let layout = compute_layout(&graph, &config.layout);
    match args.output_format {
        OutputFormat::Json => write_layout_dump(args.output.as_deref(), &layout)?,
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.layout, &config.render);
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(mode) = args.mode {
        config.layout.mode = mode.into();
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>, json5: bool) -> Result<(String, InputFormat)> {
    let stdin_format = if json5 {
        InputFormat::Json5
    } else {
        InputFormat::Json
    };
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, stdin_format));
        }
        let content = std::fs::read_to_string(path)?;
        let format = if json5 {
            InputFormat::Json5
        } else {
            InputFormat::from_path(path)
        };
        return Ok((content, format));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, stdin_format))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        let args = Args::parse_from([
            "relgraph", "-i", "family.json5", "-e", "svg", "--center", "ana", "-m", "preserve",
            "-vv",
        ]);
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert_eq!(args.center.as_deref(), Some("ana"));
        assert_eq!(args.mode, Some(ModeArg::Preserve));
        assert_eq!(args.verbose, 2);
        assert_eq!(
            InputFormat::from_path(args.input.as_deref().unwrap()),
            InputFormat::Json5
        );
    }

    #[test]
    fn mode_argument_overrides_config() {
        let args = Args::parse_from(["relgraph", "--mode", "preserve"]);
        let mut config = Config::default();
        apply_args(&mut config, &args);
        assert_eq!(config.layout.mode, LayoutMode::Preserve);
    }

    #[test]
    fn png_requires_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("graph.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
