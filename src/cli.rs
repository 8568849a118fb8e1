use crate::config::{LinkColorMode, load_config};
use crate::layout::{Dimensions, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_graph;
use crate::render::{render_svg, write_output_svg};
use crate::validate::validate;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sankey", version, about = "Sankey diagram layout and renderer")]
pub struct Args {
    /// Input graph JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Drawing width, margins included
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Drawing height, margins included
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Refinement passes for vertical placement
    #[arg(long = "iterations")]
    pub iterations: Option<usize>,

    /// How link ribbons are colored
    #[arg(long = "linkColors", value_enum)]
    pub link_colors: Option<LinkColorArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LinkColorArg {
    Source,
    Target,
    Gradient,
    Custom,
}

impl From<LinkColorArg> for LinkColorMode {
    fn from(value: LinkColorArg) -> Self {
        match value {
            LinkColorArg::Source => Self::Source,
            LinkColorArg::Target => Self::Target,
            LinkColorArg::Gradient => Self::Gradient,
            LinkColorArg::Custom => Self::Custom,
        }
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(iterations) = args.iterations {
        config.sankey.iterations = iterations;
    }
    if let Some(mode) = args.link_colors {
        config.sankey.link_color_mode = mode.into();
    }

    let input = read_input(args.input.as_deref())?;
    let raw = parse_graph(&input)?;
    let validation = validate(&raw);
    let graph = validation.clone().into_graph()?;

    let (width, height) = config.render.content_size();
    let dims = Dimensions::new(width, height)?;
    let layout = compute_layout(&graph, dims, &config.sankey);

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_png(&svg, &output, &config.theme)?;
        }
        OutputFormat::Json => {
            let dump = LayoutDump::from_layout(&layout, Some(&validation));
            write_layout_dump(args.output.as_deref(), &dump)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, theme: &crate::theme::Theme) -> Result<()> {
    crate::render::write_output_png(svg, output, theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _theme: &crate::theme::Theme) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
