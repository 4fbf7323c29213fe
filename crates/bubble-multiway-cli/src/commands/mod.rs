//! CLI command implementations.

pub mod causal;
pub mod config;
pub mod multiway;

use std::path::{Path, PathBuf};

use anyhow::Result;
use bubble_multiway_core::InputSelector;
use bubble_multiway_ops::{
    ExportGraph, GraphKind, OpsContext, OpsError, RenderHints, RenderOutcome,
};
use clap::Args;
use humansize::{format_size, DECIMAL};

/// Which states to build over.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Use all permutations of 1..=N.
    #[arg(short = 'n', long = "size", value_name = "N")]
    pub size: Option<usize>,

    /// Use all distinct permutations of a comma-separated list, e.g. 3,1,1,2.
    #[arg(long, value_name = "LIST", allow_hyphen_values = true)]
    pub values: Option<String>,
}

impl InputArgs {
    /// Validate into a selector; exactly one of `-n` and `--values` is allowed.
    pub fn selector(&self) -> Result<InputSelector, OpsError> {
        Ok(InputSelector::from_parts(self.size, self.values.as_deref())?)
    }
}

/// Where and how to write artifacts.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// GraphML output path (defaults to a name derived from the input).
    #[arg(long, value_name = "PATH")]
    pub graphml: Option<PathBuf>,

    /// Skip the GraphML file.
    #[arg(long, conflicts_with = "graphml")]
    pub no_graphml: bool,

    /// Also write the graph as JSON.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Render an SVG image.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Render a PNG image.
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Image scale factor; invalid values fall back to 1.0.
    #[arg(long, value_name = "F", allow_hyphen_values = true)]
    pub scale: Option<f32>,

    /// Node fill colour for images, e.g. "#9ecae1".
    #[arg(long, value_name = "COLOR")]
    pub node_color: Option<String>,
}

/// Arguments of `bmw multiway`.
#[derive(Args, Debug, Clone)]
pub struct MultiwayArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Add an "ALL STARTS" node with an edge to every state.
    #[arg(long)]
    pub super_source: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments of `bmw causal`.
#[derive(Args, Debug, Clone)]
pub struct CausalArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl OutputArgs {
    /// Render hints from config, with command-line overrides applied.
    pub fn hints(&self, ctx: &OpsContext, kind: GraphKind) -> RenderHints {
        let mut hints = ctx.render_hints(kind);
        if let Some(scale) = self.scale {
            hints = hints.with_scale(scale);
        }
        if let Some(color) = &self.node_color {
            hints = hints.with_node_color(color.clone());
        }
        hints
    }

    /// Image targets in the order they are rendered.
    pub fn images(&self) -> impl Iterator<Item = &Path> {
        self.svg.iter().chain(self.png.iter()).map(PathBuf::as_path)
    }
}

/// Write the GraphML and JSON files requested by `output`.
pub fn write_exports(
    ctx: &OpsContext,
    kind: GraphKind,
    input: &InputSelector,
    graph: &ExportGraph,
    output: &OutputArgs,
) -> Result<()> {
    if !output.no_graphml {
        let path = output
            .graphml
            .clone()
            .unwrap_or_else(|| ctx.default_output_path(kind, input, "graphml"));
        let written = ctx.export(graph, &path)?;
        print_written("GraphML", &written.path, written.bytes);
    }
    if let Some(path) = &output.json {
        let written = ctx.export(graph, path)?;
        print_written("JSON", &written.path, written.bytes);
    }
    Ok(())
}

/// Print the outcome of one image render.
pub fn print_render(outcome: &RenderOutcome) {
    print_written("Image", &outcome.path, outcome.bytes);
}

fn print_written(label: &str, path: &Path, bytes: u64) {
    println!(
        "💾 {:<8} {} ({})",
        format!("{}:", label),
        path.display(),
        format_size(bytes, DECIMAL)
    );
}

/// Format a yes/no flag for the summary block.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
