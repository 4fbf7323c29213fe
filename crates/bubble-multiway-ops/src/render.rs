//! Image rendering of laid-out graphs.
//!
//! A [`RenderScene`] is the drawing-level view of a graph: positioned,
//! labelled nodes and index-based edges. [`Renderer`] implementations turn a
//! scene into bytes: [`SvgRenderer`] writes vector markup and
//! [`PngRenderer`](crate::PngRenderer) rasterizes the same geometry.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bubble_multiway_core::{CausalGraph, EventId, MultiwayGraph, MultiwayNode, NodeIndex};
use bubble_multiway_layout::{LayeredLayout, Position};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::error::{OpsError, OpsResult};
use crate::export::{escape_xml, SUPER_SOURCE_LABEL};
use crate::naming::GraphKind;
use crate::raster::PngRenderer;

/// Presentation parameters supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    /// Node radius in pixels before scaling.
    pub node_size: f32,
    /// Label font size in pixels before scaling.
    pub font_size: f32,
    /// Fill colour of regular nodes.
    pub node_color: String,
    /// Fill colour of the super-source.
    pub super_source_color: String,
    /// Overall scale factor.
    pub scale: f32,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self::from_config(&Config::default(), GraphKind::Multiway)
    }
}

impl RenderHints {
    /// Hints for `kind` taken from configuration.
    pub fn from_config(config: &Config, kind: GraphKind) -> Self {
        let node_color = match kind {
            GraphKind::Multiway => config.node_color.clone(),
            GraphKind::Causal => config.causal_node_color.clone(),
        };
        Self {
            node_size: config.node_size,
            font_size: config.font_size,
            node_color,
            super_source_color: config.super_source_color.clone(),
            scale: config.scale,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_node_color(mut self, color: impl Into<String>) -> Self {
        self.node_color = color.into();
        self
    }

    /// Replace unusable numbers with defaults, logging each replacement.
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        for (name, value, fallback) in [
            ("scale", &mut self.scale, defaults.scale),
            ("node_size", &mut self.node_size, defaults.node_size),
            ("font_size", &mut self.font_size, defaults.font_size),
        ] {
            if !value.is_finite() || *value <= 0.0 {
                warn!(hint = name, value = *value, fallback, "Invalid render hint, using default");
                *value = fallback;
            }
        }
        self
    }
}

/// A positioned node ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub position: Position,
    pub label: String,
    /// Drawn larger and in the super-source colour.
    pub emphasized: bool,
}

/// Drawing-level view of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    pub kind: GraphKind,
    pub nodes: Vec<SceneNode>,
    /// Edges as indices into `nodes`.
    pub edges: Vec<(usize, usize)>,
}

impl RenderScene {
    /// Scene for a multiway graph. Nodes missing from `layout` are skipped.
    pub fn from_multiway(graph: &MultiwayGraph, layout: &LayeredLayout<NodeIndex>) -> Self {
        let pg = graph.graph();
        let mut slots: HashMap<NodeIndex, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(pg.node_count());

        for idx in pg.node_indices() {
            let Some(position) = layout.position(&idx) else {
                continue;
            };
            let (label, emphasized) = match &pg[idx] {
                MultiwayNode::State(state) => (state.compact_label(), false),
                MultiwayNode::SuperSource => (SUPER_SOURCE_LABEL.to_string(), true),
            };
            slots.insert(idx, nodes.len());
            nodes.push(SceneNode {
                position,
                label,
                emphasized,
            });
        }

        let edges = pg
            .edge_indices()
            .filter_map(|e| {
                let (a, b) = pg.edge_endpoints(e)?;
                Some((*slots.get(&a)?, *slots.get(&b)?))
            })
            .collect();

        Self {
            kind: GraphKind::Multiway,
            nodes,
            edges,
        }
    }

    /// Scene for a causal graph, one node per event.
    pub fn from_causal(graph: &CausalGraph, layout: &LayeredLayout<EventId>) -> Self {
        let mut slots: HashMap<EventId, usize> = HashMap::new();
        let mut nodes = Vec::with_capacity(graph.event_count());
        for event in graph.events() {
            let Some(position) = layout.position(&event.id) else {
                continue;
            };
            slots.insert(event.id, nodes.len());
            nodes.push(SceneNode {
                position,
                label: event.label(),
                emphasized: false,
            });
        }

        let edges = graph
            .edges()
            .filter_map(|(a, b)| Some((*slots.get(&a)?, *slots.get(&b)?)))
            .collect();

        Self {
            kind: GraphKind::Causal,
            nodes,
            edges,
        }
    }

    fn bounds(&self) -> (Position, Position) {
        let origin = Position::new(0.0, 0.0);
        let mut iter = self.nodes.iter().map(|n| n.position);
        let Some(first) = iter.next() else {
            return (origin, origin);
        };
        iter.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        })
    }
}

/// A written image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Turns a scene into an image.
pub trait Renderer {
    /// File extension produced, without the dot.
    fn extension(&self) -> &'static str;

    /// Draw `scene` into `out`.
    fn render(&self, scene: &RenderScene, hints: &RenderHints, out: &mut dyn Write)
        -> OpsResult<()>;
}

/// Pixels per layout unit, relative to the node radius.
const UNIT_PER_RADIUS: f32 = 4.0;

/// Pixel geometry shared by every backend.
///
/// Layout y grows upward, image y grows downward.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub radius: f32,
    pub big_radius: f32,
    pub font: f32,
    pub width: f32,
    pub height: f32,
    unit: f32,
    margin: f32,
    min: Position,
    max: Position,
}

impl Frame {
    pub fn new(scene: &RenderScene, hints: &RenderHints) -> Self {
        let radius = hints.node_size * hints.scale;
        let big_radius = radius * 1.3;
        let font = hints.font_size * hints.scale;
        let unit = radius * UNIT_PER_RADIUS;
        let margin = big_radius * 2.0 + font;
        let (min, max) = scene.bounds();
        Self {
            radius,
            big_radius,
            font,
            width: (max.x - min.x) * unit + 2.0 * margin,
            height: (max.y - min.y) * unit + 2.0 * margin,
            unit,
            margin,
            min,
            max,
        }
    }

    pub fn project(&self, p: Position) -> (f32, f32) {
        (
            (p.x - self.min.x) * self.unit + self.margin,
            (self.max.y - p.y) * self.unit + self.margin,
        )
    }

    pub fn radius_of(&self, node: &SceneNode) -> f32 {
        if node.emphasized {
            self.big_radius
        } else {
            self.radius
        }
    }

    /// Edge segment clipped to both node circles; `None` for overlapping nodes.
    pub fn segment(&self, from: &SceneNode, to: &SceneNode) -> Option<((f32, f32), (f32, f32))> {
        let (x1, y1) = self.project(from.position);
        let (x2, y2) = self.project(to.position);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = (dx * dx + dy * dy).sqrt();
        if len <= f32::EPSILON {
            return None;
        }
        let (ux, uy) = (dx / len, dy / len);
        let (r1, r2) = (self.radius_of(from), self.radius_of(to));
        Some((
            (x1 + ux * r1, y1 + uy * r1),
            (x2 - ux * r2, y2 - uy * r2),
        ))
    }

    /// Edges resolved to node pairs.
    pub fn edges<'a>(
        scene: &'a RenderScene,
    ) -> impl Iterator<Item = (&'a SceneNode, &'a SceneNode)> + 'a {
        scene
            .edges
            .iter()
            .filter_map(|&(a, b)| Some((scene.nodes.get(a)?, scene.nodes.get(b)?)))
    }
}

/// Standalone SVG with arrowed edges and labelled circles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    fn extension(&self) -> &'static str {
        "svg"
    }

    fn render(
        &self,
        scene: &RenderScene,
        hints: &RenderHints,
        out: &mut dyn Write,
    ) -> OpsResult<()> {
        let frame = Frame::new(scene, hints);

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.1}" height="{h:.1}" viewBox="0 0 {w:.1} {h:.1}">"#,
            w = frame.width,
            h = frame.height
        )?;
        writeln!(
            out,
            r##"  <defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z" fill="#555555"/></marker></defs>"##
        )?;
        writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#)?;

        writeln!(out, r##"  <g stroke="#555555" stroke-width="1" fill="none">"##)?;
        for (from, to) in Frame::edges(scene) {
            let Some(((x1, y1), (x2, y2))) = frame.segment(from, to) else {
                continue;
            };
            writeln!(
                out,
                r#"    <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" marker-end="url(#arrow)"/>"#,
                x1, y1, x2, y2
            )?;
        }
        writeln!(out, "  </g>")?;

        writeln!(
            out,
            r#"  <g font-family="sans-serif" font-size="{:.1}" text-anchor="middle">"#,
            frame.font
        )?;
        for node in &scene.nodes {
            let (x, y) = frame.project(node.position);
            let fill = if node.emphasized {
                &hints.super_source_color
            } else {
                &hints.node_color
            };
            writeln!(
                out,
                r##"    <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="#333333"/>"##,
                x,
                y,
                frame.radius_of(node),
                escape_xml(fill)
            )?;
            writeln!(
                out,
                r#"    <text x="{:.2}" y="{:.2}" dominant-baseline="middle">{}</text>"#,
                x,
                y,
                escape_xml(&node.label)
            )?;
        }
        writeln!(out, "  </g>")?;
        writeln!(out, "</svg>")?;
        Ok(())
    }
}

/// Pick the backend for `path` from its extension.
pub fn renderer_for(path: &Path) -> OpsResult<Box<dyn Renderer>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let renderers: [Box<dyn Renderer>; 2] = [Box::new(SvgRenderer), Box::new(PngRenderer)];
    renderers
        .into_iter()
        .find(|r| r.extension() == ext)
        .ok_or_else(|| OpsError::unsupported_format(path, "expected an .svg or .png extension"))
}

/// Render `scene` to `path`, choosing the backend from the extension.
pub fn render_to_path(
    scene: &RenderScene,
    hints: &RenderHints,
    path: &Path,
) -> OpsResult<RenderOutcome> {
    let renderer = renderer_for(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    renderer.render(scene, hints, &mut out)?;
    out.flush()?;

    Ok(RenderOutcome {
        path: path.to_path_buf(),
        bytes: std::fs::metadata(path)?.len(),
    })
}
