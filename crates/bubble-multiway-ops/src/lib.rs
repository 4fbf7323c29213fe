//! Bubble-Multiway Operations Layer
//!
//! Typed builds, exports and renders on top of the core graphs. The CLI is a
//! thin shell over this crate, so anything it prints can also be produced
//! programmatically.
//!
//! ## Architecture
//!
//! - **Requests**: [`BuildRequest`] names the input and options of a build
//! - **Responses**: [`MultiwayResponse`] / [`CausalResponse`] own the graph and its summary
//! - **Export**: [`ExportGraph`] plus a [`GraphWriter`] per file format
//! - **Render**: [`RenderScene`] plus a [`Renderer`] per image format
//! - **OpsContext**: the service that ties them together
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bubble_multiway_ops::{BuildRequest, Config, ExportGraph, GraphKind, OpsContext};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = OpsContext::new(Config::load()?);
//!     let request = BuildRequest::values("3,1,1,2")?.with_super_source(true);
//!     let response = ctx.build_multiway(&request)?;
//!
//!     let path = ctx.default_output_path(GraphKind::Multiway, &request.input, "graphml");
//!     ctx.export(&ExportGraph::from_multiway(&response.graph), &path)?;
//!     println!("{} states", response.summary.states);
//!     Ok(())
//! }
//! ```

mod config;
mod context;
mod error;
mod export;
mod naming;
mod raster;
mod render;
mod requests;
mod responses;

// Re-export public API
pub use config::{Config, CONFIG_DIR_ENV};
pub use context::OpsContext;
pub use error::{OpsError, OpsResult};
pub use export::{
    escape_xml, write_graph, AttrValue, Attributes, ExportEdge, ExportFormat, ExportGraph,
    ExportNode, GraphMlWriter, GraphWriter, JsonWriter, SUPER_SOURCE_ID, SUPER_SOURCE_LABEL,
};
pub use naming::{artifact_stem, default_artifact_name, GraphKind};
pub use raster::{parse_color, PngRenderer};
pub use render::{
    render_to_path, renderer_for, RenderHints, RenderOutcome, RenderScene, Renderer, SceneNode,
    SvgRenderer,
};
pub use requests::BuildRequest;
pub use responses::{CausalResponse, ExportResponse, MultiwayResponse};
