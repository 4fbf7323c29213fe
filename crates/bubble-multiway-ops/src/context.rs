//! OpsContext - the service that runs builds, exports and renders.
//!
//! The context holds configuration and layout parameters. Every entry point
//! of the CLI goes through it, so library callers get identical behaviour.

use std::path::{Path, PathBuf};

use bubble_multiway_core::{enumerate_states, CausalGraph, InputSelector, MultiwayGraph, State};
use bubble_multiway_layout::{layout_causal, layout_multiway, LayoutConfig};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::OpsResult;
use crate::export::{write_graph, ExportFormat, ExportGraph};
use crate::naming::{default_artifact_name, GraphKind};
use crate::render::{render_to_path, RenderHints, RenderOutcome, RenderScene};
use crate::requests::BuildRequest;
use crate::responses::{CausalResponse, ExportResponse, MultiwayResponse};

/// The main operations context.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,

    /// Spacing used when laying out graphs for rendering.
    pub layout: LayoutConfig,
}

impl OpsContext {
    /// Create a new OpsContext with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            layout: LayoutConfig::default(),
        }
    }

    /// Create a new OpsContext from the saved configuration.
    pub fn default_config() -> OpsResult<Self> {
        Ok(Self::new(Config::load()?))
    }

    /// Replace the layout parameters.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    // =========================================================================
    // Builds
    // =========================================================================

    /// Enumerate the states of `input`, warning when the build will be large.
    fn enumerate(&self, input: &InputSelector) -> Vec<State> {
        let estimate = input.estimated_state_count();
        if estimate > u128::from(self.config.max_states) {
            warn!(
                states = %estimate,
                max_states = self.config.max_states,
                "Large input: graph construction may be slow and images unreadable"
            );
        }
        enumerate_states(input)
    }

    /// Build the multiway graph for a request.
    pub fn build_multiway(&self, request: &BuildRequest) -> OpsResult<MultiwayResponse> {
        let input = &request.input;
        let states = self.enumerate(input);

        let mut graph = MultiwayGraph::build(&states);
        if request.super_source {
            graph.add_super_source();
        }

        let sorted_state = input.sorted_state();
        let summary = graph.summary(&sorted_state);
        info!(
            states = summary.states,
            nodes = summary.nodes,
            edges = summary.edges,
            is_dag = summary.is_dag,
            "Built multiway graph"
        );

        Ok(MultiwayResponse {
            input: input.clone(),
            max_inversions: input.max_inversions(),
            graph,
            summary,
            sorted_state,
        })
    }

    /// Build the causal graph for a request.
    pub fn build_causal(&self, request: &BuildRequest) -> OpsResult<CausalResponse> {
        if request.super_source {
            debug!("super_source has no effect on causal graphs");
        }
        let states = self.enumerate(&request.input);
        let graph = CausalGraph::build(&states);
        let summary = graph.summary();
        info!(
            events = summary.events,
            causal_edges = summary.causal_edges,
            "Built causal graph"
        );

        Ok(CausalResponse {
            input: request.input.clone(),
            state_count: states.len(),
            graph,
            summary,
        })
    }

    // =========================================================================
    // Artifacts
    // =========================================================================

    /// Default location for an artifact: the configured output dir plus the
    /// deterministic name for `kind` and `input`.
    pub fn default_output_path(
        &self,
        kind: GraphKind,
        input: &InputSelector,
        extension: &str,
    ) -> PathBuf {
        self.config
            .output_dir
            .join(default_artifact_name(kind, input, extension))
    }

    /// Write an export graph, choosing the format from the extension.
    pub fn export(&self, graph: &ExportGraph, path: &Path) -> OpsResult<ExportResponse> {
        let format = ExportFormat::from_path(path)?;
        let bytes = write_graph(graph, path, format)?;
        debug!(path = %path.display(), bytes, "Wrote graph file");
        Ok(ExportResponse {
            path: path.to_path_buf(),
            format,
            bytes,
        })
    }

    /// Render hints for `kind` taken from configuration.
    pub fn render_hints(&self, kind: GraphKind) -> RenderHints {
        RenderHints::from_config(&self.config, kind)
    }

    /// Lay out and render a multiway graph.
    pub fn render_multiway(
        &self,
        response: &MultiwayResponse,
        path: &Path,
        hints: &RenderHints,
    ) -> OpsResult<RenderOutcome> {
        self.layout.validate()?;
        let layout = layout_multiway(&response.graph, &self.layout);
        let scene = RenderScene::from_multiway(&response.graph, &layout);
        render_to_path(&scene, &hints.clone().sanitized(), path)
    }

    /// Lay out and render a causal graph.
    pub fn render_causal(
        &self,
        response: &CausalResponse,
        path: &Path,
        hints: &RenderHints,
    ) -> OpsResult<RenderOutcome> {
        self.layout.validate()?;
        let layout = layout_causal(&response.graph, &self.layout);
        let scene = RenderScene::from_causal(&response.graph, &layout);
        render_to_path(&scene, &hints.clone().sanitized(), path)
    }
}

impl Default for OpsContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
