//! Portable graph export.
//!
//! Both graph kinds are flattened into an [`ExportGraph`]: string node ids,
//! typed per-node and per-edge attributes, and graph-level metadata. Writers
//! only see that flat form, so adding a format never touches the core.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bubble_multiway_core::{CausalGraph, MultiwayGraph, MultiwayNode};
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};
use crate::naming::GraphKind;

/// Node id used for the super-source in exported graphs.
pub const SUPER_SOURCE_ID: &str = "__START__";

/// Label shown for the super-source.
pub const SUPER_SOURCE_LABEL: &str = "ALL STARTS";

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttrValue {
    fn graphml_type(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "boolean",
            AttrValue::Int(_) => "long",
            AttrValue::Str(_) => "string",
        }
    }

    fn text(&self) -> String {
        match self {
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Str(s) => s.clone(),
        }
    }
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

/// Attribute map with deterministic key order.
pub type Attributes = BTreeMap<String, AttrValue>;

/// An exported node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    pub attributes: Attributes,
}

/// An exported edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub source: String,
    pub target: String,
    pub attributes: Attributes,
}

/// Flat, format-independent view of a built graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportGraph {
    /// Always `true`: every graph built here is directed.
    pub directed: bool,
    pub kind: GraphKind,
    pub metadata: Attributes,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

fn attrs<const N: usize>(pairs: [(&str, AttrValue); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl ExportGraph {
    fn new(kind: GraphKind, nodes: Vec<ExportNode>, edges: Vec<ExportEdge>) -> Self {
        let metadata = attrs([
            ("kind", kind.to_string().into()),
            ("node_count", nodes.len().into()),
            ("edge_count", edges.len().into()),
            ("directed", true.into()),
        ]);
        Self {
            directed: true,
            kind,
            metadata,
            nodes,
            edges,
        }
    }

    /// Flatten a multiway graph. State ids are comma-separated values.
    pub fn from_multiway(graph: &MultiwayGraph) -> Self {
        let pg = graph.graph();
        let id_of = |node: &MultiwayNode| match node {
            MultiwayNode::State(state) => state.to_string(),
            MultiwayNode::SuperSource => SUPER_SOURCE_ID.to_string(),
        };

        let mut nodes: Vec<ExportNode> = graph
            .states()
            .map(|state| ExportNode {
                id: state.to_string(),
                attributes: attrs([
                    ("label", state.compact_label().into()),
                    ("inversions", state.inversions().into()),
                    ("kind", "state".into()),
                ]),
            })
            .collect();
        if graph.super_source().is_some() {
            nodes.push(ExportNode {
                id: SUPER_SOURCE_ID.to_string(),
                attributes: attrs([
                    ("label", SUPER_SOURCE_LABEL.into()),
                    ("kind", "super_source".into()),
                ]),
            });
        }

        let edges = pg
            .edge_indices()
            .filter_map(|e| {
                let (source, target) = pg.edge_endpoints(e)?;
                let weight = pg.edge_weight(e)?;
                let attributes = match weight.swap_index() {
                    Some(index) => attrs([("kind", "swap".into()), ("swap_index", index.into())]),
                    None => attrs([("kind", "start".into())]),
                };
                Some(ExportEdge {
                    source: id_of(&pg[source]),
                    target: id_of(&pg[target]),
                    attributes,
                })
            })
            .collect();

        Self::new(GraphKind::Multiway, nodes, edges)
    }

    /// Flatten a causal graph. Event ids are their numeric identifiers.
    pub fn from_causal(graph: &CausalGraph) -> Self {
        let nodes = graph
            .events()
            .iter()
            .map(|event| ExportNode {
                id: event.id.to_string(),
                attributes: attrs([
                    ("label", event.label().into()),
                    ("source_str", event.source.to_string().into()),
                    ("target_str", event.target.to_string().into()),
                    ("swap_index", event.swap_index.into()),
                    ("source_inversions", event.source_inversions().into()),
                    ("target_inversions", event.target_inversions().into()),
                ]),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(cause, effect)| ExportEdge {
                source: cause.to_string(),
                target: effect.to_string(),
                attributes: Attributes::new(),
            })
            .collect();

        Self::new(GraphKind::Causal, nodes, edges)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Supported serialization formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    GraphMl,
    Json,
}

impl ExportFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> OpsResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("graphml") | Some("xml") => Ok(Self::GraphMl),
            Some("json") => Ok(Self::Json),
            _ => Err(OpsError::unsupported_format(
                path,
                "expected a .graphml or .json extension",
            )),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::GraphMl => "graphml",
            Self::Json => "json",
        }
    }

    /// Writer for this format.
    pub fn writer(&self) -> Box<dyn GraphWriter> {
        match self {
            Self::GraphMl => Box::new(GraphMlWriter),
            Self::Json => Box::new(JsonWriter),
        }
    }
}

/// Encodes an [`ExportGraph`] into a byte stream.
pub trait GraphWriter {
    /// Write the whole graph to `out`.
    fn write(&self, graph: &ExportGraph, out: &mut dyn Write) -> OpsResult<()>;
}

/// Pretty-printed JSON of the [`ExportGraph`] itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl GraphWriter for JsonWriter {
    fn write(&self, graph: &ExportGraph, out: &mut dyn Write) -> OpsResult<()> {
        serde_json::to_writer_pretty(&mut *out, graph)?;
        writeln!(out)?;
        Ok(())
    }
}

/// GraphML with typed `<key>` declarations for every attribute in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphMlWriter;

/// Attribute domain in GraphML terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Domain {
    Graph,
    Node,
    Edge,
}

impl Domain {
    fn name(self) -> &'static str {
        match self {
            Domain::Graph => "graph",
            Domain::Node => "node",
            Domain::Edge => "edge",
        }
    }

    fn prefix(self) -> char {
        match self {
            Domain::Graph => 'g',
            Domain::Node => 'n',
            Domain::Edge => 'e',
        }
    }
}

/// Key ids per `(domain, attribute)` with the type of the first value seen.
struct KeyTable {
    keys: BTreeMap<(Domain, String), (String, &'static str)>,
}

impl KeyTable {
    fn collect(graph: &ExportGraph) -> Self {
        let mut keys = BTreeMap::new();
        let mut counters: BTreeMap<Domain, usize> = BTreeMap::new();
        let mut add = |domain: Domain, attributes: &Attributes| {
            for (name, value) in attributes {
                keys.entry((domain, name.clone())).or_insert_with(|| {
                    let n = counters.entry(domain).or_insert(0);
                    let id = format!("{}{}", domain.prefix(), n);
                    *n += 1;
                    (id, value.graphml_type())
                });
            }
        };
        add(Domain::Graph, &graph.metadata);
        for node in &graph.nodes {
            add(Domain::Node, &node.attributes);
        }
        for edge in &graph.edges {
            add(Domain::Edge, &edge.attributes);
        }
        Self { keys }
    }

    fn id<'a>(&'a self, domain: Domain, name: &'a str) -> &'a str {
        self.keys
            .get(&(domain, name.to_string()))
            .map(|(id, _)| id.as_str())
            .unwrap_or(name)
    }

    fn write_data(
        &self,
        out: &mut dyn Write,
        domain: Domain,
        attributes: &Attributes,
        indent: &str,
    ) -> std::io::Result<()> {
        for (name, value) in attributes {
            writeln!(
                out,
                "{indent}<data key=\"{}\">{}</data>",
                self.id(domain, name),
                escape_xml(&value.text())
            )?;
        }
        Ok(())
    }
}

impl GraphWriter for GraphMlWriter {
    fn write(&self, graph: &ExportGraph, out: &mut dyn Write) -> OpsResult<()> {
        let keys = KeyTable::collect(graph);

        writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            out,
            r#"<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#
        )?;
        for ((domain, name), (id, ty)) in &keys.keys {
            writeln!(
                out,
                r#"  <key id="{}" for="{}" attr.name="{}" attr.type="{}"/>"#,
                id,
                domain.name(),
                escape_xml(name),
                ty
            )?;
        }

        let edgedefault = if graph.directed { "directed" } else { "undirected" };
        writeln!(out, r#"  <graph id="G" edgedefault="{}">"#, edgedefault)?;
        keys.write_data(out, Domain::Graph, &graph.metadata, "    ")?;

        for node in &graph.nodes {
            writeln!(out, r#"    <node id="{}">"#, escape_xml(&node.id))?;
            keys.write_data(out, Domain::Node, &node.attributes, "      ")?;
            writeln!(out, "    </node>")?;
        }
        for edge in &graph.edges {
            writeln!(
                out,
                r#"    <edge source="{}" target="{}">"#,
                escape_xml(&edge.source),
                escape_xml(&edge.target)
            )?;
            keys.write_data(out, Domain::Edge, &edge.attributes, "      ")?;
            writeln!(out, "    </edge>")?;
        }

        writeln!(out, "  </graph>")?;
        writeln!(out, "</graphml>")?;
        Ok(())
    }
}

/// Escape the five XML special characters.
pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Write `graph` to `path` in the given format and return the byte count.
pub fn write_graph(graph: &ExportGraph, path: &Path, format: ExportFormat) -> OpsResult<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    format.writer().write(graph, &mut out)?;
    out.flush()?;
    Ok(std::fs::metadata(path)?.len())
}
