use anyhow::{Context, Result};

use crate::parser::*;
use crate::renderer::renders::DebugView;
use crate::renderer::traits::*;

/// Label given to a parsed value when the caller supplies none
pub const DEFAULT_LABEL: &str = "root";

/// Prefix of the root label of a self-inspection tree
pub const DEBUG_LABEL_PREFIX: &str = "debug@";

/// Renders node trees through the debug view so they can describe
/// themselves.
#[derive(Debug, Clone, Default)]
pub struct Debugger {
    parser: TreeParser,
    styles: Styles,
}

impl Debugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(mut self, parser: TreeParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Re-renders an already-built tree as a description of its own nodes.
    pub fn result_node(&self, tree: &Tree) -> Result<String> {
        let (graph, root) = introspect(tree)?;
        let label = format!("{}{}", DEBUG_LABEL_PREFIX, tree.root().key());
        tracing::debug!(%label, nodes = tree.len(), "inspecting node tree");

        let mut inspected = self
            .parser
            .parse(&graph, root, &label)
            .context("Failed to parse node description")?;
        Ok(self.parser.render(&mut inspected, &DebugView::new(self.styles)))
    }

    /// Parses `root` and describes the resulting tree. When `strategy` is
    /// given, the tree is rendered with it first so each node's
    /// `processResult` shows that strategy's output.
    pub fn value(
        &self,
        graph: &ValueGraph,
        root: ValueId,
        label: Option<&str>,
        strategy: Option<&dyn RenderStrategy>,
    ) -> Result<String> {
        let label = label.unwrap_or(DEFAULT_LABEL);
        let mut tree = self.parser.parse(graph, root, label)?;
        if let Some(strategy) = strategy {
            self.parser.render(&mut tree, strategy);
        }
        self.result_node(&tree)
    }
}

/// Describes `tree` with the debug view, using `parser` or a default one.
pub fn debug_result_node(tree: &Tree, parser: Option<&TreeParser>) -> Result<String> {
    let parser = parser.cloned().unwrap_or_default();
    Debugger::new().with_parser(parser).result_node(tree)
}

/// Parses `root` and describes the resulting tree with the debug view.
pub fn debug(
    graph: &ValueGraph,
    root: ValueId,
    label: Option<&str>,
    strategy: Option<&dyn RenderStrategy>,
) -> Result<String> {
    Debugger::new().value(graph, root, label, strategy)
}

/// Builds a value graph with one object per node of `tree`. Parent,
/// ancestor and circular links point at the objects of the linked nodes,
/// so the graph repeats values wherever the tree links back.
pub fn introspect(tree: &Tree) -> Result<(ValueGraph, ValueId)> {
    let mut graph = ValueGraph::new();
    let objects: Vec<ValueId> = tree.ids().map(|_| graph.object()).collect();
    let object_of = |node: NodeRef<'_>| objects[node.id().index()];

    for node in tree.ids().filter_map(|id| tree.get(id)) {
        let object = object_of(node);

        let fields: Vec<(&str, Scalar)> = vec![
            ("key", node.key().into()),
            ("path", node.path().into()),
            ("nodeType", node.kind().code().into()),
        ];
        set_scalars(&mut graph, object, fields)?;

        if node.is_leaf() {
            let value = match node.scalar() {
                Some(scalar) => scalar.clone(),
                None => node.value_string().into(),
            };
            set_scalars(&mut graph, object, vec![("value", value)])?;
        }

        let circular_ref_index = node
            .circular_ref_index()
            .and_then(|index| i64::try_from(index).ok())
            .unwrap_or(-1);
        let fields: Vec<(&str, Scalar)> = vec![
            ("prefix", node.prefix().into()),
            ("joint", node.joint().into()),
            ("depth", i64::try_from(node.depth()).unwrap_or(i64::MAX).into()),
            ("isCircular", node.is_circular().into()),
            ("circularRefIndex", circular_ref_index.into()),
        ];
        set_scalars(&mut graph, object, fields)?;

        let circular_ref = match node.circular_ref() {
            Some(target) => object_of(target),
            None => graph.null(),
        };
        graph.set_field(object, "circularRefNode", circular_ref)?;

        let parent = match node.parent() {
            Some(parent) => object_of(parent),
            None => graph.null(),
        };
        graph.set_field(object, "parent", parent)?;

        let ancestors = graph.array();
        for ancestor in node.ancestors() {
            graph.push(ancestors, object_of(ancestor))?;
        }
        graph.set_field(object, "ancestors", ancestors)?;

        let process_result = match node.process_result() {
            Some(result) => graph.scalar(result),
            None => graph.null(),
        };
        graph.set_field(object, "processResult", process_result)?;

        let children = graph.array();
        for child in node.children() {
            graph.push(children, object_of(child))?;
        }
        graph.set_field(object, "children", children)?;
    }

    Ok((graph, objects[0]))
}

fn set_scalars(graph: &mut ValueGraph, object: ValueId, fields: Vec<(&str, Scalar)>) -> Result<()> {
    for (key, scalar) in fields {
        let value = graph.scalar(scalar);
        graph.set_field(object, key, value)?;
    }
    Ok(())
}
