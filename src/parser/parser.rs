use anyhow::{anyhow, bail, Result};
use tracing::{debug, trace};

use crate::parser::tree::*;
use crate::parser::types::*;
use crate::renderer::traits::RenderStrategy;

const JOINT_MIDDLE: &str = "|-- ";
const JOINT_LAST: &str = "`-- ";
const INDENT_MIDDLE: &str = "|   ";
const INDENT_LAST: &str = "    ";

/// Builds node trees from value graphs and drives render strategies over them.
#[derive(Debug, Clone, Default)]
pub struct TreeParser {
    max_depth: Option<usize>,
}

/// Per-node state carried down the walk
struct Frame<'g> {
    value_id: ValueId,
    value: &'g Value,
    key: String,
    path: String,
    parent: Option<NodeId>,
    /// Indentation inherited by this node's children
    indent: String,
    joint: &'static str,
    prefix: String,
}

impl TreeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Containers deeper than `depth` are kept as unexpanded leaves.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Parses the value at `root` into a node tree labelled `label`.
    pub fn parse(&self, graph: &ValueGraph, root: ValueId, label: &str) -> Result<Tree> {
        let value = lookup(graph, root)?;
        let mut nodes = Vec::new();
        let mut chain = Vec::new();
        let frame = Frame {
            value_id: root,
            value,
            key: label.to_string(),
            path: label.to_string(),
            parent: None,
            indent: String::new(),
            joint: "",
            prefix: String::new(),
        };
        self.parse_value(graph, frame, &mut chain, &mut nodes)?;

        debug!(label, nodes = nodes.len(), "parsed value graph");
        Tree::from_nodes(nodes)
    }

    // `chain` holds (value id, node id) for every ancestor of the current frame
    fn parse_value(
        &self,
        graph: &ValueGraph,
        frame: Frame<'_>,
        chain: &mut Vec<(ValueId, NodeId)>,
        nodes: &mut Vec<Node>,
    ) -> Result<NodeId> {
        let id = NodeId::new(nodes.len());
        let kind = NodeKind::classify(graph, frame.value);
        let ancestors: Vec<NodeId> = chain.iter().map(|(_, node)| *node).collect();

        let circular_ref_index = chain
            .iter()
            .position(|(value_id, _)| *value_id == frame.value_id);
        if let Some(index) = circular_ref_index {
            trace!(path = %frame.path, target = index, "circular reference");
        }

        let scalar = match frame.value {
            Value::Scalar(scalar) => Some(scalar.clone()),
            _ => None,
        };

        nodes.push(Node {
            key: frame.key,
            kind,
            path: frame.path.clone(),
            parent: frame.parent,
            children: Vec::new(),
            ancestors,
            circular: circular_ref_index.is_some(),
            circular_ref: circular_ref_index.map(|index| chain[index].1),
            circular_ref_index,
            prefix: frame.prefix,
            joint: frame.joint.to_string(),
            scalar,
            process_result: None,
        });

        let depth_exceeded = self.max_depth.is_some_and(|max| chain.len() >= max);
        if circular_ref_index.is_some() || depth_exceeded {
            return Ok(id);
        }

        let members: Vec<(String, String, ValueId)> = match frame.value {
            Value::Scalar(_) => return Ok(id),
            Value::Object(fields) => {
                for (position, (key, _)) in fields.iter().enumerate() {
                    if fields[..position].iter().any(|(seen, _)| seen == key) {
                        bail!("Duplicate key {:?} in object at {}", key, frame.path);
                    }
                }
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), child_path(&frame.path, key), *value))
                    .collect()
            }
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), format!("{}[{}]", frame.path, index), *value))
                .collect(),
        };

        chain.push((frame.value_id, id));
        let count = members.len();
        let mut children = Vec::with_capacity(count);
        for (position, (key, path, value_id)) in members.into_iter().enumerate() {
            let last = position + 1 == count;
            let joint = if last { JOINT_LAST } else { JOINT_MIDDLE };
            let child_indent = if last { INDENT_LAST } else { INDENT_MIDDLE };
            let child = Frame {
                value_id,
                value: lookup(graph, value_id)?,
                key,
                path,
                parent: Some(id),
                indent: format!("{}{}", frame.indent, child_indent),
                joint,
                prefix: format!("{}{}", frame.indent, joint),
            };
            children.push(self.parse_value(graph, child, chain, nodes)?);
        }
        chain.pop();

        nodes[id.index()].children = children;
        Ok(id)
    }

    /// Renders `tree` bottom-up with `strategy`, caching each node's result
    /// as its `process_result`. Returns the root's result.
    pub fn render(&self, tree: &mut Tree, strategy: &dyn RenderStrategy) -> String {
        // Pre-order storage means reverse order visits children first.
        let ids: Vec<NodeId> = tree.ids().rev().collect();
        for id in ids {
            let result = {
                let Some(node) = tree.get(id) else { continue };
                let child_results: Vec<&str> = node
                    .children()
                    .map(|child| child.process_result().unwrap_or(""))
                    .collect();
                strategy.render(node, &child_results)
            };
            tree.node_mut(id).process_result = Some(result);
        }

        trace!(nodes = tree.len(), "rendered tree");
        tree.root().process_result().unwrap_or_default().to_string()
    }

    /// Parses and renders in one step.
    pub fn render_value(
        &self,
        graph: &ValueGraph,
        root: ValueId,
        label: &str,
        strategy: &dyn RenderStrategy,
    ) -> Result<String> {
        let mut tree = self.parse(graph, root, label)?;
        Ok(self.render(&mut tree, strategy))
    }
}

fn lookup(graph: &ValueGraph, id: ValueId) -> Result<&Value> {
    graph
        .get(id)
        .ok_or_else(|| anyhow!("Value id {} not found in graph", id.index()))
}

/// Path of an object member. Plain identifiers use dot notation, anything
/// else is JSON-quoted in brackets so paths stay unique.
fn child_path(parent: &str, key: &str) -> String {
    let plain = key
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if plain {
        format!("{}.{}", parent, key)
    } else {
        let quoted = serde_json::to_string(key).unwrap_or_else(|_| format!("\"{}\"", key));
        format!("{}[{}]", parent, quoted)
    }
}
