//! # valtree
//!
//! Renders parsed value trees as text or markup.
//!
//! A [`TreeParser`] turns a [`ValueGraph`] into a [`Tree`] of nodes, detecting
//! values that repeat one of their ancestors. It then walks the tree
//! bottom-up, handing each node and its children's results to a
//! [`RenderStrategy`]:
//!
//! * [`TypesView`]: each key with its kind
//! * [`ValuesView`]: each key with its value, and back-references for
//!   circular values
//! * [`HtmlView`]: nested lists with anchors for back-references
//! * [`DebugView`]: the node model itself, see [`debug`] and
//!   [`debug_result_node`]
//!
//! ```
//! use valtree::{Styles, TreeParser, ValueGraph, ValuesView};
//!
//! let json = serde_json::json!({"name": "Bobby", "age": 30});
//! let (graph, root) = ValueGraph::from_json(&json);
//! let output = TreeParser::new()
//!     .render_value(&graph, root, "person", &ValuesView::new(Styles::plain()))
//!     .unwrap();
//! assert_eq!(output, "person\n|-- name : Bobby\n`-- age : 30");
//! ```

pub mod parser;
pub mod renderer;

pub use parser::{
    Node, NodeId, NodeKind, NodeRef, Scalar, Tree, TreeParser, Value, ValueGraph, ValueId,
};
pub use renderer::{
    attribute_rule, debug, debug_result_node, escape_line_breaks, introspect, kind_to_string,
    AttributeRule, DebugView, Debugger, HtmlView, LineJoiner, MarkupHelper, RenderStrategy,
    StyleFn, Styles, TypesView, ValuesView, ATTRIBUTE_RULES, DEBUG_LABEL_PREFIX, DEFAULT_LABEL,
};
