use crate::parser::*;
use crate::renderer::components::*;
use crate::renderer::traits::*;

/// One line per node: key and kind name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesView {
    pub styles: Styles,
}

impl TypesView {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }
}

impl RenderStrategy for TypesView {
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String {
        let styles = &self.styles;
        let line = format!(
            "{}{}{}{}",
            styles.structure(node.prefix()),
            styles.key(node.key()),
            styles.structure(" : "),
            styles.value(kind_to_string(node.kind())),
        );
        LineJoiner::join(line, child_results)
    }
}

/// One line per node: key, and the value for leaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuesView {
    pub styles: Styles,
}

impl ValuesView {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }
}

impl RenderStrategy for ValuesView {
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String {
        let styles = &self.styles;
        let mut line = format!("{}{}", styles.structure(node.prefix()), styles.key(node.key()));

        if node.is_leaf() {
            line.push_str(&styles.structure(" : "));
            line.push_str(&styles.value(&node.value_string()));
        }

        if node.is_circular() {
            // Only a missing target falls back to `?`; an empty key is shown as is.
            let target = node.circular_ref().map(|target| target.key()).unwrap_or("?");
            line.push_str(&styles.circular(&format!(" -> {}", target)));
        }

        LineJoiner::join(line, child_results)
    }
}

/// Nested `<ul>`/`<ol>` markup with per-node anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlView;

impl HtmlView {
    fn value_span(node: NodeRef<'_>) -> String {
        let class = if node.is_circular() {
            "value circular"
        } else {
            "value"
        };
        let mut output = format!(
            "<span class=\"{}\">{}</span>",
            class,
            MarkupHelper::escape(&node.value_string())
        );

        if node.is_circular() {
            match node.circular_ref() {
                Some(target) if !target.path().is_empty() => output.push_str(&format!(
                    "<a class=\"ref\" href=\"#{}\">{}</a>",
                    MarkupHelper::escape(&MarkupHelper::list_id(target.path())),
                    MarkupHelper::escape(target.key())
                )),
                // No path to link to: label only
                Some(target) => output.push_str(&format!(
                    "<span class=\"ref\">{}</span>",
                    MarkupHelper::escape(target.key())
                )),
                None => output.push_str("<span class=\"ref\">?</span>"),
            }
        }
        output
    }

    fn list(node: NodeRef<'_>, child_results: &[&str]) -> String {
        let (open, close) = if node.kind() == NodeKind::ObjectArray {
            ("<ol start=\"0\"", "</ol>")
        } else {
            ("<ul", "</ul>")
        };
        let head = format!(
            "{} id=\"{}\" class=\"{}\">",
            open,
            MarkupHelper::escape(&MarkupHelper::list_id(node.path())),
            MarkupHelper::kind_class(node.kind())
        );
        let mut output = LineJoiner::join(head, child_results);
        output.push('\n');
        output.push_str(close);
        output
    }
}

impl RenderStrategy for HtmlView {
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String {
        if node.is_root() {
            return if node.is_leaf() {
                Self::value_span(node)
            } else {
                Self::list(node, child_results)
            };
        }

        let class = if node.is_leaf() { "leaf" } else { "branch" };
        let mut output = format!(
            "<li id=\"{}\" class=\"{} {}\">",
            MarkupHelper::escape(node.path()),
            class,
            MarkupHelper::kind_class(node.kind())
        );

        let indexed = node
            .parent()
            .is_some_and(|parent| parent.kind() == NodeKind::ObjectArray);
        if !indexed {
            output.push_str(&format!(
                "<span class=\"key\">{}</span>",
                MarkupHelper::escape(node.key())
            ));
        }

        if node.is_leaf() {
            output.push_str(&Self::value_span(node));
        } else {
            output.push('\n');
            output.push_str(&Self::list(node, child_results));
            output.push('\n');
        }
        output.push_str("</li>");
        output
    }
}

/// How the debug view treats one node attribute
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub key: &'static str,
    /// Drops the attribute's line entirely when true
    pub suppress: fn(NodeRef<'_>) -> bool,
    /// Replaces the displayed value
    pub format: Option<fn(NodeRef<'_>) -> String>,
    /// Shown on one line with its value, children never expanded
    pub inline: bool,
}

fn never(_: NodeRef<'_>) -> bool {
    false
}

fn owner_not_circular(node: NodeRef<'_>) -> bool {
    let target = node
        .parent()
        .and_then(|owner| owner.child("circularRefNode"));
    match target {
        Some(target) => target.scalar().is_some_and(Scalar::is_null),
        None => true,
    }
}

fn negative_index(node: NodeRef<'_>) -> bool {
    node.scalar()
        .and_then(Scalar::as_i64)
        .is_some_and(|index| index < 0)
}

fn is_null(node: NodeRef<'_>) -> bool {
    node.scalar().is_some_and(Scalar::is_null)
}

fn not_true(node: NodeRef<'_>) -> bool {
    node.scalar().and_then(Scalar::as_bool) != Some(true)
}

fn empty_sequence(node: NodeRef<'_>) -> bool {
    node.kind() == NodeKind::EmptyArray
}

fn single_line(node: NodeRef<'_>) -> String {
    escape_line_breaks(&node.value_string())
}

fn kind_name(node: NodeRef<'_>) -> String {
    node.scalar()
        .and_then(Scalar::as_i64)
        .and_then(NodeKind::from_code)
        .map(|kind| kind_to_string(kind).to_string())
        .unwrap_or_else(|| node.value_string())
}

// Each entry is a node object; a repeated one points back at its first occurrence.
fn ancestor_paths(node: NodeRef<'_>) -> String {
    let paths: Vec<String> = node
        .children()
        .map(|entry| {
            let target = entry.circular_ref().unwrap_or(entry);
            target
                .child("path")
                .map(|path| path.value_string())
                .unwrap_or_else(|| "?".to_string())
        })
        .collect();
    format!("[{}]", paths.join(", "))
}

pub const ATTRIBUTE_RULES: &[AttributeRule] = &[
    AttributeRule {
        key: "processResult",
        suppress: never,
        format: Some(single_line),
        inline: false,
    },
    AttributeRule {
        key: "value",
        suppress: never,
        format: Some(single_line),
        inline: false,
    },
    AttributeRule {
        key: "nodeType",
        suppress: never,
        format: Some(kind_name),
        inline: false,
    },
    AttributeRule {
        key: "ancestors",
        suppress: owner_not_circular,
        format: Some(ancestor_paths),
        inline: true,
    },
    AttributeRule {
        key: "circularRefIndex",
        suppress: negative_index,
        format: None,
        inline: false,
    },
    AttributeRule {
        key: "circularRefNode",
        suppress: is_null,
        format: None,
        inline: false,
    },
    AttributeRule {
        key: "isCircular",
        suppress: not_true,
        format: None,
        inline: false,
    },
    AttributeRule {
        key: "children",
        suppress: empty_sequence,
        format: None,
        inline: false,
    },
];

pub fn attribute_rule(key: &str) -> Option<&'static AttributeRule> {
    ATTRIBUTE_RULES.iter().find(|rule| rule.key == key)
}

/// Renders the attributes of a node-model description, one line per
/// attribute, filtered through [`ATTRIBUTE_RULES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugView {
    pub styles: Styles,
}

impl DebugView {
    pub fn new(styles: Styles) -> Self {
        Self { styles }
    }
}

impl RenderStrategy for DebugView {
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String {
        let rule = attribute_rule(node.key());
        if rule.is_some_and(|rule| (rule.suppress)(node)) {
            return String::new();
        }

        let styles = &self.styles;
        let inline = rule.is_some_and(|rule| rule.inline);
        let mut line = format!("{}{}", styles.structure(node.prefix()), styles.key(node.key()));

        if node.is_leaf() || inline {
            let value = match rule.and_then(|rule| rule.format) {
                Some(format) => format(node),
                None => node.value_string(),
            };
            line.push_str(&styles.structure(" : "));
            line.push_str(&styles.value(&value));
        }

        if node.is_circular() {
            let target = node
                .circular_ref()
                .map(|target| {
                    if target.path().is_empty() {
                        target.key()
                    } else {
                        target.path()
                    }
                })
                .unwrap_or("?");
            line.push_str(&styles.circular(&format!(" -> {}", target)));
        }

        if inline {
            return line;
        }
        LineJoiner::join(line, child_results)
    }
}
