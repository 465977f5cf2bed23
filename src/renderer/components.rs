use crate::parser::NodeKind;

/// Canonical display name of a node kind.
pub fn kind_to_string(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Scalar => "scalar",
        NodeKind::Object => "object",
        NodeKind::Array => "array",
        NodeKind::ObjectArray => "array-of-objects",
        NodeKind::Function => "function",
        NodeKind::EmptyObject => "empty-object",
        NodeKind::EmptyArray => "empty-array",
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(kind_to_string(*self))
    }
}

/// Helper for assembling a node's output from its own line and its
/// children's cached results
pub struct LineJoiner;

impl LineJoiner {
    /// Joins `head` and every non-empty child result with newlines. Empty
    /// results are dropped rather than rendered as blank lines.
    pub fn join(head: String, child_results: &[&str]) -> String {
        let mut output = head;
        for result in child_results.iter().filter(|r| !r.is_empty()) {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(result);
        }
        output
    }
}

/// Helper for markup output
pub struct MarkupHelper;

impl MarkupHelper {
    pub fn escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    /// `id` of the list wrapping the children of the node at `path`
    pub fn list_id(path: &str) -> String {
        format!("list@{}", path)
    }

    pub fn kind_class(kind: NodeKind) -> String {
        format!("kind-{}", kind_to_string(kind))
    }
}

/// Replaces line breaks with the two characters `\n` so a multi-line value
/// fits on one line.
pub fn escape_line_breaks(s: &str) -> String {
    s.replace("\r\n", "\\n").replace('\n', "\\n")
}
