use owo_colors::OwoColorize;

use crate::parser::NodeRef;

/// A decoration applied to one segment of rendered output
pub type StyleFn = fn(&str) -> String;

fn structure_default(s: &str) -> String {
    s.bright_black().to_string()
}

fn key_default(s: &str) -> String {
    s.cyan().to_string()
}

fn value_default(s: &str) -> String {
    s.green().to_string()
}

fn circular_default(s: &str) -> String {
    s.red().to_string()
}

fn unstyled(s: &str) -> String {
    s.to_string()
}

/// Decoration palette used by the text views.
///
/// Each strategy owns its own copy, so overriding a style never leaks into
/// another render.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    /// Connectors and separators
    pub structure: StyleFn,
    pub key: StyleFn,
    pub value: StyleFn,
    /// Back-references of circular nodes
    pub circular: StyleFn,
}

impl Styles {
    pub const DEFAULT: Styles = Styles {
        structure: structure_default,
        key: key_default,
        value: value_default,
        circular: circular_default,
    };

    /// A palette that leaves every segment untouched.
    pub fn plain() -> Self {
        Self {
            structure: unstyled,
            key: unstyled,
            value: unstyled,
            circular: unstyled,
        }
    }

    pub fn with_structure(mut self, style: StyleFn) -> Self {
        self.structure = style;
        self
    }

    pub fn with_key(mut self, style: StyleFn) -> Self {
        self.key = style;
        self
    }

    pub fn with_value(mut self, style: StyleFn) -> Self {
        self.value = style;
        self
    }

    pub fn with_circular(mut self, style: StyleFn) -> Self {
        self.circular = style;
        self
    }

    /// Restores all four styles to the default palette.
    pub fn reset_all(&mut self) {
        *self = Self::DEFAULT;
    }

    pub fn structure(&self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        (self.structure)(s)
    }

    pub fn key(&self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        (self.key)(s)
    }

    pub fn value(&self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        (self.value)(s)
    }

    pub fn circular(&self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        (self.circular)(s)
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Per-node render contract.
///
/// Called once per node, after every child of that node has been rendered.
/// `child_results` holds those results in child order.
pub trait RenderStrategy {
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String;
}

impl<F> RenderStrategy for F
where
    F: Fn(NodeRef<'_>, &[&str]) -> String,
{
    fn render(&self, node: NodeRef<'_>, child_results: &[&str]) -> String {
        self(node, child_results)
    }
}
