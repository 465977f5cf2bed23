use anyhow::{anyhow, bail, Context, Result};

/// Index of a value inside a [`ValueGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(usize);

impl ValueId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A leaf value of the input graph
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// A callable, identified by name only
    Function(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Function(name) => write!(f, "[Function: {}]", name),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

/// One slot of a [`ValueGraph`]. Containers refer to their members by id,
/// so the same value may appear under several parents or under itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Object(Vec<(String, ValueId)>),
    Array(Vec<ValueId>),
}

impl Value {
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

/// Append-only arena holding an input value and everything it reaches.
#[derive(Debug, Clone, Default)]
pub struct ValueGraph {
    values: Vec<Value>,
}

impl ValueGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn insert(&mut self, value: Value) -> ValueId {
        self.values.push(value);
        ValueId(self.values.len() - 1)
    }

    pub fn scalar(&mut self, scalar: impl Into<Scalar>) -> ValueId {
        self.insert(Value::Scalar(scalar.into()))
    }

    pub fn null(&mut self) -> ValueId {
        self.insert(Value::Scalar(Scalar::Null))
    }

    pub fn function(&mut self, name: &str) -> ValueId {
        self.insert(Value::Scalar(Scalar::Function(name.to_string())))
    }

    /// Adds an empty object.
    pub fn object(&mut self) -> ValueId {
        self.insert(Value::Object(Vec::new()))
    }

    /// Adds an empty array.
    pub fn array(&mut self) -> ValueId {
        self.insert(Value::Array(Vec::new()))
    }

    pub fn get(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id.0)
    }

    /// Sets `key` on an object, replacing an existing entry in place so that
    /// declaration order is kept.
    pub fn set_field(&mut self, object: ValueId, key: &str, value: ValueId) -> Result<()> {
        self.ensure_known(value)?;
        match self.values.get_mut(object.0) {
            Some(Value::Object(fields)) => {
                if let Some(slot) = fields.iter_mut().find(|(k, _)| k == key) {
                    slot.1 = value;
                } else {
                    fields.push((key.to_string(), value));
                }
                Ok(())
            }
            Some(_) => bail!("Value {} is not an object", object.0),
            None => bail!("Unknown value id {}", object.0),
        }
    }

    pub fn push(&mut self, array: ValueId, value: ValueId) -> Result<()> {
        self.ensure_known(value)?;
        match self.values.get_mut(array.0) {
            Some(Value::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(_) => bail!("Value {} is not an array", array.0),
            None => bail!("Unknown value id {}", array.0),
        }
    }

    /// Builds a graph from a JSON document, returning it with the root's id.
    pub fn from_json(json: &serde_json::Value) -> (Self, ValueId) {
        let mut graph = Self::new();
        let root = graph.add_json(json);
        (graph, root)
    }

    pub fn from_json_str(input: &str) -> Result<(Self, ValueId)> {
        let json: serde_json::Value =
            serde_json::from_str(input).context("Failed to parse JSON input")?;
        Ok(Self::from_json(&json))
    }

    /// Adds a JSON document to this graph. Every container gets its own slot.
    pub fn add_json(&mut self, json: &serde_json::Value) -> ValueId {
        match json {
            serde_json::Value::Null => self.null(),
            serde_json::Value::Bool(b) => self.scalar(*b),
            serde_json::Value::Number(n) => self.insert(Value::Scalar(Scalar::Number(n.clone()))),
            serde_json::Value::String(s) => self.scalar(s.as_str()),
            serde_json::Value::Array(items) => {
                let ids = items.iter().map(|item| self.add_json(item)).collect();
                self.insert(Value::Array(ids))
            }
            serde_json::Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.add_json(v)))
                    .collect();
                self.insert(Value::Object(fields))
            }
        }
    }

    fn ensure_known(&self, id: ValueId) -> Result<()> {
        self.get(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("Unknown value id {}", id.0))
    }
}

/// Shape classification of a parsed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Object,
    Array,
    /// A non-empty array whose elements are all objects
    ObjectArray,
    Function,
    EmptyObject,
    EmptyArray,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Scalar,
        NodeKind::Object,
        NodeKind::Array,
        NodeKind::ObjectArray,
        NodeKind::Function,
        NodeKind::EmptyObject,
        NodeKind::EmptyArray,
    ];

    /// Stable numeric code, used when a kind is stored as a plain value.
    pub fn code(self) -> i64 {
        match self {
            NodeKind::Scalar => 0,
            NodeKind::Object => 1,
            NodeKind::Array => 2,
            NodeKind::ObjectArray => 3,
            NodeKind::Function => 4,
            NodeKind::EmptyObject => 5,
            NodeKind::EmptyArray => 6,
        }
    }

    pub fn from_code(code: i64) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::Scalar | NodeKind::Function)
    }

    /// Classifies a graph value. Arrays look one level down to tell plain
    /// arrays from arrays of objects.
    pub fn classify(graph: &ValueGraph, value: &Value) -> NodeKind {
        match value {
            Value::Scalar(Scalar::Function(_)) => NodeKind::Function,
            Value::Scalar(_) => NodeKind::Scalar,
            Value::Object(fields) if fields.is_empty() => NodeKind::EmptyObject,
            Value::Object(_) => NodeKind::Object,
            Value::Array(items) if items.is_empty() => NodeKind::EmptyArray,
            Value::Array(items) => {
                let all_objects = items
                    .iter()
                    .all(|id| graph.get(*id).is_some_and(Value::is_object));
                if all_objects {
                    NodeKind::ObjectArray
                } else {
                    NodeKind::Array
                }
            }
        }
    }
}
