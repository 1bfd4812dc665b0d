//! Dynamic attribute values accepted by node constructors and setters.

use std::collections::BTreeMap;
use std::fmt;

use generational_arena::Index;

use crate::errors::{TreeError, TreeResult};

/// Raw attribute-mapping form of a node: attribute name -> value.
///
/// Recognized keys are `identifier`, `payload`, `children` and `parent`;
/// anything else is rejected during expansion.
pub type AttrMap = BTreeMap<String, Value>;

/// A dynamically shaped value handed to the tree API.
///
/// Setters resolve the variant at the point of use: `Node` is a handle to a
/// node that already lives in the arena, `Map` is raw attribute data to be
/// expanded into a new node, and `Null` marks an attribute as unset.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Map(AttrMap),
    Node(Index),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Node(_) => ValueKind::Node,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Node(idx) => write!(f, "<node {idx:?}>"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<AttrMap> for Value {
    fn from(map: AttrMap) -> Self {
        Value::Map(map)
    }
}

impl From<Index> for Value {
    fn from(idx: Index) -> Self {
        Value::Node(idx)
    }
}

/// Shape names used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    List,
    Map,
    Node,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Node => "node",
        };
        write!(f, "{name}")
    }
}

/// Constructor arguments for a node, all optional.
///
/// `Null` means unset: identifier and parent stay absent, payload stays
/// `Null`, children default to an empty sequence. Validation happens in the
/// arena, not here.
#[derive(Debug, Clone, Default)]
pub struct NodeAttrs {
    pub identifier: Value,
    pub payload: Value,
    pub children: Value,
    pub parent: Value,
}

impl NodeAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, value: impl Into<Value>) -> Self {
        self.identifier = value.into();
        self
    }

    pub fn payload(mut self, value: impl Into<Value>) -> Self {
        self.payload = value.into();
        self
    }

    pub fn children(mut self, value: impl Into<Value>) -> Self {
        self.children = value.into();
        self
    }

    pub fn parent(mut self, value: impl Into<Value>) -> Self {
        self.parent = value.into();
        self
    }

    /// Expand a raw attribute-mapping into constructor arguments.
    pub fn from_map(map: AttrMap) -> TreeResult<Self> {
        let mut attrs = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "identifier" => attrs.identifier = value,
                "payload" => attrs.payload = value,
                "children" => attrs.children = value,
                "parent" => attrs.parent = value,
                _ => return Err(TreeError::UnknownAttribute(key)),
            }
        }
        Ok(attrs)
    }
}
