use generational_arena::Index;
use thiserror::Error;

use crate::value::ValueKind;

/// Type/shape validation failures raised by node constructors and setters.
///
/// These are programmer/input errors and surface immediately at the point of
/// call; nothing is retried. A failing call never commits the field it was
/// about to write.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("identifier must be an integer, got {0}")]
    IdentifierType(ValueKind),

    #[error("payload must not be a tree node")]
    PayloadIsNode,

    #[error("children could not be parsed: expected a list of nodes or attribute maps, got {0}")]
    ChildrenShape(ValueKind),

    #[error("child must be a node, got {0}")]
    ChildType(ValueKind),

    #[error("parent must be a node or an attribute map, got {0}")]
    ParentType(ValueKind),

    #[error("unknown node attribute: {0}")]
    UnknownAttribute(String),

    #[error("stale node index: {0:?}")]
    StaleNode(Index),
}

pub type TreeResult<T> = Result<T, TreeError>;
