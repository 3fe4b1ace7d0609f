//! Node arena, node data and shape constructors.

/// Arena of nodes, composition and the stage.
pub mod graph;
/// Node, shape and style types.
pub mod node;
/// Validated constructors for every node kind.
pub mod shapes;
