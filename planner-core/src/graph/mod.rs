//! Graph-store node identities and the eager node-kind classification.

mod node_kinds;

use std::fmt;

pub use node_kinds::NodeKindCache;

/// Identifier of a node in the underlying graph store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The classes of graph node the traversal distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Station,
    RouteStation,
    Platform,
    Service,
    Hour,
    Minute,
    /// Grouped stations sharing a locality
    Grouped,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Station,
        NodeKind::RouteStation,
        NodeKind::Platform,
        NodeKind::Service,
        NodeKind::Hour,
        NodeKind::Minute,
        NodeKind::Grouped,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            NodeKind::Station => "station",
            NodeKind::RouteStation => "route station",
            NodeKind::Platform => "platform",
            NodeKind::Service => "service",
            NodeKind::Hour => "hour",
            NodeKind::Minute => "minute",
            NodeKind::Grouped => "grouped",
        };
        f.write_str(name)
    }
}

/// A one-off scan of the graph store, by node kind.
pub trait GraphNodeScan {
    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId>;
}
