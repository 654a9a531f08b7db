//! O(1) node classification, built once when the graph is loaded.
//!
//! The cache is a snapshot: mutating the graph afterwards leaves it stale,
//! and nothing detects that.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::{GraphNodeScan, NodeId, NodeKind};

/// Node membership per [`NodeKind`].
///
/// # Examples
///
/// ```
/// use planner_core::graph::{GraphNodeScan, NodeId, NodeKind, NodeKindCache};
///
/// struct Scan;
/// impl GraphNodeScan for Scan {
///     fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
///         match kind {
///             NodeKind::Station => vec![NodeId(1), NodeId(2)],
///             NodeKind::Hour => vec![NodeId(10)],
///             _ => vec![],
///         }
///     }
/// }
///
/// let kinds = NodeKindCache::build(&Scan);
/// assert!(kinds.is_station(NodeId(1)));
/// assert!(kinds.is_hour(NodeId(10)));
/// assert!(!kinds.is_minute(NodeId(10)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeKindCache {
    members: HashMap<NodeKind, HashSet<NodeId>>,
}

impl NodeKindCache {
    /// Scan every kind once.
    pub fn build<S: GraphNodeScan + ?Sized>(scan: &S) -> Self {
        let mut members = HashMap::with_capacity(NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            let nodes: HashSet<NodeId> = scan.nodes_of_kind(kind).into_iter().collect();
            debug!(%kind, nodes = nodes.len(), "Scanned nodes");
            members.insert(kind, nodes);
        }

        let cache = Self { members };
        info!(
            stations = cache.count_of(NodeKind::Station),
            route_stations = cache.count_of(NodeKind::RouteStation),
            platforms = cache.count_of(NodeKind::Platform),
            services = cache.count_of(NodeKind::Service),
            hours = cache.count_of(NodeKind::Hour),
            minutes = cache.count_of(NodeKind::Minute),
            "Built node kind cache"
        );
        cache
    }

    pub fn is(&self, node: NodeId, kind: NodeKind) -> bool {
        self.members.get(&kind).is_some_and(|s| s.contains(&node))
    }

    pub fn is_station(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Station)
    }

    pub fn is_route_station(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::RouteStation)
    }

    pub fn is_platform(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Platform)
    }

    pub fn is_service(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Service)
    }

    pub fn is_hour(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Hour)
    }

    pub fn is_minute(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Minute)
    }

    pub fn is_grouped(&self, node: NodeId) -> bool {
        self.is(node, NodeKind::Grouped)
    }

    /// The first kind, in [`NodeKind::ALL`] order, the node belongs to.
    pub fn kind_of(&self, node: NodeId) -> Option<NodeKind> {
        NodeKind::ALL.into_iter().find(|&kind| self.is(node, kind))
    }

    pub fn count_of(&self, kind: NodeKind) -> usize {
        self.members.get(&kind).map_or(0, HashSet::len)
    }

    /// Total memberships across all kinds.
    pub fn len(&self) -> usize {
        self.members.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
