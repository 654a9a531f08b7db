//! Acceleration structures for multi-modal journey planning.
//!
//! Route identities synthesised from calling-point patterns, a dense route
//! index, precomputed route-to-route interchange costs, a node-kind cache
//! for the graph store, and a concurrent memo of node-visit outcomes for the
//! live search.

pub mod config;
pub mod domain;
pub mod graph;
pub mod interchange;
pub mod logging;
pub mod persist;
pub mod repository;
pub mod routes;
pub mod search;
pub mod startup;
