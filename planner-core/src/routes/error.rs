//! Route index error types.

use crate::domain::RouteId;

/// Lookups that signal an import inconsistency: every route queried should
/// have been part of the build that produced the index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteIndexError {
    /// The route was not part of the indexed route set
    #[error("no index for route {0}")]
    RouteNotFound(RouteId),

    /// The dense index is past the end of the indexed route set
    #[error("route index {index} out of range (size {len})")]
    IndexOutOfRange { index: u32, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RouteIndexError::RouteNotFound(RouteId::flat("METLBLUE:I:"));
        assert_eq!(err.to_string(), "no index for route METLBLUE:I:");

        let err = RouteIndexError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "route index 7 out of range (size 3)");
    }
}
