//! Snapshot Gate - Decides whether a build should be relayed at all
//!
//! A version string containing the literal substring "SNAPSHOT" marks an
//! unreleased, in-progress artifact. When snapshot skipping is enabled such
//! builds are not relayed to the catalog.
//!
//! # Example
//!
//! ```
//! use vsm_sync::validation::snapshot_gate::SnapshotGate;
//!
//! let gate = SnapshotGate::new();
//! assert!(!gate.should_publish("1.0.0-SNAPSHOT", true));
//! assert!(gate.should_publish("1.0.0", true));
//! ```

/// Gate for the publish decision
pub struct SnapshotGate;

impl Default for SnapshotGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotGate {
    /// Create a new SnapshotGate
    pub fn new() -> Self {
        Self
    }

    /// Check whether a version string marks a snapshot build
    ///
    /// Case-sensitive literal match, so "1.0-snapshot" is not a snapshot.
    pub fn is_snapshot(&self, version: &str) -> bool {
        version.contains("SNAPSHOT")
    }

    /// Decide whether the publish step should proceed
    ///
    /// The only skipped combination is a snapshot version with snapshot
    /// skipping enabled; every other combination publishes. Callers are
    /// responsible for logging the decision.
    pub fn should_publish(&self, version: &str, skip_snapshot: bool) -> bool {
        !(self.is_snapshot(version) && skip_snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_with_skip_is_not_published() {
        let gate = SnapshotGate::new();
        assert!(!gate.should_publish("1.0.0-SNAPSHOT", true));
        assert!(!gate.should_publish("SNAPSHOT", true));
        assert!(!gate.should_publish("2.1-SNAPSHOT-rc1", true));
    }

    #[test]
    fn test_snapshot_without_skip_is_published() {
        let gate = SnapshotGate::new();
        assert!(gate.should_publish("1.0.0-SNAPSHOT", false));
    }

    #[test]
    fn test_release_is_published_regardless_of_skip() {
        let gate = SnapshotGate::new();
        assert!(gate.should_publish("1.0.0", true));
        assert!(gate.should_publish("1.0.0", false));
    }

    #[test]
    fn test_snapshot_match_is_case_sensitive() {
        let gate = SnapshotGate::new();
        assert!(!gate.is_snapshot("1.0.0-snapshot"));
        assert!(gate.should_publish("1.0.0-snapshot", true));
    }

    #[test]
    fn test_snapshot_substring_matches_anywhere() {
        let gate = SnapshotGate::new();
        assert!(gate.is_snapshot("SNAPSHOT-1.0"));
        assert!(gate.is_snapshot("1.SNAPSHOT.0"));
    }
}
