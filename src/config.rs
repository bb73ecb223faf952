//! Runtime configuration.

/// Default maximum evaluation depth.
pub const DEFAULT_MAX_GRAPH_DEPTH: usize = 32;

/// Hard upper bound on `max_graph_depth`.
///
/// Evaluation recurses once per level, so larger configured values are
/// clamped to this ceiling.
pub const MAX_GRAPH_DEPTH_CEILING: usize = 256;

/// Default maximum node visits per evaluation call.
pub const DEFAULT_MAX_NODE_VISITS: usize = 4_096;

/// Default throttle window between oracle state updates (seconds).
pub const DEFAULT_MIN_STATE_UPDATE_INTERVAL: u64 = 3_600;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleConfig {
    /// Maximum number of levels evaluated below the requested node.
    ///
    /// Evaluation fails with `GraphTooDeep` instead of growing the call stack
    /// past this bound. Never exceeds [`MAX_GRAPH_DEPTH_CEILING`].
    pub max_graph_depth: usize,

    /// Maximum number of node evaluations performed by a single `process`
    /// call, counting every revisit of a shared ancestor.
    ///
    /// Evaluation never caches, so a diamond-shaped graph recomputes shared
    /// ancestors once per path. This bounds that work.
    pub max_node_visits: usize,

    /// Minimum seconds between successful stateful oracle updates.
    pub min_state_update_interval: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            max_graph_depth: DEFAULT_MAX_GRAPH_DEPTH,
            max_node_visits: DEFAULT_MAX_NODE_VISITS,
            min_state_update_interval: DEFAULT_MIN_STATE_UPDATE_INTERVAL,
        }
    }
}

impl OracleConfig {
    /// Read overrides from the environment, keeping defaults for variables
    /// that are absent or do not parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_graph_depth: env_or("RATE_DAG_MAX_GRAPH_DEPTH", defaults.max_graph_depth)
                .min(MAX_GRAPH_DEPTH_CEILING),
            max_node_visits: env_or("RATE_DAG_MAX_NODE_VISITS", defaults.max_node_visits),
            min_state_update_interval: env_or(
                "RATE_DAG_MIN_UPDATE_INTERVAL_SECS",
                defaults.min_state_update_interval,
            ),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "ignoring unparsable config value");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.max_graph_depth, 32);
        assert_eq!(config.max_node_visits, 4_096);
        assert_eq!(config.min_state_update_interval, 3_600);
    }

    #[test]
    fn test_from_env_clamps_depth() {
        std::env::set_var("RATE_DAG_MAX_GRAPH_DEPTH", usize::MAX.to_string());
        let config = OracleConfig::from_env();
        std::env::remove_var("RATE_DAG_MAX_GRAPH_DEPTH");

        assert_eq!(config.max_graph_depth, MAX_GRAPH_DEPTH_CEILING);
    }

    #[test]
    fn test_env_or_falls_back() {
        assert_eq!(env_or("RATE_DAG_TEST_UNSET_VARIABLE", 7usize), 7);

        std::env::set_var("RATE_DAG_TEST_GARBAGE_VARIABLE", "not-a-number");
        assert_eq!(env_or("RATE_DAG_TEST_GARBAGE_VARIABLE", 9u64), 9);

        std::env::set_var("RATE_DAG_TEST_VALID_VARIABLE", " 12 ");
        assert_eq!(env_or("RATE_DAG_TEST_VALID_VARIABLE", 9u64), 12);
    }
}
