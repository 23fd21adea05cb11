//! Built-in endpoint definitions embedded in the binary
//!
//! Lets users pass `--endpoint a-share-spot` instead of a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in endpoint YAML definitions
pub static BUILTIN_ENDPOINTS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        m.insert("a-share-spot", include_str!("../endpoints/a-share-spot.yaml"));
        m.insert("spot", include_str!("../endpoints/a-share-spot.yaml"));

        m.insert("a-share-hist", include_str!("../endpoints/a-share-hist.yaml"));
        m.insert("hist", include_str!("../endpoints/a-share-hist.yaml"));

        m
    });

/// Get a built-in endpoint by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_ENDPOINTS.get(name).copied()
}

/// Check if a name is a built-in endpoint
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_ENDPOINTS.contains_key(name)
}

/// List built-in endpoint names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["a-share-spot", "a-share-hist"]
}

/// Endpoint metadata for display
#[derive(Debug, Clone)]
pub struct EndpointInfo {
    /// Primary name
    pub name: &'static str,
    /// `snapshot` or `history`
    pub kind: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Alternative names
    pub aliases: &'static [&'static str],
}

/// Get display info about all built-in endpoints
pub fn list_builtin_info() -> Vec<EndpointInfo> {
    vec![
        EndpointInfo {
            name: "a-share-spot",
            kind: "snapshot",
            description: "All Shanghai, Shenzhen and Beijing A-shares ranked by percent change",
            aliases: &["spot"],
        },
        EndpointInfo {
            name: "a-share-hist",
            kind: "history",
            description: "Daily, weekly or monthly klines for one A-share symbol",
            aliases: &["hist"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_definition_from_str, Definition};

    #[test]
    fn test_builtin_lookup() {
        assert!(is_builtin("a-share-spot"));
        assert!(is_builtin("hist"));
        assert!(!is_builtin("stripe"));
        assert_eq!(get_builtin("spot"), get_builtin("a-share-spot"));
    }

    #[test]
    fn test_info_matches_names() {
        let names: Vec<_> = list_builtin_info().iter().map(|i| i.name).collect();
        assert_eq!(names, list_builtin());
        for info in list_builtin_info() {
            for alias in info.aliases {
                assert!(is_builtin(alias), "alias {alias} not registered");
            }
        }
    }

    #[test]
    fn test_all_builtins_parse() {
        for info in list_builtin_info() {
            let yaml = get_builtin(info.name).unwrap();
            let def = load_definition_from_str(yaml)
                .unwrap_or_else(|e| panic!("{} failed to load: {e}", info.name));
            assert_eq!(def.name(), info.name);
            assert_eq!(def.kind(), info.kind);
        }
    }

    #[test]
    fn test_spot_ranks_by_percent_change() {
        let def = load_definition_from_str(get_builtin("a-share-spot").unwrap()).unwrap();
        let Definition::Snapshot(spot) = def else {
            panic!("expected snapshot");
        };
        assert_eq!(spot.ranking.sort_key, "f3");
        assert_eq!(spot.request.page_param, "pn");
        assert_eq!(spot.fetch.concurrency, 4);
        assert_eq!(spot.columns[0].name, "index");
    }
}
