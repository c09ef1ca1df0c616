//! HTTP route handlers.

pub mod docs;
pub mod editor;
pub mod eximport;
pub mod live;
pub mod login;
pub mod quiz;
pub mod search;
pub mod sitemap;
pub mod stats;
pub mod storage;
pub mod testing;
pub mod users;
pub mod utils;

use axum::Router;

use crate::app::AppState;

/// Path the real-time transport is mounted at.
pub const SOCKET_PATH: &str = "/";

/// A mounted route group: URL prefix, documentation tags, schema visibility,
/// and the factory building its router.
pub struct RouteGroup {
    pub prefix: &'static str,
    pub tags: &'static [&'static str],
    pub in_schema: bool,
    pub router: fn() -> Router<AppState>,
}

/// The static registration table. Every prefix lives under `/api/v1`, which
/// guarantees no collision with the root-mounted socket transport.
pub fn route_table() -> Vec<RouteGroup> {
    vec![
        RouteGroup {
            prefix: "/api/v1/login",
            tags: &["auth"],
            in_schema: true,
            router: login::router,
        },
        RouteGroup {
            prefix: "/api/v1/users",
            tags: &["users"],
            in_schema: true,
            router: users::router,
        },
        RouteGroup {
            prefix: "/api/v1/quiz",
            tags: &["quiz"],
            in_schema: true,
            router: quiz::router,
        },
        RouteGroup {
            prefix: "/api/v1/utils",
            tags: &["utils"],
            in_schema: true,
            router: utils::router,
        },
        RouteGroup {
            prefix: "/api/v1/stats",
            tags: &["stats"],
            in_schema: true,
            router: stats::router,
        },
        RouteGroup {
            prefix: "/api/v1/storage",
            tags: &["storage"],
            in_schema: true,
            router: storage::router,
        },
        RouteGroup {
            prefix: "/api/v1/search",
            tags: &["search"],
            in_schema: true,
            router: search::router,
        },
        RouteGroup {
            prefix: "/api/v1/live",
            tags: &["live"],
            in_schema: true,
            router: live::router,
        },
        RouteGroup {
            prefix: "/api/v1/internal/testing",
            tags: &["internal", "testing"],
            in_schema: false,
            router: testing::router,
        },
        RouteGroup {
            prefix: "/api/v1/editor",
            tags: &["editor"],
            in_schema: true,
            router: editor::router,
        },
        RouteGroup {
            prefix: "/api/v1/eximport",
            tags: &["export", "import"],
            in_schema: true,
            router: eximport::router,
        },
        RouteGroup {
            prefix: "/api/v1/sitemap",
            tags: &["sitemap"],
            in_schema: true,
            router: sitemap::router,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefixes_are_unique() {
        let table = route_table();
        let unique: HashSet<&str> = table.iter().map(|g| g.prefix).collect();
        assert_eq!(unique.len(), table.len());
    }

    #[test]
    fn test_all_prefixes_namespaced_under_api_v1() {
        for group in route_table() {
            assert!(
                group.prefix.starts_with("/api/v1/"),
                "prefix {} escapes the API namespace",
                group.prefix
            );
        }
    }

    #[test]
    fn test_no_prefix_collides_with_socket_path() {
        for group in route_table() {
            assert_ne!(group.prefix, SOCKET_PATH);
        }
    }

    #[test]
    fn test_internal_testing_hidden_from_schema() {
        let table = route_table();
        let testing = table
            .iter()
            .find(|g| g.prefix == "/api/v1/internal/testing")
            .unwrap();
        assert!(!testing.in_schema);

        let visible = table.iter().filter(|g| g.in_schema).count();
        assert_eq!(visible, table.len() - 1);
    }

    #[test]
    fn test_every_group_has_tags() {
        for group in route_table() {
            assert!(!group.tags.is_empty(), "{} has no tags", group.prefix);
        }
    }
}
