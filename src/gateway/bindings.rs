use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::gateway::endpoints::{EndpointSpec, EndpointTable};
use crate::gateway::operation::{path_label, OperationId};
use crate::gateway::path_tree::{segments, RouteNode};

/// Grant scope covering every stage, verb and path routed through the
/// gateway; the platform substitutes its own execution identifier prefix.
pub const GRANT_SOURCE_PATTERN: &str = "*/*/*";

/// Acceptance of one HTTP verb on one route, proxying the full
/// request/response envelope to the backend. The routing layer is a pure
/// dispatcher; there is no per-method transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBinding {
    pub op_id: OperationId,
    pub route: OperationId,
    pub verb: String,
    pub backend_address: String,
}

/// Authorization for the routing system to invoke one backend handler.
/// At most one grant per distinct backend address per build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionGrant {
    pub op_id: OperationId,
    pub backend_address: String,
    pub source_pattern: String,
}

/// Emits method bindings for every route that carries a handler, plus the
/// deduplicated permission grants those bindings require.
pub struct BindingGenerator<'a> {
    api_name: &'a str,
}

impl<'a> BindingGenerator<'a> {
    pub fn new(api_name: &'a str) -> Self {
        Self { api_name }
    }

    /// Verb strings are uppercased before binding and deduplicated per
    /// route after normalization. They are otherwise passed through
    /// unvalidated; callers wanting strict verb checking must do it
    /// upstream.
    pub fn generate(
        &self,
        table: &EndpointTable,
        routes: &[RouteNode],
    ) -> (Vec<MethodBinding>, Vec<PermissionGrant>) {
        let mut specs: HashMap<String, &EndpointSpec> = HashMap::new();
        for (path, spec) in table.iter() {
            if let Some(spec) = spec {
                specs.insert(segments(path).join("/"), spec);
            }
        }

        let mut bindings = Vec::new();
        let mut grants = Vec::new();
        let mut granted: HashSet<&str> = HashSet::new();

        for route in routes {
            let Some(spec) = specs.get(route.full_path.as_str()) else {
                continue;
            };

            let label = path_label(&route.full_path);
            let mut bound: HashSet<String> = HashSet::new();

            for declared_verb in &spec.methods {
                let verb = declared_verb.to_uppercase();
                if !bound.insert(verb.clone()) {
                    continue;
                }

                bindings.push(MethodBinding {
                    op_id: OperationId::new(format!(
                        "{}-{}-{}-method",
                        self.api_name, label, verb
                    )),
                    route: route.op_id.clone(),
                    verb,
                    backend_address: spec.backend_address.clone(),
                });

                // Only the first binding referencing a backend emits a
                // grant; the platform rejects duplicates.
                if granted.insert(spec.backend_address.as_str()) {
                    grants.push(PermissionGrant {
                        op_id: OperationId::new(format!(
                            "{}-{}-permission",
                            self.api_name, label
                        )),
                        backend_address: spec.backend_address.clone(),
                        source_pattern: GRANT_SOURCE_PATTERN.to_string(),
                    });
                }
            }
        }

        (bindings, grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::endpoints::EndpointTable;
    use crate::gateway::path_tree::PathTreeBuilder;
    use crate::testing;

    fn generate(table: &EndpointTable) -> (Vec<MethodBinding>, Vec<PermissionGrant>) {
        let routes = PathTreeBuilder::new("town-api").build(table).expect("build");
        BindingGenerator::new("town-api").generate(table, &routes)
    }

    #[test]
    fn shared_backend_gets_exactly_one_grant() {
        let (bindings, grants) = generate(&testing::users_table("backend-1"));

        assert_eq!(bindings.len(), 3, "GET /users + GET/POST /users/active");
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].backend_address, "backend-1");
        assert_eq!(grants[0].source_pattern, GRANT_SOURCE_PATTERN);
    }

    #[test]
    fn distinct_backends_each_get_a_grant() {
        let mut table = EndpointTable::new();
        table.declare_handler("/users", testing::spec("backend-1", &["GET"]));
        table.declare_handler("/jobs", testing::spec("backend-2", &["GET"]));

        let (_, grants) = generate(&table);
        assert_eq!(grants.len(), 2);
    }

    #[test]
    fn verbs_are_uppercased_and_deduplicated() {
        let mut table = EndpointTable::new();
        table.declare_handler("/users", testing::spec("backend-1", &["get", "GET", "Post"]));

        let (bindings, _) = generate(&table);
        let verbs: Vec<&str> = bindings.iter().map(|b| b.verb.as_str()).collect();
        assert_eq!(verbs, vec!["GET", "POST"]);
        assert_eq!(bindings[0].op_id.as_str(), "town-api-users-GET-method");
    }

    #[test]
    fn unknown_verb_strings_pass_through() {
        let mut table = EndpointTable::new();
        table.declare_handler("/users", testing::spec("backend-1", &["purge"]));

        let (bindings, _) = generate(&table);
        assert_eq!(bindings[0].verb, "PURGE");
    }

    #[test]
    fn handlerless_segments_emit_nothing() {
        let mut table = EndpointTable::new();
        table.declare_segment("/static");

        let (bindings, grants) = generate(&table);
        assert!(bindings.is_empty());
        assert!(grants.is_empty());
    }
}
