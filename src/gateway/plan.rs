use serde::Serialize;

use crate::gateway::bindings::{BindingGenerator, MethodBinding, PermissionGrant};
use crate::gateway::endpoints::EndpointTable;
use crate::gateway::operation::{Operation, OperationId, OperationKind, ParentRef};
use crate::gateway::path_tree::{GraphError, PathTreeBuilder, RouteNode};

/// The full closure of routes, bindings and grants produced by one build.
/// This is the unit of atomic activation: the publish step depends on
/// every operation listed here having completed.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayPlan {
    pub api_name: String,
    pub stage_name: String,
    pub routes: Vec<RouteNode>,
    pub bindings: Vec<MethodBinding>,
    pub grants: Vec<PermissionGrant>,
}

impl GatewayPlan {
    /// Run the path-tree builder and binding generator over `table`.
    pub fn build(
        api_name: &str,
        stage_name: &str,
        table: &EndpointTable,
    ) -> Result<Self, GraphError> {
        tracing::info!(
            "building gateway plan for {} ({} declared paths)",
            api_name,
            table.len()
        );

        let routes = PathTreeBuilder::new(api_name).build(table)?;
        let (bindings, grants) = BindingGenerator::new(api_name).generate(table, &routes);

        Ok(Self {
            api_name: api_name.to_string(),
            stage_name: stage_name.to_string(),
            routes,
            bindings,
            grants,
        })
    }

    pub fn api_op_id(&self) -> OperationId {
        OperationId::new(format!("{}-api", self.api_name))
    }

    /// The routing-system creation itself; every other operation depends
    /// on it.
    pub fn api_operation(&self) -> Operation {
        Operation {
            id: self.api_op_id(),
            kind: OperationKind::RestApi {
                display_name: self.api_name.clone(),
            },
            depends_on: Vec::new(),
        }
    }

    /// Ordered creation operations for routes, bindings and grants. Every
    /// operation's dependencies are either the routing system itself or an
    /// operation appearing earlier in the list.
    pub fn operations(&self) -> Vec<Operation> {
        let api = self.api_op_id();
        let mut operations =
            Vec::with_capacity(self.routes.len() + self.bindings.len() + self.grants.len());

        for route in &self.routes {
            let mut depends_on = vec![api.clone()];
            if let ParentRef::Route(parent) = &route.parent {
                depends_on.push(parent.clone());
            }
            operations.push(Operation {
                id: route.op_id.clone(),
                kind: OperationKind::Route {
                    path_segment: route.path_segment.clone(),
                    full_path: route.full_path.clone(),
                    parent: route.parent.clone(),
                },
                depends_on,
            });
        }

        for binding in &self.bindings {
            operations.push(Operation {
                id: binding.op_id.clone(),
                kind: OperationKind::MethodBinding {
                    route: binding.route.clone(),
                    verb: binding.verb.clone(),
                    backend_address: binding.backend_address.clone(),
                },
                depends_on: vec![api.clone(), binding.route.clone()],
            });
        }

        for grant in &self.grants {
            operations.push(Operation {
                id: grant.op_id.clone(),
                kind: OperationKind::PermissionGrant {
                    backend_address: grant.backend_address.clone(),
                    source_pattern: grant.source_pattern.clone(),
                },
                depends_on: vec![api.clone()],
            });
        }

        operations
    }

    pub fn route_ids(&self) -> Vec<OperationId> {
        self.routes.iter().map(|r| r.op_id.clone()).collect()
    }

    pub fn binding_ids(&self) -> Vec<OperationId> {
        self.bindings.iter().map(|b| b.op_id.clone()).collect()
    }

    pub fn grant_ids(&self) -> Vec<OperationId> {
        self.grants.iter().map(|g| g.op_id.clone()).collect()
    }
}
