pub mod backend;
pub mod bindings;
pub mod endpoints;
pub mod operation;
pub mod path_tree;
pub mod plan;
pub mod publish;

pub use backend::{BackendError, ProvisionBackend, RemoteBackend, ResourceId};
pub use bindings::{BindingGenerator, MethodBinding, PermissionGrant};
pub use endpoints::{EndpointSpec, EndpointTable};
pub use operation::{Operation, OperationId, OperationKind, ParentRef};
pub use path_tree::{GraphError, PathTreeBuilder, RouteNode};
pub use plan::GatewayPlan;
pub use publish::{ActivationToken, PublishError, PublishOrchestrator, PublishOutcome};
