use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical name of one provisioning operation, unique within a build.
///
/// Names follow the provisioner's scheme so that re-running a build against
/// the same backend reconciles against the same logical resources:
/// `{api}-{path-with-dashes}-resource`, `{api}-{path}-{VERB}-method`,
/// `{api}-{path}-permission`, `{api}-deployment`, `{api}-stage`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parent of a route: the gateway root, or a route created earlier in the
/// same build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRef {
    Root,
    Route(OperationId),
}

/// One declarative resource-creation request. The provisioning backend is
/// free to execute independent operations concurrently as long as the
/// `depends_on` edges are respected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    #[serde(flatten)]
    pub kind: OperationKind,
    pub depends_on: Vec<OperationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationKind {
    RestApi {
        display_name: String,
    },
    Route {
        path_segment: String,
        full_path: String,
        parent: ParentRef,
    },
    MethodBinding {
        route: OperationId,
        verb: String,
        backend_address: String,
    },
    PermissionGrant {
        backend_address: String,
        source_pattern: String,
    },
    Deployment {
        activation_token: String,
    },
    Stage {
        stage_name: String,
        deployment: OperationId,
    },
}

impl OperationKind {
    /// Short tag for logs and plan listings.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::RestApi { .. } => "rest_api",
            OperationKind::Route { .. } => "route",
            OperationKind::MethodBinding { .. } => "method_binding",
            OperationKind::PermissionGrant { .. } => "permission_grant",
            OperationKind::Deployment { .. } => "deployment",
            OperationKind::Stage { .. } => "stage",
        }
    }
}

/// Flatten a normalized route path into the dash-joined form used in
/// logical names: `users/active` becomes `users-active`.
pub(crate) fn path_label(full_path: &str) -> String {
    full_path.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_label_flattens_nested_paths() {
        assert_eq!(path_label("users"), "users");
        assert_eq!(path_label("users/active"), "users-active");
    }

    #[test]
    fn operation_serializes_with_flattened_kind() {
        let op = Operation {
            id: OperationId::new("town-api-users-resource"),
            kind: OperationKind::Route {
                path_segment: "users".to_string(),
                full_path: "users".to_string(),
                parent: ParentRef::Root,
            },
            depends_on: vec![OperationId::new("town-api-api")],
        };

        let value = serde_json::to_value(&op).expect("serialize");
        assert_eq!(value["id"], "town-api-users-resource");
        assert_eq!(value["type"], "route");
        assert_eq!(value["depends_on"][0], "town-api-api");
    }
}
