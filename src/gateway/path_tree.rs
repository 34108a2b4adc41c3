use serde::Serialize;
use std::collections::HashMap;

use crate::gateway::endpoints::EndpointTable;
use crate::gateway::operation::{path_label, OperationId, ParentRef};

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("invalid route path {path:?}: normalizes to zero segments")]
    InvalidPath { path: String },
    #[error("duplicate route path {path:?}: already declared as {normalized:?}")]
    DuplicatePath { path: String, normalized: String },
}

/// One routing resource in the built tree. Created once per build, never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteNode {
    pub op_id: OperationId,
    pub path_segment: String,
    pub full_path: String,
    pub parent: ParentRef,
}

/// Turns the flat endpoint declaration into an ordered list of route
/// nodes, each node's parent resolved before the node itself.
pub struct PathTreeBuilder<'a> {
    api_name: &'a str,
}

/// Split a declared path into its non-empty segments. `/users`, `users/`
/// and `//users` all yield `["users"]`.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl<'a> PathTreeBuilder<'a> {
    pub fn new(api_name: &'a str) -> Self {
        Self { api_name }
    }

    /// Build one route node per declared path, parents before children.
    ///
    /// Paths are stable-sorted by segment depth (then lexicographically) so
    /// parent resolution never depends on declaration order. An ancestor
    /// that is genuinely absent from the table still resolves to the tree
    /// root rather than failing; callers that want a full chain must
    /// declare every intermediate path.
    pub fn build(&self, table: &EndpointTable) -> Result<Vec<RouteNode>, GraphError> {
        let mut declared: Vec<(&String, Vec<&str>)> = table
            .paths()
            .map(|path| (path, segments(path)))
            .collect();
        declared.sort_by(|(path_a, segs_a), (path_b, segs_b)| {
            (segs_a.len(), segs_a)
                .cmp(&(segs_b.len(), segs_b))
                .then_with(|| path_a.cmp(path_b))
        });

        let mut by_path: HashMap<String, OperationId> = HashMap::new();
        let mut nodes = Vec::with_capacity(declared.len());

        for (path, segs) in declared {
            let Some((leaf, prefix)) = segs.split_last() else {
                return Err(GraphError::InvalidPath { path: path.clone() });
            };

            let normalized = segs.join("/");
            if by_path.contains_key(&normalized) {
                return Err(GraphError::DuplicatePath {
                    path: path.clone(),
                    normalized,
                });
            }

            let parent_path = prefix.join("/");
            let parent = if parent_path.is_empty() {
                ParentRef::Root
            } else {
                match by_path.get(&parent_path) {
                    Some(parent_id) => ParentRef::Route(parent_id.clone()),
                    None => {
                        tracing::debug!(
                            "route {} has no declared ancestor {:?}, attaching to root",
                            normalized,
                            parent_path
                        );
                        ParentRef::Root
                    }
                }
            };

            let op_id = OperationId::new(format!(
                "{}-{}-resource",
                self.api_name,
                path_label(&normalized)
            ));
            by_path.insert(normalized.clone(), op_id.clone());
            nodes.push(RouteNode {
                op_id,
                path_segment: leaf.to_string(),
                full_path: normalized,
                parent,
            });
        }

        Ok(nodes)
    }
}
