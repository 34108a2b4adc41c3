use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One routable path's backend wiring and accepted verbs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    pub backend_address: String,
    pub methods: Vec<String>,
}

/// Flat declaration of every path the gateway should route.
///
/// A `None` entry declares an intermediate path segment that carries no
/// handler of its own but must exist so its children can attach to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointTable {
    entries: BTreeMap<String, Option<EndpointSpec>>,
}

/// On-disk declaration format: path mapped to its accepted verbs, or null
/// for a bare intermediate segment. The backend address is not part of the
/// file; every handler is wired to the discovered backend.
type EndpointDeclaration = BTreeMap<String, Option<Vec<String>>>;

#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("failed to read endpoint declaration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON endpoint declaration {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid YAML endpoint declaration {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl EndpointTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a path with a handler.
    pub fn declare_handler(&mut self, path: impl Into<String>, spec: EndpointSpec) -> &mut Self {
        self.entries.insert(path.into(), Some(spec));
        self
    }

    /// Declare an intermediate path segment with no handler.
    pub fn declare_segment(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.insert(path.into(), None);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, Option<&EndpointSpec>)> {
        self.entries.iter().map(|(path, spec)| (path, spec.as_ref()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in town endpoint set: `/users`, `/cities` and `/jobs`,
    /// GET only, all wired to the same backend handler.
    pub fn town_defaults(backend_address: &str) -> Self {
        let mut table = Self::new();
        for path in ["/users", "/cities", "/jobs"] {
            table.declare_handler(
                path,
                EndpointSpec {
                    backend_address: backend_address.to_string(),
                    methods: vec!["GET".to_string()],
                },
            );
        }
        table
    }

    /// Load a declaration file (JSON or YAML, by extension) and wire every
    /// declared handler to `backend_address`.
    pub fn load(path: &Path, backend_address: &str) -> Result<Self, DeclarationError> {
        let content = std::fs::read_to_string(path).map_err(|source| DeclarationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let declaration: EndpointDeclaration = if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| DeclarationError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            serde_json::from_str(&content).map_err(|source| DeclarationError::Json {
                path: path.to_path_buf(),
                source,
            })?
        };

        Ok(Self::from_declaration(&declaration, backend_address))
    }

    fn from_declaration(declaration: &EndpointDeclaration, backend_address: &str) -> Self {
        let mut table = Self::new();
        for (path, methods) in declaration {
            match methods {
                Some(methods) => table.declare_handler(
                    path.clone(),
                    EndpointSpec {
                        backend_address: backend_address.to_string(),
                        methods: methods.clone(),
                    },
                ),
                None => table.declare_segment(path.clone()),
            };
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn town_defaults_declare_three_get_endpoints() {
        let table = EndpointTable::town_defaults("backend-1");

        assert_eq!(table.len(), 3);
        for (_, spec) in table.iter() {
            let spec = spec.expect("built-in endpoints all carry handlers");
            assert_eq!(spec.backend_address, "backend-1");
            assert_eq!(spec.methods, vec!["GET".to_string()]);
        }
    }

    #[test]
    fn declaration_json_round_trip() {
        let declaration: EndpointDeclaration = serde_json::from_str(
            r#"{ "/users": ["GET", "POST"], "/static": null }"#,
        )
        .expect("parse");

        let table = EndpointTable::from_declaration(&declaration, "backend-1");
        assert_eq!(table.len(), 2);

        let users = table
            .iter()
            .find(|(path, _)| path.as_str() == "/users")
            .and_then(|(_, spec)| spec)
            .expect("users handler");
        assert_eq!(users.methods, vec!["GET".to_string(), "POST".to_string()]);

        let bare = table
            .iter()
            .find(|(path, _)| path.as_str() == "/static")
            .map(|(_, spec)| spec);
        assert_eq!(bare, Some(None), "bare segment keeps no handler");
    }
}
