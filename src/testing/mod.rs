use crate::gateway::{EndpointSpec, EndpointTable};

/// Shorthand endpoint spec for unit tests.
pub fn spec(backend_address: &str, methods: &[&str]) -> EndpointSpec {
    EndpointSpec {
        backend_address: backend_address.to_string(),
        methods: methods.iter().map(|m| m.to_string()).collect(),
    }
}

/// The `/users` + `/users/active` table used across the builder tests:
/// two routes, three verbs, one shared backend.
pub fn users_table(backend_address: &str) -> EndpointTable {
    let mut table = EndpointTable::new();
    table.declare_handler("/users", spec(backend_address, &["GET"]));
    table.declare_handler("/users/active", spec(backend_address, &["GET", "POST"]));
    table
}
