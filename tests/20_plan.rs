mod common;

use anyhow::Result;
use town_gateway_rust::gateway::{
    EndpointTable, GatewayPlan, GraphError, OperationKind, ParentRef,
};

// These tests exercise the whole builder surface through GatewayPlan:
// path tree, bindings, grants, and the dependency-annotated operation list.

#[test]
fn users_scenario_produces_expected_graph() -> Result<()> {
    let table = common::users_table("arn:backend:town-fn");
    let plan = GatewayPlan::build("town-api", "staging", &table)?;

    assert_eq!(plan.routes.len(), 2, "one route per declared path");
    assert_eq!(plan.bindings.len(), 3, "GET /users, GET+POST /users/active");
    assert_eq!(plan.grants.len(), 1, "shared backend gets a single grant");

    let users = &plan.routes[0];
    let active = &plan.routes[1];
    assert_eq!(users.full_path, "users");
    assert_eq!(users.parent, ParentRef::Root);
    assert_eq!(active.full_path, "users/active");
    assert_eq!(active.parent, ParentRef::Route(users.op_id.clone()));

    Ok(())
}

#[test]
fn operation_list_orders_dependencies_first() -> Result<()> {
    let mut table = common::users_table("arn:backend:town-fn");
    table.declare_handler(
        "/users/active/recent",
        town_gateway_rust::gateway::EndpointSpec {
            backend_address: "arn:backend:other-fn".to_string(),
            methods: vec!["GET".to_string()],
        },
    );

    let plan = GatewayPlan::build("town-api", "staging", &table)?;
    let operations = plan.operations();

    let mut created = vec![plan.api_op_id()];
    for operation in &operations {
        for dependency in &operation.depends_on {
            assert!(
                created.contains(dependency),
                "operation {} depends on {} before it exists",
                operation.id,
                dependency
            );
        }
        created.push(operation.id.clone());
    }

    // Two backends, two grants.
    let grants = operations
        .iter()
        .filter(|op| matches!(op.kind, OperationKind::PermissionGrant { .. }))
        .count();
    assert_eq!(grants, 2);

    Ok(())
}

#[test]
fn declaration_file_round_trips_through_plan() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("towngate-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    let declaration = dir.join("endpoints.json");
    std::fs::write(
        &declaration,
        r#"{ "/users": ["get"], "/users/active": ["GET", "post"] }"#,
    )?;

    let table = EndpointTable::load(&declaration, "arn:backend:town-fn")?;
    let plan = GatewayPlan::build("town-api", "staging", &table)?;

    assert_eq!(plan.routes.len(), 2);
    assert_eq!(plan.bindings.len(), 3);
    let verbs: Vec<&str> = plan.bindings.iter().map(|b| b.verb.as_str()).collect();
    assert_eq!(verbs, vec!["GET", "GET", "POST"], "verbs are uppercased");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn yaml_declaration_is_supported() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("towngate-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    let declaration = dir.join("endpoints.yaml");
    std::fs::write(&declaration, "/users:\n  - GET\n/static:\n")?;

    let table = EndpointTable::load(&declaration, "arn:backend:town-fn")?;
    let plan = GatewayPlan::build("town-api", "staging", &table)?;

    assert_eq!(plan.routes.len(), 2);
    assert_eq!(plan.bindings.len(), 1, "bare segments bind nothing");

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn slash_only_path_fails_the_build() {
    let mut table = EndpointTable::new();
    table.declare_handler(
        "///",
        town_gateway_rust::gateway::EndpointSpec {
            backend_address: "arn:backend:town-fn".to_string(),
            methods: vec!["GET".to_string()],
        },
    );

    let err = GatewayPlan::build("town-api", "staging", &table).unwrap_err();
    assert!(matches!(err, GraphError::InvalidPath { .. }));
}

#[test]
fn undeclared_ancestor_attaches_to_root() -> Result<()> {
    let mut table = EndpointTable::new();
    table.declare_handler(
        "/a/b",
        town_gateway_rust::gateway::EndpointSpec {
            backend_address: "arn:backend:town-fn".to_string(),
            methods: vec!["GET".to_string()],
        },
    );

    let plan = GatewayPlan::build("town-api", "staging", &table)?;
    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.routes[0].parent, ParentRef::Root);

    Ok(())
}
