//! API documentation
//!
//! - `GET /docs` redirects to the Swagger UI page
//! - `GET /docs/index.html` loads Swagger UI pointed at the document below
//! - `GET /docs/openapi.json` OpenAPI 3.1 description of every route

use std::sync::Arc;

use axum::{
    response::{Html, Redirect},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::http::server::AppState;

const OPENAPI_PATH: &str = "/docs/openapi.json";

/// Where an operation's input comes from, besides the path id
#[derive(Debug, Clone, Copy)]
enum Input {
    None,
    Body(&'static str),
    EstablishmentFilter,
}

/// Success payload shape
#[derive(Debug, Clone, Copy)]
enum Output {
    One(&'static str),
    Many(&'static str),
}

struct Operation {
    method: &'static str,
    path: &'static str,
    operation_id: &'static str,
    tag: &'static str,
    summary: &'static str,
    input: Input,
    status: u16,
    output: Output,
    errors: &'static [u16],
}

const OPERATIONS: &[Operation] = &[
    Operation {
        method: "get",
        path: "/health",
        operation_id: "health",
        tag: "health",
        summary: "Liveness and active storage backend",
        input: Input::None,
        status: 200,
        output: Output::One("HealthReport"),
        errors: &[],
    },
    Operation {
        method: "get",
        path: "/establishments",
        operation_id: "listEstablishments",
        tag: "establishments",
        summary: "List establishments with their store totals",
        input: Input::None,
        status: 200,
        output: Output::Many("EstablishmentSummary"),
        errors: &[499, 502],
    },
    Operation {
        method: "post",
        path: "/establishments",
        operation_id: "createEstablishment",
        tag: "establishments",
        summary: "Create an establishment",
        input: Input::Body("Profile"),
        status: 201,
        output: Output::One("Created"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "get",
        path: "/establishments/{id}",
        operation_id: "getEstablishment",
        tag: "establishments",
        summary: "Establishment with its stores",
        input: Input::None,
        status: 200,
        output: Output::One("EstablishmentDetail"),
        errors: &[400, 404, 499, 502],
    },
    Operation {
        method: "put",
        path: "/establishments/{id}",
        operation_id: "updateEstablishment",
        tag: "establishments",
        summary: "Replace an establishment's fields",
        input: Input::Body("Profile"),
        status: 200,
        output: Output::One("Message"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "delete",
        path: "/establishments/{id}",
        operation_id: "deleteEstablishment",
        tag: "establishments",
        summary: "Delete an establishment that owns no stores",
        input: Input::None,
        status: 200,
        output: Output::One("Message"),
        errors: &[400, 409, 499, 502],
    },
    Operation {
        method: "get",
        path: "/establishments/{id}/stores",
        operation_id: "listEstablishmentStores",
        tag: "establishments",
        summary: "Stores owned by an establishment",
        input: Input::None,
        status: 200,
        output: Output::Many("Store"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "get",
        path: "/stores",
        operation_id: "listStores",
        tag: "stores",
        summary: "List stores, optionally for one establishment",
        input: Input::EstablishmentFilter,
        status: 200,
        output: Output::Many("Store"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "post",
        path: "/stores",
        operation_id: "createStore",
        tag: "stores",
        summary: "Create a store",
        input: Input::Body("StoreData"),
        status: 201,
        output: Output::One("Store"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "get",
        path: "/stores/{id}",
        operation_id: "getStore",
        tag: "stores",
        summary: "Get a store",
        input: Input::None,
        status: 200,
        output: Output::One("Store"),
        errors: &[400, 404, 499, 502],
    },
    Operation {
        method: "put",
        path: "/stores/{id}",
        operation_id: "updateStore",
        tag: "stores",
        summary: "Replace a store's fields, possibly moving it",
        input: Input::Body("StoreData"),
        status: 200,
        output: Output::One("Message"),
        errors: &[400, 499, 502],
    },
    Operation {
        method: "delete",
        path: "/stores/{id}",
        operation_id: "deleteStore",
        tag: "stores",
        summary: "Delete a store",
        input: Input::None,
        status: 200,
        output: Output::One("Message"),
        errors: &[400, 499, 502],
    },
];

fn schema_ref(name: &str) -> JsonValue {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn error_description(status: u16) -> &'static str {
    match status {
        400 => "Validation failure, malformed body or constraint violation",
        404 => "Not found",
        409 => "Establishment still has stores",
        499 => "Request canceled or timed out",
        502 => "Storage backend failure",
        _ => "Error",
    }
}

fn profile_properties() -> JsonMap<String, JsonValue> {
    let mut properties = JsonMap::new();
    for field in [
        "number",
        "name",
        "corporate_name",
        "address",
        "address_number",
        "city",
        "zip_code",
    ] {
        properties.insert(field.to_string(), json!({ "type": "string" }));
    }
    properties.insert(
        "state".to_string(),
        json!({ "type": "string", "minLength": 2, "maxLength": 2 }),
    );
    properties
}

/// Object schema with `extra` properties added on top of the shared fields.
fn record_schema(extra: &[(&str, JsonValue)], required: &[&str]) -> JsonValue {
    let mut properties = profile_properties();
    for (name, schema) in extra {
        properties.insert(name.to_string(), schema.clone());
    }
    json!({
        "type": "object",
        "properties": JsonValue::Object(properties),
        "required": required,
    })
}

fn component_schemas() -> JsonMap<String, JsonValue> {
    const PROFILE_REQUIRED: &[&str] = &[
        "number",
        "name",
        "address",
        "address_number",
        "city",
        "state",
        "zip_code",
    ];
    let id = json!({ "type": "integer", "format": "int64" });
    let with = |extra: &[&'static str]| -> Vec<&'static str> {
        extra.iter().chain(PROFILE_REQUIRED).copied().collect()
    };

    let mut schemas = JsonMap::new();
    schemas.insert("Profile".into(), record_schema(&[], PROFILE_REQUIRED));
    schemas.insert(
        "StoreData".into(),
        record_schema(
            &[("establishment_id", id.clone())],
            &with(&["establishment_id"]),
        ),
    );
    schemas.insert(
        "Establishment".into(),
        record_schema(&[("id", id.clone())], &with(&["id"])),
    );
    schemas.insert(
        "Store".into(),
        record_schema(
            &[("id", id.clone()), ("establishment_id", id.clone())],
            &with(&["id", "establishment_id"]),
        ),
    );
    schemas.insert(
        "EstablishmentSummary".into(),
        record_schema(
            &[("id", id.clone()), ("stores_total", id.clone())],
            &with(&["id", "stores_total"]),
        ),
    );
    schemas.insert(
        "EstablishmentDetail".into(),
        record_schema(
            &[
                ("id", id.clone()),
                ("stores", json!({ "type": "array", "items": schema_ref("Store") })),
            ],
            &with(&["id", "stores"]),
        ),
    );
    schemas.insert(
        "Message".into(),
        json!({
            "type": "object",
            "properties": { "message": { "type": "string" } },
            "required": ["message"]
        }),
    );
    schemas.insert(
        "Created".into(),
        json!({
            "type": "object",
            "properties": { "message": { "type": "string" }, "id": id },
            "required": ["message", "id"]
        }),
    );
    schemas.insert(
        "HealthReport".into(),
        json!({
            "type": "object",
            "properties": {
                "status": { "type": "string" },
                "storage": { "type": "string", "enum": ["postgres", "memory"] },
                "version": { "type": "string" }
            },
            "required": ["status", "storage", "version"]
        }),
    );
    schemas.insert(
        "ApiError".into(),
        json!({
            "type": "object",
            "properties": {
                "error": { "type": "string" },
                "message": { "type": "string" },
                "fields": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                }
            },
            "required": ["error", "message"]
        }),
    );
    schemas
}

fn operation_object(op: &Operation) -> JsonValue {
    let mut object = JsonMap::new();
    object.insert("operationId".into(), json!(op.operation_id));
    object.insert("summary".into(), json!(op.summary));
    object.insert("tags".into(), json!([op.tag]));

    let mut parameters = Vec::new();
    if op.path.contains("{id}") {
        parameters.push(json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64", "minimum": 1 }
        }));
    }
    match op.input {
        Input::None => {}
        Input::EstablishmentFilter => parameters.push(json!({
            "name": "establishment_id",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "format": "int64", "minimum": 1 }
        })),
        Input::Body(schema) => {
            object.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": { "application/json": { "schema": schema_ref(schema) } }
                }),
            );
        }
    }
    if !parameters.is_empty() {
        object.insert("parameters".into(), JsonValue::Array(parameters));
    }

    let success = match op.output {
        Output::One(name) => schema_ref(name),
        Output::Many(name) => json!({ "type": "array", "items": schema_ref(name) }),
    };
    let mut responses = JsonMap::new();
    responses.insert(
        op.status.to_string(),
        json!({
            "description": "Success",
            "content": { "application/json": { "schema": success } }
        }),
    );
    for status in op.errors {
        responses.insert(
            status.to_string(),
            json!({
                "description": error_description(*status),
                "content": { "application/json": { "schema": schema_ref("ApiError") } }
            }),
        );
    }
    object.insert("responses".into(), JsonValue::Object(responses));

    JsonValue::Object(object)
}

/// OpenAPI 3.1 document describing every route the server mounts.
pub fn openapi_document() -> JsonValue {
    let mut paths = JsonMap::<String, JsonValue>::new();
    for op in OPERATIONS {
        let item = paths
            .entry(op.path.to_string())
            .or_insert_with(|| JsonValue::Object(JsonMap::new()));
        if let JsonValue::Object(methods) = item {
            methods.insert(op.method.to_string(), operation_object(op));
        }
    }

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "estore API",
            "description": "Establishments and their stores",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": JsonValue::Object(paths),
        "components": { "schemas": JsonValue::Object(component_schemas()) }
    })
}

async fn openapi() -> Json<JsonValue> {
    Json(openapi_document())
}

async fn swagger_ui() -> Html<String> {
    Html(format!(
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>estore API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({{ url: "{OPENAPI_PATH}", dom_id: "#swagger-ui" }});
  </script>
</body>
</html>
"##
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/docs",
            get(|| async { Redirect::to("/docs/index.html") }),
        )
        .route("/docs/index.html", get(swagger_ui))
        .route(OPENAPI_PATH, get(openapi))
}
