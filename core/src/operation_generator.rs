#![deny(missing_docs)]

//! # Operation Generation
//!
//! Typed templates for the OpenAPI fragments this tool inserts: the
//! standardized review `post` operation, the shared `ErrorResponse` schema,
//! and the `bearerAuth` security scheme.
//!
//! The structs serialize straight into the document value tree; field order
//! and `IndexMap` keep the emitted keys in a stable, conventional order.

use crate::error::AppResult;
use crate::mapping::ReviewMapping;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

/// Component name of the shared error schema referenced by error responses.
pub const ERROR_SCHEMA_NAME: &str = "ErrorResponse";

/// Component name of the bearer-token security scheme.
pub const BEARER_SCHEME_NAME: &str = "bearerAuth";

const ERROR_SCHEMA_REF: &str = "#/components/schemas/ErrorResponse";
const JSON_MEDIA_TYPE: &str = "application/json";

/// A single HTTP operation as inserted by the patcher.
#[derive(Debug, Clone, Serialize)]
pub struct OperationObject {
    /// Tag names grouping the operation (the resource plural).
    pub tags: Vec<String>,
    /// Human-readable operation summary.
    pub summary: String,
    /// Path/query parameter descriptors.
    pub parameters: Vec<ParameterObject>,
    /// Request body descriptor.
    #[serde(rename = "requestBody")]
    pub request_body: RequestBodyObject,
    /// Response descriptors keyed by status code.
    pub responses: IndexMap<String, ResponseObject>,
    /// Security requirements (scheme name to scope list).
    pub security: Vec<IndexMap<String, Vec<String>>>,
}

/// A parameter descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ParameterObject {
    /// Parameter location (`path`, `query`, ...).
    #[serde(rename = "in")]
    pub location: String,
    /// Parameter name.
    pub name: String,
    /// Whether the parameter is mandatory.
    pub required: bool,
    /// Parameter value schema.
    pub schema: SchemaObject,
}

/// A request body descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct RequestBodyObject {
    /// Whether a body is mandatory.
    pub required: bool,
    /// Media types accepted by the operation.
    pub content: IndexMap<String, MediaTypeObject>,
}

/// A media type entry holding the payload schema.
#[derive(Debug, Clone, Serialize)]
pub struct MediaTypeObject {
    /// The payload schema.
    pub schema: SchemaObject,
}

/// A response descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseObject {
    /// Human-readable response description.
    pub description: String,
    /// Media types returned by the operation, when a body is defined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaTypeObject>>,
}

/// Minimal schema node covering everything the generated fragments need.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaObject {
    /// Schema type name (`object`, `string`, `integer`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "type")]
    pub o_type: Option<String>,
    /// Reference to a shared component schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$ref")]
    pub dollar_ref: Option<String>,
    /// Inclusive lower bound for numeric values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    /// Inclusive upper bound for numeric values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    /// Maximum length for string values.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    /// Named properties of an object schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaObject>>,
    /// Property names required by an object schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl SchemaObject {
    /// A schema with just a type name.
    pub fn new(o_type: &str) -> SchemaObject {
        SchemaObject {
            o_type: Some(o_type.to_string()),
            ..SchemaObject::default()
        }
    }

    /// A plain `$ref` schema.
    pub fn new_ref(dollar_ref: &str) -> SchemaObject {
        SchemaObject {
            dollar_ref: Some(dollar_ref.to_string()),
            ..SchemaObject::default()
        }
    }

    /// Adds an inclusive minimum.
    pub fn with_minimum(&self, minimum: i64) -> Self {
        let mut new = self.clone();
        new.minimum = Some(minimum);
        new
    }

    /// Adds an inclusive maximum.
    pub fn with_maximum(&self, maximum: i64) -> Self {
        let mut new = self.clone();
        new.maximum = Some(maximum);
        new
    }

    /// Adds a maximum string length.
    pub fn with_max_length(&self, max_length: u64) -> Self {
        let mut new = self.clone();
        new.max_length = Some(max_length);
        new
    }

    /// Adds a named property to an object schema.
    pub fn with_property(&self, name: &str, schema: SchemaObject) -> Self {
        let mut new = self.clone();
        new.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), schema);
        new
    }

    /// Sets the required property list of an object schema.
    pub fn with_required(&self, names: &[&str]) -> Self {
        let mut new = self.clone();
        new.required = Some(names.iter().map(|n| n.to_string()).collect());
        new
    }
}

/// Bearer HTTP authentication scheme definition.
#[derive(Debug, Clone, Serialize)]
struct SecuritySchemeObject {
    #[serde(rename = "type")]
    o_type: String,
    scheme: String,
    #[serde(rename = "bearerFormat")]
    bearer_format: String,
}

/// Builds the standardized review `post` operation for one mapping entry.
pub fn build_review_operation(mapping: &ReviewMapping) -> AppResult<Value> {
    let body_schema = SchemaObject::new("object")
        .with_property(
            "rating",
            SchemaObject::new("integer").with_minimum(1).with_maximum(5),
        )
        .with_property("comment", SchemaObject::new("string").with_max_length(1000))
        .with_property("name", SchemaObject::new("string"))
        .with_required(&["rating", "comment"]);

    let mut responses = IndexMap::new();
    responses.insert(
        "201".to_string(),
        json_response("Review created successfully", SchemaObject::new("object")),
    );
    responses.insert("400".to_string(), error_response("Invalid request payload"));
    responses.insert("401".to_string(), error_response("Authentication required"));
    responses.insert("403".to_string(), error_response("Insufficient permissions"));
    responses.insert("422".to_string(), error_response("Validation failed"));

    let mut requirement = IndexMap::new();
    requirement.insert(BEARER_SCHEME_NAME.to_string(), Vec::new());

    let operation = OperationObject {
        tags: vec![mapping.resource_plural.clone()],
        summary: format!("Add Review to {} (Standardized)", mapping.resource_singular),
        parameters: vec![ParameterObject {
            location: "path".to_string(),
            name: "id".to_string(),
            required: true,
            schema: SchemaObject::new("string"),
        }],
        request_body: RequestBodyObject {
            required: true,
            content: json_content(body_schema),
        },
        responses,
        security: vec![requirement],
    };

    Ok(serde_yaml::to_value(operation)?)
}

/// Builds the full path item (`post: <operation>`) for one mapping entry.
pub fn build_path_item(mapping: &ReviewMapping) -> AppResult<Value> {
    let mut item = serde_yaml::Mapping::new();
    item.insert(
        Value::String("post".to_string()),
        build_review_operation(mapping)?,
    );
    Ok(Value::Mapping(item))
}

/// The shared `ErrorResponse` schema inserted into `components.schemas`.
pub fn error_response_schema() -> AppResult<Value> {
    let schema = SchemaObject::new("object")
        .with_property("code", SchemaObject::new("integer"))
        .with_property("message", SchemaObject::new("string"))
        .with_required(&["message"]);
    Ok(serde_yaml::to_value(schema)?)
}

/// The `bearerAuth` scheme inserted into `components.securitySchemes`.
pub fn bearer_security_scheme() -> AppResult<Value> {
    let scheme = SecuritySchemeObject {
        o_type: "http".to_string(),
        scheme: "bearer".to_string(),
        bearer_format: "JWT".to_string(),
    };
    Ok(serde_yaml::to_value(scheme)?)
}

fn json_content(schema: SchemaObject) -> IndexMap<String, MediaTypeObject> {
    let mut content = IndexMap::new();
    content.insert(JSON_MEDIA_TYPE.to_string(), MediaTypeObject { schema });
    content
}

fn json_response(description: &str, schema: SchemaObject) -> ResponseObject {
    ResponseObject {
        description: description.to_string(),
        content: Some(json_content(schema)),
    }
}

fn error_response(description: &str) -> ResponseObject {
    json_response(description, SchemaObject::new_ref(ERROR_SCHEMA_REF))
}
