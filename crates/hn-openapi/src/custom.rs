//! The application's own endpoints, described by hand.
//!
//! The auth service documents its routes itself; everything the application adds on
//! top (post management) is described here and merged in by [`crate::SchemaMerger`].

use serde_json::{Value, json};

use crate::Result;
use crate::builder::DocumentBuilder;
use crate::types::{HttpMethod, OpenApiOperation, OpenApiPath, SecurityScheme, Server, Tag};

pub const API_TITLE: &str = "Hacker News Clone API";
pub const API_DESCRIPTION: &str = "Complete API including authentication and custom endpoints";
pub const API_VERSION: &str = "1.0.0";

/// Name of the security scheme guarding authenticated endpoints.
pub const COOKIE_AUTH: &str = "cookieAuth";
/// Session cookie issued by the auth service.
pub const SESSION_COOKIE: &str = "better-auth.session_token";

pub const CREATE_POST_PATH: &str = "/api/posts/create-post";

/// Build the custom endpoint descriptor.
///
/// The result always has at least one path and one security scheme, and none of
/// its paths live under `/api/auth`, which belongs to the auth service.
pub fn custom_document() -> Result<Value> {
    DocumentBuilder::new()
        .openapi("3.0.3")
        .title(API_TITLE)
        .version(API_VERSION)
        .description(API_DESCRIPTION)
        .server(Server::new("http://localhost:3000").with_description("Development server"))
        .path(OpenApiPath::new(CREATE_POST_PATH, HttpMethod::Post).with_operation(create_post()))
        .security_scheme(
            COOKIE_AUTH,
            SecurityScheme::cookie(SESSION_COOKIE)
                .with_description("Session cookie set by Better-Auth"),
        )
        .tag(Tag::new("Posts").with_description("Post management endpoints"))
        .build()
}

fn create_post() -> OpenApiOperation {
    OpenApiOperation::new("Create a new post")
        .with_tag("Posts")
        .with_description("Create a new post (requires authentication)")
        .with_security(COOKIE_AUTH)
        .with_json_body(
            true,
            json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "minLength": 3,
                        "maxLength": 50,
                        "description": "Post title"
                    },
                    "url": {
                        "type": "string",
                        "format": "uri",
                        "description": "Post URL (optional)"
                    },
                    "content": {
                        "type": "string",
                        "minLength": 10,
                        "description": "Post content (optional)"
                    }
                },
                "required": ["title"],
                "anyOf": [
                    { "required": ["url"] },
                    { "required": ["content"] }
                ]
            }),
        )
        .with_json_response(
            "201",
            "Post created successfully",
            json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean", "example": true },
                    "message": { "type": "string", "example": "Post Created" },
                    "data": {
                        "type": "object",
                        "properties": {
                            "postId": { "type": "integer", "description": "Created post ID" }
                        }
                    }
                }
            }),
        )
        .with_json_response(
            "400",
            "Bad request - validation error",
            json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean", "example": false },
                    "message": { "type": "string" },
                    "isFormError": { "type": "boolean" }
                }
            }),
        )
        .with_json_response(
            "401",
            "Unauthorized - authentication required",
            json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean", "example": false },
                    "message": { "type": "string", "example": "Authentication required" }
                }
            }),
        )
}
