//! OpenAPI 3 description of the counter api.

use crate::schema::COUNTER_PATH;
use serde_json::{json, Value};

pub const TITLE: &str = "counter";
pub const VERSION: &str = "1.0.0";

pub fn document() -> Value {
    let path = format!("/{}/{{key}}", COUNTER_PATH);
    let key_parameter = json!({
        "in": "path",
        "name": "key",
        "required": true,
        "schema": { "type": "string" },
        "style": "simple"
    });

    json!({
        "openapi": "3.0.3",
        "info": { "title": TITLE, "version": VERSION },
        "paths": {
            path: {
                "get": {
                    "summary": "Fetch the current value of the counter.",
                    "operationId": "get_counter",
                    "parameters": [key_parameter.clone()],
                    "responses": {
                        "200": {
                            "description": "successful operation",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CounterValue" }
                                }
                            }
                        },
                        "4XX": { "$ref": "#/components/responses/Error" },
                        "5XX": { "$ref": "#/components/responses/Error" }
                    }
                },
                "put": {
                    "summary": "Update the current value of the counter.",
                    "operationId": "put_counter",
                    "parameters": [key_parameter],
                    "requestBody": {
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CounterValue" }
                            }
                        },
                        "required": true
                    },
                    "responses": {
                        "204": { "description": "resource updated" },
                        "4XX": { "$ref": "#/components/responses/Error" },
                        "5XX": { "$ref": "#/components/responses/Error" }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "CounterValue": {
                    "description": "The value of the counter, either as the response to a GET request or as the body of a PUT request.",
                    "type": "object",
                    "properties": {
                        "counter": {
                            "nullable": true,
                            "type": "integer",
                            "format": "uint32",
                            "minimum": 0,
                            "maximum": u32::MAX
                        }
                    }
                },
                "Error": {
                    "description": "Error information from a response.",
                    "type": "object",
                    "properties": {
                        "error_code": { "type": "string" },
                        "message": { "type": "string" },
                        "request_id": { "type": "string" }
                    },
                    "required": ["message", "request_id"]
                }
            },
            "responses": {
                "Error": {
                    "description": "Error",
                    "content": {
                        "application/json": {
                            "schema": { "$ref": "#/components/schemas/Error" }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_describes_both_operations() {
        let document = document();
        let path = &document["paths"]["/counter/{key}"];

        assert_eq!(path["get"]["operationId"], "get_counter");
        assert_eq!(path["put"]["operationId"], "put_counter");
        assert!(path["get"]["responses"].get("200").is_some());
        assert!(path["put"]["responses"].get("204").is_some());
        for operation in &["get", "put"] {
            assert!(path[operation]["responses"].get("4XX").is_some());
            assert!(path[operation]["responses"].get("5XX").is_some());
        }
    }

    #[test]
    fn error_schema_requires_message_and_request_id() {
        let document = document();

        assert_eq!(
            document["components"]["schemas"]["Error"]["required"],
            json!(["message", "request_id"])
        );
    }
}
