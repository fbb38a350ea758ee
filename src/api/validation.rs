use actix_web::HttpResponse;
use serde::Serialize;

/// Error body shared by every failure response in the project
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Shape any payload validation failure into the standard error body.
///
/// Schema violations list every failed constraint per field, never just the
/// first one. Deserialization failures (malformed JSON, unrecognized keys,
/// uncoercible query values) surface as a single message.
fn validation_error_response(err: &actix_web_validator::Error) -> HttpResponse {
    let mut fields = serde_json::Map::new();

    match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            for (field, errors) in validation_errors.field_errors() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
            }

            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                fields: serde_json::Value::Object(fields),
            })
        }
        actix_web_validator::Error::Deserialize(de_err) => {
            let err_string = de_err.to_string();

            let message = if err_string.contains("EOF while parsing") {
                "Request body is empty. Expected JSON payload".to_string()
            } else if err_string.contains("unknown field") {
                // serde names the offending key and lists the accepted ones
                err_string
            } else {
                format!("Invalid request format: {}", err_string)
            };
            fields.insert("message".to_string(), serde_json::json!(message));

            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Request validation failed".to_string(),
                fields: serde_json::Value::Object(fields),
            })
        }
        _ => {
            fields.insert("message".to_string(), serde_json::json!("Validation error"));

            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                fields: serde_json::Value::Object(fields),
            })
        }
    }
}

/// JsonConfig with standardized error handling for every JSON body
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| {
        let response = validation_error_response(&err);
        actix_web::error::InternalError::from_response("", response).into()
    })
}

/// QueryConfig with the same error shape for query-string filters
pub fn query_config() -> actix_web_validator::QueryConfig {
    actix_web_validator::QueryConfig::default().error_handler(|err, _req| {
        let response = validation_error_response(&err);
        actix_web::error::InternalError::from_response("", response).into()
    })
}
