use crate::exception::HttpException;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// The untyped request handed to context transformers.
///
/// Carries everything the router matched plus the collected body bytes;
/// transformers decide how much of it becomes the handler's context.
pub struct RawRequest {
    pub method: Method,
    pub path: String,
    /// Captured path parameters, keyed by segment name.
    pub params: HashMap<String, String>,
    /// The raw query string, without the leading `?`.
    pub query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawRequest {
    /// Decode the query string into a key/value map. Repeated keys keep the
    /// last value.
    pub fn parsed_query(&self) -> HashMap<String, String> {
        form_urlencoded::parse(self.query.as_bytes())
            .into_owned()
            .collect()
    }
}

/// The typed context a handler is invoked with.
#[derive(Debug)]
pub struct RequestContext {
    pub body: Value,
    pub query: HashMap<String, String>,
    pub params: HashMap<String, String>,
}

impl RequestContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Deserialize the JSON body into `T`, failing with a client error when
    /// the body does not fit.
    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, HttpException> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| HttpException::bad_request(format!("invalid request body: {e}")))
    }
}

/// Converts a raw request into the handler's `{body, query, params}` context.
///
/// May fail with a validation error, which the error pipeline renders as a
/// client error.
pub type ContextTransformer =
    dyn Fn(&RawRequest) -> Result<RequestContext, HttpException> + Send + Sync;

/// The transformer applied when a route does not declare its own: the body is
/// parsed as JSON (`null` when empty), the query string is decoded, and path
/// parameters are passed through.
pub fn default_transform(raw: &RawRequest) -> Result<RequestContext, HttpException> {
    let body = if raw.body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&raw.body)
            .map_err(|e| HttpException::bad_request(format!("malformed JSON body: {e}")))?
    };
    Ok(RequestContext {
        body,
        query: raw.parsed_query(),
        params: raw.params.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn raw(body: &str, query: &str) -> RawRequest {
        RawRequest {
            method: Method::GET,
            path: "/".to_string(),
            params: HashMap::new(),
            query: query.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn empty_body_transforms_to_null() {
        let context = default_transform(&raw("", "")).unwrap();
        assert!(context.body.is_null());
    }

    #[test]
    fn json_body_is_parsed() {
        let context = default_transform(&raw(r#"{"name":"ada"}"#, "")).unwrap();
        assert_eq!(context.body["name"], "ada");
    }

    #[test]
    fn malformed_body_is_a_client_error() {
        let error = default_transform(&raw("{not json", "")).unwrap_err();
        assert_eq!(error.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn query_string_is_decoded() {
        let context = default_transform(&raw("", "page=2&name=ada%20l")).unwrap();
        assert_eq!(context.query_param("page"), Some("2"));
        assert_eq!(context.query_param("name"), Some("ada l"));
    }

    #[test]
    fn body_as_deserializes_into_typed_requests() {
        #[derive(Deserialize)]
        struct CreateUser {
            name: String,
        }

        let context = default_transform(&raw(r#"{"name":"ada"}"#, "")).unwrap();
        let request: CreateUser = context.body_as().unwrap();
        assert_eq!(request.name, "ada");

        let empty = default_transform(&raw("", "")).unwrap();
        assert!(empty.body_as::<CreateUser>().is_err());
    }
}
