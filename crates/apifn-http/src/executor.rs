use apifn_core::model::ParameterLocation;
use reqwest::RequestBuilder;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::error::ExecuteError;
use crate::request::{Auth, Request, RequestParameter, is_truthy, value_to_string};

/// Executes resolved requests with a shared `reqwest` client.
///
/// Each [`Request`] becomes one HTTP call: URI placeholders are substituted,
/// query, header and body arguments attached, and the decoded response body
/// returned. Any received response resolves, even with a 4xx/5xx status.
#[derive(Debug, Clone, Default)]
pub struct RequestExecutor {
    client: reqwest::Client,
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, timeouts, TLS roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform the request and resolve to the decoded response body.
    ///
    /// ## Errors
    ///
    /// Returns an error if the substituted URL does not parse, a header
    /// argument is not a valid header, or no response was received.
    pub async fn execute(&self, request: Request) -> Result<Value, ExecuteError> {
        let url = substitute_uri_parameters(&request.url, &request.parameters);
        let parsed = Url::parse(&url).map_err(|source| ExecuteError::InvalidUrl {
            url: url.clone(),
            source,
        })?;
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|_| ExecuteError::InvalidMethod(request.method.as_str().to_string()))?;

        let mut builder = self.client.request(method.clone(), parsed);
        for param in &request.parameters {
            if !is_truthy(&param.value) {
                continue;
            }
            builder = match param.location {
                ParameterLocation::Uri => builder,
                ParameterLocation::Query => attach_query(builder, param),
                ParameterLocation::Headers => attach_header(builder, param)?,
                ParameterLocation::Body => attach_body(builder, &param.value),
            };
        }
        if let Some(ref auth) = request.auth {
            builder = apply_auth(builder, auth);
        }

        log::debug!("sending {method} {url}");
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::debug!("{method} {url} returned {status}");
        }
        let bytes = response.bytes().await?;
        Ok(decode_body(&bytes))
    }
}

/// Replace the first `{name}` placeholder of every URI parameter with its value.
///
/// Falsy values substitute as the empty string; parameters without a
/// placeholder are skipped.
pub fn substitute_uri_parameters(template: &str, parameters: &[RequestParameter]) -> String {
    let mut url = template.to_string();
    for param in parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Uri)
    {
        let placeholder = format!("{{{}}}", param.name);
        if let Some(start) = url.find(&placeholder) {
            let value = if is_truthy(&param.value) {
                value_to_string(&param.value)
            } else {
                String::new()
            };
            url.replace_range(start..start + placeholder.len(), &value);
        }
    }
    url
}

fn attach_query(builder: RequestBuilder, param: &RequestParameter) -> RequestBuilder {
    let pairs: Vec<(&str, String)> = match &param.value {
        Value::Array(items) => items
            .iter()
            .map(|item| (param.name.as_str(), value_to_string(item)))
            .collect(),
        other => vec![(param.name.as_str(), value_to_string(other))],
    };
    builder.query(&pairs)
}

fn attach_header(
    builder: RequestBuilder,
    param: &RequestParameter,
) -> Result<RequestBuilder, ExecuteError> {
    let name = HeaderName::try_from(param.name.as_str()).map_err(|e| {
        ExecuteError::InvalidHeader {
            name: param.name.clone(),
            message: e.to_string(),
        }
    })?;
    let value = HeaderValue::try_from(value_to_string(&param.value)).map_err(|e| {
        ExecuteError::InvalidHeader {
            name: param.name.clone(),
            message: e.to_string(),
        }
    })?;
    Ok(builder.header(name, value))
}

fn attach_body(builder: RequestBuilder, value: &Value) -> RequestBuilder {
    match value {
        Value::String(s) => builder.body(s.clone()),
        other => builder.json(other),
    }
}

/// A bearer token takes precedence over basic credentials.
fn apply_auth(builder: RequestBuilder, auth: &Auth) -> RequestBuilder {
    match (&auth.access_token, &auth.user) {
        (Some(token), _) => builder.bearer_auth(token),
        (None, Some(user)) => builder.basic_auth(user, auth.password.as_ref()),
        (None, None) => builder,
    }
}

/// JSON when the body parses as JSON, a string otherwise, `null` when empty.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use apifn_core::model::HttpMethod;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn uri(name: &str, value: Value) -> RequestParameter {
        RequestParameter {
            name: name.to_string(),
            location: ParameterLocation::Uri,
            value,
        }
    }

    #[test]
    fn test_substitute_uri_parameters() {
        let params = vec![uri("owner", json!("octo")), uri("number", json!(42))];
        assert_eq!(
            substitute_uri_parameters("/repos/{owner}/issues/{number}", &params),
            "/repos/octo/issues/42"
        );
    }

    #[test]
    fn test_substitute_first_occurrence_only() {
        let params = vec![uri("id", json!(1))];
        assert_eq!(substitute_uri_parameters("/{id}/{id}", &params), "/1/{id}");
    }

    #[test]
    fn test_substitute_falsy_and_missing() {
        let params = vec![uri("id", json!(0)), uri("absent", json!("x"))];
        assert_eq!(substitute_uri_parameters("/items/{id}", &params), "/items/");
    }

    #[test]
    fn test_substitute_ignores_other_locations() {
        let params = vec![RequestParameter {
            name: "id".to_string(),
            location: ParameterLocation::Query,
            value: json!(5),
        }];
        assert_eq!(substitute_uri_parameters("/items/{id}", &params), "/items/{id}");
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b" \n"), Value::Null);
        assert_eq!(decode_body(br#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_body(b"plain text"), json!("plain text"));
    }

    #[tokio::test]
    async fn test_execute_get_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/614/info.0.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"num": 614, "title": "Woodpecker"})),
            )
            .mount(&mock_server)
            .await;

        let request = Request::new(
            format!("{}/{{id}}/info.0.json", mock_server.uri()),
            HttpMethod::Get,
        )
        .parameter("id", ParameterLocation::Uri, json!(614));

        let body = RequestExecutor::new().execute(request).await.unwrap();
        assert_eq!(body["title"], "Woodpecker");
    }

    #[tokio::test]
    async fn test_execute_attaches_query_header_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/issues"))
            .and(query_param("draft", "true"))
            .and(query_param("label", "bug"))
            .and(header("x-request-id", "abc"))
            .and(body_json(json!({"title": "Broken"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 7})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = Request::new(format!("{}/issues", mock_server.uri()), HttpMethod::Post)
            .parameter("draft", ParameterLocation::Query, json!(true))
            .parameter("label", ParameterLocation::Query, json!(["bug"]))
            .parameter("X-Request-Id", ParameterLocation::Headers, json!("abc"))
            .parameter("body", ParameterLocation::Body, json!({"title": "Broken"}));

        let body = RequestExecutor::new().execute(request).await.unwrap();
        assert_eq!(body, json!({"number": 7}));
    }

    #[tokio::test]
    async fn test_execute_skips_falsy_values() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let request = Request::new(format!("{}/items", mock_server.uri()), HttpMethod::Get)
            .parameter("page", ParameterLocation::Query, json!(0))
            .parameter("X-Empty", ParameterLocation::Headers, json!(""));

        RequestExecutor::new().execute(request).await.unwrap();

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].url.query(), None);
        assert!(!received[0].headers.contains_key("x-empty"));
    }

    #[tokio::test]
    async fn test_execute_string_body_sent_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/notes"))
            .and(body_string("hello"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = Request::new(format!("{}/notes", mock_server.uri()), HttpMethod::Put)
            .parameter("body", ParameterLocation::Body, json!("hello"));

        let body = RequestExecutor::new().execute(request).await.unwrap();
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_last_truthy_body_wins() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/items"))
            .and(body_json(json!({"n": 2})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let request = Request::new(format!("{}/items", mock_server.uri()), HttpMethod::Post)
            .parameter("first", ParameterLocation::Body, json!({"n": 1}))
            .parameter("second", ParameterLocation::Body, json!({"n": 2}))
            .parameter("third", ParameterLocation::Body, json!(0));

        RequestExecutor::new().execute(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_execute_basic_auth() {
        let mock_server = MockServer::start().await;

        // "user:pass" in base64
        Mock::given(method("GET"))
            .and(path("/private"))
            .and(header("authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut request = Request::new(format!("{}/private", mock_server.uri()), HttpMethod::Get);
        request.auth = Some(Auth {
            user: Some("user".to_string()),
            password: Some("pass".to_string()),
            access_token: None,
        });

        let body = RequestExecutor::new().execute(request).await.unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_execute_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/private"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut request = Request::new(format!("{}/private", mock_server.uri()), HttpMethod::Get);
        request.auth = Some(Auth {
            access_token: Some("test-token".to_string()),
            ..Auth::default()
        });

        RequestExecutor::new().execute(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status_resolves_with_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&mock_server)
            .await;

        let request = Request::new(format!("{}/missing", mock_server.uri()), HttpMethod::Get);
        let body = RequestExecutor::new().execute(request).await.unwrap();
        assert_eq!(body["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_transport_failure_rejects() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let request = Request::new(format!("http://127.0.0.1:{port}/x"), HttpMethod::Get);
        let err = RequestExecutor::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ExecuteError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalid_header_name() {
        let request = Request::new("http://127.0.0.1:1/x", HttpMethod::Get).parameter(
            "bad header",
            ParameterLocation::Headers,
            json!("v"),
        );
        let err = RequestExecutor::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ExecuteError::InvalidHeader { ref name, .. } if name == "bad header"));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let request = Request::new("not a url/{id}", HttpMethod::Get);
        let err = RequestExecutor::new().execute(request).await.unwrap_err();
        assert!(matches!(err, ExecuteError::InvalidUrl { .. }));
    }
}
