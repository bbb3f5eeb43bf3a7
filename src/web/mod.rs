//! Web server for checking and viewing LispIsh expressions.
//!
//! - `POST /lispish/parse` validates code and returns its canonical form as JSON.
//! - `GET /` and `POST /render` serve an HTML page showing the canonical form and tree.
//!
//! Every request parses with its own parser; the server holds no state.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::render::{render_svg, render_tree};

const STYLE: &[u8] = include_bytes!("style.css");

/// Error returned when the request has no usable `code` parameter.
pub const MISSING_CODE: &str = "You must provide the code parameter with code to try to parse.";

/// Response body for `/lispish/parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emitted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParseResponse {
    fn failure(error: impl Into<String>) -> Self {
        ParseResponse {
            success: false,
            emitted: None,
            error: Some(error.into()),
        }
    }
}

/// Check a submitted `code` value.
///
/// Anything but a non-empty string is rejected before parsing.
pub fn check_code(code: Option<&serde_json::Value>) -> ParseResponse {
    let code = match code {
        Some(serde_json::Value::String(code)) if !code.is_empty() => code,
        _ => return ParseResponse::failure(MISSING_CODE),
    };
    match crate::parse(code) {
        Ok(parsed) => ParseResponse {
            success: true,
            emitted: Some(parsed.emit(0)),
            error: None,
        },
        Err(e) => ParseResponse::failure(e.to_string()),
    }
}

/// The `code` field of a request, from either a form or a JSON body.
///
/// A body that cannot be decoded yields `None`, which is reported in-band like a missing field.
pub struct CodeParam(pub Option<serde_json::Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for CodeParam
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));
        let code = if is_form {
            Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .ok()
                .and_then(|Form(mut fields)| fields.remove("code"))
                .map(serde_json::Value::String)
        } else {
            Json::<serde_json::Value>::from_request(req, state)
                .await
                .ok()
                .and_then(|Json(mut body)| body.get_mut("code").map(serde_json::Value::take))
        };
        Ok(CodeParam(code))
    }
}

/// Handler for `POST /lispish/parse`.
pub async fn parse_handler(CodeParam(code): CodeParam) -> Json<ParseResponse> {
    let response = check_code(code.as_ref());
    if response.success {
        tracing::debug!("accepted expression");
    } else {
        tracing::info!(error = ?response.error, "rejected expression");
    }
    Json(response)
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderForm {
    #[serde(default)]
    pub code: String,
}

/// Result of checking code for the HTML page.
enum Checked {
    Empty,
    Valid { emitted: String, svg: Result<String, String> },
    Invalid(String),
}

fn check_for_page(code: &str) -> Checked {
    if code.trim().is_empty() {
        return Checked::Empty;
    }
    match crate::parse(code) {
        Ok(tree) => {
            let svg = render_svg(&render_tree(&tree));
            if let Err(e) = &svg {
                tracing::warn!("could not render tree: {e}");
            }
            Checked::Valid {
                emitted: tree.emit(0),
                svg,
            }
        }
        Err(e) => Checked::Invalid(e.to_string()),
    }
}

fn page(code: &str, checked: Checked) -> maud::Markup {
    maud::html!(
        (maud::DOCTYPE)
        html {
            head {
                title { "LispIsh" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                main {
                    form method="post" action="/render" {
                        textarea name="code" class="code" { (code) }
                        button type="submit" { "Check" }
                    }
                    @match checked {
                        Checked::Empty => {},
                        Checked::Invalid(error) => {
                            p class="error" { (error) }
                        },
                        Checked::Valid { emitted, svg } => {
                            pre class="emitted" { (emitted) }
                            @match svg {
                                Ok(svg) => div class="tree" { (maud::PreEscaped(svg)) },
                                Err(e) => p class="error" { (e) },
                            }
                        },
                    }
                }
            }
        }
    )
}

/// Handler for `GET /`.
pub async fn index_handler() -> maud::Markup {
    page("", Checked::Empty)
}

/// Handler for `POST /render`.
///
/// Rendering waits on the `dot` process, so it runs on the blocking pool.
pub async fn render_handler(Form(form): Form<RenderForm>) -> maud::Markup {
    let code = form.code;
    let (code, checked) = match tokio::task::spawn_blocking(move || {
        let checked = check_for_page(&code);
        (code, checked)
    })
    .await
    {
        Ok(done) => done,
        Err(e) => {
            tracing::error!("render task failed: {e}");
            (String::new(), Checked::Invalid(format!("render task failed: {e}")))
        }
    };
    page(&code, checked)
}

pub fn get_server() -> axum::Router {
    axum::Router::new()
        .route("/", get(index_handler))
        .route(
            "/style.css",
            get(|| async { ([(CONTENT_TYPE, "text/css")], STYLE).into_response() }),
        )
        .route("/lispish/parse", post(parse_handler))
        .route("/render", post(render_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_code() {
        for code in [None, Some(json!("")), Some(json!(12)), Some(json!(null))] {
            let response = check_code(code.as_ref());
            assert_eq!(response, ParseResponse::failure(MISSING_CODE), "for {code:?}");
        }
    }

    #[test]
    fn valid_code_is_canonicalized() {
        let response = check_code(Some(&json!("( and 1\n 2 )")));
        assert!(response.success);
        assert_eq!(response.emitted.as_deref(), Some("(and\n    1\n    2)"));
        assert_eq!(response.error, None);
    }

    #[test]
    fn invalid_code_reports_position() {
        let response = check_code(Some(&json!("(non-matching-paren 1 2")));
        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Ran off end of input at 1:23")
        );
    }

    #[test]
    fn response_json_shape() {
        let ok = serde_json::to_value(check_code(Some(&json!("(foo)")))).unwrap();
        assert_eq!(ok, json!({"success": true, "emitted": "(foo)"}));
        let err = serde_json::to_value(check_code(None)).unwrap();
        assert_eq!(err, json!({"success": false, "error": MISSING_CODE}));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let depth = 100_000;
        let code = format!("{}{}", "(a ".repeat(depth), ")".repeat(depth));
        let response = check_code(Some(&json!(code)));
        assert!(!response.success);
        assert_eq!(
            response.error,
            Some(format!(
                "Calls nested deeper than {} levels at 1:{}",
                crate::MAX_DEPTH,
                3 * crate::MAX_DEPTH
            ))
        );
    }

    #[tokio::test]
    async fn parse_handler_responds_in_band() {
        let Json(response) = parse_handler(CodeParam(Some(json!("(foo) bar")))).await;
        assert_eq!(
            response.error.as_deref(),
            Some("Expected <EOF> but found <b> at 1:6")
        );
    }

    #[tokio::test]
    async fn page_shows_errors() {
        let markup = render_handler(Form(RenderForm {
            code: "(foo".to_owned(),
        }))
        .await
        .into_string();
        assert!(markup.contains("Ran off end of input at 1:4"), "{markup}");
        assert!(markup.contains("(foo</textarea>"), "{markup}");

        let markup = index_handler().await.into_string();
        assert!(markup.contains("<textarea"), "{markup}");
    }
}
