//! Async client for the Piston code execution API
//!
//! Sends one `RunRequest` per call and classifies whatever comes back into
//! a `RunResponse`. The client never retries: the public Piston instance is
//! a shared resource, so a failed call is reported straight away.
//!
//! Infrastructure detail (status codes, raw bodies, transport errors) goes
//! to the log only. Callers see `RunResult::Unknown` with empty output.

use std::collections::BTreeSet;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::core::config::BotConfig;
use crate::core::error::{BotError, Result};
use crate::core::types::{RunRequest, RunResponse};

/// Client for the execution and runtime-list endpoints
///
/// Cheap to clone; clones share the connection pool. All state is
/// read-only after construction, so one client can serve concurrent
/// requests.
#[derive(Clone)]
pub struct PistonClient {
    client: Client,
    execute_url: String,
    runtimes_url: String,
    version: String,
    auth: Option<HeaderValue>,
}

impl PistonClient {
    /// Create a client from a validated configuration
    pub fn new(config: &BotConfig) -> Result<Self> {
        config.validate()?;

        let auth = match config.auth_token.as_deref() {
            Some(token) => {
                let mut value = HeaderValue::from_str(token.trim()).map_err(|_| {
                    BotError::Config("auth token contains invalid header characters".into())
                })?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            execute_url: config.execute_url(),
            runtimes_url: config.runtimes_url(),
            version: config.version.clone(),
            auth,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Run the request's code remotely and classify the outcome
    ///
    /// Never fails: every problem ends up as a `RunResult` variant, and the
    /// original request always travels back inside the response.
    pub async fn execute(&self, request: RunRequest) -> RunResponse {
        let body = ExecuteRequest {
            language: request.language(),
            version: &self.version,
            files: vec![SourceFile {
                content: request.code(),
            }],
            stdin: request.stdin(),
        };

        tracing::debug!(
            language = request.language(),
            code_len = request.code().len(),
            has_stdin = request.has_stdin(),
            "Dispatching execution request"
        );

        let mut builder = self.client.post(&self.execute_url).json(&body);
        if let Some(auth) = &self.auth {
            builder = builder.header(AUTHORIZATION, auth.clone());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, language = request.language(), "Execution request failed");
                return RunResponse::unknown(request);
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(text) => classify(request, status, &text),
            Err(e) => {
                tracing::error!(error = %e, %status, "Failed to read execution response body");
                RunResponse::unknown(request)
            }
        }
    }

    /// Fetch the names of all languages the service can run
    ///
    /// Names are deduplicated across versions and sorted ascending.
    pub async fn languages(&self) -> Result<Vec<String>> {
        let mut builder = self.client.get(&self.runtimes_url);
        if let Some(auth) = &self.auth {
            builder = builder.header(AUTHORIZATION, auth.clone());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, "Runtime list request failed");
            BotError::Fetch("could not reach the runtime list".into())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "Runtime list request rejected");
            return Err(BotError::Fetch(format!("runtime list returned {}", status)));
        }

        let runtimes: Vec<Runtime> = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Runtime list body is not valid JSON");
            BotError::Fetch("runtime list could not be decoded".into())
        })?;

        Ok(unique_languages(runtimes))
    }
}

/// Turn an HTTP status and body into a classified response
pub fn classify(request: RunRequest, status: StatusCode, body: &str) -> RunResponse {
    if status == StatusCode::OK {
        return classify_success(request, body);
    }

    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            message: Some(message),
        }) if !message.is_empty() => {
            tracing::debug!(%status, "Execution rejected by service");
            RunResponse::execution_error(request, message)
        }
        _ => {
            tracing::warn!(%status, body = %body, "Unexpected execution error response");
            RunResponse::unknown(request)
        }
    }
}

fn classify_success(request: RunRequest, body: &str) -> RunResponse {
    let decoded: ExecuteResponse = match serde_json::from_str(body) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(error = %e, body = %body, "Execution response is not valid JSON");
            return RunResponse::unknown(request);
        }
    };

    if let Some(output) = decoded.run.and_then(|run| run.output) {
        return RunResponse::success(request, output);
    }

    // Compiled languages stop before the run stage when compilation fails.
    if let Some(compile) = decoded.compile {
        if compile.code != Some(0) {
            if let Some(output) = compile.output.filter(|o| !o.is_empty()) {
                return RunResponse::execution_error(request, output);
            }
        }
    }

    tracing::warn!(body = %body, "Execution response has no run output");
    RunResponse::unknown(request)
}

/// Collapse runtime entries to a sorted list of distinct language names
pub fn unique_languages<I>(runtimes: I) -> Vec<String>
where
    I: IntoIterator<Item = Runtime>,
{
    runtimes
        .into_iter()
        .map(|runtime| runtime.language)
        .filter(|language| !language.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One installed runtime as reported by `GET /runtimes`
///
/// Only the name matters here; `version`, `aliases` and other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Runtime {
    pub language: String,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<SourceFile<'a>>,
    stdin: &'a str,
}

#[derive(Serialize)]
struct SourceFile<'a> {
    content: &'a str,
}

// Every field is optional: absent and empty are different answers.
#[derive(Deserialize)]
struct ExecuteResponse {
    run: Option<Stage>,
    compile: Option<Stage>,
}

#[derive(Deserialize)]
struct Stage {
    output: Option<String>,
    code: Option<i64>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}
