//! One HTTP exchange of a test and the checks run on its response.

use std::collections::HashMap;

use davtester_core::attributes::KeyedAttributes;
use davtester_verify::registry;
use davtester_verify::verifier::ResponseView;

use crate::context::RunContext;
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Entity tags seen during one suite execution, keyed by request URI.
pub type EtagMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifySpec {
    pub callback: String,
    pub args: KeyedAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodySpec {
    pub content_type: String,
    pub filepath: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub ruri: String,
    pub headers: Vec<(String, String)>,
    pub data: Option<BodySpec>,
    pub user: Option<String>,
    pub pswd: Option<String>,
    /// `false` sends no credentials even when a user is set.
    pub auth: bool,
    /// Send the cached entity tag for `ruri` as `If-Match`.
    pub if_match: bool,
    pub verifies: Vec<VerifySpec>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            ruri: "/".to_string(),
            headers: Vec::new(),
            data: None,
            user: None,
            pswd: None,
            auth: true,
            if_match: false,
            verifies: Vec::new(),
        }
    }
}

/// Outcome of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Passed,
    /// The exchange failed or a verifier rejected the response.
    Failed(String),
    /// The request could not be built or checked.
    Error(String),
}

impl RequestSpec {
    /// ## Summary
    /// Sends the request and runs every verifier against the response.
    ///
    /// ## Side Effects
    /// Records or forgets the entity tag for the request URI in `etags`.
    pub async fn execute<T: Transport>(
        &self,
        ctx: &RunContext<'_, T>,
        etags: &mut EtagMap,
        http_trace: bool,
    ) -> RequestOutcome {
        let uri = ctx.server.substitute(&self.ruri);
        let request = match self.build(ctx, &uri, etags) {
            Ok(request) => request,
            Err(details) => return RequestOutcome::Error(details),
        };

        if http_trace {
            tracing::info!(
                method = %request.method,
                url = %request.url,
                headers = ?request.headers,
                body = request.body.as_deref().unwrap_or_default(),
                "HTTP request"
            );
        }

        let response = match ctx.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, url = %request.url, "Request failed");
                return RequestOutcome::Failed(format!("    HTTP Request Failed: {e}"));
            }
        };

        if http_trace {
            tracing::info!(
                status = response.status,
                headers = ?response.headers,
                body = %response.body,
                "HTTP response"
            );
        }

        self.track_etag(&uri, &response, etags);
        self.check(ctx, &uri, &response)
    }

    fn build<T: Transport>(
        &self,
        ctx: &RunContext<'_, T>,
        uri: &str,
        etags: &EtagMap,
    ) -> Result<HttpRequest, String> {
        let server = &*ctx.server;
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), server.substitute(v)))
            .collect();

        if self.if_match {
            match etags.get(uri) {
                Some(etag) => headers.push(("If-Match".to_string(), etag.clone())),
                None => tracing::debug!(uri, "No cached ETag for If-Match"),
            }
        }

        let body = match &self.data {
            Some(data) => {
                let path = ctx.data_path(&server.substitute(&data.filepath));
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    format!("    Unable to read request data {}: {e}", path.display())
                })?;
                headers.push(("Content-Type".to_string(), data.content_type.clone()));
                Some(server.substitute(&raw))
            }
            None => None,
        };

        let credentials = match (&self.user, self.auth) {
            (Some(user), true) => Some((
                server.substitute(user),
                server.substitute(self.pswd.as_deref().unwrap_or_default()),
            )),
            _ => None,
        };

        Ok(HttpRequest {
            method: self.method.clone(),
            url: server.url_for(uri),
            headers,
            body,
            credentials,
        })
    }

    fn track_etag(&self, uri: &str, response: &HttpResponse, etags: &mut EtagMap) {
        if !(200..300).contains(&response.status) {
            return;
        }
        if self.method.eq_ignore_ascii_case("DELETE") {
            etags.remove(uri);
        } else if let Some(etag) = response.header("ETag") {
            etags.insert(uri.to_string(), etag.to_string());
        }
    }

    fn check<T: Transport>(&self, ctx: &RunContext<'_, T>, uri: &str, response: &HttpResponse) -> RequestOutcome {
        let verify_ctx = ctx.server.verify_context(ctx.data_dir);
        let view = ResponseView {
            uri,
            status: response.status,
            headers: &response.headers,
            body: &response.body,
        };

        let mut failures = Vec::new();
        for spec in &self.verifies {
            let verdict = registry::lookup(&spec.callback)
                .and_then(|verifier| verifier.verify(&verify_ctx, &view, &spec.args));
            match verdict {
                Ok(result) if result.is_ok() => {}
                Ok(result) => {
                    tracing::debug!(callback = %spec.callback, uri, "Verification failed");
                    failures.push(result.text());
                }
                Err(e) => {
                    tracing::warn!(callback = %spec.callback, error = %e, "Verifier error");
                    return RequestOutcome::Error(format!("    {e}"));
                }
            }
        }

        if failures.is_empty() {
            RequestOutcome::Passed
        } else {
            RequestOutcome::Failed(failures.join("\n"))
        }
    }
}
