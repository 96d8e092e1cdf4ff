//! A small in-memory WebDAV server for exercising the harness end to end.
//!
//! It understands enough of `PUT`, `GET`, `DELETE`, `MKCOL` and `PROPFIND`
//! to act as a server under test: entity tags, `If-Match` and
//! `If-None-Match: *` preconditions, and a depth-limited multistatus.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use salvo::basic_auth::{BasicAuth, BasicAuthValidator};
use salvo::http::StatusCode;
use salvo::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Collection,
    Resource {
        content_type: String,
        body: String,
        etag: String,
    },
}

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logged {
    pub method: String,
    pub path: String,
    pub authorized: bool,
}

#[derive(Debug, Default)]
struct State {
    entries: BTreeMap<String, Entry>,
    next_etag: u64,
    log: Vec<Logged>,
}

struct Reply {
    status: StatusCode,
    etag: Option<String>,
    body: Option<(String, String)>,
}

impl Reply {
    const fn status(status: StatusCode) -> Self {
        Self {
            status,
            etag: None,
            body: None,
        }
    }
}

/// Cloneable handle to the shared server state.
#[derive(Debug, Clone, Default)]
pub struct FakeDav {
    state: Arc<Mutex<State>>,
}

impl FakeDav {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a service routing every path to this server. With
    /// `credentials`, requests without matching basic credentials get 401.
    #[must_use]
    pub fn service(&self, credentials: Option<(&str, &str)>) -> Service {
        let dav = Router::with_path("{**rest}").goal(self.clone());
        let router = match credentials {
            Some((user, password)) => Router::new()
                .hoop(BasicAuth::new(FixedCredentials {
                    user: user.to_string(),
                    password: password.to_string(),
                }))
                .push(dav),
            None => Router::new().push(dav),
        };
        Service::new(router)
    }

    /// Every request handled so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Logged> {
        self.lock().log.clone()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.lock().entries.contains_key(path)
    }

    /// Stored body of a resource.
    #[must_use]
    pub fn body(&self, path: &str) -> Option<String> {
        match self.lock().entries.get(path) {
            Some(Entry::Resource { body, .. }) => Some(body.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                self.state.clear_poison();
                poisoned.into_inner()
            }
        }
    }
}

impl State {
    fn etag(&mut self) -> String {
        self.next_etag += 1;
        format!("\"{}\"", self.next_etag)
    }

    fn put(
        &mut self,
        path: &str,
        content_type: String,
        body: String,
        if_match: Option<&str>,
        if_none_match: Option<&str>,
    ) -> Reply {
        let current = match self.entries.get(path) {
            Some(Entry::Collection) => return Reply::status(StatusCode::METHOD_NOT_ALLOWED),
            Some(Entry::Resource { etag, .. }) => Some(etag.clone()),
            None => None,
        };

        if if_none_match == Some("*") && current.is_some() {
            return Reply::status(StatusCode::PRECONDITION_FAILED);
        }
        if let Some(expected) = if_match
            && current.as_deref() != Some(expected)
            && !(expected == "*" && current.is_some())
        {
            return Reply::status(StatusCode::PRECONDITION_FAILED);
        }

        let etag = self.etag();
        self.entries.insert(
            path.to_string(),
            Entry::Resource {
                content_type,
                body,
                etag: etag.clone(),
            },
        );
        Reply {
            status: if current.is_some() {
                StatusCode::NO_CONTENT
            } else {
                StatusCode::CREATED
            },
            etag: Some(etag),
            body: None,
        }
    }

    fn get(&self, path: &str) -> Reply {
        match self.entries.get(path) {
            Some(Entry::Resource {
                content_type,
                body,
                etag,
            }) => Reply {
                status: StatusCode::OK,
                etag: Some(etag.clone()),
                body: Some((content_type.clone(), body.clone())),
            },
            Some(Entry::Collection) => Reply::status(StatusCode::METHOD_NOT_ALLOWED),
            None => Reply::status(StatusCode::NOT_FOUND),
        }
    }

    fn delete(&mut self, path: &str) -> Reply {
        if self.entries.remove(path).is_none() {
            return Reply::status(StatusCode::NOT_FOUND);
        }
        let prefix = collection_prefix(path);
        self.entries.retain(|k, _| !k.starts_with(&prefix));
        Reply::status(StatusCode::NO_CONTENT)
    }

    fn mkcol(&mut self, path: &str) -> Reply {
        if self.entries.contains_key(path) {
            return Reply::status(StatusCode::METHOD_NOT_ALLOWED);
        }
        self.entries.insert(path.to_string(), Entry::Collection);
        Reply::status(StatusCode::CREATED)
    }

    fn propfind(&self, path: &str, depth_one: bool) -> Reply {
        let Some(entry) = self.entries.get(path) else {
            return Reply::status(StatusCode::NOT_FOUND);
        };

        let mut body = String::from(r#"<?xml version="1.0" encoding="utf-8"?><D:multistatus xmlns:D="DAV:">"#);
        push_response(&mut body, path, entry);
        if depth_one && *entry == Entry::Collection {
            let prefix = collection_prefix(path);
            for (child, entry) in self.entries.range(prefix.clone()..) {
                if !child.starts_with(&prefix) {
                    break;
                }
                if !child[prefix.len()..].trim_end_matches('/').contains('/') {
                    push_response(&mut body, child, entry);
                }
            }
        }
        body.push_str("</D:multistatus>");

        Reply {
            status: StatusCode::MULTI_STATUS,
            etag: None,
            body: Some(("application/xml; charset=utf-8".to_string(), body)),
        }
    }
}

fn collection_prefix(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

fn push_response(out: &mut String, href: &str, entry: &Entry) {
    let props = match entry {
        Entry::Collection => "<D:resourcetype><D:collection/></D:resourcetype>".to_string(),
        Entry::Resource { etag, .. } => format!("<D:resourcetype/><D:getetag>{etag}</D:getetag>"),
    };
    out.push_str(&format!(
        "<D:response><D:href>{href}</D:href><D:propstat><D:prop>{props}</D:prop>\
         <D:status>HTTP/1.1 200 OK</D:status></D:propstat></D:response>"
    ));
}

fn header(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[salvo::async_trait]
impl Handler for FakeDav {
    #[tracing::instrument(skip_all, fields(method = %req.method(), path = %req.uri().path()))]
    async fn handle(&self, req: &mut Request, _depot: &mut Depot, res: &mut Response, _ctrl: &mut FlowCtrl) {
        let path = req.uri().path().to_string();
        let method = req.method().as_str().to_string();
        let authorized = req.headers().contains_key("Authorization");
        let if_match = header(req, "If-Match");
        let if_none_match = header(req, "If-None-Match");
        let depth_one = header(req, "Depth").as_deref() == Some("1");
        let content_type = header(req, "Content-Type").unwrap_or_else(|| "text/plain".to_string());

        let body = match req.payload().await {
            Ok(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read request body");
                res.status_code(StatusCode::BAD_REQUEST);
                return;
            }
        };

        let reply = {
            let mut state = self.lock();
            state.log.push(Logged {
                method: method.clone(),
                path: path.clone(),
                authorized,
            });
            match method.as_str() {
                "PUT" => state.put(&path, content_type, body, if_match.as_deref(), if_none_match.as_deref()),
                "GET" => state.get(&path),
                "DELETE" => state.delete(&path),
                "MKCOL" => state.mkcol(&path),
                "PROPFIND" => state.propfind(&path, depth_one),
                _ => Reply::status(StatusCode::METHOD_NOT_ALLOWED),
            }
        };

        tracing::debug!(status = %reply.status, "Handled");
        res.status_code(reply.status);
        if let Some(etag) = reply.etag
            && res.add_header("ETag", etag, true).is_err()
        {
            tracing::warn!("Failed to set ETag header");
        }
        if let Some((content_type, body)) = reply.body {
            if res.add_header("Content-Type", content_type, true).is_err() {
                tracing::warn!("Failed to set Content-Type header");
            }
            res.body(body);
        }
    }
}

struct FixedCredentials {
    user: String,
    password: String,
}

impl BasicAuthValidator for FixedCredentials {
    async fn validate(&self, username: &str, password: &str, _depot: &mut Depot) -> bool {
        username == self.user && password == self.password
    }
}
