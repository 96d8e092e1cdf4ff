//! [`Transport`] over salvo's in-process test client.

use davtester_runner::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use salvo::Service;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody};
use salvo::test::{RequestBuilder, ResponseExt};

/// Sends harness requests straight into a salvo [`Service`].
pub struct SalvoTransport {
    service: Service,
}

impl SalvoTransport {
    #[must_use]
    pub const fn new(service: Service) -> Self {
        Self { service }
    }
}

impl Transport for SalvoTransport {
    #[tracing::instrument(skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|_| TransportError::InvalidMethod(request.method.clone()))?;

        let mut builder = RequestBuilder::new(&request.url, method);
        for (name, value) in &request.headers {
            match HeaderName::try_from(name.as_str()) {
                Ok(header) => builder = builder.add_header(header, value.as_str(), false),
                Err(e) => return Err(TransportError::Failed(format!("invalid header {name}: {e}"))),
            }
        }
        if let Some((user, password)) = &request.credentials {
            builder = builder.basic_auth(user, Some(password));
        }
        if let Some(body) = &request.body {
            builder = builder.body(ReqBody::Once(body.clone().into_bytes().into()));
        }

        let mut response = builder.send(&self.service).await;
        let status = response.status_code.map_or(500, |s| s.as_u16());
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = response
            .take_string()
            .await
            .map_err(|e| TransportError::Failed(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
