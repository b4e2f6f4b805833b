//! Scripted in-memory transport for tests.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

type Responder =
    Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    responder: Responder,
}

#[derive(Default)]
struct Inner {
    routes: Vec<Route>,
    log: Vec<HttpRequest>,
}

/// An [`HttpTransport`] that answers from a route table and records every
/// request it sees.
///
/// Routes match on method and exact URL path (query and host ignored);
/// the first registered match wins. Unmatched requests get a 404.
/// Cloning shares the route table and the request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route answered by `responder`.
    pub fn on<F>(self, method: Method, path: &str, responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        self.push(method, path, Box::new(move |req| Ok(responder(req))))
    }

    /// Registers a route that always fails at the transport level.
    pub fn fail(self, method: Method, path: &str, error: TransportError) -> Self {
        self.push(method, path, Box::new(move |_| Err(error.clone())))
    }

    fn push(self, method: Method, path: &str, responder: Responder) -> Self {
        self.lock().routes.push(Route {
            method,
            path: path.to_string(),
            responder,
        });
        self
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().log.clone()
    }

    /// Requests whose URL path equals `path`, in order.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.lock()
            .log
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = path_of(&request.url);
        let mut inner = self.lock();
        inner.log.push(request.clone());
        match inner
            .routes
            .iter()
            .find(|r| r.method == request.method && r.path == path)
        {
            Some(route) => (route.responder)(&request),
            None => Ok(HttpResponse::new(404).with_body(format!("no route for {path}"))),
        }
    }
}

fn path_of(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.split('?').next().unwrap_or(url).to_string())
}

impl HttpTransport for MockTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        std::future::ready(self.respond(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn test_routes_match_method_and_path() {
        let mock = MockTransport::new()
            .on(Method::Get, "/v1/a", |_| HttpResponse::new(200))
            .on(Method::Post, "/v1/a", |_| HttpResponse::new(201));

        let get = block_on(mock.send(HttpRequest::get("https://h.test/v1/a?x=1"))).unwrap();
        let post = block_on(mock.send(HttpRequest::post("https://h.test/v1/a"))).unwrap();
        let miss = block_on(mock.send(HttpRequest::get("https://h.test/v1/b"))).unwrap();

        assert_eq!(get.status, 200);
        assert_eq!(post.status, 201);
        assert_eq!(miss.status, 404);
        assert_eq!(mock.requests().len(), 3);
        assert_eq!(mock.requests_to("/v1/a").len(), 2);
    }

    #[test]
    fn test_fail_route_returns_transport_error() {
        let mock = MockTransport::new().fail(Method::Get, "/down", TransportError::Timeout);
        let err = block_on(mock.send(HttpRequest::get("https://h.test/down"))).unwrap_err();
        assert_eq!(err, TransportError::Timeout);
    }

    #[test]
    fn test_clones_share_the_log() {
        let mock = MockTransport::new();
        let other = mock.clone();
        block_on(other.send(HttpRequest::get("https://h.test/x"))).unwrap();
        assert_eq!(mock.requests().len(), 1);
    }
}
