//! Route registration that records documentation alongside each route.
//!
//! A route cannot be added to the server without also describing it, so the
//! OpenAPI document always lists exactly the routes that are served.

use actix_web::{FromRequest, Handler, Responder, Route, Scope, web};

use scribe_shared::{Shape, shapes};

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn route(self) -> Route {
        match self {
            Verb::Get => web::get(),
            Verb::Post => web::post(),
            Verb::Put => web::put(),
            Verb::Delete => web::delete(),
        }
    }
}

/// What a successful response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    One(&'static Shape),
    Many(&'static Shape),
}

/// Documentation for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDoc {
    pub verb: Verb,
    /// Full path in actix syntax, e.g. `/api/blogs/{id}`.
    pub path: String,
    pub summary: &'static str,
    pub tag: &'static str,
    pub secured: bool,
    pub params: Option<&'static Shape>,
    pub body: Option<&'static Shape>,
    pub status: u16,
    pub payload: Payload,
    /// Wrapped in `{ success, data }`.
    pub enveloped: bool,
    /// Failure statuses beyond those implied by auth, params and body.
    pub errors: &'static [u16],
}

/// Documentation for a route before it is attached to a scope.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    verb: Verb,
    path: &'static str,
    summary: &'static str,
    secured: bool,
    params: Option<&'static Shape>,
    body: Option<&'static Shape>,
    status: u16,
    payload: Payload,
    enveloped: bool,
    errors: &'static [u16],
}

impl Endpoint {
    /// Routes answer with a `MessageResponse` unless told otherwise.
    fn new(verb: Verb, path: &'static str, summary: &'static str) -> Self {
        Self {
            verb,
            path,
            summary,
            secured: false,
            params: None,
            body: None,
            status: 200,
            payload: Payload::One(&shapes::MESSAGE),
            enveloped: true,
            errors: &[],
        }
    }

    pub fn get(path: &'static str, summary: &'static str) -> Self {
        Self::new(Verb::Get, path, summary)
    }

    pub fn post(path: &'static str, summary: &'static str) -> Self {
        Self::new(Verb::Post, path, summary)
    }

    pub fn put(path: &'static str, summary: &'static str) -> Self {
        Self::new(Verb::Put, path, summary)
    }

    pub fn delete(path: &'static str, summary: &'static str) -> Self {
        Self::new(Verb::Delete, path, summary)
    }

    /// Requires a bearer token.
    pub fn secured(mut self) -> Self {
        self.secured = true;
        self
    }

    /// Path parameters.
    pub fn params(mut self, shape: &'static Shape) -> Self {
        self.params = Some(shape);
        self
    }

    /// JSON request body.
    pub fn body(mut self, shape: &'static Shape) -> Self {
        self.body = Some(shape);
        self
    }

    pub fn returns(mut self, shape: &'static Shape) -> Self {
        self.payload = Payload::One(shape);
        self
    }

    pub fn returns_list(mut self, shape: &'static Shape) -> Self {
        self.payload = Payload::Many(shape);
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Response body is sent as-is, without the success envelope.
    pub fn raw(mut self) -> Self {
        self.enveloped = false;
        self
    }

    pub fn errors(mut self, statuses: &'static [u16]) -> Self {
        self.errors = statuses;
        self
    }
}

/// An actix scope that documents every route added to it.
pub struct DocumentedScope {
    prefix: &'static str,
    tag: &'static str,
    scope: Scope,
    docs: Vec<RouteDoc>,
}

impl DocumentedScope {
    pub fn new(prefix: &'static str, tag: &'static str) -> Self {
        Self {
            prefix,
            tag,
            scope: web::scope(prefix),
            docs: Vec::new(),
        }
    }

    /// Register `handler` and record `endpoint` in one step.
    pub fn route<F, Args>(mut self, endpoint: Endpoint, handler: F) -> Self
    where
        F: Handler<Args>,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        self.scope = self
            .scope
            .route(endpoint.path, endpoint.verb.route().to(handler));

        self.docs.push(RouteDoc {
            verb: endpoint.verb,
            path: format!("{}{}", self.prefix, endpoint.path),
            summary: endpoint.summary,
            tag: self.tag,
            secured: endpoint.secured,
            params: endpoint.params,
            body: endpoint.body,
            status: endpoint.status,
            payload: endpoint.payload,
            enveloped: endpoint.enveloped,
            errors: endpoint.errors,
        });
        self
    }

    pub fn docs(&self) -> &[RouteDoc] {
        &self.docs
    }

    /// Split into the actix scope and the recorded documentation.
    pub fn finish(self) -> (Scope, Vec<RouteDoc>) {
        (self.scope, self.docs)
    }
}
