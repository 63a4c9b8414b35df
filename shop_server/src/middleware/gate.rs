//! Authorization gate for the storefront routes.
//!
//! A [`Gate`] is an ordered list of [`Guard`]s that runs before a route's handler. Every guard either allows the
//! request through to the next guard or rejects it, and the first rejection ends the evaluation. A rejected request
//! never reaches the handler. Exactly one of three things happens: the handler runs, a 401 is returned, or a 403 is
//! returned.
//!
//! The session token is read from the `token` header, in the form `Bearer <jwt>`. When a gate lets a request
//! through, the verified [`SessionClaims`] are stored in the request extensions so that handlers can extract them.
use std::{pin::Pin, rc::Rc};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::{SessionClaims, TokenIssuer},
    errors::ServerError,
};

pub const TOKEN_HEADER: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The request must carry a valid session token.
    Authenticate,
    /// The caller's id must equal the named path parameter, unless the caller is an admin.
    SelfOrAdmin(String),
    /// The caller must be an admin.
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No session token was supplied
    Unauthenticated,
    /// A token was supplied but it is forged, malformed or expired
    InvalidToken,
    /// The caller is known but lacks the privilege for this resource
    Forbidden,
}

impl From<Rejection> for ServerError {
    fn from(r: Rejection) -> Self {
        match r {
            Rejection::Unauthenticated => ServerError::Unauthenticated,
            Rejection::InvalidToken => ServerError::InvalidToken,
            Rejection::Forbidden => ServerError::InsufficientPermissions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(Rejection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    guards: Vec<Guard>,
}

impl Gate {
    pub fn new(guards: Vec<Guard>) -> Self {
        Self { guards }
    }

    /// Any logged-in user
    pub fn authenticated() -> Self {
        Self::new(vec![Guard::Authenticate])
    }

    /// The user named by the `param` path segment, or an admin
    pub fn self_or_admin(param: &str) -> Self {
        Self::new(vec![Guard::Authenticate, Guard::SelfOrAdmin(param.to_string())])
    }

    /// Admins only
    pub fn admin() -> Self {
        Self::new(vec![Guard::Authenticate, Guard::AdminOnly])
    }

    /// Runs the guards in order against a request.
    ///
    /// `token_header` is the raw value of the token header, `path_param` looks up a path parameter by name and
    /// `verify` checks a bare JWT. Returns the verified claims if the request may proceed. A gate without an
    /// `Authenticate` guard lets anonymous requests through with `None`.
    pub fn evaluate<P, V>(
        &self,
        token_header: Option<&str>,
        path_param: P,
        verify: V,
    ) -> Result<Option<SessionClaims>, Rejection>
    where
        P: Fn(&str) -> Option<String>,
        V: Fn(&str) -> Option<SessionClaims>,
    {
        let mut claims = None;
        for guard in &self.guards {
            let verdict = match guard {
                Guard::Authenticate => match authenticate(token_header, &verify) {
                    Ok(c) => {
                        claims = Some(c);
                        Verdict::Allow
                    },
                    Err(rejection) => Verdict::Deny(rejection),
                },
                Guard::SelfOrAdmin(param) => match &claims {
                    Some(c) if c.is_admin => Verdict::Allow,
                    Some(c) if path_param(param.as_str()).is_some_and(|v| v == c.id.to_string()) => Verdict::Allow,
                    Some(_) => Verdict::Deny(Rejection::Forbidden),
                    None => Verdict::Deny(Rejection::Unauthenticated),
                },
                Guard::AdminOnly => match &claims {
                    Some(c) if c.is_admin => Verdict::Allow,
                    Some(_) => Verdict::Deny(Rejection::Forbidden),
                    None => Verdict::Deny(Rejection::Unauthenticated),
                },
            };
            if let Verdict::Deny(rejection) = verdict {
                trace!("🔐️ {guard:?} rejected the request with {rejection:?}");
                return Err(rejection);
            }
        }
        Ok(claims)
    }
}

fn authenticate<V>(token_header: Option<&str>, verify: &V) -> Result<SessionClaims, Rejection>
where V: Fn(&str) -> Option<SessionClaims> {
    let header = token_header.ok_or(Rejection::Unauthenticated)?;
    // The token is the second word of the header, after the scheme
    let token = header.split_whitespace().nth(1).ok_or(Rejection::InvalidToken)?;
    verify(token).ok_or(Rejection::InvalidToken)
}

pub struct GateMiddlewareFactory {
    gate: Gate,
}

impl GateMiddlewareFactory {
    pub fn new(gate: Gate) -> Self {
        GateMiddlewareFactory { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GateMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = GateMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(GateMiddlewareService { gate: Rc::new(self.gate.clone()), service: Rc::new(service) })
    }
}

pub struct GateMiddlewareService<S> {
    gate: Rc<Gate>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GateMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Rc::clone(&self.gate);
        Box::pin(async move {
            let issuer = match req.app_data::<web::Data<TokenIssuer>>() {
                Some(issuer) => issuer.clone(),
                None => {
                    error!("🔐️ No token issuer has been registered with the app. Rejecting the request.");
                    let err = ServerError::InitializeError("Token issuer is not configured".to_string());
                    return Ok(req.error_response(err).map_into_right_body());
                },
            };
            let header = req.headers().get(TOKEN_HEADER).map(|v| v.to_str().unwrap_or_default().to_string());
            let outcome = gate.evaluate(
                header.as_deref(),
                |name| req.match_info().get(name).map(|s| s.to_string()),
                |token| issuer.verify(token).ok(),
            );
            match outcome {
                Ok(claims) => {
                    if let Some(claims) = claims {
                        trace!("🔐️ User #{} passed the gate for {}", claims.id, req.path());
                        req.extensions_mut().insert(claims);
                    }
                    service.call(req).await.map(|res| res.map_into_left_body())
                },
                Err(rejection) => {
                    debug!("🔐️ Request to {} rejected: {rejection:?}", req.path());
                    Ok(req.error_response(ServerError::from(rejection)).map_into_right_body())
                },
            }
        })
    }
}
