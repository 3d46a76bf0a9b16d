use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{
        claims::UserRole,
        validator::{TokenValidator, Verdict},
    },
    errors::{AppError, ErrorResponse},
};

/// Identity attached to a request after the gate accepts its access token.
/// Request-scoped: set once by the gate, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub role: UserRole,
}

/// The request gate. Requests without a bearer credential pass through
/// unauthenticated; requests with one are validated and either annotated
/// with an [`AuthenticatedUser`] or rejected with a structured 401 before
/// any handler runs.
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = match req.headers().get(AUTHORIZATION) {
                None => None,
                Some(value) => match value.to_str() {
                    Ok(header) => header.strip_prefix("Bearer ").map(|t| t.to_owned()),
                    Err(_) => {
                        // A credential was presented but cannot even be
                        // decoded; that is a rejection, not anonymity.
                        log::debug!("Request rejected, undecodable authorization header");
                        let response = HttpResponse::Unauthorized()
                            .json(ErrorResponse::new("invalid token format", "INVALID_TOKEN"));
                        return Ok(req.into_response(response).map_into_right_body());
                    }
                },
            };

            let token = match token {
                Some(token) => token,
                None => {
                    // No bearer credential: continue unauthenticated and let
                    // the route decide whether anonymous access is acceptable.
                    let res = service.call(req).await?;
                    return Ok(res.map_into_left_body());
                }
            };

            let validator = req
                .app_data::<web::Data<TokenValidator>>()
                .ok_or_else(|| ErrorInternalServerError("Token validator not configured"))?;

            match validator.validate_access(&token).await {
                Verdict::Valid { subject, role } => {
                    // Idempotent under nested invocation: never overwrite an
                    // identity a prior gate already attached.
                    if req.extensions().get::<AuthenticatedUser>().is_none() {
                        req.extensions_mut().insert(AuthenticatedUser { subject, role });
                    }

                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Verdict::Expired { reason } => {
                    log::debug!("Request rejected, token expired: {}", reason);
                    let response = HttpResponse::Unauthorized()
                        .json(ErrorResponse::new(reason, "TOKEN_EXPIRED"));
                    Ok(req.into_response(response).map_into_right_body())
                }
                Verdict::Invalid { reason } => {
                    log::debug!("Request rejected, invalid token: {}", reason);
                    let response = HttpResponse::Unauthorized()
                        .json(ErrorResponse::new(reason, "INVALID_TOKEN"));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(identity)
    }
}
