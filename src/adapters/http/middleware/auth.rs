use actix_web::{
  Error, HttpMessage,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  error::ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  domain::access::{AccessPolicy, Capability, User},
};

/// Authentication middleware for the JSON API.
///
/// Extracts the bearer token from the Authorization header, resolves it
/// through the access policy (tokens are stored hashed, so only the SHA-256
/// digest leaves this function) and attaches the resolved `User` with their
/// capability set to request extensions. Capability checks then happen once
/// per handler via [`require`]; nothing below the HTTP boundary re-checks.
pub struct AuthMiddleware {
  policy: Arc<dyn AccessPolicy>,
}

impl AuthMiddleware {
  pub fn new(policy: Arc<dyn AccessPolicy>) -> Self {
    Self { policy }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      policy: self.policy.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  policy: Arc<dyn AccessPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
    let policy = self.policy.clone();

    Box::pin(async move {
      let token = match extract_bearer_token(&req) {
        Ok(token) => token,
        Err(e) => {
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      let user = match policy.resolve_token(&hash_token(&token)).await {
        Ok(Some(user)) => user,
        Ok(None) => {
          let (request, _) = req.into_parts();
          let response = ApiError::Auth(AuthErrorKind::UnknownToken)
            .error_response()
            .map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
        Err(e) => {
          let (request, _) = req.into_parts();
          let api_error: ApiError = e.into();
          let response = api_error.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(user);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_bearer_token(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get("Authorization")
    .and_then(|h| h.to_str().ok())
    .and_then(|s| s.strip_prefix("Bearer "))
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Extension trait to extract the authenticated user from the request
pub trait AuthUser {
  fn authenticated_user(&self) -> Result<User, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_user(&self) -> Result<User, ApiError> {
    self
      .extensions()
      .get::<User>()
      .cloned()
      .ok_or(ApiError::Auth(AuthErrorKind::UnknownToken))
  }
}

/// Capability guard: the single gate in front of each ledger operation.
pub fn require(user: &User, capability: Capability) -> Result<(), ApiError> {
  if user.can(capability) {
    Ok(())
  } else {
    tracing::warn!(
      user_id = %user.id,
      capability = %capability,
      "Capability denied"
    );
    Err(ApiError::Auth(AuthErrorKind::Forbidden(
      capability.as_str().to_string(),
    )))
  }
}
