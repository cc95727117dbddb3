//! Bearer-token middleware for protected scopes.
//!
//! Validates the `Authorization: Bearer` header against the server's signing secret and inserts
//! an [`AuthContext`] into the request extensions. Downstream handlers read the caller's
//! identity from there; nothing after this middleware can alter it.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::{
    auth::{bearer_token, AuthContext, TokenValidator},
    errors::ServerError,
};

pub struct JwtMiddlewareFactory {
    validator: TokenValidator,
}

impl JwtMiddlewareFactory {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtMiddlewareService { validator: self.validator.clone(), service: Rc::new(service) })
    }
}

pub struct JwtMiddlewareService<S> {
    validator: TokenValidator,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = self.validator.clone();
        Box::pin(async move {
            let token = bearer_token(req.request()).map_err(ServerError::from)?;
            let claims = validator.validate(&token).map_err(ServerError::from)?;
            req.extensions_mut().insert(AuthContext::from(&claims));
            service.call(req).await
        })
    }
}
