//! Role checks for protected routes.
//!
//! Placed after the JWT middleware, this middleware compares the authenticated caller's role
//! against the role the route demands and rejects mismatches with a 403. Customer and partner
//! tokens are never interchangeable.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use bidfair_engine::db_types::Role;
use futures::{
    future::{ok, Ready},
    Future,
};

use crate::{
    auth::AuthContext,
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    required_role: Role,
}

impl AclMiddlewareFactory {
    pub fn new(required_role: Role) -> Self {
        AclMiddlewareFactory { required_role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_role: self.required_role, service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_role: Role,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let required_role = self.required_role;
        Box::pin(async move {
            let ctx = req.extensions().get::<AuthContext>().copied().ok_or_else(|| {
                log::warn!("No auth context found in request extensions");
                ServerError::from(AuthError::MissingToken)
            })?;
            if ctx.role == required_role {
                service.call(req).await
            } else {
                Err(ServerError::from(AuthError::InsufficientPermissions).into())
            }
        })
    }
}
