use crate::constants::HEADER_POWERED_BY;
use crate::core::config::CspConfig;
use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderName,
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::{rc::Rc, sync::Arc};

/// Applies the config's header rules to every matching response.
#[derive(Clone)]
pub struct CspMiddleware {
    config: Arc<CspConfig>,
}

impl CspMiddleware {
    #[inline]
    pub fn new(config: CspConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    #[inline]
    pub fn config(&self) -> Arc<CspConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
        }))
    }
}

pub struct CspMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<CspConfig>,
}

impl<S, B> Service<ServiceRequest> for CspMiddlewareService<S>
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
        let service = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            config.stats().increment_request_count();
            let path = req.path().to_owned();
            let http_req = req.request().clone();

            // Errors surfacing from inner middleware still get the policy.
            let mut res = match service.call(req).await {
                Ok(res) => res.map_into_left_body(),
                Err(err) => {
                    log::debug!("Rendering inner service error for {}: {}", path, err);
                    ServiceResponse::<BoxBody>::from_err(err, http_req).map_into_right_body()
                }
            };
            let headers = res.headers_mut();

            let mut applied = 0;
            for rule in config.rules().iter().filter(|rule| rule.matches(&path)) {
                for header in rule.headers() {
                    headers.insert(header.name().clone(), header.value().clone());
                    applied += 1;
                }
            }
            config.stats().add_headers_applied(applied);

            if !config.powered_by_header()
                && headers
                    .remove(HeaderName::from_static(HEADER_POWERED_BY))
                    .next()
                    .is_some()
            {
                config.stats().increment_powered_by_stripped_count();
            }

            Ok(res)
        })
    }
}

/// Middleware for the environment detected from the process.
#[inline]
pub fn csp_middleware_from_env() -> Result<CspMiddleware, crate::error::CspError> {
    CspConfig::from_env().map(CspMiddleware::new)
}

#[inline]
pub fn csp_middleware(config: CspConfig) -> CspMiddleware {
    CspMiddleware::new(config)
}
