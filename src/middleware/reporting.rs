use crate::constants::{DEFAULT_MAX_REPORT_SIZE, DEFAULT_REPORT_PATH};
use crate::core::config::{same_origin_report_path, CspConfig};
use crate::core::environment::Environment;
use crate::error::CspError;
use crate::monitoring::report::CspViolationReport;
use crate::monitoring::stats::CspStats;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpResponse,
};
use bytes::BytesMut;
use futures::future::{ready, LocalBoxFuture, Ready};
use futures::StreamExt;
use std::{borrow::Cow, rc::Rc, sync::Arc};

type ViolationHandler = Arc<dyn Fn(Environment, &CspViolationReport) + Send + Sync + 'static>;

fn log_violation(environment: Environment, report: &CspViolationReport) {
    log::warn!("CSP violation in {} environment: {}", environment, report);
}

/// Serves the violation report endpoint and passes everything else through.
///
/// The endpoint path follows the config's `report-uri` when that is a
/// same-origin path, and `/csp-report` otherwise.
#[derive(Clone)]
pub struct CspReportingMiddleware {
    handler: ViolationHandler,
    environment: Environment,
    report_path: Cow<'static, str>,
    max_report_size: usize,
    stats: Arc<CspStats>,
}

impl CspReportingMiddleware {
    pub fn new(config: &CspConfig) -> Self {
        let report_path = config
            .policy()
            .report_uri()
            .and_then(same_origin_report_path)
            .map_or(Cow::Borrowed(DEFAULT_REPORT_PATH), Cow::Owned);

        Self {
            handler: Arc::new(log_violation),
            environment: config.environment(),
            report_path,
            max_report_size: DEFAULT_MAX_REPORT_SIZE,
            stats: config.stats().clone(),
        }
    }

    /// Replaces the default logging handler.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Environment, &CspViolationReport) + Send + Sync + 'static,
    {
        let handler: ViolationHandler = Arc::new(handler);
        self.handler = handler;
        self
    }

    #[inline]
    pub fn with_report_path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.report_path = path.into();
        self
    }

    #[inline]
    pub fn with_max_report_size(mut self, size: usize) -> Self {
        self.max_report_size = size;
        self
    }

    #[inline]
    pub fn report_path(&self) -> &str {
        &self.report_path
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspReportingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspReportingMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspReportingMiddlewareService {
            service: Rc::new(service),
            inner: self.clone(),
        }))
    }
}

pub struct CspReportingMiddlewareService<S> {
    service: Rc<S>,
    inner: CspReportingMiddleware,
}

impl<S, B> Service<ServiceRequest> for CspReportingMiddlewareService<S>
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
        if req.method() != Method::POST || req.path() != self.inner.report_path {
            let service = self.service.clone();
            return Box::pin(async move {
                let res = service.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        let inner = self.inner.clone();
        Box::pin(async move {
            let (http_req, mut payload) = req.into_parts();
            let result = read_report_body(&mut payload, inner.max_report_size)
                .await
                .and_then(|body| handle_report(&inner, &body));

            let response = match result {
                Ok(()) => HttpResponse::NoContent().finish(),
                Err(e) => {
                    inner.stats.increment_rejected_report_count();
                    log::error!("Failed to process CSP violation report: {}", e);
                    HttpResponse::from_error(e)
                }
            };

            Ok(ServiceResponse::new(
                http_req,
                response.map_into_right_body(),
            ))
        })
    }
}

/// Buffers the request body, stopping as soon as it passes `limit` bytes.
async fn read_report_body(payload: &mut Payload, limit: usize) -> Result<BytesMut, CspError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| CspError::ReportError(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(CspError::ReportError(format!(
                "report exceeds limit of {} bytes",
                limit
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn handle_report(inner: &CspReportingMiddleware, body: &[u8]) -> Result<(), CspError> {
    let report = CspViolationReport::from_body(body)
        .map_err(|e| CspError::ReportError(e.to_string()))?;

    match report {
        Some(report) => {
            inner.stats.increment_violation_count();
            (inner.handler)(inner.environment, &report);
        }
        None => log::debug!("CSP violation report missing 'csp-report' field"),
    }

    Ok(())
}

#[inline]
pub fn csp_reporting_middleware(config: &CspConfig) -> CspReportingMiddleware {
    CspReportingMiddleware::new(config)
}
