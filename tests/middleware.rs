use actix_web::{
    dev::ServiceResponse, error, http::StatusCode, test, web, App, HttpResponse, Result,
};
use deploy_csp::{csp_middleware, header_string, CspConfigBuilder, Environment};

async fn page() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .insert_header(("x-powered-by", "Next.js"))
        .content_type("text/html")
        .body("<!DOCTYPE html><html><body>ok</body></html>"))
}

async fn api() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "success" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_header_applied_to_every_route() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Production)
            .build()
            .unwrap();
        let stats = config.stats().clone();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/", web::get().to(page))
                .route("/api/status", web::get().to(api)),
        )
        .await;

        for uri in ["/", "/api/status", "/missing"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;

            let value = resp
                .headers()
                .get("content-security-policy-report-only")
                .unwrap_or_else(|| panic!("CSP header missing on {uri}"));
            assert_eq!(
                value.to_str().unwrap(),
                header_string(Environment::Production, true)
            );
            assert!(resp.headers().get("content-security-policy").is_none());
        }

        assert_eq!(stats.request_count(), 3);
        assert_eq!(stats.header_applied_count(), 3);
    }

    #[actix_web::test]
    async fn test_enforced_header() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Preview)
            .report_only(false)
            .build()
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/", web::get().to(page)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let value = resp
            .headers()
            .get("content-security-policy")
            .expect("CSP header not found")
            .to_str()
            .unwrap()
            .to_owned();
        assert!(value.contains("https://vercel.live/"));
        assert!(value.contains("upgrade-insecure-requests"));
        assert!(resp
            .headers()
            .get("content-security-policy-report-only")
            .is_none());
    }

    #[actix_web::test]
    async fn test_header_overrides_handler_value() {
        async fn handler_with_csp() -> HttpResponse {
            HttpResponse::Ok()
                .insert_header(("content-security-policy-report-only", "default-src *"))
                .finish()
        }

        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .build()
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/", web::get().to(handler_with_csp)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        let values: Vec<_> = resp
            .headers()
            .get_all("content-security-policy-report-only")
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(
            values[0].to_str().unwrap(),
            header_string(Environment::Development, true)
        );
    }

    #[actix_web::test]
    async fn test_unmatched_routes_are_untouched() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .route_source("/app/(.*)")
            .build()
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/app/home", web::get().to(page))
                .route("/api/status", web::get().to(api)),
        )
        .await;

        let req = test::TestRequest::get().uri("/app/home").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp
            .headers()
            .contains_key("content-security-policy-report-only"));

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(!resp
            .headers()
            .contains_key("content-security-policy-report-only"));
    }

    #[actix_web::test]
    async fn test_powered_by_header_stripped() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .build()
            .unwrap();
        let stats = config.stats().clone();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/", web::get().to(page)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.headers().get("x-powered-by").is_none());
        assert_eq!(stats.powered_by_stripped_count(), 1);
    }

    #[actix_web::test]
    async fn test_powered_by_header_kept_when_enabled() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .powered_by_header(true)
            .build()
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(csp_middleware(config))
                .route("/", web::get().to(page)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get("x-powered-by").unwrap().to_str().unwrap(),
            "Next.js"
        );
    }

    #[actix_web::test]
    async fn test_header_applied_to_inner_service_errors() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Production)
            .build()
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap_fn(|_req, _srv| async {
                    Err::<ServiceResponse, _>(error::ErrorServiceUnavailable("maintenance"))
                })
                .wrap(csp_middleware(config))
                .route("/", web::get().to(page)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            resp.headers()
                .get("content-security-policy-report-only")
                .unwrap()
                .to_str()
                .unwrap(),
            header_string(Environment::Production, true)
        );
    }
}
