use deploy_csp::{
    header_string, rules_to_json, CspConfigBuilder, CspError, Environment, RoutePattern,
};

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/(.*)", "/" => true ; "wildcard root")]
    #[test_case("/(.*)", "/blog/post-1" => true ; "wildcard nested")]
    #[test_case("/about", "/about" => true ; "literal")]
    #[test_case("/about", "/about/team" => false ; "literal is anchored")]
    #[test_case("/blog/:slug", "/blog/hello" => true ; "param")]
    #[test_case("/blog/:slug", "/blog/hello/world" => false ; "param is one segment")]
    #[test_case("/docs/:path(.*)", "/docs/a/b/c" => true ; "param with custom group")]
    #[test_case("/file.txt", "/fileXtxt" => false ; "dot is literal")]
    fn test_route_pattern_matches(source: &'static str, path: &str) -> bool {
        RoutePattern::new(source).unwrap().matches(path)
    }

    #[test_case("(.*)" ; "missing leading slash")]
    #[test_case("/(.*" ; "unclosed group")]
    #[test_case("/.*)" ; "unmatched close")]
    #[test_case("/([a-)" ; "bad regex")]
    fn test_route_pattern_rejects(source: &'static str) {
        assert!(matches!(
            RoutePattern::new(source),
            Err(CspError::InvalidRoutePattern(_))
        ));
    }

    #[test]
    fn test_single_rule_for_every_route() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Production)
            .build()
            .unwrap();

        let rules = config.rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].source().source(), "/(.*)");
        assert_eq!(rules[0].headers().len(), 1);

        let header = &rules[0].headers()[0];
        assert_eq!(header.key(), "Content-Security-Policy-Report-Only");
        assert_eq!(header.name().as_str(), "content-security-policy-report-only");
        assert_eq!(
            header.value().to_str().unwrap(),
            header_string(Environment::Production, true)
        );
    }

    #[test]
    fn test_enforced_rule_uses_enforcing_header() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .report_only(false)
            .build()
            .unwrap();

        let header = &config.rules()[0].headers()[0];
        assert_eq!(header.key(), "Content-Security-Policy");
        assert!(header
            .value()
            .to_str()
            .unwrap()
            .contains("upgrade-insecure-requests"));
    }

    #[test]
    fn test_rules_serialize_as_headers_export() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Preview)
            .build()
            .unwrap();

        let json = rules_to_json(config.rules()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{
                "source": "/(.*)",
                "headers": [{
                    "key": "Content-Security-Policy-Report-Only",
                    "value": header_string(Environment::Preview, true),
                }],
            }])
        );
    }

    #[test]
    fn test_custom_route_source() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .route_source("/app/(.*)")
            .build()
            .unwrap();

        let rule = &config.rules()[0];
        assert!(rule.matches("/app/settings"));
        assert!(!rule.matches("/api/health"));
    }

    #[test]
    fn test_invalid_route_source_fails_build() {
        let result = CspConfigBuilder::new()
            .environment(Environment::Development)
            .route_source("/(unclosed")
            .build();

        assert!(matches!(result, Err(CspError::InvalidRoutePattern(_))));
    }
}
