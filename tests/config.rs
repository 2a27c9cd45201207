use deploy_csp::{policy_for, CspConfig, CspConfigBuilder, CspError, CspStats, Environment};
use std::sync::Arc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Development)
            .build()
            .unwrap();

        assert_eq!(config.environment(), Environment::Development);
        assert!(config.is_report_only());
        assert_eq!(config.route_source(), "/(.*)");
        assert!(!config.powered_by_header());
        assert_eq!(config.policy(), &policy_for(Environment::Development, true));
    }

    #[test]
    fn test_for_environment() {
        let config = CspConfig::for_environment(Environment::Preview).unwrap();

        assert_eq!(config.environment(), Environment::Preview);
        assert!(config.policy().render().contains("https://vercel.live/"));
    }

    #[test]
    fn test_report_uri_path_is_appended() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Production)
            .report_uri("/csp-report")
            .report_to("csp-endpoint")
            .build()
            .unwrap();

        assert_eq!(config.policy().report_uri(), Some("/csp-report"));
        assert!(config
            .policy()
            .render()
            .ends_with("frame-src 'none'; report-uri /csp-report; report-to csp-endpoint"));
    }

    #[test]
    fn test_report_uri_absolute_url() {
        let config = CspConfigBuilder::new()
            .environment(Environment::Production)
            .report_uri("https://reports.example.com/csp")
            .build()
            .unwrap();

        assert_eq!(
            config.policy().report_uri(),
            Some("https://reports.example.com/csp")
        );
    }

    #[test]
    fn test_report_uri_rejects_relative_and_foreign_schemes() {
        for uri in ["reports/csp", "ftp://example.com/csp", "javascript:alert(1)"] {
            let result = CspConfigBuilder::new()
                .environment(Environment::Production)
                .report_uri(uri)
                .build();

            assert!(
                matches!(result, Err(CspError::InvalidReportUri(_))),
                "accepted {uri}"
            );
        }
    }

    #[test]
    fn test_report_to_with_separator_is_rejected() {
        let result = CspConfigBuilder::new()
            .environment(Environment::Production)
            .report_to("group; script-src *")
            .build();

        assert!(matches!(result, Err(CspError::InvalidDirectiveValue(_))));
    }

    #[test]
    fn test_shared_stats_count_builds() {
        let stats = Arc::new(CspStats::new());

        for environment in Environment::ALL {
            CspConfigBuilder::new()
                .environment(environment)
                .with_stats(stats.clone())
                .build()
                .unwrap();
        }

        assert_eq!(stats.policy_build_count(), 3);

        stats.reset();
        assert_eq!(stats.policy_build_count(), 0);
        assert_eq!(stats.request_count(), 0);
    }

    #[test]
    fn test_clones_share_derived_rules() {
        let config = CspConfig::for_environment(Environment::Production).unwrap();
        let clone = config.clone();

        assert_eq!(config.rules(), clone.rules());
        assert!(Arc::ptr_eq(config.stats(), clone.stats()));
    }
}
