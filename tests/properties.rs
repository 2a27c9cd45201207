use deploy_csp::{header_string, CspPolicyBuilder, Environment, Source};
use proptest::prelude::*;

fn environment() -> impl Strategy<Value = Environment> {
    prop_oneof![
        Just(Environment::Development),
        Just(Environment::Preview),
        Just(Environment::Production),
    ]
}

proptest! {
    #[test]
    fn derivation_is_byte_identical(env in environment(), report_only in any::<bool>()) {
        prop_assert_eq!(header_string(env, report_only), header_string(env, report_only));
    }

    #[test]
    fn rendering_never_contains_newlines(env in environment(), report_only in any::<bool>()) {
        let rendered = header_string(env, report_only);
        prop_assert!(!rendered.contains('\n'));
        prop_assert!(!rendered.contains('\r'));
    }

    #[test]
    fn classification_is_total(vercel in proptest::option::of(".*"), node in proptest::option::of(".*")) {
        let env = Environment::from_vars(vercel.as_deref(), node.as_deref());
        let expected = match (vercel.as_deref(), node.as_deref()) {
            (Some("preview"), _) => Environment::Preview,
            (_, Some("production")) => Environment::Production,
            _ => Environment::Development,
        };
        prop_assert_eq!(env, expected);
    }

    #[test]
    fn validated_policies_form_header_values(host in "\\PC{1,40}") {
        let result = CspPolicyBuilder::new()
            .default_src([Source::Self_])
            .connect_src([Source::Self_, Source::host(host)])
            .build();

        if let Ok(policy) = result {
            prop_assert!(policy.header_value().is_ok());
            prop_assert!(!policy.render().contains('\n'));
        }
    }
}
