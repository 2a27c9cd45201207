use anyhow::Context;
use clap::{Parser, ValueEnum};
use deploy_csp::constants::{DEFAULT_ROUTE_SOURCE, ENV_NODE, ENV_VERCEL};
use deploy_csp::{rules_to_json, CspConfigBuilder, Environment};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// The headers export as JSON
    Json,
    /// `Name: value` lines
    Header,
}

/// Print the Content-Security-Policy header rules for a deployment environment.
#[derive(Debug, Parser)]
#[command(version)]
struct Arguments {
    /// Environment to derive the policy for. Detected from the hosting
    /// platform when omitted.
    #[arg(long, short)]
    environment: Option<Environment>,
    #[arg(long, env = ENV_VERCEL, hide_env_values = true)]
    vercel_env: Option<String>,
    #[arg(long, env = ENV_NODE, hide_env_values = true)]
    node_env: Option<String>,
    /// Emit an enforced `Content-Security-Policy` instead of report-only.
    #[arg(long)]
    enforce: bool,
    #[arg(long, default_value = DEFAULT_ROUTE_SOURCE)]
    route: String,
    #[arg(long)]
    report_uri: Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Arguments::parse();
    let environment = args.environment.unwrap_or_else(|| {
        Environment::from_vars(args.vercel_env.as_deref(), args.node_env.as_deref())
    });

    let mut builder = CspConfigBuilder::new()
        .environment(environment)
        .report_only(!args.enforce)
        .route_source(args.route);
    if let Some(uri) = args.report_uri {
        builder = builder.report_uri(uri);
    }
    let config = builder.build().context("failed to build CSP config")?;

    match args.format {
        Format::Json => println!("{}", rules_to_json(config.rules())?),
        Format::Header => {
            for header in config.rules().iter().flat_map(|rule| rule.headers()) {
                let value = header
                    .value()
                    .to_str()
                    .context("header value is not visible ASCII")?;
                println!("{}: {}", header.key(), value);
            }
        }
    }

    Ok(())
}
