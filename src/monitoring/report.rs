use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a `application/csp-report` violation report, the object under the
/// `csp-report` key. Browsers omit fields freely, so only the directive is
/// required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CspViolationReport {
    #[serde(default)]
    pub document_uri: String,

    #[serde(default)]
    pub referrer: String,

    #[serde(default)]
    pub blocked_uri: String,

    pub violated_directive: String,

    #[serde(default)]
    pub effective_directive: String,

    #[serde(default)]
    pub original_policy: String,

    #[serde(default)]
    pub disposition: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_sample: Option<String>,
}

#[derive(Deserialize)]
struct ReportEnvelope {
    #[serde(rename = "csp-report")]
    csp_report: Option<CspViolationReport>,
}

impl CspViolationReport {
    /// Parses a report body. `Ok(None)` means valid JSON without a
    /// `csp-report` object.
    pub fn from_body(bytes: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let envelope: ReportEnvelope = serde_json::from_slice(bytes)?;
        Ok(envelope.csp_report)
    }

    #[inline]
    pub fn is_enforce(&self) -> bool {
        self.disposition == "enforce"
    }

    #[inline]
    pub fn is_report(&self) -> bool {
        self.disposition == "report"
    }

    /// Directive the browser evaluated, falling back to the violated one.
    #[inline]
    pub fn directive(&self) -> &str {
        if self.effective_directive.is_empty() {
            &self.violated_directive
        } else {
            &self.effective_directive
        }
    }
}

impl fmt::Display for CspViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocked '{}' on '{}'",
            self.directive(),
            self.blocked_uri,
            self.document_uri
        )?;
        if let (Some(file), Some(line)) = (&self.source_file, self.line_number) {
            write!(f, " at {}:{}", file, line)?;
        }
        Ok(())
    }
}
