pub mod report;
pub mod stats;

pub use report::CspViolationReport;
pub use stats::CspStats;
