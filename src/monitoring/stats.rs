use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug)]
pub struct CspStats {
    policy_build_count: AtomicUsize,
    request_count: AtomicUsize,
    header_applied_count: AtomicUsize,
    powered_by_stripped_count: AtomicUsize,
    violation_count: AtomicUsize,
    rejected_report_count: AtomicUsize,
    start_time: Instant,
}

impl Default for CspStats {
    fn default() -> Self {
        Self {
            policy_build_count: Default::default(),
            request_count: Default::default(),
            header_applied_count: Default::default(),
            powered_by_stripped_count: Default::default(),
            violation_count: Default::default(),
            rejected_report_count: Default::default(),
            start_time: Instant::now(),
        }
    }
}

impl CspStats {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn policy_build_count(&self) -> usize {
        self.policy_build_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn header_applied_count(&self) -> usize {
        self.header_applied_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn powered_by_stripped_count(&self) -> usize {
        self.powered_by_stripped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn violation_count(&self) -> usize {
        self.violation_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_report_count(&self) -> usize {
        self.rejected_report_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    #[inline]
    pub(crate) fn increment_policy_build_count(&self) {
        self.policy_build_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_headers_applied(&self, count: usize) {
        self.header_applied_count.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_powered_by_stripped_count(&self) {
        self.powered_by_stripped_count
            .fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_violation_count(&self) {
        self.violation_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_rejected_report_count(&self) {
        self.rejected_report_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.policy_build_count.store(0, Ordering::Relaxed);
        self.request_count.store(0, Ordering::Relaxed);
        self.header_applied_count.store(0, Ordering::Relaxed);
        self.powered_by_stripped_count.store(0, Ordering::Relaxed);
        self.violation_count.store(0, Ordering::Relaxed);
        self.rejected_report_count.store(0, Ordering::Relaxed);
    }
}

impl fmt::Display for CspStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSP Header Statistics:")?;
        writeln!(f, "  Uptime: {} seconds", self.uptime_secs())?;
        writeln!(f, "  Policies built: {}", self.policy_build_count())?;
        writeln!(f, "  Requests processed: {}", self.request_count())?;
        writeln!(f, "  Headers applied: {}", self.header_applied_count())?;
        writeln!(
            f,
            "  X-Powered-By headers stripped: {}",
            self.powered_by_stripped_count()
        )?;
        writeln!(f, "  Violations reported: {}", self.violation_count())?;
        writeln!(f, "  Reports rejected: {}", self.rejected_report_count())?;
        Ok(())
    }
}
