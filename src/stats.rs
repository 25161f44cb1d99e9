/// Breakpoint search statistics tracking and reporting
use log::info;

use crate::fusion::Translocation;

/// Tracks translocation outcomes for a `find` run
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BreakpointStats {
    /// Translocations read from the input file
    pub translocations_read: u64,
    /// Malformed translocation lines
    pub malformed: u64,
    /// Translocations skipped because a partner gene has no transcripts
    pub skipped: u64,
    /// Translocations whose junction sequence was aligned
    pub aligned: u64,
    /// Translocations where the aligner failed
    pub alignment_failures: u64,
    /// Partners with a breakpoint
    pub partners_resolved: u64,
    /// Partners without a relevant hit
    pub partners_unresolved: u64,
}

impl BreakpointStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one aligned translocation
    pub fn record_translocation(&mut self, translocation: &Translocation) {
        self.aligned += 1;
        let resolved = translocation.n_resolved() as u64;
        self.partners_resolved += resolved;
        self.partners_unresolved += translocation.partners.len() as u64 - resolved;
    }

    /// Record a translocation whose alignment failed; its partners stay unresolved
    pub fn record_failure(&mut self, translocation: &Translocation) {
        self.alignment_failures += 1;
        self.partners_unresolved += translocation.partners.len() as u64;
    }

    pub fn total_partners(&self) -> u64 {
        self.partners_resolved + self.partners_unresolved
    }

    pub fn resolved_percent(&self) -> f64 {
        let total = self.total_partners();
        if total == 0 {
            0.0
        } else {
            100.0 * self.partners_resolved as f64 / total as f64
        }
    }

    /// Print summary statistics to log
    pub fn print_summary(&self) {
        if self.translocations_read == 0 {
            info!("No translocations processed");
            return;
        }

        info!("=== Breakpoint Summary ===");
        info!("Number of input translocations: {}", self.translocations_read);
        if self.malformed > 0 {
            info!("Malformed translocation lines: {}", self.malformed);
        }
        info!(
            "Skipped (partner gene not prepared): {}",
            self.skipped
        );
        info!("Aligned translocations: {}", self.aligned);
        if self.alignment_failures > 0 {
            info!("Alignment failures: {}", self.alignment_failures);
        }
        info!(
            "Partners with breakpoint: {} ({:.2}%)",
            self.partners_resolved,
            self.resolved_percent()
        );
        info!("Partners unresolved: {}", self.partners_unresolved);
    }
}
