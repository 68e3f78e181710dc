use crate::report::model::Finding;

/// Severity counts shown in the report summary block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeveritySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeveritySummary {
    /// Count findings per known severity.
    ///
    /// Matching is case-insensitive. Unrecognized severities only count
    /// toward the total.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = SeveritySummary {
            total: findings.len(),
            ..Default::default()
        };
        for f in findings {
            match f.severity.to_lowercase().as_str() {
                "high" => summary.high += 1,
                "medium" => summary.medium += 1,
                "low" => summary.low += 1,
                _ => {}
            }
        }
        summary
    }

    /// Findings whose severity matched none of the known levels
    pub fn unclassified(&self) -> usize {
        self.total - (self.high + self.medium + self.low)
    }
}
