use tracing::debug;

use crate::error::ConvertError;
use crate::report::model::Report;

/// Decode raw report bytes.
///
/// Unknown fields are ignored and missing ones default. Anything that is not a
/// JSON object of the report shape fails as a whole.
pub fn parse(bytes: &[u8]) -> Result<Report, ConvertError> {
    let report: Report = serde_json::from_slice(bytes).map_err(ConvertError::Parse)?;
    debug!("Parsed report '{}' with {} results", report.id, report.results.len());
    Ok(report)
}
