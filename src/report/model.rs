use serde::{Deserialize, Deserializer};

/// A red-teaming report as produced by the testing tool.
///
/// Every field defaults when missing, so partially filled reports still render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "nullable")]
    pub id: String,

    /// Findings in the order they are rendered
    #[serde(deserialize_with = "nullable")]
    pub results: Vec<Finding>,
}

/// A single finding inside a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(deserialize_with = "nullable")]
    pub id: String,

    #[serde(deserialize_with = "nullable")]
    pub definition: Definition,

    /// Free-form severity, conventionally "high", "medium" or "low"
    #[serde(deserialize_with = "nullable")]
    pub severity: String,

    /// Target the conversation was run against (not validated)
    #[serde(deserialize_with = "nullable")]
    pub url: String,

    /// Request/response exchanges, in conversation order
    #[serde(deserialize_with = "nullable")]
    pub turns: Vec<Turn>,

    #[serde(deserialize_with = "nullable")]
    pub evidence: Evidence,
}

impl Finding {
    /// Reason text backing the finding, if the report carried one
    pub fn evidence_reason(&self) -> Option<&str> {
        let reason = self.evidence.content.reason.as_str();
        if reason.is_empty() {
            None
        } else {
            Some(reason)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Definition {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
}

/// One request/response exchange with the target
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Turn {
    #[serde(deserialize_with = "nullable")]
    pub request: String,
    #[serde(deserialize_with = "nullable")]
    pub response: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Evidence {
    /// Evidence kind as reported; not used for rendering
    #[serde(rename = "type", deserialize_with = "nullable")]
    #[allow(dead_code)]
    pub kind: String,

    #[serde(deserialize_with = "nullable")]
    pub content: EvidenceContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvidenceContent {
    #[serde(deserialize_with = "nullable")]
    pub reason: String,
}

/// Treats an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
