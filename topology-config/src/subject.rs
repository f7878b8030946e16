use serde::{Deserialize, Serialize};

use crate::document::null_as_default;

/// Distinguished-name fields a certificate subject is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectName {
    /// Organization (O)
    #[serde(rename = "O", default, deserialize_with = "null_as_default")]
    pub organization: String,
    /// Organizational unit (OU)
    #[serde(rename = "OU", default, deserialize_with = "null_as_default")]
    pub organizational_unit: String,
    /// Common name (CN)
    #[serde(rename = "CN", default, deserialize_with = "null_as_default")]
    pub common_name: String,
}

impl SubjectName {
    pub fn new(
        organization: impl Into<String>,
        organizational_unit: impl Into<String>,
        common_name: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            organizational_unit: organizational_unit.into(),
            common_name: common_name.into(),
        }
    }

    /// Fill each empty field from `fallback`, field by field.
    pub fn resolve(&self, fallback: &SubjectName) -> SubjectName {
        SubjectName {
            organization: pick(&self.organization, &fallback.organization),
            organizational_unit: pick(&self.organizational_unit, &fallback.organizational_unit),
            common_name: pick(&self.common_name, &fallback.common_name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.organization.is_empty()
            && self.organizational_unit.is_empty()
            && self.common_name.is_empty()
    }
}

fn pick(own: &str, fallback: &str) -> String {
    if own.is_empty() {
        fallback.to_string()
    } else {
        own.to_string()
    }
}
