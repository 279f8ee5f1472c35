//! Projection of decoded records into their JSON shape.

use serde::Serialize;

use crate::error::Result;
use crate::record::VersionedRecord;
use crate::text::normalize;

/// One output object. Field order here is the field order in the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedRecord {
    pub key: String,
    pub value: String,
    pub create_revision: i64,
    pub mod_revision: i64,
    pub version: i64,
}

impl ProjectedRecord {
    pub fn project(rec: &VersionedRecord) -> Self {
        Self {
            key: normalize(&rec.key),
            value: normalize(&rec.value),
            create_revision: rec.create_revision,
            mod_revision: rec.mod_revision,
            version: rec.version,
        }
    }
}

impl From<VersionedRecord> for ProjectedRecord {
    fn from(rec: VersionedRecord) -> Self {
        Self::project(&rec)
    }
}

/// Pretty JSON array (two-space indent), no trailing newline.
pub fn render(records: &[ProjectedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
