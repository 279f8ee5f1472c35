//! Record envelope: the `mvccpb.KeyValue` message etcd stores as the value of
//! every entry in its `key` bucket.

use prost::Message;

/// Wire layout of `mvccpb.KeyValue`.
#[derive(Clone, PartialEq, Message)]
pub struct KeyValue {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(int64, tag = "2")]
    pub create_revision: i64,
    #[prost(int64, tag = "3")]
    pub mod_revision: i64,
    #[prost(int64, tag = "4")]
    pub version: i64,
    #[prost(bytes = "vec", tag = "5")]
    pub value: Vec<u8>,
    #[prost(int64, tag = "6")]
    pub lease: i64,
}

/// A successfully decoded record. The embedded key is authoritative; the
/// container key it was stored under is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedRecord {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub create_revision: i64,
    pub mod_revision: i64,
    pub version: i64,
    pub lease: i64,
}

impl From<KeyValue> for VersionedRecord {
    fn from(kv: KeyValue) -> Self {
        Self {
            key: kv.key,
            value: kv.value,
            create_revision: kv.create_revision,
            mod_revision: kv.mod_revision,
            version: kv.version,
            lease: kv.lease,
        }
    }
}

/// Decode a container value. Anything that is not a well-formed envelope yields None.
pub fn decode(value: &[u8]) -> Option<VersionedRecord> {
    KeyValue::decode(value).ok().map(VersionedRecord::from)
}
