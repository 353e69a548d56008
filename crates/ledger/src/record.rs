//! Deployment record stored in the ledger.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One named contract deployment.
///
/// Everything except the confirmation flag is fixed when the record is
/// built. The flag only moves from `false` to `true`.
///
/// Compiled-artifact fields (ABI, bytecode, hashes, ...) are kept as an
/// opaque JSON object that is flattened into the record on disk and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    name: String,
    #[serde(rename = "deployName")]
    deploy_name: String,
    #[serde(with = "hex_bytes")]
    address: Vec<u8>,
    #[serde(rename = "txid", with = "hex_bytes")]
    transaction_id: Vec<u8>,
    #[serde(flatten)]
    compiled_contract: Map<String, Value>,
    #[serde(rename = "createdAt", with = "rfc3339")]
    created_at: DateTime<FixedOffset>,
    #[serde(default)]
    confirmed: bool,
}

impl DeploymentRecord {
    /// Creates an unconfirmed record timestamped now.
    pub fn new(
        name: impl Into<String>,
        deploy_name: impl Into<String>,
        address: Vec<u8>,
        transaction_id: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            deploy_name: deploy_name.into(),
            address,
            transaction_id,
            compiled_contract: Map::new(),
            created_at: Utc::now().into(),
            confirmed: false,
        }
    }

    /// Overrides the creation timestamp, keeping its UTC offset.
    pub fn with_created_at(mut self, created_at: impl Into<DateTime<FixedOffset>>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// Attaches the compiled-artifact fields.
    ///
    /// Keys that collide with the record's own fields are dropped.
    pub fn with_compiled_contract(mut self, mut compiled: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            compiled.remove(*key);
        }
        self.compiled_contract = compiled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deploy_name(&self) -> &str {
        &self.deploy_name
    }

    pub fn address(&self) -> &[u8] {
        &self.address
    }

    /// Address in the hex form used on disk and on the RPC wire.
    pub fn address_hex(&self) -> String {
        hex::encode(&self.address)
    }

    pub fn transaction_id(&self) -> &[u8] {
        &self.transaction_id
    }

    pub fn transaction_id_hex(&self) -> String {
        hex::encode(&self.transaction_id)
    }

    pub fn compiled_contract(&self) -> &Map<String, Value> {
        &self.compiled_contract
    }

    /// Creation time with the offset it was recorded in.
    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub(crate) fn mark_confirmed(&mut self) {
        self.confirmed = true;
    }
}

const RESERVED_KEYS: &[&str] = &[
    "name",
    "deployName",
    "address",
    "txid",
    "createdAt",
    "confirmed",
];

pub(crate) mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(&encoded).map_err(D::Error::custom)
    }
}

/// Timestamps in the form Go's `time.Time` marshals to: RFC 3339 with the
/// recorded offset (`Z` for UTC) and trailing zeros trimmed from the
/// fraction.
pub(crate) mod rfc3339 {
    use chrono::{DateTime, FixedOffset, Timelike};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<FixedOffset>) -> String {
        let mut out = value.format("%Y-%m-%dT%H:%M:%S").to_string();

        let nanos = value.nanosecond() % 1_000_000_000;
        if nanos > 0 {
            let fraction = format!("{nanos:09}");
            out.push('.');
            out.push_str(fraction.trim_end_matches('0'));
        }

        if value.offset().local_minus_utc() == 0 {
            out.push('Z');
        } else {
            out.push_str(&value.format("%:z").to_string());
        }
        out
    }

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(D::Error::custom)
    }
}
