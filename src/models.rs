//! Records produced by a scan.
//!
//! JSON field names follow the document layout consumed by the review
//! front-end, hence the camelCase and dotted renames.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of `_cat/indices?format=json`.
///
/// Servers disagree on whether counts are strings or numbers, so every field
/// is accepted as either and kept as a string. Missing fields default to "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    #[serde(default, deserialize_with = "string_or_number")]
    pub health: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub status: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub index: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub uuid: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pri: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rep: String,
    #[serde(rename = "docs.count", default, deserialize_with = "string_or_number")]
    pub docs_count: String,
    #[serde(rename = "docs.deleted", default, deserialize_with = "string_or_number")]
    pub docs_deleted: String,
    #[serde(rename = "store.size", default, deserialize_with = "string_or_number")]
    pub store_size: String,
    #[serde(rename = "pri.store.size", default, deserialize_with = "string_or_number")]
    pub pri_store_size: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// The subset of a collection descriptor kept in the final record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterestingCollectionInfo {
    pub index: String,
    #[serde(rename = "docs.count")]
    pub docs_count: String,
    #[serde(rename = "docs.deleted")]
    pub docs_deleted: String,
    #[serde(rename = "store.size")]
    pub store_size: String,
    #[serde(rename = "pri.store.size")]
    pub pri_store_size: String,
}

impl From<&CollectionDescriptor> for InterestingCollectionInfo {
    fn from(d: &CollectionDescriptor) -> Self {
        InterestingCollectionInfo {
            index: d.index.clone(),
            docs_count: d.docs_count.clone(),
            docs_deleted: d.docs_deleted.clone(),
            store_size: d.store_size.clone(),
            pri_store_size: d.pri_store_size.clone(),
        }
    }
}

/// Artifacts pulled out of sampled documents.
///
/// Ordered sets: duplicates collapse and serialized output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedArtifacts {
    pub emails: BTreeSet<String>,
    pub urls: BTreeSet<String>,
    #[serde(rename = "publicIps")]
    pub public_ips: BTreeSet<String>,
    #[serde(rename = "moreThanTwoDotsInName")]
    pub dotted_names: BTreeSet<String>,
}

impl ExtractedArtifacts {
    /// Set union, field by field.
    pub fn union_with(&mut self, other: ExtractedArtifacts) {
        self.emails.extend(other.emails);
        self.urls.extend(other.urls);
        self.public_ips.extend(other.public_ips);
        self.dotted_names.extend(other.dotted_names);
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.urls.is_empty()
            && self.public_ips.is_empty()
            && self.dotted_names.is_empty()
    }
}

/// Ownership hints for a console target's address.
///
/// Every field is an empty string when its lookup failed or found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpIntel {
    #[serde(rename = "cloudHostingProvider")]
    pub cloud_hosting_provider: String,
    #[serde(rename = "subjectUrls")]
    pub subject_urls: String,
    pub organizations: String,
    pub cname: String,
}

/// One record per scanned target.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    #[serde(rename = "rootUrl")]
    pub root_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "isInitialized")]
    pub is_initialized: bool,
    pub indices: Vec<InterestingCollectionInfo>,
    #[serde(rename = "indicesInfoInJson")]
    pub indices_info: BTreeMap<String, Value>,
    #[serde(rename = "interestingInfo")]
    pub interesting_info: ExtractedArtifacts,
    #[serde(rename = "interestingWords")]
    pub interesting_words: BTreeSet<String>,
    #[serde(rename = "hasAtLeastOneIndexSizeOverGB")]
    pub has_large_collection: bool,

    // Search-engine only: raw `_cat` listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocations: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Value>>,

    // Console only.
    #[serde(rename = "ipInfo", skip_serializing_if = "Option::is_none")]
    pub ip_info: Option<IpIntel>,
}

impl ScanResult {
    /// Creates an empty, uninitialized record stamped with the current time.
    pub fn new(root_url: impl Into<String>) -> Self {
        ScanResult {
            root_url: root_url.into(),
            created_at: Utc::now(),
            is_initialized: false,
            indices: Vec::new(),
            indices_info: BTreeMap::new(),
            interesting_info: ExtractedArtifacts::default(),
            interesting_words: BTreeSet::new(),
            has_large_collection: false,
            aliases: None,
            allocations: None,
            nodes: None,
            ip_info: None,
        }
    }
}
