//! Metadata and request shapes for Help Scout redirects

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::traits::RecordId;

/// The `_helpscout_data` mapping stored on a content record
///
/// `slug` and `number` identify the Help Scout copy of the article;
/// `redirectId` appears once the redirect has been created remotely. Both
/// article fields are kept exactly as stored so a sync never rewrites them.
/// Keys this crate doesn't know about are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelpscoutData {
    /// Article URL segment on Help Scout
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub slug: Option<Value>,

    /// Article number on Help Scout
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<Value>,

    /// Remote redirect ID
    #[serde(rename = "redirectId", default, skip_serializing_if = "Option::is_none")]
    pub redirect_id: Option<String>,

    /// Everything else in the mapping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HelpscoutData {
    /// Create metadata for an article that has not been linked yet
    pub fn new(slug: impl Into<Value>, number: impl Into<Value>) -> Self {
        Self {
            slug: Some(slug.into()),
            number: Some(number.into()),
            ..Self::default()
        }
    }

    /// Set the redirect ID
    pub fn with_redirect_id(mut self, redirect_id: impl Into<String>) -> Self {
        self.redirect_id = Some(redirect_id.into());
        self
    }

    /// Parse a stored metadata value
    ///
    /// A missing value, `null`, or an empty string (what the CMS hands back
    /// for meta that was never written) all mean "no data yet".
    pub fn from_meta(record_id: RecordId, value: Option<Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(s)) if s.is_empty() => Ok(Self::default()),
            Some(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
                Error::metadata_store(format!(
                    "Invalid Help Scout metadata on record {}: {}",
                    record_id, e
                ))
            }),
            Some(other) => Err(Error::metadata_store(format!(
                "Help Scout metadata on record {} is not a mapping: {}",
                record_id, other
            ))),
        }
    }

    /// Convert back into a storable value
    pub fn to_meta(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Redirect ID, if the record has been linked
    ///
    /// An empty stored ID is treated as absent.
    pub fn linked_redirect_id(&self) -> Option<&str> {
        self.redirect_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Source path of the redirect on Help Scout: `/article/{number}-{slug}`
    ///
    /// Both fields are rendered as stored (`"007"` stays `007`). Either one
    /// missing, `null`, or not a string/number means there is no path.
    pub fn article_path(&self) -> Option<String> {
        let number = path_segment(self.number.as_ref()?)?;
        let slug = path_segment(self.slug.as_ref()?)?;
        Some(format!("/article/{}-{}", number, slug))
    }
}

/// Body of a redirect create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectBody {
    /// Help Scout Docs site ID
    pub site_id: String,
    /// Source path on Help Scout
    pub url_mapping: String,
    /// Destination URL
    pub redirect: String,
}

impl RedirectBody {
    /// Serialize to the wire body
    ///
    /// `serde_json` never escapes `/`, which the Docs API relies on for
    /// `urlMapping`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Keep a present field as-is, including an explicit `null`
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Text of a scalar article field
fn path_segment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
