//! Template-based permalink resolution

use async_trait::async_trait;

use crate::config::PermalinkConfig;
use crate::error::{Error, Result};
use crate::traits::{PermalinkResolver, RecordId};

const ID_PLACEHOLDER: &str = "{id}";

/// Resolves permalinks by substituting the record ID into a URL template,
/// e.g. `https://example.com/?p={id}`.
#[derive(Debug, Clone)]
pub struct TemplatePermalinkResolver {
    template: String,
}

impl TemplatePermalinkResolver {
    /// Create a resolver; the template must contain `{id}`
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(ID_PLACEHOLDER) {
            return Err(Error::config(format!(
                "Permalink template must contain {}. Got: {}",
                ID_PLACEHOLDER, template
            )));
        }
        Ok(Self { template })
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &PermalinkConfig) -> Result<Self> {
        Self::new(config.template.clone())
    }
}

#[async_trait]
impl PermalinkResolver for TemplatePermalinkResolver {
    async fn permalink(&self, record_id: RecordId) -> Result<String> {
        Ok(self.template.replace(ID_PLACEHOLDER, &record_id.to_string()))
    }
}
