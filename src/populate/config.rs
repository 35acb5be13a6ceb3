//! Serializable description of a populate step
//!
//! Holds the static half of a populate call (read path, `as` path and
//! `unique`) so it can live in JSON or YAML configuration, while the
//! callbacks stay in code.

use super::{populate, populate_async, AsyncPopulateOptions, PopulateOptions};
use crate::accessor::FieldPath;
use crate::error::PopulateResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Populate step configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateConfig {
    /// Path read from every item
    pub path: String,
    /// Path written to, defaults to `path`
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub write_as: Option<String>,
    /// Run `each` once per distinct read value
    #[serde(default)]
    pub unique: bool,
}

impl PopulateConfig {
    /// Create a configuration reading and writing `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            write_as: None,
            unique: false,
        }
    }

    /// Check that both paths compile
    pub fn validate(&self) -> PopulateResult<()> {
        FieldPath::parse(&self.path)?;
        if let Some(ref write_as) = self.write_as {
            FieldPath::parse(write_as)?;
        }
        Ok(())
    }

    /// Run this step with synchronous callbacks
    ///
    /// A configured `as` path replaces the one in `options`, and a configured
    /// `unique: true` switches deduplication on.
    pub fn populate<A, U, F>(
        &self,
        items: &mut [Value],
        options: PopulateOptions<A, U, F>,
    ) -> PopulateResult<()>
    where
        U: FnMut(&[Option<Value>]) -> anyhow::Result<A>,
        F: FnMut(Option<&Value>, &A) -> anyhow::Result<Value>,
    {
        let mut options = options;
        if let Some(ref write_as) = self.write_as {
            options = options.write_as(write_as.clone());
        }
        if self.unique {
            options = options.unique(true);
        }
        populate(items, &self.path, options)
    }

    /// Run this step with asynchronous callbacks, overlaying options like
    /// [`PopulateConfig::populate`]
    pub async fn populate_async<'a, A>(
        &self,
        items: &mut [Value],
        options: AsyncPopulateOptions<'a, A>,
    ) -> PopulateResult<()>
    where
        A: Send + Sync + 'a,
    {
        let mut options = options;
        if let Some(ref write_as) = self.write_as {
            options = options.write_as(write_as.clone());
        }
        if self.unique {
            options = options.unique(true);
        }
        populate_async(items, &self.path, options).await
    }
}
