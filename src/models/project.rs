//! Featured project showcase built from README metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Canonical metadata keys recognized inside the featured marker block.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const TECHNOLOGIES: &str = "technologies";
    pub const DEMO: &str = "demo";
    pub const HIGHLIGHT: &str = "highlight";
    pub const IMAGE: &str = "image";
}

/// Key/value pairs parsed from a README's featured block.
///
/// Keys are normalized (lowercase, accents stripped, Portuguese labels mapped
/// to their English canonical name). Labels outside the canonical set are kept
/// under their normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturedMetadata {
    fields: BTreeMap<String, String>,
}

impl FeaturedMetadata {
    pub fn insert(&mut self, key: String, value: String) {
        self.fields.insert(key, value);
    }

    /// Raw value for a normalized key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.get(keys::TITLE)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(keys::DESCRIPTION)
    }

    pub fn demo(&self) -> Option<&str> {
        self.get(keys::DEMO)
    }

    pub fn highlight(&self) -> Option<&str> {
        self.get(keys::HIGHLIGHT)
    }

    pub fn image(&self) -> Option<&str> {
        self.get(keys::IMAGE)
    }

    /// Comma-separated technologies, trimmed, empty items dropped.
    pub fn technologies(&self) -> Vec<String> {
        self.get(keys::TECHNOLOGIES)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// A showcased project card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProject {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    pub github_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme_content: Option<String>,
}

/// Which repository list featured projects are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSource {
    #[default]
    Starred,
    Owned,
}

impl ProjectSource {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.to_lowercase().as_str() {
            "starred" => Ok(Self::Starred),
            "owned" | "repos" => Ok(Self::Owned),
            other => Err(AppError::InvalidInput(format!(
                "unknown project source '{}', expected 'starred' or 'owned'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starred => "starred",
            Self::Owned => "owned",
        }
    }
}
