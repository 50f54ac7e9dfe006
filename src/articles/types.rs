//! Types for article publishing

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Publication status, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "scheduled")]
    Scheduled,
    #[serde(alias = "published")]
    Published,
    #[serde(alias = "unpublished")]
    Unpublished,
}

impl ArticleStatus {
    pub const ALL: [ArticleStatus; 4] = [
        ArticleStatus::Draft,
        ArticleStatus::Scheduled,
        ArticleStatus::Published,
        ArticleStatus::Unpublished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Published => "Published",
            Self::Unpublished => "Unpublished",
        }
    }
}

impl Default for ArticleStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::validation(format!("unknown article status '{}'", s)))
    }
}

/// One article written in exactly one locale
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Empty until the server assigns one
    #[serde(default)]
    pub id: String,

    #[serde(default, deserialize_with = "flat_text")]
    pub title: String,

    #[serde(default, deserialize_with = "flat_text")]
    pub body: String,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    pub topic: String,

    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub locale: String,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub status: ArticleStatus,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,

    #[serde(default)]
    pub user_id: String,
}

impl Article {
    /// Blank English draft the create form starts from
    pub fn draft() -> Self {
        Self {
            locale: "en".to_string(),
            ..Self::default()
        }
    }
}

/// Write payload for create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePayload {
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
    pub locale: String,
    pub category: Option<String>,
    pub source: Option<String>,
    pub status: ArticleStatus,
}

impl From<&Article> for ArticlePayload {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            body: article.body.clone(),
            image_url: article.image_url.clone(),
            kind: article.kind.clone(),
            topic: article.topic.clone(),
            locale: article.locale.clone(),
            category: article.category.clone(),
            source: article.source.clone(),
            status: article.status,
        }
    }
}

/// Body of `PUT /admin/article/changeStatus`
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub id: String,
    pub status: ArticleStatus,
}

/// Body of `POST /users/:ownerId/liked-articles`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub article_id: String,
}

/// First available text of a locale map, `en` preferred
pub fn first_localized(texts: &BTreeMap<String, String>) -> Option<&str> {
    texts
        .get("en")
        .filter(|t| !t.is_empty())
        .or_else(|| texts.values().find(|t| !t.is_empty()))
        .map(String::as_str)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextShape {
    Flat(String),
    Localized(BTreeMap<String, String>),
}

/// Older records carry `{ "en": .., "es": .. }` maps; collapse them on receipt
fn flat_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextShape>::deserialize(deserializer)? {
        Some(TextShape::Flat(text)) => text,
        Some(TextShape::Localized(texts)) => first_localized(&texts).unwrap_or_default().to_string(),
        None => String::new(),
    })
}
