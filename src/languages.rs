//! Supported-language registry

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::envelope::{Ack, Envelope, Page};
use crate::error::Error;
use crate::fetch::ApiContext;
use crate::manager::{Labels, ListFilter, Resource};

static LABELS: Labels = Labels {
    fetch_failed: "Failed to fetch languages.",
    created: "Language added successfully",
    create_failed: "Failed to add language",
    updated: "Language updated successfully",
    update_failed: "Failed to update language",
    deleted: "Language deleted successfully",
    delete_failed: "Failed to delete language",
    detail_failed: "Failed to fetch language",
};

/// A registry entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Language {
    /// `None` until the server assigns one
    #[serde(default)]
    pub id: Option<i64>,

    /// Short code such as `en`
    #[serde(default)]
    pub locale: String,

    /// Display name
    #[serde(default)]
    pub language: String,

    #[serde(default, alias = "isActive")]
    pub status: bool,
}

impl Language {
    pub fn new(locale: &str, language: &str) -> Self {
        Self {
            id: None,
            locale: locale.to_string(),
            language: language.to_string(),
            status: true,
        }
    }
}

/// Body of the add and edit endpoints
#[derive(Debug, Clone, Serialize)]
struct LanguagePayload<'a> {
    locale: &'a str,
    language: &'a str,
}

impl<'a> From<&'a Language> for LanguagePayload<'a> {
    fn from(language: &'a Language) -> Self {
        Self {
            locale: &language.locale,
            language: &language.language,
        }
    }
}

/// Client for the `/admin/language` endpoints
#[derive(Clone)]
pub struct LanguagesApi {
    ctx: ApiContext,
}

impl LanguagesApi {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Every registered language
    pub async fn list(&self) -> Result<Vec<Language>, Error> {
        let envelope = self
            .ctx
            .request(Method::GET, "/admin/language/getAll")
            .execute::<Envelope<Vec<Language>>>()
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn add(&self, language: &Language) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::POST, "/admin/language/add")
            .json(&LanguagePayload::from(language))?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    pub async fn edit(&self, language: &Language) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::PUT, &format!("/admin/language/edit/{}", require_id(language)?))
            .json(&LanguagePayload::from(language))?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    pub async fn delete(&self, language: &Language) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::DELETE, &format!("/admin/language/delete/{}", require_id(language)?))
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }
}

fn require_id(language: &Language) -> Result<i64, Error> {
    language
        .id
        .ok_or_else(|| Error::validation(format!("language '{}' has no id", language.locale)))
}

#[async_trait]
impl Resource for LanguagesApi {
    type Item = Language;
    type Detail = ();

    fn labels(&self) -> &'static Labels {
        &LABELS
    }

    fn search_text<'a>(&self, item: &'a Language) -> &'a str {
        &item.language
    }

    fn blank(&self) -> Option<Language> {
        Some(Language::default())
    }

    /// The registry is not paginated
    async fn fetch_page(&self, _page: u32, _filter: &ListFilter) -> Result<Page<Language>, Error> {
        let items = self.list().await?;
        let info = crate::envelope::PageInfo::single(items.len());
        Ok(Page { items, info })
    }

    async fn create(&self, item: &Language) -> Result<Option<String>, Error> {
        self.add(item).await
    }

    async fn update(&self, item: &Language) -> Result<Option<String>, Error> {
        self.edit(item).await
    }

    async fn delete(&self, item: &Language) -> Result<Option<String>, Error> {
        LanguagesApi::delete(self, item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_active_alias_is_accepted() {
        let language: Language = serde_json::from_value(json!({
            "id": 3,
            "locale": "es",
            "language": "Spanish",
            "isActive": true
        }))
        .unwrap();
        assert_eq!(language.id, Some(3));
        assert!(language.status);
    }

    #[test]
    fn payload_has_locale_and_name_only() {
        let language = Language::new("fr", "French");
        let body = serde_json::to_value(LanguagePayload::from(&language)).unwrap();
        assert_eq!(body, json!({ "locale": "fr", "language": "French" }));
    }

    #[test]
    fn edit_requires_an_id() {
        assert!(require_id(&Language::new("fr", "French")).is_err());
    }
}
