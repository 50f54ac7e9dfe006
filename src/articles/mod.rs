//! Localized article publishing

mod types;

use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;

use crate::envelope::{Ack, Envelope, Page};
use crate::error::{Error, Notice};
use crate::fetch::ApiContext;
use crate::manager::{Labels, ListFilter, Resource, ResourceManager};

pub use types::*;

static LABELS: Labels = Labels {
    fetch_failed: "Failed to fetch articles.",
    created: "Article Created Successfully",
    create_failed: "Failed to create Article",
    updated: "Article Updated Successfully",
    update_failed: "Failed to update Article",
    deleted: "Article Deleted Successfully",
    delete_failed: "Failed to delete Article",
    detail_failed: "Failed to fetch Article",
};

/// Client for the article endpoints, scoped under the configured owner
#[derive(Clone)]
pub struct ArticlesApi {
    ctx: ApiContext,
}

impl ArticlesApi {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// List one page of articles, optionally for one locale only
    pub async fn list(&self, page: u32, locale: Option<&str>) -> Result<Page<Article>, Error> {
        let page = page.max(1);
        let mut params = HashMap::new();
        if let Some(locale) = locale {
            params.insert("locale".to_string(), locale.to_string());
        }
        params.insert("pageSize".to_string(), self.ctx.options.page_size_hint.to_string());
        params.insert("pageNumber".to_string(), page.to_string());

        let envelope = self
            .ctx
            .request(Method::GET, &self.ctx.owner_path(&["posts"])?)
            .query(params)
            .execute::<Envelope<Vec<Article>>>()
            .await?;

        Ok(Page::from_envelope(envelope, page))
    }

    pub async fn get(&self, id: &str) -> Result<Article, Error> {
        self.ctx
            .request(Method::GET, &self.ctx.owner_path(&["posts", id])?)
            .execute::<Envelope<Article>>()
            .await?
            .data
            .ok_or_else(|| Error::general(format!("article {} not returned", id)))
    }

    pub async fn create(&self, article: &Article) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::POST, &self.ctx.owner_path(&["posts"])?)
            .json(&ArticlePayload::from(article))?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    pub async fn update(&self, article: &Article) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::PUT, &self.ctx.owner_path(&["posts", &article.id])?)
            .json(&ArticlePayload::from(article))?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::DELETE, &self.ctx.owner_path(&["posts", id])?)
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    /// Move an article to another publication status
    pub async fn change_status(&self, id: &str, status: ArticleStatus) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::PUT, "/admin/article/changeStatus")
            .json(&StatusChange {
                id: id.to_string(),
                status,
            })?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    /// Articles the owner has liked
    pub async fn liked_articles(&self) -> Result<Vec<Article>, Error> {
        let envelope = self
            .ctx
            .request(Method::GET, &self.ctx.owner_path(&["liked-articles"])?)
            .execute::<Envelope<Vec<Article>>>()
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn add_liked(&self, article_id: &str) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::POST, &self.ctx.owner_path(&["liked-articles"])?)
            .json(&LikeRequest {
                article_id: article_id.to_string(),
            })?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }
}

#[async_trait]
impl Resource for ArticlesApi {
    type Item = Article;
    type Detail = ();

    fn labels(&self) -> &'static Labels {
        &LABELS
    }

    fn search_text<'a>(&self, item: &'a Article) -> &'a str {
        &item.title
    }

    fn blank(&self) -> Option<Article> {
        Some(Article::draft())
    }

    async fn fetch_page(&self, page: u32, filter: &ListFilter) -> Result<Page<Article>, Error> {
        self.list(page, filter.locale.as_deref()).await
    }

    async fn create(&self, item: &Article) -> Result<Option<String>, Error> {
        ArticlesApi::create(self, item).await
    }

    async fn update(&self, item: &Article) -> Result<Option<String>, Error> {
        ArticlesApi::update(self, item).await
    }

    async fn delete(&self, item: &Article) -> Result<Option<String>, Error> {
        ArticlesApi::delete(self, &item.id).await
    }
}

impl ResourceManager<ArticlesApi> {
    /// Scope the list to one locale (`None` for all) and fetch its first page
    pub async fn set_locale(&mut self, locale: Option<&str>) -> bool {
        self.set_filter(ListFilter {
            locale: locale.map(str::to_string),
        })
        .await
    }

    /// Change the status of `article` and re-fetch on success
    pub async fn change_status(&mut self, article: &Article, status: ArticleStatus) -> Notice {
        self.begin_mutation();
        let result = self.resource.change_status(&article.id, status).await;
        self.finish_mutation(result, "Status updated", "Failed to update status", false)
            .await
    }
}
