//! User lifecycle management

mod types;

use async_trait::async_trait;
use reqwest::Method;
use std::collections::HashMap;

use crate::envelope::{Ack, Envelope, Page};
use crate::error::{Error, Notice};
use crate::fetch::{encode_path, ApiContext};
use crate::manager::{Labels, ListFilter, Resource, ResourceManager};

pub use types::*;

static LABELS: Labels = Labels {
    fetch_failed: "Failed to fetch users.",
    created: "User created",
    create_failed: "Failed to create user",
    updated: "Updated Successfully",
    update_failed: "Failed to update user",
    deleted: "User deleted successfully",
    delete_failed: "Failed to delete user",
    detail_failed: "Failed to fetch purchase data",
};

/// Client for the `/admin/user` endpoints
#[derive(Clone)]
pub struct UsersApi {
    ctx: ApiContext,
}

impl UsersApi {
    pub(crate) fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// List app users, one page at a time
    pub async fn list(&self, page: u32) -> Result<Page<User>, Error> {
        let mut params = HashMap::new();
        params.insert("page".to_string(), page.max(1).to_string());
        params.insert("role".to_string(), "user".to_string());

        let envelope = self
            .ctx
            .request(Method::GET, "/admin/getUsers")
            .query(params)
            .execute::<Envelope<Vec<User>>>()
            .await?;

        Ok(Page::from_envelope(envelope, page.max(1)))
    }

    /// Fetch a single profile
    pub async fn get(&self, id: &str) -> Result<User, Error> {
        self.ctx
            .request(Method::GET, &encode_path(&["admin", "user", id])?)
            .execute::<Envelope<User>>()
            .await?
            .data
            .ok_or_else(|| Error::general(format!("user {} not returned", id)))
    }

    /// Replace the editable profile fields
    pub async fn update(&self, user: &User) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::PUT, &encode_path(&["admin", "user", &user.id])?)
            .json(&UserUpdate::from(user))?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    pub async fn delete(&self, id: &str) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::DELETE, &encode_path(&["admin", "user", id])?)
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    /// Set the blocked flag
    pub async fn set_blocked(&self, id: &str, blocked: bool) -> Result<Option<String>, Error> {
        let ack = self
            .ctx
            .request(Method::PUT, &encode_path(&["admin", "user", id, "block"])?)
            .json(&BlockRequest { blocked })?
            .execute::<Ack>()
            .await?;
        Ok(ack.message)
    }

    /// Purchase history of one user
    pub async fn purchases(&self, id: &str) -> Result<Vec<Purchase>, Error> {
        let envelope = self
            .ctx
            .request(Method::GET, &encode_path(&["admin", "user", id, "getPurchases"])?)
            .execute::<Envelope<Vec<Purchase>>>()
            .await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl Resource for UsersApi {
    type Item = User;
    type Detail = Vec<Purchase>;

    fn labels(&self) -> &'static Labels {
        &LABELS
    }

    fn search_text<'a>(&self, item: &'a User) -> &'a str {
        &item.name
    }

    async fn fetch_page(&self, page: u32, _filter: &ListFilter) -> Result<Page<User>, Error> {
        self.list(page).await
    }

    async fn update(&self, item: &User) -> Result<Option<String>, Error> {
        UsersApi::update(self, item).await
    }

    async fn delete(&self, item: &User) -> Result<Option<String>, Error> {
        UsersApi::delete(self, &item.id).await
    }

    async fn fetch_detail(&self, item: &User) -> Result<Vec<Purchase>, Error> {
        self.purchases(&item.id).await
    }
}

impl ResourceManager<UsersApi> {
    /// Flip the blocked flag of `user` and re-fetch on success
    pub async fn toggle_block(&mut self, user: &User) -> Notice {
        let blocked = !user.blocked;
        self.begin_mutation();
        let result = self.resource.set_blocked(&user.id, blocked).await;
        let success = if blocked { "User blocked" } else { "User unblocked" };
        self.finish_mutation(result, success, "Failed to update block status", false)
            .await
    }
}
