use crate::domain::model::{Mollusk, MolluskId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A REST-addressable collection of mollusks.
#[async_trait]
pub trait Resource: Send + Sync {
    /// `GET` the collection.
    async fn query(&self) -> Result<Vec<Mollusk>>;

    /// `GET` one record by id.
    async fn get(&self, id: &MolluskId) -> Result<Mollusk>;

    /// `POST` the record as-is and return what the server made of it.
    async fn save(&self, mollusk: &Mollusk) -> Result<Mollusk>;

    /// `DELETE` one record by id.
    async fn remove(&self, id: &MolluskId) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn url_template(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn refresh_target(&self) -> &str;
}
