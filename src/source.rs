use async_trait::async_trait;

use crate::error::Result;
use crate::types::Page;

/// Anything that can hand out character pages by 1-indexed page number.
#[async_trait]
pub trait PageSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn fetch_page(&self, page: u32) -> Result<Page>;
}
