use crate::CoreResult;

use async_trait::async_trait;

/// The window hosting a recorder page.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// Ask the coordinator for a fresh recorder window.
    async fn request_reopen(&self) -> CoreResult<()>;

    /// Close the window this page lives in.
    async fn close_window(&self) -> CoreResult<()>;
}
