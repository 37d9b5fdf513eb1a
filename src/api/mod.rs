pub mod client;
pub mod models;
pub mod response;
pub mod streaming;

pub use client::HttpTransport;
pub use models::RequestBody;
pub use streaming::FragmentStream;

use crate::error::Result;

/// Completion-request transport. Buffered mode returns the full assistant
/// text in one piece; incremental mode hands back a stream of content
/// fragments the caller consumes one at a time.
#[allow(async_fn_in_trait)]
pub trait CompletionTransport {
    /// Issue one blocking request and return the complete assistant text.
    async fn complete(&self, request: &RequestBody) -> Result<String>;

    /// Issue a streaming request and return the sequence of content
    /// fragments, terminated by end-of-stream.
    async fn open_stream(&self, request: &RequestBody) -> Result<FragmentStream>;
}
