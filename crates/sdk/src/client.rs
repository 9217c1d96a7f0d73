//! Workpool Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{EnqueueResponse, QueueSizeResponse, StatsResponse};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use std::time::Duration;

/// Workpool daemon client
///
/// # Example
///
/// ```no_run
/// use workpool_sdk::WorkpoolClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WorkpoolClient::connect("http://127.0.0.1:9527").await?;
/// let size = client.queue_size(1).await?;
/// # Ok(())
/// # }
/// ```
pub struct WorkpoolClient {
    client: HttpClient,
}

impl WorkpoolClient {
    /// Connect to the daemon at `url` (e.g. `http://127.0.0.1:9527`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Submit a message to processor `processor`
    pub async fn enqueue(&self, processor: usize) -> Result<EnqueueResponse> {
        let response: EnqueueResponse = self
            .client
            .request("queue.enqueue.v1", processor_params(processor)?)
            .await?;

        Ok(response)
    }

    /// Current queue size of processor `processor`
    pub async fn queue_size(&self, processor: usize) -> Result<usize> {
        let response: QueueSizeResponse = self
            .client
            .request("queue.size.v1", processor_params(processor)?)
            .await?;

        Ok(response.queue_size)
    }

    /// Statistics for every processor
    pub async fn stats(&self) -> Result<StatsResponse> {
        let response: StatsResponse = self
            .client
            .request("admin.stats.v1", ObjectParams::new())
            .await?;

        Ok(response)
    }
}

fn processor_params(processor: usize) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    params.insert("processor", processor)?;
    Ok(params)
}
