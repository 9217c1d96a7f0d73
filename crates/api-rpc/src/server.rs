//! JSON-RPC Server
//!
//! Serves the queue API over HTTP on localhost.

use crate::handler::RpcHandler;
use crate::types::{EnqueueRequest, QueueSizeRequest, StatsRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use workpool_core::application::ProcessorRegistry;
use workpool_core::domain::Message;
use workpool_core::error::{AppError, Result};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// A started server: bound address plus the handle used to stop it
pub struct RunningServer {
    pub local_addr: SocketAddr,
    pub handle: ServerHandle,
}

impl RunningServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.local_addr)
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, registry: Arc<ProcessorRegistry<Message>>) -> Self {
        Self {
            config,
            handler: Arc::new(RpcHandler::new(registry)),
        }
    }

    /// Build the method table
    pub fn module(&self) -> Result<RpcModule<()>> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_method("queue.enqueue.v1", move |params, _, _| {
                let req: EnqueueRequest = params.parse()?;
                handler.enqueue(req)
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_method("queue.size.v1", move |params, _, _| {
                let req: QueueSizeRequest = params.parse()?;
                handler.queue_size(req)
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let handler = self.handler.clone();
        module
            .register_method("admin.stats.v1", move |params, _, _| {
                let req: StatsRequest = params.parse()?;
                handler.stats(req)
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(module)
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<RunningServer> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| {
                AppError::Internal(format!("Failed to build server on {}: {}", addr, e))
            })?;
        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(format!("Failed to read bound address: {}", e)))?;

        let module = self.module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started");
        Ok(RunningServer { local_addr, handle })
    }
}
