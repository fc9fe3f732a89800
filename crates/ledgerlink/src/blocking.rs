//! Blocking wrapper around the async RPC client.
//!
//! Each call drives one request to completion on a private current-thread
//! runtime. Do not call these methods from inside another async runtime.

use tokio::runtime::{Builder, Runtime};

use ledgerlink_core::{Address, SignedTransaction};
use ledgerlink_rpc::{
    AccountStateWithProof, AccountView, Client, CurrencyInfoView, EventView, HttpTransport,
    MetadataView, RpcConfig, SubmitReceipt, Transport,
};

use crate::error::Result;

/// Synchronous ledger client.
pub struct BlockingClient<T: Transport = HttpTransport> {
    runtime: Runtime,
    inner: Client<T>,
}

impl BlockingClient<HttpTransport> {
    /// Build an HTTP client from configuration.
    pub fn connect(config: &RpcConfig) -> Result<Self> {
        Ok(Self {
            runtime: new_runtime()?,
            inner: Client::connect(config)?,
        })
    }
}

impl<T: Transport> BlockingClient<T> {
    /// Wrap an existing transport.
    pub fn new(transport: T) -> Result<Self> {
        Ok(Self {
            runtime: new_runtime()?,
            inner: Client::new(transport),
        })
    }

    /// The async client this wraps.
    pub fn inner(&self) -> &Client<T> {
        &self.inner
    }

    pub fn submit(&self, signed_txn: &[u8]) -> Result<SubmitReceipt> {
        Ok(self.runtime.block_on(self.inner.submit(signed_txn))?)
    }

    pub fn submit_transaction(&self, txn: &SignedTransaction) -> Result<SubmitReceipt> {
        Ok(self.runtime.block_on(self.inner.submit_transaction(txn))?)
    }

    pub fn get_account(&self, address: Address, version: Option<u64>) -> Result<AccountView> {
        Ok(self
            .runtime
            .block_on(self.inner.get_account(address, version))?)
    }

    pub fn get_account_state_blob(&self, address: &str) -> Result<AccountStateWithProof> {
        Ok(self
            .runtime
            .block_on(self.inner.get_account_state_blob(address))?)
    }

    pub fn get_events(
        &self,
        event_key: &str,
        start: u64,
        limit: u64,
        request_id: u64,
    ) -> Result<Vec<EventView>> {
        Ok(self
            .runtime
            .block_on(self.inner.get_events(event_key, start, limit, request_id))?)
    }

    pub fn get_currencies(&self) -> Result<Vec<CurrencyInfoView>> {
        Ok(self.runtime.block_on(self.inner.get_currencies())?)
    }

    pub fn get_metadata(&self, version: Option<u64>) -> Result<MetadataView> {
        Ok(self.runtime.block_on(self.inner.get_metadata(version))?)
    }
}

fn new_runtime() -> Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlink_core::ErrorKind;
    use ledgerlink_rpc::{HttpResponse, MemoryTransport, ProxyConfig};

    #[test]
    fn test_blocking_get_account() {
        let transport = MemoryTransport::with_responses(vec![HttpResponse::ok(
            r#"{"id":1,"result":{"sequence_number":3}}"#,
        )]);
        let client = BlockingClient::new(transport).unwrap();

        let view = client.get_account(Address::ZERO, None).unwrap();
        assert_eq!(view.sequence_number, Some(3));
        assert_eq!(client.inner().transport().requests().len(), 1);
    }

    #[test]
    fn test_blocking_errors_keep_their_kind() {
        let transport = MemoryTransport::with_responses(vec![HttpResponse::new(502, "bad gateway")]);
        let client = BlockingClient::new(transport).unwrap();
        let err = client.get_currencies().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_blocking_http_connection_refused() {
        let config = RpcConfig::new("http://127.0.0.1:1")
            .with_proxy(ProxyConfig::Disabled)
            .with_timeout(std::time::Duration::from_secs(2));
        let client = BlockingClient::connect(&config).unwrap();
        let err = client.get_metadata(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
