// src/blockchain/evm_client.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, Bytes, H256},
};

use crate::blockchain::{
    chain::ChainReader,
    models::{AccountInfo, ChainBlock, ChainError, ChainReceipt, ChainTransaction},
};

/// `ChainReader` backed by an Ethereum JSON-RPC endpoint.
///
/// Every upstream call is bounded by `timeout`; an expired call surfaces as
/// `ChainError::Timeout` and is never retried.
#[derive(Clone)]
pub struct EvmClient {
    provider: Arc<Provider<Http>>,
    timeout: Duration,
}

impl EvmClient {
    /// Create a new EvmClient for the given RPC URL
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;
        Ok(Self {
            provider: Arc::new(provider),
            timeout,
        })
    }

    pub fn url(&self) -> String {
        self.provider.url().to_string()
    }

    async fn call<T, E, F>(&self, operation: &'static str, request: F) -> Result<T, ChainError>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::error!("{} failed: {}", operation, e);
                Err(ChainError::Upstream {
                    operation,
                    message: e.to_string(),
                })
            }
            Err(_) => {
                tracing::error!("{} timed out after {:?}", operation, self.timeout);
                Err(ChainError::Timeout {
                    operation,
                    seconds: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl ChainReader for EvmClient {
    async fn current_height(&self) -> Result<u64, ChainError> {
        let number = self
            .call("eth_blockNumber", self.provider.get_block_number())
            .await?;
        Ok(number.as_u64())
    }

    async fn get_block(
        &self,
        number: u64,
        include_transactions: bool,
    ) -> Result<Option<ChainBlock>, ChainError> {
        if include_transactions {
            let block = self
                .call("eth_getBlockByNumber", self.provider.get_block_with_txs(number))
                .await?;
            Ok(block.map(|b| ChainBlock::from_full(b, number)))
        } else {
            let block = self
                .call("eth_getBlockByNumber", self.provider.get_block(number))
                .await?;
            Ok(block.map(|b| ChainBlock::from_hashes(b, number)))
        }
    }

    async fn get_transaction(&self, hash: H256) -> Result<Option<ChainTransaction>, ChainError> {
        let tx = self
            .call("eth_getTransactionByHash", self.provider.get_transaction(hash))
            .await?;
        Ok(tx.map(Into::into))
    }

    async fn get_transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ChainReceipt>, ChainError> {
        let receipt = self
            .call(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(hash),
            )
            .await?;
        Ok(receipt.map(Into::into))
    }

    async fn get_account_info(&self, address: Address) -> Result<AccountInfo, ChainError> {
        let (balance, transaction_count) = tokio::try_join!(
            self.call("eth_getBalance", self.provider.get_balance(address, None)),
            self.call(
                "eth_getTransactionCount",
                self.provider.get_transaction_count(address, None)
            ),
        )?;
        Ok(AccountInfo {
            balance,
            transaction_count,
        })
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError> {
        self.call("eth_getCode", self.provider.get_code(address, None))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, Matcher};
    use serde_json::json;

    fn client() -> EvmClient {
        EvmClient::new(&mockito::server_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn reads_current_height() {
        let _m = mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x121eac0"}"#)
            .create();

        let height = client().current_height().await.unwrap();
        assert_eq!(height, 19_000_000);
    }

    #[tokio::test]
    async fn rpc_error_is_upstream_failure() {
        let _m = mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_getCode"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"boom"}}"#)
            .create();

        let err = client().get_code(Address::zero()).await.unwrap_err();
        assert!(matches!(
            err,
            ChainError::Upstream {
                operation: "eth_getCode",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn missing_transaction_is_none() {
        let _m = mock("POST", "/")
            .match_body(Matcher::PartialJson(
                json!({"method": "eth_getTransactionByHash"}),
            ))
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":null}"#)
            .create();

        let tx = client().get_transaction(H256::zero()).await.unwrap();
        assert!(tx.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out() {
        let client = EvmClient::new("http://localhost:8545", Duration::from_secs(10)).unwrap();

        let err = client
            .call("eth_blockNumber", std::future::pending::<Result<(), String>>())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ChainError::Timeout {
                operation: "eth_blockNumber",
                seconds: 10
            }
        ));
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(EvmClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
