use ethers::types::H256;
use tracing::info;

use crate::blockchain::{
    chain::ChainReader,
    models::{ChainError, ChainReceipt, ChainTransaction},
};

/// A transaction with its receipt, if it has been mined.
#[derive(Debug, Clone)]
pub struct TransactionDetails {
    pub transaction: ChainTransaction,
    pub receipt: Option<ChainReceipt>,
}

/// Looks up a transaction and its receipt. `None` when the hash is unknown.
pub async fn transaction_details<C>(
    chain: &C,
    hash: H256,
) -> Result<Option<TransactionDetails>, ChainError>
where
    C: ChainReader + ?Sized,
{
    let Some(transaction) = chain.get_transaction(hash).await? else {
        info!("Transaction {:?} not found", hash);
        return Ok(None);
    };
    let receipt = chain.get_transaction_receipt(hash).await?;
    Ok(Some(TransactionDetails {
        transaction,
        receipt,
    }))
}

/// First `count` transactions of the latest block, with that block's number.
pub async fn latest_transactions<C>(
    chain: &C,
    count: usize,
) -> Result<(u64, Vec<ChainTransaction>), ChainError>
where
    C: ChainReader + ?Sized,
{
    let head = chain.current_height().await?;
    let transactions = chain
        .get_block(head, true)
        .await?
        .map(|block| block.transactions.into_iter().take(count).collect())
        .unwrap_or_default();
    Ok((head, transactions))
}
