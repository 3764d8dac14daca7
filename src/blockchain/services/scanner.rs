use tracing::{debug, info, warn};

use crate::blockchain::{
    chain::ChainReader,
    models::{ChainError, MatchRecord, ScanResult},
};
use crate::search::FilterParams;
use crate::utils::wei_to_eth;

/// Scans backwards from the current chain head for transactions whose value
/// passes `filter`.
pub async fn scan<C>(
    chain: &C,
    filter: &FilterParams,
    window_size: u64,
    result_cap: usize,
) -> Result<ScanResult, ChainError>
where
    C: ChainReader + ?Sized,
{
    let head = chain.current_height().await?;
    scan_from(chain, filter, window_size, result_cap, head).await
}

/// Walks at most `window_size` blocks down from `chain_head`, newest first,
/// collecting up to `result_cap` matches.
///
/// No further blocks are fetched once the cap is reached. The first failed
/// fetch aborts the whole scan. A block the node does not have is counted as
/// scanned and contributes nothing.
pub async fn scan_from<C>(
    chain: &C,
    filter: &FilterParams,
    window_size: u64,
    result_cap: usize,
    chain_head: u64,
) -> Result<ScanResult, ChainError>
where
    C: ChainReader + ?Sized,
{
    let mut result = ScanResult {
        chain_head,
        ..ScanResult::default()
    };

    if filter.is_empty() {
        debug!("Scan requested without any value bounds, nothing can match");
        return Ok(result);
    }

    for offset in 0..window_size {
        if result.matches.len() >= result_cap {
            break;
        }
        let Some(block_number) = chain_head.checked_sub(offset) else {
            break;
        };

        let block = chain.get_block(block_number, true).await?;
        result.blocks_scanned += 1;

        let Some(block) = block else {
            warn!("Block {} not returned by node, skipping", block_number);
            continue;
        };

        info!(
            "Scanning block {} ({} transactions)",
            block_number,
            block.transactions.len()
        );

        for tx in block.transactions {
            if result.matches.len() >= result_cap {
                break;
            }
            if filter.matches(wei_to_eth(tx.value)) {
                result.matches.push(MatchRecord {
                    transaction_hash: tx.hash,
                    from_address: tx.from,
                    to_address: tx.to,
                    value_wei: tx.value,
                    block_number,
                });
            }
        }
    }

    Ok(result)
}
