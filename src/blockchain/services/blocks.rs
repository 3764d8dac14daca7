use tracing::{info, warn};

use crate::blockchain::{
    chain::ChainReader,
    models::{ChainBlock, ChainError},
};

/// Fetches up to `count` block headers walking down from the chain head.
///
/// Stops at genesis. Blocks the node does not return are left out.
pub async fn latest_blocks<C>(chain: &C, count: u64) -> Result<Vec<ChainBlock>, ChainError>
where
    C: ChainReader + ?Sized,
{
    let head = chain.current_height().await?;
    info!("Fetching {} latest blocks from head {}", count, head);

    let mut blocks = Vec::new();
    for offset in 0..count {
        let Some(number) = head.checked_sub(offset) else {
            break;
        };
        match chain.get_block(number, false).await? {
            Some(block) => blocks.push(block),
            None => warn!("Block {} not returned by node", number),
        }
    }
    Ok(blocks)
}
