use ethers::types::Address;

use crate::blockchain::{
    chain::ChainReader,
    models::{AccountInfo, ChainError},
};

#[derive(Debug, Clone, Copy)]
pub struct AddressDetails {
    pub account: AccountInfo,
    /// Whether the address holds deployed bytecode
    pub is_contract: bool,
}

/// Balance, nonce and account type, fetched concurrently.
pub async fn address_details<C>(chain: &C, address: Address) -> Result<AddressDetails, ChainError>
where
    C: ChainReader + ?Sized,
{
    let (account, code) = tokio::try_join!(chain.get_account_info(address), chain.get_code(address))?;
    Ok(AddressDetails {
        account,
        is_contract: !code.is_empty(),
    })
}
