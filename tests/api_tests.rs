//! Tests for the search API against an in-memory chain

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ethers::types::{Address, Bytes, H256, U256};
use serde_json::Value;
use tower::ServiceExt;

use ethernet_search::{
    api::create_router,
    blockchain::{
        models::{AccountInfo, ChainBlock, ChainError, ChainReceipt, ChainTransaction},
        ChainReader,
    },
    config::Config,
    rich_list::RichList,
    AppState,
};

const HEAD: u64 = 19_000_000;
const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

#[derive(Default)]
struct FakeChain {
    head: u64,
    blocks: HashMap<u64, ChainBlock>,
    receipts: HashMap<H256, ChainReceipt>,
    accounts: HashMap<Address, AccountInfo>,
    code: HashMap<Address, Bytes>,
    offline: bool,
    fetched_blocks: Mutex<Vec<u64>>,
}

impl FakeChain {
    fn check_online(&self, operation: &'static str) -> Result<(), ChainError> {
        if self.offline {
            return Err(ChainError::Timeout {
                operation,
                seconds: 10,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn current_height(&self) -> Result<u64, ChainError> {
        self.check_online("eth_blockNumber")?;
        Ok(self.head)
    }

    async fn get_block(
        &self,
        number: u64,
        include_transactions: bool,
    ) -> Result<Option<ChainBlock>, ChainError> {
        self.check_online("eth_getBlockByNumber")?;
        self.fetched_blocks.lock().unwrap().push(number);
        Ok(self.blocks.get(&number).cloned().map(|mut block| {
            if !include_transactions {
                block.transactions.clear();
            }
            block
        }))
    }

    async fn get_transaction(&self, hash: H256) -> Result<Option<ChainTransaction>, ChainError> {
        self.check_online("eth_getTransactionByHash")?;
        Ok(self
            .blocks
            .values()
            .flat_map(|block| block.transactions.iter())
            .find(|tx| tx.hash == hash)
            .cloned())
    }

    async fn get_transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<ChainReceipt>, ChainError> {
        self.check_online("eth_getTransactionReceipt")?;
        Ok(self.receipts.get(&hash).cloned())
    }

    async fn get_account_info(&self, address: Address) -> Result<AccountInfo, ChainError> {
        self.check_online("eth_getBalance")?;
        Ok(self.accounts.get(&address).copied().unwrap_or_default())
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError> {
        self.check_online("eth_getCode")?;
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }
}

fn eth(milli: u64) -> U256 {
    U256::from(milli) * U256::exp10(15)
}

fn tx(id: u64, block_number: u64, value: U256) -> ChainTransaction {
    ChainTransaction {
        hash: H256::from_low_u64_be(id),
        from: Address::from_low_u64_be(id),
        to: Some(Address::from_low_u64_be(id + 1000)),
        value,
        block_number: Some(block_number),
        gas: U256::from(21_000u64),
        gas_price: Some(U256::from(30_000_000_000u64)),
        ..ChainTransaction::default()
    }
}

fn block(number: u64, transactions: Vec<ChainTransaction>) -> ChainBlock {
    ChainBlock {
        number,
        hash: Some(H256::from_low_u64_be(number)),
        timestamp: 1_700_000_000 + number,
        miner: Some(Address::from_low_u64_be(0xfee)),
        gas_used: U256::from(15_000_000u64),
        gas_limit: U256::from(30_000_000u64),
        base_fee_per_gas: Some(U256::from(20_000_000_000u64)),
        transaction_count: transactions.len(),
        transactions,
    }
}

/// Head block holds [1, 15, 0.5] ETH, the one below [200] ETH, then an empty block.
fn sample_chain() -> FakeChain {
    let mut chain = FakeChain {
        head: HEAD,
        ..FakeChain::default()
    };
    for b in [
        block(
            HEAD,
            vec![
                tx(1, HEAD, eth(1_000)),
                tx(2, HEAD, eth(15_000)),
                tx(3, HEAD, eth(500)),
            ],
        ),
        block(HEAD - 1, vec![tx(4, HEAD - 1, eth(200_000))]),
        block(HEAD - 2, vec![]),
    ] {
        chain.blocks.insert(b.number, b);
    }
    chain.receipts.insert(
        H256::from_low_u64_be(2),
        ChainReceipt {
            success: true,
            gas_used: Some(U256::from(21_000u64)),
            effective_gas_price: Some(U256::from(30_000_000_000u64)),
        },
    );
    chain
}

fn create_test_app(chain: Arc<FakeChain>) -> Router {
    let state = AppState {
        config: Config::default(),
        chain,
        rich_list: Arc::new(RichList::builtin().unwrap()),
    };
    create_router(state)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_classify_routes_each_kind() {
    let chain = Arc::new(sample_chain());

    let (status, body) = get_json(create_test_app(chain.clone()), "/api/classify?q=%20Blocks%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classification"]["kind"], "keyword");
    assert_eq!(body["classification"]["value"], "blocks");
    assert_eq!(body["destination"], "/blocks");

    let (_, body) = get_json(create_test_app(chain.clone()), "/api/classify?q=12345").await;
    assert_eq!(body["classification"]["kind"], "block");
    assert_eq!(body["destination"], "/block/12345");

    let uri = format!("/api/classify?q={}", VITALIK);
    let (_, body) = get_json(create_test_app(chain.clone()), &uri).await;
    assert_eq!(body["classification"]["kind"], "address");

    let (_, body) = get_json(
        create_test_app(chain.clone()),
        "/api/classify?q=whale+moves",
    )
    .await;
    assert_eq!(body["classification"]["kind"], "value_filter");
    assert_eq!(body["classification"]["value"]["min_value"], 100.0);
    assert_eq!(body["destination"], "/search?q=whale+moves&min=100");

    // Classification alone never reaches the chain
    assert!(chain.fetched_blocks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_classify_rejects_unrecognized_input() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/classify?q=hello").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Enter a valid block number, transaction hash, or address"
    );
}

#[tokio::test]
async fn test_classify_empty_query_offers_suggestions() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/classify").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
    assert_eq!(body["suggestions"][0]["query"], "transactions over 10 eth");
}

#[tokio::test]
async fn test_search_phrase_scans_recent_blocks() {
    let chain = Arc::new(sample_chain());
    let app = create_test_app(chain.clone());
    let (status, body) = get_json(app, "/api/search?q=transactions+over+10+eth&blocks=3").await;

    assert_eq!(status, StatusCode::OK);
    let scan = &body["scan"];
    assert_eq!(scan["chain_head"], HEAD);
    assert_eq!(scan["blocks_scanned"], 3);
    assert_eq!(
        scan["description"],
        "Found 2 transactions over 10 ETH in the last 3 blocks"
    );

    let matches = scan["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["hash"], format!("{:?}", H256::from_low_u64_be(2)));
    assert_eq!(matches[0]["value_wei"], "15000000000000000000");
    assert_eq!(matches[0]["value_eth"], 15.0);
    assert_eq!(matches[0]["block_number"], HEAD);
    assert!(matches[0]["snippet"]
        .as_str()
        .unwrap()
        .starts_with("Transfer of 15.0000 ETH from 0x0000...0002"));
    assert_eq!(matches[1]["hash"], format!("{:?}", H256::from_low_u64_be(4)));
    assert_eq!(matches[1]["block_number"], HEAD - 1);
}

#[tokio::test]
async fn test_search_stops_at_result_cap() {
    let chain = Arc::new(sample_chain());
    let app = create_test_app(chain.clone());
    let (status, body) = get_json(app, "/api/search?min=10&blocks=3&limit=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"]["matches"].as_array().unwrap().len(), 1);
    assert_eq!(*chain.fetched_blocks.lock().unwrap(), vec![HEAD]);
}

#[tokio::test]
async fn test_search_explicit_params_override_phrase() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/search?q=whale+moves&exact=0.5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"]["filter"]["exact_value"], 0.5);
    let matches = body["scan"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["hash"], format!("{:?}", H256::from_low_u64_be(3)));
}

#[tokio::test]
async fn test_search_empty_params_are_ignored() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) =
        get_json(app, "/api/search?q=transactions+over+10+eth&min=&exact=&limit=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"]["filter"]["min_value"], 10.0);
    assert_eq!(body["scan"]["result_cap"], Config::default().scan_result_cap);
    assert_eq!(body["scan"]["matches"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_malformed_params_are_json_errors() {
    let chain = Arc::new(sample_chain());

    let (status, body) =
        get_json(create_test_app(chain.clone()), "/api/search?q=whale+moves&min=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid value for min: abc");

    let (status, body) = get_json(create_test_app(chain.clone()), "/api/search?min=1&blocks=-3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid value for blocks: -3");

    assert!(chain.fetched_blocks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_window_is_clamped() {
    let chain = Arc::new(sample_chain());
    let app = create_test_app(chain.clone());
    let (status, body) = get_json(app, "/api/search?max=1000&blocks=100000").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scan"]["window_blocks"], Config::default().max_scan_window_blocks);
}

#[tokio::test]
async fn test_search_non_filter_query_returns_destination() {
    let chain = Arc::new(sample_chain());
    let app = create_test_app(chain.clone());
    let (status, body) = get_json(app, "/api/search?q=addys").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "/addresses");
    assert!(body.get("scan").is_none());
    assert!(chain.fetched_blocks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_upstream_failure_is_bad_gateway() {
    let chain = FakeChain {
        offline: true,
        ..sample_chain()
    };
    let app = create_test_app(Arc::new(chain));
    let (status, body) = get_json(app, "/api/search?q=large+transactions").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_block_lookup() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, &format!("/api/block/{}", HEAD)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], HEAD);
    assert_eq!(body["transaction_count"], 3);
    assert_eq!(body["gas_used_percent"], 50.0);
    assert_eq!(body["base_fee_gwei"], 20.0);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_block_not_found() {
    let chain = Arc::new(sample_chain());

    let (status, _) = get_json(create_test_app(chain.clone()), "/api/block/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(create_test_app(chain.clone()), "/api/block/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let huge = "9".repeat(40);
    let (status, _) = get_json(create_test_app(chain), &format!("/api/block/{}", huge)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_blocks() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/blocks").await;

    assert_eq!(status, StatusCode::OK);
    let blocks = body["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0]["number"], HEAD);
    assert_eq!(blocks[2]["number"], HEAD - 2);
}

#[tokio::test]
async fn test_transaction_lookup() {
    let app = create_test_app(Arc::new(sample_chain()));
    let uri = format!("/api/tx/{:?}", H256::from_low_u64_be(2));
    let (status, body) = get_json(app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["value_eth"], 15.0);
    assert_eq!(body["gas_price_gwei"], 30.0);
    assert_eq!(body["fee_eth"], 0.00063);
    assert!(body["input_preview"].is_null());
}

#[tokio::test]
async fn test_pending_and_unknown_transactions() {
    let chain = Arc::new(sample_chain());

    let uri = format!("/api/tx/{:?}", H256::from_low_u64_be(1));
    let (status, body) = get_json(create_test_app(chain.clone()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");

    let uri = format!("/api/tx/{:?}", H256::from_low_u64_be(999));
    let (status, _) = get_json(create_test_app(chain.clone()), &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(create_test_app(chain), "/api/tx/0x1234").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_latest_transactions() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/transactions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["block_number"], HEAD);
    assert_eq!(body["transactions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_address_lookup() {
    let mut chain = sample_chain();
    let vitalik: Address = VITALIK.parse().unwrap();
    chain.accounts.insert(
        vitalik,
        AccountInfo {
            balance: eth(2_500),
            transaction_count: U256::from(1_234u64),
        },
    );
    let app = create_test_app(Arc::new(chain));
    let (status, body) = get_json(app, &format!("/api/address/{}", VITALIK)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], VITALIK);
    assert_eq!(body["balance_eth"], 2.5);
    assert_eq!(body["transaction_count"], "1234");
    assert_eq!(body["is_contract"], false);
    assert_eq!(body["label"], "vitalik.eth");
}

#[tokio::test]
async fn test_padded_address_keeps_label() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, &format!("/api/address/%20{}%20", VITALIK)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], VITALIK);
    assert_eq!(body["label"], "vitalik.eth");
}

#[tokio::test]
async fn test_contract_address() {
    let mut chain = sample_chain();
    let contract = Address::from_low_u64_be(0xc0de);
    chain.code.insert(contract, Bytes::from(vec![0x60, 0x80]));
    let app = create_test_app(Arc::new(chain));
    let (status, body) = get_json(app, &format!("/api/address/{:?}", contract)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_contract"], true);
    assert!(body.get("label").is_none());
}

#[tokio::test]
async fn test_rich_list() {
    let app = create_test_app(Arc::new(sample_chain()));
    let (status, body) = get_json(app, "/api/addresses").await;

    assert_eq!(status, StatusCode::OK);
    let addresses = body["addresses"].as_array().unwrap();
    assert_eq!(addresses.len(), 50);
    assert_eq!(addresses[0]["rank"], 1);
    assert_eq!(addresses[0]["name"], "Beacon Deposit Contract");
}
