//! End-to-end claim flow tests over a real listener.

mod common;

use alloy::primitives::{Address, U256};
use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use locket_voucher::chain::Wallet;
use locket_voucher::claim::ClaimService;
use locket_voucher::config::{ProfileConfig, VoucherConfig};
use locket_voucher::http::HttpServer;
use locket_voucher::profile::XProfileResolver;
use locket_voucher::voucher::{SignedVoucher, VoucherIssuer};

use common::{profile_page, start_mock_host, RecordingPublisher, StubChain};

// Well-known test private key (Anvil's first account)
const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const WALLET: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

struct TestServer {
    base_url: String,
    chain: Arc<StubChain>,
    publisher: Arc<RecordingPublisher>,
    issuer: VoucherIssuer,
}

/// Boot the service against a mock profile host and stubbed chain/storage.
async fn start_server(activity: u64, balance: U256) -> TestServer {
    let host = start_mock_host(|path| async move {
        match path.as_str() {
            "/alice" => (200, profile_page("alice")),
            // A real page that simply has no avatar element
            "/pixeless" => (200, "<html><body>no avatar here</body></html>".to_string()),
            _ => (404, "<html>gone</html>".to_string()),
        }
    })
    .await;

    let mut profile_config = ProfileConfig::default();
    profile_config.base_url = format!("http://{}", host);

    let chain = Arc::new(StubChain::new(activity, balance));
    let publisher = Arc::new(RecordingPublisher::new());
    let resolver =
        Arc::new(XProfileResolver::new(&profile_config, Duration::from_secs(5)).unwrap());

    let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap();
    let contract = Address::from_str(CONTRACT).unwrap();
    let issuer = VoucherIssuer::new(wallet, contract);

    let claims = Arc::new(ClaimService::new(
        chain.clone(),
        resolver.clone(),
        publisher.clone(),
        issuer.clone(),
        contract,
        5000,
    ));

    let server = HttpServer::new(VoucherConfig::default(), claims, resolver);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    TestServer {
        base_url: format!("http://{}", addr),
        chain,
        publisher,
        issuer,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn get_json(url: &str) -> (reqwest::StatusCode, serde_json::Value) {
    let res = client().get(url).send().await.expect("Service unreachable");
    let status = res.status();
    let body = res.json().await.expect("Non-JSON response body");
    (status, body)
}

#[tokio::test]
async fn test_eligible_wallet_receives_verifiable_voucher() {
    let ts = start_server(12_000, U256::ZERO).await;

    let res = client()
        .get(format!(
            "{}/signed-voucher?wallet={}&handle=@alice",
            ts.base_url, WALLET
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let signed: SignedVoucher = res.json().await.unwrap();
    assert_eq!(signed.voucher.recipient, Address::from_str(WALLET).unwrap());
    assert_eq!(signed.voucher.quantity, 1);
    assert!(signed.voucher.metadata_uri.starts_with("ipfs://"));
    assert!(ts.issuer.verify(&signed));

    // Artwork was composed from the upgraded hi-res image and published
    // before the metadata document referencing it.
    let published = ts.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 2);
    let svg = String::from_utf8(published[0].0.clone()).unwrap();
    assert!(svg.contains("alice_400x400.jpg"));
    assert!(!svg.contains("alice_normal.jpg"));

    let metadata: serde_json::Value = serde_json::from_slice(&published[1].0).unwrap();
    assert_eq!(metadata["name"], "Monad Soulbound NFT for @alice");
    assert!(metadata["image"]
        .as_str()
        .unwrap()
        .starts_with("ipfs://"));
}

#[tokio::test]
async fn test_tampered_voucher_fails_verification() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet={}&handle=@alice",
        ts.base_url, WALLET
    ))
    .await;
    assert_eq!(status, 200);

    let mut signed: SignedVoucher = serde_json::from_value(body).unwrap();
    signed.voucher.metadata_uri = "ipfs://bafkreiforged".to_string();
    assert!(!ts.issuer.verify(&signed));
}

#[tokio::test]
async fn test_below_threshold_is_rejected_without_side_effects() {
    let ts = start_server(4_999, U256::ZERO).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet={}&handle=@alice",
        ts.base_url, WALLET
    ))
    .await;

    assert_eq!(status, 403);
    assert_eq!(body["error"], "Not eligible");
    assert_eq!(ts.publisher.publish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_claimed_wallet_is_rejected_regardless_of_activity() {
    let ts = start_server(1_000_000, U256::from(1)).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet={}&handle=@alice",
        ts.base_url, WALLET
    ))
    .await;

    assert_eq!(status, 403);
    assert_eq!(body["error"], "Already claimed");
    assert_eq!(ts.publisher.publish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_second_claim_after_mint_publishes_nothing_new() {
    let ts = start_server(12_000, U256::ZERO).await;
    let url = format!(
        "{}/signed-voucher?wallet={}&handle=@alice",
        ts.base_url, WALLET
    );

    let (status, _) = get_json(&url).await;
    assert_eq!(status, 200);
    assert_eq!(ts.publisher.publish_calls.load(Ordering::SeqCst), 2);

    // The mint transaction lands; the wallet's balance becomes non-zero.
    ts.chain.set_balance(U256::from(1));

    let (status, body) = get_json(&url).await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Already claimed");
    assert_eq!(ts.publisher.publish_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_claims_for_one_wallet_both_succeed() {
    // The service holds no per-wallet reservation: two requests racing
    // ahead of the mint transaction both pass the balance gate. Only the
    // contract's balance check at mint time prevents a double mint.
    let ts = start_server(12_000, U256::ZERO).await;
    let url = format!(
        "{}/signed-voucher?wallet={}&handle=@alice",
        ts.base_url, WALLET
    );

    let (first, second) = tokio::join!(get_json(&url), get_json(&url));
    assert_eq!(first.0, 200);
    assert_eq!(second.0, 200);

    let a: SignedVoucher = serde_json::from_value(first.1).unwrap();
    let b: SignedVoucher = serde_json::from_value(second.1).unwrap();
    assert_ne!(a.voucher.uid, b.voucher.uid);
}

#[tokio::test]
async fn test_missing_parameters_rejected() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet={}",
        ts.base_url, WALLET
    ))
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing wallet or handle");

    let (status, body) =
        get_json(&format!("{}/signed-voucher?handle=@alice", ts.base_url)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing wallet or handle");
}

#[tokio::test]
async fn test_malformed_wallet_rejected() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet=0x123&handle=@alice",
        ts.base_url
    ))
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid wallet address");
}

#[tokio::test]
async fn test_unresolvable_handle_yields_no_voucher() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!(
        "{}/signed-voucher?wallet={}&handle=@pixeless",
        ts.base_url, WALLET
    ))
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid handle");
    assert_eq!(ts.publisher.publish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_profile_image_endpoint_upgrades_resolution() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) =
        get_json(&format!("{}/profile-image?handle=@alice", ts.base_url)).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["url"],
        "https://pbs.twimg.com/profile_images/99/alice_400x400.jpg"
    );
}

#[tokio::test]
async fn test_profile_image_requires_handle() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!("{}/profile-image", ts.base_url)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No handle provided");

    // A bare `@` normalizes to nothing
    let (status, body) =
        get_json(&format!("{}/profile-image?handle=@", ts.base_url)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No handle provided");
}

#[tokio::test]
async fn test_profile_image_not_found_paths() {
    let ts = start_server(12_000, U256::ZERO).await;

    // Page exists but carries no avatar element
    let (status, body) =
        get_json(&format!("{}/profile-image?handle=@pixeless", ts.base_url)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Profile pic not found");

    // Upstream answers non-success for the handle
    let (status, body) =
        get_json(&format!("{}/profile-image?handle=@nonexistent", ts.base_url)).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Failed to fetch X profile");
}

#[tokio::test]
async fn test_health_endpoint() {
    let ts = start_server(12_000, U256::ZERO).await;

    let (status, body) = get_json(&format!("{}/health", ts.base_url)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "operational");
}
