use dotenvy::dotenv;

use td365::Td365;

// Hits the real demo venue; run with --ignored when online.
#[ignore]
#[tokio::test]
async fn one_click_demo_smoke() {
    dotenv().ok();

    let client = Td365::connect().await.expect("connect failed");
    let super_groups = client.get_market_super_group().await.expect("discovery failed");
    assert!(!super_groups.is_empty());

    client.close().await;
}
