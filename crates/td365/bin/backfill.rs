use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use td365::Td365;

/// Print recent one-minute bars for a market: `backfill <market_id> [count]`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let market_id: i32 = args.next().ok_or("usage: backfill <market_id> [count]")?.parse()?;
    let count: usize = args.next().map(|c| c.parse()).transpose()?.unwrap_or(30);

    let client = Td365::connect().await?;
    let candles = client.backfill(market_id, count).await?;
    for candle in candles {
        println!(
            "{} o={} h={} l={} c={} v={}",
            candle.timestamp, candle.open, candle.high, candle.low, candle.close, candle.volume
        );
    }
    client.close().await;
    Ok(())
}
