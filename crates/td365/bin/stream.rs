use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use td365::types::Event;
use td365::Td365;

/// Connect to the one-click demo (or a real account when TD_USERNAME /
/// TD_PASSWORD / TD_ACCOUNT_ID are set), subscribe to every market of the
/// first Cryptocurrency group and print the stream.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = match td365::Credential::from_env() {
        Ok(credential) => {
            Td365::connect_with_credentials(
                &credential.username,
                &credential.password,
                &credential.account_id,
            )
            .await?
        }
        Err(_) => Td365::connect().await?,
    };

    let super_groups = client.get_market_super_group().await?;
    let crypto = super_groups
        .iter()
        .find(|g| g.name == "Cryptocurrency")
        .ok_or("no Cryptocurrency super group")?;
    let groups = client.get_market_group(crypto.id).await?;
    for group in &groups {
        let markets = client.get_market_quote(group.id).await?;
        for market in &markets {
            println!("subscribing {} ({})", market.market_name, market.quote_id);
            client.subscribe(market.quote_id).await?;
        }
    }

    loop {
        tokio::select! {
            event = client.wait(None) => match event {
                Event::Tick(tick) => println!("{tick}"),
                Event::SubscribeAck(ticks) => {
                    for tick in ticks {
                        println!("snapshot {tick}");
                    }
                }
                Event::AccountSummary(summary) => println!("{summary:?}"),
                Event::AccountDetails(details) => println!("{details:?}"),
                Event::TradeEstablished(trade) => println!("{trade:?}"),
                Event::Error(message) => eprintln!("error: {message}"),
                Event::Timeout => {}
                Event::ConnectionClosed => break,
            },
            _ = tokio::signal::ctrl_c() => {
                client.close().await;
                break;
            }
        }
    }

    Ok(())
}
