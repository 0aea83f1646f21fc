//! `seatbook`: terminal client for the `EventBooking` contract
//!
//! ```text
//! BOOKING_BACKEND=memory cargo run -p seatbook
//! BOOKING_PRIVATE_KEY=0x... BOOKING_RPC_URL=http://127.0.0.1:8545 cargo run -p seatbook
//! ```

use seatbook::{BookingAction, BookingReducer, BookingState, BookingStore, Config, bootstrap, cli};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    // Logs go to stderr, the page to stdout
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,seatbook=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    seatbook_runtime::metrics::describe_metrics();

    let config = Config::from_env();
    tracing::info!(
        backend = ?config.backend,
        rpc_url = %config.chain.rpc_url,
        contract = %config.chain.contract_address,
        "Configuration loaded"
    );

    let environment = bootstrap::environment(&config)?;
    let store = BookingStore::new(BookingState::new(), BookingReducer::new(), environment);

    store.send(BookingAction::Connect).await;
    store.settle().await;

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    cli::run(&store, input, std::io::stdout()).await?;

    tracing::info!("Bye");
    Ok(())
}
