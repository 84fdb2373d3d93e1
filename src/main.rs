//! TWAP Delay - demo entry point
//!
//! Loads a config (path from the first argument, or built-in defaults),
//! queues one order against in-memory collaborators and walks it through
//! maturity and settlement. Set `RUST_LOG=debug` for step-by-step logs.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use twap_delay::testing::{MockPriceOracle, MockTokens};
use twap_delay::types::{price, Address, BuyRequest};
use twap_delay::{CallContext, DelayConfig, DelayEngine, PriceAccumulatorSource, Result};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        error!(%err, "demo failed");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => DelayConfig::from_file(path)?,
        None => DelayConfig::new(
            Address::from_low_u64(0xaa),
            Address::from_low_u64(0xdd),
            Address::from_low_u64(0xee),
        ),
    };

    let owner = config.owner;
    let account = config.account;
    let weth = config.wrapped_native;
    let token = Address::from_low_u64(0x11);
    let wallet = Address::from_low_u64(0x01);
    let bot = Address::from_low_u64(0x02);

    let mut engine = DelayEngine::new(
        config,
        MockTokens::new(account, weth),
        MockPriceOracle::default(),
    )?;

    let now = 1_700_000_000;
    let admin = CallContext::new(owner, now);
    let pair_id = engine.register_pair(&admin, weth, token, Address::from_low_u64(0x99))?;
    engine.set_executor(&admin, bot, true)?;
    engine.oracle_mut().set_price(pair_id, 250_000_000);
    engine.fund(wallet, 10u128.pow(18))?;

    let request = BuyRequest {
        token_in: weth,
        token_out: token,
        amount_in_max: 1_000_000,
        amount_out: 400_000,
        wrap_unwrap: true,
        to: wallet,
        gas_limit: 400_000,
        submit_deadline: now + 60,
    };
    let required = engine.gas_price() * u128::from(request.gas_limit) + request.amount_in_max;
    let ctx = CallContext::new(wallet, now).with_value(required + 1_234);
    let receipt = engine.buy(&ctx, &request)?;
    info!(order_id = receipt.order_id, refund = receipt.refund, "buy queued");

    let (header, _) = engine.get_buy_order(receipt.order_id)?;
    let start = header.price_accumulator;
    let matured_at = header.valid_after_timestamp + 1;
    let submitted_at = header.timestamp;

    let settlement = engine.settle(&CallContext::new(bot, matured_at), receipt.order_id)?;
    info!(released = settlement.released, "order settled");

    // executor side: realized price over the delay window
    if let Some(pair) = engine.pair(&pair_id) {
        let end = engine.oracle().current_price_accumulator(pair, matured_at)?;
        if let Some(avg) = price::average_price(start, end, matured_at - submitted_at) {
            info!(%avg, "twap over delay window");
        }
    }

    info!(root = %hex::encode(engine.state_root()?), "queue audit root");
    Ok(())
}
