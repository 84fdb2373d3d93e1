//! Benchmarks for the delay engine.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench -- enqueue
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::time::Duration;

use twap_delay::testing::{MockPriceOracle, MockTokens};
use twap_delay::types::{Address, BuyRequest, PairId};
use twap_delay::{CallContext, DelayConfig, DelayEngine};

type Engine = DelayEngine<MockTokens, MockPriceOracle>;

const NOW: u64 = 1_700_000_000;
const GAS_LIMIT: u64 = 400_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

/// Engine with one registered pair, a funded wallet and an executor.
fn setup() -> (Engine, PairId) {
    let (owner, account, weth) = (addr(0xaa), addr(0xdd), addr(0xee));
    let mut tokens = MockTokens::new(account, weth);
    tokens.mint(addr(0x10), owner, u128::MAX / 2);

    let mut engine = DelayEngine::new(
        DelayConfig::new(owner, account, weth),
        tokens,
        MockPriceOracle::default(),
    )
    .unwrap();
    let ctx = CallContext::new(owner, NOW);
    let pair = engine.register_pair(&ctx, addr(0x10), addr(0x20), addr(0x1020)).unwrap();
    engine.oracle_mut().set_price(pair, 100_000_000);
    engine.set_executor(&ctx, addr(0xb0), true).unwrap();
    engine.fund(owner, u128::MAX / 2).unwrap();
    (engine, pair)
}

fn buy_request() -> BuyRequest {
    BuyRequest {
        token_in: addr(0x10),
        token_out: addr(0x20),
        amount_in_max: 1_000,
        amount_out: 900,
        wrap_unwrap: false,
        to: addr(0xaa),
        gas_limit: GAS_LIMIT,
        submit_deadline: u64::MAX,
    }
}

fn populate(engine: &mut Engine, count: usize) {
    let ctx = CallContext::new(addr(0xaa), NOW).with_value(engine.gas_price() * u128::from(GAS_LIMIT));
    let request = buy_request();
    for _ in 0..count {
        engine.buy(&ctx, &request).unwrap();
    }
}

// ============================================================================
// BENCHMARKS
// ============================================================================

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.measurement_time(Duration::from_secs(5));

    let (mut engine, _) = setup();
    let request = buy_request();
    let ctx = CallContext::new(addr(0xaa), NOW)
        .with_value(engine.gas_price() * u128::from(GAS_LIMIT) + 1);

    group.bench_function("buy", |b| {
        b.iter(|| black_box(engine.buy(black_box(&ctx), black_box(&request)).unwrap()))
    });

    group.finish();
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("settle_1k_matured", |b| {
        b.iter_batched(
            || {
                let (mut engine, _) = setup();
                populate(&mut engine, 1_000);
                engine
            },
            |mut engine| {
                let ctx = CallContext::new(addr(0xb0), NOW + engine.delay() + 1);
                for id in 1..=1_000 {
                    engine.settle(&ctx, id).unwrap();
                }
                engine
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_state_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_root");

    let (mut engine, _) = setup();
    populate(&mut engine, 10_000);
    group.bench_function("10k_orders", |b| b.iter(|| black_box(engine.state_root().unwrap())));

    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_settle, bench_state_root);
criterion_main!(benches);
