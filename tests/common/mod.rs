//! Shared fixture for the integration tests.
#![allow(dead_code)]

use twap_delay::testing::{MockPriceOracle, MockTokens};
use twap_delay::types::{
    Address, BuyRequest, DepositRequest, PairId, SellRequest, WithdrawRequest,
};
use twap_delay::{CallContext, DelayConfig, DelayEngine};

pub type Engine = DelayEngine<MockTokens, MockPriceOracle>;

/// Block time at which every fixture starts.
pub const NOW: u64 = 1_700_000_000;

/// Native and token balance handed to the wallet.
pub const FUNDING: u128 = 1_000_000_000_000_000_000_000;

pub const GAS_LIMIT: u64 = 400_000;

pub struct Fixture {
    pub engine: Engine,
    /// Deployer: owner of the engine and the trading wallet
    pub wallet: Address,
    pub other: Address,
    pub bot: Address,
    pub token0: Address,
    pub token1: Address,
    pub weth: Address,
    pub token: Address,
    pub lp01: Address,
    pub pair: PairId,
    pub weth_pair: PairId,
}

impl Fixture {
    pub fn ctx(&self, sender: Address) -> CallContext {
        CallContext::new(sender, NOW)
    }

    pub fn owner_ctx(&self) -> CallContext {
        self.ctx(self.wallet)
    }

    /// `gas_price * GAS_LIMIT` at the current gas price.
    pub fn gas_cost(&self) -> u128 {
        self.engine.gas_price() * u128::from(GAS_LIMIT)
    }
}

pub fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

pub fn delay_fixture() -> Fixture {
    let wallet = addr(0xaa);
    let account = addr(0xdd);
    let weth = addr(0xee);
    let (token0, token1, token) = (addr(0x10), addr(0x20), addr(0x30));
    let (lp01, lp_weth) = (addr(0x1020), addr(0x30ee));
    let bot = addr(0xb0);

    let config = DelayConfig::new(wallet, account, weth);
    let mut tokens = MockTokens::new(account, weth);
    for t in [token0, token1, token, lp01, lp_weth] {
        tokens.mint(t, wallet, FUNDING);
    }

    let mut engine = DelayEngine::new(config, tokens, MockPriceOracle::default())
        .expect("engine config is valid");
    let owner = CallContext::new(wallet, NOW);

    let pair = engine.register_pair(&owner, token0, token1, lp01).unwrap();
    let weth_pair = engine.register_pair(&owner, token, weth, lp_weth).unwrap();
    engine.oracle_mut().set_price(pair, 100_000_000);
    engine.oracle_mut().set_price(weth_pair, 250_000_000);
    engine.set_executor(&owner, bot, true).unwrap();
    engine.fund(wallet, FUNDING).unwrap();
    engine.take_events();

    Fixture {
        engine,
        wallet,
        other: addr(0xbb),
        bot,
        token0,
        token1,
        weth,
        token,
        lp01,
        pair,
        weth_pair,
    }
}

pub fn default_buy(token_in: Address, token_out: Address, to: Address) -> BuyRequest {
    BuyRequest {
        token_in,
        token_out,
        amount_in_max: 1_000_000,
        amount_out: 900_000,
        wrap_unwrap: false,
        to,
        gas_limit: GAS_LIMIT,
        submit_deadline: u64::MAX,
    }
}

pub fn default_sell(token_in: Address, token_out: Address, to: Address) -> SellRequest {
    SellRequest {
        token_in,
        token_out,
        amount_in: 1_000_000,
        amount_out_min: 0,
        wrap_unwrap: false,
        to,
        gas_limit: GAS_LIMIT,
        submit_deadline: u64::MAX,
    }
}

pub fn default_deposit(token0: Address, token1: Address, to: Address) -> DepositRequest {
    DepositRequest {
        token0,
        token1,
        amount0: 1_000_000,
        amount1: 2_000_000,
        swap: true,
        min_swap_price: 0,
        max_swap_price: 1_000_000_000,
        wrap_unwrap: false,
        to,
        gas_limit: GAS_LIMIT,
        submit_deadline: u64::MAX,
    }
}

pub fn default_withdraw(token0: Address, token1: Address, to: Address) -> WithdrawRequest {
    WithdrawRequest {
        token0,
        token1,
        liquidity: 500_000,
        amount0_min: 0,
        amount1_min: 0,
        wrap_unwrap: false,
        to,
        gas_limit: GAS_LIMIT,
        submit_deadline: u64::MAX,
    }
}
