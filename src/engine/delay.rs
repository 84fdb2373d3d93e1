//! The delay engine: enqueue, settle and cancel over the core components.
//!
//! ## Enqueue
//!
//! 1. Validate the request shape, gas limit bounds and submit deadline
//! 2. Resolve the pair and the caller's `inverted` flag
//! 3. Read the current gas price
//! 4. Size escrow and check payment; read the oracle accumulator
//! 5. Pull input tokens / wrap native principal (token collaborator)
//! 6. Take escrow, refunding excess inline
//! 7. Append the order with `valid_after = now + delay`
//!
//! Every fallible check runs before step 5, and steps 6-7 cannot fail once
//! those checks passed. Token movements in step 5 run as one batch: when one
//! fails, the ones already done are reversed in reverse order, so a failed
//! call leaves the engine and the payer's tokens untouched.
//!
//! ## Settlement
//!
//! Executors settle matured orders and receive the escrow. Executors or the
//! order's payer may cancel a matured order, which returns pulled tokens and
//! refunds the full escrow. Cancel moves tokens through the same reversible
//! batch before it touches the queue or the ledger.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::admin::{GasPriceOracle, OracleAdmin};
use crate::config::DelayConfig;
use crate::engine::{
    CallContext, EnqueueReceipt, PriceAccumulatorSource, Settlement, TokenTransfer,
};
use crate::error::{DelayError, Result, TransferError};
use crate::escrow::{EscrowLedger, EscrowRecord};
use crate::pair::{PairInfo, PairRegistry};
use crate::queue::{OrderEntry, OrderQueue};
use crate::types::{
    Address, BuyOrder, BuyRequest, DepositOrder, DepositRequest, Event, OrderDetails,
    OrderHeader, OrderId, OrderKind, OrderState, OrderSummary, PairId, SellOrder, SellRequest,
    WithdrawOrder, WithdrawRequest,
};

/// Tokens an order brought in, split by how they were funded.
#[derive(Debug, Default)]
struct Inputs {
    /// Native value attached and wrapped
    native_principal: u128,
    /// Tokens pulled from the payer with `transfer_from`
    pulled: Vec<(Address, u128)>,
}

/// One token-collaborator call made on behalf of a payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    /// `transfer_from(token, payer, account, amount)`
    Pull(Address, u128),
    /// `transfer(token, payer, amount)` out of the holding account
    Return(Address, u128),
    Wrap(u128),
    Unwrap(u128),
}

impl Movement {
    fn inverse(self) -> Self {
        match self {
            Movement::Pull(token, amount) => Movement::Return(token, amount),
            Movement::Return(token, amount) => Movement::Pull(token, amount),
            Movement::Wrap(amount) => Movement::Unwrap(amount),
            Movement::Unwrap(amount) => Movement::Wrap(amount),
        }
    }
}

pub struct DelayEngine<T, O> {
    account: Address,
    wrapped_native: Address,
    delay: u64,
    min_gas_limit: u64,
    max_gas_limit: u64,

    admin: OracleAdmin,
    gas: GasPriceOracle,
    pairs: PairRegistry,
    ledger: EscrowLedger,
    queue: OrderQueue,

    executors: HashSet<Address>,
    disabled: HashSet<(PairId, OrderKind)>,

    tokens: T,
    oracle: O,
    events: Vec<Event>,
}

impl<T, O> DelayEngine<T, O>
where
    T: TokenTransfer,
    O: PriceAccumulatorSource,
{
    pub fn new(config: DelayConfig, tokens: T, oracle: O) -> Result<Self> {
        config.validate()?;
        info!(
            owner = %config.owner,
            delay = config.delay,
            gas_price = config.gas_price,
            "delay engine initialized"
        );

        Ok(Self {
            account: config.account,
            wrapped_native: config.wrapped_native,
            delay: config.delay,
            min_gas_limit: config.min_gas_limit,
            max_gas_limit: config.max_gas_limit,
            admin: OracleAdmin::new(config.owner),
            gas: GasPriceOracle::new(config.gas_price),
            pairs: PairRegistry::new(),
            ledger: EscrowLedger::new(),
            queue: OrderQueue::new(),
            executors: HashSet::new(),
            disabled: HashSet::new(),
            tokens,
            oracle,
            events: Vec::new(),
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[inline]
    pub fn owner(&self) -> Address {
        self.admin.owner()
    }

    #[inline]
    pub fn account(&self) -> Address {
        self.account
    }

    #[inline]
    pub fn gas_price(&self) -> u128 {
        self.gas.current_gas_price()
    }

    #[inline]
    pub fn delay(&self) -> u64 {
        self.delay
    }

    #[inline]
    pub fn min_gas_limit(&self) -> u64 {
        self.min_gas_limit
    }

    #[inline]
    pub fn max_gas_limit(&self) -> u64 {
        self.max_gas_limit
    }

    #[inline]
    pub fn newest_order_id(&self) -> OrderId {
        self.queue.newest_order_id()
    }

    #[inline]
    pub fn last_processed_order_id(&self) -> OrderId {
        self.queue.last_processed_order_id()
    }

    pub fn get_order(&self, order_id: OrderId) -> Result<OrderSummary> {
        self.queue.get_order(order_id)
    }

    pub fn get_buy_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &BuyOrder)> {
        self.queue.get_buy_order(order_id)
    }

    pub fn get_sell_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &SellOrder)> {
        self.queue.get_sell_order(order_id)
    }

    pub fn get_deposit_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &DepositOrder)> {
        self.queue.get_deposit_order(order_id)
    }

    pub fn get_withdraw_order(&self, order_id: OrderId) -> Result<(&OrderHeader, &WithdrawOrder)> {
        self.queue.get_withdraw_order(order_id)
    }

    pub fn order_state(&self, order_id: OrderId, now: u64) -> Result<OrderState> {
        self.queue.state(order_id, now)
    }

    /// Executor polling helper: matured pending orders, oldest first.
    pub fn mature_orders(&self, now: u64, limit: usize) -> Vec<OrderId> {
        self.queue.mature_orders(now, limit)
    }

    pub fn escrow_of(&self, order_id: OrderId) -> Option<&EscrowRecord> {
        self.ledger.escrow(order_id)
    }

    #[inline]
    pub fn held_balance(&self) -> u128 {
        self.ledger.held_balance()
    }

    #[inline]
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    pub fn pair(&self, pair_id: &PairId) -> Option<&PairInfo> {
        self.pairs.get(pair_id)
    }

    #[inline]
    pub fn is_executor(&self, account: &Address) -> bool {
        self.executors.contains(account)
    }

    #[inline]
    pub fn is_order_disabled(&self, pair_id: PairId, kind: OrderKind) -> bool {
        self.disabled.contains(&(pair_id, kind))
    }

    pub fn state_root(&self) -> Result<[u8; 32]> {
        self.queue.state_root()
    }

    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Mirror native value entering the system for `account`.
    pub fn fund(&mut self, account: Address, amount: u128) -> Result<()> {
        self.ledger.credit(account, amount)
    }

    // ========================================================================
    // Admin
    // ========================================================================

    pub fn set_owner(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        let event = self.admin.set_owner(ctx.sender, new_owner)?;
        self.events.push(event);
        Ok(())
    }

    pub fn set_gas_price(&mut self, ctx: &CallContext, gas_price: u128) -> Result<()> {
        let event = self.gas.set_gas_price(&self.admin, ctx.sender, gas_price)?;
        self.events.push(event);
        Ok(())
    }

    pub fn set_delay(&mut self, ctx: &CallContext, delay: u64) -> Result<()> {
        self.admin.ensure_owner(ctx.sender)?;
        self.delay = delay;
        info!(delay, "delay set");
        self.events.push(Event::DelayChanged(delay));
        Ok(())
    }

    pub fn set_max_gas_limit(&mut self, ctx: &CallContext, max_gas_limit: u64) -> Result<()> {
        self.admin.ensure_owner(ctx.sender)?;
        if max_gas_limit < self.min_gas_limit {
            return Err(DelayError::InvalidRequest(format!(
                "max gas limit {max_gas_limit} below minimum {}",
                self.min_gas_limit
            )));
        }
        self.max_gas_limit = max_gas_limit;
        info!(max_gas_limit, "max gas limit set");
        self.events.push(Event::MaxGasLimitChanged(max_gas_limit));
        Ok(())
    }

    pub fn set_executor(&mut self, ctx: &CallContext, executor: Address, enabled: bool) -> Result<()> {
        self.admin.ensure_owner(ctx.sender)?;
        if executor.is_zero() {
            return Err(DelayError::ZeroAddress);
        }
        if enabled {
            self.executors.insert(executor);
        } else {
            self.executors.remove(&executor);
        }
        info!(%executor, enabled, "executor set");
        self.events.push(Event::ExecutorChanged { executor, enabled });
        Ok(())
    }

    pub fn set_order_disabled(
        &mut self,
        ctx: &CallContext,
        pair_id: PairId,
        kind: OrderKind,
        disabled: bool,
    ) -> Result<()> {
        self.admin.ensure_owner(ctx.sender)?;
        if self.pairs.get(&pair_id).is_none() {
            return Err(DelayError::UnknownPair(pair_id));
        }
        if disabled {
            self.disabled.insert((pair_id, kind));
        } else {
            self.disabled.remove(&(pair_id, kind));
        }
        info!(%pair_id, ?kind, disabled, "order kind toggled");
        self.events.push(Event::OrderDisabledChanged {
            pair_id,
            kind,
            disabled,
        });
        Ok(())
    }

    pub fn register_pair(
        &mut self,
        ctx: &CallContext,
        token_a: Address,
        token_b: Address,
        liquidity_token: Address,
    ) -> Result<PairId> {
        self.admin.ensure_owner(ctx.sender)?;
        let info = self.pairs.register(token_a, token_b, liquidity_token)?;
        self.events.push(Event::PairRegistered {
            pair_id: info.pair_id,
            token0: info.token0,
            token1: info.token1,
        });
        Ok(info.pair_id)
    }

    // ========================================================================
    // Enqueue
    // ========================================================================

    pub fn buy(&mut self, ctx: &CallContext, request: &BuyRequest) -> Result<EnqueueReceipt> {
        request.validate_shape()?;
        self.enqueue(
            ctx,
            (request.token_in, request.token_out),
            request.gas_limit,
            request.submit_deadline,
            OrderDetails::Buy(request.into()),
        )
    }

    pub fn sell(&mut self, ctx: &CallContext, request: &SellRequest) -> Result<EnqueueReceipt> {
        request.validate_shape()?;
        self.enqueue(
            ctx,
            (request.token_in, request.token_out),
            request.gas_limit,
            request.submit_deadline,
            OrderDetails::Sell(request.into()),
        )
    }

    pub fn deposit(&mut self, ctx: &CallContext, request: &DepositRequest) -> Result<EnqueueReceipt> {
        request.validate_shape()?;
        self.enqueue(
            ctx,
            (request.token0, request.token1),
            request.gas_limit,
            request.submit_deadline,
            OrderDetails::Deposit(request.into()),
        )
    }

    pub fn withdraw(&mut self, ctx: &CallContext, request: &WithdrawRequest) -> Result<EnqueueReceipt> {
        request.validate_shape()?;
        self.enqueue(
            ctx,
            (request.token0, request.token1),
            request.gas_limit,
            request.submit_deadline,
            OrderDetails::Withdraw(request.into()),
        )
    }

    fn enqueue(
        &mut self,
        ctx: &CallContext,
        (token_a, token_b): (Address, Address),
        gas_limit: u64,
        submit_deadline: u64,
        details: OrderDetails,
    ) -> Result<EnqueueReceipt> {
        let kind = details.kind();
        let now = ctx.timestamp;

        if gas_limit < self.min_gas_limit || gas_limit > self.max_gas_limit {
            return Err(DelayError::InvalidRequest(format!(
                "gas limit {gas_limit} outside [{}, {}]",
                self.min_gas_limit, self.max_gas_limit
            )));
        }
        if now > submit_deadline {
            return Err(DelayError::InvalidRequest("request expired".into()));
        }

        let (pair, inverted) = self.pairs.lookup(token_a, token_b)?;
        let pair = *pair;
        if self.is_order_disabled(pair.pair_id, kind) {
            return Err(DelayError::OrderDisabled {
                pair_id: pair.pair_id,
                kind,
            });
        }

        let gas_price = self.gas.current_gas_price();
        let inputs = self.split_inputs(&details, &pair)?;
        let required =
            EscrowLedger::compute_required_escrow(gas_price, gas_limit, inputs.native_principal)?;
        let gas_cost = required - inputs.native_principal;
        self.ledger.check_payment(&ctx.sender, ctx.value, required)?;

        let valid_after_timestamp = now
            .checked_add(self.delay)
            .ok_or(DelayError::ArithmeticOverflow)?;
        let order_id = self.queue.next_order_id()?;
        let price_accumulator = self.oracle.current_price_accumulator(&pair, now)?;

        let mut plan: Vec<Movement> = inputs
            .pulled
            .iter()
            .map(|(token, amount)| Movement::Pull(*token, *amount))
            .collect();
        if inputs.native_principal > 0 {
            plan.push(Movement::Wrap(inputs.native_principal));
        }
        self.move_tokens(ctx.sender, &plan)?;

        let refund = self.ledger.accept_payment(
            order_id,
            ctx.sender,
            ctx.value,
            gas_cost,
            inputs.native_principal,
        )?;

        let header = OrderHeader {
            order_id,
            pair_id: pair.pair_id,
            inverted,
            valid_after_timestamp,
            gas_price,
            gas_limit,
            price_accumulator,
            timestamp: now,
            payer: ctx.sender,
        };
        let pushed = self.queue.push(header, details)?;
        debug_assert_eq!(pushed, order_id);

        info!(
            order_id,
            pair_id = %pair.pair_id,
            ?kind,
            inverted,
            gas_price,
            required,
            refund,
            valid_after_timestamp,
            "order enqueued"
        );
        self.events.push(Event::OrderCreated {
            order_id,
            pair_id: pair.pair_id,
            kind,
        });

        Ok(EnqueueReceipt { order_id, refund })
    }

    /// Split an order's input amounts into wrapped native principal and
    /// tokens pulled from the payer.
    fn split_inputs(&self, details: &OrderDetails, pair: &PairInfo) -> Result<Inputs> {
        let amounts: Vec<(Address, u128)> = match details {
            OrderDetails::Buy(buy) => vec![(buy.token_in, buy.amount_in_max)],
            OrderDetails::Sell(sell) => vec![(sell.token_in, sell.amount_in)],
            OrderDetails::Deposit(deposit) => vec![
                (deposit.token0, deposit.amount0),
                (deposit.token1, deposit.amount1),
            ],
            // liquidity is never native, unwrapping happens on payout
            OrderDetails::Withdraw(withdraw) => {
                return Ok(Inputs {
                    native_principal: 0,
                    pulled: vec![(pair.liquidity_token, withdraw.liquidity)],
                });
            }
        };

        let mut inputs = Inputs::default();
        for (token, amount) in amounts.into_iter().filter(|(_, amount)| *amount > 0) {
            if details.wrap_unwrap() && token == self.wrapped_native {
                inputs.native_principal = inputs
                    .native_principal
                    .checked_add(amount)
                    .ok_or(DelayError::ArithmeticOverflow)?;
            } else {
                inputs.pulled.push((token, amount));
            }
        }
        Ok(inputs)
    }

    /// Run `plan` in order. On the first failure, reverse every completed
    /// movement newest first and return the failure.
    fn move_tokens(&mut self, payer: Address, plan: &[Movement]) -> Result<()> {
        for (done, movement) in plan.iter().enumerate() {
            if let Err(err) = self.apply_movement(payer, *movement) {
                warn!(%payer, ?movement, %err, "token movement failed, rolling back");
                for completed in plan[..done].iter().rev() {
                    let undo = completed.inverse();
                    if let Err(undo_err) = self.apply_movement(payer, undo) {
                        error!(%payer, ?undo, %undo_err, "rollback movement failed");
                    }
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn apply_movement(
        &mut self,
        payer: Address,
        movement: Movement,
    ) -> std::result::Result<(), TransferError> {
        match movement {
            Movement::Pull(token, amount) => {
                self.tokens.transfer_from(token, payer, self.account, amount)
            }
            Movement::Return(token, amount) => self.tokens.transfer(token, payer, amount),
            Movement::Wrap(amount) => self.tokens.wrap(amount).map(drop),
            Movement::Unwrap(amount) => self.tokens.unwrap(amount).map(drop),
        }
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Mark a matured order executed and release its escrow to the executor.
    pub fn settle(&mut self, ctx: &CallContext, order_id: OrderId) -> Result<Settlement> {
        if !self.is_executor(&ctx.sender) {
            warn!(sender = %ctx.sender, order_id, "settle from non-executor");
            return Err(DelayError::Unauthorized);
        }
        let order = self
            .queue
            .ensure_settleable(order_id, ctx.timestamp)?
            .order
            .clone();
        self.ledger.check_settleable(order_id)?;

        self.queue.mark_settled(order_id)?;
        let released = self.ledger.release_to_recipient(order_id, ctx.sender)?;

        info!(order_id, executor = %ctx.sender, released, "order settled");
        self.events.push(Event::OrderSettled {
            order_id,
            executor: ctx.sender,
            released,
        });
        Ok(Settlement { order, released })
    }

    /// Cancel a matured order: return pulled tokens, unwrap native principal
    /// and refund the whole escrow to the payer. Returns the native refund.
    pub fn cancel(&mut self, ctx: &CallContext, order_id: OrderId) -> Result<u128> {
        let entry = self.queue.get(order_id)?;
        let payer = entry.order.header.payer;
        if ctx.sender != payer && !self.is_executor(&ctx.sender) {
            warn!(sender = %ctx.sender, order_id, "cancel from stranger");
            return Err(DelayError::Unauthorized);
        }

        let entry: OrderEntry = self.queue.ensure_settleable(order_id, ctx.timestamp)?.clone();
        let principal = self.ledger.check_settleable(order_id)?.principal;
        let pair = *self
            .pairs
            .get(&entry.order.header.pair_id)
            .ok_or(DelayError::UnknownPair(entry.order.header.pair_id))?;
        let inputs = self.split_inputs(&entry.order.details, &pair)?;
        debug_assert_eq!(inputs.native_principal, principal);

        let mut plan: Vec<Movement> = inputs
            .pulled
            .iter()
            .map(|(token, amount)| Movement::Return(*token, *amount))
            .collect();
        if principal > 0 {
            plan.push(Movement::Unwrap(principal));
        }
        self.move_tokens(payer, &plan)?;

        self.queue.mark_canceled(order_id)?;
        let refunded = self.ledger.refund_to_payer(order_id)?;

        info!(order_id, %payer, refunded, "order canceled");
        self.events.push(Event::OrderCanceled { order_id, refunded });
        Ok(refunded)
    }
}

impl<T, O> std::fmt::Debug for DelayEngine<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelayEngine")
            .field("owner", &self.admin.owner())
            .field("delay", &self.delay)
            .field("gas_price", &self.gas.current_gas_price())
            .field("newest_order_id", &self.queue.newest_order_id())
            .field("held_balance", &self.ledger.held_balance())
            .finish()
    }
}
