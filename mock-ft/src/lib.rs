//! Bare NEP-141 token: anyone can mint, no storage registration.

use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{
    assert_one_yocto, env, ext_contract, near, near_bindgen, require, AccountId,
    BorshStorageKey, Gas, PanicOnDefault, Promise, PromiseError, PromiseOrValue,
};

const GAS_FOR_FT_ON_TRANSFER: Gas = Gas::from_tgas(30);
const GAS_FOR_RESOLVE_TRANSFER: Gas = Gas::from_tgas(10);

#[near(serializers = [borsh])]
#[derive(BorshStorageKey)]
pub enum StorageKey {
    Balances,
}

#[ext_contract(ext_ft_receiver)]
pub trait FungibleTokenReceiver {
    fn ft_on_transfer(sender_id: AccountId, amount: U128, msg: String) -> PromiseOrValue<U128>;
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockFt {
    pub balances: LookupMap<AccountId, u128>,
    pub total_supply: u128,
}

#[near_bindgen]
impl MockFt {
    #[init]
    pub fn new() -> Self {
        assert!(!env::state_exists(), "Already initialized");

        Self {
            balances: LookupMap::new(StorageKey::Balances),
            total_supply: 0,
        }
    }

    pub fn mint(&mut self, amount: U128, account_id: AccountId) {
        self.credit(&account_id, amount.0);
        self.total_supply = self
            .total_supply
            .checked_add(amount.0)
            .unwrap_or_else(|| env::panic_str("Total supply overflow"));
    }

    #[payable]
    pub fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>) {
        assert_one_yocto();
        let sender_id = env::predecessor_account_id();
        self.transfer(&sender_id, &receiver_id, amount.0, memo);
    }

    #[payable]
    pub fn ft_transfer_call(
        &mut self,
        receiver_id: AccountId,
        amount: U128,
        memo: Option<String>,
        msg: String,
    ) -> Promise {
        assert_one_yocto();
        let sender_id = env::predecessor_account_id();
        self.transfer(&sender_id, &receiver_id, amount.0, memo);

        ext_ft_receiver::ext(receiver_id.clone())
            .with_static_gas(GAS_FOR_FT_ON_TRANSFER)
            .ft_on_transfer(sender_id.clone(), amount, msg)
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE_TRANSFER)
                    .ft_resolve_transfer(sender_id, receiver_id, amount),
            )
    }

    /// Returns the amount the receiver kept
    #[private]
    pub fn ft_resolve_transfer(
        &mut self,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: U128,
        #[callback_result] receiver_result: Result<U128, PromiseError>,
    ) -> U128 {
        let unused = receiver_result.map_or(amount.0, |unused| unused.0.min(amount.0));
        let refund = unused.min(self.balance(&receiver_id));
        if refund > 0 {
            self.transfer(&receiver_id, &sender_id, refund, None);
        }
        U128(amount.0 - refund)
    }

    pub fn ft_balance_of(&self, account_id: AccountId) -> U128 {
        self.balance(&account_id).into()
    }

    pub fn ft_total_supply(&self) -> U128 {
        self.total_supply.into()
    }
}

impl MockFt {
    fn balance(&self, account_id: &AccountId) -> u128 {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    fn credit(&mut self, account_id: &AccountId, amount: u128) {
        let balance = self
            .balance(account_id)
            .checked_add(amount)
            .unwrap_or_else(|| env::panic_str("Balance overflow"));
        self.balances.insert(account_id.clone(), balance);
    }

    fn transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        memo: Option<String>,
    ) {
        require!(sender_id != receiver_id, "Sender and receiver should be different");
        require!(amount > 0, "The amount should be a positive number");
        let balance = self.balance(sender_id);
        require!(balance >= amount, "The account doesn't have enough balance");

        self.balances.insert(sender_id.clone(), balance - amount);
        self.credit(receiver_id, amount);

        if let Some(memo) = memo {
            env::log_str(&format!("Memo: {}", memo));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use near_sdk::test_utils::{accounts, VMContextBuilder};
    use near_sdk::{testing_env, NearToken};

    fn set_context(predecessor: AccountId, deposit: u128) {
        let mut builder = VMContextBuilder::new();
        builder
            .current_account_id("mock-ft.near".parse().unwrap())
            .predecessor_account_id(predecessor)
            .attached_deposit(NearToken::from_yoctonear(deposit));
        testing_env!(builder.build());
    }

    #[test]
    fn mint_and_transfer() {
        set_context(accounts(0), 0);
        let mut token = MockFt::new();
        token.mint(U128(1_000), accounts(1));
        assert_eq!(token.ft_total_supply(), U128(1_000));

        set_context(accounts(1), 1);
        token.ft_transfer(accounts(2), U128(400), Some("hi".to_string()));

        assert_eq!(token.ft_balance_of(accounts(1)), U128(600));
        assert_eq!(token.ft_balance_of(accounts(2)), U128(400));
    }

    #[test]
    #[should_panic(expected = "The account doesn't have enough balance")]
    fn transfer_over_balance_panics() {
        set_context(accounts(0), 0);
        let mut token = MockFt::new();
        token.mint(U128(10), accounts(1));

        set_context(accounts(1), 1);
        token.ft_transfer(accounts(2), U128(11), None);
    }
}
