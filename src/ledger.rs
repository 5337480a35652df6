use near_sdk::{assert_one_yocto, serde_json, Promise, PromiseError, PromiseOrValue};

use crate::events::*;
use crate::tip::assert_memo_len;
use crate::*;

const ZERO_NEAR: NearToken = NearToken::from_yoctonear(0);

#[near_bindgen]
impl Contract {
    /// Credit the attached deposit to the caller's NEAR balance, less the
    /// storage cost of a new balance entry
    #[payable]
    pub fn deposit_near(&mut self) -> U128 {
        self.assert_not_paused();
        let attached = env::attached_deposit();
        require!(attached > ZERO_NEAR, "Requires attached deposit");

        let account_id = env::predecessor_account_id();
        let initial_storage = env::storage_usage();
        self.internal_credit_native(&account_id, attached);
        let storage_cost = self.ledger_storage_cost(initial_storage);
        require!(
            storage_cost < attached,
            format!(
                "Deposit must exceed the {} yoctoNEAR storage cost",
                storage_cost.as_yoctonear()
            )
        );
        self.internal_debit_native(&account_id, storage_cost);

        let amount = attached.saturating_sub(storage_cost);
        log_deposit_event(&account_id, amount.as_yoctonear(), None);

        self.internal_native_balance(&account_id).as_yoctonear().into()
    }

    /// Withdraw `amount` NEAR (everything when omitted) to the caller
    #[payable]
    pub fn withdraw_near(&mut self, amount: Option<U128>) -> Promise {
        assert_one_yocto();
        let account_id = env::predecessor_account_id();
        let balance = self.internal_native_balance(&account_id);
        let amount = amount.map_or(balance, |amount| NearToken::from_yoctonear(amount.0));
        require!(amount > ZERO_NEAR, "Nothing to withdraw");
        require!(amount <= balance, "Not enough NEAR balance");

        self.internal_debit_native(&account_id, amount);
        log_withdraw_event(&account_id, amount.as_yoctonear(), None);

        Promise::new(account_id.clone()).transfer(amount).then(
            Self::ext(env::current_account_id())
                .with_static_gas(GAS_FOR_RESOLVE_WITHDRAW)
                .on_withdraw_complete(account_id, None, amount.as_yoctonear().into()),
        )
    }

    /// Withdraw `amount` of `token_id` (everything when omitted) to the caller
    #[payable]
    pub fn withdraw_ft(&mut self, token_id: AccountId, amount: Option<U128>) -> Promise {
        assert_one_yocto();
        let account_id = env::predecessor_account_id();
        let balance = self.internal_token_balance(&token_id, &account_id);
        let amount = amount.map_or(balance, |amount| amount.0);
        require!(amount > 0, "Nothing to withdraw");
        require!(amount <= balance, "Not enough token balance");

        self.internal_debit_token(&token_id, &account_id, amount);
        log_withdraw_event(&account_id, amount, Some(&token_id));

        external::ext_ft::ext(token_id.clone())
            .with_attached_deposit(NearToken::from_yoctonear(1))
            .with_static_gas(GAS_FOR_FT_TRANSFER)
            .ft_transfer(
                account_id.clone(),
                amount.into(),
                Some("Tip protocol withdrawal".to_string()),
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE_WITHDRAW)
                    .on_withdraw_complete(account_id, Some(token_id), amount.into()),
            )
    }

    #[private]
    pub fn on_withdraw_complete(
        &mut self,
        account_id: AccountId,
        token_id: Option<AccountId>,
        amount: U128,
        #[callback_result] transfer_result: Result<(), PromiseError>,
    ) -> bool {
        let succeeded = transfer_result.is_ok();
        self.internal_resolve_withdraw(&account_id, token_id.as_ref(), amount.0, succeeded);
        succeeded
    }

    /// NEP-141 receiver. An empty `msg` deposits the tokens; a JSON
    /// [`TipInstruction`] deposits and tips them in one step. New ledger
    /// entries are paid from the sender's NEAR balance.
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> PromiseOrValue<U128> {
        self.assert_not_paused();

        let token_id = env::predecessor_account_id();
        require!(
            self.supported_tokens.contains_key(&token_id),
            "Unsupported token"
        );

        let instruction = if msg.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<TipInstruction>(&msg)
                    .unwrap_or_else(|_| env::panic_str("Invalid message format")),
            )
        };

        if let Some(instruction) = &instruction {
            assert_memo_len(instruction.memo.as_deref());
        }

        let initial_storage = env::storage_usage();
        self.internal_credit_token(&token_id, &sender_id, amount.0);

        let Some(instruction) = instruction else {
            self.charge_storage_to_balance(&sender_id, initial_storage);
            log_deposit_event(&sender_id, amount.0, Some(&token_id));
            return PromiseOrValue::Value(U128(0));
        };

        if let Err(err) =
            self.check_tip_ft(&sender_id, &token_id, &instruction.recipient, amount.0)
        {
            // hand the tokens back through ft_resolve_transfer
            self.internal_debit_token(&token_id, &sender_id, amount.0);
            env::log_str(&format!("Tip from {} refunded: {}", sender_id, err));
            return PromiseOrValue::Value(amount);
        }

        log_deposit_event(&sender_id, amount.0, Some(&token_id));
        self.apply_tip_ft(
            sender_id.clone(),
            token_id,
            instruction.recipient,
            amount.0,
            instruction.memo,
        );
        self.charge_storage_to_balance(&sender_id, initial_storage);
        PromiseOrValue::Value(U128(0))
    }

    pub fn get_native_balance(&self, account_id: AccountId) -> U128 {
        self.internal_native_balance(&account_id).as_yoctonear().into()
    }

    pub fn get_token_balance(&self, token_id: AccountId, account_id: AccountId) -> U128 {
        self.internal_token_balance(&token_id, &account_id).into()
    }
}

impl Contract {
    pub(crate) fn internal_native_balance(&self, account_id: &AccountId) -> NearToken {
        self.native_balances
            .get(account_id)
            .copied()
            .unwrap_or(ZERO_NEAR)
    }

    pub(crate) fn internal_credit_native(&mut self, account_id: &AccountId, amount: NearToken) {
        let balance = self
            .internal_native_balance(account_id)
            .checked_add(amount)
            .unwrap_or_else(|| env::panic_str("NEAR balance overflow"));
        self.native_balances.insert(account_id.clone(), balance);
    }

    pub(crate) fn internal_debit_native(&mut self, account_id: &AccountId, amount: NearToken) {
        let balance = self
            .internal_native_balance(account_id)
            .checked_sub(amount)
            .unwrap_or_else(|| env::panic_str("Not enough NEAR balance"));
        if balance == ZERO_NEAR {
            self.native_balances.remove(account_id);
        } else {
            self.native_balances.insert(account_id.clone(), balance);
        }
    }

    pub(crate) fn internal_token_balance(&self, token_id: &AccountId, account_id: &AccountId) -> u128 {
        self.token_balances
            .get(&TokenAccount::new(token_id, account_id))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn internal_credit_token(
        &mut self,
        token_id: &AccountId,
        account_id: &AccountId,
        amount: u128,
    ) {
        let balance = self
            .internal_token_balance(token_id, account_id)
            .checked_add(amount)
            .unwrap_or_else(|| env::panic_str("Token balance overflow"));
        self.token_balances
            .insert(TokenAccount::new(token_id, account_id), balance);
    }

    pub(crate) fn internal_debit_token(
        &mut self,
        token_id: &AccountId,
        account_id: &AccountId,
        amount: u128,
    ) {
        let balance = self
            .internal_token_balance(token_id, account_id)
            .checked_sub(amount)
            .unwrap_or_else(|| env::panic_str("Not enough token balance"));
        let key = TokenAccount::new(token_id, account_id);
        if balance == 0 {
            self.token_balances.remove(&key);
        } else {
            self.token_balances.insert(key, balance);
        }
    }

    /// Puts a withdrawn amount back when the outgoing transfer failed
    pub(crate) fn internal_resolve_withdraw(
        &mut self,
        account_id: &AccountId,
        token_id: Option<&AccountId>,
        amount: u128,
        succeeded: bool,
    ) {
        if succeeded {
            return;
        }
        match token_id {
            Some(token_id) => self.internal_credit_token(token_id, account_id, amount),
            None => self.internal_credit_native(account_id, NearToken::from_yoctonear(amount)),
        }
        env::log_str(&format!(
            "Withdrawal of {} {} for {} failed, balance restored",
            amount,
            token_id.map_or("NEAR", |id| id.as_str()),
            account_id
        ));
    }
}
