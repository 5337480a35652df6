use crate::events::log_tip_sent_event;
use crate::*;

/// `msg` payload of `ft_transfer_call` that tips the transferred tokens
#[near(serializers=[json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipInstruction {
    pub recipient: AccountId,
    pub memo: Option<String>,
}

#[near_bindgen]
impl Contract {
    /// Tip `amount` yoctoNEAR to `recipient` and charge [`TIP_FEE`].
    ///
    /// Both come out of the caller's internal balance. The attached deposit
    /// only pays for ledger entries this tip creates; the rest is sent back.
    /// On `Err` nothing is written and the runtime refunds the deposit.
    #[payable]
    #[handle_result]
    pub fn tip_near(
        &mut self,
        recipient: AccountId,
        amount: U128,
        memo: Option<String>,
    ) -> Result<TipReceipt, TipError> {
        self.assert_not_paused();
        assert_memo_len(memo.as_deref());
        let sender = env::predecessor_account_id();

        self.check_tip_near(&sender, &recipient, amount.0)?;

        let initial_storage = env::storage_usage();
        let receipt = self.apply_tip_near(sender.clone(), recipient, amount.0, memo);
        self.settle_storage_deposit(&sender, initial_storage, env::attached_deposit());
        Ok(receipt)
    }

    /// Tip `amount` of `token_id` held in the caller's internal token balance.
    /// The fee is still charged in NEAR from the internal balance, and the
    /// attached deposit covers storage as in [`Self::tip_near`].
    #[payable]
    #[handle_result]
    pub fn tip_ft(
        &mut self,
        token_id: AccountId,
        recipient: AccountId,
        amount: U128,
        memo: Option<String>,
    ) -> Result<TipReceipt, TipError> {
        self.assert_not_paused();
        assert_memo_len(memo.as_deref());
        let sender = env::predecessor_account_id();

        self.check_tip_ft(&sender, &token_id, &recipient, amount.0)?;

        let initial_storage = env::storage_usage();
        let receipt = self.apply_tip_ft(sender.clone(), token_id, recipient, amount.0, memo);
        self.settle_storage_deposit(&sender, initial_storage, env::attached_deposit());
        Ok(receipt)
    }
}

pub(crate) fn assert_memo_len(memo: Option<&str>) {
    require!(
        memo.map_or(true, |memo| memo.len() <= MAX_MEMO_LEN),
        "Memo is too long"
    );
}

impl Contract {
    pub(crate) fn check_tip_near(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), TipError> {
        if *recipient == env::current_account_id() {
            return Err(TipError::InvalidRecipient);
        }
        if recipient == sender {
            return Err(TipError::SameSenderRecipient);
        }
        if amount == 0 {
            return Err(TipError::InvalidAmount);
        }
        let required = amount
            .checked_add(TIP_FEE.as_yoctonear())
            .ok_or(TipError::InsufficientNative)?;
        if self.internal_native_balance(sender).as_yoctonear() < required {
            return Err(TipError::InsufficientNative);
        }
        Ok(())
    }

    pub(crate) fn check_tip_ft(
        &self,
        sender: &AccountId,
        token_id: &AccountId,
        recipient: &AccountId,
        amount: u128,
    ) -> Result<(), TipError> {
        if amount == 0 {
            return Err(TipError::InvalidAmount);
        }
        if *recipient == env::current_account_id() {
            return Err(TipError::InvalidRecipient);
        }
        if recipient == sender {
            return Err(TipError::SameSenderRecipient);
        }
        if self.internal_token_balance(token_id, sender) < amount {
            return Err(TipError::InsufficientToken);
        }
        if self.internal_native_balance(sender) < TIP_FEE {
            return Err(TipError::InsufficientNative);
        }
        Ok(())
    }

    /// Moves the tip and the fee. Only call after `check_tip_near` passed.
    pub(crate) fn apply_tip_near(
        &mut self,
        sender: AccountId,
        recipient: AccountId,
        amount: u128,
        memo: Option<String>,
    ) -> TipReceipt {
        let amount_near = NearToken::from_yoctonear(amount);
        self.internal_debit_native(&sender, amount_near.saturating_add(TIP_FEE));
        self.internal_credit_native(&recipient, amount_near);
        self.collect_fee();

        let receipt = TipReceipt::near(recipient, amount);
        self.stats.record(&receipt);
        log_tip_sent_event(&sender, &receipt, memo.as_deref());
        receipt
    }

    /// Moves the tokens and the NEAR fee. Only call after `check_tip_ft` passed.
    pub(crate) fn apply_tip_ft(
        &mut self,
        sender: AccountId,
        token_id: AccountId,
        recipient: AccountId,
        amount: u128,
        memo: Option<String>,
    ) -> TipReceipt {
        self.internal_debit_token(&token_id, &sender, amount);
        self.internal_credit_token(&token_id, &recipient, amount);
        self.internal_debit_native(&sender, TIP_FEE);
        self.collect_fee();

        let receipt = TipReceipt::ft(recipient, token_id, amount);
        self.stats.record(&receipt);
        log_tip_sent_event(&sender, &receipt, memo.as_deref());
        receipt
    }

    fn collect_fee(&mut self) {
        let fee_collector = self.fee_collector.clone();
        self.internal_credit_native(&fee_collector, TIP_FEE);
    }
}
