use near_sdk::Promise;

use crate::*;

impl Contract {
    /// Cost of the ledger bytes added since `initial_usage`. Freed bytes are
    /// not paid back.
    pub(crate) fn ledger_storage_cost(&mut self, initial_usage: u64) -> NearToken {
        self.native_balances.flush();
        self.token_balances.flush();
        let added = env::storage_usage().saturating_sub(initial_usage);
        NearToken::from_yoctonear(
            env::storage_byte_cost()
                .as_yoctonear()
                .saturating_mul(added as u128),
        )
    }

    /// Keeps the storage cost out of `attached` and sends the rest back to `payer`
    pub(crate) fn settle_storage_deposit(
        &mut self,
        payer: &AccountId,
        initial_usage: u64,
        attached: NearToken,
    ) {
        let cost = self.ledger_storage_cost(initial_usage);
        require!(
            cost <= attached,
            format!(
                "Attach at least {} yoctoNEAR to cover storage",
                cost.as_yoctonear()
            )
        );

        let refund = attached.saturating_sub(cost);
        if refund > NearToken::from_yoctonear(0) {
            Promise::new(payer.clone()).transfer(refund);
        }
    }

    /// Takes the storage cost from the payer's internal NEAR balance
    pub(crate) fn charge_storage_to_balance(&mut self, payer: &AccountId, initial_usage: u64) {
        let cost = self.ledger_storage_cost(initial_usage);
        if cost == NearToken::from_yoctonear(0) {
            return;
        }
        require!(
            self.internal_native_balance(payer) >= cost,
            format!(
                "NEAR balance does not cover {} yoctoNEAR of storage",
                cost.as_yoctonear()
            )
        );
        self.internal_debit_native(payer, cost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use near_sdk::test_utils::{accounts, VMContextBuilder};
    use near_sdk::testing_env;

    fn setup() -> Contract {
        let mut builder = VMContextBuilder::new();
        builder
            .current_account_id("tips.near".parse().unwrap())
            .predecessor_account_id(accounts(0));
        testing_env!(builder.build());
        Contract::new(accounts(0), accounts(0))
    }

    #[test]
    fn new_entry_costs_its_bytes() {
        let mut contract = setup();

        let initial_usage = env::storage_usage();
        contract.internal_credit_native(&accounts(1), NearToken::from_yoctonear(10));
        let cost = contract.ledger_storage_cost(initial_usage);

        let added = env::storage_usage() - initial_usage;
        assert!(added > 0);
        assert_eq!(
            cost.as_yoctonear(),
            added as u128 * env::storage_byte_cost().as_yoctonear()
        );
    }

    #[test]
    fn updating_an_entry_is_free() {
        let mut contract = setup();
        contract.internal_credit_native(&accounts(1), NearToken::from_yoctonear(10));
        contract.ledger_storage_cost(env::storage_usage());

        let initial_usage = env::storage_usage();
        contract.internal_credit_native(&accounts(1), NearToken::from_yoctonear(10));

        assert_eq!(
            contract.ledger_storage_cost(initial_usage),
            NearToken::from_yoctonear(0)
        );
    }

    #[test]
    fn balance_pays_for_storage() {
        let mut contract = setup();
        let funds = NearToken::from_near(1);
        contract.internal_credit_native(&accounts(1), funds);
        contract.ledger_storage_cost(env::storage_usage());

        let initial_usage = env::storage_usage();
        contract.internal_credit_token(&"mock-ft.near".parse().unwrap(), &accounts(1), 5);
        contract.charge_storage_to_balance(&accounts(1), initial_usage);

        let added = env::storage_usage() - initial_usage;
        let paid = funds.as_yoctonear()
            - contract
                .internal_native_balance(&accounts(1))
                .as_yoctonear();
        assert_eq!(paid, added as u128 * env::storage_byte_cost().as_yoctonear());
    }

    #[test]
    #[should_panic(expected = "NEAR balance does not cover")]
    fn empty_balance_cannot_pay_for_storage() {
        let mut contract = setup();

        let initial_usage = env::storage_usage();
        contract.internal_credit_token(&"mock-ft.near".parse().unwrap(), &accounts(1), 5);
        contract.charge_storage_to_balance(&accounts(1), initial_usage);
    }

    #[test]
    #[should_panic(expected = "to cover storage")]
    fn missing_storage_deposit_panics() {
        let mut contract = setup();

        let initial_usage = env::storage_usage();
        contract.internal_credit_native(&accounts(2), NearToken::from_yoctonear(1));
        contract.settle_storage_deposit(&accounts(1), initial_usage, NearToken::from_yoctonear(0));
    }
}
