use crate::*;

/// Returned by a successful tip. `token` is `None` for NEAR tips.
#[near(serializers=[json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipReceipt {
    pub recipient: AccountId,
    pub amount: U128,
    pub fee: U128,
    pub token: Option<AccountId>,
}

impl TipReceipt {
    pub fn near(recipient: AccountId, amount: u128) -> Self {
        Self {
            recipient,
            amount: amount.into(),
            fee: TIP_FEE.as_yoctonear().into(),
            token: None,
        }
    }

    pub fn ft(recipient: AccountId, token_id: AccountId, amount: u128) -> Self {
        Self {
            recipient,
            amount: amount.into(),
            fee: TIP_FEE.as_yoctonear().into(),
            token: Some(token_id),
        }
    }
}

/// Running totals over every successful tip.
#[near(serializers=[borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipStats {
    pub native_tips: u64,
    pub token_tips: u64,
    pub fees_collected: NearToken,
}

impl Default for TipStats {
    fn default() -> Self {
        Self {
            native_tips: 0,
            token_tips: 0,
            fees_collected: NearToken::from_yoctonear(0),
        }
    }
}

impl TipStats {
    pub(crate) fn record(&mut self, receipt: &TipReceipt) {
        if receipt.token.is_some() {
            self.token_tips += 1;
        } else {
            self.native_tips += 1;
        }
        self.fees_collected = self
            .fees_collected
            .saturating_add(NearToken::from_yoctonear(receipt.fee.0));
    }
}
