use crate::*;
use near_sdk::env;
use near_sdk::serde_json::{json, Value};

pub const EVENT_JSON_PREFIX: &str = "EVENT_JSON:";

fn log_event(event: &str, data: Value) {
    env::log_str(
        format!(
            "{}{}",
            EVENT_JSON_PREFIX,
            json!({
                "standard": "tip_protocol",
                "version": "1.0.0",
                "event": event,
                "data": [data]
            })
        )
        .as_ref(),
    );
}

fn token_label(token_id: Option<&AccountId>) -> String {
    token_id.map_or_else(|| "NEAR".to_string(), |id| id.to_string())
}

pub fn log_tip_sent_event(sender: &AccountId, receipt: &TipReceipt, memo: Option<&str>) {
    log_event(
        "tip_sent",
        json!({
            "sender": sender,
            "recipient": receipt.recipient,
            "amount": receipt.amount,
            "fee": receipt.fee,
            "token": token_label(receipt.token.as_ref()),
            "memo": memo,
        }),
    );
}

pub fn log_deposit_event(account_id: &AccountId, amount: u128, token_id: Option<&AccountId>) {
    log_event(
        "deposit",
        json!({
            "account_id": account_id,
            "amount": amount.to_string(),
            "token": token_label(token_id),
        }),
    );
}

pub fn log_withdraw_event(account_id: &AccountId, amount: u128, token_id: Option<&AccountId>) {
    log_event(
        "withdraw",
        json!({
            "account_id": account_id,
            "amount": amount.to_string(),
            "token": token_label(token_id),
        }),
    );
}
