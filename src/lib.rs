use near_sdk::json_types::U128;
use near_sdk::store::{IterableMap, LookupMap};
use near_sdk::{
    env, near, near_bindgen, require, AccountId, BorshStorageKey, Gas, NearToken, PanicOnDefault,
};

mod error;
mod events;
mod external;
mod ledger;
mod receipt;
mod storage;
mod tip;
mod token;

pub use error::TipError;
pub use receipt::{TipReceipt, TipStats};
pub use tip::TipInstruction;
pub use token::{TokenInfo, TokenStandard};

/// Flat fee charged on every tip, always in NEAR
pub const TIP_FEE: NearToken = NearToken::from_yoctonear(4000);
/// Longest memo a tip accepts, in bytes
pub const MAX_MEMO_LEN: usize = 256;
/// Gas for FT transfers
const GAS_FOR_FT_TRANSFER: Gas = Gas::from_tgas(10);
/// Gas for the withdraw callback
const GAS_FOR_RESOLVE_WITHDRAW: Gas = Gas::from_tgas(5);

#[near(serializers = [borsh])]
#[derive(BorshStorageKey)]
pub enum StorageKey {
    NativeBalances,
    TokenBalances,
    SupportedTokens,
}

/// Key of the internal token ledger
#[near(serializers = [borsh])]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAccount {
    pub token_id: AccountId,
    pub account_id: AccountId,
}

impl TokenAccount {
    pub fn new(token_id: &AccountId, account_id: &AccountId) -> Self {
        Self {
            token_id: token_id.clone(),
            account_id: account_id.clone(),
        }
    }
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct Contract {
    /// Owner account ID
    pub owner_id: AccountId,

    /// Receives the flat fee of every tip
    pub fee_collector: AccountId,

    /// Internal NEAR balances
    pub native_balances: LookupMap<AccountId, NearToken>,

    /// Internal token balances, one entry per (token, holder)
    pub token_balances: LookupMap<TokenAccount, u128>,

    /// Tokens accepted through `ft_on_transfer`
    pub supported_tokens: IterableMap<AccountId, TokenInfo>,

    pub stats: TipStats,

    /// Contract paused state
    pub paused: bool,
}

#[near_bindgen]
impl Contract {
    #[init]
    pub fn new(owner_id: AccountId, fee_collector: AccountId) -> Self {
        assert!(!env::state_exists(), "Already initialized");

        Self {
            owner_id,
            fee_collector,
            native_balances: LookupMap::new(StorageKey::NativeBalances),
            token_balances: LookupMap::new(StorageKey::TokenBalances),
            supported_tokens: IterableMap::new(StorageKey::SupportedTokens),
            stats: TipStats::default(),
            paused: false,
        }
    }

    pub fn set_fee_collector(&mut self, account_id: AccountId) {
        self.assert_owner("Only owner can change the fee collector");

        self.fee_collector = account_id.clone();

        env::log_str(&format!("Fee collector changed to {}", account_id));
    }

    pub fn get_fee_collector(&self) -> AccountId {
        self.fee_collector.clone()
    }

    pub fn get_owner(&self) -> AccountId {
        self.owner_id.clone()
    }

    pub fn get_tip_fee(&self) -> U128 {
        TIP_FEE.as_yoctonear().into()
    }

    pub fn get_stats(&self) -> TipStats {
        self.stats.clone()
    }

    pub fn pause(&mut self) {
        self.assert_owner("Only owner can pause the contract");

        require!(!self.paused, "Contract is already paused");
        self.paused = true;

        env::log_str("Contract paused by owner");
    }

    /// Unpause the contract (owner only)
    pub fn unpause(&mut self) {
        self.assert_owner("Only owner can unpause the contract");

        require!(self.paused, "Contract is not paused");
        self.paused = false;

        env::log_str("Contract unpaused by owner");
    }

    /// Check if contract is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn register_token(&mut self, token_id: AccountId, token_info: TokenInfo) {
        self.assert_owner("Only owner can register tokens");

        self.supported_tokens.insert(token_id, token_info);
    }

    pub fn remove_token(&mut self, token_id: AccountId) {
        self.assert_owner("Only owner can remove tokens");

        // balances already held stay withdrawable
        self.supported_tokens.remove(&token_id);
    }

    pub fn get_token_info(&self, token_id: AccountId) -> Option<TokenInfo> {
        self.supported_tokens.get(&token_id).cloned()
    }

    pub fn get_supported_tokens(&self, from_index: u64, limit: u64) -> Vec<(AccountId, TokenInfo)> {
        self.supported_tokens
            .iter()
            .skip(from_index as usize)
            .take(limit as usize)
            .map(|(token_id, info)| (token_id.clone(), info.clone()))
            .collect()
    }
}

impl Contract {
    fn assert_owner(&self, message: &str) {
        require!(env::predecessor_account_id() == self.owner_id, message);
    }

    fn assert_not_paused(&self) {
        require!(!self.paused, "Contract is paused");
    }
}
