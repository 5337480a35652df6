use crate::*;

#[near(serializers=[borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenStandard {
    NEP141, // Fungible Token
}

/// Registry entry for a token the contract accepts through `ft_on_transfer`.
#[near(serializers=[borsh, json])]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenInfo {
    pub standard: TokenStandard,
    pub decimals: u8,
    pub symbol: String,
}
