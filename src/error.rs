use std::fmt;

/// Failures returned by the tip entry points.
///
/// The numeric codes are part of the public interface: callers match on the
/// `E<code>` prefix of the panic message when the error crosses the wasm
/// boundary, and on [`TipError::code`] when calling the contract directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TipError {
    /// The payer tried to tip itself.
    SameSenderRecipient,
    /// Native balance (stored plus attached) cannot cover the tip and the fee.
    InsufficientNative,
    /// Token balance is below the requested amount.
    InsufficientToken,
    /// Amount is zero.
    InvalidAmount,
    /// The recipient is the tipping contract itself.
    InvalidRecipient,
}

impl TipError {
    pub fn code(&self) -> u32 {
        match self {
            TipError::SameSenderRecipient => 100,
            TipError::InsufficientNative => 102,
            TipError::InsufficientToken => 103,
            TipError::InvalidAmount => 104,
            TipError::InvalidRecipient => 105,
        }
    }
}

// near-sdk panics with this string when a `#[handle_result]` method returns `Err`
impl AsRef<str> for TipError {
    fn as_ref(&self) -> &str {
        match self {
            TipError::SameSenderRecipient => "E100: sender and recipient must differ",
            TipError::InsufficientNative => "E102: insufficient NEAR balance",
            TipError::InsufficientToken => "E103: insufficient token balance",
            TipError::InvalidAmount => "E104: tip amount must be positive",
            TipError::InvalidRecipient => "E105: invalid recipient",
        }
    }
}

impl fmt::Display for TipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::error::Error for TipError {}
