//! Response status codes returned by the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_status {
    ($($(#[$meta:meta])* $variant:ident = $code:literal => $name:literal,)+) => {
        /// Outcome status of a precheck, query or transaction receipt.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum Status {
            $($(#[$meta])* $variant,)+
        }

        impl Status {
            /// Numeric status code.
            #[must_use]
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Look up a status by its numeric code.
            #[must_use]
            pub const fn from_code(code: i32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Upper-case status name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

define_status! {
    /// Precheck or query passed.
    Ok = 0 => "OK",
    /// The paying account does not exist.
    PayerAccountNotFound = 2 => "PAYER_ACCOUNT_NOT_FOUND",
    /// Required signatures are missing or invalid.
    InvalidSignature = 7 => "INVALID_SIGNATURE",
    /// The memo exceeds the allowed length.
    MemoTooLong = 8 => "MEMO_TOO_LONG",
    /// The transaction's maximum fee is below the required fee.
    InsufficientTxFee = 9 => "INSUFFICIENT_TX_FEE",
    /// The payer cannot cover the fee.
    InsufficientPayerBalance = 10 => "INSUFFICIENT_PAYER_BALANCE",
    /// A transaction with the same id was already submitted.
    DuplicateTransaction = 11 => "DUPLICATE_TRANSACTION",
    /// The referenced account does not exist.
    InvalidAccountId = 15 => "INVALID_ACCOUNT_ID",
    /// The transaction reached consensus and was applied.
    Success = 22 => "SUCCESS",
    /// An hbar transfer would overdraw an account.
    InsufficientAccountBalance = 28 => "INSUFFICIENT_ACCOUNT_BALANCE",
    /// Hbar transfer lines do not sum to zero.
    InvalidAccountAmounts = 48 => "INVALID_ACCOUNT_AMOUNTS",
    /// The referenced topic does not exist.
    InvalidTopicId = 150 => "INVALID_TOPIC_ID",
    /// The topic message is empty.
    InvalidTopicMessage = 157 => "INVALID_TOPIC_MESSAGE",
    /// The referenced token does not exist.
    InvalidTokenId = 167 => "INVALID_TOKEN_ID",
    /// Token decimals are out of range.
    InvalidTokenDecimals = 168 => "INVALID_TOKEN_DECIMALS",
    /// Initial supply is inconsistent with the supply policy.
    InvalidTokenInitialSupply = 169 => "INVALID_TOKEN_INITIAL_SUPPLY",
    /// The treasury account does not exist.
    InvalidTreasuryAccountForToken = 170 => "INVALID_TREASURY_ACCOUNT_FOR_TOKEN",
    /// The token symbol is missing.
    MissingTokenSymbol = 173 => "MISSING_TOKEN_SYMBOL",
    /// A token debit exceeds the holder's balance.
    InsufficientTokenBalance = 178 => "INSUFFICIENT_TOKEN_BALANCE",
    /// Minting was attempted on a token without a supply key.
    TokenHasNoSupplyKey = 180 => "TOKEN_HAS_NO_SUPPLY_KEY",
    /// The mint amount is zero.
    InvalidTokenMintAmount = 183 => "INVALID_TOKEN_MINT_AMOUNT",
    /// The account is not associated with the token.
    TokenNotAssociatedToAccount = 184 => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
    /// Token transfer lines do not sum to zero.
    TransfersNotZeroSumForToken = 185 => "TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN",
    /// The account is already associated with the token.
    TokenAlreadyAssociatedToAccount = 194 => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
    /// The token name is missing.
    MissingTokenName = 195 => "MISSING_TOKEN_NAME",
    /// Minting would exceed the token's maximum supply.
    TokenMaxSupplyReached = 233 => "TOKEN_MAX_SUPPLY_REACHED",
    /// A finite supply token was created without a maximum supply.
    InvalidTokenMaxSupply = 236 => "INVALID_TOKEN_MAX_SUPPLY",
}

impl Status {
    /// Whether this is the success sentinel of a receipt.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Status::Success, 22)]
    #[case(Status::InvalidSignature, 7)]
    #[case(Status::TokenMaxSupplyReached, 233)]
    fn codes_round_trip(#[case] status: Status, #[case] code: i32) {
        assert_eq!(status.code(), code);
        assert_eq!(Status::from_code(code), Some(status));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Status::from_code(-1), None);
    }

    #[test]
    fn display_includes_name_and_code() {
        assert_eq!(Status::InvalidSignature.to_string(), "INVALID_SIGNATURE (7)");
        assert!(Status::Success.is_success());
        assert!(!Status::Ok.is_success());
    }
}
