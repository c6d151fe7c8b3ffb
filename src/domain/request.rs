use super::wallet::{Amount, Balance, WalletId};
use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Deposit,
    Withdraw,
}

impl FromStr for OperationType {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            _ => Err(WalletError::InvalidOperation(s.to_string())),
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("DEPOSIT"),
            Self::Withdraw => f.write_str("WITHDRAW"),
        }
    }
}

/// A validated balance change for a single wallet.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ChangeRequest {
    pub wallet: WalletId,
    pub operation: OperationType,
    pub amount: Amount,
}

impl ChangeRequest {
    pub fn deposit(wallet: WalletId, amount: Amount) -> Self {
        Self {
            wallet,
            operation: OperationType::Deposit,
            amount,
        }
    }

    pub fn withdraw(wallet: WalletId, amount: Amount) -> Self {
        Self {
            wallet,
            operation: OperationType::Withdraw,
            amount,
        }
    }

    /// Computes the balance that results from applying this request to `current`.
    pub fn apply_to(&self, current: Balance) -> Result<Balance> {
        match self.operation {
            OperationType::Deposit => current
                .checked_credit(self.amount)
                .ok_or(WalletError::BalanceOverflow(self.wallet)),
            OperationType::Withdraw if current.covers(self.amount) => {
                Ok(current - self.amount.into())
            }
            OperationType::Withdraw => Err(self.insufficient_funds(current)),
        }
    }

    pub(crate) fn insufficient_funds(&self, balance: Balance) -> WalletError {
        WalletError::InsufficientFunds {
            wallet: self.wallet,
            balance,
            requested: self.amount.value(),
        }
    }
}

/// Unvalidated request as it arrives at the boundary.
///
/// Every field is optional so that conversion can report all violations at once
/// instead of stopping at the first one.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
pub struct RequestDraft {
    #[serde(alias = "wallet_id", alias = "walletId")]
    pub wallet: Option<String>,
    #[serde(alias = "operation_type", alias = "operationType")]
    pub operation: Option<String>,
    pub amount: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl TryFrom<RequestDraft> for ChangeRequest {
    type Error = WalletError;

    fn try_from(draft: RequestDraft) -> Result<Self> {
        let mut violations = Vec::new();

        let wallet = match present(&draft.wallet) {
            None => {
                violations.push("wallet id must not be empty".to_string());
                None
            }
            Some(raw) => match raw.parse::<WalletId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    violations.push(format!("wallet id '{raw}' is not a valid UUID"));
                    None
                }
            },
        };

        let operation = match present(&draft.operation) {
            None => {
                violations.push("operation type must not be empty".to_string());
                None
            }
            Some(raw) => match raw.parse::<OperationType>() {
                Ok(op) => Some(op),
                Err(e) => {
                    violations.push(e.to_string());
                    None
                }
            },
        };

        let amount = match present(&draft.amount) {
            None => {
                violations.push("amount must not be empty".to_string());
                None
            }
            Some(raw) => match raw.parse::<Decimal>() {
                Ok(value) => match Amount::new(value) {
                    Ok(amount) => Some(amount),
                    Err(WalletError::MalformedRequest(mut reasons)) => {
                        violations.append(&mut reasons);
                        None
                    }
                    Err(e) => return Err(e),
                },
                Err(_) => {
                    violations.push(format!("amount '{raw}' is not a decimal number"));
                    None
                }
            },
        };

        match (wallet, operation, amount) {
            (Some(wallet), Some(operation), Some(amount)) if violations.is_empty() => Ok(Self {
                wallet,
                operation,
                amount,
            }),
            _ => Err(WalletError::MalformedRequest(violations)),
        }
    }
}
