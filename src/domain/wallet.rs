use crate::error::WalletError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(Uuid);

impl WalletId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Uuid::from_slice(bytes).ok().map(Self)
    }
}

impl Default for WalletId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WalletId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for WalletId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Monetary value held by a wallet.
///
/// Thin wrapper around `rust_decimal::Decimal`. Balances handed out by the engine
/// are never negative: withdrawals that would overdraw are refused before the
/// subtraction happens. The inner value is only reachable through [`Balance::new`]
/// and [`Balance::value`].
///
/// ```compile_fail
/// use rust_decimal::Decimal;
/// use wallet_lanes::domain::wallet::Balance;
///
/// let overdrawn = Balance(Decimal::NEGATIVE_ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` when `amount` can be withdrawn without going below zero.
    pub fn covers(&self, amount: Amount) -> bool {
        self.0 >= amount.value()
    }

    /// Adds `amount`, returning `None` if the result no longer fits a `Decimal`.
    pub fn checked_credit(&self, amount: Amount) -> Option<Self> {
        self.0.checked_add(amount.value()).map(Self)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// Strictly positive amount carried by a change request.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, WalletError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(WalletError::MalformedRequest(vec![format!(
                "amount must be greater than zero, got {value}"
            )]))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = WalletError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_arithmetic() {
        let b1 = Balance::new(dec!(10.0));
        let b2 = Balance::new(dec!(5.0));
        assert_eq!(b1 + b2, Balance::new(dec!(15.0)));
        assert_eq!(b1 - b2, Balance::new(dec!(5.0)));

        let mut b3 = b1;
        b3 += b2;
        b3 -= Balance::new(dec!(1.5));
        assert_eq!(b3, Balance::new(dec!(13.5)));
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(WalletError::MalformedRequest(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(WalletError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_balance_covers() {
        let balance = Balance::new(dec!(100.00));
        assert!(balance.covers(Amount::new(dec!(100.00)).unwrap()));
        assert!(balance.covers(Amount::new(dec!(0.01)).unwrap()));
        assert!(!balance.covers(Amount::new(dec!(100.01)).unwrap()));
    }

    #[test]
    fn test_wallet_id_round_trips_through_string() {
        let id = WalletId::new();
        let parsed: WalletId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<WalletId>().is_err());
    }

    #[test]
    fn test_wallet_id_from_slice() {
        let id = WalletId::new();
        assert_eq!(WalletId::from_slice(id.as_bytes()), Some(id));
        assert_eq!(WalletId::from_slice(&[1, 2, 3]), None);
    }
}
