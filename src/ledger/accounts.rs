use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Which book an account entry was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(ascii_case_insensitive)]
pub enum AccountType {
    Advances,
    Payments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize, ToSchema)]
#[strum(ascii_case_insensitive)]
pub enum PaymentType {
    Cash,
    Cheque,
    #[strum(serialize = "Online Transfer")]
    #[serde(rename = "Online Transfer")]
    OnlineTransfer,
}

/// An advance or payment received against a trip.
pub trait AccountEntry {
    fn amount(&self) -> Option<Decimal>;

    fn account_type(&self) -> Option<AccountType> {
        None
    }
}

/// Sum of every advance and payment. Negative entries are summed like any other.
pub fn account_balance<'a, I, A>(entries: I) -> Decimal
where
    I: IntoIterator<Item = &'a A>,
    A: AccountEntry + 'a,
{
    entries
        .into_iter()
        .map(|entry| entry.amount().unwrap_or_default())
        .sum()
}

/// Received money split the way the trip screen groups it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccountBreakdown {
    pub advances: Decimal,
    pub payments: Decimal,
    pub total: Decimal,
}

/// Groups entries by account type. Entries without a recognised type land in
/// `payments`, so `advances + payments` always equals [`account_balance`].
pub fn account_breakdown<'a, I, A>(entries: I) -> AccountBreakdown
where
    I: IntoIterator<Item = &'a A>,
    A: AccountEntry + 'a,
{
    entries
        .into_iter()
        .fold(AccountBreakdown::default(), |mut acc, entry| {
            let amount = entry.amount().unwrap_or_default();
            match entry.account_type() {
                Some(AccountType::Advances) => acc.advances += amount,
                _ => acc.payments += amount,
            }
            acc.total += amount;
            acc
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLine {
    pub amount: Option<Decimal>,
    pub account_type: Option<AccountType>,
}

impl AccountLine {
    pub fn advance(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            account_type: Some(AccountType::Advances),
        }
    }

    pub fn payment(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            account_type: Some(AccountType::Payments),
        }
    }
}

impl AccountEntry for AccountLine {
    fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    fn account_type(&self) -> Option<AccountType> {
        self.account_type
    }
}
