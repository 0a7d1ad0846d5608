//! Trip financial computations.
//!
//! Everything in this module is pure: callers load charges, account entries
//! and trips from storage and hand them in, and get back plain values. Nothing
//! here is cached or persisted, so repeated calls over unchanged input always
//! agree.

pub mod accounts;
pub mod balance;
pub mod charges;
pub mod invoice;
pub mod month;
pub mod profit;
pub mod report;

pub use accounts::{account_balance, account_breakdown, AccountBreakdown, AccountEntry, AccountType, PaymentType};
pub use balance::{balance_of, trip_balance, TripBalance};
pub use charges::{aggregate_charges, ChargeEntry, ChargeTotals, ChargeType};
pub use invoice::{build_invoice, InvoiceLine, InvoiceSummary, InvoiceTrip};
pub use month::{month_index, MonthPeriod, MONTH_NAMES};
pub use profit::{trip_profit, OwnershipClass, TripProfit};
pub use report::{build_monthly_report, ExpenseTotals, MonthlyReport, ReportTrip, SegmentSummary};

use thiserror::Error;

/// Errors raised by the ledger when its input cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Invalid month name: {0}")]
    InvalidMonthName(String),

    #[error("Month index out of range: {0}")]
    InvalidMonth(u32),

    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    #[error("Invoice trips belong to more than one party")]
    MixedParties,

    #[error("Invoice must reference at least one trip")]
    EmptyInvoice,
}
