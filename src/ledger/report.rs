use super::charges::ChargeTotals;
use super::month::MonthPeriod;
use super::profit::OwnershipClass;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One trip as it appears on the monthly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTrip {
    pub id: Uuid,
    pub trip_id: String,
    pub truck_no: Option<String>,
    pub party_name: Option<String>,
    pub route: String,
    pub ownership: OwnershipClass,
    pub start_date: DateTime<Utc>,
    pub amount: Decimal,
    pub charge_to_bill: Decimal,
    pub charge_not_to_bill: Decimal,
}

impl ReportTrip {
    pub fn charges(&self) -> ChargeTotals {
        ChargeTotals {
            charge_to_bill: self.charge_to_bill,
            charge_not_to_bill: self.charge_not_to_bill,
        }
    }
}

/// Totals for all trips run on trucks of one ownership class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub total_freight: Decimal,
    pub total_charges: Decimal,
    pub total_deductions: Decimal,
    pub trip_count: u64,
    pub trips: Vec<ReportTrip>,
}

impl SegmentSummary {
    fn push(&mut self, trip: ReportTrip) {
        self.total_freight += trip.amount;
        self.total_charges += trip.charge_to_bill;
        self.total_deductions += trip.charge_not_to_bill;
        self.trip_count += 1;
        self.trips.push(trip);
    }

    /// `total_freight + total_charges - total_deductions - segment_expense`.
    pub fn profit(&self, segment_expense: Decimal) -> Decimal {
        self.total_freight + self.total_charges - self.total_deductions - segment_expense
    }
}

/// Period expense totals, summed by category rather than matched to trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotals {
    /// Trip-category expenses.
    pub total_expense: Decimal,
    /// Office-category expenses.
    pub total_office_expense: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: String,
    pub year: i32,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    #[serde(rename = "self")]
    pub own: SegmentSummary,
    pub market: SegmentSummary,
    pub expenses: ExpenseTotals,
    pub own_profit: Decimal,
    pub market_profit: Decimal,
    pub total_profit: Decimal,
}

/// Groups the period's trips by ownership class and derives segment profit.
///
/// Market trucks are charged the trip-category expense total and owned trucks
/// the office-category total. Trips starting outside the period are skipped.
pub fn build_monthly_report<I>(period: &MonthPeriod, trips: I, expenses: ExpenseTotals) -> MonthlyReport
where
    I: IntoIterator<Item = ReportTrip>,
{
    let mut own = SegmentSummary::default();
    let mut market = SegmentSummary::default();

    for trip in trips.into_iter().filter(|t| period.contains(t.start_date)) {
        match trip.ownership {
            OwnershipClass::Owned => own.push(trip),
            OwnershipClass::Market => market.push(trip),
        }
    }

    own.trips.sort_by(|a, b| a.start_date.cmp(&b.start_date));
    market.trips.sort_by(|a, b| a.start_date.cmp(&b.start_date));

    let own_profit = own.profit(expenses.total_office_expense);
    let market_profit = market.profit(expenses.total_expense);

    MonthlyReport {
        month: period.month_name().to_string(),
        year: period.year,
        period_start: period.start,
        period_end: period.end,
        own,
        market,
        expenses,
        own_profit,
        market_profit,
        total_profit: own_profit + market_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn trip(trip_id: &str, ownership: OwnershipClass, day: u32, amount: Decimal, to_bill: Decimal, not_to_bill: Decimal) -> ReportTrip {
        ReportTrip {
            id: Uuid::new_v4(),
            trip_id: trip_id.to_string(),
            truck_no: Some("KA01AB1234".to_string()),
            party_name: None,
            route: "Pune - Mumbai".to_string(),
            ownership,
            start_date: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
            amount,
            charge_to_bill: to_bill,
            charge_not_to_bill: not_to_bill,
        }
    }

    #[test]
    fn empty_month_is_all_zero() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let report = build_monthly_report(&period, Vec::new(), ExpenseTotals::default());

        assert_eq!(report.own, SegmentSummary::default());
        assert_eq!(report.market, SegmentSummary::default());
        assert_eq!(report.total_profit, Decimal::ZERO);
    }

    #[test]
    fn groups_trips_by_ownership() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let trips = vec![
            trip("T-1", OwnershipClass::Owned, 3, dec!(10000), dec!(500), dec!(100)),
            trip("T-2", OwnershipClass::Market, 5, dec!(8000), dec!(0), dec!(250)),
            trip("T-3", OwnershipClass::Owned, 2, dec!(4000), dec!(200), dec!(0)),
        ];

        let report = build_monthly_report(&period, trips, ExpenseTotals::default());

        assert_eq!(report.own.trip_count, 2);
        assert_eq!(report.own.total_freight, dec!(14000));
        assert_eq!(report.own.total_charges, dec!(700));
        assert_eq!(report.own.total_deductions, dec!(100));
        assert_eq!(report.own.trips[0].trip_id, "T-3");
        assert_eq!(report.market.trip_count, 1);
        assert_eq!(report.market.total_deductions, dec!(250));
    }

    #[test]
    fn expenses_are_attributed_per_segment() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let trips = vec![
            trip("T-1", OwnershipClass::Owned, 3, dec!(10000), dec!(0), dec!(0)),
            trip("T-2", OwnershipClass::Market, 5, dec!(8000), dec!(0), dec!(0)),
        ];
        let expenses = ExpenseTotals {
            total_expense: dec!(1500),
            total_office_expense: dec!(2500),
        };

        let report = build_monthly_report(&period, trips, expenses);

        assert_eq!(report.own_profit, dec!(7500));
        assert_eq!(report.market_profit, dec!(6500));
        assert_eq!(report.total_profit, dec!(14000));
    }

    #[test]
    fn skips_trips_outside_the_period() {
        let period = MonthPeriod::from_name("February", 2024).unwrap();
        let trips = vec![trip("T-1", OwnershipClass::Owned, 31, dec!(10000), dec!(0), dec!(0))];
        let report = build_monthly_report(&period, trips, ExpenseTotals::default());
        assert_eq!(report.own.trip_count, 0);
    }

    #[test]
    fn serializes_with_report_field_names() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let report = build_monthly_report(&period, Vec::new(), ExpenseTotals::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["self"]["tripCount"], 0);
        assert_eq!(json["market"]["trips"], serde_json::json!([]));
        assert!(json["expenses"].get("totalOfficeExpense").is_some());
    }

    #[test]
    fn report_trips_use_the_same_field_case() {
        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let trips = vec![trip("T-9", OwnershipClass::Owned, 12, dec!(900), dec!(50), dec!(10))];
        let report = build_monthly_report(&period, trips, ExpenseTotals::default());
        let json = serde_json::to_value(&report).unwrap();
        let row = &json["self"]["trips"][0];

        assert_eq!(row["tripId"], "T-9");
        assert_eq!(row["truckNo"], "KA01AB1234");
        assert!(row.get("startDate").is_some());
        assert!(row.get("chargeToBill").is_some());
        assert!(row.get("chargeNotToBill").is_some());
        assert!(row.get("trip_id").is_none());
    }
}
