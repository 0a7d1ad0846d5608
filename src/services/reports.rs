use crate::{
    db::DbPool,
    entities::expense::ExpenseCategory,
    entities::{party, truck},
    errors::ServiceError,
    ledger::{
        aggregate_charges, build_monthly_report, ExpenseTotals, MonthPeriod, MonthlyReport,
        OwnershipClass, ReportTrip,
    },
    repositories::{ExpenseRepository, TripRepository},
    tracing::with_metrics,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use slog::Logger;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Monthly profit report over trips and general expenses
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
    trips: TripRepository,
    expenses: ExpenseRepository,
    logger: Logger,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self {
            trips: TripRepository::new(db_pool.clone()),
            expenses: ExpenseRepository::new(db_pool.clone()),
            db_pool,
            logger,
        }
    }

    /// Builds the report for `month` (a month name such as `"January"`) of `year`
    #[instrument(skip(self))]
    pub async fn monthly_report(
        &self,
        user_id: Uuid,
        month: &str,
        year: i32,
    ) -> Result<MonthlyReport, ServiceError> {
        let period = MonthPeriod::from_name(month, year)?;

        with_metrics("monthly_report", || async move {
            let trips = self.trips.started_between(user_id, period.start, period.end).await?;
            let ledgers = self.trips.with_ledgers(trips).await?;

            let truck_ids: HashSet<Uuid> = ledgers.iter().map(|l| l.trip.truck_id).collect();
            let party_ids: HashSet<Uuid> = ledgers.iter().map(|l| l.trip.party_id).collect();
            let trucks: HashMap<Uuid, truck::Model> = truck::Entity::find()
                .filter(truck::Column::Id.is_in(truck_ids))
                .all(&*self.db_pool)
                .await?
                .into_iter()
                .map(|t| (t.id, t))
                .collect();
            let parties: HashMap<Uuid, String> = party::Entity::find()
                .filter(party::Column::Id.is_in(party_ids))
                .all(&*self.db_pool)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect();

            let report_trips: Vec<ReportTrip> = ledgers
                .iter()
                .map(|ledger| {
                    let trip = &ledger.trip;
                    let truck = trucks.get(&trip.truck_id);
                    let ownership = match truck {
                        Some(truck) => truck.ownership_class(),
                        None => {
                            warn!(trip_id = %trip.trip_id, truck_id = %trip.truck_id, "Truck missing, reporting trip as company-owned");
                            OwnershipClass::Owned
                        }
                    };
                    let charges = aggregate_charges(&ledger.charges);
                    ReportTrip {
                        id: trip.id,
                        trip_id: trip.trip_id.clone(),
                        truck_no: truck.map(|t| t.truck_no.clone()),
                        party_name: parties.get(&trip.party_id).cloned(),
                        route: trip.route(),
                        ownership,
                        start_date: trip.start_date,
                        amount: trip.amount,
                        charge_to_bill: charges.charge_to_bill,
                        charge_not_to_bill: charges.charge_not_to_bill,
                    }
                })
                .collect();

            let (total_expense, total_office_expense) = futures::try_join!(
                self.expenses
                    .category_total(user_id, ExpenseCategory::Trip, period.start, period.end),
                self.expenses
                    .category_total(user_id, ExpenseCategory::Office, period.start, period.end),
            )?;
            let expenses = ExpenseTotals {
                total_expense,
                total_office_expense,
            };

            let report = build_monthly_report(&period, report_trips, expenses);
            slog::info!(self.logger, "monthly report built";
                "period" => period.label(),
                "trips" => report.own.trip_count + report.market.trip_count,
                "total_profit" => %report.total_profit);
            Ok::<_, ServiceError>(report)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn unknown_month_is_rejected() {
        let db = Arc::new(fixtures::memory_pool().await);
        let service = ReportService::new(db, slog::Logger::root(slog::Discard, slog::o!()));

        assert_matches!(
            service.monthly_report(Uuid::new_v4(), "Jantober", 2024).await,
            Err(ServiceError::InvalidMonthName(name)) if name == "Jantober"
        );
        assert_matches!(
            service.monthly_report(Uuid::new_v4(), "March", 1969).await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn empty_month_is_all_zero() {
        let db = Arc::new(fixtures::memory_pool().await);
        let service = ReportService::new(db, slog::Logger::root(slog::Discard, slog::o!()));

        let report = service.monthly_report(Uuid::new_v4(), "february", 2024).await.unwrap();
        assert_eq!(report.month, "February");
        assert_eq!(report.own.trip_count, 0);
        assert_eq!(report.market.trip_count, 0);
        assert_eq!(report.total_profit, Decimal::ZERO);
    }

    #[tokio::test]
    async fn segments_are_charged_their_expense_category() {
        let db = Arc::new(fixtures::memory_pool().await);
        let fleet = fixtures::seed_fleet(&db).await;
        let in_march = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
        let in_april = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        let own = fixtures::trip_at(&db, &fleet, "T-1", fleet.own_truck, dec!(20000), in_march).await;
        fixtures::charge(&db, &own, dec!(1000), Some(true)).await;
        fixtures::charge(&db, &own, dec!(250), None).await;
        fixtures::trip_at(&db, &fleet, "T-2", fleet.market_truck, dec!(30000), in_march).await;
        fixtures::trip_at(&db, &fleet, "T-3", fleet.own_truck, dec!(99999), in_april).await;

        fixtures::expense(&db, fleet.user, ExpenseCategory::Trip, None, dec!(4000), in_march).await;
        fixtures::expense(&db, fleet.user, ExpenseCategory::Office, None, dec!(1500), in_march).await;
        fixtures::expense(&db, fleet.user, ExpenseCategory::Office, None, dec!(700), in_april).await;

        let service = ReportService::new(db, slog::Logger::root(slog::Discard, slog::o!()));
        let report = service.monthly_report(fleet.user, "MARCH", 2024).await.unwrap();

        assert_eq!(report.own.trip_count, 1);
        assert_eq!(report.market.trip_count, 1);
        assert_eq!(report.own.trips[0].truck_no.as_deref(), Some("TN01OWN1"));
        assert_eq!(report.expenses.total_expense, dec!(4000));
        assert_eq!(report.expenses.total_office_expense, dec!(1500));
        // 20000 + 1000 - 250 - 1500
        assert_eq!(report.own_profit, dec!(19250));
        // 30000 - 4000
        assert_eq!(report.market_profit, dec!(26000));
        assert_eq!(report.total_profit, dec!(45250));
    }
}
