use crate::{
    db::DbPool,
    entities::expense::{self, ExpenseCategory},
    entities::truck,
    errors::ServiceError,
    ledger::MonthPeriod,
    repositories::ExpenseRepository,
    services::validate_money,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExpenseRequest {
    pub category: ExpenseCategory,
    /// Required for `Truck` expenses.
    pub truck_id: Option<Uuid>,
    pub trip_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Expense type is required"))]
    pub expense_type: String,
    #[validate(custom = "validate_money")]
    pub amount: Decimal,
    #[validate(length(min = 1))]
    pub payment_mode: String,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ExpenseService {
    db_pool: Arc<DbPool>,
    expenses: ExpenseRepository,
    logger: Logger,
}

impl ExpenseService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self {
            expenses: ExpenseRepository::new(db_pool.clone()),
            db_pool,
            logger,
        }
    }

    #[instrument(skip(self, request), fields(category = %request.category))]
    pub async fn create_expense(
        &self,
        user_id: Uuid,
        request: CreateExpenseRequest,
    ) -> Result<expense::Model, ServiceError> {
        request.validate()?;

        match (request.category, request.truck_id) {
            (ExpenseCategory::Truck, None) => {
                return Err(ServiceError::ValidationError(
                    "Truck expenses must name a truck".into(),
                ))
            }
            (_, Some(truck_id)) => {
                truck::Entity::find_by_id(truck_id)
                    .filter(truck::Column::UserId.eq(user_id))
                    .one(&*self.db_pool)
                    .await?
                    .ok_or_else(|| ServiceError::ValidationError(format!("Truck {} not found", truck_id)))?;
            }
            _ => {}
        }

        let expense = expense::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            category: Set(request.category.to_string()),
            truck_id: Set(request.truck_id),
            trip_id: Set(request.trip_id),
            expense_type: Set(request.expense_type),
            amount: Set(request.amount),
            payment_mode: Set(request.payment_mode),
            date: Set(request.date.unwrap_or_else(Utc::now)),
            notes: Set(request.notes),
        }
        .insert(&*self.db_pool)
        .await?;

        counter!("fleetbook.expenses.recorded", 1, "category" => expense.category.clone());
        info!(id = %expense.id, "Expense recorded");
        Ok(expense)
    }

    /// Expenses dated within the month, optionally one category only
    #[instrument(skip(self))]
    pub async fn list_expenses(
        &self,
        user_id: Uuid,
        period: &MonthPeriod,
        category: Option<ExpenseCategory>,
    ) -> Result<Vec<expense::Model>, ServiceError> {
        self.expenses
            .in_period(user_id, category, period.start, period.end)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_expense(&self, user_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let result = expense::Entity::delete_many()
            .filter(expense::Column::Id.eq(id))
            .filter(expense::Column::UserId.eq(user_id))
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Expense {} not found", id)));
        }
        slog::info!(self.logger, "expense deleted"; "expense_id" => %id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn office(amount: Decimal, date: DateTime<Utc>) -> CreateExpenseRequest {
        CreateExpenseRequest {
            category: ExpenseCategory::Office,
            truck_id: None,
            trip_id: None,
            expense_type: "Rent".into(),
            amount,
            payment_mode: "Cash".into(),
            date: Some(date),
            notes: None,
        }
    }

    #[tokio::test]
    async fn lists_by_month_and_category() {
        let db = Arc::new(fixtures::memory_pool().await);
        let fleet = fixtures::seed_fleet(&db).await;
        let service = ExpenseService::new(db, slog::Logger::root(slog::Discard, slog::o!()));

        let jan = Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        service.create_expense(fleet.user, office(dec!(1000), jan)).await.unwrap();
        service.create_expense(fleet.user, office(dec!(400), feb)).await.unwrap();

        let period = MonthPeriod::from_name("January", 2024).unwrap();
        let january = service.list_expenses(fleet.user, &period, None).await.unwrap();
        assert_eq!(january.len(), 1);
        assert_eq!(january[0].amount, dec!(1000));

        let trip_only = service
            .list_expenses(fleet.user, &period, Some(ExpenseCategory::Trip))
            .await
            .unwrap();
        assert!(trip_only.is_empty());
    }

    #[tokio::test]
    async fn truck_expense_requires_truck() {
        let db = Arc::new(fixtures::memory_pool().await);
        let fleet = fixtures::seed_fleet(&db).await;
        let service = ExpenseService::new(db, slog::Logger::root(slog::Discard, slog::o!()));

        let mut request = office(dec!(900), Utc::now());
        request.category = ExpenseCategory::Truck;
        assert_matches!(
            service.create_expense(fleet.user, request.clone()).await,
            Err(ServiceError::ValidationError(_))
        );

        request.truck_id = Some(fleet.own_truck);
        let saved = service.create_expense(fleet.user, request).await.unwrap();
        assert_eq!(saved.category, "Truck");

        service.delete_expense(fleet.user, saved.id).await.unwrap();
        assert_matches!(
            service.delete_expense(fleet.user, saved.id).await,
            Err(ServiceError::NotFound(_))
        );
    }
}
