use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::expense::{Column, Entity as Expense, ExpenseCategory, Model as ExpenseModel};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Source of a truck's running cost over a window of time.
#[async_trait]
pub trait TruckExpenseLedger: Send + Sync {
    /// Sum of Truck-category expenses for `truck_id` dated within `[from, to]`.
    async fn operating_expense(
        &self,
        user_id: Uuid,
        truck_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError>;
}

/// Repository for general ledger expenses
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    base: BaseRepository,
}

impl ExpenseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Expenses dated in `[start, end)`, optionally restricted to one category
    pub async fn in_period(
        &self,
        user_id: Uuid,
        category: Option<ExpenseCategory>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ExpenseModel>, AppError> {
        let mut query = Expense::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Date.gte(start))
            .filter(Column::Date.lt(end));
        if let Some(category) = category {
            query = query.filter(Column::Category.eq(category.to_string()));
        }

        query
            .order_by_asc(Column::Date)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Total of one category over `[start, end)`
    pub async fn category_total(
        &self,
        user_id: Uuid,
        category: ExpenseCategory,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        Ok(self
            .in_period(user_id, Some(category), start, end)
            .await?
            .iter()
            .map(|e| e.amount)
            .sum())
    }
}

#[async_trait]
impl TruckExpenseLedger for ExpenseRepository {
    async fn operating_expense(
        &self,
        user_id: Uuid,
        truck_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let rows = Expense::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Category.eq(ExpenseCategory::Truck.to_string()))
            .filter(Column::TruckId.eq(truck_id))
            .filter(Column::Date.gte(from))
            .filter(Column::Date.lte(to))
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rows.iter().map(|e| e.amount).sum())
    }
}
