use crate::customer_service::{normalize_page, page_offset};
use crate::error::{Result, ServiceError};
use hms_database::{DatabaseError, ExpenseRepository, HotelSettingsRepository, TenantDbContext};
use hms_models::{CreateExpense, Expense, UpdateExpense};
use validator::Validate;

pub struct ExpenseService {
    context: TenantDbContext,
    expenses: ExpenseRepository,
    settings: HotelSettingsRepository,
}

impl ExpenseService {
    pub fn new(context: TenantDbContext) -> Self {
        let expenses = ExpenseRepository::new(context.pool().clone());
        let settings = HotelSettingsRepository::new(context.pool().clone());
        Self {
            context,
            expenses,
            settings,
        }
    }

    fn db_error(&self, err: DatabaseError) -> ServiceError {
        ServiceError::from_database(err, self.context.detailed_errors())
    }

    async fn hotel_id(&self) -> Result<i32> {
        let code = self.context.tenant_code();
        self.settings
            .find_hotel_id(code)
            .await
            .map_err(|e| self.db_error(e))?
            .ok_or_else(|| ServiceError::HotelNotConfigured(code.to_string()))
    }

    /// Newest first
    pub async fn list(&self, page: Option<i64>, page_size: Option<i64>) -> Result<Vec<Expense>> {
        let (page, page_size) = normalize_page(page, page_size);
        let offset = page_offset(page, page_size)?;
        let hotel_id = self.hotel_id().await?;
        self.expenses
            .list(hotel_id, page_size, offset)
            .await
            .map_err(|e| self.db_error(e))
    }

    pub async fn get(&self, expense_id: i32) -> Result<Expense> {
        let hotel_id = self.hotel_id().await?;
        self.expenses
            .find_by_id(hotel_id, expense_id)
            .await
            .map_err(|e| self.db_error(e))
    }

    pub async fn create(&self, request: CreateExpense) -> Result<Expense> {
        request.validate().map_err(ServiceError::validation)?;
        request.check_amounts().map_err(ServiceError::InvalidInput)?;

        let hotel_id = self.hotel_id().await?;
        let expense = self
            .expenses
            .create(hotel_id, &request)
            .await
            .map_err(|e| self.db_error(e))?;

        tracing::info!(
            "Created expense {} ({}) for tenant {}",
            expense.expense_id,
            expense.total_amount,
            self.context.tenant_code()
        );
        Ok(expense)
    }

    pub async fn update(&self, expense_id: i32, request: UpdateExpense) -> Result<Expense> {
        request.validate().map_err(ServiceError::validation)?;
        request.check_amounts().map_err(ServiceError::InvalidInput)?;

        let hotel_id = self.hotel_id().await?;
        self.expenses
            .update(hotel_id, expense_id, &request)
            .await
            .map_err(|e| self.db_error(e))
    }

    pub async fn delete(&self, expense_id: i32) -> Result<()> {
        let hotel_id = self.hotel_id().await?;
        self.expenses
            .delete(hotel_id, expense_id)
            .await
            .map_err(|e| self.db_error(e))?;

        tracing::info!(
            "Deleted expense {} for tenant {}",
            expense_id,
            self.context.tenant_code()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hms_database::{DbContextFactory, DbContextOptions};
    use rust_decimal::Decimal;

    async fn service() -> ExpenseService {
        let factory = DbContextFactory::new(DbContextOptions::default());
        let context = factory
            .create("HOTEL001", "Server=localhost;Database=hotel001_db;User Id=hotel_app;Password=pw")
            .await
            .unwrap();
        ExpenseService::new(context)
    }

    #[tokio::test]
    async fn test_negative_total_is_invalid_input() {
        let request = CreateExpense {
            date_time: Utc::now(),
            comment: None,
            expense_category_id: None,
            tax_rate: None,
            tax_amount: None,
            total_amount: Decimal::new(-100, 2),
        };

        let err = service().await.create(request).await.unwrap_err();
        match err {
            ServiceError::InvalidInput(msg) => assert!(msg.contains("total_amount")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_huge_page_is_invalid_input() {
        let err = service().await.list(Some(i64::MAX), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_tax_rate_over_hundred_is_invalid_input() {
        let request = UpdateExpense {
            tax_rate: Some(Decimal::new(150, 0)),
            ..Default::default()
        };

        let err = service().await.update(1, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_overlong_comment_is_invalid_input() {
        let request = UpdateExpense {
            comment: Some("x".repeat(501)),
            ..Default::default()
        };

        let err = service().await.update(1, request).await.unwrap_err();
        match err {
            ServiceError::InvalidInput(msg) => assert!(msg.contains("comment")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
