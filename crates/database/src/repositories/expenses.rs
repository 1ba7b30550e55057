use crate::error::{DatabaseError, Result};
use hms_models::{CreateExpense, Expense, UpdateExpense};
use sqlx::PgPool;

pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List expenses of a hotel, newest first
    pub async fn list(&self, hotel_id: i32, limit: i64, offset: i64) -> Result<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT * FROM expenses
            WHERE hotel_id = $1
            ORDER BY date_time DESC, expense_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(hotel_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn find_by_id(&self, hotel_id: i32, expense_id: i32) -> Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            "SELECT * FROM expenses WHERE expense_id = $1 AND hotel_id = $2",
        )
        .bind(expense_id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Expense", &expense_id.to_string()))?;

        Ok(expense)
    }

    pub async fn create(&self, hotel_id: i32, request: &CreateExpense) -> Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                date_time, comment, hotel_id, expense_category_id,
                tax_rate, tax_amount, total_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.date_time)
        .bind(&request.comment)
        .bind(hotel_id)
        .bind(request.expense_category_id)
        .bind(request.tax_rate)
        .bind(request.tax_amount)
        .bind(request.total_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write("Expense", e))?;

        Ok(expense)
    }

    pub async fn update(&self, hotel_id: i32, expense_id: i32, request: &UpdateExpense) -> Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses SET
                date_time = COALESCE($3, date_time),
                comment = COALESCE($4, comment),
                expense_category_id = COALESCE($5, expense_category_id),
                tax_rate = COALESCE($6, tax_rate),
                tax_amount = COALESCE($7, tax_amount),
                total_amount = COALESCE($8, total_amount),
                updated_at = NOW()
            WHERE expense_id = $1 AND hotel_id = $2
            RETURNING *
            "#,
        )
        .bind(expense_id)
        .bind(hotel_id)
        .bind(request.date_time)
        .bind(&request.comment)
        .bind(request.expense_category_id)
        .bind(request.tax_rate)
        .bind(request.tax_amount)
        .bind(request.total_amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write("Expense", e))?
        .ok_or_else(|| DatabaseError::not_found("Expense", &expense_id.to_string()))?;

        Ok(expense)
    }

    pub async fn delete(&self, hotel_id: i32, expense_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE expense_id = $1 AND hotel_id = $2")
            .bind(expense_id)
            .bind(hotel_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Expense", &expense_id.to_string()));
        }

        Ok(())
    }
}
