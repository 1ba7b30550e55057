use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Hotel expense stored in the tenant database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub expense_id: i32,
    pub date_time: DateTime<Utc>,
    pub comment: Option<String>,
    pub hotel_id: i32,
    pub expense_category_id: Option<i32>,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create expense request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExpense {
    pub date_time: DateTime<Utc>,

    #[validate(length(max = 500))]
    pub comment: Option<String>,

    pub expense_category_id: Option<i32>,

    /// Percentage, 0 to 100
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Decimal,
}

/// Update expense request, absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateExpense {
    pub date_time: Option<DateTime<Utc>>,

    #[validate(length(max = 500))]
    pub comment: Option<String>,

    pub expense_category_id: Option<i32>,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
}

/// Checks the monetary fields shared by create and update requests
pub fn check_amounts(
    tax_rate: Option<Decimal>,
    tax_amount: Option<Decimal>,
    total_amount: Option<Decimal>,
) -> Result<(), String> {
    if let Some(rate) = tax_rate {
        if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
            return Err(format!("tax_rate must be between 0 and 100, got {}", rate));
        }
    }
    if let Some(amount) = tax_amount {
        if amount < Decimal::ZERO {
            return Err(format!("tax_amount cannot be negative, got {}", amount));
        }
    }
    if let Some(total) = total_amount {
        if total < Decimal::ZERO {
            return Err(format!("total_amount cannot be negative, got {}", total));
        }
    }
    Ok(())
}

impl CreateExpense {
    pub fn check_amounts(&self) -> Result<(), String> {
        check_amounts(self.tax_rate, self.tax_amount, Some(self.total_amount))
    }
}

impl UpdateExpense {
    pub fn check_amounts(&self) -> Result<(), String> {
        check_amounts(self.tax_rate, self.tax_amount, self.total_amount)
    }
}
