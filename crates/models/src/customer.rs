use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Hotel guest stored in the tenant database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: i32,
    pub customer_no: Option<String>,
    pub customer_name: String,

    // Lookups
    pub gtype_id: Option<i32>,
    pub nationality_id: Option<i32>,
    pub guest_category_id: Option<i32>,

    // Contact information
    pub visa_no: Option<String>,
    pub mobile_no: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub comments: Option<String>,

    pub gender: Option<String>,
    pub birthdate_hijri: Option<String>,
    pub birthdate_gregorian: Option<NaiveDate>,

    pub hotel_id: i32,
    pub zaaer_id: Option<i32>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Age in whole years on the given date, 0 when no birthdate is known
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let Some(birthdate) = self.birthdate_gregorian else {
            return 0;
        };
        if birthdate > today {
            return 0;
        }

        let mut age = today.year() - birthdate.year();
        if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }
}

/// Create customer request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCustomer {
    #[validate(length(max = 50))]
    pub customer_no: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,

    pub gtype_id: Option<i32>,
    pub nationality_id: Option<i32>,
    pub guest_category_id: Option<i32>,

    #[validate(length(max = 50))]
    pub visa_no: Option<String>,

    #[validate(length(max = 20))]
    pub mobile_no: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(length(max = 1000))]
    pub comments: Option<String>,

    #[validate(length(max = 10))]
    pub gender: Option<String>,

    #[validate(length(max = 50))]
    pub birthdate_hijri: Option<String>,
    pub birthdate_gregorian: Option<NaiveDate>,

    pub zaaer_id: Option<i32>,
}

/// Update customer request, absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCustomer {
    #[validate(length(max = 50))]
    pub customer_no: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,

    pub gtype_id: Option<i32>,
    pub nationality_id: Option<i32>,
    pub guest_category_id: Option<i32>,

    #[validate(length(max = 50))]
    pub visa_no: Option<String>,

    #[validate(length(max = 20))]
    pub mobile_no: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[validate(length(max = 1000))]
    pub comments: Option<String>,

    #[validate(length(max = 10))]
    pub gender: Option<String>,

    pub is_active: Option<bool>,
}

/// One page of customers plus the total row count
#[derive(Debug, Clone, Serialize)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}
