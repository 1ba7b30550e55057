use crate::error::{Result, ServiceError};
use chrono::Utc;
use hms_database::{CustomerRepository, HotelSettingsRepository, TenantDbContext};
use hms_models::{CreateCustomer, Customer, CustomerPage, UpdateCustomer};
use serde::Serialize;
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_SEARCH_RESULTS: i64 = 50;

/// Customer with its computed age
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    pub age: u32,
}

impl From<Customer> for CustomerDetails {
    fn from(customer: Customer) -> Self {
        let age = customer.age_on(Utc::now().date_naive());
        Self { customer, age }
    }
}

pub struct CustomerService {
    context: TenantDbContext,
    customers: CustomerRepository,
    settings: HotelSettingsRepository,
}

impl CustomerService {
    pub fn new(context: TenantDbContext) -> Self {
        let customers = CustomerRepository::new(context.pool().clone());
        let settings = HotelSettingsRepository::new(context.pool().clone());
        Self {
            context,
            customers,
            settings,
        }
    }

    fn db_error(&self, err: hms_database::DatabaseError) -> ServiceError {
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

    pub async fn list(&self, page: Option<i64>, page_size: Option<i64>) -> Result<CustomerPage> {
        let (page, page_size) = normalize_page(page, page_size);
        let offset = page_offset(page, page_size)?;
        let hotel_id = self.hotel_id().await?;

        let customers = self
            .customers
            .list(hotel_id, page_size, offset)
            .await
            .map_err(|e| self.db_error(e))?;
        let total_count = self.customers.count(hotel_id).await.map_err(|e| self.db_error(e))?;

        Ok(CustomerPage {
            customers,
            total_count,
            page,
            page_size,
        })
    }

    pub async fn get(&self, customer_id: i32) -> Result<CustomerDetails> {
        let hotel_id = self.hotel_id().await?;
        let customer = self
            .customers
            .find_by_id(hotel_id, customer_id)
            .await
            .map_err(|e| self.db_error(e))?;
        Ok(customer.into())
    }

    pub async fn get_by_number(&self, customer_no: &str) -> Result<CustomerDetails> {
        let customer_no = customer_no.trim();
        let hotel_id = self.hotel_id().await?;
        self.customers
            .find_by_no(hotel_id, customer_no)
            .await
            .map_err(|e| self.db_error(e))?
            .map(CustomerDetails::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with number {} not found", customer_no)))
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Customer>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::InvalidInput("search term is required".to_string()));
        }

        let hotel_id = self.hotel_id().await?;
        self.customers
            .search(hotel_id, term, MAX_SEARCH_RESULTS)
            .await
            .map_err(|e| self.db_error(e))
    }

    pub async fn create(&self, mut request: CreateCustomer) -> Result<Customer> {
        request.validate().map_err(ServiceError::validation)?;
        request.customer_no = trimmed(request.customer_no);
        request.customer_name = request.customer_name.trim().to_string();

        let hotel_id = self.hotel_id().await?;
        if let Some(no) = request.customer_no.as_deref() {
            if self.customers.exists_no(hotel_id, no).await.map_err(|e| self.db_error(e))? {
                return Err(ServiceError::InvalidInput(format!(
                    "Customer number {} already exists",
                    no
                )));
            }
        }

        let customer = self
            .customers
            .create(hotel_id, &request)
            .await
            .map_err(|e| self.db_error(e))?;

        tracing::info!(
            "Created customer {} for tenant {}",
            customer.customer_id,
            self.context.tenant_code()
        );
        Ok(customer)
    }

    pub async fn update(&self, customer_id: i32, mut request: UpdateCustomer) -> Result<Customer> {
        request.validate().map_err(ServiceError::validation)?;
        request.customer_no = trimmed(request.customer_no);

        let hotel_id = self.hotel_id().await?;
        if let Some(no) = request.customer_no.as_deref() {
            let existing = self
                .customers
                .find_by_no(hotel_id, no)
                .await
                .map_err(|e| self.db_error(e))?;
            if existing.is_some_and(|c| c.customer_id != customer_id) {
                return Err(ServiceError::InvalidInput(format!(
                    "Customer number {} already exists",
                    no
                )));
            }
        }

        self.customers
            .update(hotel_id, customer_id, &request)
            .await
            .map_err(|e| self.db_error(e))
    }

    pub async fn delete(&self, customer_id: i32) -> Result<()> {
        let hotel_id = self.hotel_id().await?;
        self.customers
            .delete(hotel_id, customer_id)
            .await
            .map_err(|e| self.db_error(e))?;

        tracing::info!(
            "Deleted customer {} for tenant {}",
            customer_id,
            self.context.tenant_code()
        );
        Ok(())
    }
}

/// 1-based page and a page size within `1..=MAX_PAGE_SIZE`
pub fn normalize_page(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.filter(|p| *p >= 1).unwrap_or(1);
    let page_size = page_size
        .filter(|s| *s >= 1)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    (page, page_size)
}

/// Row offset for a normalized page; pages past `i64` range are rejected
pub fn page_offset(page: i64, page_size: i64) -> Result<i64> {
    (page - 1)
        .checked_mul(page_size)
        .ok_or_else(|| ServiceError::InvalidInput(format!("page {} is out of range", page)))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
