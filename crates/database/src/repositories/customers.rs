use crate::error::{DatabaseError, Result};
use hms_models::{CreateCustomer, Customer, UpdateCustomer};
use sqlx::PgPool;

/// Customers of one hotel. Every query is scoped by `hotel_id`.
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List customers (paginated, newest first)
    pub async fn list(&self, hotel_id: i32, limit: i64, offset: i64) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE hotel_id = $1
            ORDER BY customer_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(hotel_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn count(&self, hotel_id: i32) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers WHERE hotel_id = $1")
            .bind(hotel_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn find_by_id(&self, hotel_id: i32, customer_id: i32) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE customer_id = $1 AND hotel_id = $2",
        )
        .bind(customer_id)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Customer", &customer_id.to_string()))?;

        Ok(customer)
    }

    pub async fn find_by_no(&self, hotel_id: i32, customer_no: &str) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE customer_no = $1 AND hotel_id = $2 LIMIT 1",
        )
        .bind(customer_no)
        .bind(hotel_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn exists_no(&self, hotel_id: i32, customer_no: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE customer_no = $1 AND hotel_id = $2)",
        )
        .bind(customer_no)
        .bind(hotel_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Search by name, number, mobile or email (case-insensitive substring)
    pub async fn search(&self, hotel_id: i32, term: &str, limit: i64) -> Result<Vec<Customer>> {
        let pattern = format!("%{}%", escape_like(term.trim()));

        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE hotel_id = $1
              AND (
                customer_name ILIKE $2
                OR customer_no ILIKE $2
                OR mobile_no ILIKE $2
                OR email ILIKE $2
              )
            ORDER BY customer_name
            LIMIT $3
            "#,
        )
        .bind(hotel_id)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn create(&self, hotel_id: i32, request: &CreateCustomer) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (
                customer_no, customer_name, gtype_id, nationality_id, guest_category_id,
                visa_no, mobile_no, email, address, comments,
                gender, birthdate_hijri, birthdate_gregorian,
                hotel_id, zaaer_id, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, TRUE)
            RETURNING *
            "#,
        )
        .bind(&request.customer_no)
        .bind(&request.customer_name)
        .bind(request.gtype_id)
        .bind(request.nationality_id)
        .bind(request.guest_category_id)
        .bind(&request.visa_no)
        .bind(&request.mobile_no)
        .bind(&request.email)
        .bind(&request.address)
        .bind(&request.comments)
        .bind(&request.gender)
        .bind(&request.birthdate_hijri)
        .bind(request.birthdate_gregorian)
        .bind(hotel_id)
        .bind(request.zaaer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write("Customer", e))?;

        Ok(customer)
    }

    /// Update customer, absent fields keep their current value
    pub async fn update(&self, hotel_id: i32, customer_id: i32, request: &UpdateCustomer) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                customer_no = COALESCE($3, customer_no),
                customer_name = COALESCE($4, customer_name),
                gtype_id = COALESCE($5, gtype_id),
                nationality_id = COALESCE($6, nationality_id),
                guest_category_id = COALESCE($7, guest_category_id),
                visa_no = COALESCE($8, visa_no),
                mobile_no = COALESCE($9, mobile_no),
                email = COALESCE($10, email),
                address = COALESCE($11, address),
                comments = COALESCE($12, comments),
                gender = COALESCE($13, gender),
                is_active = COALESCE($14, is_active),
                updated_at = NOW()
            WHERE customer_id = $1 AND hotel_id = $2
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(hotel_id)
        .bind(&request.customer_no)
        .bind(&request.customer_name)
        .bind(request.gtype_id)
        .bind(request.nationality_id)
        .bind(request.guest_category_id)
        .bind(&request.visa_no)
        .bind(&request.mobile_no)
        .bind(&request.email)
        .bind(&request.address)
        .bind(&request.comments)
        .bind(&request.gender)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write("Customer", e))?
        .ok_or_else(|| DatabaseError::not_found("Customer", &customer_id.to_string()))?;

        Ok(customer)
    }

    pub async fn delete(&self, hotel_id: i32, customer_id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1 AND hotel_id = $2")
            .bind(customer_id)
            .bind(hotel_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write("Customer", e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Customer", &customer_id.to_string()));
        }

        Ok(())
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
