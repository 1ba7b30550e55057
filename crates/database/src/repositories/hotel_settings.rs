use crate::error::Result;
use sqlx::PgPool;

/// Lookups against the tenant database `hotel_settings` table
pub struct HotelSettingsRepository {
    pool: PgPool,
}

impl HotelSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hotel id of the settings row whose code matches (case-insensitive)
    pub async fn find_hotel_id(&self, hotel_code: &str) -> Result<Option<i32>> {
        let hotel_id = sqlx::query_scalar::<_, i32>(
            "SELECT hotel_id FROM hotel_settings WHERE LOWER(hotel_code) = LOWER($1) LIMIT 1",
        )
        .bind(hotel_code.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(hotel_id)
    }
}
