//! Customer Repository
//!
//! Single write path: upsert-by-fingerprint. Uniqueness of
//! (restaurant, fingerprint) is carried by the table constraint, so
//! concurrent first-time callers cannot create duplicate rows.

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerUpsert};
use sqlx::{Sqlite, SqlitePool, Transaction};

const CUSTOMER_SELECT: &str = "SELECT id, restaurant_id, phone_fingerprint, name, email, contact_consent, visit_count, no_show_count, is_vip, last_visit_at, created_at, updated_at FROM customer";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_fingerprint(
    pool: &SqlitePool,
    restaurant_id: i64,
    fingerprint: &str,
) -> RepoResult<Option<Customer>> {
    let sql = format!("{CUSTOMER_SELECT} WHERE restaurant_id = ? AND phone_fingerprint = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(restaurant_id)
        .bind(fingerprint)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create on first sighting, merge on return visits, in one statement.
///
/// Name and consent take the latest value; email only fills in when the
/// caller supplied one; the visit counter increments every upsert.
/// Returns the customer id.
pub async fn upsert_tx(
    tx: &mut Transaction<'_, Sqlite>,
    data: &CustomerUpsert,
    now: i64,
) -> RepoResult<i64> {
    let id = shared::util::snowflake_id();
    let row_id: i64 = sqlx::query_scalar(
        "INSERT INTO customer (id, restaurant_id, phone_fingerprint, name, email, contact_consent, visit_count, no_show_count, is_vip, last_visit_at, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, 0, 0, ?7, ?7, ?7) ON CONFLICT(restaurant_id, phone_fingerprint) DO UPDATE SET name = excluded.name, email = COALESCE(excluded.email, email), contact_consent = excluded.contact_consent, visit_count = visit_count + 1, last_visit_at = excluded.last_visit_at, updated_at = excluded.updated_at RETURNING id",
    )
    .bind(id)
    .bind(data.restaurant_id)
    .bind(&data.phone_fingerprint)
    .bind(&data.name)
    .bind(&data.email)
    .bind(data.contact_consent)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row_id)
}

/// Record a no-show against the customer's history
pub async fn record_no_show(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET no_show_count = no_show_count + 1, updated_at = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE customer (
                id INTEGER PRIMARY KEY,
                restaurant_id INTEGER NOT NULL,
                phone_fingerprint TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                contact_consent INTEGER NOT NULL DEFAULT 0,
                visit_count INTEGER NOT NULL DEFAULT 0,
                no_show_count INTEGER NOT NULL DEFAULT 0,
                is_vip INTEGER NOT NULL DEFAULT 0,
                last_visit_at INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE (restaurant_id, phone_fingerprint)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    fn upsert_data(name: &str, email: Option<&str>) -> CustomerUpsert {
        CustomerUpsert {
            restaurant_id: 1,
            phone_fingerprint: "fp-001".into(),
            name: name.into(),
            email: email.map(String::from),
            contact_consent: true,
        }
    }

    #[tokio::test]
    async fn first_sighting_creates_with_visit_one() {
        let pool = test_pool().await;
        let mut tx = pool.begin().await.unwrap();
        let id = upsert_tx(&mut tx, &upsert_data("Maria", None), 100)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let customer = find_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(customer.visit_count, 1);
        assert_eq!(customer.name, "Maria");
        assert_eq!(customer.email, None);
    }

    #[tokio::test]
    async fn return_visit_merges_and_increments() {
        let pool = test_pool().await;

        let mut tx = pool.begin().await.unwrap();
        let first_id = upsert_tx(&mut tx, &upsert_data("Maria", None), 100)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        // 二次来电: 改名 + 补 email
        let mut tx = pool.begin().await.unwrap();
        let second_id = upsert_tx(
            &mut tx,
            &upsert_data("Maria Garcia", Some("maria@example.com")),
            200,
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(first_id, second_id);
        let customer = find_by_id(&pool, first_id).await.unwrap().unwrap();
        assert_eq!(customer.visit_count, 2);
        assert_eq!(customer.name, "Maria Garcia");
        assert_eq!(customer.email.as_deref(), Some("maria@example.com"));
        assert_eq!(customer.last_visit_at, Some(200));

        // 三次来电: 没有 email 时不清空已有值
        let mut tx = pool.begin().await.unwrap();
        upsert_tx(&mut tx, &upsert_data("Maria Garcia", None), 300)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let customer = find_by_id(&pool, first_id).await.unwrap().unwrap();
        assert_eq!(customer.visit_count, 3);
        assert_eq!(customer.email.as_deref(), Some("maria@example.com"));
    }
}
