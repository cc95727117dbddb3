use log::trace;
use sqlx::SqliteConnection;

use crate::{db_types::NewOrder, db_types::ServiceOrder, sqlite::SqliteDatabaseError};

const ORDER_COLUMNS: &str = "id, customer_id, category_id, title, description, postal_code, status, created_at, updated_at";

pub async fn insert_order(order: &NewOrder, conn: &mut SqliteConnection) -> Result<ServiceOrder, SqliteDatabaseError> {
    let query = format!(
        "INSERT INTO service_orders (customer_id, category_id, title, description, postal_code) \
         VALUES (?, ?, ?, ?, ?) RETURNING {ORDER_COLUMNS}"
    );
    let inserted = sqlx::query_as::<_, ServiceOrder>(&query)
        .bind(order.customer_id)
        .bind(order.category_id)
        .bind(&order.title)
        .bind(&order.description)
        .bind(&order.postal_code)
        .fetch_one(conn)
        .await?;
    trace!("📝️ Order #{} saved for customer #{}", inserted.id, inserted.customer_id);
    Ok(inserted)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<ServiceOrder>, SqliteDatabaseError> {
    let query = format!("SELECT {ORDER_COLUMNS} FROM service_orders WHERE id = ?");
    let order = sqlx::query_as::<_, ServiceOrder>(&query).bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders_for_customer(
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceOrder>, SqliteDatabaseError> {
    let query = format!("SELECT {ORDER_COLUMNS} FROM service_orders WHERE customer_id = ? ORDER BY created_at DESC, id DESC");
    let orders = sqlx::query_as::<_, ServiceOrder>(&query).bind(customer_id).fetch_all(conn).await?;
    Ok(orders)
}

/// All `Open` orders whose category is in the partner's assignment set.
pub async fn fetch_open_orders_for_partner(
    partner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceOrder>, SqliteDatabaseError> {
    let query = format!(
        "SELECT {ORDER_COLUMNS} FROM service_orders \
         WHERE status = 'Open' \
         AND category_id IN (SELECT category_id FROM partner_categories WHERE partner_id = ?) \
         ORDER BY created_at DESC, id DESC"
    );
    let orders = sqlx::query_as::<_, ServiceOrder>(&query).bind(partner_id).fetch_all(conn).await?;
    Ok(orders)
}

/// Conditionally moves an order from `Open` to `Committed`.
///
/// Returns the number of rows affected. Zero means some other transaction already moved the
/// order out of `Open`; the caller must treat that as a lost race, not a success.
pub async fn commit_order(order_id: i64, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE service_orders SET status = 'Committed', updated_at = CURRENT_TIMESTAMP \
         WHERE id = ? AND status = 'Open'",
    )
    .bind(order_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
