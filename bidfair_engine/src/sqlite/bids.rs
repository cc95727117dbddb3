use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Bid, BidStatusType, NewBid},
    sqlite::SqliteDatabaseError,
};

const BID_COLUMNS: &str = "id, order_id, partner_id, price, message, status, created_at, updated_at";

/// Inserts a `Pending` bid. The `UNIQUE (order_id, partner_id)` constraint makes this fail
/// with a unique violation when the partner already has a bid on the order, even when the
/// prior existence check raced with another insert.
pub async fn insert_bid(bid: &NewBid, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO bids (order_id, partner_id, price, message) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(bid.order_id)
    .bind(bid.partner_id)
    .bind(bid.price)
    .bind(&bid.message)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Bid #{id} saved on order #{} by partner #{}", bid.order_id, bid.partner_id);
    Ok(id)
}

pub async fn fetch_bid(bid_id: i64, conn: &mut SqliteConnection) -> Result<Option<Bid>, SqliteDatabaseError> {
    let query = format!("SELECT {BID_COLUMNS} FROM bids WHERE id = ?");
    let bid = sqlx::query_as::<_, Bid>(&query).bind(bid_id).fetch_optional(conn).await?;
    Ok(bid)
}

pub async fn fetch_bids_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Bid>, SqliteDatabaseError> {
    let query = format!("SELECT {BID_COLUMNS} FROM bids WHERE order_id = ? ORDER BY created_at ASC, id ASC");
    let bids = sqlx::query_as::<_, Bid>(&query).bind(order_id).fetch_all(conn).await?;
    Ok(bids)
}

pub async fn bid_exists(order_id: i64, partner_id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM bids WHERE order_id = ? AND partner_id = ?")
        .bind(order_id)
        .bind(partner_id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

/// Conditionally moves a bid out of `Pending`. Returns the number of rows affected; zero means
/// the bid was already processed by another transaction.
pub async fn mark_bid_if_pending(
    bid_id: i64,
    status: BidStatusType,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("UPDATE bids SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND status = 'Pending'")
        .bind(status.to_string())
        .bind(bid_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Rejects every still-pending sibling of the accepted bid. Returns the number of bids rejected.
pub async fn reject_sibling_bids(
    order_id: i64,
    accepted_bid_id: i64,
    conn: &mut SqliteConnection,
) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE bids SET status = 'Rejected', updated_at = CURRENT_TIMESTAMP \
         WHERE order_id = ? AND id <> ? AND status = 'Pending'",
    )
    .bind(order_id)
    .bind(accepted_bid_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}
