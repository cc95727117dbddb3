use log::trace;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Customer, Partner, ServiceCategory},
    sqlite::SqliteDatabaseError,
};

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, phone_verified_at, created_at, updated_at";
const PARTNER_COLUMNS: &str = "id, name, phone, email, expertise, phone_verified_at, created_at, updated_at";

//--------------------------------------      Customers      ---------------------------------------------------------

pub async fn fetch_customer(customer_id: i64, conn: &mut SqliteConnection) -> Result<Option<Customer>, SqliteDatabaseError> {
    let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?");
    let customer = sqlx::query_as::<_, Customer>(&query).bind(customer_id).fetch_optional(conn).await?;
    Ok(customer)
}

pub async fn fetch_customer_by_phone(
    phone: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Customer>, SqliteDatabaseError> {
    let query = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE phone = ?");
    let customer = sqlx::query_as::<_, Customer>(&query).bind(phone).fetch_optional(conn).await?;
    Ok(customer)
}

pub async fn insert_verified_customer(
    phone: &str,
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<Customer, SqliteDatabaseError> {
    let query = format!(
        "INSERT INTO customers (name, phone, phone_verified_at) VALUES (?, ?, CURRENT_TIMESTAMP) \
         RETURNING {CUSTOMER_COLUMNS}"
    );
    let customer = sqlx::query_as::<_, Customer>(&query).bind(name).bind(phone).fetch_one(conn).await?;
    trace!("🧑️ Created customer #{} for {phone}", customer.id);
    Ok(customer)
}

pub async fn mark_customer_verified(customer_id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        "UPDATE customers SET phone_verified_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn rename_customer_verified(
    customer_id: i64,
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        "UPDATE customers SET name = ?, phone_verified_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?",
    )
    .bind(name)
    .bind(customer_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Name and phone only; used by the accept-bid transaction to build the notification payload.
pub async fn contact_for_customer(
    customer_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<(String, String)>, SqliteDatabaseError> {
    let contact = sqlx::query_as::<_, (String, String)>("SELECT name, phone FROM customers WHERE id = ?")
        .bind(customer_id)
        .fetch_optional(conn)
        .await?;
    Ok(contact)
}

//--------------------------------------      Partners       ---------------------------------------------------------

pub async fn fetch_partner(partner_id: i64, conn: &mut SqliteConnection) -> Result<Option<Partner>, SqliteDatabaseError> {
    let query = format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?");
    let partner = sqlx::query_as::<_, Partner>(&query).bind(partner_id).fetch_optional(conn).await?;
    Ok(partner)
}

pub async fn fetch_partner_by_phone(phone: &str, conn: &mut SqliteConnection) -> Result<Option<Partner>, SqliteDatabaseError> {
    let query = format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE phone = ?");
    let partner = sqlx::query_as::<_, Partner>(&query).bind(phone).fetch_optional(conn).await?;
    Ok(partner)
}

pub async fn partner_contact_exists(
    phone: &str,
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM partners WHERE phone = ? OR email = ?")
        .bind(phone)
        .bind(email)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

pub async fn insert_verified_partner(
    phone: &str,
    name: &str,
    email: Option<&str>,
    expertise: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Partner, SqliteDatabaseError> {
    let query = format!(
        "INSERT INTO partners (name, phone, email, expertise, phone_verified_at) \
         VALUES (?, ?, ?, ?, CURRENT_TIMESTAMP) RETURNING {PARTNER_COLUMNS}"
    );
    let partner =
        sqlx::query_as::<_, Partner>(&query).bind(name).bind(phone).bind(email).bind(expertise).fetch_one(conn).await?;
    trace!("🧑️ Created partner #{} for {phone}", partner.id);
    Ok(partner)
}

pub async fn mark_partner_verified(partner_id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("UPDATE partners SET phone_verified_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(partner_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn contact_for_partner(
    partner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<(String, String)>, SqliteDatabaseError> {
    let contact = sqlx::query_as::<_, (String, String)>("SELECT name, phone FROM partners WHERE id = ?")
        .bind(partner_id)
        .fetch_optional(conn)
        .await?;
    Ok(contact)
}

//--------------------------------------     Categories      ---------------------------------------------------------

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<ServiceCategory>, SqliteDatabaseError> {
    let categories =
        sqlx::query_as::<_, ServiceCategory>("SELECT id, name, description FROM service_categories ORDER BY name ASC")
            .fetch_all(conn)
            .await?;
    Ok(categories)
}

pub async fn fetch_categories_for_partner(
    partner_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceCategory>, SqliteDatabaseError> {
    let categories = sqlx::query_as::<_, ServiceCategory>(
        "SELECT sc.id, sc.name, sc.description FROM service_categories sc \
         INNER JOIN partner_categories pc ON pc.category_id = sc.id \
         WHERE pc.partner_id = ? ORDER BY sc.name ASC",
    )
    .bind(partner_id)
    .fetch_all(conn)
    .await?;
    Ok(categories)
}

/// The submit-bid category gate.
pub async fn partner_has_category(
    partner_id: i64,
    category_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM partner_categories WHERE partner_id = ? AND category_id = ?")
            .bind(partner_id)
            .bind(category_id)
            .fetch_one(conn)
            .await?;
    Ok(count > 0)
}

/// Counts how many of the given category ids actually exist.
pub async fn count_existing_categories(
    category_ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<i64, SqliteDatabaseError> {
    if category_ids.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("SELECT count(*) FROM service_categories WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in category_ids {
        separated.push_bind(*id);
    }
    builder.push(")");
    let count = builder.build_query_scalar::<i64>().fetch_one(conn).await?;
    Ok(count)
}

pub async fn delete_partner_categories(partner_id: i64, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("DELETE FROM partner_categories WHERE partner_id = ?").bind(partner_id).execute(conn).await?;
    Ok(())
}

pub async fn insert_partner_category(
    partner_id: i64,
    category_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    sqlx::query("INSERT INTO partner_categories (partner_id, category_id) VALUES (?, ?)")
        .bind(partner_id)
        .bind(category_id)
        .execute(conn)
        .await?;
    Ok(())
}
