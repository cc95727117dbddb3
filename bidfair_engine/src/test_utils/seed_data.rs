use crate::{
    db_types::{Customer, Partner},
    traits::AccountManagement,
    SqliteDatabase,
};

/// Inserts a category directly and returns its id. Categories have no public write API; in
/// production they are seeded by migration or by an operator.
pub async fn seed_category(db: &SqliteDatabase, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO service_categories (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(db.pool())
        .await
        .expect("Error seeding category")
}

pub async fn seed_customer(db: &SqliteDatabase, name: &str, phone: &str) -> Customer {
    db.upsert_customer_on_verify(phone, name).await.expect("Error seeding customer")
}

/// Creates a verified partner already assigned to the given categories.
pub async fn seed_partner(db: &SqliteDatabase, name: &str, phone: &str, category_ids: &[i64]) -> Partner {
    let email = format!("{}@test.bidfair.io", phone.trim_start_matches('+'));
    let partner =
        db.create_verified_partner(phone, name, Some(email), None).await.expect("Error seeding partner");
    db.replace_partner_categories(partner.id, category_ids).await.expect("Error assigning categories");
    partner
}
