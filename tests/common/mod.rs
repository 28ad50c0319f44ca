//! Helpers for integration tests.
#![allow(dead_code)]

use diesel::RunQueryDsl;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_storefront::SERVICE_ACCESS_ROLE;
use pushkind_storefront::domain::product::{NewProduct, Product};
use pushkind_storefront::domain::promotion::{NewPromotion, Promotion};
use pushkind_storefront::repository::{DieselRepository, ProductWriter, PromotionWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    /// Run a raw statement, e.g. to install a failing trigger.
    pub fn execute(&self, statement: &str) {
        let mut conn = self.pool.get().expect("connection");
        diesel::sql_query(statement)
            .execute(&mut conn)
            .expect("statement failed");
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn admin(hub_id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "admin".into(),
        email: "admin@example.com".into(),
        hub_id,
        name: "Admin".into(),
        roles: vec![SERVICE_ACCESS_ROLE.to_string()],
        exp: 0,
    }
}

pub fn product(repo: &DieselRepository, hub_id: i32, name: &str, price_cents: i64) -> Product {
    repo.create_product(&NewProduct::new(hub_id, name, price_cents, "USD"))
        .expect("create product")
}

pub fn promotion(
    repo: &DieselRepository,
    hub_id: i32,
    description: &str,
    discount_bps: i32,
) -> Promotion {
    repo.create_promotion(&NewPromotion::new(hub_id, description, discount_bps))
        .expect("create promotion")
}
