//! Test context for service-level integration tests.

use jiff::SignedDuration;
use rust_decimal::Decimal;

use crate::{
    auth::{JwtSecret, PasswordHasher, PgAuthService, TokenIssuer},
    database::Db,
    domain::{
        accounts::{
            AccountsService, PgAccountsService,
            data::{AccountRole, NewAccount},
            records::UserUuid,
        },
        carts::PgCartsService,
        catalog::{
            CatalogService, PgCatalogService,
            data::{NewCategory, NewProduct, ProductDetails},
            records::{CategoryUuid, ProductRecord, ProductUuid},
        },
        orders::PgOrdersService,
    },
};

use super::db::TestDb;

/// Lowest cost bcrypt accepts; keeps account fixtures fast.
const TEST_BCRYPT_COST: u32 = 4;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub auth: PgAuthService,
    pub accounts: PgAccountsService,
    pub catalog: PgCatalogService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());
        let passwords = PasswordHasher::new(TEST_BCRYPT_COST);

        let tokens = TokenIssuer::new(
            JwtSecret::new("test-signing-secret"),
            SignedDuration::from_mins(5),
            SignedDuration::from_hours(24),
        );

        Self {
            auth: PgAuthService::new(test_db.pool().clone(), tokens, passwords),
            accounts: PgAccountsService::new(db.clone(), passwords),
            catalog: PgCatalogService::new(db.clone()),
            carts: PgCartsService::new(db.clone()),
            orders: PgOrdersService::new(db),
            db: test_db,
        }
    }

    /// Register a customer with a zero balance.
    pub async fn create_customer(&self, username: &str, password: &str) -> UserUuid {
        self.accounts
            .create_account(
                NewAccount {
                    uuid: UserUuid::new(),
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                    password: password.to_string(),
                },
                AccountRole::Customer,
            )
            .await
            .expect("Failed to create test customer")
            .uuid
    }

    pub async fn create_category(&self, name: &str) -> CategoryUuid {
        self.catalog
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: name.to_string(),
                description: String::new(),
            })
            .await
            .expect("Failed to create test category")
            .uuid
    }

    pub async fn create_product(
        &self,
        category: CategoryUuid,
        name: &str,
        price: Decimal,
        stock: u32,
    ) -> ProductRecord {
        self.catalog
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                details: ProductDetails {
                    name: name.to_string(),
                    description: format!("A {name} for testing"),
                    price,
                    stock,
                    category_uuid: category,
                },
            })
            .await
            .expect("Failed to create test product")
    }
}
