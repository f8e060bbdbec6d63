//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        accounts::records::UserUuid,
        carts::{
            data::NewCartLine,
            errors::CartsServiceError,
            records::{CartLineRecord, CartLineUuid, CartRecord},
            repositories::{PgCartLinesRepository, PgCartsRepository},
            rules::{quantity_after_add, total_after_add},
        },
        catalog::repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn view_cart(&self, user: UserUuid) -> Result<Option<CartRecord>, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(mut cart) = self.carts_repository.find_cart(&mut tx, user).await? else {
            return Ok(None);
        };

        let lines = self.lines_repository.get_lines(&mut tx, cart.uuid).await?;

        tx.commit().await?;

        cart.lines.extend(lines);

        Ok(Some(cart))
    }

    async fn add_item(
        &self,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .catalog_repository
            .find_product(&mut tx, line.product_uuid)
            .await?
            .ok_or(CartsServiceError::ProductNotFound)?;

        // Locks the cart row, serialising concurrent adds for the same user.
        let cart = self.carts_repository.upsert_cart(&mut tx, user).await?;

        let in_cart = self
            .lines_repository
            .quantity_in_cart(&mut tx, cart.uuid, product.uuid)
            .await?;

        let quantity = quantity_after_add(&product.name, product.stock, in_cart, line.quantity)?;

        total_after_add(cart.total, product.price, quantity - in_cart)?;

        let created = self
            .lines_repository
            .upsert_line(&mut tx, cart.uuid, product.uuid, quantity)
            .await?;

        let total = self
            .carts_repository
            .recompute_total(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        debug!(cart_uuid = %cart.uuid, product_uuid = %product.uuid, quantity, %total, "added cart item");

        Ok(created)
    }

    async fn remove_item(&self, user: UserUuid, line: CartLineUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let rows_affected = self
            .lines_repository
            .delete_line(&mut tx, cart.uuid, line)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.carts_repository
            .recompute_total(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's cart with its lines, or `None` before anything was added.
    async fn view_cart(&self, user: UserUuid) -> Result<Option<CartRecord>, CartsServiceError>;

    /// Add units of a product, merging with an existing line for it.
    async fn add_item(
        &self,
        user: UserUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Remove one line from the caller's cart.
    async fn remove_item(&self, user: UserUuid, line: CartLineUuid) -> Result<(), CartsServiceError>;
}
