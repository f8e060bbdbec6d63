//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    accounts::records::UserUuid,
    carts::records::{CartRecord, CartUuid},
    catalog::records::ProductUuid,
};

const FIND_CART_SQL: &str = include_str!("../sql/find_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const UPSERT_CART_SQL: &str = include_str!("../sql/upsert_cart.sql");
const RECOMPUTE_TOTAL_SQL: &str = include_str!("../sql/recompute_total.sql");
const RECOMPUTE_TOTALS_SQL: &str = include_str!("../sql/recompute_totals.sql");
const LOCK_CARTS_HOLDING_PRODUCT_SQL: &str =
    include_str!("../sql/lock_carts_holding_product.sql");
const CLEAR_CART_SQL: &str = include_str!("../sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Like [`Self::find_cart`], holding the cart row lock until commit.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(LOCK_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch the user's cart, creating it on first use. The row stays locked
    /// until the transaction ends.
    pub(crate) async fn upsert_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(UPSERT_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn recompute_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Decimal, sqlx::Error> {
        query_scalar::<Postgres, Decimal>(RECOMPUTE_TOTAL_SQL)
            .bind(cart.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn recompute_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        carts: &[CartUuid],
    ) -> Result<(), sqlx::Error> {
        if carts.is_empty() {
            return Ok(());
        }

        let uuids: Vec<Uuid> = carts.iter().map(|cart| cart.into_uuid()).collect();

        query(RECOMPUTE_TOTALS_SQL)
            .bind(uuids)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Lock every cart holding a line for `product`, in uuid order.
    ///
    /// Must run before the product row is written: checkout holds its cart
    /// while it waits on product locks.
    pub(crate) async fn lock_carts_holding_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<CartUuid>, sqlx::Error> {
        let carts = query_scalar::<Postgres, Uuid>(LOCK_CARTS_HOLDING_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        Ok(carts.into_iter().map(CartUuid::from_uuid).collect())
    }

    /// Zero the stored total. Lines are removed separately.
    pub(crate) async fn reset_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), sqlx::Error> {
        query(CLEAR_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            total: row.try_get("total")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
