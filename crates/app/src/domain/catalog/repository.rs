//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow, query, query_as,
};
use uuid::Uuid;

use crate::domain::catalog::{
    data::{NewCategory, ProductDetails},
    query::{ProductQuery, escape_like},
    records::{CategoryRecord, CategoryUuid, ProductRecord, ProductUuid},
};

const LIST_CATEGORIES_SQL: &str = include_str!("sql/list_categories.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const LOCK_PRODUCTS_SQL: &str = include_str!("sql/lock_products.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const ADJUST_STOCK_SQL: &str = include_str!("sql/adjust_stock.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

const SEARCH_PRODUCTS_SELECT: &str = "SELECT p.uuid, p.name, p.description, p.price, p.stock, \
     p.category_uuid, c.name AS category_name, p.created_at, p.updated_at \
     FROM products p JOIN categories c ON c.uuid = p.category_uuid";

const COUNT_PRODUCTS_SELECT: &str = "SELECT COUNT(*) FROM products p";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_categories(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategoryRecord>, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(LIST_CATEGORIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &NewCategory,
    ) -> Result<CategoryRecord, sqlx::Error> {
        query_as::<Postgres, CategoryRecord>(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(category.name.trim())
            .bind(&category.description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductQuery,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(COUNT_PRODUCTS_SELECT);

        push_filters(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&mut **tx).await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn search_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &ProductQuery,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(SEARCH_PRODUCTS_SELECT);

        push_filters(&mut builder, filter);

        builder
            .push(" ORDER BY ")
            .push(filter.ordering.as_sql())
            .push(", p.uuid ASC LIMIT ")
            .push_bind(filter.page.limit())
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        builder
            .build_query_as::<ProductRecord>()
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock the given products for update, in UUID order so concurrent
    /// lockers cannot deadlock. Unknown UUIDs are skipped.
    pub(crate) async fn lock_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|p| p.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(LOCK_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        details: &ProductDetails,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(details.name.trim())
            .bind(&details.description)
            .bind(details.price)
            .bind(stock_to_i32(details.stock)?)
            .bind(details.category_uuid.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        details: &ProductDetails,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(details.name.trim())
            .bind(&details.description)
            .bind(details.price)
            .bind(stock_to_i32(details.stock)?)
            .bind(details.category_uuid.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Add `delta` (possibly negative) to a product's stock. The schema's
    /// `stock >= 0` check rejects any underflow.
    pub(crate) async fn adjust_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        delta: i64,
    ) -> Result<(), sqlx::Error> {
        let delta = i32::try_from(delta).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query(ADJUST_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(delta)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductQuery) {
    builder.push(" WHERE TRUE");

    if let Some(category) = filter.category {
        builder
            .push(" AND p.category_uuid = ")
            .push_bind(category.into_uuid());
    }

    if let Some(price) = filter.price {
        builder.push(" AND p.price = ").push_bind(price);
    }

    if let Some(term) = filter.search_term() {
        let pattern = format!("%{}%", escape_like(term));

        builder
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn stock_to_i32(stock: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(stock).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

impl<'r> FromRow<'r, PgRow> for CategoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stock_i32: i32 = row.try_get("stock")?;

        let stock = u32::try_from(stock_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "stock".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock,
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            category_name: row.try_get("category_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
