//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::repositories::{PgCartLinesRepository, PgCartsRepository},
        catalog::{
            data::{NewCategory, NewProduct, ProductDetails},
            errors::CatalogServiceError,
            query::{ProductPage, ProductQuery},
            records::{CategoryRecord, ProductRecord, ProductUuid},
            repository::PgCatalogRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
    carts_repository: PgCartsRepository,
    lines_repository: PgCartLinesRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
            carts_repository: PgCartsRepository::new(),
            lines_repository: PgCartLinesRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CatalogServiceError> {
        category
            .validate()
            .map_err(CatalogServiceError::Validation)?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_category(&mut tx, &category).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn search_products(
        &self,
        query: ProductQuery,
    ) -> Result<ProductPage, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let total = self.repository.count_products(&mut tx, &query).await?;
        let products = self.repository.search_products(&mut tx, &query).await?;

        tx.commit().await?;

        if products.is_empty() && query.page.number() > 1 {
            return Err(CatalogServiceError::PageOutOfRange);
        }

        Ok(ProductPage {
            products,
            total,
            page: query.page,
        })
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self
            .repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(found)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        product
            .details
            .validate()
            .map_err(CatalogServiceError::Validation)?;

        let mut tx = self.db.begin().await?;

        self.repository
            .create_product(&mut tx, product.uuid, &product.details)
            .await?;

        let created = self
            .repository
            .find_product(&mut tx, product.uuid)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, CatalogServiceError> {
        details.validate().map_err(CatalogServiceError::Validation)?;

        let mut tx = self.db.begin().await?;

        // Carts before the product, matching checkout's lock order.
        let carts = self
            .carts_repository
            .lock_carts_holding_product(&mut tx, product)
            .await?;

        if self
            .repository
            .update_product(&mut tx, product, &details)
            .await?
            == 0
        {
            return Err(CatalogServiceError::NotFound);
        }

        // Cart totals are derived from current prices.
        self.carts_repository.recompute_totals(&mut tx, &carts).await?;

        let updated = self
            .repository
            .find_product(&mut tx, product)
            .await?
            .ok_or(CatalogServiceError::NotFound)?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let carts = self
            .carts_repository
            .lock_carts_holding_product(&mut tx, product)
            .await?;

        self.lines_repository
            .remove_product_lines(&mut tx, product)
            .await?;

        let rows_affected = self
            .repository
            .delete_product(&mut tx, product)
            .await
            .map_err(|error| match CatalogServiceError::from(error) {
                CatalogServiceError::InvalidReference => CatalogServiceError::InUse,
                other => other,
            })?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        self.carts_repository.recompute_totals(&mut tx, &carts).await?;

        tx.commit().await?;

        info!(product_uuid = %product, carts_touched = carts.len(), "deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogServiceError>;

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, CatalogServiceError>;

    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, CatalogServiceError>;

    /// Filtered, ordered and paginated products.
    async fn search_products(&self, query: ProductQuery)
    -> Result<ProductPage, CatalogServiceError>;

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError>;

    async fn create_product(&self, product: NewProduct)
    -> Result<ProductRecord, CatalogServiceError>;

    /// Replace a product's details.
    async fn update_product(
        &self,
        product: ProductUuid,
        details: ProductDetails,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Delete a product. Fails with [`CatalogServiceError::InUse`] while any
    /// order line references it.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        domain::catalog::{
            query::{Page, ProductOrdering, SortKey},
            records::CategoryUuid,
        },
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn create_product_returns_category_name() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("Kitchen").await;

        let product = ctx.create_product(category, "Teapot", dec!(10.00), 5).await;

        assert_eq!(product.category_name, "Kitchen");
        assert_eq!(product.price, dec!(10.00));
        assert_eq!(product.stock, 5);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_category_name_returns_already_exists() {
        let ctx = TestContext::new().await;
        ctx.create_category("Kitchen").await;

        let result = ctx
            .catalog
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: "Kitchen".to_string(),
                description: String::new(),
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_product_with_unknown_category_is_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                details: ProductDetails {
                    name: "Teapot".to_string(),
                    description: String::new(),
                    price: dec!(10.00),
                    stock: 1,
                    category_uuid: CategoryUuid::new(),
                },
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }

    #[tokio::test]
    async fn search_filters_orders_and_paginates() -> TestResult {
        let ctx = TestContext::new().await;
        let kitchen = ctx.create_category("Kitchen").await;
        let garden = ctx.create_category("Garden").await;

        ctx.create_product(kitchen, "Teapot", dec!(10.00), 5).await;
        ctx.create_product(kitchen, "Tea cup", dec!(4.00), 5).await;
        ctx.create_product(kitchen, "Kettle", dec!(25.00), 5).await;
        ctx.create_product(garden, "Tea rose", dec!(7.50), 5).await;

        let page = ctx
            .catalog
            .search_products(ProductQuery {
                search: Some("TEA".to_string()),
                category: Some(kitchen),
                ordering: ProductOrdering {
                    key: SortKey::Price,
                    descending: true,
                },
                page: Page::new(Some(1), Some(1))?,
                ..ProductQuery::default()
            })
            .await?;

        assert_eq!(page.total, 2);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Teapot");
        assert!(page.has_next());

        let exact = ctx
            .catalog
            .search_products(ProductQuery {
                price: Some(dec!(7.50)),
                ..ProductQuery::default()
            })
            .await?;

        assert_eq!(exact.total, 1);
        assert_eq!(exact.products[0].name, "Tea rose");

        Ok(())
    }

    #[tokio::test]
    async fn search_past_last_page_is_out_of_range() -> TestResult {
        let ctx = TestContext::new().await;
        let kitchen = ctx.create_category("Kitchen").await;
        ctx.create_product(kitchen, "Teapot", dec!(10.00), 5).await;

        let result = ctx
            .catalog
            .search_products(ProductQuery {
                page: Page::new(Some(2), None)?,
                ..ProductQuery::default()
            })
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::PageOutOfRange)),
            "expected PageOutOfRange, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_product_replaces_details() -> TestResult {
        let ctx = TestContext::new().await;
        let kitchen = ctx.create_category("Kitchen").await;
        let product = ctx.create_product(kitchen, "Teapot", dec!(10.00), 5).await;

        let updated = ctx
            .catalog
            .update_product(
                product.uuid,
                ProductDetails {
                    name: "Big teapot".to_string(),
                    description: "Holds a lot".to_string(),
                    price: dec!(12.50),
                    stock: 9,
                    category_uuid: kitchen,
                },
            )
            .await?;

        assert_eq!(updated.name, "Big teapot");
        assert_eq!(updated.price, dec!(12.50));
        assert_eq!(updated.stock, 9);

        Ok(())
    }

    #[tokio::test]
    async fn delete_unknown_product_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.catalog.delete_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
