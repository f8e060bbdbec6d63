//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    auth::CustomerUuid,
    database::Db,
    domain::{
        accounts::{ledger::LedgerError, records::UserUuid, repository::PgAccountsRepository},
        carts::repositories::{PgCartLinesRepository, PgCartsRepository},
        catalog::{records::ProductUuid, repository::PgCatalogRepository},
        orders::{
            cancellation::{reconciled_total, refund_description},
            checkout::{CheckoutError, ensure_affordable, ensure_not_empty, plan_checkout},
            data::ShippingDetails,
            errors::OrdersServiceError,
            records::{CancelledOrder, OrderRecord, OrderUuid},
            repository::PgOrdersRepository,
            status::{OrderStatus, StatusTransitionError},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    accounts_repository: PgAccountsRepository,
    carts_repository: PgCartsRepository,
    cart_lines_repository: PgCartLinesRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            accounts_repository: PgAccountsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_lines_repository: PgCartLinesRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }

    /// Attach lines to `orders` and repair zero totals left by older checkouts.
    async fn hydrate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [OrderRecord],
    ) -> Result<(), OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut lines = self.repository.get_lines(tx, &uuids).await?;

        for order in orders.iter_mut() {
            order.lines = lines.remove(&order.uuid).unwrap_or_default();
            self.reconcile_total(tx, order).await?;
        }

        Ok(())
    }

    async fn reconcile_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &mut OrderRecord,
    ) -> Result<(), OrdersServiceError> {
        if let Some(total) = reconciled_total(order) {
            order.updated_at = self.repository.set_total(tx, order.uuid, total).await?;
            order.total_amount = total;

            info!(order_uuid = %order.uuid, %total, "reconciled zero order total");
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.repository.list_orders(&mut tx, user).await?;

        self.hydrate(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .find_order(&mut tx, user, order)
            .await?
            .filter(|order| order.status != OrderStatus::Cancelled)
            .ok_or(OrdersServiceError::NotFound)?;

        let mut orders = [order];

        self.hydrate(&mut tx, &mut orders).await?;

        tx.commit().await?;

        let [order] = orders;

        Ok(order)
    }

    async fn create_order(
        &self,
        customer: CustomerUuid,
        shipping: ShippingDetails,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let user = customer.user();

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, user)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;

        let cart_lines = self.cart_lines_repository.get_lines(&mut tx, cart.uuid).await?;

        ensure_not_empty(&cart_lines)?;

        let mut balance = self.accounts_repository.lock_balance(&mut tx, customer).await?;

        ensure_affordable(&balance, cart.total)?;

        shipping.validate().map_err(OrdersServiceError::InvalidShipping)?;

        let mut product_uuids: Vec<ProductUuid> =
            cart_lines.iter().map(|line| line.product_uuid).collect();

        product_uuids.sort_unstable();

        let products = self
            .catalog_repository
            .lock_products(&mut tx, &product_uuids)
            .await?;

        let plan = plan_checkout(&cart_lines, &products)?;

        let mut order = self
            .repository
            .create_order(&mut tx, user, &shipping, plan.total)
            .await?;

        for line in &plan.lines {
            self.repository.create_line(&mut tx, order.uuid, line).await?;

            self.catalog_repository
                .adjust_stock(&mut tx, line.product_uuid, -i64::from(line.quantity))
                .await?;
        }

        if plan.total > Decimal::ZERO {
            let available = balance.available();

            let entry = balance.withdraw(plan.total).map_err(|error| match error {
                LedgerError::InsufficientFunds { balance, required } => {
                    CheckoutError::InsufficientFunds { balance, required }
                }
                LedgerError::NoBalance
                | LedgerError::NonPositiveAmount
                | LedgerError::AmountTooLarge { .. } => {
                    CheckoutError::InsufficientFunds {
                        balance: available,
                        required: plan.total,
                    }
                }
            })?;

            self.accounts_repository
                .record(&mut tx, &balance, entry)
                .await?;
        }

        self.cart_lines_repository
            .delete_lines(&mut tx, cart.uuid)
            .await?;

        self.carts_repository.reset_total(&mut tx, cart.uuid).await?;

        order.lines = self
            .repository
            .get_lines(&mut tx, &[order.uuid])
            .await?
            .remove(&order.uuid)
            .unwrap_or_default();

        tx.commit().await?;

        info!(
            order_uuid = %order.uuid,
            user_uuid = %user,
            total = %order.total_amount,
            lines = order.lines.len(),
            "placed order"
        );

        Ok(order)
    }

    async fn cancel_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<CancelledOrder, OrdersServiceError> {
        let user = customer.user();

        let mut tx = self.db.begin().await?;

        let mut order = self
            .repository
            .lock_customer_order(&mut tx, user, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        order.status.ensure_cancellable()?;

        order.lines = self
            .repository
            .get_lines(&mut tx, &[order.uuid])
            .await?
            .remove(&order.uuid)
            .unwrap_or_default();

        self.reconcile_total(&mut tx, &mut order).await?;

        let mut balance = self.accounts_repository.lock_balance(&mut tx, customer).await?;

        let mut product_uuids: Vec<ProductUuid> =
            order.lines.iter().map(|line| line.product_uuid).collect();

        product_uuids.sort_unstable();
        product_uuids.dedup();

        self.catalog_repository
            .lock_products(&mut tx, &product_uuids)
            .await?;

        for line in &order.lines {
            self.catalog_repository
                .adjust_stock(&mut tx, line.product_uuid, i64::from(line.quantity))
                .await?;
        }

        let refunded = order.total_amount;

        if refunded > Decimal::ZERO {
            let entry = balance
                .refund(refunded, refund_description(order.uuid))
                .map_err(OrdersServiceError::RefundFailed)?;

            self.accounts_repository
                .record(&mut tx, &balance, entry)
                .await?;
        }

        self.repository
            .set_status(&mut tx, order.uuid, OrderStatus::Cancelled)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order.uuid, user_uuid = %user, %refunded, "cancelled order");

        Ok(CancelledOrder {
            uuid: order.uuid,
            refunded,
        })
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self
            .repository
            .lock_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        // Cancelling goes through `cancel_order` so stock and balance are restored.
        if status == OrderStatus::Cancelled {
            return Err(StatusTransitionError::Invalid {
                from: order.status,
                to: status,
            }
            .into());
        }

        let previous = order.status;

        order.status = previous.transition(status)?;
        order.updated_at = self
            .repository
            .set_status(&mut tx, order.uuid, order.status)
            .await?;

        let mut orders = [order];

        self.hydrate(&mut tx, &mut orders).await?;

        tx.commit().await?;

        let [order] = orders;

        info!(order_uuid = %order.uuid, from = %previous, to = %order.status, "updated order status");

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Orders placed by `user`, newest first. Cancelled orders are omitted.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// A single order owned by `user`. Cancelled orders are not found.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Check out the customer's cart.
    ///
    /// Stock, balance, ledger, order and cart changes commit together or not
    /// at all.
    async fn create_order(
        &self,
        customer: CustomerUuid,
        shipping: ShippingDetails,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel an order, restocking its lines and refunding its total.
    async fn cancel_order(
        &self,
        customer: CustomerUuid,
        order: OrderUuid,
    ) -> Result<CancelledOrder, OrdersServiceError>;

    /// Move an order forward through fulfilment.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
