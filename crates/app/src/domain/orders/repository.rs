//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    accounts::records::UserUuid,
    catalog::records::ProductUuid,
    orders::{
        checkout::PlannedLine,
        data::ShippingDetails,
        records::{OrderLineRecord, OrderLineUuid, OrderRecord, OrderUuid},
        status::OrderStatus,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("sql/create_order_line.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const FIND_ORDER_SQL: &str = include_str!("sql/find_order.sql");
const LOCK_CUSTOMER_ORDER_SQL: &str = include_str!("sql/lock_customer_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("sql/set_order_status.sql");
const SET_ORDER_TOTAL_SQL: &str = include_str!("sql/set_order_total.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        shipping: &ShippingDetails,
        total_amount: Decimal,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(OrderUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(&shipping.full_name)
            .bind(&shipping.address)
            .bind(&shipping.phone)
            .bind(&shipping.email)
            .bind(total_amount)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        line: &PlannedLine,
    ) -> Result<OrderLineUuid, sqlx::Error> {
        let uuid = OrderLineUuid::new();

        let quantity = i32::try_from(line.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query(CREATE_ORDER_LINE_SQL)
            .bind(uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(line.product_uuid.into_uuid())
            .bind(quantity)
            .bind(line.price)
            .execute(&mut **tx)
            .await?;

        Ok(uuid)
    }

    /// Visible orders for `user`, newest first, without lines.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(FIND_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock an order owned by `user`.
    pub(crate) async fn lock_customer_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_CUSTOMER_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lines for every order in `orders`, grouped by order.
    pub(crate) async fn get_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<FxHashMap<OrderUuid, Vec<OrderLineRecord>>, sqlx::Error> {
        let mut grouped: FxHashMap<OrderUuid, Vec<OrderLineRecord>> = FxHashMap::default();

        if orders.is_empty() {
            return Ok(grouped);
        }

        let uuids: Vec<Uuid> = orders.iter().map(|order| order.into_uuid()).collect();

        let rows = query(GET_ORDER_LINES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        for row in rows {
            let order = OrderUuid::from_uuid(row.try_get("order_uuid")?);

            grouped
                .entry(order)
                .or_default()
                .push(OrderLineRecord::from_row(&row)?);
        }

        Ok(grouped)
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<Timestamp, sqlx::Error> {
        let updated_at = query_scalar::<Postgres, SqlxTimestamp>(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(updated_at.to_jiff())
    }

    pub(crate) async fn set_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        total_amount: Decimal,
    ) -> Result<Timestamp, sqlx::Error> {
        let updated_at = query_scalar::<Postgres, SqlxTimestamp>(SET_ORDER_TOTAL_SQL)
            .bind(order.into_uuid())
            .bind(total_amount)
            .fetch_one(&mut **tx)
            .await?;

        Ok(updated_at.to_jiff())
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            shipping: ShippingDetails {
                full_name: row.try_get("full_name")?,
                address: row.try_get("address")?,
                phone: row.try_get("phone")?,
                email: row.try_get("email")?,
            },
            status,
            total_amount: row.try_get("total_amount")?,
            lines: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i32: i32 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i32).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: OrderLineUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity,
            price: row.try_get("price")?,
        })
    }
}
