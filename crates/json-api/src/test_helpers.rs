//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use shop_app::{
    auth::{CustomerUuid, MockAuthService, Principal},
    context::AppContext,
    domain::{
        accounts::{MockAccountsService, records::UserUuid},
        carts::MockCartsService,
        catalog::{
            MockCatalogService,
            records::{CategoryUuid, ProductRecord, ProductUuid},
        },
        orders::MockOrdersService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_CUSTOMER: CustomerUuid = CustomerUuid::from_user(TEST_USER_UUID);

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::Customer(TEST_CUSTOMER));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_administrator(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal::Administrator(TEST_USER_UUID));
    ctrl.call_next(req, depot, res).await;
}

/// Every service mock fails the test if it is called.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) auth: Option<MockAuthService>,
    pub(crate) accounts: Option<MockAccountsService>,
    pub(crate) catalog: Option<MockCatalogService>,
    pub(crate) carts: Option<MockCartsService>,
    pub(crate) orders: Option<MockOrdersService>,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            auth: Arc::new(self.auth.unwrap_or_else(strict_auth_mock)),
            accounts: Arc::new(self.accounts.unwrap_or_else(strict_accounts_mock)),
            catalog: Arc::new(self.catalog.unwrap_or_else(strict_catalog_mock)),
            carts: Arc::new(self.carts.unwrap_or_else(strict_carts_mock)),
            orders: Arc::new(self.orders.unwrap_or_else(strict_orders_mock)),
        })
    }
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();
    auth.expect_login().never();
    auth.expect_refresh().never();
    auth.expect_logout().never();
    auth.expect_change_password().never();
    auth.expect_delete_account().never();

    auth
}

fn strict_accounts_mock() -> MockAccountsService {
    let mut accounts = MockAccountsService::new();

    accounts.expect_create_account().never();
    accounts.expect_get_profile().never();
    accounts.expect_deposit().never();
    accounts.expect_list_transactions().never();

    accounts
}

fn strict_catalog_mock() -> MockCatalogService {
    let mut catalog = MockCatalogService::new();

    catalog.expect_list_categories().never();
    catalog.expect_create_category().never();
    catalog.expect_list_products().never();
    catalog.expect_search_products().never();
    catalog.expect_get_product().never();
    catalog.expect_create_product().never();
    catalog.expect_update_product().never();
    catalog.expect_delete_product().never();

    catalog
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_view_cart().never();
    carts.expect_add_item().never();
    carts.expect_remove_item().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_create_order().never();
    orders.expect_cancel_order().never();
    orders.expect_update_status().never();

    orders
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    Mocks {
        auth: Some(auth),
        ..Mocks::default()
    }
    .into_state()
}

/// Router with the given mocks and no principal.
pub(crate) fn anonymous_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

/// Router with the given mocks, called by [`TEST_CUSTOMER`].
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Router with the given mocks, called by an administrator.
pub(crate) fn administrator_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(inject_administrator)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid, price: Decimal, stock: u32) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Teapot".to_string(),
        description: "Holds tea".to_string(),
        price,
        stock,
        category_uuid: CategoryUuid::from_uuid(Uuid::nil()),
        category_name: "Kitchen".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
