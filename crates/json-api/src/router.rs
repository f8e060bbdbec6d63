//! App Router

use salvo::Router;

use crate::{auth, cart, orders, products, users};

/// Every API route.
///
/// Browsing the catalog and obtaining tokens need no credentials; everything
/// else runs behind the bearer token middleware. Literal segments are pushed
/// before `{param}` siblings so they win the match.
pub(crate) fn app_router() -> Router {
    Router::new().push(public_routes()).push(
        Router::new()
            .hoop(auth::middleware::handler)
            .push(protected_products())
            .push(cart_routes())
            .push(order_routes())
            .push(protected_users()),
    )
}

fn public_routes() -> Router {
    Router::new()
        .push(
            Router::with_path("products")
                .get(products::categories::handler)
                .push(Router::with_path("all").get(products::all::handler))
                .push(Router::with_path("list").get(products::index::handler))
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("users")
                .push(Router::with_path("register").post(users::register::handler))
                .push(Router::with_path("login").post(users::login::handler))
                .push(Router::with_path("token/refresh").post(users::refresh::handler)),
        )
}

fn protected_products() -> Router {
    Router::with_path("products")
        .push(Router::with_path("categories").post(products::create_category::handler))
        .push(Router::with_path("add").post(products::create::handler))
        .push(
            Router::with_path("{product}")
                .put(products::update::handler)
                .push(Router::with_path("delete").delete(products::delete::handler)),
        )
}

fn cart_routes() -> Router {
    Router::with_path("cart")
        .push(Router::with_path("add").post(cart::add::handler))
        .push(Router::with_path("view").get(cart::view::handler))
        .push(Router::with_path("remove/{line}").delete(cart::remove::handler))
}

fn order_routes() -> Router {
    Router::with_path("orders")
        .get(orders::index::handler)
        .push(Router::with_path("create").post(orders::create::handler))
        .push(
            Router::with_path("{order}")
                .get(orders::get::handler)
                .push(Router::with_path("cancel").delete(orders::cancel::handler))
                .push(Router::with_path("status").put(orders::status::handler)),
        )
}

fn protected_users() -> Router {
    Router::with_path("users")
        .push(Router::with_path("register-admin").post(users::register_admin::handler))
        .push(Router::with_path("profile").get(users::profile::handler))
        .push(Router::with_path("logout").post(users::logout::handler))
        .push(Router::with_path("deposit").post(users::deposit::handler))
        .push(Router::with_path("transactions").get(users::transactions::handler))
        .push(Router::with_path("change-password").put(users::change_password::handler))
        .push(Router::with_path("delete").delete(users::delete::handler))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::{affix_state::inject, prelude::*, test::TestClient};
    use testresult::TestResult;

    use shop_app::domain::catalog::{MockCatalogService, records::ProductUuid};

    use crate::test_helpers::{Mocks, make_product};

    use super::*;

    fn service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_catalog_browsing_needs_no_token() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .once()
            .return_once(|| Ok(vec![make_product(ProductUuid::new(), dec!(10.00), 1)]));

        let mocks = Mocks {
            catalog: Some(catalog),
            ..Mocks::default()
        };

        let res = TestClient::get("http://example.com/products/all")
            .send(&service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_mutations_need_a_token() -> TestResult {
        let res = TestClient::post("http://example.com/products/add")
            .send(&service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_cart_and_orders_need_a_token() -> TestResult {
        for url in ["http://example.com/cart/view", "http://example.com/orders"] {
            let res = TestClient::get(url).send(&service(Mocks::default())).await;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "{url}");
        }

        Ok(())
    }
}
