//! Bearer token middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use shop_app::auth::AuthServiceError;

use crate::{extensions::*, state::State};

/// Resolve the bearer token to a principal and store it in the depot.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(
            StatusError::unauthorized().brief("Authentication credentials were not provided."),
        );
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();

            return;
        }
    };

    let principal = match state.app.auth.authenticate_bearer(token).await {
        Ok(principal) => principal,
        Err(
            error @ (AuthServiceError::InvalidToken(_)
            | AuthServiceError::Revoked
            | AuthServiceError::UnknownUser),
        ) => {
            debug!("rejected bearer token: {error}");

            res.render(StatusError::unauthorized().brief("Token is invalid or expired"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            res.render(operation_failed("failed to look up bearer token", &source));
            ctrl.skip_rest();

            return;
        }
        Err(error) => {
            error!("failed to authenticate bearer token: {error}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_principal(principal);

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
