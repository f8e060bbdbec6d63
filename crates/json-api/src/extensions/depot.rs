//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use shop_app::{
    auth::{CustomerUuid, Principal},
    domain::accounts::records::UserUuid,
};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller.
    fn principal_or_401(&self) -> Result<Principal, StatusError>;

    /// The caller, who must not be an administrator.
    fn customer_or_403(&self) -> Result<CustomerUuid, StatusError>;

    /// The caller, who must be an administrator.
    fn administrator_or_403(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.obtain::<Principal>().copied().map_err(|_ignored| {
            StatusError::unauthorized()
                .brief("Authentication credentials were not provided.")
        })
    }

    fn customer_or_403(&self) -> Result<CustomerUuid, StatusError> {
        self.principal_or_401()?.customer().ok_or_else(|| {
            StatusError::forbidden().brief("Administrators cannot perform this operation.")
        })
    }

    fn administrator_or_403(&self) -> Result<UserUuid, StatusError> {
        match self.principal_or_401()? {
            Principal::Administrator(user) => Ok(user),
            Principal::Customer(_) => Err(StatusError::forbidden()
                .brief("You do not have permission to perform this action.")),
        }
    }
}
