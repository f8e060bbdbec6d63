//! Extension traits

mod depot;
mod money;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use money::{format_money, parse_money};
pub(crate) use result::{ResultExt as _, operation_failed, validation_error};
