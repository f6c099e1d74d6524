// lib.rs - 数据表格引擎与远程数据同步层，供 CLI 使用

pub mod core;
pub mod data;
pub mod models;
pub mod services;
pub mod shell;
pub mod table;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use models::*;

pub use core::{build_http_client, init_logger, AppError, AppResult, LogGuard};
pub use data::{QueryCache, QueryDescriptor, QueryKey, QueryObserver, QueryState, QueryStatus};
pub use services::{
    MutationDescriptor, MutationError, MutationRunner, MutationStatus, RequestClient,
    RequestError, RosterApi,
};
pub use shell::{SubmitOutcome, TableShell};
pub use table::{compute_view, ColumnDef, TableState, TableView};
