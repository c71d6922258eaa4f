// ==========================================
// 配送派单系统 - API 层
// ==========================================
// 职责: 组合仓储与引擎，对外提供业务操作
// ==========================================

pub mod assignment_api;
pub mod courier_api;
pub mod error;
pub mod import_api;
pub mod order_api;

pub use assignment_api::AssignmentApi;
pub use courier_api::CourierApi;
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportRequest, ImportResponse};
pub use order_api::OrderApi;
