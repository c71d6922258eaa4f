// ==========================================
// 配送派单系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 单日贪心派单（订单 → 配送员）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    AssignmentResult, CapacityPolicy, CapacityPolicyTable, CompleteInfo, Courier,
    CourierMetaInfo, CourierType, NewCourier, NewOrder, Order, TimeInterval,
};

// 引擎
pub use engine::{AssignmentPass, AssignmentPlanner, CapacityEvaluator, CourierRatingEngine};

// API
pub use api::{ApiError, ApiResult, AssignmentApi, CourierApi, ImportApi, OrderApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "配送派单系统";
