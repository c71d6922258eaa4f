// ==========================================
// 配送派单系统 - 批量导入 API
// ==========================================
// 职责: 一次性导入配送员与订单
// 红线: 先校验全部条目，再单事务写入；任一失败不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::courier::NewCourier;
use crate::domain::order::NewOrder;
use crate::repository::ImportRepository;

/// 导入请求（JSON 文件格式）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub couriers: Vec<NewCourier>,
    #[serde(default)]
    pub orders: Vec<NewOrder>,
}

/// 导入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub courier_ids: Vec<i64>,
    pub order_ids: Vec<i64>,
}

// ==========================================
// ImportApi - 批量导入 API
// ==========================================
pub struct ImportApi {
    import_repo: Arc<ImportRepository>,
}

impl ImportApi {
    pub fn new(import_repo: Arc<ImportRepository>) -> Self {
        Self { import_repo }
    }

    /// 导入配送员与订单
    pub fn import(&self, request: ImportRequest) -> ApiResult<ImportResponse> {
        for (idx, courier) in request.couriers.iter().enumerate() {
            courier
                .validate()
                .map_err(|e| ApiError::InvalidInput(format!("第{}个配送员: {}", idx + 1, e)))?;
        }
        for (idx, order) in request.orders.iter().enumerate() {
            order
                .validate()
                .map_err(|e| ApiError::InvalidInput(format!("第{}个订单: {}", idx + 1, e)))?;
        }

        let (courier_ids, order_ids) = self
            .import_repo
            .import_batch(&request.couriers, &request.orders)?;

        info!(
            couriers = courier_ids.len(),
            orders = order_ids.len(),
            "批量导入完成"
        );
        Ok(ImportResponse {
            courier_ids,
            order_ids,
        })
    }
}
