// ==========================================
// 配送派单系统 - 配送员 API
// ==========================================
// 职责: 配送员创建、查询、统计信息（评分/收入）
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::DispatchConfigReader;
use crate::domain::assignment::CourierMetaInfo;
use crate::domain::courier::{Courier, NewCourier};
use crate::domain::interval::parse_date;
use crate::engine::courier_rating::{CourierRatingEngine, RatingCoefficients};
use crate::repository::{CourierRepository, OrderRepository};

// ==========================================
// CourierApi - 配送员 API
// ==========================================
pub struct CourierApi<C>
where
    C: DispatchConfigReader,
{
    courier_repo: Arc<CourierRepository>,
    order_repo: Arc<OrderRepository>,
    config: Arc<C>,
    rating_engine: CourierRatingEngine,
}

impl<C> CourierApi<C>
where
    C: DispatchConfigReader,
{
    pub fn new(
        courier_repo: Arc<CourierRepository>,
        order_repo: Arc<OrderRepository>,
        config: Arc<C>,
    ) -> Self {
        Self {
            courier_repo,
            order_repo,
            config,
            rating_engine: CourierRatingEngine::new(),
        }
    }

    /// 批量创建配送员
    ///
    /// 任一条目校验失败则全部不写入
    pub fn create_couriers(&self, couriers: Vec<NewCourier>) -> ApiResult<Vec<i64>> {
        for (idx, courier) in couriers.iter().enumerate() {
            courier
                .validate()
                .map_err(|e| ApiError::InvalidInput(format!("第{}个配送员: {}", idx + 1, e)))?;
        }

        let ids = self.courier_repo.insert_batch(&couriers)?;
        info!(count = ids.len(), "配送员创建完成");
        Ok(ids)
    }

    /// 查询配送员
    pub fn get_courier(&self, courier_id: i64) -> ApiResult<Courier> {
        self.courier_repo
            .find_by_id(courier_id)?
            .ok_or_else(|| ApiError::NotFound(format!("配送员(id={})不存在", courier_id)))
    }

    /// 查询配送员统计信息
    ///
    /// # 参数
    /// - `start_date` / `end_date`: 统计区间 (YYYY-MM-DD)，要求 end > start
    ///
    /// # 说明
    /// 统计 complete_time 落在 [start 00:00, end 00:00] 内的已完成订单
    pub fn get_meta_info(
        &self,
        courier_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<CourierMetaInfo> {
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        if end <= start {
            return Err(ApiError::InvalidInput(format!(
                "统计区间无效: end_date({}) 必须晚于 start_date({})",
                end, start
            )));
        }

        let courier = self.get_courier(courier_id)?;
        let completed = self.order_repo.find_completed_by_courier_in_range(
            courier_id,
            start.and_time(chrono::NaiveTime::MIN),
            end.and_time(chrono::NaiveTime::MIN),
        )?;

        let coefficients = RatingCoefficients {
            rating: self
                .config
                .get_rating_coefficient(courier.courier_type)
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
            earnings: self
                .config
                .get_earnings_coefficient(courier.courier_type)
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        };
        let period_days = (end - start).num_days();

        debug!(
            courier_id,
            completed_count = completed.len(),
            period_days,
            "计算配送员统计信息"
        );
        Ok(self
            .rating_engine
            .meta_info(&courier, &completed, period_days, coefficients))
    }
}
