// ==========================================
// 配送派单系统 - 配送员评分与收入计算
// ==========================================
// rating   = 完成订单数 / (统计天数 × 24) × rating_coef[type]
// earnings = Σ 订单价格 × earnings_coef[type]
// 结果为 0 时不输出（返回 None）
// ==========================================

use crate::domain::assignment::CourierMetaInfo;
use crate::domain::courier::Courier;
use crate::domain::order::Order;

/// 某类型配送员的评分/收入系数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingCoefficients {
    pub rating: f64,
    pub earnings: f64,
}

pub struct CourierRatingEngine {}

impl CourierRatingEngine {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算评分；period_days <= 0 时无评分
    pub fn rating(&self, completed_count: usize, period_days: i64, coefficient: f64) -> Option<f64> {
        if period_days <= 0 || completed_count == 0 {
            return None;
        }
        let rating = completed_count as f64 / (period_days * 24) as f64 * coefficient;
        (rating != 0.0).then_some(rating)
    }

    /// 计算收入
    pub fn earnings(&self, completed: &[Order], coefficient: f64) -> Option<f64> {
        let earnings: f64 = completed.iter().map(|o| o.cost * coefficient).sum();
        (earnings != 0.0).then_some(earnings)
    }

    /// 组装配送员统计信息
    pub fn meta_info(
        &self,
        courier: &Courier,
        completed: &[Order],
        period_days: i64,
        coefficients: RatingCoefficients,
    ) -> CourierMetaInfo {
        CourierMetaInfo {
            courier_id: courier.courier_id,
            courier_type: courier.courier_type,
            regions: courier.regions.clone(),
            working_hours: courier.working_hours.clone(),
            rating: self.rating(completed.len(), period_days, coefficients.rating),
            earnings: self.earnings(completed, coefficients.earnings),
        }
    }
}

impl Default for CourierRatingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CourierType;

    fn completed(order_id: i64, cost: f64) -> Order {
        Order {
            order_id,
            weight: 1.0,
            region: 1,
            delivery_hours: vec!["09:00-10:00".to_string()],
            cost,
            courier_id: Some(1),
            assignment_date: None,
            complete_time: None,
        }
    }

    #[test]
    fn test_rating_formula() {
        let engine = CourierRatingEngine::new();
        // 4 单 / (2 天 × 24) × 3
        assert_eq!(engine.rating(4, 2, 3.0), Some(0.25));
        assert_eq!(engine.rating(0, 2, 3.0), None);
        assert_eq!(engine.rating(4, 0, 3.0), None);
    }

    #[test]
    fn test_earnings_formula() {
        let engine = CourierRatingEngine::new();
        let orders = vec![completed(1, 100.0), completed(2, 80.0)];
        assert_eq!(engine.earnings(&orders, 2.0), Some(360.0));
        assert_eq!(engine.earnings(&[], 2.0), None);
    }

    #[test]
    fn test_meta_info_omits_zero_fields() {
        let engine = CourierRatingEngine::new();
        let courier = Courier {
            courier_id: 7,
            courier_type: CourierType::Bike,
            regions: vec![1, 2],
            working_hours: vec!["09:00-18:00".to_string()],
            orders: vec![],
        };
        let coefficients = RatingCoefficients { rating: 2.0, earnings: 3.0 };

        let meta = engine.meta_info(&courier, &[], 1, coefficients);
        assert_eq!(meta.rating, None);
        assert_eq!(meta.earnings, None);

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("rating").is_none());
        assert!(json.get("earnings").is_none());
        assert_eq!(json["courier_type"], "BIKE");

        let meta = engine.meta_info(&courier, &[completed(1, 50.0)], 1, coefficients);
        assert_eq!(meta.earnings, Some(150.0));
        assert!(meta.rating.is_some());
    }
}
