// ==========================================
// 配送派单系统 - 定价规则
// ==========================================
// 规则: final_cost = floor(base_cost × coefficient)
// 红线: 每个订单只在提交时定价一次，不可逆
// ==========================================

/// 新区域首单系数
pub const NEW_REGION_COEFFICIENT: f64 = 1.0;

/// 已服务区域后续单系数
pub const SERVED_REGION_COEFFICIENT: f64 = 0.8;

/// 计算最终价格
pub fn final_cost(base_cost: f64, coefficient: f64) -> f64 {
    (base_cost * coefficient).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_cost_floors() {
        assert_eq!(final_cost(100.0, NEW_REGION_COEFFICIENT), 100.0);
        assert_eq!(final_cost(100.0, SERVED_REGION_COEFFICIENT), 80.0);
        assert_eq!(final_cost(99.0, SERVED_REGION_COEFFICIENT), 79.0);
        assert_eq!(final_cost(12.9, NEW_REGION_COEFFICIENT), 12.0);
    }
}
