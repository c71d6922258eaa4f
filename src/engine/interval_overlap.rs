// ==========================================
// 配送派单系统 - 时间区间重叠判定
// ==========================================
// 输入: 配送员工作区间 W + 订单配送区间 D + 所需重叠时长 limit（分钟）
// 输出: 是否存在满足条件的 (w, d) 组合
// 红线: 纯函数，无副作用
// ==========================================

use crate::domain::interval::TimeInterval;

/// 命中的重叠情形（按判定优先级）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapCase {
    /// 配送区间完全落在工作区间内（与 limit 无关）
    Contained,
    /// 配送开始于工作区间内，剩余工作时长满足 limit
    DeliveryStartsInShift,
    /// 工作开始于配送区间内，剩余配送时长满足 limit
    ShiftStartsInDelivery,
    /// 工作结束于配送区间内，结束后剩余配送时长满足 limit
    ShiftEndsInDelivery,
}

/// 判定单个 (工作区间, 配送区间) 组合
///
/// 注意: 情形 2/3 在"工作"与"配送"两个角色之间不对称
pub fn overlap_case(
    working: &TimeInterval,
    delivery: &TimeInterval,
    limit_minutes: i64,
) -> Option<OverlapCase> {
    let (w, d) = (working, delivery);

    if w.start <= d.start && d.end <= w.end {
        return Some(OverlapCase::Contained);
    }
    if w.start <= d.start && d.start <= w.end && (w.end - d.start).num_minutes() >= limit_minutes {
        return Some(OverlapCase::DeliveryStartsInShift);
    }
    if d.start <= w.start && w.start <= d.end && (d.end - w.start).num_minutes() >= limit_minutes {
        return Some(OverlapCase::ShiftStartsInDelivery);
    }
    if d.start <= w.end && w.end <= d.end && (d.end - w.end).num_minutes() >= limit_minutes {
        return Some(OverlapCase::ShiftEndsInDelivery);
    }

    None
}

/// 在 W×D 全组合上判定，命中即返回
pub fn find_overlap(
    working_hours: &[TimeInterval],
    delivery_hours: &[TimeInterval],
    limit_minutes: i64,
) -> Option<OverlapCase> {
    working_hours.iter().find_map(|w| {
        delivery_hours
            .iter()
            .find_map(|d| overlap_case(w, d, limit_minutes))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn iv(raw: &str) -> TimeInterval {
        TimeInterval::parse(raw, NaiveDate::from_ymd_opt(2023, 5, 10).unwrap()).unwrap()
    }

    #[test]
    fn test_containment_ignores_limit() {
        let working = vec![iv("08:00-18:00")];
        let delivery = vec![iv("09:00-10:00")];
        assert_eq!(
            find_overlap(&working, &delivery, 10_000),
            Some(OverlapCase::Contained)
        );
    }

    #[test]
    fn test_delivery_starting_near_shift_end() {
        // 工作 09:00-12:00，配送 11:50-13:00：配送开始后剩余工作 10 分钟
        let working = vec![iv("09:00-12:00")];
        let delivery = vec![iv("11:50-13:00")];
        assert_eq!(
            find_overlap(&working, &delivery, 5),
            Some(OverlapCase::DeliveryStartsInShift)
        );
        assert_eq!(
            find_overlap(&working, &delivery, 10),
            Some(OverlapCase::DeliveryStartsInShift)
        );

        // limit=15 时情形 2 不成立，但情形 4 度量工作结束后的配送尾段（60 分钟）
        assert_eq!(
            find_overlap(&working, &delivery, 15),
            Some(OverlapCase::ShiftEndsInDelivery)
        );
        assert_eq!(find_overlap(&working, &delivery, 61), None);
    }

    #[test]
    fn test_shift_starting_inside_delivery() {
        // 工作 10:00-18:00，配送 09:00-10:30：工作开始后剩余 30 分钟配送时长
        let working = vec![iv("10:00-18:00")];
        let delivery = vec![iv("09:00-10:30")];
        assert_eq!(
            find_overlap(&working, &delivery, 30),
            Some(OverlapCase::ShiftStartsInDelivery)
        );
        assert_eq!(find_overlap(&working, &delivery, 31), None);
    }

    #[test]
    fn test_shift_ending_inside_delivery_measures_tail() {
        // 工作 08:00-09:00，配送 07:00-12:00：工作开始后剩余配送 240 分钟
        let working = vec![iv("08:00-09:00")];
        let delivery = vec![iv("07:00-12:00")];
        assert_eq!(
            find_overlap(&working, &delivery, 200),
            Some(OverlapCase::ShiftStartsInDelivery)
        );

        // 工作 06:00-09:00，配送 07:00-12:00：情形 4 度量的是工作结束后的配送尾段（180 分钟）
        let working = vec![iv("06:00-09:00")];
        assert_eq!(
            find_overlap(&working, &delivery, 180),
            Some(OverlapCase::ShiftEndsInDelivery)
        );
        assert_eq!(find_overlap(&working, &delivery, 181), None);
    }

    #[test]
    fn test_disjoint_intervals() {
        let working = vec![iv("09:00-10:00")];
        let delivery = vec![iv("11:00-12:00")];
        assert_eq!(find_overlap(&working, &delivery, 0), None);
    }

    #[test]
    fn test_cross_product_searched() {
        let working = vec![iv("06:00-07:00"), iv("13:00-20:00")];
        let delivery = vec![iv("08:00-09:00"), iv("14:00-15:00")];
        assert_eq!(
            find_overlap(&working, &delivery, 60),
            Some(OverlapCase::Contained)
        );
    }

    #[test]
    fn test_empty_inputs_never_overlap() {
        let working = vec![iv("09:00-18:00")];
        assert_eq!(find_overlap(&working, &[], 0), None);
        assert_eq!(find_overlap(&[], &working, 0), None);
    }
}
