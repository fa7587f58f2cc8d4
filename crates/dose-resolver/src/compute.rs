//! 剂量计算与封顶
//!
//! 按体重换算每公斤剂量并封顶到最大剂量上限。全部为浮点运算，
//! 负数或零体重在上游即被拒绝，不会到达这里。

use dose_core::DoseRange;

use crate::parser::DoseShape;

/// 计算结果：数值区间或不可计算回退
#[derive(Debug, Clone, PartialEq)]
pub enum Computation {
    Numeric(DoseRange),
    NotComputable,
}

/// 四舍五入到固定小数位（展示精度）
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// 按体重换算剂量并封顶
///
/// 区间两端分别乘体重；存在上限时两端各自与上限取较小值；
/// 最后按配置的小数位数取整。
pub fn compute_dose(
    shape: DoseShape,
    weight_kg: f64,
    ceiling: Option<f64>,
    unit: &str,
    decimals: u32,
) -> Computation {
    let (per_kg_min, per_kg_max) = match shape {
        DoseShape::Range { min, max } => (min, max),
        DoseShape::Single { value } => (value, value),
        DoseShape::NotComputable => return Computation::NotComputable,
    };

    let mut min = per_kg_min * weight_kg;
    let mut max = per_kg_max * weight_kg;
    if let Some(cap) = ceiling {
        min = min.min(cap);
        max = max.min(cap);
    }

    Computation::Numeric(DoseRange {
        min: round_to(min, decimals),
        max: round_to(max, decimals),
        unit: unit.to_string(),
    })
}
