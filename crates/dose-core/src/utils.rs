//! 通用工具函数

use crate::error::{DoseError, Result};
use crate::models::AgeUnit;

/// 校验患者输入：年龄与体重必须为有限正数
///
/// 所有解析与计算逻辑之前调用，非法输入不进入任何后续步骤。
pub fn validate_patient_input(age_years: f64, weight_kg: f64) -> Result<()> {
    if !age_years.is_finite() || age_years <= 0.0 {
        return Err(DoseError::InvalidInput(format!(
            "年龄必须为正数，收到: {}",
            age_years
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(DoseError::InvalidInput(format!(
            "体重必须为正数（kg），收到: {}",
            weight_kg
        )));
    }
    Ok(())
}

/// 按年龄粗略估算体重（kg）
///
/// 仅用于输入辅助，不参与剂量计算。年龄非正数时无估算值。
pub fn estimate_weight_kg(age: f64, unit: AgeUnit) -> Option<f64> {
    if !age.is_finite() || age <= 0.0 {
        return None;
    }
    let weight = match unit {
        AgeUnit::Years => {
            if age <= 1.0 {
                age * 10.0 + 3.0
            } else if age <= 5.0 {
                age * 2.0 + 8.0
            } else {
                age * 3.0 + 4.0
            }
        }
        AgeUnit::Months => (age / 12.0) * 2.0 + 8.0,
    };
    Some(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_patient_input() {
        assert!(validate_patient_input(5.0, 20.0).is_ok());
        assert!(validate_patient_input(0.0, 20.0).is_err());
        assert!(validate_patient_input(5.0, 0.0).is_err());
        assert!(validate_patient_input(-1.0, 20.0).is_err());
        assert!(validate_patient_input(5.0, -3.0).is_err());
        assert!(validate_patient_input(f64::NAN, 20.0).is_err());
    }

    #[test]
    fn test_estimate_weight_by_years() {
        // 1岁以内：年龄×10+3
        assert_eq!(estimate_weight_kg(0.5, AgeUnit::Years), Some(8.0));
        // 1~5岁：年龄×2+8
        assert_eq!(estimate_weight_kg(3.0, AgeUnit::Years), Some(14.0));
        // 5岁以上：年龄×3+4
        assert_eq!(estimate_weight_kg(10.0, AgeUnit::Years), Some(34.0));
    }

    #[test]
    fn test_estimate_weight_by_months() {
        assert_eq!(estimate_weight_kg(12.0, AgeUnit::Months), Some(10.0));
        assert_eq!(estimate_weight_kg(0.0, AgeUnit::Months), None);
    }

    #[test]
    fn test_age_unit_conversion() {
        assert_eq!(AgeUnit::Months.to_years(6.0), 0.5);
        assert_eq!(AgeUnit::Years.to_years(2.0), 2.0);
    }
}
