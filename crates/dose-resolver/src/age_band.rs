//! 年龄分组选择
//!
//! 按固定的临床惯例边界把年龄映射到四个发育阶段。
//! 边界为含上界语义：恰好落在边界上的年龄归入较小的分组。

use dose_core::AgeGroup;
use serde::{Deserialize, Serialize};

/// 年龄分组边界（单位：岁）
///
/// 属部署级配置常量，随服务启动确定，绝不随单次请求变化。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgeBandThresholds {
    /// 新生儿上界（约1个月）
    pub neonatal_max_years: f64,
    /// 婴儿上界
    pub infant_max_years: f64,
    /// 儿童上界，超过即为青少年
    pub child_max_years: f64,
}

impl Default for AgeBandThresholds {
    fn default() -> Self {
        Self {
            neonatal_max_years: 0.083,
            infant_max_years: 1.0,
            child_max_years: 12.0,
        }
    }
}

impl AgeBandThresholds {
    /// 边界必须严格递增
    pub fn is_valid(&self) -> bool {
        self.neonatal_max_years > 0.0
            && self.neonatal_max_years < self.infant_max_years
            && self.infant_max_years < self.child_max_years
    }
}

/// 选择年龄分组
///
/// 调用前提：年龄已通过输入校验（> 0），此处只做数值比较。
pub fn select_band(age_years: f64, thresholds: &AgeBandThresholds) -> AgeGroup {
    if age_years <= thresholds.neonatal_max_years {
        AgeGroup::Neonatal
    } else if age_years <= thresholds.infant_max_years {
        AgeGroup::Infant
    } else if age_years <= thresholds.child_max_years {
        AgeGroup::Child
    } else {
        AgeGroup::Adolescent
    }
}
