//! 剂量表达式解析器
//!
//! 把自由文本的剂量描述在边界处一次性解析为数值形态，
//! 下游算术不再接触文本。解析是纯语法层面的模式匹配，
//! 只识别 "digits[.digits]" 数值token和首个 "数值-数值" 区间。

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 剂量表达式的数值形态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DoseShape {
    /// 数值区间，如 "10-20 mg/kg/day"
    Range { min: f64, max: f64 },
    /// 单一数值，如 "15 mg/kg/dose"
    Single { value: f64 },
    /// 无数值内容，如 "Not recommended"，需走定性回退
    NotComputable,
}

/// 剂量文本解析器
///
/// 正则在构造时编译一次，进程内复用。
#[derive(Debug)]
pub struct DoseParser {
    number_re: Regex,
    range_re: Regex,
    unit_re: Regex,
}

impl DoseParser {
    pub fn new() -> Self {
        Self {
            // 数值token：十进制，可带小数，不支持指数
            number_re: Regex::new(r"\d+(?:\.\d+)?").unwrap(),
            range_re: Regex::new(r"(\d+(?:\.\d+)?)\s*-\s*(\d+(?:\.\d+)?)").unwrap(),
            unit_re: Regex::new(r"[A-Za-z/]+").unwrap(),
        }
    }

    /// 解析剂量表达式
    ///
    /// 优先识别文本中首个 "数值-数值" 区间，按文本顺序首个为min、
    /// 次个为max，不对倒序文本做纠正；无区间时取首个数值token；
    /// 完全无数值则视为不可计算。
    pub fn parse_dose_expression(&self, text: &str) -> DoseShape {
        if let Some(caps) = self.range_re.captures(text) {
            if let (Ok(min), Ok(max)) = (caps[1].parse(), caps[2].parse()) {
                return DoseShape::Range { min, max };
            }
        }
        if let Some(m) = self.number_re.find(text) {
            if let Ok(value) = m.as_str().parse() {
                return DoseShape::Single { value };
            }
        }
        DoseShape::NotComputable
    }

    /// 提取最大剂量上限
    ///
    /// 取文本中的首个数值token；无数值（如 "N/A"）则不做封顶。
    pub fn parse_max_dose(&self, text: &str) -> Option<f64> {
        self.number_re
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// 提取展示单位
    ///
    /// 取首个由字母和斜杠构成的连续片段（完整保留 per-kg/per-day
    /// 限定，如 "mg/kg/day"），无字母片段时默认 "mg"。仅用于展示。
    pub fn extract_unit(&self, text: &str) -> String {
        self.unit_re
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "mg".to_string())
    }
}

impl Default for DoseParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> DoseParser {
        DoseParser::new()
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parser().parse_dose_expression("10-20 mg/kg/day"),
            DoseShape::Range {
                min: 10.0,
                max: 20.0
            }
        );
    }

    #[test]
    fn test_parse_fractional_range() {
        assert_eq!(
            parser().parse_dose_expression("0.05-0.1 mg/kg/dose"),
            DoseShape::Range {
                min: 0.05,
                max: 0.1
            }
        );
    }

    #[test]
    fn test_parse_single() {
        assert_eq!(
            parser().parse_dose_expression("15 mg/kg/dose"),
            DoseShape::Single { value: 15.0 }
        );
    }

    #[test]
    fn test_parse_not_computable() {
        assert_eq!(
            parser().parse_dose_expression("Not recommended"),
            DoseShape::NotComputable
        );
        assert_eq!(parser().parse_dose_expression("N/A"), DoseShape::NotComputable);
        assert_eq!(parser().parse_dose_expression(""), DoseShape::NotComputable);
    }

    #[test]
    fn test_first_range_wins() {
        // 多个区间时取文本中首个
        assert_eq!(
            parser().parse_dose_expression("15-20 mg/kg loading, then 3-5 mg/kg/day"),
            DoseShape::Range {
                min: 15.0,
                max: 20.0
            }
        );
    }

    #[test]
    fn test_reversed_range_is_not_corrected() {
        // 倒序区间按文本顺序保留，首个数值即min，不做纠正
        assert_eq!(
            parser().parse_dose_expression("20-10 mg/kg"),
            DoseShape::Range {
                min: 20.0,
                max: 10.0
            }
        );
    }

    #[test]
    fn test_parse_max_dose() {
        assert_eq!(parser().parse_max_dose("300 mg/day"), Some(300.0));
        assert_eq!(parser().parse_max_dose("40 mg/kg/day"), Some(40.0));
        assert_eq!(parser().parse_max_dose("N/A"), None);
        assert_eq!(parser().parse_max_dose(""), None);
    }

    #[test]
    fn test_extract_unit() {
        assert_eq!(parser().extract_unit("10-20 mg/kg/day"), "mg/kg/day");
        assert_eq!(parser().extract_unit("15 mg/kg/dose"), "mg/kg/dose");
        assert_eq!(parser().extract_unit("1-2 mcg/kg/dose"), "mcg/kg/dose");
        // 无字母片段时回落到默认单位
        assert_eq!(parser().extract_unit("15"), "mg");
    }
}
