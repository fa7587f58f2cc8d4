//! 核心数据模型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 年龄分组（固定的四个发育阶段，不存在其他分组）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Neonatal,   // 新生儿
    Infant,     // 婴儿
    Child,      // 儿童
    Adolescent, // 青少年
}

impl AgeGroup {
    /// 全部年龄分组（按年龄升序）
    pub fn all() -> [AgeGroup; 4] {
        [
            AgeGroup::Neonatal,
            AgeGroup::Infant,
            AgeGroup::Child,
            AgeGroup::Adolescent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Neonatal => "neonatal",
            AgeGroup::Infant => "infant",
            AgeGroup::Child => "child",
            AgeGroup::Adolescent => "adolescent",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 年龄单位（接口层输入用，内部统一换算为岁）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    Years,
    Months,
}

impl AgeUnit {
    /// 将给定数值换算为岁
    pub fn to_years(&self, value: f64) -> f64 {
        match self {
            AgeUnit::Years => value,
            AgeUnit::Months => value / 12.0,
        }
    }
}

/// 单个年龄分组的给药规则
///
/// `dose` 与 `max_dose` 为自由文本，由解析器在边界处转成数值形态；
/// `frequency` 不做机器解析，原样展示。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseRule {
    pub dose: String,      // 剂量表达式，如 "10-20 mg/kg/day"
    pub frequency: String, // 给药频次
    pub max_dose: String,  // 最大剂量文本，首个数值为封顶值
    pub notes: String,     // 备注
}

/// 剂量表：四个年龄分组缺一不可
///
/// 四个分组建模为必填字段，目录中缺失任一分组会在加载期反序列化失败，
/// 不存在运行期查不到规则的情况。"不适用"以哨兵文本表示，不以缺键表示。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DosageTable {
    pub neonatal: DoseRule,
    pub infant: DoseRule,
    pub child: DoseRule,
    pub adolescent: DoseRule,
}

impl DosageTable {
    /// 按年龄分组取规则（全函数，不会失败）
    pub fn rule(&self, group: AgeGroup) -> &DoseRule {
        match group {
            AgeGroup::Neonatal => &self.neonatal,
            AgeGroup::Infant => &self.infant,
            AgeGroup::Child => &self.child,
            AgeGroup::Adolescent => &self.adolescent,
        }
    }
}

/// 给药途径与制剂信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Administration {
    pub route: Vec<String>,       // 给药途径
    pub formulation: Vec<String>, // 剂型
    pub storage: String,          // 储存条件
    pub stability: String,        // 稳定性
}

/// 肾/肝功能剂量调整说明
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrganAdjustment {
    pub adjustment: String,
    pub monitoring: String,
}

/// 药物条目：静态只读数据，目录内以ID唯一标识
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    pub id: String,
    pub name: String,
    pub generic_name: String,
    pub system: String,   // 所属医学系统标签
    pub category: String, // 分类标签
    pub indications: Vec<String>,
    pub contraindications: Vec<String>,
    pub warnings: Vec<String>,
    pub adverse_effects: Vec<String>,
    pub interactions: Vec<String>,
    pub monitoring: Vec<String>,
    pub dosage: DosageTable,
    pub administration: Administration,
    pub renal_adjustment: OrganAdjustment,
    pub hepatic_adjustment: OrganAdjustment,
    pub references: Vec<String>,
}

/// 医学系统分类（仅用于目录浏览，与解析算法无关）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalSystem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub categories: Vec<String>,
}

/// 单次请求的患者输入（请求级临时数据，不做持久化）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    pub age_years: f64,
    pub weight_kg: f64,
}

/// 数值剂量区间
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

/// 数值解析成功的计算结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseResult {
    pub drug_id: String,
    pub drug_name: String,
    pub generic_name: String,
    pub system: String,
    pub category: String,
    pub age_group: AgeGroup,
    pub dosage_range: DoseRange,
    pub frequency: String,
    pub notes: String,
    pub patient: PatientInput,
}

/// 无法数值化时的定性回退结果
///
/// 规则文本无数值内容时返回，备注需原样呈现给调用方，提示临床判断。
/// 这是预期内的合法结果，不是错误。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QualitativeResult {
    pub drug_id: String,
    pub drug_name: String,
    pub generic_name: String,
    pub system: String,
    pub category: String,
    pub age_group: AgeGroup,
    pub dose_text: String, // 原始剂量文本
    pub frequency: String,
    pub notes: String,
    pub patient: PatientInput,
}

/// 一次剂量解析的最终结果：数值或定性回退
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Numeric(DoseResult),
    NotComputable(QualitativeResult),
}

impl Resolution {
    /// 是否为数值结果
    pub fn is_numeric(&self) -> bool {
        matches!(self, Resolution::Numeric(_))
    }
}
