//! 剂量解析器
//!
//! 串联输入校验、目录检索、年龄分组、文本解析与数值计算的完整流程。
//! 目录通过依赖注入传入，便于用合成目录做测试替身。

use std::sync::Arc;

use dose_catalog::Catalog;
use dose_core::{
    utils, DoseError, DoseResult, DrugRecord, PatientInput, QualitativeResult, Resolution, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::age_band::{select_band, AgeBandThresholds};
use crate::compute::{compute_dose, Computation};
use crate::parser::DoseParser;

/// 解析器配置（部署级常量，不随单次请求变化）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// 年龄分组边界
    pub age_bands: AgeBandThresholds,
    /// 展示精度（小数位数）。两个上游数据变体精度不一致（2位/1位），
    /// 此处统一取2位，作为配置常量而非各处散落的隐式约定。
    pub rounding_decimals: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            age_bands: AgeBandThresholds::default(),
            rounding_decimals: 2,
        }
    }
}

/// 单次剂量查询
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseQuery {
    /// 药物ID或名称子串
    pub drug: String,
    /// 年龄（岁）
    pub age_years: f64,
    /// 体重（kg）
    pub weight_kg: f64,
}

/// 剂量解析器
///
/// 持有只读目录的共享引用，调用之间无共享可变状态，
/// 同一输入的重复调用结果完全一致。
pub struct DoseResolver {
    catalog: Arc<Catalog>,
    config: ResolverConfig,
    parser: DoseParser,
}

impl DoseResolver {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    pub fn with_config(catalog: Arc<Catalog>, config: ResolverConfig) -> Self {
        Self {
            catalog,
            config,
            parser: DoseParser::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// 解析一次剂量查询
    ///
    /// 错误路径：缺药物标识或非正数年龄/体重返回 `InvalidInput`，
    /// 目录无命中返回 `NotFound`。规则文本无数值内容不是错误，
    /// 返回 `Resolution::NotComputable` 定性回退。
    pub fn resolve(&self, query: &DoseQuery) -> Result<Resolution> {
        if query.drug.trim().is_empty() {
            return Err(DoseError::InvalidInput("缺少药物标识".to_string()));
        }
        utils::validate_patient_input(query.age_years, query.weight_kg)?;

        let drug = self.catalog.find(&query.drug).ok_or_else(|| {
            DoseError::NotFound(format!("目录中不存在药物: {}", query.drug))
        })?;

        let band = select_band(query.age_years, &self.config.age_bands);
        let rule = drug.dosage.rule(band);
        let patient = PatientInput {
            age_years: query.age_years,
            weight_kg: query.weight_kg,
        };

        let shape = self.parser.parse_dose_expression(&rule.dose);
        debug!(
            "药物 {} 年龄组 {} 剂量文本 {:?} 解析形态 {:?}",
            drug.id, band, rule.dose, shape
        );

        let ceiling = self.parser.parse_max_dose(&rule.max_dose);
        let unit = self.parser.extract_unit(&rule.dose);

        match compute_dose(
            shape,
            query.weight_kg,
            ceiling,
            &unit,
            self.config.rounding_decimals,
        ) {
            Computation::Numeric(range) => Ok(Resolution::Numeric(DoseResult {
                drug_id: drug.id.clone(),
                drug_name: drug.name.clone(),
                generic_name: drug.generic_name.clone(),
                system: drug.system.clone(),
                category: drug.category.clone(),
                age_group: band,
                dosage_range: range,
                frequency: rule.frequency.clone(),
                notes: rule.notes.clone(),
                patient,
            })),
            Computation::NotComputable => Ok(Resolution::NotComputable(Self::qualitative(
                drug, band, rule, patient,
            ))),
        }
    }

    fn qualitative(
        drug: &DrugRecord,
        band: dose_core::AgeGroup,
        rule: &dose_core::DoseRule,
        patient: PatientInput,
    ) -> QualitativeResult {
        QualitativeResult {
            drug_id: drug.id.clone(),
            drug_name: drug.name.clone(),
            generic_name: drug.generic_name.clone(),
            system: drug.system.clone(),
            category: drug.category.clone(),
            age_group: band,
            dose_text: rule.dose.clone(),
            frequency: rule.frequency.clone(),
            notes: rule.notes.clone(),
            patient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dose_core::AgeGroup;

    /// 合成目录：只含测试所需的最小数据
    const TEST_CATALOG: &str = r#"{
        "systems": [
            {"id": "nervous", "name": "Nervous System", "description": "", "icon": "", "color": "purple", "categories": ["Anticonvulsants"]}
        ],
        "drugs": [
            {
                "id": "testdrug",
                "name": "Testdrug",
                "generic_name": "Testdrugium",
                "system": "nervous",
                "category": "Anticonvulsants",
                "indications": [], "contraindications": [], "warnings": [],
                "adverse_effects": [], "interactions": [], "monitoring": [],
                "dosage": {
                    "neonatal": {"dose": "Not recommended", "frequency": "N/A", "max_dose": "N/A", "notes": "Specialist use only"},
                    "infant": {"dose": "15 mg/kg/dose", "frequency": "Every 6 hours", "max_dose": "N/A", "notes": ""},
                    "child": {"dose": "10-20 mg/kg/day", "frequency": "Divided every 8 hours", "max_dose": "300 mg/day", "notes": "Therapeutic range: 4-12 mcg/mL"},
                    "adolescent": {"dose": "5 mg/kg/day", "frequency": "Once daily", "max_dose": "400 mg/day", "notes": ""}
                },
                "administration": {"route": ["Oral"], "formulation": ["Tablets"], "storage": "", "stability": ""},
                "renal_adjustment": {"adjustment": "", "monitoring": ""},
                "hepatic_adjustment": {"adjustment": "", "monitoring": ""},
                "references": []
            }
        ]
    }"#;

    fn resolver() -> DoseResolver {
        let catalog = Catalog::from_json(TEST_CATALOG).unwrap();
        DoseResolver::new(Arc::new(catalog))
    }

    fn query(drug: &str, age: f64, weight: f64) -> DoseQuery {
        DoseQuery {
            drug: drug.to_string(),
            age_years: age,
            weight_kg: weight,
        }
    }

    #[test]
    fn test_range_resolution_with_clamping() {
        // 10-20 mg/kg × 20 kg，上限300 → {200, 300}
        let result = resolver().resolve(&query("testdrug", 5.0, 20.0)).unwrap();
        match result {
            Resolution::Numeric(dose) => {
                assert_eq!(dose.age_group, AgeGroup::Child);
                assert_eq!(dose.dosage_range.min, 200.0);
                assert_eq!(dose.dosage_range.max, 300.0);
                assert_eq!(dose.dosage_range.unit, "mg/kg/day");
            }
            other => panic!("预期数值结果，得到 {:?}", other),
        }
    }

    #[test]
    fn test_single_resolution_without_ceiling() {
        // 15 mg/kg × 5 kg，无上限 → {75, 75}
        let result = resolver().resolve(&query("testdrug", 0.5, 5.0)).unwrap();
        match result {
            Resolution::Numeric(dose) => {
                assert_eq!(dose.age_group, AgeGroup::Infant);
                assert_eq!(dose.dosage_range.min, 75.0);
                assert_eq!(dose.dosage_range.max, 75.0);
            }
            other => panic!("预期数值结果，得到 {:?}", other),
        }
    }

    #[test]
    fn test_not_computable_fallback() {
        // 新生儿规则为哨兵文本，应返回定性回退并带上原始备注
        let result = resolver().resolve(&query("testdrug", 0.05, 3.0)).unwrap();
        match result {
            Resolution::NotComputable(fallback) => {
                assert_eq!(fallback.age_group, AgeGroup::Neonatal);
                assert_eq!(fallback.dose_text, "Not recommended");
                assert_eq!(fallback.notes, "Specialist use only");
            }
            other => panic!("预期定性回退，得到 {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_rejected_before_resolution() {
        let r = resolver();
        assert!(matches!(
            r.resolve(&query("testdrug", 0.0, 20.0)),
            Err(DoseError::InvalidInput(_))
        ));
        assert!(matches!(
            r.resolve(&query("testdrug", 5.0, 0.0)),
            Err(DoseError::InvalidInput(_))
        ));
        assert!(matches!(
            r.resolve(&query("testdrug", -1.0, 20.0)),
            Err(DoseError::InvalidInput(_))
        ));
        assert!(matches!(
            r.resolve(&query("", 5.0, 20.0)),
            Err(DoseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_drug_is_not_found() {
        assert!(matches!(
            resolver().resolve(&query("ghost", 5.0, 20.0)),
            Err(DoseError::NotFound(_))
        ));
    }

    #[test]
    fn test_name_substring_match() {
        // 名称子串不区分大小写，取首个命中
        let result = resolver().resolve(&query("TESTDRUGIUM", 5.0, 20.0)).unwrap();
        assert!(result.is_numeric());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        // 目录不变时，相同输入的两次解析结果完全一致
        let r = resolver();
        let q = query("testdrug", 5.0, 20.0);
        let first = r.resolve(&q).unwrap();
        let second = r.resolve(&q).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_band_routing_by_age() {
        let r = resolver();
        for (age, expected) in [
            (0.05, AgeGroup::Neonatal),
            (0.5, AgeGroup::Infant),
            (5.0, AgeGroup::Child),
            (15.0, AgeGroup::Adolescent),
        ] {
            let result = r.resolve(&query("testdrug", age, 10.0)).unwrap();
            let band = match &result {
                Resolution::Numeric(d) => d.age_group,
                Resolution::NotComputable(d) => d.age_group,
            };
            assert_eq!(band, expected, "年龄 {} 分组错误", age);
        }
    }
}
