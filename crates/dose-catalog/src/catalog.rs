//! 药物目录加载与检索

use dose_core::{DoseError, DrugRecord, MedicalSystem, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// 内置目录数据（编译期嵌入）
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// 目录文件的顶层结构
#[derive(Debug, Deserialize)]
struct CatalogData {
    systems: Vec<MedicalSystem>,
    drugs: Vec<DrugRecord>,
}

/// 药物目录
///
/// 加载即校验：数据缺陷（缺年龄分组、ID重复、系统标签悬空）在此处
/// 立即失败，拒绝带着损坏的目录对外提供计算。
#[derive(Debug)]
pub struct Catalog {
    systems: Vec<MedicalSystem>,
    drugs: Vec<DrugRecord>,
}

impl Catalog {
    /// 加载内置目录
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// 从JSON文本加载目录
    ///
    /// 剂量表的四个年龄分组是必填字段，缺失任一分组会在反序列化
    /// 阶段直接失败。
    pub fn from_json(text: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(text)
            .map_err(|e| DoseError::Catalog(format!("目录解析失败: {}", e)))?;

        let catalog = Self {
            systems: data.systems,
            drugs: data.drugs,
        };
        catalog.validate()?;

        info!(
            "药物目录加载完成: {} 个医学系统, {} 种药物",
            catalog.systems.len(),
            catalog.drugs.len()
        );
        Ok(catalog)
    }

    /// 从文件加载目录（部署时可用外部数据覆盖内置目录）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("从文件加载药物目录: {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// 目录完整性校验
    fn validate(&self) -> Result<()> {
        if self.drugs.is_empty() {
            return Err(DoseError::Catalog("目录中没有任何药物条目".to_string()));
        }

        let mut seen = HashSet::new();
        for drug in &self.drugs {
            if drug.id.trim().is_empty() {
                return Err(DoseError::Catalog(format!(
                    "药物 {:?} 的ID为空",
                    drug.name
                )));
            }
            if !seen.insert(drug.id.as_str()) {
                return Err(DoseError::Catalog(format!("药物ID重复: {}", drug.id)));
            }
            if !self.systems.iter().any(|s| s.id == drug.system) {
                return Err(DoseError::Catalog(format!(
                    "药物 {} 引用了未定义的医学系统: {}",
                    drug.id, drug.system
                )));
            }
        }
        Ok(())
    }

    /// 全部医学系统
    pub fn systems(&self) -> &[MedicalSystem] {
        &self.systems
    }

    /// 全部药物条目
    pub fn drugs(&self) -> &[DrugRecord] {
        &self.drugs
    }

    /// 按ID查找医学系统
    pub fn system(&self, system_id: &str) -> Option<&MedicalSystem> {
        self.systems.iter().find(|s| s.id == system_id)
    }

    /// 按ID精确查找药物
    pub fn get(&self, drug_id: &str) -> Option<&DrugRecord> {
        self.drugs.iter().find(|d| d.id == drug_id)
    }

    /// 按ID或名称查找药物
    ///
    /// 先做ID精确匹配，再对ID、名称、通用名做不区分大小写的子串匹配，
    /// 按目录顺序取首个命中，不做相关度排序。
    pub fn find(&self, query: &str) -> Option<&DrugRecord> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(drug) = self.get(query) {
            return Some(drug);
        }

        let lowered = query.to_lowercase();
        self.drugs.iter().find(|d| {
            d.id.to_lowercase().contains(&lowered)
                || d.name.to_lowercase().contains(&lowered)
                || d.generic_name.to_lowercase().contains(&lowered)
        })
    }

    /// 列出某医学系统下的全部药物
    pub fn drugs_in_system(&self, system_id: &str) -> Vec<&DrugRecord> {
        self.drugs.iter().filter(|d| d.system == system_id).collect()
    }

    /// 名称子串搜索（返回全部命中，浏览列表用）
    pub fn search(&self, query: &str) -> Vec<&DrugRecord> {
        let lowered = query.trim().to_lowercase();
        if lowered.is_empty() {
            return Vec::new();
        }
        self.drugs
            .iter()
            .filter(|d| {
                d.id.to_lowercase().contains(&lowered)
                    || d.name.to_lowercase().contains(&lowered)
                    || d.generic_name.to_lowercase().contains(&lowered)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dose_core::AgeGroup;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.drugs().is_empty());
        assert!(!catalog.systems().is_empty());
    }

    #[test]
    fn test_every_drug_has_all_four_bands() {
        // 目录完整性：每种药物的四个年龄分组都能取到规则
        let catalog = Catalog::builtin().unwrap();
        for drug in catalog.drugs() {
            for group in AgeGroup::all() {
                let rule = drug.dosage.rule(group);
                assert!(
                    !rule.dose.is_empty(),
                    "药物 {} 的 {} 分组剂量文本为空",
                    drug.id,
                    group
                );
            }
        }
    }

    #[test]
    fn test_find_exact_id() {
        let catalog = Catalog::builtin().unwrap();
        let drug = catalog.find("acetaminophen").unwrap();
        assert_eq!(drug.id, "acetaminophen");
    }

    #[test]
    fn test_find_case_insensitive_substring() {
        let catalog = Catalog::builtin().unwrap();
        let drug = catalog.find("AMOXI").unwrap();
        assert_eq!(drug.id, "amoxicillin");
    }

    #[test]
    fn test_find_unknown_returns_none() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.find("no-such-drug").is_none());
        assert!(catalog.find("   ").is_none());
    }

    #[test]
    fn test_drugs_in_system() {
        let catalog = Catalog::builtin().unwrap();
        let nervous = catalog.drugs_in_system("nervous");
        assert!(!nervous.is_empty());
        assert!(nervous.iter().all(|d| d.system == "nervous"));
    }

    #[test]
    fn test_missing_band_is_load_time_defect() {
        // 缺少 adolescent 分组的目录必须在加载期被拒绝
        let malformed = r#"{
            "systems": [
                {"id": "nervous", "name": "Nervous System", "description": "", "icon": "", "color": "purple", "categories": []}
            ],
            "drugs": [{
                "id": "broken",
                "name": "Broken",
                "generic_name": "Broken",
                "system": "nervous",
                "category": "Test",
                "indications": [], "contraindications": [], "warnings": [],
                "adverse_effects": [], "interactions": [], "monitoring": [],
                "dosage": {
                    "neonatal": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""},
                    "infant": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""},
                    "child": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""}
                },
                "administration": {"route": [], "formulation": [], "storage": "", "stability": ""},
                "renal_adjustment": {"adjustment": "", "monitoring": ""},
                "hepatic_adjustment": {"adjustment": "", "monitoring": ""},
                "references": []
            }]
        }"#;

        let err = Catalog::from_json(malformed).unwrap_err();
        assert!(matches!(err, DoseError::Catalog(_)));
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let mut text = String::from(r#"{"systems": "#);
        text.push_str(&serde_json::to_string(catalog.systems()).unwrap());
        text.push_str(r#", "drugs": "#);
        let mut drugs: Vec<_> = catalog.drugs().to_vec();
        drugs.push(drugs[0].clone());
        text.push_str(&serde_json::to_string(&drugs).unwrap());
        text.push('}');

        let err = Catalog::from_json(&text).unwrap_err();
        assert!(matches!(err, DoseError::Catalog(_)));
    }

    #[test]
    fn test_dangling_system_tag_is_rejected() {
        let malformed = r#"{
            "systems": [],
            "drugs": [{
                "id": "orphan",
                "name": "Orphan",
                "generic_name": "Orphan",
                "system": "ghost",
                "category": "Test",
                "indications": [], "contraindications": [], "warnings": [],
                "adverse_effects": [], "interactions": [], "monitoring": [],
                "dosage": {
                    "neonatal": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""},
                    "infant": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""},
                    "child": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""},
                    "adolescent": {"dose": "1 mg/kg", "frequency": "daily", "max_dose": "10 mg", "notes": ""}
                },
                "administration": {"route": [], "formulation": [], "storage": "", "stability": ""},
                "renal_adjustment": {"adjustment": "", "monitoring": ""},
                "hepatic_adjustment": {"adjustment": "", "monitoring": ""},
                "references": []
            }]
        }"#;

        let err = Catalog::from_json(malformed).unwrap_err();
        assert!(matches!(err, DoseError::Catalog(_)));
    }
}
