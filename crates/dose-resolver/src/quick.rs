//! 常用药快速计算
//!
//! 单表变体：每种药物带结构化的每公斤剂量与上限字段，直接计算
//! 单次剂量和全日剂量，不走文本解析路径。面向急诊场景的少量常用药。

use std::collections::HashMap;

use dose_core::{utils, DoseError, Result};
use serde::{Deserialize, Serialize};

use crate::compute::round_to;

/// 简表药物条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickDrugInfo {
    pub name: String,
    /// 每公斤单次剂量
    pub dose_per_kg: f64,
    /// 每公斤全日剂量
    pub max_daily_dose: f64,
    pub frequency: String,
    /// 单次剂量绝对上限
    pub max_single_dose: f64,
    pub unit: String,
}

/// 快速计算结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuickDoseResult {
    pub drug: String,
    pub single_dose: f64,
    pub daily_dose: f64,
    pub frequency: String,
    pub dose_per_kg: f64,
    pub unit: String,
    pub patient_age: f64,
    pub patient_weight: f64,
}

/// 常用药简表
#[derive(Debug)]
pub struct QuickTable {
    drugs: HashMap<String, QuickDrugInfo>,
    decimals: u32,
}

impl QuickTable {
    /// 内置简表（六种常用药），默认精度
    pub fn builtin() -> Self {
        Self::with_decimals(2)
    }

    /// 指定展示精度的内置简表
    pub fn with_decimals(decimals: u32) -> Self {
        let mut drugs = HashMap::new();
        drugs.insert(
            "acetaminophen".to_string(),
            QuickDrugInfo {
                name: "Acetaminophen (Paracetamol)".to_string(),
                dose_per_kg: 15.0,
                max_daily_dose: 90.0,
                frequency: "every 4-6 hours".to_string(),
                max_single_dose: 1000.0,
                unit: "mg".to_string(),
            },
        );
        drugs.insert(
            "ibuprofen".to_string(),
            QuickDrugInfo {
                name: "Ibuprofen".to_string(),
                dose_per_kg: 10.0,
                max_daily_dose: 40.0,
                frequency: "every 6-8 hours".to_string(),
                max_single_dose: 800.0,
                unit: "mg".to_string(),
            },
        );
        drugs.insert(
            "amoxicillin".to_string(),
            QuickDrugInfo {
                name: "Amoxicillin".to_string(),
                dose_per_kg: 45.0,
                max_daily_dose: 3000.0,
                frequency: "twice daily".to_string(),
                max_single_dose: 1000.0,
                unit: "mg".to_string(),
            },
        );
        drugs.insert(
            "prednisolone".to_string(),
            QuickDrugInfo {
                name: "Prednisolone".to_string(),
                dose_per_kg: 1.0,
                max_daily_dose: 60.0,
                frequency: "once daily".to_string(),
                max_single_dose: 60.0,
                unit: "mg".to_string(),
            },
        );
        drugs.insert(
            "salbutamol".to_string(),
            QuickDrugInfo {
                name: "Salbutamol".to_string(),
                dose_per_kg: 0.15,
                max_daily_dose: 32.0,
                frequency: "every 4-6 hours".to_string(),
                max_single_dose: 8.0,
                unit: "mg".to_string(),
            },
        );
        drugs.insert(
            "loratadine".to_string(),
            QuickDrugInfo {
                name: "Loratadine".to_string(),
                dose_per_kg: 0.2,
                max_daily_dose: 10.0,
                frequency: "once daily".to_string(),
                max_single_dose: 10.0,
                unit: "mg".to_string(),
            },
        );
        Self { drugs, decimals }
    }

    /// 按键取条目
    pub fn get(&self, key: &str) -> Option<&QuickDrugInfo> {
        self.drugs.get(key)
    }

    /// 全部条目（键 + 名称），键按字典序
    pub fn list(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .drugs
            .iter()
            .map(|(k, v)| (k.as_str(), v.name.as_str()))
            .collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// 计算单次与全日剂量
    ///
    /// 单次 = min(每公斤剂量 × 体重, 单次上限)；
    /// 全日 = min(每公斤日剂量 × 体重, 单次上限 × 4)。
    pub fn calculate(&self, drug_key: &str, age_years: f64, weight_kg: f64) -> Result<QuickDoseResult> {
        utils::validate_patient_input(age_years, weight_kg)?;

        let drug = self.drugs.get(drug_key).ok_or_else(|| {
            DoseError::NotFound(format!("简表中不存在药物: {}", drug_key))
        })?;

        let single = (drug.dose_per_kg * weight_kg).min(drug.max_single_dose);
        let daily = (drug.max_daily_dose * weight_kg).min(drug.max_single_dose * 4.0);

        Ok(QuickDoseResult {
            drug: drug.name.clone(),
            single_dose: round_to(single, self.decimals),
            daily_dose: round_to(daily, self.decimals),
            frequency: drug.frequency.clone(),
            dose_per_kg: drug.dose_per_kg,
            unit: drug.unit.clone(),
            patient_age: age_years,
            patient_weight: weight_kg,
        })
    }
}

impl Default for QuickTable {
    fn default() -> Self {
        Self::builtin()
    }
}
