//! 剂量解析演示程序
//!
//! 展示完整的解析流程：目录检索、年龄分组、剂量文本解析、
//! 按体重计算与上限封顶，以及定性回退。

use std::sync::Arc;

use dose_catalog::Catalog;
use dose_core::Resolution;
use dose_resolver::{DoseQuery, DoseResolver, QuickTable};

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("🚀 剂量解析演示\n");

    let catalog = Catalog::builtin()?;
    let resolver = DoseResolver::new(Arc::new(catalog));

    let queries = [
        ("acetaminophen", 5.0, 20.0),
        ("phenobarbital", 0.5, 7.0),
        ("carbamazepine", 0.05, 3.2),
        ("amoxicillin", 14.0, 50.0),
    ];

    for (drug, age, weight) in queries {
        let query = DoseQuery {
            drug: drug.to_string(),
            age_years: age,
            weight_kg: weight,
        };
        println!("📋 查询: {} (年龄 {} 岁, 体重 {} kg)", drug, age, weight);

        match resolver.resolve(&query)? {
            Resolution::Numeric(dose) => {
                println!("   药物: {} ({})", dose.drug_name, dose.generic_name);
                println!("   年龄分组: {}", dose.age_group);
                println!(
                    "   剂量: {} - {} {}",
                    dose.dosage_range.min, dose.dosage_range.max, dose.dosage_range.unit
                );
                println!("   频次: {}", dose.frequency);
            }
            Resolution::NotComputable(fallback) => {
                println!("   药物: {}", fallback.drug_name);
                println!("   年龄分组: {}", fallback.age_group);
                println!("   ⚠️ 无法数值计算: {}", fallback.dose_text);
                if !fallback.notes.is_empty() {
                    println!("   备注: {}", fallback.notes);
                }
            }
        }
        println!();
    }

    // 常用药快速计算
    println!("⚡ 快速计算 (acetaminophen, 20 kg):");
    let quick = QuickTable::builtin();
    let result = quick.calculate("acetaminophen", 5.0, 20.0)?;
    println!(
        "   单次: {} {}  全日: {} {}  频次: {}",
        result.single_dose, result.unit, result.daily_dose, result.unit, result.frequency
    );

    Ok(())
}
