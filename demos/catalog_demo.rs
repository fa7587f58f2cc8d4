//! 药物目录演示程序
//!
//! 展示目录浏览能力：医学系统列表、系统内药物、名称搜索与详情查看。

use dose_catalog::Catalog;

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("🚀 药物目录演示\n");

    let catalog = Catalog::builtin()?;

    // 1. 医学系统概览
    println!("📊 医学系统 ({} 个):", catalog.systems().len());
    for system in catalog.systems() {
        println!(
            "   {} {} - {} ({} 种药物)",
            system.icon,
            system.name,
            system.description,
            catalog.drugs_in_system(&system.id).len()
        );
    }

    // 2. 系统内药物列表
    println!("\n📋 神经系统药物:");
    for drug in catalog.drugs_in_system("nervous") {
        println!("   - {} ({}) [{}]", drug.name, drug.generic_name, drug.category);
    }

    // 3. 名称搜索
    println!("\n🔍 搜索 \"pheny\":");
    for drug in catalog.search("pheny") {
        println!("   - {} ({})", drug.name, drug.id);
    }

    // 4. 药物详情
    if let Some(drug) = catalog.get("acetaminophen") {
        println!("\n💊 药物详情: {}", drug.name);
        println!("   通用名: {}", drug.generic_name);
        println!("   适应症: {}", drug.indications.join(", "));
        println!("   给药途径: {}", drug.administration.route.join(", "));
        println!("   儿童剂量: {}", drug.dosage.child.dose);
        println!("   儿童上限: {}", drug.dosage.child.max_dose);
    }

    Ok(())
}
