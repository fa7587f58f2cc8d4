//! 收藏夹与最近计算记录
//!
//! 客户端偏好的进程内键值存储协作组件：收藏支持全量读取、添加、
//! 移除、清空；最近记录新条目在前，最多保留固定条数。
//! 这是剂量解析核心之外的外围协作组件。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dose_core::DoseRange;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// 最近记录保留条数
const MAX_RECENT: usize = 20;

/// 收藏的药物
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteDrug {
    pub id: String,
    pub name: String,
    pub generic_name: String,
    pub system: String,
    pub category: String,
    pub added_at: DateTime<Utc>,
}

/// 一次计算的历史记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentCalculation {
    pub id: Uuid,
    pub drug: String,
    pub generic_name: String,
    pub system: String,
    pub category: String,
    pub patient_weight: f64,
    pub patient_age: f64,
    pub age_group: String,
    pub calculated_dose: DoseRange,
    pub frequency: String,
    pub calculated_at: DateTime<Utc>,
}

/// 使用统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total_favorites: usize,
    pub total_recent_calculations: usize,
    pub most_used_system: Option<String>,
    pub most_used_drug: Option<String>,
}

/// 收藏夹存储（进程内，读写锁保护）
#[derive(Debug, Default)]
pub struct FavoritesStore {
    favorites: RwLock<Vec<FavoriteDrug>>,
    recent: RwLock<Vec<RecentCalculation>>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部收藏
    pub async fn favorites(&self) -> Vec<FavoriteDrug> {
        self.favorites.read().await.clone()
    }

    /// 按医学系统过滤收藏
    pub async fn favorites_by_system(&self, system_id: &str) -> Vec<FavoriteDrug> {
        self.favorites
            .read()
            .await
            .iter()
            .filter(|f| f.system == system_id)
            .cloned()
            .collect()
    }

    /// 添加收藏，按药物ID去重；已存在时返回 false
    pub async fn add_favorite(&self, drug: FavoriteDrug) -> bool {
        let mut favorites = self.favorites.write().await;
        if favorites.iter().any(|f| f.id == drug.id) {
            return false;
        }
        favorites.push(drug);
        true
    }

    /// 移除收藏；不存在时返回 false
    pub async fn remove_favorite(&self, drug_id: &str) -> bool {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| f.id != drug_id);
        favorites.len() < before
    }

    /// 是否已收藏
    pub async fn contains(&self, drug_id: &str) -> bool {
        self.favorites.read().await.iter().any(|f| f.id == drug_id)
    }

    /// 清空收藏
    pub async fn clear_favorites(&self) {
        self.favorites.write().await.clear();
    }

    /// 记录一次计算：新记录在前，超出保留上限的旧记录被丢弃
    pub async fn push_recent(&self, calc: RecentCalculation) {
        let mut recent = self.recent.write().await;
        recent.insert(0, calc);
        recent.truncate(MAX_RECENT);
    }

    /// 全部最近记录（新在前）
    pub async fn recent(&self) -> Vec<RecentCalculation> {
        self.recent.read().await.clone()
    }

    /// 按医学系统过滤最近记录
    pub async fn recent_by_system(&self, system_id: &str) -> Vec<RecentCalculation> {
        self.recent
            .read()
            .await
            .iter()
            .filter(|c| c.system == system_id)
            .cloned()
            .collect()
    }

    /// 清空最近记录
    pub async fn clear_recent(&self) {
        self.recent.write().await.clear();
    }

    /// 使用统计：最常用系统与药物按最近记录计数
    pub async fn stats(&self) -> UserStats {
        let favorites = self.favorites.read().await;
        let recent = self.recent.read().await;

        let mut system_counts: HashMap<&str, usize> = HashMap::new();
        let mut drug_counts: HashMap<&str, usize> = HashMap::new();
        for calc in recent.iter() {
            *system_counts.entry(calc.system.as_str()).or_insert(0) += 1;
            *drug_counts.entry(calc.drug.as_str()).or_insert(0) += 1;
        }

        UserStats {
            total_favorites: favorites.len(),
            total_recent_calculations: recent.len(),
            most_used_system: top_entry(&system_counts),
            most_used_drug: top_entry(&drug_counts),
        }
    }
}

/// 计数最高的键（并列时任取其一）
fn top_entry(counts: &HashMap<&str, usize>) -> Option<String> {
    counts
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(key, _)| key.to_string())
}
