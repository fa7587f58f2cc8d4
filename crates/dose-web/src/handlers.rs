//! HTTP处理器

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use dose_core::{utils, AgeUnit, DoseError, DoseRange, Resolution};
use dose_resolver::{DoseQuery, DoseResolver, QuickTable};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::favorites::{FavoriteDrug, FavoritesStore, RecentCalculation};

/// 共享应用状态：只读目录与解析器 + 收藏夹存储
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<DoseResolver>,
    pub quick: Arc<QuickTable>,
    pub favorites: Arc<FavoritesStore>,
}

/// 错误到HTTP响应的映射
pub struct ApiError(pub DoseError);

impl From<DoseError> for ApiError {
    fn from(err: DoseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self.0 {
            DoseError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            DoseError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({
            "error": true,
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "Dose Calculator API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "api": "/api/v1"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": "1.0.0"
    }))
}

/// 医学系统列表处理器
pub async fn get_systems(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.resolver.catalog();
    let systems: Vec<_> = catalog
        .systems()
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "description": s.description,
                "icon": s.icon,
                "color": s.color,
                "categories": s.categories,
                "drug_count": catalog.drugs_in_system(&s.id).len()
            })
        })
        .collect();

    let total = systems.len();
    Json(json!({
        "success": true,
        "data": { "systems": systems, "total": total }
    }))
}

/// 药物列表查询参数
#[derive(Debug, Deserialize)]
pub struct DrugQueryParams {
    /// 按医学系统过滤
    pub system: Option<String>,
    /// 名称子串搜索
    pub q: Option<String>,
}

/// 药物列表/搜索处理器
pub async fn get_drugs(
    State(state): State<AppState>,
    Query(params): Query<DrugQueryParams>,
) -> impl IntoResponse {
    let catalog = state.resolver.catalog();
    let drugs: Vec<_> = match (&params.system, &params.q) {
        (_, Some(q)) => catalog.search(q),
        (Some(system), None) => catalog.drugs_in_system(system),
        (None, None) => catalog.drugs().iter().collect(),
    };
    // 搜索结果再按系统过滤
    let drugs: Vec<_> = drugs
        .into_iter()
        .filter(|d| params.system.as_ref().map_or(true, |s| &d.system == s))
        .map(|d| {
            json!({
                "id": d.id,
                "name": d.name,
                "generic_name": d.generic_name,
                "system": d.system,
                "category": d.category
            })
        })
        .collect();

    let total = drugs.len();
    Json(json!({
        "success": true,
        "data": { "drugs": drugs, "total": total }
    }))
}

/// 药物详情处理器
pub async fn get_drug(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let drug = state
        .resolver
        .catalog()
        .get(&drug_id)
        .ok_or_else(|| DoseError::NotFound(format!("目录中不存在药物: {}", drug_id)))?;

    Ok(Json(json!({ "success": true, "data": drug })))
}

/// 剂量计算请求体
#[derive(Debug, Deserialize)]
pub struct DosageRequest {
    pub drug: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
    /// 年龄单位，默认岁
    pub age_unit: Option<AgeUnit>,
}

/// 剂量计算处理器
pub async fn post_dosage(
    State(state): State<AppState>,
    Json(request): Json<DosageRequest>,
) -> ApiResult<impl IntoResponse> {
    let drug = request
        .drug
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: drug".to_string()))?;
    let age = request
        .age
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: age".to_string()))?;
    let weight = request
        .weight
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: weight".to_string()))?;

    let age_unit = request.age_unit.unwrap_or(AgeUnit::Years);
    let query = DoseQuery {
        drug,
        age_years: age_unit.to_years(age),
        weight_kg: weight,
    };

    let resolution = state.resolver.resolve(&query)?;
    info!(
        "剂量计算完成: drug={} numeric={}",
        query.drug,
        resolution.is_numeric()
    );

    // 数值结果计入最近记录
    if let Resolution::Numeric(dose) = &resolution {
        state
            .favorites
            .push_recent(RecentCalculation {
                id: Uuid::new_v4(),
                drug: dose.drug_name.clone(),
                generic_name: dose.generic_name.clone(),
                system: dose.system.clone(),
                category: dose.category.clone(),
                patient_weight: dose.patient.weight_kg,
                patient_age: dose.patient.age_years,
                age_group: dose.age_group.to_string(),
                calculated_dose: dose.dosage_range.clone(),
                frequency: dose.frequency.clone(),
                calculated_at: Utc::now(),
            })
            .await;
    }

    Ok(Json(json!({
        "success": true,
        "data": resolution,
        "calculated_at": Utc::now().to_rfc3339()
    })))
}

/// 快速计算请求体
#[derive(Debug, Deserialize)]
pub struct QuickDosageRequest {
    pub drug: Option<String>,
    pub age: Option<f64>,
    pub weight: Option<f64>,
}

/// 常用药快速计算处理器
pub async fn post_quick_dosage(
    State(state): State<AppState>,
    Json(request): Json<QuickDosageRequest>,
) -> ApiResult<impl IntoResponse> {
    let drug = request
        .drug
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: drug".to_string()))?;
    let age = request
        .age
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: age".to_string()))?;
    let weight = request
        .weight
        .ok_or_else(|| DoseError::InvalidInput("缺少必填字段: weight".to_string()))?;

    let result = state.quick.calculate(&drug, age, weight)?;

    Ok(Json(json!({
        "success": true,
        "data": result,
        "calculated_at": Utc::now().to_rfc3339()
    })))
}

/// 常用药简表列表处理器
pub async fn get_quick_drugs(State(state): State<AppState>) -> impl IntoResponse {
    let drugs: Vec<_> = state
        .quick
        .list()
        .into_iter()
        .map(|(key, name)| json!({ "key": key, "name": name }))
        .collect();

    Json(json!({
        "success": true,
        "data": { "drugs": drugs }
    }))
}

/// 体重估算查询参数
#[derive(Debug, Deserialize)]
pub struct WeightEstimateParams {
    pub age: f64,
    pub unit: Option<AgeUnit>,
}

/// 按年龄估算体重处理器（仅输入辅助）
pub async fn get_weight_estimate(
    Query(params): Query<WeightEstimateParams>,
) -> ApiResult<impl IntoResponse> {
    let unit = params.unit.unwrap_or(AgeUnit::Years);
    let estimate = utils::estimate_weight_kg(params.age, unit).ok_or_else(|| {
        DoseError::InvalidInput(format!("年龄必须为正数，收到: {}", params.age))
    })?;

    Ok(Json(json!({
        "success": true,
        "data": { "estimated_weight_kg": estimate }
    })))
}

/// 收藏夹查询参数
#[derive(Debug, Deserialize)]
pub struct SystemFilterParams {
    pub system: Option<String>,
}

/// 收藏列表处理器
pub async fn get_favorites(
    State(state): State<AppState>,
    Query(params): Query<SystemFilterParams>,
) -> impl IntoResponse {
    let favorites = match &params.system {
        Some(system) => state.favorites.favorites_by_system(system).await,
        None => state.favorites.favorites().await,
    };

    let total = favorites.len();
    Json(json!({
        "success": true,
        "data": { "favorites": favorites, "total": total }
    }))
}

/// 添加收藏请求体
#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub drug_id: String,
}

/// 添加收藏处理器（药物必须存在于目录中）
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<FavoriteRequest>,
) -> ApiResult<impl IntoResponse> {
    let drug = state
        .resolver
        .catalog()
        .get(&request.drug_id)
        .ok_or_else(|| DoseError::NotFound(format!("目录中不存在药物: {}", request.drug_id)))?;

    let added = state
        .favorites
        .add_favorite(FavoriteDrug {
            id: drug.id.clone(),
            name: drug.name.clone(),
            generic_name: drug.generic_name.clone(),
            system: drug.system.clone(),
            category: drug.category.clone(),
            added_at: Utc::now(),
        })
        .await;

    Ok(Json(json!({ "success": true, "added": added })))
}

/// 移除收藏处理器
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(drug_id): Path<String>,
) -> impl IntoResponse {
    let removed = state.favorites.remove_favorite(&drug_id).await;
    Json(json!({ "success": true, "removed": removed }))
}

/// 清空收藏处理器
pub async fn clear_favorites(State(state): State<AppState>) -> impl IntoResponse {
    state.favorites.clear_favorites().await;
    Json(json!({ "success": true }))
}

/// 最近计算记录处理器
pub async fn get_recent(
    State(state): State<AppState>,
    Query(params): Query<SystemFilterParams>,
) -> impl IntoResponse {
    let recent = match &params.system {
        Some(system) => state.favorites.recent_by_system(system).await,
        None => state.favorites.recent().await,
    };

    let total = recent.len();
    Json(json!({
        "success": true,
        "data": { "calculations": recent, "total": total }
    }))
}

/// 手动记录一次计算的请求体（ID与时间戳由服务端分配）
#[derive(Debug, Deserialize)]
pub struct RecentCalculationRequest {
    pub drug: String,
    pub generic_name: String,
    pub system: String,
    pub category: String,
    pub patient_weight: f64,
    pub patient_age: f64,
    pub age_group: String,
    pub calculated_dose: DoseRange,
    pub frequency: String,
}

/// 手动记录一次计算处理器
pub async fn post_recent(
    State(state): State<AppState>,
    Json(request): Json<RecentCalculationRequest>,
) -> impl IntoResponse {
    let record = RecentCalculation {
        id: Uuid::new_v4(),
        drug: request.drug,
        generic_name: request.generic_name,
        system: request.system,
        category: request.category,
        patient_weight: request.patient_weight,
        patient_age: request.patient_age,
        age_group: request.age_group,
        calculated_dose: request.calculated_dose,
        frequency: request.frequency,
        calculated_at: Utc::now(),
    };
    let id = record.id;
    state.favorites.push_recent(record).await;
    Json(json!({ "success": true, "id": id }))
}

/// 清空最近记录处理器
pub async fn clear_recent(State(state): State<AppState>) -> impl IntoResponse {
    state.favorites.clear_recent().await;
    Json(json!({ "success": true }))
}

/// 使用统计处理器
pub async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.favorites.stats().await;
    Json(json!({ "success": true, "data": stats }))
}
