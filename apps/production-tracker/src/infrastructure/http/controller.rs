//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to application use cases.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::application::Actor;
use crate::application::dto::{
    AddStageDto, CustomerDto, CustomerHitDto, DashboardDto, InvoiceAmountsDto, InvoiceDto,
    InvoiceOrdersDto, MeasurementDto, MeasurementHitDto, MeasurementInputDto, OrderDetailDto,
    OrderDto, OrderHitDto, OrderInputDto, OrderQueryDto, OrderStageDto, PipelineStageDto,
    PipelineStageInputDto, StageUpdateDto, StatusOverrideDto, UpdateStageDto, VendorDto,
    VendorRoleDto, VendorRoleInputDto,
};
use crate::application::use_cases::{
    DashboardUseCase, ManageCatalogUseCase, ManageCustomersUseCase, ManageInvoicesUseCase,
    ManageMeasurementsUseCase, ManageOrdersUseCase, TrackStagesUseCase,
};
use crate::domain::customer_registry::CustomerForm;
use crate::domain::production_catalog::VendorForm;
use crate::domain::shared::{
    CustomerId, InvoiceId, MeasurementId, OrderId, OrderStageId, PipelineStageId, VendorId,
};
use crate::error::ApiError;

use super::request::{ApiJson, ApiPath, ApiQuery, MeasurementQuery, SearchQuery};
use super::response::{HealthResponse, Written, created, updated};

type ApiResult<T> = Result<T, ApiError>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Customer registry.
    pub customers: Arc<ManageCustomersUseCase>,
    /// Measurement sets.
    pub measurements: Arc<ManageMeasurementsUseCase>,
    /// Roles, pipeline stages and vendors.
    pub catalog: Arc<ManageCatalogUseCase>,
    /// Order lifecycle.
    pub orders: Arc<ManageOrdersUseCase>,
    /// Per-order stage tracking.
    pub stages: Arc<TrackStagesUseCase>,
    /// Invoices.
    pub invoices: Arc<ManageInvoicesUseCase>,
    /// Dashboard summary.
    pub dashboard: Arc<DashboardUseCase>,
    /// Application version.
    pub version: String,
}

/// Create the HTTP router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Customers
        .route("/api/v1/customers", post(create_customer).get(list_customers))
        .route("/api/v1/customers/search", get(search_customers))
        .route(
            "/api/v1/customers/{id}",
            get(get_customer).put(update_customer),
        )
        // Measurements
        .route(
            "/api/v1/measurements",
            post(create_measurement).get(list_measurements),
        )
        .route("/api/v1/measurements/search", get(search_measurements))
        .route(
            "/api/v1/measurements/{id}",
            get(get_measurement).put(update_measurement),
        )
        // Catalog
        .route("/api/v1/vendor-roles", post(create_role).get(list_roles))
        .route(
            "/api/v1/pipeline-stages",
            post(create_pipeline_stage).get(list_pipeline_stages),
        )
        .route(
            "/api/v1/pipeline-stages/{id}",
            get(get_pipeline_stage).put(update_pipeline_stage),
        )
        .route(
            "/api/v1/pipeline-stages/{id}/vendors",
            get(vendors_for_stage),
        )
        .route("/api/v1/vendors", post(create_vendor).get(list_vendors))
        .route("/api/v1/vendors/search", get(search_vendors))
        .route("/api/v1/vendors/{id}", put(update_vendor))
        // Orders
        .route("/api/v1/orders", post(place_order).get(list_orders))
        .route("/api/v1/orders/search", get(search_orders))
        .route(
            "/api/v1/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/api/v1/orders/{id}/status", put(set_order_status))
        .route(
            "/api/v1/orders/{id}/stages",
            post(add_order_stage).get(list_order_stages),
        )
        .route(
            "/api/v1/orders/{id}/stages/{stage_id}",
            put(update_order_stage),
        )
        // Invoices
        .route("/api/v1/invoices", post(create_invoice).get(list_invoices))
        .route(
            "/api/v1/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/api/v1/invoices/{id}/orders", post(add_invoice_orders))
        .route(
            "/api/v1/invoices/{id}/orders/{order_id}",
            axum::routing::delete(remove_invoice_order),
        )
        .route("/api/v1/dashboard", get(dashboard))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

// ============================================================================
// Customers
// ============================================================================

async fn create_customer(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(form): ApiJson<CustomerForm>,
) -> ApiResult<Written<CustomerDto>> {
    let confirmed = state.customers.create(form).await?;
    Ok(created(confirmed.map(|c| CustomerDto::from(&c))))
}

async fn list_customers(
    State(state): State<AppState>,
    actor: Actor,
) -> ApiResult<Json<Vec<CustomerDto>>> {
    let customers = state.customers.list(&actor).await?;
    Ok(Json(customers.iter().map(CustomerDto::from).collect()))
}

async fn search_customers(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<CustomerHitDto>>> {
    Ok(Json(state.customers.search(&query.q).await?))
}

async fn get_customer(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<CustomerId>,
) -> ApiResult<Json<CustomerDto>> {
    let customer = state.customers.get(id).await?;
    Ok(Json(CustomerDto::from(&customer)))
}

async fn update_customer(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<CustomerId>,
    ApiJson(form): ApiJson<CustomerForm>,
) -> ApiResult<Written<CustomerDto>> {
    let confirmed = state.customers.update(id, form).await?;
    Ok(updated(confirmed.map(|c| CustomerDto::from(&c))))
}

// ============================================================================
// Measurements
// ============================================================================

async fn create_measurement(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(input): ApiJson<MeasurementInputDto>,
) -> ApiResult<Written<MeasurementDto>> {
    let confirmed = state.measurements.create(input).await?;
    Ok(created(confirmed.map(|m| MeasurementDto::from(&m))))
}

async fn list_measurements(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<MeasurementQuery>,
) -> ApiResult<Json<Vec<MeasurementDto>>> {
    let measurements = state.measurements.list_for_customer(query.customer_id).await?;
    Ok(Json(measurements.iter().map(MeasurementDto::from).collect()))
}

async fn search_measurements(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<MeasurementQuery>,
) -> ApiResult<Json<Vec<MeasurementHitDto>>> {
    Ok(Json(
        state
            .measurements
            .search(&query.q, query.customer_id)
            .await?,
    ))
}

async fn get_measurement(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<MeasurementId>,
) -> ApiResult<Json<MeasurementDto>> {
    let measurement = state.measurements.get(id).await?;
    Ok(Json(MeasurementDto::from(&measurement)))
}

async fn update_measurement(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<MeasurementId>,
    ApiJson(input): ApiJson<MeasurementInputDto>,
) -> ApiResult<Written<MeasurementDto>> {
    let confirmed = state.measurements.update(id, input).await?;
    Ok(updated(confirmed.map(|m| MeasurementDto::from(&m))))
}

// ============================================================================
// Catalog
// ============================================================================

async fn create_role(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(input): ApiJson<VendorRoleInputDto>,
) -> ApiResult<Written<VendorRoleDto>> {
    let confirmed = state.catalog.create_role(&actor, input).await?;
    Ok(created(confirmed.map(|r| VendorRoleDto::from(&r))))
}

async fn list_roles(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<Vec<VendorRoleDto>>> {
    let roles = state.catalog.list_roles().await?;
    Ok(Json(roles.iter().map(VendorRoleDto::from).collect()))
}

async fn create_pipeline_stage(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(input): ApiJson<PipelineStageInputDto>,
) -> ApiResult<Written<PipelineStageDto>> {
    let confirmed = state.catalog.create_stage(&actor, input).await?;
    Ok(created(confirmed.map(|s| PipelineStageDto::from(&s))))
}

async fn list_pipeline_stages(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<Vec<PipelineStageDto>>> {
    let stages = state.catalog.list_stages().await?;
    Ok(Json(stages.iter().map(PipelineStageDto::from).collect()))
}

async fn get_pipeline_stage(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<PipelineStageId>,
) -> ApiResult<Json<PipelineStageDto>> {
    let stage = state.catalog.stage(id).await?;
    Ok(Json(PipelineStageDto::from(&stage)))
}

async fn update_pipeline_stage(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<PipelineStageId>,
    ApiJson(input): ApiJson<PipelineStageInputDto>,
) -> ApiResult<Written<PipelineStageDto>> {
    let confirmed = state.catalog.update_stage(&actor, id, input).await?;
    Ok(updated(confirmed.map(|s| PipelineStageDto::from(&s))))
}

async fn vendors_for_stage(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<PipelineStageId>,
) -> ApiResult<Json<Vec<VendorDto>>> {
    Ok(Json(state.catalog.vendors_for_stage(id).await?))
}

async fn create_vendor(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(form): ApiJson<VendorForm>,
) -> ApiResult<Written<VendorDto>> {
    Ok(created(state.catalog.create_vendor(&actor, form).await?))
}

async fn list_vendors(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<Vec<VendorDto>>> {
    Ok(Json(state.catalog.list_vendors().await?))
}

async fn search_vendors(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<VendorDto>>> {
    Ok(Json(state.catalog.search_vendors(&query.q).await?))
}

async fn update_vendor(
    State(state): State<AppState>,
    actor: Actor,
    ApiPath(id): ApiPath<VendorId>,
    ApiJson(form): ApiJson<VendorForm>,
) -> ApiResult<Written<VendorDto>> {
    Ok(updated(state.catalog.update_vendor(&actor, id, form).await?))
}

// ============================================================================
// Orders
// ============================================================================

async fn place_order(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(input): ApiJson<OrderInputDto>,
) -> ApiResult<Written<OrderDto>> {
    Ok(created(state.orders.place(input).await?))
}

async fn list_orders(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<OrderQueryDto>,
) -> ApiResult<Json<Vec<OrderDto>>> {
    Ok(Json(state.orders.list(query).await?))
}

async fn search_orders(
    State(state): State<AppState>,
    _actor: Actor,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Vec<OrderHitDto>>> {
    Ok(Json(state.orders.search(&query.q).await?))
}

async fn get_order(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
) -> ApiResult<Json<OrderDetailDto>> {
    Ok(Json(state.orders.detail(id).await?))
}

async fn update_order(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(input): ApiJson<OrderInputDto>,
) -> ApiResult<Written<OrderDto>> {
    Ok(updated(state.orders.update(id, input).await?))
}

async fn delete_order(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
) -> ApiResult<Written<OrderId>> {
    Ok(updated(state.orders.delete(id).await?))
}

async fn set_order_status(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(input): ApiJson<StatusOverrideDto>,
) -> ApiResult<Written<OrderDto>> {
    Ok(updated(state.orders.set_status(id, input).await?))
}

async fn add_order_stage(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(input): ApiJson<AddStageDto>,
) -> ApiResult<Written<OrderStageDto>> {
    Ok(created(state.stages.add_stage(id, input).await?))
}

async fn list_order_stages(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<OrderId>,
) -> ApiResult<Json<Vec<OrderStageDto>>> {
    Ok(Json(state.stages.list_stages(id).await?))
}

async fn update_order_stage(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath((id, stage_id)): ApiPath<(OrderId, OrderStageId)>,
    ApiJson(input): ApiJson<UpdateStageDto>,
) -> ApiResult<Written<StageUpdateDto>> {
    Ok(updated(state.stages.update_stage(id, stage_id, input).await?))
}

// ============================================================================
// Invoices
// ============================================================================

async fn create_invoice(
    State(state): State<AppState>,
    _actor: Actor,
    ApiJson(input): ApiJson<InvoiceOrdersDto>,
) -> ApiResult<Written<InvoiceDto>> {
    Ok(created(state.invoices.create(input).await?))
}

async fn list_invoices(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<Vec<InvoiceDto>>> {
    Ok(Json(state.invoices.list().await?))
}

async fn get_invoice(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<InvoiceId>,
) -> ApiResult<Json<InvoiceDto>> {
    Ok(Json(state.invoices.get(id).await?))
}

async fn update_invoice(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<InvoiceId>,
    ApiJson(input): ApiJson<InvoiceAmountsDto>,
) -> ApiResult<Written<InvoiceDto>> {
    Ok(updated(state.invoices.update_amounts(id, input).await?))
}

async fn delete_invoice(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<InvoiceId>,
) -> ApiResult<Written<Vec<OrderId>>> {
    Ok(updated(state.invoices.delete(id).await?))
}

async fn add_invoice_orders(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath(id): ApiPath<InvoiceId>,
    ApiJson(input): ApiJson<InvoiceOrdersDto>,
) -> ApiResult<Written<InvoiceDto>> {
    Ok(updated(state.invoices.add_orders(id, input).await?))
}

async fn remove_invoice_order(
    State(state): State<AppState>,
    _actor: Actor,
    ApiPath((id, order_id)): ApiPath<(InvoiceId, OrderId)>,
) -> ApiResult<Written<InvoiceDto>> {
    Ok(updated(state.invoices.remove_order(id, order_id).await?))
}

async fn dashboard(
    State(state): State<AppState>,
    _actor: Actor,
) -> ApiResult<Json<DashboardDto>> {
    Ok(Json(state.dashboard.summary().await?))
}
