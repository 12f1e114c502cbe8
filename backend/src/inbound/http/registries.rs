//! Registry API handlers: carriers and distribution centers.
//!
//! ```text
//! POST /api/v1/carriers
//! GET  /api/v1/carriers
//! GET  /api/v1/carriers/{id}/loads
//! POST /api/v1/distribution-centers
//! GET  /api/v1/distribution-centers
//! GET  /api/v1/distribution-centers/{id}/loads
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Carrier, CarrierId, DistributionCenter, DistributionCenterId, DomainError, Load,
    RegistryDraft, RegistryValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registry payload shared by both record kinds.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegistryRequest {
    /// Display name; unique together with `address`.
    pub name: String,
    /// Street address; unique together with `name`.
    pub address: String,
    /// City component.
    pub city: String,
    /// State component.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// Contact phone number.
    pub phone: String,
}

impl TryFrom<RegistryRequest> for RegistryDraft {
    type Error = RegistryValidationError;

    fn try_from(value: RegistryRequest) -> Result<Self, Self::Error> {
        Self::new(
            &value.name,
            &value.address,
            &value.city,
            &value.state,
            &value.zip,
            &value.phone,
        )
    }
}

fn map_registry_validation_error(err: RegistryValidationError) -> DomainError {
    let field = match &err {
        RegistryValidationError::EmptyName => "name",
        RegistryValidationError::EmptyAddress => "address",
        RegistryValidationError::Location(_) => "location",
    };
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a carrier.
#[utoipa::path(
    post,
    path = "/api/v1/carriers",
    request_body = RegistryRequest,
    responses(
        (status = 201, description = "Carrier registered", body = Carrier),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 409, description = "Name and address already registered", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "createCarrier"
)]
#[post("/carriers")]
pub async fn create_carrier(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegistryRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft =
        RegistryDraft::try_from(payload.into_inner()).map_err(map_registry_validation_error)?;
    let carrier = state.registries.create_carrier(owner, &draft).await?;
    Ok(HttpResponse::Created().json(carrier))
}

/// List the caller's carriers.
#[utoipa::path(
    get,
    path = "/api/v1/carriers",
    responses(
        (status = 200, description = "Carriers", body = [Carrier]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "listCarriers"
)]
#[get("/carriers")]
pub async fn list_carriers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Carrier>>> {
    let owner = session.require_user_id()?;
    let carriers = state.registries.list_carriers(owner).await?;
    Ok(web::Json(carriers))
}

/// List loads referencing one carrier.
#[utoipa::path(
    get,
    path = "/api/v1/carriers/{id}/loads",
    params(("id" = i32, Path, description = "Carrier id")),
    responses(
        (status = 200, description = "Loads for the carrier", body = [Load]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such carrier", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "listCarrierLoads"
)]
#[get("/carriers/{id}/loads")]
pub async fn list_carrier_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<Load>>> {
    let owner = session.require_user_id()?;
    let id = CarrierId::new(path.into_inner());
    // Resolve the carrier first so an unknown id is a 404, not an empty list.
    state.registries.carrier(owner, id).await?;
    let loads = state.loads.loads_for_carrier(owner, id).await?;
    Ok(web::Json(loads))
}

/// Register a distribution center.
#[utoipa::path(
    post,
    path = "/api/v1/distribution-centers",
    request_body = RegistryRequest,
    responses(
        (status = 201, description = "Distribution center registered", body = DistributionCenter),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 409, description = "Name and address already registered", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "createDistributionCenter"
)]
#[post("/distribution-centers")]
pub async fn create_distribution_center(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegistryRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft =
        RegistryDraft::try_from(payload.into_inner()).map_err(map_registry_validation_error)?;
    let center = state
        .registries
        .create_distribution_center(owner, &draft)
        .await?;
    Ok(HttpResponse::Created().json(center))
}

/// List the caller's distribution centers.
#[utoipa::path(
    get,
    path = "/api/v1/distribution-centers",
    responses(
        (status = 200, description = "Distribution centers", body = [DistributionCenter]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "listDistributionCenters"
)]
#[get("/distribution-centers")]
pub async fn list_distribution_centers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DistributionCenter>>> {
    let owner = session.require_user_id()?;
    let centers = state.registries.list_distribution_centers(owner).await?;
    Ok(web::Json(centers))
}

/// List loads destined for one distribution center.
#[utoipa::path(
    get,
    path = "/api/v1/distribution-centers/{id}/loads",
    params(("id" = i32, Path, description = "Distribution center id")),
    responses(
        (status = 200, description = "Loads for the center", body = [Load]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such distribution center", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["registries"],
    operation_id = "listDistributionCenterLoads"
)]
#[get("/distribution-centers/{id}/loads")]
pub async fn list_distribution_center_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<Load>>> {
    let owner = session.require_user_id()?;
    let id = DistributionCenterId::new(path.into_inner());
    state.registries.distribution_center(owner, id).await?;
    let loads = state.loads.loads_for_distribution_center(owner, id).await?;
    Ok(web::Json(loads))
}
