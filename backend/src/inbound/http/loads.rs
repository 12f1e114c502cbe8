//! Load API handlers: lifecycle and delivery outcomes.
//!
//! ```text
//! POST /api/v1/loads
//! GET  /api/v1/loads/active
//! GET  /api/v1/loads/delivered
//! GET  /api/v1/loads/{id}
//! PUT  /api/v1/loads/{id}/pickup
//! POST /api/v1/loads/{id}/delivered
//! PUT  /api/v1/loads/{id}/outcome
//! GET  /api/v1/loads/{id}/outcome
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    CarrierId, DistributionCenterId, DomainError, Load, LoadData, LoadDraft, LoadId,
    LoadOutcomeDraft, LoadValidationError, Location, LocationValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Shipment payload for `POST /api/v1/loads`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    /// Purchase-order number.
    pub po: String,
    /// Display name for the shipment.
    pub name: String,
    /// Pickup city.
    pub pickup_city: String,
    /// Pickup state.
    pub pickup_state: String,
    /// Delivery due date, when scheduled.
    pub due_date: Option<NaiveDate>,
    /// Scheduled day of week, when known.
    pub day_of_week: Option<String>,
    /// Trailer temperature setting.
    pub temperature: i32,
    /// Whether a driver team is required.
    pub team: bool,
    /// Referenced carrier.
    pub carrier_id: i32,
    /// Referenced distribution center.
    pub distribution_center_id: i32,
}

impl TryFrom<LoadRequest> for LoadDraft {
    type Error = LoadValidationError;

    fn try_from(value: LoadRequest) -> Result<Self, Self::Error> {
        Self::new(
            &value.po,
            &value.name,
            &value.pickup_city,
            &value.pickup_state,
            value.due_date,
            value.day_of_week.as_deref(),
            value.temperature,
            value.team,
            CarrierId::new(value.carrier_id),
            DistributionCenterId::new(value.distribution_center_id),
        )
    }
}

/// Pickup-location payload for `PUT /api/v1/loads/{id}/pickup`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    /// New pickup city.
    pub city: String,
    /// New pickup state.
    pub state: String,
}

/// Outcome payload for `PUT /api/v1/loads/{id}/outcome`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRequest {
    /// Delivered on time.
    pub ontime: bool,
    /// Freight arrived damaged.
    pub damaged: bool,
    /// Truck broke down in transit.
    pub brokedown: bool,
    /// Total cost for the load.
    pub cost: i32,
    /// Pallet count.
    pub pallets: i32,
    /// Total weight in pounds.
    pub weight: i32,
}

impl TryFrom<OutcomeRequest> for LoadOutcomeDraft {
    type Error = LoadValidationError;

    fn try_from(value: OutcomeRequest) -> Result<Self, Self::Error> {
        Self::new(
            value.ontime,
            value.damaged,
            value.brokedown,
            value.cost,
            value.pallets,
            value.weight,
        )
    }
}

fn map_load_validation_error(err: LoadValidationError) -> DomainError {
    let field = match &err {
        LoadValidationError::EmptyPo => "po",
        LoadValidationError::EmptyName => "name",
        LoadValidationError::Pickup(_) => "pickup",
        LoadValidationError::NegativeOutcomeValue { field, .. } => *field,
    };
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_location_validation_error(err: LocationValidationError) -> DomainError {
    DomainError::invalid_request(err.to_string()).with_details(json!({ "field": "pickup" }))
}

/// Create a load and its paired outcome record.
#[utoipa::path(
    post,
    path = "/api/v1/loads",
    request_body = LoadRequest,
    responses(
        (status = 201, description = "Load created", body = Load),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such distribution center", body = DomainError),
        (status = 503, description = "Mileage lookup unavailable", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "createLoad"
)]
#[post("/loads")]
pub async fn create_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoadRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = LoadDraft::try_from(payload.into_inner()).map_err(map_load_validation_error)?;
    let load = state.loads.create_load(owner, &draft).await?;
    Ok(HttpResponse::Created().json(load))
}

/// List the caller's undelivered loads.
#[utoipa::path(
    get,
    path = "/api/v1/loads/active",
    responses(
        (status = 200, description = "Active loads", body = [Load]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "listActiveLoads"
)]
#[get("/loads/active")]
pub async fn list_active_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Load>>> {
    let owner = session.require_user_id()?;
    let loads = state.loads.list_active(owner).await?;
    Ok(web::Json(loads))
}

/// List the caller's delivered loads.
#[utoipa::path(
    get,
    path = "/api/v1/loads/delivered",
    responses(
        (status = 200, description = "Delivered loads", body = [Load]),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "listDeliveredLoads"
)]
#[get("/loads/delivered")]
pub async fn list_delivered_loads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Load>>> {
    let owner = session.require_user_id()?;
    let loads = state.loads.list_delivered(owner).await?;
    Ok(web::Json(loads))
}

/// Fetch one load.
#[utoipa::path(
    get,
    path = "/api/v1/loads/{id}",
    params(("id" = i32, Path, description = "Load id")),
    responses(
        (status = 200, description = "The load", body = Load),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such load", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "getLoad"
)]
#[get("/loads/{id}")]
pub async fn get_load(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Load>> {
    let owner = session.require_user_id()?;
    let load = state
        .loads
        .load(owner, LoadId::new(path.into_inner()))
        .await?;
    Ok(web::Json(load))
}

/// Edit the pickup location, re-resolving mileage.
#[utoipa::path(
    put,
    path = "/api/v1/loads/{id}/pickup",
    params(("id" = i32, Path, description = "Load id")),
    request_body = PickupRequest,
    responses(
        (status = 200, description = "Updated load", body = Load),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such load", body = DomainError),
        (status = 503, description = "Mileage lookup unavailable", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "updatePickupLocation"
)]
#[put("/loads/{id}/pickup")]
pub async fn update_pickup_location(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<PickupRequest>,
) -> ApiResult<web::Json<Load>> {
    let owner = session.require_user_id()?;
    let payload = payload.into_inner();
    let pickup =
        Location::new(&payload.city, &payload.state).map_err(map_location_validation_error)?;
    let load = state
        .loads
        .update_pickup_location(owner, LoadId::new(path.into_inner()), &pickup)
        .await?;
    Ok(web::Json(load))
}

/// Mark the load delivered, flipping both paired flags.
#[utoipa::path(
    post,
    path = "/api/v1/loads/{id}/delivered",
    params(("id" = i32, Path, description = "Load id")),
    responses(
        (status = 204, description = "Load marked delivered"),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such load", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "markDelivered"
)]
#[post("/loads/{id}/delivered")]
pub async fn mark_delivered(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    state
        .loads
        .mark_delivered(owner, LoadId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record the delivery outcome for a load.
#[utoipa::path(
    put,
    path = "/api/v1/loads/{id}/outcome",
    params(("id" = i32, Path, description = "Load id")),
    request_body = OutcomeRequest,
    responses(
        (status = 204, description = "Outcome recorded"),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such load", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "recordOutcome"
)]
#[put("/loads/{id}/outcome")]
pub async fn record_outcome(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<OutcomeRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let outcome =
        LoadOutcomeDraft::try_from(payload.into_inner()).map_err(map_load_validation_error)?;
    state
        .loads
        .record_outcome(owner, LoadId::new(path.into_inner()), &outcome)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Fetch the delivery outcome for a load.
#[utoipa::path(
    get,
    path = "/api/v1/loads/{id}/outcome",
    params(("id" = i32, Path, description = "Load id")),
    responses(
        (status = 200, description = "The outcome record", body = LoadData),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 404, description = "No such load", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["loads"],
    operation_id = "getOutcome"
)]
#[get("/loads/{id}/outcome")]
pub async fn get_outcome(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<LoadData>> {
    let owner = session.require_user_id()?;
    let load_id = LoadId::new(path.into_inner());
    let outcome = state
        .loads
        .outcome(owner, load_id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("load {load_id} not found")))?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixtureMileageSource;
    use crate::domain::Miles;
    use crate::inbound::http::registries::RegistryRequest;
    use crate::inbound::http::users::CredentialsRequest;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use std::sync::Arc;

    fn app(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(crate::inbound::http::users::signup)
                    .service(crate::inbound::http::registries::create_distribution_center)
                    .service(crate::inbound::http::registries::create_carrier)
                    .service(create_load)
                    .service(list_active_loads)
                    .service(list_delivered_loads)
                    .service(get_load)
                    .service(update_pickup_location)
                    .service(mark_delivered)
                    .service(record_outcome)
                    .service(get_outcome),
            )
    }

    struct Session {
        cookie: actix_web::cookie::Cookie<'static>,
    }

    async fn signup<S, B>(app: &S) -> Session
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
        B: actix_web::body::MessageBody,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(CredentialsRequest {
                    username: "dispatcher".into(),
                    password: "hunter2".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        Session {
            cookie: response
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .expect("session cookie set")
                .into_owned(),
        }
    }

    async fn seed_references<S, B>(app: &S, session: &Session) -> (i32, i32)
    where
        S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
        B: actix_web::body::MessageBody,
    {
        let carrier = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/carriers")
                .cookie(session.cookie.clone())
                .set_json(RegistryRequest {
                    name: "Acme Freight".into(),
                    address: "12 Dock Rd".into(),
                    city: "Austin".into(),
                    state: "TX".into(),
                    zip: "78701".into(),
                    phone: "555-0100".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(carrier.status(), StatusCode::CREATED);
        let carrier: serde_json::Value = actix_test::read_body_json(carrier).await;

        let center = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/distribution-centers")
                .cookie(session.cookie.clone())
                .set_json(RegistryRequest {
                    name: "North DC".into(),
                    address: "1 North Rd".into(),
                    city: "Dallas".into(),
                    state: "TX".into(),
                    zip: "75201".into(),
                    phone: "555-0200".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(center.status(), StatusCode::CREATED);
        let center: serde_json::Value = actix_test::read_body_json(center).await;

        (
            carrier
                .get("id")
                .and_then(serde_json::Value::as_i64)
                .expect("carrier id") as i32,
            center
                .get("id")
                .and_then(serde_json::Value::as_i64)
                .expect("center id") as i32,
        )
    }

    fn load_json(carrier_id: i32, center_id: i32) -> LoadRequest {
        LoadRequest {
            po: "PO-991".into(),
            name: "Produce run".into(),
            pickup_city: "Austin".into(),
            pickup_state: "TX".into(),
            due_date: None,
            day_of_week: Some("Friday".into()),
            temperature: 34,
            team: false,
            carrier_id,
            distribution_center_id: center_id,
        }
    }

    #[actix_web::test]
    async fn created_load_carries_looked_up_miles_and_zero_outcome() {
        let state = web::Data::new(HttpState::fixtures_with_mileage(Arc::new(
            FixtureMileageSource::returning(Miles::new(195)),
        )));
        let app = actix_test::init_service(app(state)).await;
        let session = signup(&app).await;
        let (carrier_id, center_id) = seed_references(&app, &session).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/loads")
                .cookie(session.cookie.clone())
                .set_json(load_json(carrier_id, center_id))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        let load: Load = actix_test::read_body_json(created).await;
        assert_eq!(load.miles, Miles::new(195));
        assert!(!load.delivered);

        let outcome = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/loads/{}/outcome", load.id))
                .cookie(session.cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(outcome.status(), StatusCode::OK);
        let outcome: LoadData = actix_test::read_body_json(outcome).await;
        assert_eq!((outcome.cost, outcome.pallets, outcome.weight), (0, 0, 0));
    }

    #[actix_web::test]
    async fn delivered_loads_move_between_listings() {
        let state = web::Data::new(HttpState::fixtures());
        let app = actix_test::init_service(app(state)).await;
        let session = signup(&app).await;
        let (carrier_id, center_id) = seed_references(&app, &session).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/loads")
                .cookie(session.cookie.clone())
                .set_json(load_json(carrier_id, center_id))
                .to_request(),
        )
        .await;
        let load: Load = actix_test::read_body_json(created).await;

        let marked = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/loads/{}/delivered", load.id))
                .cookie(session.cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(marked.status(), StatusCode::NO_CONTENT);

        let active = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/loads/active")
                .cookie(session.cookie.clone())
                .to_request(),
        )
        .await;
        let active: Vec<Load> = actix_test::read_body_json(active).await;
        assert!(active.is_empty());

        let delivered = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/loads/delivered")
                .cookie(session.cookie.clone())
                .to_request(),
        )
        .await;
        let delivered: Vec<Load> = actix_test::read_body_json(delivered).await;
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].delivered);
    }

    #[actix_web::test]
    async fn unknown_load_is_not_found() {
        let state = web::Data::new(HttpState::fixtures());
        let app = actix_test::init_service(app(state)).await;
        let session = signup(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/loads/99/delivered")
                .cookie(session.cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn negative_outcome_values_are_bad_requests() {
        let state = web::Data::new(HttpState::fixtures());
        let app = actix_test::init_service(app(state)).await;
        let session = signup(&app).await;
        let (carrier_id, center_id) = seed_references(&app, &session).await;

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/loads")
                .cookie(session.cookie.clone())
                .set_json(load_json(carrier_id, center_id))
                .to_request(),
        )
        .await;
        let load: Load = actix_test::read_body_json(created).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/loads/{}/outcome", load.id))
                .cookie(session.cookie.clone())
                .set_json(OutcomeRequest {
                    ontime: true,
                    damaged: false,
                    brokedown: false,
                    cost: -5,
                    pallets: 1,
                    weight: 100,
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
