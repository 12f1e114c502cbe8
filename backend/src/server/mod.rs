//! Server construction and middleware wiring.

mod config;

pub use config::{MileageConfig, ServerConfig};

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::{FixtureMileageSource, MileageSource};
use crate::domain::{KpiService, LoadService, PasswordIdentityService, RegistryService};
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::kpi::get_kpi_report;
use crate::inbound::http::loads::{
    create_load, get_load, get_outcome, list_active_loads, list_delivered_loads, mark_delivered,
    record_outcome, update_pickup_location,
};
use crate::inbound::http::registries::{
    create_carrier, create_distribution_center, list_carrier_loads,
    list_distribution_center_loads, list_carriers, list_distribution_centers,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, logout, signup};
use crate::outbound::mileage::MileageHttpSource;
use crate::outbound::persistence::{
    DieselCarrierRepository, DieselDistributionCenterRepository, DieselFreightStore,
    DieselUserRepository,
};

fn build_mileage_source(config: &ServerConfig) -> std::io::Result<Arc<dyn MileageSource>> {
    match &config.mileage {
        Some(mileage) => {
            let source = MileageHttpSource::with_timeout(
                mileage.endpoint.clone(),
                mileage.api_key.clone(),
                mileage.timeout,
            )
            .map_err(|err| {
                std::io::Error::other(format!("mileage client construction failed: {err}"))
            })?;
            Ok(Arc::new(source))
        }
        None => {
            warn!("no mileage API configured; lookups will report zero miles");
            Ok(Arc::new(FixtureMileageSource::default()))
        }
    }
}

/// Build the handler state from configuration.
///
/// Uses database-backed adapters when a pool is available; otherwise falls
/// back to the in-memory fixtures used by tests and local development.
fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let mileage = build_mileage_source(config)?;

    let Some(pool) = &config.db_pool else {
        warn!("no database configured; state is in-memory and will not survive restarts");
        return Ok(HttpState::fixtures_with_mileage(mileage));
    };

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let carriers = Arc::new(DieselCarrierRepository::new(pool.clone()));
    let centers = Arc::new(DieselDistributionCenterRepository::new(pool.clone()));
    let freight = Arc::new(DieselFreightStore::new(pool.clone()));

    Ok(HttpState {
        identity: Arc::new(PasswordIdentityService::new(users)),
        registries: RegistryService::new(carriers, centers.clone()),
        loads: LoadService::new(freight.clone(), freight.clone(), centers, mileage),
        kpi: KpiService::new(freight),
    })
}

/// Create and start the HTTP server.
///
/// # Errors
///
/// Returns [`std::io::Error`] when adapters cannot be constructed or the
/// listen address cannot be bound.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(signup)
            .service(login)
            .service(logout)
            .service(create_carrier)
            .service(list_carriers)
            .service(list_carrier_loads)
            .service(create_distribution_center)
            .service(list_distribution_centers)
            .service(list_distribution_center_loads)
            .service(create_load)
            .service(list_active_loads)
            .service(list_delivered_loads)
            .service(update_pickup_location)
            .service(mark_delivered)
            .service(record_outcome)
            .service(get_outcome)
            .service(get_load)
            .service(get_kpi_report);

        let app = App::new()
            .app_data(http_state.clone())
            .app_data(server_health_state.clone())
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    Ok(server.run())
}
