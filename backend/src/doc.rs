//! OpenAPI document exposed by Swagger UI and tooling.

use utoipa::OpenApi;

use crate::domain::{
    Carrier, DistributionCenter, DomainError, ErrorCode, KpiReport, Load, LoadData,
};
use crate::inbound::http::loads::{LoadRequest, OutcomeRequest, PickupRequest};
use crate::inbound::http::registries::RegistryRequest;
use crate::inbound::http::users::{CredentialsRequest, SessionUserResponse};

/// Public OpenAPI surface for the freight ledger API.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::registries::create_carrier,
        crate::inbound::http::registries::list_carriers,
        crate::inbound::http::registries::list_carrier_loads,
        crate::inbound::http::registries::create_distribution_center,
        crate::inbound::http::registries::list_distribution_centers,
        crate::inbound::http::registries::list_distribution_center_loads,
        crate::inbound::http::loads::create_load,
        crate::inbound::http::loads::list_active_loads,
        crate::inbound::http::loads::list_delivered_loads,
        crate::inbound::http::loads::get_load,
        crate::inbound::http::loads::update_pickup_location,
        crate::inbound::http::loads::mark_delivered,
        crate::inbound::http::loads::record_outcome,
        crate::inbound::http::loads::get_outcome,
        crate::inbound::http::kpi::get_kpi_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CredentialsRequest,
        SessionUserResponse,
        RegistryRequest,
        LoadRequest,
        PickupRequest,
        OutcomeRequest,
        Carrier,
        DistributionCenter,
        Load,
        LoadData,
        KpiReport,
        DomainError,
        ErrorCode,
    )),
    tags(
        (name = "identity", description = "Signup, login, logout"),
        (name = "registries", description = "Carriers and distribution centers"),
        (name = "loads", description = "Load lifecycle and delivery outcomes"),
        (name = "kpi", description = "Aggregate delivery statistics"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_includes_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/signup",
            "/api/v1/login",
            "/api/v1/carriers",
            "/api/v1/distribution-centers",
            "/api/v1/loads",
            "/api/v1/loads/{id}/outcome",
            "/api/v1/kpi",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
