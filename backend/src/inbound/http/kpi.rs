//! KPI API handler.

use actix_web::{get, web};

use crate::domain::{DomainError, KpiReport};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Aggregate delivery statistics for the caller's delivered loads.
///
/// Every statistic reports `0` when the caller has no matching data yet.
#[utoipa::path(
    get,
    path = "/api/v1/kpi",
    responses(
        (status = 200, description = "Delivery statistics", body = KpiReport),
        (status = 401, description = "Unauthorised", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["kpi"],
    operation_id = "getKpiReport"
)]
#[get("/kpi")]
pub async fn get_kpi_report(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<KpiReport>> {
    let owner = session.require_user_id()?;
    let report = state.kpi.report(owner).await?;
    Ok(web::Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};

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
                    .service(get_kpi_report),
            )
    }

    #[actix_web::test]
    async fn fresh_account_reports_zeros() {
        let app = actix_test::init_service(app(web::Data::new(HttpState::fixtures()))).await;

        let signup = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(crate::inbound::http::users::CredentialsRequest {
                    username: "dispatcher".into(),
                    password: "hunter2".into(),
                })
                .to_request(),
        )
        .await;
        let cookie = signup
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/kpi")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let report: KpiReport = actix_test::read_body_json(response).await;
        assert_eq!(report, KpiReport::EMPTY);
    }

    #[actix_web::test]
    async fn anonymous_requests_are_rejected() {
        let app = actix_test::init_service(app(web::Data::new(HttpState::fixtures()))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/kpi").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
