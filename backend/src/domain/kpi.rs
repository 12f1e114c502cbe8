//! Delivery KPI aggregation.
//!
//! Six scalar statistics over an owner's delivered outcome rows. Every
//! statistic rounds to two decimals, and every statistic reports `0` when its
//! denominator is zero: a dashboard with no data yet shows zeros, not errors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::error::DomainError;
use super::loads::LoadData;
use super::ports::{FreightPersistenceError, LoadOutcomeRepository};
use super::user::UserId;

/// Aggregate delivery statistics for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
    /// Percentage of delivered loads that arrived on time.
    pub ontime_rate: f64,
    /// Percentage of delivered loads that arrived damaged.
    pub damage_rate: f64,
    /// Percentage of delivered loads with a breakdown in transit.
    pub breakdown_rate: f64,
    /// Average cost per delivered load.
    pub avg_cost_per_load: f64,
    /// Average cost per pallet across delivered loads.
    pub avg_cost_per_pallet: f64,
    /// Average cost per pound across delivered loads.
    pub avg_cost_per_pound: f64,
}

/// Round to two decimal places for display.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounded quotient, with the zero-denominator policy applied.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator)
    }
}

impl KpiReport {
    /// A report with every statistic at zero.
    pub const EMPTY: Self = Self {
        ontime_rate: 0.0,
        damage_rate: 0.0,
        breakdown_rate: 0.0,
        avg_cost_per_load: 0.0,
        avg_cost_per_pallet: 0.0,
        avg_cost_per_pound: 0.0,
    };

    /// Aggregate outcome rows into a report.
    ///
    /// Only rows with `delivered` set participate; undelivered rows are
    /// ignored regardless of how the caller fetched them.
    pub fn from_outcomes(outcomes: &[LoadData]) -> Self {
        let mut delivered: u32 = 0;
        let mut ontime: u32 = 0;
        let mut damaged: u32 = 0;
        let mut brokedown: u32 = 0;
        let mut cost: i64 = 0;
        let mut pallets: i64 = 0;
        let mut weight: i64 = 0;

        for outcome in outcomes.iter().filter(|outcome| outcome.delivered) {
            delivered += 1;
            ontime += u32::from(outcome.ontime);
            damaged += u32::from(outcome.damaged);
            brokedown += u32::from(outcome.brokedown);
            cost += i64::from(outcome.cost);
            pallets += i64::from(outcome.pallets);
            weight += i64::from(outcome.weight);
        }

        let delivered = f64::from(delivered);
        let total_cost = cost as f64;
        Self {
            ontime_rate: ratio(100.0 * f64::from(ontime), delivered),
            damage_rate: ratio(100.0 * f64::from(damaged), delivered),
            breakdown_rate: ratio(100.0 * f64::from(brokedown), delivered),
            avg_cost_per_load: ratio(total_cost, delivered),
            avg_cost_per_pallet: ratio(total_cost, pallets as f64),
            avg_cost_per_pound: ratio(total_cost, weight as f64),
        }
    }
}

fn map_freight_error(error: FreightPersistenceError) -> DomainError {
    match error {
        FreightPersistenceError::Connection { message } => {
            warn!(%message, "freight store unavailable");
            DomainError::service_unavailable("storage is temporarily unavailable, try again")
        }
        FreightPersistenceError::LoadMissing { .. } | FreightPersistenceError::Query { .. } => {
            DomainError::internal(error.to_string())
        }
    }
}

/// KPI use-case over the outcome repository port.
#[derive(Clone)]
pub struct KpiService {
    outcomes: Arc<dyn LoadOutcomeRepository>,
}

impl KpiService {
    /// Create a service over the given repository.
    pub fn new(outcomes: Arc<dyn LoadOutcomeRepository>) -> Self {
        Self { outcomes }
    }

    /// Aggregate the owner's delivered outcomes into a report.
    pub async fn report(&self, owner: UserId) -> Result<KpiReport, DomainError> {
        let outcomes = self
            .outcomes
            .list_delivered_by_owner(owner)
            .await
            .map_err(map_freight_error)?;
        Ok(KpiReport::from_outcomes(&outcomes))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::loads::LoadId;
    use rstest::rstest;

    fn outcome(
        load_id: i32,
        ontime: bool,
        damaged: bool,
        brokedown: bool,
        cost: i32,
        pallets: i32,
        weight: i32,
        delivered: bool,
    ) -> LoadData {
        LoadData {
            load_id: LoadId::new(load_id),
            owner: UserId::new(1),
            ontime,
            damaged,
            brokedown,
            cost,
            pallets,
            weight,
            delivered,
        }
    }

    fn delivered(ontime: bool, cost: i32, pallets: i32, weight: i32) -> LoadData {
        outcome(0, ontime, false, false, cost, pallets, weight, true)
    }

    #[test]
    fn empty_input_reports_zero_everywhere() {
        assert_eq!(KpiReport::from_outcomes(&[]), KpiReport::EMPTY);
    }

    #[test]
    fn zero_denominators_report_zero_not_an_error() {
        // Delivered rows with zero pallets and weight: the per-pallet and
        // per-pound averages fall back to 0 rather than dividing by zero.
        let report = KpiReport::from_outcomes(&[delivered(true, 500, 0, 0)]);
        assert_eq!(report.avg_cost_per_pallet, 0.0);
        assert_eq!(report.avg_cost_per_pound, 0.0);
        assert_eq!(report.avg_cost_per_load, 500.0);
    }

    #[test]
    fn ontime_rate_counts_three_of_four() {
        let rows = [
            delivered(true, 0, 0, 0),
            delivered(true, 0, 0, 0),
            delivered(false, 0, 0, 0),
            delivered(true, 0, 0, 0),
        ];
        assert_eq!(KpiReport::from_outcomes(&rows).ontime_rate, 75.0);
    }

    #[test]
    fn cost_per_pallet_divides_totals() {
        let rows = [
            delivered(true, 100, 2, 0),
            delivered(true, 200, 3, 0),
            delivered(true, 300, 5, 0),
        ];
        // 600 total cost over 10 total pallets.
        assert_eq!(KpiReport::from_outcomes(&rows).avg_cost_per_pallet, 60.0);
    }

    #[test]
    fn repeating_decimals_round_to_two_places() {
        let rows = [
            delivered(true, 0, 0, 0),
            delivered(false, 0, 0, 0),
            delivered(false, 0, 0, 0),
        ];
        // 100 / 3 = 33.333... reported as 33.33.
        assert_eq!(KpiReport::from_outcomes(&rows).ontime_rate, 33.33);
    }

    #[test]
    fn undelivered_rows_are_excluded() {
        let rows = [
            delivered(true, 100, 1, 100),
            outcome(9, true, true, true, 9999, 99, 9999, false),
        ];
        let report = KpiReport::from_outcomes(&rows);
        assert_eq!(report.ontime_rate, 100.0);
        assert_eq!(report.avg_cost_per_load, 100.0);
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[(250, 2000), (350, 2500)], 0.13)]
    fn cost_per_pound_rounds_to_cents(#[case] rows: &[(i32, i32)], #[case] expected: f64) {
        let rows: Vec<LoadData> = rows
            .iter()
            .map(|&(cost, weight)| delivered(false, cost, 0, weight))
            .collect();
        // 600 / 4500 = 0.1333... reported as 0.13.
        assert_eq!(KpiReport::from_outcomes(&rows).avg_cost_per_pound, expected);
    }

    #[tokio::test]
    async fn service_aggregates_owner_scoped_delivered_rows() {
        use crate::domain::ports::FixtureFreightStore;
        use crate::domain::ports::LoadRepository;
        use crate::domain::loads::{LoadDraft, LoadOutcomeDraft};
        use crate::domain::location::Miles;
        use crate::domain::registry::{CarrierId, DistributionCenterId};

        let store = Arc::new(FixtureFreightStore::default());
        let owner = UserId::new(1);
        let draft = LoadDraft::new(
            "PO-1",
            "Run",
            "Austin",
            "TX",
            None,
            None,
            0,
            false,
            CarrierId::new(1),
            DistributionCenterId::new(1),
        )
        .expect("valid draft");

        let load = store
            .create_with_outcome(owner, &draft, Miles::ZERO)
            .await
            .expect("create succeeds");
        store
            .record(
                owner,
                load.id,
                &LoadOutcomeDraft::new(true, false, false, 400, 4, 8000).expect("valid"),
            )
            .await
            .expect("record succeeds");
        store
            .mark_delivered(owner, load.id)
            .await
            .expect("mark succeeds");

        let service = KpiService::new(store);
        let report = service.report(owner).await.expect("report succeeds");
        assert_eq!(report.ontime_rate, 100.0);
        assert_eq!(report.avg_cost_per_load, 400.0);
        assert_eq!(report.avg_cost_per_pallet, 100.0);
        assert_eq!(report.avg_cost_per_pound, 0.05);

        let empty = service.report(UserId::new(2)).await.expect("report");
        assert_eq!(empty, KpiReport::EMPTY);
    }
}
