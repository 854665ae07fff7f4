//! Elapsed-time computation and per-(state, tense) time adjustment.
//!
//! The adjustment table lives in configuration as data
//! ([`elig_config::TimeCurveTable`]); this module validates elapsed time
//! and evaluates the configured curve. The eligible/past cell additionally
//! consumes the store's denial rate.

use chrono::NaiveDate;
use elig_common::{EligibilityState, Error, Tense};
use elig_config::{CurveSpec, TimeConfig};
use elig_math::{exp_decay, linear_growth};

use crate::store::ObservationStore;

/// Elapsed days between the service date and the evaluation date.
///
/// Future tense counts days from `as_of` to the service date; past tense
/// counts days from the service date to `as_of`. Either direction coming
/// out negative means the tense contradicts the dates and is rejected
/// before any store access. Unknown tense has no elapsed time (0).
pub fn elapsed_days(
    tense: Tense,
    service_date: Option<NaiveDate>,
    as_of: NaiveDate,
) -> Result<f64, Error> {
    let date = match (tense, service_date) {
        (Tense::Unknown, _) => return Ok(0.0),
        (_, Some(date)) => date,
        (_, None) => {
            return Err(Error::MissingServiceDate {
                tense: tense.to_string(),
            })
        }
    };

    let days = match tense {
        Tense::Future => (date - as_of).num_days() as f64,
        Tense::Past => (as_of - date).num_days() as f64,
        Tense::Unknown => unreachable!("handled above"),
    };

    if days < 0.0 {
        return Err(Error::InvalidElapsedTime {
            tense: tense.to_string(),
            days,
        });
    }

    Ok(days)
}

/// Multiplicative time-adjustment factor for one (state, tense) cell.
///
/// Unknown tense is the identity. All factors are clamped non-negative;
/// the curve families themselves cannot go negative, but the clamp holds
/// the invariant against any configured coefficients.
pub fn time_factor(
    store: &dyn ObservationStore,
    config: &TimeConfig,
    state: EligibilityState,
    tense: Tense,
    elapsed: f64,
) -> Result<f64, Error> {
    let Some(curve) = config.curves.curve(state, tense) else {
        return Ok(1.0);
    };

    let factor = match curve {
        CurveSpec::Constant => 1.0,
        CurveSpec::ExpDecay { rate } => exp_decay(rate, elapsed),
        CurveSpec::LinearGrowth { slope } => linear_growth(slope, elapsed),
        CurveSpec::DenialScaledDecay { rate } => {
            let denial = store
                .denial_rate(elapsed, config.denial_window_days)?
                .unwrap_or(0.0)
                .clamp(0.0, 1.0);
            exp_decay(rate, elapsed) * (1.0 - denial)
        }
    };

    Ok(factor.max(0.0))
}
