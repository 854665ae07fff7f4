//! Waterfall (backoff) lookup against the observation store.
//!
//! The seven specificity levels are a precomputed ordered list of
//! dimension projections, so level selection is a linear scan with an
//! early exit rather than recursive conditionals. Level 6 keeps all six
//! schema dimensions; each step down drops the next entry in
//! [`Dimension::DROP_ORDER`]; level 0 is the empty filter (global
//! average), which always exists, so the lookup never fails on sparse
//! data — only on store failure.

use elig_common::{Dimension, DimensionSet, EligibilityState, Error};
use elig_config::WaterfallConfig;
use elig_math::{sample_confidence, shrink_rate};
use tracing::debug;

use crate::store::{Observation, ObservationStore};

/// One specificity level in the backoff chain.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallLevel {
    /// Number of schema dimensions retained at this level (6 down to 0).
    pub level: usize,
    /// The case dimensions projected onto this level's retained schema.
    pub dimensions: DimensionSet,
}

/// Result of a waterfall lookup for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLookup {
    /// Smoothed probability after Bayesian shrinkage toward the prior.
    pub probability: f64,
    /// Raw empirical rate at the selected level, before shrinkage.
    pub raw_rate: f64,
    /// Matching sample size at the selected level.
    pub sample_size: u64,
    /// Sample-size confidence at the selected level.
    pub confidence: f64,
    /// Selected specificity level (6 = fully specific, 0 = global).
    pub level: usize,
    /// The dimension filter actually queried at the selected level.
    pub dimensions: DimensionSet,
}

/// Build the ordered backoff chain for a dimension set.
///
/// Projecting a sparse set yields identical adjacent levels; duplicates
/// are collapsed keeping the most specific level index, so reported
/// levels stay faithful without repeat queries. The chain always ends at
/// level 0 (empty filter).
pub fn waterfall_levels(dimensions: &DimensionSet) -> Vec<WaterfallLevel> {
    let mut levels: Vec<WaterfallLevel> = Vec::with_capacity(Dimension::ALL.len() + 1);

    for retained in (0..=Dimension::ALL.len()).rev() {
        let dropped = Dimension::ALL.len() - retained;
        let keep: Vec<Dimension> = Dimension::ALL
            .iter()
            .copied()
            .filter(|d| !Dimension::DROP_ORDER[..dropped].contains(d))
            .collect();
        let projected = dimensions.project(&keep);

        match levels.last() {
            Some(last) if last.dimensions == projected => {}
            _ => levels.push(WaterfallLevel {
                level: retained,
                dimensions: projected,
            }),
        }
    }

    levels
}

/// Look up the historical rate for one state, backing off across levels.
///
/// Selects the most specific level whose confidence exceeds
/// `min_confidence` and whose sample size reaches `min_sample_size`; when
/// no level qualifies, the level-0 global average is used regardless of
/// its confidence. The selected rate is then shrunk toward the prior.
/// Store errors propagate unchanged — insufficient data backs off, a
/// failing store never does.
pub fn lookup_state_rate(
    store: &dyn ObservationStore,
    state: EligibilityState,
    dimensions: &DimensionSet,
    config: &WaterfallConfig,
) -> Result<RateLookup, Error> {
    let levels = waterfall_levels(dimensions);

    let mut fallback: Option<(usize, DimensionSet, Observation, f64)> = None;

    for level in &levels {
        let observation = store.query(state, &level.dimensions)?;
        let confidence = sample_confidence(
            observation.sample_size,
            config.confidence_cap,
            config.confidence_divisor,
        );

        if confidence > config.min_confidence && observation.sample_size >= config.min_sample_size
        {
            debug!(
                state = %state,
                level = level.level,
                filter = %level.dimensions.canonical_key(),
                sample_size = observation.sample_size,
                confidence,
                "waterfall level selected"
            );
            return Ok(finish_lookup(
                level.level,
                level.dimensions.clone(),
                observation,
                confidence,
                config,
            ));
        }

        // The last level scanned is level 0; remember it as the fallback.
        fallback = Some((
            level.level,
            level.dimensions.clone(),
            observation,
            confidence,
        ));
    }

    // No level qualified: global average, whatever its confidence.
    let (level, dims, observation, confidence) =
        fallback.expect("waterfall chain is never empty");
    debug!(
        state = %state,
        sample_size = observation.sample_size,
        confidence,
        "no waterfall level qualified; using global average"
    );
    Ok(finish_lookup(level, dims, observation, confidence, config))
}

fn finish_lookup(
    level: usize,
    dimensions: DimensionSet,
    observation: Observation,
    confidence: f64,
    config: &WaterfallConfig,
) -> RateLookup {
    let probability = shrink_rate(
        observation.sample_size,
        observation.rate,
        config.prior_weight,
        config.prior_rate,
    );
    RateLookup {
        probability,
        raw_rate: observation.rate,
        sample_size: observation.sample_size,
        confidence,
        level,
        dimensions,
    }
}
