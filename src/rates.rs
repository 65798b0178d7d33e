//! Biological rate functions of the oospore life cycle.
//!
//! Every function here is pure: the result depends only on the arguments.

use crate::error::NumericError;

/// Coefficients of the hydro-thermal rate denominator `a - b*T + c*T^2`.
const HT_RATE_A: f64 = 1330.1;
const HT_RATE_B: f64 = 116.19;
const HT_RATE_C: f64 = 2.6256;

/// Weibull-type dormancy curve: `exp(-SCALE * exp(-SHAPE * (ht + 1)))`.
const DORMANCY_SCALE: f64 = 15.891;
const DORMANCY_SHAPE: f64 = 0.653;

const SURVIVAL_INTERCEPT: f64 = 5.67;
const SURVIVAL_LINEAR: f64 = 0.47;
const SURVIVAL_QUADRATIC: f64 = 0.01;
const HOURS_PER_DAY: f64 = 24.0;

/// Smallest survival denominator accepted before the rate is treated as a blow-up.
pub const MIN_SURVIVAL_DENOMINATOR: f64 = 1e-9;

/// Hourly hydro-thermal time gained at `temperature` (C).
///
/// Dry leaf litter gates the rate to zero, as does any temperature at or
/// below freezing. The quadratic denominator has no real roots, so the
/// result is always finite.
pub fn hydro_thermal_increment(temperature: f64, leaf_litter_moist: bool) -> f64 {
    if temperature <= 0.0 || !leaf_litter_moist {
        return 0.0;
    }
    1.0 / (HT_RATE_A - HT_RATE_B * temperature + HT_RATE_C * temperature * temperature)
}

/// Fraction of the oospore population that has broken dormancy after
/// accumulating `hydro_thermal_time`.
pub fn dormancy_breaking_fraction(hydro_thermal_time: f64) -> f64 {
    (-DORMANCY_SCALE * (-DORMANCY_SHAPE * (hydro_thermal_time + 1.0)).exp()).exp()
}

/// Hourly increment of sporangia survival pressure.
///
/// Hot, dry hours drive the denominator towards zero and past it; such
/// inputs are outside the model's domain and are reported instead of
/// returning an infinite or negative rate.
pub fn sporangia_survival_rate(
    temperature: f64,
    relative_humidity: f64,
) -> Result<f64, NumericError> {
    let dryness = 1.0 - relative_humidity / 100.0;
    let denominator = SURVIVAL_INTERCEPT - SURVIVAL_LINEAR * temperature * dryness
        + SURVIVAL_QUADRATIC * temperature * dryness * dryness;
    if !denominator.is_finite() || denominator <= MIN_SURVIVAL_DENOMINATOR {
        return Err(NumericError::DegenerateSurvivalDenominator {
            temperature,
            relative_humidity,
            denominator,
        });
    }
    Ok(1.0 / (HOURS_PER_DAY * denominator))
}

/// Share of hours since release that the zoospores spent wet.
pub fn zoospore_survival_fraction(
    hours_after_release: u32,
    wet_hours: u32,
) -> Result<f64, NumericError> {
    if wet_hours == 0 {
        return Err(NumericError::ZeroWetHours);
    }
    Ok(f64::from(hours_after_release) / f64::from(wet_hours))
}

/// Whether a wet period is long and warm enough for leaf infection.
pub fn is_infection_threshold_met(
    wetness_duration_hours: f64,
    mean_temperature: f64,
    threshold: f64,
) -> bool {
    wetness_duration_hours * mean_temperature >= threshold
}
