/// Months covered by a projection
pub const PROJECTION_MONTHS: i32 = 12;

/// Month-over-month multiplier for a growth percentage
pub fn growth_factor(monthly_growth_percent: f64) -> f64 {
    1.0 + monthly_growth_percent / 100.0
}

/// Sum of twelve months starting at `current` and compounding by `factor`.
///
/// A factor of exactly 1 (or a non-finite one) is the flat case and is
/// summed linearly, so the geometric form never divides by zero.
pub fn project_with_factor(current: f64, factor: f64) -> f64 {
    if factor == 1.0 || !factor.is_finite() {
        return current * PROJECTION_MONTHS as f64;
    }
    current * (factor.powi(PROJECTION_MONTHS) - 1.0) / (factor - 1.0)
}

/// Twelve-month spend for a monthly cost growing by `monthly_growth_percent`.
///
/// Zero, negative, or non-finite growth projects linearly.
pub fn project_twelve_months(current: f64, monthly_growth_percent: f64) -> f64 {
    if monthly_growth_percent > 0.0 && monthly_growth_percent.is_finite() {
        project_with_factor(current, growth_factor(monthly_growth_percent))
    } else {
        current * PROJECTION_MONTHS as f64
    }
}
