//! Acceleration from consecutive speed samples

/// km/h to m/s
pub const KMH_TO_MS: f64 = 1000.0 / 3600.0;

/// Linear acceleration in m/s² between two speed samples in km/h
///
/// Returns `0.0` when there is no previous sample or `elapsed_secs` is not
/// strictly positive.
pub fn acceleration(prev_kmh: Option<f64>, current_kmh: f64, elapsed_secs: f64) -> f64 {
    let Some(prev_kmh) = prev_kmh else {
        return 0.0;
    };
    if elapsed_secs <= 0.0 {
        return 0.0;
    }

    (current_kmh * KMH_TO_MS - prev_kmh * KMH_TO_MS) / elapsed_secs
}
