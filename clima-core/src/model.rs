/// One geocoding result: a possible match for the user's free-text query.
///
/// Produced fresh per lookup and discarded after the user picks one; never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    /// Opaque identifier assigned by the geocoding provider.
    pub id: String,
    /// Human-readable full place name, e.g. "Lima, Peru".
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Current conditions for a pair of coordinates. Temperatures are metric.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Short text summary, e.g. "clear sky".
    pub description: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}
