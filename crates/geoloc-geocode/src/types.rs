use serde::{Deserialize, Serialize};

/// A resolved place as returned by the geocoding API.
///
/// The ZIP endpoint fills `zip`; the direct endpoint fills `state`. Unknown
/// upstream fields such as `local_names` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

fn default_country() -> String {
    "US".to_string()
}

impl GeoLocation {
    /// "Name (Country)", as shown next to results.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}
