use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// What to ask the provider for: a free-text place or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Text(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Build a `"City,State,Country"` query, skipping absent or blank state
    /// and country. The city is mandatory; callers reject a blank one first.
    pub fn from_parts(city: &str, state: Option<&str>, country: &str) -> Self {
        let joined = [Some(city), state, Some(country)]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        LocationQuery::Text(joined)
    }

    /// Query-string pairs identifying the location for the provider.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::Text(q) => vec![("q", q.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::Text(q) => f.write_str(q),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat},{lon}"),
        }
    }
}

/// Current-weather payload as returned by `/data/2.5/weather`.
///
/// Temperatures are Kelvin (no `units` parameter is sent).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawWeatherResponse {
    #[serde(default)]
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: MainMeasurements,
    #[serde(default)]
    pub visibility: i64,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub timezone: i64,
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default = "default_cod", deserialize_with = "deserialize_cod")]
    pub cod: i64,
}

impl RawWeatherResponse {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MainMeasurements {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: i64,
    pub humidity: u8,
    #[serde(default)]
    pub sea_level: Option<i64>,
    #[serde(default)]
    pub grnd_level: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: i32,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Sys {
    #[serde(default, rename = "type")]
    pub kind: Option<i64>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub sunrise: i64,
    #[serde(default)]
    pub sunset: i64,
}

/// The in-band status every provider body carries, success or not.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusEnvelope {
    #[serde(default = "default_cod", deserialize_with = "deserialize_cod")]
    pub cod: i64,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_cod() -> i64 {
    200
}

// The provider sends `cod` as a number on success and as a string on errors.
fn deserialize_cod<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cod {
        Num(i64),
        Text(String),
    }

    match Cod::deserialize(deserializer)? {
        Cod::Num(n) => Ok(n),
        Cod::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Display-ready record rendered from a [`RawWeatherResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWeather {
    pub icon_url: String,
    pub city_name: String,
    pub country: String,
    pub temperature: String,
    pub feels_like: String,
    pub condition: String,
    pub wind: String,
    pub humidity: String,
    pub uv_index: String,
    pub dew_point: String,
    pub visibility: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_joins_all_present_parts() {
        let q = LocationQuery::from_parts("Plano", Some("TX"), "US");
        assert_eq!(q, LocationQuery::Text("Plano,TX,US".into()));
    }

    #[test]
    fn from_parts_skips_missing_state_and_blank_country() {
        assert_eq!(
            LocationQuery::from_parts("Plano", None, "US"),
            LocationQuery::Text("Plano,US".into())
        );
        assert_eq!(
            LocationQuery::from_parts("Plano", None, ""),
            LocationQuery::Text("Plano".into())
        );
        assert_eq!(
            LocationQuery::from_parts("Plano", Some(" "), "US"),
            LocationQuery::Text("Plano,US".into())
        );
    }

    #[test]
    fn coordinates_produce_lat_lon_pairs_only() {
        let q = LocationQuery::Coordinates { lat: 33.02, lon: -96.7 };
        let pairs = q.query_pairs();
        assert_eq!(pairs, vec![("lat", "33.02".to_string()), ("lon", "-96.7".to_string())]);
    }

    #[test]
    fn parses_full_payload() {
        let body = r#"{
            "coord": {"lon": -96.6989, "lat": 33.0198},
            "weather": [{"id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d"}],
            "base": "stations",
            "main": {"temp": 291.13, "feels_like": 291.23, "temp_min": 289.91, "temp_max": 292.75,
                     "pressure": 1018, "humidity": 86, "sea_level": 1018, "grnd_level": 997},
            "visibility": 10000,
            "wind": {"speed": 5.66, "deg": 100, "gust": 8.23},
            "clouds": {"all": 100},
            "dt": 1730998974,
            "sys": {"type": 2, "id": 2009819, "country": "US", "sunrise": 1730983840, "sunset": 1731022224},
            "timezone": -21600,
            "id": 4719457,
            "name": "Plano",
            "cod": 200
        }"#;

        let parsed: RawWeatherResponse = serde_json::from_str(body).expect("valid payload");
        assert_eq!(parsed.name, "Plano");
        assert_eq!(parsed.weather[0].icon, "04d");
        assert_eq!(parsed.sys.kind, Some(2));
        assert_eq!(parsed.wind.gust, Some(8.23));
        assert_eq!(parsed.main.grnd_level, Some(997));
        assert_eq!(parsed.cod, 200);
        assert_eq!(
            parsed.observed_at().map(|t| t.timestamp()),
            Some(1_730_998_974)
        );
    }

    #[test]
    fn optional_blocks_default_when_missing() {
        let body = r#"{"main": {"temp": 280.0, "feels_like": 279.0, "humidity": 50}, "name": "Nowhere"}"#;
        let parsed: RawWeatherResponse = serde_json::from_str(body).expect("minimal payload");

        assert!(parsed.weather.is_empty());
        assert_eq!(parsed.visibility, 0);
        assert_eq!(parsed.wind, Wind::default());
        assert_eq!(parsed.sys.country, "");
        assert_eq!(parsed.cod, 200);
    }

    #[test]
    fn cod_accepts_numeric_strings() {
        let body = r#"{"main": {"temp": 1.0, "feels_like": 1.0, "humidity": 1}, "name": "x", "cod": "404"}"#;
        let parsed: RawWeatherResponse = serde_json::from_str(body).expect("string cod");
        assert_eq!(parsed.cod, 404);
    }

    #[test]
    fn missing_main_block_is_rejected() {
        let body = r#"{"name": "Plano"}"#;
        assert!(serde_json::from_str::<RawWeatherResponse>(body).is_err());
    }
}
