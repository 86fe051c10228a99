//! Raw provider payload to display record.
//!
//! Everything here is pure. The conversions are deliberately coarse
//! (truncating casts, linear dew point) and must stay that way: the output
//! strings are compared verbatim by consumers.

use crate::model::{DisplayWeather, RawWeatherResponse};

const KELVIN_OFFSET: f64 = 273.15;
const DEFAULT_ICON: &str = "01d";
const UNKNOWN_CONDITION: &str = "Unknown";
const UV_PLACEHOLDER: &str = "0";
const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

pub fn to_display(response: &RawWeatherResponse) -> DisplayWeather {
    let first = response.weather.first();

    // Fields the provider omitted deserialize as empty strings.
    let icon_code = first
        .map(|c| c.icon.as_str())
        .filter(|icon| !icon.is_empty())
        .unwrap_or(DEFAULT_ICON);
    let condition = first
        .map(|c| c.description.as_str())
        .filter(|text| !text.is_empty())
        .map(sentence_case)
        .unwrap_or_else(|| UNKNOWN_CONDITION.to_string());

    let main = &response.main;
    let wind = &response.wind;

    DisplayWeather {
        icon_url: icon_url(icon_code),
        city_name: response.name.clone(),
        country: response.sys.country.clone(),
        temperature: kelvin_to_celsius(main.temp).to_string(),
        feels_like: kelvin_to_celsius(main.feels_like).to_string(),
        condition,
        wind: format!("{} m/s {}", format_decimal(wind.speed), compass_direction(wind.deg)),
        humidity: format!("{}%", main.humidity),
        uv_index: UV_PLACEHOLDER.to_string(),
        dew_point: format!("{}°C", dew_point(main.temp, main.humidity)),
        visibility: format!("{} km", format_decimal(response.visibility as f64 / 1000.0)),
    }
}

pub fn icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}

/// Kelvin to whole Celsius, truncated toward zero.
pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET) as i64
}

/// Linear dew point approximation: `T - (100 - RH) / 5`, truncated.
pub fn dew_point(temp_kelvin: f64, humidity_pct: u8) -> i64 {
    let temp_c = temp_kelvin - KELVIN_OFFSET;
    let spread = (100 - i32::from(humidity_pct)) as f64 / 5.0;
    (temp_c - spread) as i64
}

/// Eight 45° sectors starting at north, using integer division.
pub fn compass_direction(degrees: i32) -> &'static str {
    match (degrees / 45) % 8 {
        idx @ 0..=6 => COMPASS[idx as usize],
        _ => COMPASS[7],
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// Always keeps a fractional digit: 10.0 -> "10.0", 5.66 -> "5.66".
fn format_decimal(value: f64) -> String {
    format!("{value:?}")
}
