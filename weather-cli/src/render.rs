use weather_core::{DisplayWeather, LastSearch};

pub fn weather(display: &DisplayWeather) -> String {
    let place = if display.country.is_empty() {
        display.city_name.clone()
    } else {
        format!("{}, {}", display.city_name, display.country)
    };

    let rows = [
        ("Temperature", format!("{}°C", display.temperature)),
        ("Feels like", format!("{}°C", display.feels_like)),
        ("Wind", display.wind.clone()),
        ("Humidity", display.humidity.clone()),
        ("UV index", display.uv_index.clone()),
        ("Dew point", display.dew_point.clone()),
        ("Visibility", display.visibility.clone()),
        ("Icon", display.icon_url.clone()),
    ];

    let mut out = format!("{place}\n{}\n", display.condition);
    for (label, value) in rows {
        out.push_str(&format!("  {label:<12} {value}\n"));
    }
    out.trim_end().to_string()
}

pub fn last_search(last: &LastSearch) -> String {
    match &last.state {
        Some(state) => format!("{}, {}", last.city, state),
        None => last.city.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plano() -> DisplayWeather {
        DisplayWeather {
            icon_url: "https://openweathermap.org/img/wn/04d@2x.png".into(),
            city_name: "Plano".into(),
            country: "US".into(),
            temperature: "17".into(),
            feels_like: "18".into(),
            condition: "Overcast clouds".into(),
            wind: "5.66 m/s E".into(),
            humidity: "86%".into(),
            uv_index: "0".into(),
            dew_point: "15°C".into(),
            visibility: "10.0 km".into(),
        }
    }

    #[test]
    fn weather_lists_every_field() {
        let out = weather(&plano());
        let mut lines = out.lines();

        assert_eq!(lines.next(), Some("Plano, US"));
        assert_eq!(lines.next(), Some("Overcast clouds"));
        assert!(out.contains("Temperature  17°C"));
        assert!(out.contains("Dew point    15°C"));
        assert!(out.contains("Visibility   10.0 km"));
        assert!(out.ends_with("04d@2x.png"));
    }

    #[test]
    fn weather_omits_empty_country() {
        let mut display = plano();
        display.country.clear();
        assert!(weather(&display).starts_with("Plano\n"));
    }

    #[test]
    fn last_search_includes_state_when_present() {
        let with_state = LastSearch { city: "Plano".into(), state: Some("TX".into()) };
        let without = LastSearch { city: "Paris".into(), state: None };

        assert_eq!(last_search(&with_state), "Plano, TX");
        assert_eq!(last_search(&without), "Paris");
    }
}
