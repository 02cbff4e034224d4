//! Plain-text rendering of the dashboard for the terminal.

use dashboard_core::{
    View,
    render::{CurrentPanel, capitalize, rounded},
};

pub fn print_view(view: &View) {
    match &view.current {
        CurrentPanel::Empty => {}
        CurrentPanel::Loading { city } => println!("Loading weather for {city}..."),
        CurrentPanel::Error { message } => println!("{message}"),
        CurrentPanel::Populated { weather, observed_at } => {
            println!();
            println!(
                "{}, {}  ({})",
                weather.city_name,
                weather.country_code,
                observed_at.format("%a, %b %-d, %-I:%M %p")
            );
            println!(
                "  {}°F, feels like {}°F",
                rounded(weather.temperature_f),
                rounded(weather.feels_like_f)
            );
            println!(
                "  {} | Humidity: {}% | Wind: {} mph",
                capitalize(&weather.condition),
                weather.humidity_pct,
                rounded(weather.wind_speed_mph)
            );
        }
    }

    if !view.forecast.days.is_empty() {
        println!();
        println!("5-day forecast:");
        for day in &view.forecast.days {
            println!(
                "  {:<12} {:>4}°F  feels {:>4}°F  {:>3}%  {}",
                day.timestamp.format("%a, %b %-d").to_string(),
                rounded(day.temperature_f),
                rounded(day.feels_like_f),
                day.humidity_pct,
                capitalize(&day.condition),
            );
        }
    }
    println!();
}

pub fn print_history(cities: &[String]) {
    if cities.is_empty() {
        println!("No recent searches.");
        return;
    }

    for (idx, city) in cities.iter().enumerate() {
        println!("{:>2}. {city}", idx + 1);
    }
}
