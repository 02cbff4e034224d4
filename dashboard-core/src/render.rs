//! HTML rendering for the dashboard regions.
//!
//! Everything that ends up in the page is a [`Markup`]. A `Markup` can only be
//! built from static literals or through `markup!`, which escapes every
//! interpolated value unless it is already `Markup`.

use chrono::{DateTime, Local};
use std::fmt::{self, Write as _};

use crate::model::{CurrentWeather, ForecastSample};

/// HTML that is safe to insert into the page as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted, compile-time HTML.
    pub fn literal(html: &'static str) -> Self {
        Self(html.to_string())
    }

    /// Used by `markup!`; every dynamic part has already gone through [`Render`].
    ///
    /// Not reachable from outside the crate:
    ///
    /// ```compile_fail
    /// let html = dashboard_core::Markup::from_escaped("<script>".to_string());
    /// ```
    pub(crate) fn from_escaped(html: String) -> Self {
        Self(html)
    }

    pub fn push(&mut self, other: Markup) {
        self.0.push_str(&other.0);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromIterator<Markup> for Markup {
    fn from_iter<I: IntoIterator<Item = Markup>>(iter: I) -> Self {
        let mut out = Markup::new();
        for m in iter {
            out.push(m);
        }
        out
    }
}

/// A value that can be interpolated into [`Markup`].
pub trait Render {
    fn render_to(&self, out: &mut String);
}

impl Render for Markup {
    fn render_to(&self, out: &mut String) {
        out.push_str(&self.0);
    }
}

impl Render for str {
    fn render_to(&self, out: &mut String) {
        escape_into(self, out);
    }
}

impl Render for String {
    fn render_to(&self, out: &mut String) {
        escape_into(self, out);
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render_to(&self, out: &mut String) {
        (**self).render_to(out);
    }
}

macro_rules! render_numbers {
    ($($ty:ty),*) => {
        $(impl Render for $ty {
            fn render_to(&self, out: &mut String) {
                let _ = write!(out, "{self}");
            }
        })*
    };
}

render_numbers!(u8, u32, i64, usize);

/// Adapter so `format!` routes each argument through [`Render`].
pub(crate) struct Rendered<'a, T: ?Sized>(pub &'a T);

impl<T: Render + ?Sized> fmt::Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.0.render_to(&mut out);
        f.write_str(&out)
    }
}

/// Number of `{}` placeholders in a `markup!` template.
///
/// Returns `None` for anything else between braces (inline captures such as
/// `{city}`, indices, format specs) and for unbalanced braces. `{{` and `}}`
/// are plain text.
pub(crate) const fn positional_placeholders(template: &str) -> Option<usize> {
    let bytes = template.as_bytes();
    let mut i = 0;
    let mut count = 0;

    while i < bytes.len() {
        let next = if i + 1 < bytes.len() { bytes[i + 1] } else { 0 };
        match (bytes[i], next) {
            (b'{', b'{') | (b'}', b'}') => i += 2,
            (b'{', b'}') => {
                count += 1;
                i += 2;
            }
            (b'{', _) | (b'}', _) => return None,
            _ => i += 1,
        }
    }

    Some(count)
}

/// Build [`Markup`] from a literal template and positional arguments.
///
/// Every argument goes through [`Render`], so plain strings are escaped and
/// `Markup` is inserted verbatim. The template is checked at compile time: it
/// may only hold bare `{}` placeholders, exactly one per argument, so an
/// inline capture like `{city}` cannot slip past escaping.
macro_rules! markup {
    ($template:literal $(, $arg:expr)* $(,)?) => {{
        const _: () = assert!(
            matches!(
                $crate::render::positional_placeholders($template),
                Some(n) if n == <[&str]>::len(&[$(stringify!($arg)),*])
            ),
            "markup! templates take bare positional placeholders, one per argument"
        );
        $crate::render::Markup::from_escaped(format!(
            $template $(, $crate::render::Rendered(&$arg))*
        ))
    }};
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Uppercase the first character, leave the rest alone.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Round a measurement for display. Never yields `-0`.
pub fn rounded(value: f64) -> i64 {
    value.round() as i64
}

/// Content of the current-weather region.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CurrentPanel {
    #[default]
    Empty,
    Loading {
        city: String,
    },
    Error {
        message: String,
    },
    Populated {
        weather: CurrentWeather,
        observed_at: DateTime<Local>,
    },
}

impl CurrentPanel {
    pub fn render(&self) -> Markup {
        match self {
            CurrentPanel::Empty => {
                Markup::literal(r#"<p class="muted">Search for a city to see the weather.</p>"#)
            }
            CurrentPanel::Loading { city } => {
                markup!(r#"<p class="muted">Loading weather for <strong>{}</strong>...</p>"#, city)
            }
            CurrentPanel::Error { message } => markup!(r#"<p class="muted">{}</p>"#, message),
            CurrentPanel::Populated { weather, observed_at } => {
                render_current(weather, observed_at)
            }
        }
    }
}

fn render_current(weather: &CurrentWeather, observed_at: &DateTime<Local>) -> Markup {
    let when = observed_at.format("%a, %b %-d, %-I:%M %p").to_string();
    let icon_url = format!("https://openweathermap.org/img/wn/{}@2x.png", weather.icon_id);

    markup!(
        r#"<div class="current-main">
  <div>
    <div class="current-city">{}, {}</div>
    <div class="muted">{}</div>
  </div>
  <div>
    <div class="current-temp">{}°F</div>
    <div class="muted">Feels like {}°F</div>
  </div>
  <div class="current-extra">
    <span>{}</span>
    <span>Humidity: {}%</span>
    <span>Wind: {} mph</span>
  </div>
  <div>
    <img src="{}" alt="{} icon" />
  </div>
</div>"#,
        weather.city_name,
        weather.country_code,
        when,
        rounded(weather.temperature_f),
        rounded(weather.feels_like_f),
        capitalize(&weather.condition),
        weather.humidity_pct,
        rounded(weather.wind_speed_mph),
        icon_url,
        weather.condition,
    )
}

/// Day cards of the forecast region, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastPanel {
    pub days: Vec<ForecastSample>,
}

impl ForecastPanel {
    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn render(&self) -> Markup {
        self.days.iter().map(render_card).collect()
    }
}

fn render_card(day: &ForecastSample) -> Markup {
    let label = day.timestamp.format("%a, %b %-d").to_string();
    let icon_url = format!("https://openweathermap.org/img/wn/{}.png", day.icon_id);

    markup!(
        r#"<article class="forecast-card">
  <h3>{}</h3>
  <div class="forecast-temp">{}°F</div>
  <div class="forecast-extra">
    <div>{}</div>
    <div>Feels like {}°F</div>
    <div>Humidity: {}%</div>
  </div>
  <img src="{}" alt="{} icon" />
</article>
"#,
        label,
        rounded(day.temperature_f),
        capitalize(&day.condition),
        rounded(day.feels_like_f),
        day.humidity_pct,
        icon_url,
        day.condition,
    )
}

/// Clickable list of previous searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryPanel {
    pub cities: Vec<String>,
}

impl HistoryPanel {
    pub fn render(&self) -> Markup {
        self.cities
            .iter()
            .map(|city| {
                markup!(
                    "<li><button type=\"button\" data-city=\"{}\">{}</button></li>\n",
                    city,
                    city
                )
            })
            .collect()
    }
}

/// The three dashboard regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub current: CurrentPanel,
    pub forecast: ForecastPanel,
    pub history: HistoryPanel,
}

impl View {
    pub fn show_loading(&mut self, city: &str) {
        self.current = CurrentPanel::Loading { city: city.to_string() };
        self.forecast.clear();
    }

    pub fn show_error(&mut self, message: String) {
        self.current = CurrentPanel::Error { message };
        self.forecast.clear();
    }

    pub fn show_weather(&mut self, weather: CurrentWeather, observed_at: DateTime<Local>) {
        self.current = CurrentPanel::Populated { weather, observed_at };
    }

    pub fn show_forecast(&mut self, days: Vec<ForecastSample>) {
        self.forecast.days = days;
    }

    pub fn show_history(&mut self, cities: Vec<String>) {
        self.history.cities = cities;
    }

    /// A complete, self-contained HTML document.
    pub fn to_page(&self) -> Markup {
        markup!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<title>Weather Dashboard</title>
</head>
<body>
<aside>
  <h2>Recent searches</h2>
  <ul id="history-list">
{}  </ul>
</aside>
<main>
  <section id="current-weather">
    <h2>Current weather</h2>
    <div id="current-weather-body">
{}
    </div>
  </section>
  <section id="forecast">
    <h2>5-day forecast</h2>
    <div id="forecast-grid">
{}    </div>
  </section>
</main>
</body>
</html>
"#,
            self.history.render(),
            self.current.render(),
            self.forecast.render(),
        )
    }
}
