use std::fmt::Write as _;

use skycast_core::{ScreenState, Theme, WeatherReport};

const RULE_WIDTH: usize = 40;

/// Plain-text rendering of a report, with a day/night header.
pub fn render_report(report: &WeatherReport, theme: Theme, hours: usize) -> String {
    let current = &report.current;
    let mut out = String::new();

    let (marker, rule) = match theme {
        Theme::Day => ('☀', '─'),
        Theme::Night => ('☾', '═'),
    };
    let rule: String = std::iter::repeat_n(rule, RULE_WIDTH).collect();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{marker} {}", current.location_name);
    let _ = writeln!(
        out,
        "{} {}°  {}",
        icon_glyph(&current.icon_id),
        current.temperature_c,
        current.condition.to_uppercase()
    );
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "Wind        {} m/s", current.wind_speed_mps);
    let _ = writeln!(out, "Humidity    {}%", current.humidity_pct);
    let _ = writeln!(out, "Feels like  {}°", current.feels_like_c);
    let _ = writeln!(out, "Pressure    {} hPa", current.pressure_hpa);

    if !report.hourly.is_empty() && hours > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "Hourly");
        for entry in report.hourly.iter().take(hours) {
            let code = icon_code(&entry.icon_url);
            let _ = writeln!(
                out,
                "  {}  {} {:>4}°",
                entry.time_label,
                icon_glyph(code),
                entry.temperature_c
            );
        }
    }

    out
}

pub fn render_screen(state: &ScreenState, hours: usize) -> String {
    let mut out = String::new();
    if !state.date_label.is_empty() {
        let _ = writeln!(out, "{}", state.date_label);
    }

    match &state.report {
        Some(report) => out.push_str(&render_report(report, state.theme, hours)),
        None => {
            let _ = writeln!(out, "{}: --°  WEATHER", state.city);
        }
    }

    out
}

pub fn render_error(message: &str) -> String {
    format!("[!] {message}")
}

/// Icon id out of an icon URL such as `.../wn/10d@2x.png`.
fn icon_code(icon_url: &str) -> &str {
    let file = icon_url.rsplit('/').next().unwrap_or(icon_url);
    file.split(['@', '.']).next().unwrap_or(file)
}

/// Terminal stand-in for the provider icon; ids look like `01d` / `10n`.
fn icon_glyph(icon_id: &str) -> &'static str {
    match icon_id.get(..2).unwrap_or_default() {
        "01" if icon_id.ends_with('n') => "☾",
        "01" => "☀",
        "02" => "⛅",
        "03" | "04" => "☁",
        "09" | "10" => "☂",
        "11" => "⚡",
        "13" => "❄",
        "50" => "≋",
        _ => "·",
    }
}
