//! Popup HTML interpolated from record fields.
//!
//! Every interpolated value is escaped. Missing optional fields are left out
//! rather than rendered as empty rows.

use std::fmt::Write;

use crate::datasets::{TransitRoute, TransitStop};
use crate::join::SchoolWithZones;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// GTFS `route_type` → human label, including the extended 100–1799 ranges.
pub fn transit_mode_label(route_type: Option<i32>) -> &'static str {
    match route_type {
        Some(0) => "Tram",
        Some(1) => "Subway",
        Some(2) => "Rail",
        Some(3) => "Bus",
        Some(4) => "Ferry",
        Some(5) => "Cable tram",
        Some(6) => "Aerial lift",
        Some(7) => "Funicular",
        Some(11) => "Trolleybus",
        Some(12) => "Monorail",
        Some(t) if (100..200).contains(&t) => "Rail",
        Some(t) if (200..300).contains(&t) => "Coach",
        Some(t) if (400..500).contains(&t) => "Subway",
        Some(t) if (700..800).contains(&t) => "Bus",
        Some(t) if (800..900).contains(&t) => "Trolleybus",
        Some(t) if (900..1000).contains(&t) => "Tram",
        Some(t) if (1000..1100).contains(&t) => "Ferry",
        Some(t) if (1300..1400).contains(&t) => "Aerial lift",
        Some(t) if (1400..1500).contains(&t) => "Funicular",
        _ => "Transit",
    }
}

fn push_row(html: &mut String, label: &str, value: &str) {
    let _ = write!(html, "<br><b>{}:</b> {}", label, escape_html(value));
}

fn is_web_link(url: &str) -> bool {
    let lowered = url.trim().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

pub fn school_popup(entry: &SchoolWithZones) -> String {
    let school = &entry.school;
    let mut html = String::new();
    let _ = write!(html, "<b>{}</b>", escape_html(&school.name));

    let level = school.level_raw.as_deref();
    match (level, school.grades.as_deref()) {
        (Some(level), Some(grades)) => {
            let _ = write!(html, "<br>{} ({})", escape_html(level), escape_html(grades));
        }
        (Some(level), None) => {
            let _ = write!(html, "<br>{}", escape_html(level));
        }
        (None, Some(grades)) => push_row(&mut html, "Grades", grades),
        (None, None) => {}
    }
    if let Some(address) = &school.address {
        push_row(&mut html, "Address", address);
    }
    if let Some(enrollment) = school.enrollment {
        push_row(&mut html, "Enrollment", &format_thousands(enrollment));
    }
    if let Some(phone) = &school.phone {
        push_row(&mut html, "Phone", phone);
    }
    if let Some(website) = school.website.as_deref().filter(|w| is_web_link(w)) {
        let escaped = escape_html(website.trim());
        let _ = write!(
            html,
            "<br><a href=\"{escaped}\" target=\"_blank\" rel=\"noopener\">Website</a>"
        );
    }

    if entry.zones.is_empty() {
        html.push_str("<br><i>No attendance zone on file</i>");
    } else {
        let mut names: Vec<&str> = Vec::with_capacity(entry.zones.len());
        for zone in &entry.zones {
            let name = zone.name.as_deref().unwrap_or(zone.key.as_str());
            if !names.contains(&name) {
                names.push(name);
            }
        }
        push_row(&mut html, "Zone", &names.join(", "));
        html.push_str("<br><small>Click the marker to show or hide the zone</small>");
    }
    html
}

pub fn route_popup(route: &TransitRoute, color: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<span style=\"display:inline-block;width:10px;height:10px;background:{};margin-right:4px\"></span>",
        escape_html(color)
    );
    match (route.short_name.as_deref(), route.long_name.as_deref()) {
        (Some(short), Some(long)) => {
            let _ = write!(html, "<b>{}</b> {}", escape_html(short), escape_html(long));
        }
        (Some(name), None) | (None, Some(name)) => {
            let _ = write!(html, "<b>{}</b>", escape_html(name));
        }
        (None, None) => {
            let _ = write!(html, "<b>Route {}</b>", escape_html(&route.route_id));
        }
    }
    let _ = write!(html, "<br>{}", transit_mode_label(route.route_type));
    html
}

/// `route_names` are the display names of routes serving the stop, in any order.
pub fn stop_popup(stop: &TransitStop, route_names: &[&str]) -> String {
    let mut html = String::new();
    let name = stop.name.as_deref().unwrap_or("Unnamed stop");
    let _ = write!(html, "<b>{}</b>", escape_html(name));
    push_row(&mut html, "Stop ID", &stop.stop_id);
    if !route_names.is_empty() {
        let mut names = route_names.to_vec();
        names.sort_unstable();
        names.dedup();
        push_row(&mut html, "Routes", &names.join(", "));
    }
    html
}
