//! HTML document generation.
//!
//! The page is a thin Leaflet shell: feature groups travel as a JSON payload
//! inside a `<script type="application/json">` element, a generic loader
//! turns them into Leaflet layers, and small hand-written snippets add the
//! click-to-toggle behaviour and the legend.

mod script;
mod template;

use serde::Serialize;

use crate::bounds::BoundingBox;
use crate::datasets::SchoolLevel;
use crate::layers::{level_color, FeatureGroup, LatLon};

pub const LEAFLET_VERSION: &str = "1.9.4";
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Clone, Debug)]
pub struct RenderOptions {
    pub city: String,
    pub bbox: BoundingBox,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl RenderOptions {
    pub fn new(city: &str, bbox: BoundingBox) -> Self {
        Self {
            city: city.to_string(),
            bbox,
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }

    pub fn title(&self) -> String {
        let city = self.city.trim();
        if city.is_empty() {
            "Schools and transit".to_string()
        } else {
            format!("{city}: schools and transit")
        }
    }
}

#[derive(Serialize)]
struct TileConfig<'a> {
    url: &'a str,
    attribution: &'a str,
}

#[derive(Serialize)]
struct LegendEntry {
    label: &'static str,
    color: &'static str,
}

#[derive(Serialize)]
struct Payload<'a> {
    bounds: [LatLon; 2],
    tiles: TileConfig<'a>,
    legend: Vec<LegendEntry>,
    groups: &'a [FeatureGroup],
}

fn legend() -> Vec<LegendEntry> {
    SchoolLevel::ALL
        .iter()
        .map(|level| LegendEntry {
            label: level.label(),
            color: level_color(*level),
        })
        .collect()
}

/// Make serialized JSON safe to place inside a `<script>` element.
pub fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Render the complete HTML document for `groups`.
pub fn render_html(groups: &[FeatureGroup], options: &RenderOptions) -> Result<String, serde_json::Error> {
    let payload = Payload {
        bounds: options.bbox.to_leaflet_bounds(),
        tiles: TileConfig {
            url: &options.tile_url,
            attribution: &options.tile_attribution,
        },
        legend: legend(),
        groups,
    };
    let json = script_safe_json(&serde_json::to_string(&payload)?);
    let scripts = [script::LOADER_JS, script::TOGGLE_JS, script::LEGEND_JS];
    Ok(template::document(&options.title(), &json, &scripts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{build_layers, MapLayersInput};
    use crate::test_helpers::test_bbox;

    fn empty_groups() -> Vec<FeatureGroup> {
        build_layers(&MapLayersInput {
            schools: &[],
            routes: &[],
            stops: &[],
        })
    }

    #[test]
    fn script_safe_json_escapes_closing_tags_and_separators() {
        let raw = "{\"a\":\"</script>\u{2028}\u{2029}\"}";
        assert_eq!(script_safe_json(raw), "{\"a\":\"<\\/script>\\u2028\\u2029\"}");
    }

    #[test]
    fn document_loads_leaflet_and_embeds_payload() {
        let html = render_html(&empty_groups(), &RenderOptions::new("Portland", test_bbox())).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Portland: schools and transit</title>"));
        assert!(html.contains("unpkg.com/leaflet@1.9.4/dist/leaflet.js"));
        assert!(html.contains("unpkg.com/leaflet@1.9.4/dist/leaflet.css"));
        assert!(html.contains("id=\"map-data\""));
        assert!(html.contains("\"school_zones\""));
        assert!(html.contains("[[45.43,-122.84],[45.65,-122.47]]"));
        assert!(html.contains("L.control.layers"));
    }

    #[test]
    fn title_is_escaped_and_payload_cannot_close_script() {
        let mut groups = empty_groups();
        groups[0].name = "</script><script>alert(1)</script>".to_string();
        let html = render_html(&groups, &RenderOptions::new("<Springfield>", test_bbox())).unwrap();
        assert!(html.contains("<title>&lt;Springfield&gt;: schools and transit</title>"));
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("<\\/script><script>alert(1)<\\/script>"));
    }

    #[test]
    fn legend_lists_every_level() {
        let html = render_html(&empty_groups(), &RenderOptions::new("X", test_bbox())).unwrap();
        for level in SchoolLevel::ALL {
            assert!(html.contains(level_color(level)));
        }
    }

    #[test]
    fn blank_city_gets_generic_title() {
        assert_eq!(RenderOptions::new("  ", test_bbox()).title(), "Schools and transit");
    }
}
