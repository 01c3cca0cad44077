use std::fmt::Write;

use super::LEAFLET_VERSION;
use crate::popup::escape_html;

const STYLE: &str = r#"
html, body { height: 100%; margin: 0; }
#map { position: absolute; inset: 0; }
.map-title {
  background: rgba(255, 255, 255, 0.9);
  padding: 6px 10px;
  border-radius: 4px;
  font: 600 15px/1.3 system-ui, sans-serif;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.3);
}
.map-legend {
  background: rgba(255, 255, 255, 0.9);
  padding: 6px 10px;
  border-radius: 4px;
  font: 13px/1.5 system-ui, sans-serif;
  box-shadow: 0 1px 4px rgba(0, 0, 0, 0.3);
}
.map-legend i {
  display: inline-block;
  width: 12px;
  height: 12px;
  border-radius: 50%;
  margin-right: 6px;
  vertical-align: -1px;
}
"#;

/// Assemble the page. `payload_json` must already be script-safe.
pub(super) fn document(title: &str, payload_json: &str, scripts: &[&str]) -> String {
    let title = escape_html(title);
    let cdn = format!("https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist");
    let mut html = String::with_capacity(payload_json.len() + 8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{cdn}/leaflet.css\" crossorigin=\"\">"
    );
    let _ = writeln!(html, "<script src=\"{cdn}/leaflet.js\" crossorigin=\"\"></script>");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<div id=\"map\" data-title=\"{title}\"></div>");
    let _ = writeln!(
        html,
        "<script type=\"application/json\" id=\"map-data\">{payload_json}</script>"
    );
    for script in scripts {
        let _ = writeln!(html, "<script>{script}</script>");
    }
    html.push_str("</body>\n</html>\n");
    html
}
