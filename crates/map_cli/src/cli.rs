use std::path::PathBuf;

use clap::Parser;
use map_core::{BoundingBox, ConfigError, MapConfig};

#[derive(Debug, Parser)]
#[command(
    name = "school-transit-map",
    version,
    about = "Render schools, attendance zones and transit for a city as an interactive HTML map",
    long_about = "Geocodes a city to a bounding box, filters local school, zone and GTFS\n\
                  datasets to it, and writes a single Leaflet page with toggleable layers.\n\
                  Flags override values read from --config."
)]
pub struct Cli {
    /// City or place name to map
    #[arg(env = "SCHOOL_MAP_CITY")]
    pub city: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long, short = 'c', env = "SCHOOL_MAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Schools CSV
    #[arg(long, env = "SCHOOL_MAP_SCHOOLS")]
    pub schools: Option<PathBuf>,

    /// Attendance zones GeoJSON
    #[arg(long, env = "SCHOOL_MAP_ZONES")]
    pub zones: Option<PathBuf>,

    /// GTFS feed directory
    #[arg(long, env = "SCHOOL_MAP_TRANSIT")]
    pub transit: Option<PathBuf>,

    /// Directory the HTML file is written to
    #[arg(long, env = "SCHOOL_MAP_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Zone property holding the school identifier
    #[arg(long, env = "SCHOOL_MAP_ZONE_KEY")]
    pub zone_key: Option<String>,

    /// Degrees of padding around the geocoded box (ignored with --bbox)
    #[arg(long, env = "SCHOOL_MAP_PADDING")]
    pub padding: Option<f64>,

    /// Skip geocoding: "min_lat,max_lat,min_lon,max_lon"
    #[arg(long, env = "SCHOOL_MAP_BBOX", allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Nominatim base URL
    #[arg(long, env = "SCHOOL_MAP_GEOCODER")]
    pub geocoder_endpoint: Option<String>,

    /// User-Agent sent to the geocoder
    #[arg(long, env = "SCHOOL_MAP_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Tile URL template
    #[arg(long, env = "SCHOOL_MAP_TILE_URL")]
    pub tile_url: Option<String>,

    /// Tile attribution HTML
    #[arg(long, env = "SCHOOL_MAP_TILE_ATTRIBUTION")]
    pub tile_attribution: Option<String>,

    /// Do not read stop_times.txt to link stops to routes
    #[arg(long)]
    pub no_stop_routes: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Config file values (or defaults) with flags applied on top.
    pub fn to_config(&self) -> Result<MapConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => MapConfig::from_json_file(path)?,
            None => MapConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut MapConfig) {
        if let Some(city) = &self.city {
            config.city = city.clone();
        }
        if let Some(path) = &self.schools {
            config.schools_path = path.clone();
        }
        if let Some(path) = &self.zones {
            config.zones_path = path.clone();
        }
        if let Some(path) = &self.transit {
            config.transit_dir = path.clone();
        }
        if let Some(path) = &self.out_dir {
            config.out_dir = path.clone();
        }
        if let Some(key) = &self.zone_key {
            config.zone_key = key.clone();
        }
        if let Some(padding) = self.padding {
            config.padding_deg = padding;
        }
        if let Some(bbox) = self.bbox {
            config.bbox = Some(bbox);
        }
        if let Some(endpoint) = &self.geocoder_endpoint {
            config.geocoder_endpoint = endpoint.clone();
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        if let Some(url) = &self.tile_url {
            config.tile_url = url.clone();
        }
        if let Some(attribution) = &self.tile_attribution {
            config.tile_attribution = attribution.clone();
        }
        if self.no_stop_routes {
            config.include_stop_routes = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "school-transit-map",
            "Portland, OR",
            "--schools",
            "s.csv",
            "--bbox",
            "45.4,45.6,-122.8,-122.4",
            "--padding",
            "0.02",
            "--no-stop-routes",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);

        let config = cli.to_config().unwrap();
        assert_eq!(config.city, "Portland, OR");
        assert_eq!(config.schools_path, PathBuf::from("s.csv"));
        assert_eq!(config.padding_deg, 0.02);
        assert!(!config.include_stop_routes);
        assert_eq!(config.bbox.map(|b| b.min_lon), Some(-122.8));
        assert_eq!(config.zone_key, "school_id");
    }

    #[test]
    fn malformed_bbox_is_a_parse_error() {
        let result = Cli::try_parse_from(["school-transit-map", "X", "--bbox", "1,2,3"]);
        assert!(result.is_err());
    }
}
