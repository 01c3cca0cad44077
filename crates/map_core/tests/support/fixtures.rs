use std::fs;
use std::path::{Path, PathBuf};

use map_core::{BoundingBox, MapConfig};
use tempfile::TempDir;

/// Box around a small made-up town; every fixture below is placed relative to it.
pub fn town_bbox() -> BoundingBox {
    BoundingBox::new(40.0, 40.1, -75.1, -75.0).expect("fixture bbox is valid")
}

pub const SCHOOLS_CSV: &str = "\
school_id,name,latitude,longitude,address,level,grades,enrollment,phone,website,zone_id
E1,Maple Elementary,40.05,-75.05,12 Maple Ave,Elementary School,K-5,\"1,204\",555-0100,https://maple.example.edu,
M1,Oak Middle,40.02,-75.08,,Middle,6-8,640,,,Z-OAK
H1,Far Away High,41.50,-75.05,,High,9-12,2000,,,
BAD,,40.05,-75.05,,,,,,,
N1,Pine Charter,not-a-number,-75.05,,,,,,,
";

pub const ZONES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "school_id": "E1", "zone_name": "Maple Zone" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-75.09, 40.01], [-75.01, 40.01], [-75.01, 40.09], [-75.09, 40.01]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "school_id": "Z-OAK" },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [[[[-75.10, 40.00], [-75.06, 40.00], [-75.06, 40.04], [-75.10, 40.00]]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "school_id": "ORPHAN" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-75.04, 40.06], [-75.02, 40.06], [-75.02, 40.08], [-75.04, 40.06]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "school_id": "OUTSIDE" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-80.0, 30.0], [-79.9, 30.0], [-79.9, 30.1], [-80.0, 30.0]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "zone_name": "No key" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-75.04, 40.06], [-75.02, 40.06], [-75.02, 40.08], [-75.04, 40.06]]]
      }
    }
  ]
}"#;

pub const ROUTES_TXT: &str = "\
route_id,route_short_name,route_long_name,route_type,route_color
R10,10,Main Street,3,FF0000
R20,,Crosstown Express,3,
R30,30,Regional Rail,2,zzzzzz
";

pub const TRIPS_TXT: &str = "\
route_id,service_id,trip_id,shape_id
R10,WK,T10a,SH10
R10,WK,T10b,SH10
R20,WK,T20,
R30,WK,T30,SH30
";

pub const SHAPES_TXT: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence
SH10,40.05,-75.02,2
SH10,40.01,-75.09,1
SH10,40.09,-75.01,3
SH30,45.00,-70.00,1
SH30,45.10,-70.10,2
";

pub const STOPS_TXT: &str = "\
stop_id,stop_name,stop_lat,stop_lon
P1,Maple & 1st,40.05,-75.05
P2,Oak & 2nd,40.02,-75.08
P3,Distant,45.05,-70.05
STATION,Parent station,,
";

pub const STOP_TIMES_TXT: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
T10a,08:00:00,08:00:00,P1,1
T10a,08:05:00,08:05:00,P2,2
T20,09:00:00,09:00:00,P2,1
T30,10:00:00,10:00:00,P3,1
";

/// Temporary directory holding a complete set of input files.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("temp dir should be created"),
        };
        fixture.write("schools.csv", SCHOOLS_CSV);
        fixture.write("zones.geojson", ZONES_GEOJSON);
        fixture.write("gtfs/routes.txt", ROUTES_TXT);
        fixture.write("gtfs/trips.txt", TRIPS_TXT);
        fixture.write("gtfs/shapes.txt", SHAPES_TXT);
        fixture.write("gtfs/stops.txt", STOPS_TXT);
        fixture.write("gtfs/stop_times.txt", STOP_TIMES_TXT);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("fixture directory should be created");
        }
        fs::write(&path, contents).expect("fixture file should be written");
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.join(relative)).expect("fixture file should be removed");
    }

    pub fn config(&self, city: &str) -> MapConfig {
        MapConfig {
            city: city.to_string(),
            schools_path: self.join("schools.csv"),
            zones_path: self.join("zones.geojson"),
            transit_dir: self.join("gtfs"),
            out_dir: self.join("out"),
            ..MapConfig::default()
        }
    }
}
