//! A tiny synthetic town used by `xtask demo` to render a map offline.

use std::fs;
use std::path::Path;

/// `min_lat,max_lat,min_lon,max_lon` covering every demo record.
pub const DEMO_BBOX: &str = "40.00,40.10,-75.10,-75.00";

const SCHOOLS_CSV: &str = "\
school_id,name,latitude,longitude,address,level,grades,enrollment,phone,website,zone_id
E1,Maple Elementary,40.065,-75.070,12 Maple Ave,Elementary,K-5,412,555-0100,https://maple.example.edu,
E2,Willow Elementary,40.030,-75.030,4 Willow Rd,Elementary,K-5,388,555-0101,,
M1,Oak Middle,40.050,-75.050,90 Oak St,Middle,6-8,640,555-0102,,
H1,Cedar High,40.020,-75.080,1 Cedar Blvd,High,9-12,\"1,204\",555-0103,https://cedar.example.edu,
C1,Birch Academy,40.085,-75.020,,Charter,K-8,,,,
";

const ZONES_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "school_id": "E1", "zone_name": "Maple" },
      "geometry": { "type": "Polygon", "coordinates": [[[-75.10, 40.05], [-75.05, 40.05], [-75.05, 40.10], [-75.10, 40.10], [-75.10, 40.05]]] } },
    { "type": "Feature", "properties": { "school_id": "E2", "zone_name": "Willow" },
      "geometry": { "type": "Polygon", "coordinates": [[[-75.05, 40.00], [-75.00, 40.00], [-75.00, 40.05], [-75.05, 40.05], [-75.05, 40.00]]] } },
    { "type": "Feature", "properties": { "school_id": "M1", "zone_name": "Oak" },
      "geometry": { "type": "Polygon", "coordinates": [[[-75.10, 40.00], [-75.00, 40.00], [-75.00, 40.10], [-75.10, 40.10], [-75.10, 40.00]]] } },
    { "type": "Feature", "properties": { "school_id": "H1", "zone_name": "Cedar" },
      "geometry": { "type": "Polygon", "coordinates": [[[-75.10, 40.00], [-75.00, 40.00], [-75.00, 40.10], [-75.10, 40.10], [-75.10, 40.00]]] } }
  ]
}"#;

const ROUTES_TXT: &str = "\
route_id,route_short_name,route_long_name,route_type,route_color
R1,1,Main Street,3,1E88E5
R2,2,River Line,0,43A047
";

const TRIPS_TXT: &str = "\
route_id,service_id,trip_id,shape_id
R1,WK,T1,SH1
R2,WK,T2,SH2
";

const SHAPES_TXT: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence
SH1,40.010,-75.090,1
SH1,40.050,-75.050,2
SH1,40.090,-75.010,3
SH2,40.080,-75.095,1
SH2,40.060,-75.050,2
SH2,40.020,-75.010,3
";

const STOPS_TXT: &str = "\
stop_id,stop_name,stop_lat,stop_lon
P1,Cedar & 1st,40.010,-75.090
P2,Town Square,40.050,-75.050
P3,North End,40.090,-75.010
P4,Riverside,40.080,-75.095
P5,Willow Park,40.020,-75.010
";

const STOP_TIMES_TXT: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1,08:00:00,08:00:00,P1,1
T1,08:10:00,08:10:00,P2,2
T1,08:20:00,08:20:00,P3,3
T2,09:00:00,09:00:00,P4,1
T2,09:10:00,09:10:00,P2,2
T2,09:20:00,09:20:00,P5,3
";

pub fn write_demo_inputs(dir: &Path) -> std::io::Result<()> {
    let gtfs = dir.join("gtfs");
    fs::create_dir_all(&gtfs)?;
    fs::write(dir.join("schools.csv"), SCHOOLS_CSV)?;
    fs::write(dir.join("zones.geojson"), ZONES_GEOJSON)?;
    for (name, contents) in [
        ("routes.txt", ROUTES_TXT),
        ("trips.txt", TRIPS_TXT),
        ("shapes.txt", SHAPES_TXT),
        ("stops.txt", STOPS_TXT),
        ("stop_times.txt", STOP_TIMES_TXT),
    ] {
        fs::write(gtfs.join(name), contents)?;
    }
    Ok(())
}
