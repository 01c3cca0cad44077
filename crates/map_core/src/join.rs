//! Left join of schools to attendance zones by identifier.

use std::collections::{HashMap, HashSet};

use crate::datasets::{School, Zone};

/// A school and every zone whose key matched its join key.
#[derive(Clone, Debug, PartialEq)]
pub struct SchoolWithZones {
    pub school: School,
    pub zones: Vec<Zone>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinResult {
    /// One entry per input school, in input order.
    pub schools: Vec<SchoolWithZones>,
    /// Zones no school referenced.
    pub unmatched_zones: Vec<Zone>,
}

impl JoinResult {
    pub fn matched_school_count(&self) -> usize {
        self.schools.iter().filter(|s| !s.zones.is_empty()).count()
    }
}

/// Every school appears exactly once; a zone may attach to several schools
/// sharing the same key. Keys are compared trimmed and case-sensitively.
pub fn join_schools_to_zones(schools: Vec<School>, zones: Vec<Zone>) -> JoinResult {
    let mut by_key: HashMap<String, Vec<Zone>> = HashMap::new();
    for zone in zones {
        by_key.entry(zone.key.trim().to_string()).or_default().push(zone);
    }

    let mut referenced: HashSet<String> = HashSet::new();
    let schools = schools
        .into_iter()
        .map(|school| {
            let key = school.join_key();
            let zones = by_key.get(key).cloned().unwrap_or_default();
            if !zones.is_empty() {
                referenced.insert(key.to_string());
            }
            SchoolWithZones { school, zones }
        })
        .collect();

    let mut unmatched_zones: Vec<Zone> = by_key
        .into_iter()
        .filter(|(key, _)| !referenced.contains(key))
        .flat_map(|(_, zones)| zones)
        .collect();
    unmatched_zones.sort_by(|a, b| a.key.cmp(&b.key));

    JoinResult {
        schools,
        unmatched_zones,
    }
}
