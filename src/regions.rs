/// Region registry for the EcoSentinel environmental analysis service.
///
/// Defines the canonical list of Kenyan regions covered by the service,
/// along with the geographic and demographic metadata the simulator and
/// the flood-risk-factor derivation depend on. This is the single source
/// of truth for region identity - all other modules should reference
/// regions from here rather than hardcoding names or coordinates.

// ---------------------------------------------------------------------------
// Region metadata
// ---------------------------------------------------------------------------

/// Broad climate classification driving the simulator's weather baselines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateZone {
    /// Hot, dry regions with minimal rainfall (Mandera, Turkana).
    Arid,
    /// Indian Ocean coast: humid, high baseline rainfall (Mombasa).
    Coastal,
    /// Interior highlands: temperate, bimodal rainy seasons.
    Highland,
}

/// Metadata for a single monitored region.
pub struct Region {
    /// Canonical region name, matching the `region` column of every dataset.
    pub name: &'static str,
    /// WGS84 latitude of the region's reference point.
    pub latitude: f64,
    /// WGS84 longitude of the region's reference point.
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation_m: f64,
    /// Census population estimate.
    pub population: u64,
    /// Climate classification for weather simulation.
    pub zone: ClimateZone,
    /// Proximity-to-water risk contribution in [0, 1]
    /// (coastal and lakeside regions score highest).
    pub water_proximity_risk: f64,
    /// Drainage infrastructure quality in [0, 1]; higher is better.
    /// Major cities have more developed storm drainage.
    pub drainage_score: f64,
}

/// All regions covered by the service, major population centers first.
pub static REGION_REGISTRY: &[Region] = &[
    Region {
        name: "Nairobi",
        latitude: -1.2921,
        longitude: 36.8219,
        elevation_m: 1795.0,
        population: 4_397_073,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.6, // river-crossed capital
        drainage_score: 0.7,
    },
    Region {
        name: "Kisumu",
        latitude: -0.0917,
        longitude: 34.7680,
        elevation_m: 1131.0,
        population: 610_082,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.8, // Lake Victoria shoreline
        drainage_score: 0.7,
    },
    Region {
        name: "Eldoret",
        latitude: 0.5143,
        longitude: 35.2698,
        elevation_m: 2085.0,
        population: 475_716,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
    Region {
        name: "Mandera",
        latitude: 3.9366,
        longitude: 41.8670,
        elevation_m: 231.0,
        population: 867_457,
        zone: ClimateZone::Arid,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
    Region {
        name: "Mombasa",
        latitude: -4.0435,
        longitude: 39.6682,
        elevation_m: 17.0,
        population: 1_208_333,
        zone: ClimateZone::Coastal,
        water_proximity_risk: 0.8, // Indian Ocean coast
        drainage_score: 0.7,
    },
    Region {
        name: "Nakuru",
        latitude: -0.3031,
        longitude: 36.0800,
        elevation_m: 1850.0,
        population: 570_674,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.6, // Lake Nakuru basin
        drainage_score: 0.4,
    },
    Region {
        name: "Turkana",
        latitude: 3.1167,
        longitude: 35.5833,
        elevation_m: 365.0,
        population: 926_976,
        zone: ClimateZone::Arid,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
    Region {
        name: "Kitui",
        latitude: -1.3669,
        longitude: 38.0109,
        elevation_m: 1136.0,
        population: 1_136_187,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
    Region {
        name: "Nyeri",
        latitude: -0.4167,
        longitude: 36.9500,
        elevation_m: 1759.0,
        population: 759_164,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
    Region {
        name: "Machakos",
        latitude: -1.5219,
        longitude: 37.2634,
        elevation_m: 1549.0,
        population: 1_421_932,
        zone: ClimateZone::Highland,
        water_proximity_risk: 0.3,
        drainage_score: 0.4,
    },
];

/// Returns the names of all registered regions, in registry order.
pub fn all_region_names() -> Vec<&'static str> {
    REGION_REGISTRY.iter().map(|r| r.name).collect()
}

/// Looks up a region by name. Returns `None` if not registered.
pub fn find_region(name: &str) -> Option<&'static Region> {
    REGION_REGISTRY.iter().find(|r| r.name == name)
}

/// Returns regions in a given climate zone.
pub fn regions_in_zone(zone: ClimateZone) -> Vec<&'static Region> {
    REGION_REGISTRY.iter().filter(|r| r.zone == zone).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_region_names() {
        let mut seen = std::collections::HashSet::new();
        for region in REGION_REGISTRY {
            assert!(
                seen.insert(region.name),
                "duplicate region '{}' found in REGION_REGISTRY",
                region.name
            );
        }
    }

    #[test]
    fn test_registry_contains_all_expected_regions() {
        let expected = [
            "Nairobi", "Kisumu", "Eldoret", "Mandera", "Mombasa",
            "Nakuru", "Turkana", "Kitui", "Nyeri", "Machakos",
        ];
        let names: Vec<_> = REGION_REGISTRY.iter().map(|r| r.name).collect();
        for expected_name in &expected {
            assert!(
                names.contains(expected_name),
                "REGION_REGISTRY missing expected region '{}'",
                expected_name
            );
        }
        assert_eq!(REGION_REGISTRY.len(), expected.len());
    }

    #[test]
    fn test_coordinates_are_within_kenya() {
        // Kenya spans roughly 5S-5N, 33E-42E. A registry entry outside
        // these bounds is a data-entry error, not a real Kenyan region.
        for region in REGION_REGISTRY {
            assert!(
                (-5.0..=5.0).contains(&region.latitude),
                "latitude for '{}' out of range: {}",
                region.name,
                region.latitude
            );
            assert!(
                (33.0..=42.0).contains(&region.longitude),
                "longitude for '{}' out of range: {}",
                region.name,
                region.longitude
            );
        }
    }

    #[test]
    fn test_risk_inputs_are_normalized() {
        for region in REGION_REGISTRY {
            assert!(
                (0.0..=1.0).contains(&region.water_proximity_risk),
                "water proximity for '{}' must be in [0,1]",
                region.name
            );
            assert!(
                (0.0..=1.0).contains(&region.drainage_score),
                "drainage score for '{}' must be in [0,1]",
                region.name
            );
            assert!(region.elevation_m >= 0.0);
            assert!(region.population > 0);
        }
    }

    #[test]
    fn test_find_region_returns_correct_entry() {
        let region = find_region("Nairobi").expect("Nairobi should be in registry");
        assert_eq!(region.name, "Nairobi");
        assert_eq!(region.elevation_m, 1795.0);
        assert_eq!(region.zone, ClimateZone::Highland);
    }

    #[test]
    fn test_find_region_returns_none_for_unknown_name() {
        assert!(find_region("Atlantis").is_none());
        // Lookup is exact, not case-insensitive.
        assert!(find_region("nairobi").is_none());
    }

    #[test]
    fn test_zone_filtering() {
        let arid = regions_in_zone(ClimateZone::Arid);
        let arid_names: Vec<_> = arid.iter().map(|r| r.name).collect();
        assert_eq!(arid_names, ["Mandera", "Turkana"]);

        let coastal = regions_in_zone(ClimateZone::Coastal);
        assert_eq!(coastal.len(), 1);
        assert_eq!(coastal[0].name, "Mombasa");
    }

    #[test]
    fn test_all_region_names_matches_registry_length() {
        assert_eq!(all_region_names().len(), REGION_REGISTRY.len());
    }
}
