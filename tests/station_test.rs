//! Tests for recording station grouping.

use std::io::Write;

use colonyfuse::detection::{load_acoustic_detections, load_visual_detections};
use colonyfuse::group_into_stations;
use colonyfuse::station::{StationKey, SurveyBounds, stations_within_bounds};

fn csv_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_grouping_by_aru_id_ignores_coordinates() {
    let file = csv_file(
        "id,species_or_class,confidence,lat,lon,aru_id\n\
         a1,Great Egret,0.8,11.0100,76.9500,4\n\
         a2,Little Egret,0.7,11.0300,76.9900,4\n\
         a3,Great Egret,0.9,11.0100,76.9500,9\n",
    );
    let detections = load_acoustic_detections(file.path()).unwrap();
    let stations = group_into_stations(&detections);

    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].label, "ARU 4");
    assert_eq!(stations[0].key, StationKey::ById(4));
    assert_eq!(stations[0].detections.len(), 2);
    assert!((stations[0].lat - 11.01).abs() < 1e-12);
    assert_eq!(stations[1].label, "ARU 9");
}

#[test]
fn test_legacy_detections_group_by_rounded_coordinates() {
    let file = csv_file(
        "id,species_or_class,confidence,lat,lon,aru_id\n\
         a1,Great Egret,0.8,11.01421,76.95311,\n\
         a2,Great Egret,0.8,11.01424,76.95314,\n\
         a3,Great Egret,0.8,11.01460,76.95311,\n\
         a4,Great Egret,0.8,,76.95311,\n",
    );
    let detections = load_acoustic_detections(file.path()).unwrap();
    let stations = group_into_stations(&detections);

    assert_eq!(stations.len(), 2);
    assert_eq!(stations[0].label, "Station 1");
    assert_eq!(stations[0].key, StationKey::ByRoundedCoord(110_142, 769_531));
    assert_eq!(stations[0].detections.len(), 2);
    assert_eq!(stations[1].label, "Station 2");
    assert_eq!(stations[1].key, StationKey::ByRoundedCoord(110_146, 769_531));
}

#[test]
fn test_mixed_keys_number_stations_in_first_seen_order() {
    let file = csv_file(
        "id,species_or_class,confidence,lat,lon,aru_id\n\
         a1,Great Egret,0.8,11.0100,76.9500,2\n\
         a2,Great Egret,0.8,11.0200,76.9600,\n\
         a3,Great Egret,0.8,11.0100,76.9500,2\n",
    );
    let detections = load_acoustic_detections(file.path()).unwrap();
    let labels: Vec<String> = group_into_stations(&detections)
        .into_iter()
        .map(|s| s.label)
        .collect();
    assert_eq!(labels, vec!["ARU 2", "Station 2"]);
}

#[test]
fn test_stations_within_drone_footprint() {
    let acoustic = csv_file(
        "id,species_or_class,confidence,lat,lon,aru_id\n\
         a1,Great Egret,0.8,11.0100,76.9500,1\n\
         a2,Great Egret,0.8,11.0205,76.9605,2\n\
         a3,Great Egret,0.8,11.0500,76.9500,3\n",
    );
    let visual = csv_file(
        "id,species_or_class,confidence,lat,lon\n\
         v1,white_birds,0.9,11.0100,76.9500\n\
         v2,white_birds,0.9,11.0200,76.9600\n",
    );

    let acoustic = load_acoustic_detections(acoustic.path()).unwrap();
    let visual = load_visual_detections(visual.path()).unwrap();
    let stations = group_into_stations(&acoustic);
    let bounds = SurveyBounds::from_detections(&visual).unwrap();

    let inside: Vec<&str> = stations_within_bounds(&stations, &bounds)
        .into_iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(inside, vec!["ARU 1", "ARU 2"]);
}
