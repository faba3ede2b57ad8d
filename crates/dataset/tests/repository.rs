use core_types::{BikeType, TripStatus, UserType};
use dataset::{CsvRepository, DatasetError};
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const TRIPS: &str = "\
trip_id,user_id,user_type,bike_id,bike_type,start_station_id,end_station_id,start_time,end_time,duration_minutes,distance_km,status
T1,U1,member,B1,classic,ST1,ST2,2024-05-01 08:00:00,2024-05-01 08:30:00,30,4.5,completed
T2,U2, Casual ,B2,ELECTRIC,ST2,ST1,2024-05-01 09:00:00,2024-05-01 09:10:00,,1.2,
T2,U2, Casual ,B2,ELECTRIC,ST2,ST1,2024-05-01 09:00:00,2024-05-01 09:10:00,,1.2,
T3,U1,member,B1,classic,ST1,ST3,broken,2024-05-01 10:00:00,5,1.0,completed
T4,U3,member,B3,classic,ST3,ST1,2024-05-02 10:00:00,2024-05-02 09:00:00,5,1.0,cancelled
";

const STATIONS: &str = "\
station_id,station_name,capacity,latitude,longitude
st1, Alexanderplatz ,20,52.52,13.41
ST2,Hauptbahnhof,15.0,52.525,13.369
ST3,Nowhere,0,52.5,13.4
";

const MAINTENANCE: &str = "\
record_id,bike_id,bike_type,date,maintenance_type,cost,description
M1,B1,classic,2024-04-01,Brakes,20.00,pads
M2,B2,electric,2024-04-03,battery,-5,invalid
";

fn write_raw(dir: &Path) {
    fs::write(dir.join("trips.csv"), TRIPS).expect("Failed to write trips");
    fs::write(dir.join("stations.csv"), STATIONS).expect("Failed to write stations");
    fs::write(dir.join("maintenance.csv"), MAINTENANCE).expect("Failed to write maintenance");
}

#[test]
fn clean_exports_tables_that_load_back() {
    let raw_dir = tempdir().expect("Failed to create temporary directory");
    let cleaned_dir = tempdir().expect("Failed to create temporary directory");
    write_raw(raw_dir.path());

    let repo = CsvRepository::new(raw_dir.path(), cleaned_dir.path().join("out"));
    let cleaned = repo.clean().expect("cleaning should succeed");

    let counts: Vec<(String, usize, usize)> = cleaned
        .summaries
        .iter()
        .map(|s| (s.table.clone(), s.raw_rows, s.kept_rows))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("trips".to_string(), 5, 2),
            ("stations".to_string(), 3, 2),
            ("maintenance".to_string(), 2, 1),
        ]
    );

    let trips = repo.load_trips().expect("cleaned trips should load");
    assert_eq!(trips, cleaned.trips);
    assert_eq!(trips[1].user_type, UserType::Casual);
    assert_eq!(trips[1].bike_type, BikeType::Electric);
    assert_eq!(trips[1].duration_minutes, dec!(10));
    assert_eq!(trips[1].status, TripStatus::Completed);

    let stations = repo.load_stations().expect("cleaned stations should load");
    assert_eq!(stations, cleaned.stations);
    assert_eq!(stations[0].station_id, "ST1");
    assert_eq!(stations[0].name, "Alexanderplatz");

    let maintenance = repo.load_maintenance().expect("cleaned maintenance should load");
    assert_eq!(maintenance.len(), 1);
    assert_eq!(maintenance[0].maintenance_type, "brakes");

    let paths = repo.cleaned_paths();
    assert!(paths[0].ends_with("trips_cleaned.csv"));
    assert!(paths.iter().all(|path| path.is_file()));
}

#[test]
fn missing_raw_file_is_reported_with_its_path() {
    let raw_dir = tempdir().expect("Failed to create temporary directory");
    let repo = CsvRepository::new(raw_dir.path(), raw_dir.path());

    match repo.load_raw() {
        Err(DatasetError::Csv { path, .. }) => assert!(path.ends_with("trips.csv")),
        other => panic!("expected a CSV error, got {other:?}"),
    }
}

#[test]
fn invalid_cleaned_record_is_rejected() {
    let dir = tempdir().expect("Failed to create temporary directory");
    fs::write(
        dir.path().join("trips_cleaned.csv"),
        "trip_id,user_id,user_type,bike_id,bike_type,start_station_id,end_station_id,start_time,end_time,duration_minutes,distance_km,status\n\
         T1,U1,member,B1,classic,ST1,ST2,2024-05-01T08:00:00,2024-05-01T07:00:00,30,4.5,completed\n",
    )
    .expect("Failed to write cleaned trips");

    let repo = CsvRepository::new(dir.path(), dir.path());
    assert!(matches!(
        repo.load_trips(),
        Err(DatasetError::InvalidRecord { .. })
    ));
}

#[test]
fn raw_rows_missing_trailing_cells_still_clean() {
    let raw_dir = tempdir().expect("Failed to create temporary directory");
    write_raw(raw_dir.path());
    // The second row stops after `distance_km`: no status column at all.
    fs::write(
        raw_dir.path().join("trips.csv"),
        "trip_id,user_id,user_type,bike_id,bike_type,start_station_id,end_station_id,start_time,end_time,duration_minutes,distance_km,status\n\
         T1,U1,member,B1,classic,ST1,ST2,2024-05-01 08:00:00,2024-05-01 08:30:00,30,4.5,completed\n\
         T2,U2,casual,B2,electric,ST2,ST1,2024-05-01 09:00:00,2024-05-01 09:10:00,10,1.2\n",
    )
    .expect("Failed to write trips");

    let repo = CsvRepository::new(raw_dir.path(), raw_dir.path().join("out"));
    let cleaned = repo.clean().expect("a short raw row should not abort cleaning");

    assert_eq!(cleaned.trips.len(), 2);
    assert_eq!(cleaned.trips[1].trip_id, "T2");
    assert_eq!(cleaned.trips[1].status, TripStatus::Completed);
}

#[test]
fn cleaned_tables_stay_strict_about_row_length() {
    let dir = tempdir().expect("Failed to create temporary directory");
    fs::write(
        dir.path().join("stations_cleaned.csv"),
        "station_id,station_name,capacity,latitude,longitude\n\
         ST1,Main,10,52.5\n",
    )
    .expect("Failed to write cleaned stations");

    let repo = CsvRepository::new(dir.path(), dir.path());
    assert!(matches!(repo.load_stations(), Err(DatasetError::Csv { .. })));
}

#[test]
fn cleaned_station_with_broken_invariants_is_rejected() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let repo = CsvRepository::new(dir.path(), dir.path());

    for row in ["ST1,Main,0,52.5,13.4", "ST1,Main,10,200,13.4"] {
        fs::write(
            dir.path().join("stations_cleaned.csv"),
            format!("station_id,station_name,capacity,latitude,longitude\n{row}\n"),
        )
        .expect("Failed to write cleaned stations");

        match repo.load_stations() {
            Err(DatasetError::InvalidRecord { path, .. }) => {
                assert!(path.ends_with("stations_cleaned.csv"), "{row}")
            }
            other => panic!("expected an invalid record for {row}, got {other:?}"),
        }
    }
}
