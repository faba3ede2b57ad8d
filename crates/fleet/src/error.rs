use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Failed to load fleet data: {0}")]
    Dataset(#[from] dataset::DatasetError),

    #[error("Stations can only be searched by 'station_id' or 'station_name', not '{0}'")]
    InvalidSearchField(String),
}
