pub mod api_keys;
pub mod device_images;
pub mod device_users;
pub mod devices;
pub mod mobile_records;
pub mod qgis_records;
pub mod refresh_tokens;
pub mod users;
pub mod weather_records;
