use crate::spatial::DistanceUnit;

#[derive(Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub maps_key: Option<String>,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub default_distance_units: DistanceUnit,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("maps_key", &self.maps_key.as_ref().map(|_| "[redacted]"))
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_distance_units", &self.default_distance_units)
            .finish()
    }
}
