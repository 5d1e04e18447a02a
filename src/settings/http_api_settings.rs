use serde::Deserialize;
use serde_with::serde_as;
use std::time::Duration;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpApiSettings {
    pub server: HttpServerSettings,

    // whole-request deadline enforced by the middleware stack
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_millis")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpServerSettings {
    pub host: String,
    pub port: u16,
}

impl HttpServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
