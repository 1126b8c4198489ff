use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// `host:port` the UDP listener binds to. Hostnames are resolved at startup.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Capacity of each pooled receive buffer. Longer datagrams are truncated
    /// by the kernel and then fail to decode.
    #[serde(default = "default_max_datagram_size")]
    pub max_datagram_size: usize,

    /// Upper bound on queries being translated at once. 0 disables the bound.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default = "default_max_idle_buffers")]
    pub max_idle_buffers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            max_datagram_size: default_max_datagram_size(),
            max_in_flight: default_max_in_flight(),
            max_idle_buffers: default_max_idle_buffers(),
        }
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:5353".to_string()
}

fn default_max_datagram_size() -> usize {
    2048
}

fn default_max_in_flight() -> usize {
    1024
}

fn default_max_idle_buffers() -> usize {
    256
}
