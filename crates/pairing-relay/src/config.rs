//! Command-line configuration.

use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "pairing-relay",
    about = "WebSocket signaling relay that pairs two WebRTC peers"
)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Request path that accepts WebSocket upgrades.
    #[arg(long, default_value = "/ws")]
    pub path: String,

    /// Per-client outbox depth. Messages to a client with a full outbox are dropped.
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..))]
    pub outbox_capacity: u32,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            path: "/ws".into(),
            outbox_capacity: 256,
        }
    }
}
