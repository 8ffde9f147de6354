//! Room broadcast server.
//!
//! Clients connect to `/ws`, join named rooms and exchange messages with every
//! member of a room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-server
//! cargo run --bin roomcast-server -- --host 0.0.0.0 --port 3000 --no-echo
//! ```

use std::time::Duration;

use clap::Parser;
use roomcast_server::{
    Hub, ServerConfig,
    config::{
        DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_OUTBOUND_CAPACITY, DEFAULT_PONG_WAIT, DEFAULT_WRITE_WAIT,
        MAX_WAIT_SECS,
    },
    ui::Server,
};
use roomcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomcast-server")]
#[command(about = "WebSocket server broadcasting messages to named rooms", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Maximum inbound message size in bytes; larger messages close the connection
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Seconds without any inbound frame before a connection is considered dead (1 to 86400)
    #[arg(long, default_value_t = DEFAULT_PONG_WAIT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS))]
    pong_wait_secs: u64,

    /// Seconds allowed for each write to a client (1 to 86400)
    #[arg(long, default_value_t = DEFAULT_WRITE_WAIT.as_secs(), value_parser = clap::value_parser!(u64).range(1..=MAX_WAIT_SECS))]
    write_wait_secs: u64,

    /// Capacity of each client's outbound queue; overflow drops the newest message
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Do not deliver broadcasts back to their sender
    #[arg(long)]
    no_echo: bool,
}

impl Args {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            max_message_size: self.max_message_size,
            pong_wait: Duration::from_secs(self.pong_wait_secs),
            write_wait: Duration::from_secs(self.write_wait_secs),
            outbound_capacity: self.outbound_capacity.max(1),
            echo_to_sender: !self.no_echo,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = args.server_config();
    tracing::debug!("Starting with {:?}", config);

    // The Hub lives for the whole process
    let hub = Hub::spawn(&config);

    let server = Server::new(hub, config);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
