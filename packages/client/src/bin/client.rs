//! Interactive WebSocket client for the room broadcast server.
//!
//! Joins the initial room on connect, then reads lines from stdin:
//! `/join <room>`, `/leave [room]` and `/quit` are commands, anything else is
//! sent as a chat message to the current room.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin roomcast-client -- --room lobby
//! cargo run --bin roomcast-client -- -u ws://127.0.0.1:8080/ws -r kitchen
//! ```

use clap::Parser;

use roomcast_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "roomcast-client")]
#[command(about = "Interactive client for the Roomcast room broadcast server", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Room to join after connecting
    #[arg(short = 'r', long, default_value = "lobby")]
    room: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = roomcast_client::run_client(args.url, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
