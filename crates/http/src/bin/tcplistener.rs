//! Debugging tool: accepts TCP connections and prints each parsed request.
//!
//! One request per connection. Pair it with `curl` or the `udpsender` demo
//! to watch what actually arrives on the wire.

use std::io;

use tokio::net::TcpListener;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use wire_http::protocol::Request;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() -> io::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let tcp_listener = match TcpListener::bind(("0.0.0.0", PORT)).await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return Err(e);
        }
    };
    info!(port = PORT, "listening for TCP traffic");

    loop {
        let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };
        info!(peer = %remote_addr, "accepted connection");

        match Request::read_from(tcp_stream).await {
            Ok(request) => print_request(&request),
            Err(e) => error!(cause = %e, "can't parse request"),
        }
        info!(peer = %remote_addr, "connection closed");
    }
}

fn print_request(request: &Request) {
    println!("Request line:");
    println!("- Method: {}", request.request_line.method);
    println!("- Target: {}", request.request_line.request_target);
    println!("- Version: {}", request.request_line.http_version);
    println!("Headers:");
    for (name, value) in request.headers.iter() {
        println!("- {name}: {value}");
    }
    println!("Body:");
    println!("{}", String::from_utf8_lossy(&request.body));
}
