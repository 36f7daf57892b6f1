//! Debugging tool: reads stdin lines and fires each one at `tcplistener`
//! as a UDP datagram. Handy for poking at raw sockets without a real
//! HTTP client in the way.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, stdin, stdout};
use tokio::net::UdpSocket;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const PORT: u16 = 42069;

#[tokio::main]
async fn main() -> io::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    socket.connect(("127.0.0.1", PORT)).await?;
    let peer = socket.peer_addr()?;
    info!(peer = %peer, "sending lines as datagrams");

    let mut stdout = stdout();
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        socket.send(format!("{line}\n").as_bytes()).await?;
    }
}
