//! Simple chatter client example
//!
//! Connects to a chatter server, logs in, and bridges stdin to the
//! connection: type `msg hello` or `whsp bob hi` and watch replies arrive.
//!
//! Run against a local server with:
//! `cargo run --example simple_client -- 127.0.0.1:8080 alice`

use chatter_proto::{Command, LineCodec, Reply};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let name = args.next().unwrap_or_else(|| "guest".to_string());

    let stream = TcpStream::connect(&addr).await?;
    let mut framed = Framed::new(stream, LineCodec::new());

    let login = Command::Login(name.clone());
    println!("→ {}", login);
    framed.send(login.to_string()).await?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = framed.next() => {
                let Some(line) = line else {
                    println!("server closed the connection");
                    break;
                };
                match line {
                    Ok(line) => match line.parse::<Reply>() {
                        Ok(reply) => println!("← {}", reply),
                        // Unrecognized lines are dropped, not fatal.
                        Err(_) => {}
                    },
                    Err(e) => {
                        eprintln!("connection error: {}", e);
                        break;
                    }
                }
            }
            input = stdin.next_line() => {
                let Ok(Some(input)) = input else { break };
                let cmd = Command::parse(&input);
                if cmd == Command::Invalid {
                    eprintln!("unrecognized command (try: msg <text>, whsp <user> <text>, logout {})", name);
                    continue;
                }
                let terminal = matches!(cmd, Command::Logout(_));
                framed.send(input).await?;
                if terminal {
                    break;
                }
            }
        }
    }

    Ok(())
}
