//! # Utility module

use anyhow::{anyhow, Result};
use log::*;
use std::io::Read;
use std::net::{TcpListener, TcpStream};

/// Open a file or an input stream.
///
/// Inputs prefixed with `tcp://` are interpreted as network endpoints -
/// `tcp://@:port` listens for a single connection, anything else connects
/// out. Everything else is treated as a file path.
pub fn open_file(input: &str) -> Result<Box<dyn Read + Send>> {
    if input.starts_with("tcp://") {
        let input = input.strip_prefix("tcp://").expect("Cannot strip prefix");
        let (addr, port) = input
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid format"))?;
        let port: usize = str::parse(port)?;

        let stream = if addr == "@" {
            let listener = TcpListener::bind(format!("0.0.0.0:{}", port))?;
            let (sock, addr) = listener.accept()?;
            info!("Accept {}", addr);
            sock
        } else {
            info!("Connecting to {}", input);
            TcpStream::connect(input)?
        };

        Ok(Box::new(stream))
    } else {
        std::fs::File::open(input)
            .map(|i| Box::new(i) as _)
            .map_err(Into::into)
    }
}
