//! IPC listener that accepts commands over a Unix socket.
//!
//! Scripts and external pointer sources can connect to the socket and send
//! newline-delimited JSON commands.

pub mod listener;
