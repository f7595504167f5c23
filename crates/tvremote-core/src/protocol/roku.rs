//! Roku External Control Protocol (ECP), spoken by TCL Roku TVs on port 8060.
//!
//! ECP is stateless HTTP: `GET /query/device-info` answers when the TV is
//! reachable and `POST /keypress/<Key>` presses a key.  There is no session
//! and no pairing.

use std::net::Ipv4Addr;

/// ECP HTTP port.
pub const PORT: u16 = 8060;

pub const DEVICE_INFO_PATH: &str = "/query/device-info";

/// `http://{ip}:{port}/query/device-info`
pub fn device_info_url(ip: Ipv4Addr, port: u16) -> String {
    format!("http://{ip}:{port}{DEVICE_INFO_PATH}")
}

/// `http://{ip}:{port}/keypress/{key}`
pub fn keypress_url(ip: Ipv4Addr, port: u16, key: &str) -> String {
    format!("http://{ip}:{port}/keypress/{key}")
}
