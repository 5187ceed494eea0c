use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const HUB_PORT: &str = "HUB_PORT";

const DEFAULT_PORT: u16 = 5000;

pub fn get_port() -> Option<u16> {
    std::env::var(HUB_PORT).ok().and_then(|res| res.parse().ok())
}

const HUB_ADDR: &str = "HUB_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_default_bind_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(DEFAULT_ADDR), DEFAULT_PORT)
}

pub fn get_addr() -> Option<IpAddr> {
    std::env::var(HUB_ADDR).ok().and_then(|res| res.parse().ok())
}

/// Apply `HUB_ADDR` / `HUB_PORT` overrides on top of a configured address.
pub fn resolve_bind_addr(configured: SocketAddr) -> SocketAddr {
    let ip = get_addr().unwrap_or(configured.ip());
    let port = get_port().unwrap_or(configured.port());
    SocketAddr::new(ip, port)
}
