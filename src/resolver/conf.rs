//! Choosing the nameserver to send queries to.

use hickory_resolver::system_conf::parse_resolv_conf;
use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

/// Errors encountered while reading the resolver configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
    /// The configuration file could not be read.
    #[error("reading {}: {source}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration lists no nameserver.
    #[error("no nameservers configured in {}", .0.display())]
    NoNameservers(PathBuf),
}

const DNS_PORT: u16 = 53;

/// Gets the `host:port` address of the nameserver to query.
///
/// An `explicit` address is returned as is, without checking its form.
/// Otherwise the first nameserver listed in the resolv.conf at `path` is used,
/// with the port the configuration implies (53). Directives the parser does
/// not know do not prevent a listed nameserver from being found.
pub fn nameserver_address(
    explicit: Option<&str>,
    path: impl AsRef<Path>,
) -> Result<String, ConfError> {
    if let Some(address) = explicit.filter(|address| !address.is_empty()) {
        return Ok(address.to_string());
    }

    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ConfError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let server = match parse_resolv_conf(&data) {
        Ok((config, _opts)) => config.name_servers().first().map(|ns| ns.socket_addr),
        Err(_err) => {
            #[cfg(feature = "log")]
            tracing::debug!(
                path = %path.display(),
                error = %_err,
                "resolv.conf not fully understood, scanning nameserver lines"
            );
            None
        }
    }
    .or_else(|| first_nameserver_line(&data))
    .ok_or_else(|| ConfError::NoNameservers(path.to_path_buf()))?;

    #[cfg(feature = "log")]
    tracing::debug!(path = %path.display(), nameserver = %server, "using system nameserver");

    Ok(server.to_string())
}

/// Finds the first `nameserver` line holding an IP address, ignoring every
/// other directive and any unparsable address.
fn first_nameserver_line(data: &[u8]) -> Option<SocketAddr> {
    String::from_utf8_lossy(data).lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("nameserver") {
            return None;
        }
        // Link-local addresses may carry a zone (`fe80::1%eth0`).
        let addr = fields.next()?.split('%').next()?;
        addr.parse::<IpAddr>()
            .ok()
            .map(|ip| SocketAddr::new(ip, DNS_PORT))
    })
}
