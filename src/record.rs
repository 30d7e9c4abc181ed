//! Services built from SRV replies.

use hickory_proto::rr::{rdata::SRV, RData, Record};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::IpAddr};

/// A single target of a SRV record, as rendered in the output.
///
/// Field names are capitalized in serialized form (`Host`, `FQDN`, `IP`,
/// `Port`), and are the names templates use to refer to them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Target hostname without its trailing dot.
    #[serde(rename = "Host")]
    pub host: String,
    /// Target hostname exactly as returned by DNS.
    #[serde(rename = "FQDN")]
    pub fqdn: String,
    /// Address of the target, if the reply carried one for it.
    #[serde(rename = "IP")]
    pub ip: Option<IpAddr>,
    /// Port the service listens on.
    #[serde(rename = "Port")]
    pub port: u16,
}

impl From<&SRV> for Service {
    fn from(srv: &SRV) -> Self {
        let fqdn = srv.target().to_string();
        let host = fqdn.strip_suffix('.').unwrap_or(&fqdn).to_string();
        Self {
            host,
            fqdn,
            ip: None,
            port: srv.port(),
        }
    }
}

/// Services keyed by query alias.
///
/// Keys iterate in sorted order, which is the order they are rendered in.
pub type Records = BTreeMap<String, Vec<Service>>;

/// Builds one [`Service`] per answer record of a reply.
///
/// The address of the i-th service is taken from the i-th additional record
/// when that record is an `A` or `AAAA` record. The pairing is purely
/// positional: nothing checks that the address record actually belongs to
/// the SRV target, so a reply whose additional section is ordered
/// differently, or interleaves other record types, will produce missing or
/// misassigned addresses. Additional records beyond the number of answers
/// are ignored.
///
/// Answers that are not SRV records leave a default (empty) service in
/// their position rather than being dropped.
pub fn correlate(answers: &[Record], additionals: &[Record]) -> Vec<Service> {
    let mut services: Vec<Service> = answers
        .iter()
        .map(|answer| match answer.data() {
            RData::SRV(srv) => Service::from(srv),
            _ => Service::default(),
        })
        .collect();

    for (service, extra) in services.iter_mut().zip(additionals) {
        if let Some(ip) = address(extra) {
            service.ip = Some(ip);
        }
    }

    services
}

fn address(record: &Record) -> Option<IpAddr> {
    match record.data() {
        RData::A(a) => Some(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
        _ => None,
    }
}
