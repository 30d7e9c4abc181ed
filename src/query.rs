//! Queries given on the command line.

/// A SRV name to look up, along with the alias its results are grouped under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Key the query's services are stored under in the output.
    pub alias: String,
    /// SRV name actually sent to the nameserver.
    pub domain: String,
}

/// Parses a query of the form `domain` or `alias=domain`.
///
/// Only the first `=` separates the alias from the domain; without one, the
/// alias is the domain itself. Neither part is validated.
///
/// ```
/// use srvaddr::{parse_query, Query};
/// assert_eq!(
///     parse_query("ZK=_zk._tcp.service.consul"),
///     Query {
///         alias: String::from("ZK"),
///         domain: String::from("_zk._tcp.service.consul"),
///     }
/// );
/// assert_eq!(parse_query("_api._tcp.internal").alias, "_api._tcp.internal");
/// ```
pub fn parse_query(raw: &str) -> Query {
    let (alias, domain) = raw.split_once('=').unwrap_or((raw, raw));
    Query {
        alias: alias.to_string(),
        domain: domain.to_string(),
    }
}
