#![deny(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/*!
Resolve services located by DNS SRV records and render them for scripts.

# Introduction

SRV Records, as defined in [RFC 2782](https://tools.ietf.org/html/rfc2782),
are DNS records of the form

`_Service._Proto.Name TTL Class SRV Priority Weight Port Target`

For instance, a DNS server might respond with the following SRV records for
`_zk._tcp.service.consul`, along with address records for each target in the
additional section of the reply:

```text
;; ANSWER SECTION:
_zk._tcp.service.consul. 0 IN SRV 1 1 2181 zk1.node.dc1.consul.
_zk._tcp.service.consul. 0 IN SRV 1 1 2181 zk2.node.dc1.consul.
;; ADDITIONAL SECTION:
zk1.node.dc1.consul.     0 IN A   10.0.0.11
zk2.node.dc1.consul.     0 IN A   10.0.0.12
```

`srvaddr` sends one SRV query per requested name, collects the targets under
a user-chosen alias, and renders the whole set either as JSON or through a
[`minijinja`] template. Two templates are built in: a plain `host:port`
listing and a shell environment variable emitter:

```text
$ srvaddr -env ZK=_zk._tcp.service.consul
ZK_ADDR0=zk1.node.dc1.consul:2181
ZK_HOST0=zk1.node.dc1.consul
ZK_PORT0=2181
ZK_ADDR1=zk2.node.dc1.consul:2181
ZK_HOST1=zk2.node.dc1.consul
ZK_PORT1=2181
```

The library exposes each stage of that pipeline: [`Query`] parsing,
the [`SrvExchange`] seam used to talk to a nameserver (with a TCP
implementation in [`resolver::tcp`]), correlation of replies into
[`Service`] descriptors, and the [`Renderer`].

[`SrvExchange`]: resolver::SrvExchange
[`Renderer`]: render::Renderer
*/

pub mod cli;

mod error;
pub use error::Error;

mod query;
pub use query::{parse_query, Query};

mod record;
pub use record::{correlate, Records, Service};

pub mod render;
pub mod resolver;

/// Default location of the system resolver configuration.
pub const RESOLV_CONF: &str = "/etc/resolv.conf";

/// Runs the whole pipeline described by `args`, writing the rendered result
/// to `out`.
///
/// Every stage runs to completion before the next starts, and the first
/// error aborts the run without writing anything.
pub async fn run(args: &cli::Args, out: impl std::io::Write) -> Result<(), Error> {
    let nameserver = resolver::conf::nameserver_address(args.nameserver.as_deref(), RESOLV_CONF)?;
    let renderer = render::Renderer::new(args.output_mode())?;

    let queries: Vec<Query> = args.queries.iter().map(|q| parse_query(q)).collect();
    let exchange = resolver::tcp::TcpExchange::new(nameserver);
    let records = resolver::resolve_queries(&exchange, &queries, args.relax).await?;

    renderer.render(&records, out)
}
