//! SRV lookups against a single nameserver.

use crate::{correlate, Error, Query, Records, Service};
use async_trait::async_trait;
use hickory_proto::{
    op::{Message, MessageType, OpCode, Query as Question},
    rr::{Name, RecordType},
    ProtoError,
};

pub mod conf;
pub mod tcp;

/// Errors encountered while exchanging a message with a nameserver.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The queried name is not a valid DNS name.
    #[error("invalid name {name:?}: {source}")]
    InvalidName {
        /// Name as given by the user.
        name: String,
        /// Reason the name was rejected.
        #[source]
        source: ProtoError,
    },
    /// Encoding the request or decoding the reply failed.
    #[error("{0}")]
    Proto(#[from] ProtoError),
    /// Transport errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// No reply arrived in time.
    #[error("timed out waiting for {0}")]
    Timeout(String),
    /// The reply does not answer the request that was sent.
    #[error("reply id {received} does not match request id {sent}")]
    IdMismatch {
        /// Id of the request.
        sent: u16,
        /// Id of the reply.
        received: u16,
    },
    /// Request does not fit in a single TCP DNS message.
    #[error("request of {0} bytes exceeds the maximum message size (65535)")]
    RequestTooLarge(usize),
}

/// Represents the ability to exchange DNS messages with a nameserver.
#[async_trait]
pub trait SrvExchange: Send + Sync {
    /// Sends `request` and waits for the matching reply.
    async fn exchange(&self, request: &Message) -> Result<Message, ExchangeError>;

    /// Asks for the SRV records of `domain`, returning the whole reply so
    /// the additional section stays available.
    async fn lookup(&self, domain: &str) -> Result<Message, ExchangeError> {
        let request = srv_request(domain, rand::random())?;
        self.exchange(&request).await
    }
}

/// Appends the root label to `domain` unless it already ends with one.
pub fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

/// Builds a recursive SRV query for `domain` with the given message id.
pub fn srv_request(domain: &str, id: u16) -> Result<Message, ExchangeError> {
    let name = Name::from_utf8(fqdn(domain)).map_err(|source| ExchangeError::InvalidName {
        name: domain.to_string(),
        source,
    })?;

    let mut request = Message::new();
    request
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Question::query(name, RecordType::SRV));
    Ok(request)
}

/// Looks up every query in order, collecting the services found under each
/// query's alias.
///
/// The first failing lookup aborts the whole batch. A reply without answers
/// is an error too, unless `relax` is set, in which case the alias maps to
/// an empty list. A later query with the same alias replaces the services of
/// an earlier one.
pub async fn resolve_queries<E: SrvExchange + ?Sized>(
    exchange: &E,
    queries: &[Query],
    relax: bool,
) -> Result<Records, Error> {
    let mut records = Records::new();
    for query in queries {
        let services = resolve_query(exchange, query, relax).await?;
        records.insert(query.alias.clone(), services);
    }
    Ok(records)
}

async fn resolve_query<E: SrvExchange + ?Sized>(
    exchange: &E,
    query: &Query,
    relax: bool,
) -> Result<Vec<Service>, Error> {
    #[cfg(feature = "log")]
    tracing::debug!(alias = %query.alias, domain = %query.domain, "looking up SRV records");

    let reply = exchange.lookup(&query.domain).await?;
    if reply.answers().is_empty() {
        if !relax {
            return Err(Error::NoRecords(query.domain.clone()));
        }
        #[cfg(feature = "log")]
        tracing::warn!(domain = %query.domain, rcode = %reply.response_code(), "no SRV records returned");
    }

    let services = correlate(reply.answers(), reply.additionals());
    #[cfg(feature = "log")]
    tracing::debug!(alias = %query.alias, count = services.len(), "resolved services");
    Ok(services)
}
