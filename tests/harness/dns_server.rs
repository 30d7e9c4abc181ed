//! Minimal mock DNS server answering SRV queries over TCP.

use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use hickory_proto::{
    op::{Message, MessageType, OpCode, ResponseCode},
    rr::{
        rdata::{A, AAAA, SRV},
        Name, RData, Record, RecordType,
    },
    serialize::binary::{BinDecodable, BinEncodable},
};

/// A minimal DNS server that responds to SRV queries, adding an address
/// record for every SRV target that has one.
pub struct MockDns {
    records: Vec<MockSrv>,
}

impl MockDns {
    /// Create a DNS server with the given SRV records.
    pub fn new(records: &[MockSrv]) -> Self {
        Self {
            records: records.to_vec(),
        }
    }

    /// Start the server in a background thread, listening on an ephemeral
    /// loopback port.
    pub fn spawn(&self) -> io::Result<DnsServerHandle> {
        let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);
        let records = self.records.clone();
        let join_handle =
            std::thread::spawn(move || Self::run(&records, &listener, &shutdown_clone));

        Ok(DnsServerHandle {
            addr,
            shutdown,
            join_handle: Some(join_handle),
        })
    }

    /// Run the server loop, blocking the current thread.
    /// Returns when shutdown is triggered or an unrecoverable error occurs.
    fn run(records: &[MockSrv], listener: &TcpListener, shutdown: &AtomicBool) -> io::Result<()> {
        while !shutdown.load(Ordering::Relaxed) {
            let stream = match listener.accept() {
                Ok((stream, _)) => stream,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(10));
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            // A misbehaving client must not take the server down.
            let _ = Self::serve(records, stream);
        }

        Ok(())
    }

    /// Answer the single request sent on a connection.
    fn serve(records: &[MockSrv], mut stream: TcpStream) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(Duration::from_millis(1000)))?;

        let mut len = [0u8; 2];
        stream.read_exact(&mut len)?;
        let mut query = vec![0u8; u16::from_be_bytes(len) as usize];
        stream.read_exact(&mut query)?;

        let response = Self::handle_query(records, &query)
            .map_err(|()| io::Error::new(io::ErrorKind::InvalidData, "bad query"))?;
        stream.write_all(&(response.len() as u16).to_be_bytes())?;
        stream.write_all(&response)
    }

    fn handle_query(records: &[MockSrv], query_bytes: &[u8]) -> Result<Vec<u8>, ()> {
        let query = Message::from_bytes(query_bytes).map_err(|_| ())?;
        assert!(
            query
                .queries()
                .iter()
                .all(|q| q.query_type() == RecordType::SRV),
            "expected only SRV queries in the query",
        );

        let mut response = Message::new();
        response.set_id(query.id());
        response.set_message_type(MessageType::Response);
        response.set_op_code(OpCode::Query);
        response.set_authoritative(true);
        response.set_recursion_desired(query.recursion_desired());
        response.set_recursion_available(false);

        for question in query.queries() {
            response.add_query(question.clone());
            let qname = Self::normalize_name(&question.name().to_string());
            let matching: Vec<&MockSrv> = records
                .iter()
                .filter(|srv| Self::normalize_name(srv.name) == qname)
                .collect();
            let answers = matching
                .iter()
                .filter_map(|srv| Self::create_srv_record(srv, question.name().clone()).ok());
            let additionals = matching
                .iter()
                .filter_map(|srv| Self::create_address_record(srv));
            response.add_answers(answers);
            response.add_additionals(additionals);
        }

        if response.answers().is_empty() {
            response.set_response_code(ResponseCode::NXDomain);
        }

        response.to_bytes().map_err(|_| ())
    }

    /// Normalize a DNS name for comparison (lowercase, no trailing dot).
    fn normalize_name(name: &str) -> String {
        name.to_lowercase().trim_end_matches('.').to_string()
    }

    fn create_srv_record(srv: &MockSrv, name: Name) -> Result<Record, ()> {
        let target = Name::from_utf8(srv.target).map_err(|_| ())?;
        let srv_rdata = SRV::new(srv.priority, srv.weight, srv.port, target);
        let record = Record::from_rdata(name, srv.ttl, RData::SRV(srv_rdata));
        Ok(record)
    }

    fn create_address_record(srv: &MockSrv) -> Option<Record> {
        let target = Name::from_utf8(srv.target).ok()?;
        let rdata = match srv.address?.parse::<IpAddr>().ok()? {
            IpAddr::V4(ip) => RData::A(A(ip)),
            IpAddr::V6(ip) => RData::AAAA(AAAA(ip)),
        };
        Some(Record::from_rdata(target, srv.ttl, rdata))
    }
}

/// Static SRV record definition for use in test configurations.
#[derive(Clone, Debug)]
pub struct MockSrv {
    /// The SRV name (e.g., `_http._tcp.example.com`)
    pub name: &'static str,
    /// Priority value
    pub priority: u16,
    /// Weight value
    pub weight: u16,
    /// Port number
    pub port: u16,
    /// Target hostname
    pub target: &'static str,
    /// TTL in seconds
    pub ttl: u32,
    /// Address of the target, sent in the additional section
    pub address: Option<&'static str>,
}

impl MockSrv {
    /// Create a new SRV record without an address for its target.
    pub const fn new(name: &'static str, port: u16, target: &'static str) -> Self {
        Self {
            name,
            priority: 10,
            weight: 100,
            port,
            target,
            ttl: 300,
            address: None,
        }
    }

    /// Attach an address record for the target.
    pub const fn with_address(self, address: &'static str) -> Self {
        Self {
            address: Some(address),
            ..self
        }
    }
}

/// Handle for the mock DNS server that shuts it down when dropped.
pub struct DnsServerHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<std::io::Result<()>>>,
}

impl DnsServerHandle {
    /// Address the server listens on, as `host:port`.
    pub fn addr(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for DnsServerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}
