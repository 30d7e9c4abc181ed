// Shared test infrastructure: not every test binary uses every item.
#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Output, Stdio};

pub mod dns_server;

use dns_server::MockSrv;

/// Records served in every test unless otherwise specified.
pub static DEFAULT_RECORDS: &[MockSrv] = &[
    MockSrv::new("_http._tcp.test.local", 8080, "web1.test.local.").with_address("10.0.0.1"),
    MockSrv::new("_http._tcp.test.local", 8081, "web2.test.local.").with_address("10.0.0.2"),
    MockSrv::new("_zk._tcp.test.local", 2181, "zk1.test.local.").with_address("10.0.1.1"),
    MockSrv::new("_mq._tcp.test.local", 5672, "mq1.test.local."),
];

/// Runs the `srvaddr` binary with `args`, feeding it `stdin`.
pub fn srvaddr(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_srvaddr"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start srvaddr");
    // Dropping the pipe closes it; srvaddr only reads it for `-t -`.
    let mut pipe = child.stdin.take().unwrap();
    if !stdin.is_empty() {
        pipe.write_all(stdin.as_bytes())
            .expect("failed to write stdin");
    }
    drop(pipe);
    child.wait_with_output().expect("failed to wait for srvaddr")
}

/// Standard output of a successful run.
pub fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "srvaddr failed ({:?}): {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is not utf-8")
}
