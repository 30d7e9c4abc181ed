//! Command line interface.

use crate::render::OutputMode;
use clap::{builder::BoolishValueParser, ArgAction, CommandFactory, Parser};
use std::{ffi::OsString, path::Path};

/// Flags that may be written with a single dash despite being longer than
/// one character. Switches among them also take an optional `=BOOL`.
const LONG_FLAGS: &[&str] = &["ns", "env", "json", "relax"];

/// Resolve SRV records and render them as `host:port` lines, environment
/// variables or JSON.
#[derive(Debug, Default, Parser)]
#[command(name = "srvaddr", version)]
pub struct Args {
    /// Path to a template to use. If '-', reads from stdin. Defaults to a built-in template.
    #[arg(short = 't', long = "t", value_name = "PATH")]
    pub template: Option<String>,

    /// Nameserver to use. Defaults to the configuration in /etc/resolv.conf.
    #[arg(long = "ns", value_name = "HOST:PORT")]
    pub nameserver: Option<String>,

    /// Default to the environment variable output template.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub env: bool,

    /// Output a JSON representation of the results, instead of rendering a template.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub json: bool,

    /// Treat names that return no results as non-fatal.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub relax: bool,

    /// SRV names to look up, optionally prefixed with `NAME=` to group their
    /// results under NAME.
    #[arg(value_name = "QUERY")]
    pub queries: Vec<String>,
}

impl Args {
    /// Parses arguments, accepting `-ns`, `-env`, `-json` and `-relax` as
    /// well as their double-dash forms.
    pub fn parse_compat<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }

    /// Gets the output mode the flags select.
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::select(self.template.as_deref().map(Path::new), self.env, self.json)
    }

    /// Usage text printed when no query is given.
    pub fn usage() -> String {
        let mut command = Self::command();
        format!(
            "{}\n\
             Examples:\n  \
             srvaddr _api._tcp.internal\n      \
             List hostnames and TCP ports for the `api` service.\n\n  \
             srvaddr -env ZK=_zk._tcp.service.consul MQ=_mq._tcp.service.consul\n      \
             Look up the `zk` and `mq` services, printing them as environment variables \
             `ZK_ADDR0=host:port`, `ZK_HOST0=host`, ...\n",
            command.render_help()
        )
    }
}

/// Rewrites single-dash long flags (`-ns`, `-json=true`, ...) into their
/// double-dash form. Everything after a `--` terminator is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut terminated = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if terminated {
                return arg;
            }
            let Some(s) = arg.to_str() else {
                return arg;
            };
            if s == "--" {
                terminated = true;
                return arg;
            }
            match s.strip_prefix('-') {
                Some(flag) if !flag.starts_with('-') && is_long_flag(flag) => {
                    OsString::from(format!("-{s}"))
                }
                _ => arg,
            }
        })
        .collect()
}

fn is_long_flag(flag: &str) -> bool {
    let name = flag.split_once('=').map_or(flag, |(name, _)| name);
    LONG_FLAGS.contains(&name)
}
