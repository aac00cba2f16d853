use human_panic::setup_panic;
use ssdp_lite::ssdp::query::QueryClient;
use ssdp_lite::server::Server;
use ssdp_lite::transport::udp::UdpTransport;
use ssdp_lite::tree::simple::{Device, Root};
use ssdp_lite::Config;
use std::str::FromStr;
use std::time::Duration;
use structopt::StructOpt;
use tracing::{info, warn, Level};

#[derive(Debug, StructOpt)]
#[structopt(name = "ssdp-tool")]
struct CommandLine {
    /// The level of logging to perform, from off to trace
    #[structopt(long, short = "v", parse(from_occurrences))]
    verbose: i8,

    /// Network interface to bind to; defaults to the first non-loopback interface.
    #[structopt(long, short)]
    interface: Option<String>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Multicast a search and print matching replies until the timeout expires.
    Search {
        /// `root`, `uuid:<device-uuid>`, or `urn:<domain>:device|service:<type>:<ver>`.
        #[structopt(long, short = "t", default_value = "root")]
        target: CLSearchTarget,

        /// Request expansion to embedded devices and services (ignored for uuid/urn searches
        /// where it does not apply... see the crate docs for exact semantics).
        #[structopt(long)]
        all: bool,

        /// Milliseconds to wait for replies.
        #[structopt(long)]
        timeout_ms: Option<u64>,
    },
    /// Serve a small built-in sample device tree, answering searches on the wire.
    Serve {
        /// Milliseconds between ticks of the server loop.
        #[structopt(long, default_value = "200")]
        tick_ms: u64,
    },
}

#[derive(Debug)]
struct CLSearchTarget(String);

impl FromStr for CLSearchTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CLSearchTarget(if s == "root" {
            "upnp:rootdevice".to_string()
        } else {
            s.to_string()
        }))
    }
}

pub fn main() {
    setup_panic!();

    let args = CommandLine::from_args();
    init_tracing(args.verbose);

    let config = Config::default();

    match args.cmd {
        Command::Search {
            target,
            all,
            timeout_ms,
        } => do_search(&config, args.interface, &target.0, all, timeout_ms),
        Command::Serve { tick_ms } => do_serve(&config, args.interface, tick_ms),
    }
}

fn init_tracing(verbosity: i8) {
    let level = match verbosity {
        0 => None,
        1 => Some(Level::ERROR),
        2 => Some(Level::WARN),
        3 => Some(Level::INFO),
        4 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    };
    if let Some(level) = level {
        tracing_subscriber::fmt().with_max_level(level).init();
    }
    info!("ssdp-tool starting, verbosity {}", verbosity);
}

fn do_search(config: &Config, interface: Option<String>, target: &str, all: bool, timeout_ms: Option<u64>) {
    let transport = match UdpTransport::open(interface) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to open transport: {}", e);
            return;
        }
    };

    let client = QueryClient::new(config);
    let timeout = timeout_ms.map(Duration::from_millis);
    let mut count = 0;
    let result = client.search(target, all, timeout, &transport, |response| {
        count += 1;
        println!(
            "{}: name={} location={:?} usn={:?}",
            count, response.display_name, response.location, response.usn
        );
    });

    match result {
        Ok(n) => println!("search complete, {} response(s)", n),
        Err(e) => eprintln!("search failed: {}", e),
    }
}

fn do_serve(config: &Config, interface: Option<String>, tick_ms: u64) {
    let transport = match UdpTransport::open(interface) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("failed to open transport: {}", e);
            return;
        }
    };

    let root = Root::new(
        "4d696e69-0000-0000-0000-000000000001",
        "upnp:rootdevice",
        "ssdp-tool sample root",
        8080,
    )
    .add_service(
        "4d696e69-0000-0000-0000-000000000002",
        "urn:x-com:service:Ping:1",
        "Ping",
    )
    .add_device(
        Device::new(
            "4d696e69-0000-0000-0000-000000000003",
            "urn:x-com:device:Clock:1",
            "Clock",
        )
        .add_service(
            "4d696e69-0000-0000-0000-000000000004",
            "urn:x-com:service:Time:1",
            "Time",
        ),
    );

    let server = Server::new(config);
    println!("serving sample tree, Ctrl-C to stop");
    loop {
        if let Err(e) = server.tick(&root, &transport) {
            warn!("tick failed: {}", e);
        }
        std::thread::sleep(Duration::from_millis(tick_ms));
    }
}
