//! castwatch, the command-line Chromecast watcher.

#![warn(deprecated_in_future)]
#![warn(future_incompatible)]
#![warn(missing_copy_implementations)]
#![warn(missing_docs)]
#![warn(nonstandard_style)]
#![warn(rust_2018_compatibility)]
#![warn(rust_2018_idioms)]
#![warn(single_use_lifetimes)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused)]

#![deny(unsafe_code)]


use std::env;
use std::process::exit;

use log::*;

use chromecast::{DiscoveryUpdate, KnownDevice};

mod options;
use self::options::{Options, OptionsResult};


/// Configures logging, parses the command-line options, and hands control
/// over to the watch loop.
fn main() {
    configure_logger();

    match Options::getopts(env::args_os().skip(1)) {
        OptionsResult::Ok(options) => {
            info!("Running with options -> {:#?}", options);
            exit(run(options));
        }

        OptionsResult::Help(usage) => {
            print!("{}", usage);
            exit(exits::SUCCESS);
        }

        OptionsResult::Version => {
            println!("castwatch {}", env!("CARGO_PKG_VERSION"));
            exit(exits::SUCCESS);
        }

        OptionsResult::InvalidOptionsFormat(oe) => {
            eprintln!("Invalid options: {}", oe);
            exit(exits::OPTIONS_ERROR);
        }

        OptionsResult::InvalidOptions(why) => {
            eprintln!("{}", why);
            exit(exits::OPTIONS_ERROR);
        }
    }
}


/// Checks the `CASTWATCH_DEBUG` environment variable, enabling debug
/// logging if it's non-empty.
fn configure_logger() {
    let present = match env::var_os("CASTWATCH_DEBUG") {
        Some(debug)  => debug.len() > 0,
        None         => false,
    };

    let mut logs = env_logger::Builder::new();
    if present {
        let _ = logs.filter(None, log::LevelFilter::Debug);
    }
    else {
        let _ = logs.filter(None, log::LevelFilter::Off);
    }

    logs.init()
}


/// Starts the discovery service and prints one line per update until
/// interrupted.
fn run(options: Options) -> i32 {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime)  => runtime,
        Err(e)       => {
            eprintln!("Failed to create runtime: {}", e);
            return exits::RUNTIME_ERROR;
        }
    };

    runtime.block_on(async move {
        let (discoverer, mut updates) = chromecast::discover(options.network);

        if let Some(interval) = options.interval {
            discoverer.set_query_interval(interval);
        }

        if let Some(rate) = options.expire_rate {
            if let Err(e) = discoverer.set_expire_rate(rate) {
                eprintln!("{}", e);
                return exits::OPTIONS_ERROR;
            }
        }

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping discovery");
                    discoverer.stop();
                }
                update = updates.recv() => match update {
                    Some(update) => print_update(&discoverer, update).await,
                    None         => break exits::SUCCESS,
                }
            }
        }
    })
}


/// Prints one update, resolving the device's details where it is still in
/// the table.
async fn print_update(discoverer: &chromecast::Discoverer, update: DiscoveryUpdate) {
    if ! update.active {
        println!("- {}", update.id);
        return;
    }

    match discoverer.get(update.id).await {
        Some(device)  => println!("+ {}  {}", update.id, describe(&device)),
        None          => println!("+ {}", update.id),
    }
}


/// A one-line description of a device.
fn describe(device: &KnownDevice) -> String {
    let address = match (device.ipv4, device.ipv6) {
        (Some(v4), _)     => v4.to_string(),
        (None, Some(v6))  => v6.to_string(),
        (None, None)      => String::from("?"),
    };

    format!("{} ({})  {}  {}", device.friendly_name, device.model, device.hostname, address)
}


mod exits {

    /// Exit code for when everything turns out OK.
    pub const SUCCESS: i32 = 0;

    /// Exit code for when the command-line options are invalid.
    pub const OPTIONS_ERROR: i32 = 3;

    /// Exit code for when the async runtime fails to start.
    pub const RUNTIME_ERROR: i32 = 4;
}
