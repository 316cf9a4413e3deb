//! Command-line option parsing.

use std::ffi::OsStr;
use std::time::Duration;

use log::*;

use mdns_transport::Network;


/// The command-line options used when running castwatch.
#[derive(PartialEq, Debug)]
pub struct Options {

    /// Which IP version to discover over, and on which interface.
    pub network: Network,

    /// A query interval to use instead of the service's default.
    pub interval: Option<Duration>,

    /// An expire rate to use instead of the service's default.
    pub expire_rate: Option<u32>,
}

impl Options {

    /// Parses and interprets a set of options from the user's command-line
    /// arguments.
    #[allow(unused_results)]
    pub fn getopts<C>(args: C) -> OptionsResult
    where C: IntoIterator,
          C::Item: AsRef<OsStr>,
    {
        let mut opts = getopts::Options::new();

        // Network options
        opts.optopt ("i", "interface",      "Address of the IPv4 interface to discover on", "ADDR");
        opts.optflag("6", "ipv6",           "Discover over IPv6 instead of IPv4");
        opts.optopt ("",  "ipv6-interface", "Index of the IPv6 interface to discover on", "INDEX");

        // Discovery options
        opts.optopt ("",  "interval",       "Seconds between discovery queries", "SECS");
        opts.optopt ("",  "expire-rate",    "Missed queries before a device is considered gone", "NUM");

        // Meta options
        opts.optflag("V", "version",        "Print version information");
        opts.optflag("?", "help",           "Print list of command-line options");

        let matches = match opts.parse(args) {
            Ok(m)   => m,
            Err(e)  => return OptionsResult::InvalidOptionsFormat(e),
        };

        if matches.opt_present("help") {
            return OptionsResult::Help(opts.usage("Usage:\n  castwatch [options]"));
        }

        if matches.opt_present("version") {
            return OptionsResult::Version;
        }

        let network = if matches.opt_present("ipv6") || matches.opt_present("ipv6-interface") {
            let interface = match matches.opt_str("ipv6-interface") {
                Some(input) => match input.parse() {
                    Ok(index)  => Some(index),
                    Err(e)     => {
                        warn!("Invalid interface index {:?}: {}", input, e);
                        return OptionsResult::InvalidOptions("Invalid IPv6 interface index");
                    }
                },
                None => None,
            };
            Network::V6 { interface }
        }
        else {
            let interface = match matches.opt_str("interface") {
                Some(input) => match input.parse() {
                    Ok(address)  => Some(address),
                    Err(e)       => {
                        warn!("Invalid interface address {:?}: {}", input, e);
                        return OptionsResult::InvalidOptions("Invalid IPv4 interface address");
                    }
                },
                None => None,
            };
            Network::V4 { interface }
        };

        let interval = match matches.opt_str("interval") {
            Some(input) => match input.parse::<u64>() {
                Ok(secs) if secs > 0  => Some(Duration::from_secs(secs)),
                _                     => return OptionsResult::InvalidOptions("Invalid query interval"),
            },
            None => None,
        };

        let expire_rate = match matches.opt_str("expire-rate") {
            Some(input) => match input.parse::<u32>() {
                Ok(rate) if rate >= 1  => Some(rate),
                _                      => return OptionsResult::InvalidOptions("Invalid expire rate"),
            },
            None => None,
        };

        OptionsResult::Ok(Self { network, interval, expire_rate })
    }
}


/// The result of the `Options::getopts` function.
#[derive(Debug)]
pub enum OptionsResult {

    /// The options were parsed successfully.
    Ok(Options),

    /// Help was requested, so the usage text should be printed.
    Help(String),

    /// Version information was requested.
    Version,

    /// The command-line arguments themselves failed to parse.
    InvalidOptionsFormat(getopts::Fail),

    /// The arguments parsed, but did not make sense.
    InvalidOptions(&'static str),
}
