use std::fmt;
use std::io;


/// Something that can go wrong running an mDNS query.
#[derive(Debug)]
pub enum Error {

    /// The question being sent could not be built, because the name being
    /// asked about is not a legal hostname.
    Wire(mdns::WireError),

    /// There was a problem with the network opening the socket, joining
    /// the multicast group, or sending the query.
    ///
    /// Decoding problems with individual arriving datagrams are _not_
    /// reported through here — mDNS is lossy and multi-responder, so a
    /// session drops undecodable packets and keeps listening.
    Network(io::Error),
}


// From impls

impl From<mdns::WireError> for Error {
    fn from(inner: mdns::WireError) -> Self {
        Self::Wire(inner)
    }
}

impl From<io::Error> for Error {
    fn from(inner: io::Error) -> Self {
        Self::Network(inner)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(wire)        => write!(f, "{}", wire),
            Self::Network(network)  => write!(f, "network error: {}", network),
        }
    }
}
