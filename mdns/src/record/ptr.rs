use std::fmt;

use crate::subject::{ReadSubject, Subject};
use crate::wire::*;


/// A **PTR** record, which points from a service name to one instance of
/// that service. Service discovery is built on these: every responder
/// offering the service answers the service name's PTR query with its own
/// instance name.
///
/// # References
///
/// - [RFC 1035 §3.3.12](https://tools.ietf.org/html/rfc1035) — Domain Names,
///   Implementation and Specification (November 1987)
/// - [RFC 6763 §4.1](https://tools.ietf.org/html/rfc6763) — DNS-Based
///   Service Discovery (February 2013)
#[derive(PartialEq, Debug, Clone)]
pub struct PTR {

    /// The name being pointed at. Inside packets in the wild this is nearly
    /// always compressed, so it is read through the whole-packet cursor.
    pub name: Subject,
}

impl Wire for PTR {
    const NAME: &'static str = "PTR";
    const RR_TYPE: u16 = 0x000C;

    fn read(_stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let name = c.read_subject()?;
        Ok(Self { name })
    }
}

impl fmt::Display for PTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses() {
        let buf = &[
            0x07, 0x6b, 0x69, 0x74, 0x63, 0x68, 0x65, 0x6e,  // "kitchen"
            0x05, 0x6c, 0x6f, 0x63, 0x61, 0x6c,  // "local"
            0x00,  // terminator
        ];

        assert_eq!(PTR::read(buf.len() as _, &mut Cursor::new(buf)).unwrap(),
                   PTR { name: Subject::encode("kitchen.local.").unwrap() });
    }

    #[test]
    fn empty() {
        assert_eq!(PTR::read(0, &mut Cursor::new(&[])),
                   Err(WireError::IO));
    }
}
