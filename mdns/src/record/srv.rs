use std::fmt;

use crate::subject::{ReadSubject, Subject};
use crate::wire::*;


/// A **SRV** record, which says where an instance of a service actually
/// lives: the hostname of the machine running it, and the port it listens
/// on.
///
/// # References
///
/// - [RFC 2782](https://tools.ietf.org/html/rfc2782) — A DNS RR for
///   specifying the location of services (February 2000)
#[derive(PartialEq, Debug, Clone)]
pub struct SRV {

    /// The priority of this host among all that get returned. Lower values
    /// are higher priority.
    pub priority: u16,

    /// A weight to choose among results with the same priority. Higher
    /// values are higher priority.
    pub weight: u16,

    /// The port the service is serving on.
    pub port: u16,

    /// The hostname of the machine the service is running on.
    pub target: Subject,
}

impl Wire for SRV {
    const NAME: &'static str = "SRV";
    const RR_TYPE: u16 = 0x0021;

    fn read(_stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let priority = c.read_u16::<BigEndian>()?;
        let weight   = c.read_u16::<BigEndian>()?;
        let port     = c.read_u16::<BigEndian>()?;
        let target   = c.read_subject()?;

        Ok(Self { priority, weight, port, target })
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.priority, self.weight, self.port, self.target)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses() {
        let buf = &[
            0x00, 0x00,  // priority
            0x00, 0x05,  // weight
            0x1f, 0x49,  // port
            0x07, 0x6b, 0x69, 0x74, 0x63, 0x68, 0x65, 0x6e,  // "kitchen"
            0x05, 0x6c, 0x6f, 0x63, 0x61, 0x6c,  // "local"
            0x00,  // terminator
        ];

        assert_eq!(SRV::read(buf.len() as _, &mut Cursor::new(buf)).unwrap(),
                   SRV {
                       priority: 0,
                       weight: 5,
                       port: 8009,
                       target: Subject::encode("kitchen.local.").unwrap(),
                   });
    }

    #[test]
    fn field_order_is_big_endian() {
        let buf = &[
            0x00, 0x01,  // priority
            0x00, 0x02,  // weight
            0x00, 0x03,  // port
            0x00,  // root target
        ];

        let srv = SRV::read(buf.len() as _, &mut Cursor::new(buf)).unwrap();
        assert_eq!((srv.priority, srv.weight, srv.port), (1, 2, 3));
    }

    #[test]
    fn empty() {
        assert_eq!(SRV::read(0, &mut Cursor::new(&[])),
                   Err(WireError::IO));
    }
}
