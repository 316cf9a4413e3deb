//! All the mDNS record types, as well as how to parse each type.

use std::fmt;


mod a;
pub use self::a::A;

mod aaaa;
pub use self::aaaa::AAAA;

mod cname;
pub use self::cname::CNAME;

mod ptr;
pub use self::ptr::PTR;

mod srv;
pub use self::srv::SRV;

mod txt;
pub use self::txt::TXT;


/// The types of record that can be asked for and answered with over mDNS.
/// Codes this crate has no parser for are retained as opaque numbers.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum RecordType {

    /// An **A** record.
    A,

    /// A **CNAME** record.
    CNAME,

    /// A **PTR** record.
    PTR,

    /// A **TXT** record.
    TXT,

    /// An **AAAA** record.
    AAAA,

    /// A **SRV** record.
    SRV,

    /// The pseudo-type that asks a responder for records of every type.
    Any,

    /// A type code that does not map to any type this crate parses.
    Other(u16),
}

impl RecordType {

    /// Interprets the given type code from a packet.
    pub fn from_u16(uu: u16) -> Self {
        match uu {
            0x0001 => Self::A,
            0x0005 => Self::CNAME,
            0x000C => Self::PTR,
            0x0010 => Self::TXT,
            0x001C => Self::AAAA,
            0x0021 => Self::SRV,
            0x00FF => Self::Any,
                 _ => Self::Other(uu),
        }
    }

    /// Converts this type into the code that goes in a packet.
    pub fn to_u16(self) -> u16 {
        match self {
            Self::A          => 0x0001,
            Self::CNAME      => 0x0005,
            Self::PTR        => 0x000C,
            Self::TXT        => 0x0010,
            Self::AAAA       => 0x001C,
            Self::SRV        => 0x0021,
            Self::Any        => 0x00FF,
            Self::Other(uu)  => uu,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A          => write!(f, "A"),
            Self::CNAME      => write!(f, "CNAME"),
            Self::PTR        => write!(f, "PTR"),
            Self::TXT        => write!(f, "TXT"),
            Self::AAAA       => write!(f, "AAAA"),
            Self::SRV        => write!(f, "SRV"),
            Self::Any        => write!(f, "Any"),
            Self::Other(uu)  => write!(f, "[{:04x}]", uu),
        }
    }
}


/// A record that's been parsed from a byte buffer.
#[derive(PartialEq, Debug, Clone)]
pub enum Record {

    /// An **A** record.
    A(A),

    /// An **AAAA** record.
    AAAA(AAAA),

    /// A **CNAME** record.
    CNAME(CNAME),

    /// A **PTR** record.
    PTR(PTR),

    /// A **SRV** record.
    SRV(SRV),

    /// A **TXT** record.
    TXT(TXT),

    /// A record with a type this crate does not parse. The payload octets
    /// are kept verbatim.
    Other {

        /// The number that's meant to represent the record type.
        type_number: u16,

        /// The unparsed octets that were in this record.
        bytes: Vec<u8>,
    },
}

impl Record {

    /// The type of this record.
    pub fn rtype(&self) -> RecordType {
        match self {
            Self::A(_)                      => RecordType::A,
            Self::AAAA(_)                   => RecordType::AAAA,
            Self::CNAME(_)                  => RecordType::CNAME,
            Self::PTR(_)                    => RecordType::PTR,
            Self::SRV(_)                    => RecordType::SRV,
            Self::TXT(_)                    => RecordType::TXT,
            Self::Other { type_number, .. } => RecordType::from_u16(*type_number),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(a)          => write!(f, "{}", a),
            Self::AAAA(aaaa)    => write!(f, "{}", aaaa),
            Self::CNAME(cname)  => write!(f, "{}", cname),
            Self::PTR(ptr)      => write!(f, "{}", ptr),
            Self::SRV(srv)      => write!(f, "{}", srv),
            Self::TXT(txt)      => write!(f, "{}", txt),
            Self::Other { type_number, bytes } => {
                write!(f, "{} record of {} octets", RecordType::from_u16(*type_number), bytes.len())
            }
        }
    }
}
