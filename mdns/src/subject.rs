//! Reading and writing names on the mDNS wire.

use std::fmt;
use std::io::{self, Write};

use log::*;

use crate::wire::*;


/// The longest label a name may contain, per RFC 1035 §2.3.4.
const MAXIMUM_LABEL_LENGTH: usize = 63;

/// How many compression pointers one name is allowed to chase.
const RECURSION_LIMIT: usize = 8;


/// A DNS name held in its canonical wire form: a series of labels, each
/// prefixed by its length octet, terminated by a zero octet (RFC 1035
/// §4.1.2–3). The stored bytes never contain a compression pointer —
/// pointers are resolved while decoding, so two subjects naming the same
/// thing always compare equal byte-for-byte.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub struct Subject {
    bytes: Vec<u8>,
}

impl Subject {

    /// Creates the name of the DNS root: no labels, just the terminator.
    /// Its string form is the empty string.
    pub fn root() -> Self {
        Self { bytes: vec![ 0 ] }
    }

    /// Encodes the given dotted-format hostname as a subject. At most one
    /// trailing dot is stripped; it is implied by the wire form.
    ///
    /// Returns an error if any label is empty (adjacent dots, or a leading
    /// dot) or longer than 63 octets.
    pub fn encode(input: &str) -> Result<Self, WireError> {
        let stripped = input.strip_suffix('.').unwrap_or(input);

        let mut bytes = Vec::with_capacity(stripped.len() + 2);
        for label in stripped.split('.') {
            if label.is_empty() {
                warn!("Hostname {:?} contains an empty label", input);
                return Err(WireError::EmptyLabel);
            }

            match u8::try_from(label.len()) {
                Ok(length) if usize::from(length) <= MAXIMUM_LABEL_LENGTH => {
                    bytes.push(length);
                    bytes.extend_from_slice(label.as_bytes());
                }
                _ => {
                    warn!("Hostname {:?} contains a label of {} octets", input, label.len());
                    return Err(WireError::LabelTooLong { length: label.len() });
                }
            }
        }

        bytes.push(0);  // terminate the name
        Ok(Self { bytes })
    }

    /// Writes the canonical wire form. No compression is ever written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.bytes)
    }

    /// The canonical wire form of this name, terminator included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The length of the wire form in octets.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut position = 0;

        while self.bytes[position] != 0 {
            let length = usize::from(self.bytes[position]);
            position += 1;

            let label = &self.bytes[position .. position + length];
            write!(f, "{}.", String::from_utf8_lossy(label))?;
            position += length;
        }

        Ok(())
    }
}


/// An extension for `Cursor` that enables reading compressed names from
/// mDNS packets. The cursor must range over the complete datagram, because
/// a pointer can name any earlier offset within it.
pub(crate) trait ReadSubject {

    /// Read and expand a possibly-compressed name.
    fn read_subject(&mut self) -> Result<Subject, WireError>;
}

impl ReadSubject for Cursor<&[u8]> {
    fn read_subject(&mut self) -> Result<Subject, WireError> {
        let mut bytes = Vec::new();
        read_labels_recursive(&mut bytes, self, &mut Vec::new())?;
        Ok(Subject { bytes })
    }
}


/// Reads labels from the cursor into the given buffer, using the list of
/// followed pointer offsets to detect cycles. A pointer ends the name as
/// far as the current stream position is concerned; decoding carries on at
/// the offset it names, and the cursor is put back afterwards.
fn read_labels_recursive(bytes: &mut Vec<u8>, c: &mut Cursor<&[u8]>, recursions: &mut Vec<u16>) -> Result<(), WireError> {
    loop {
        let byte = c.read_u8()?;

        if byte == 0 {
            bytes.push(0);
            break;
        }

        else if byte & 0b_1100_0000 == 0b_1100_0000 {
            let offset_high = byte & 0b_0011_1111;
            let offset_low = c.read_u8()?;
            let offset = u16::from_be_bytes([ offset_high, offset_low ]);

            if recursions.contains(&offset) {
                warn!("Hit previous offset ({}) decoding name", offset);
                return Err(WireError::TooMuchRecursion(recursions.clone()));
            }

            recursions.push(offset);

            if recursions.len() >= RECURSION_LIMIT {
                warn!("Hit recursion limit ({}) decoding name", RECURSION_LIMIT);
                return Err(WireError::TooMuchRecursion(recursions.clone()));
            }

            if usize::from(offset) >= c.get_ref().len() {
                warn!("Pointer offset {} is past the end of the packet", offset);
                return Err(WireError::OutOfBounds(offset));
            }

            trace!("Backtracking to offset {}", offset);
            let position = c.position();
            c.set_position(u64::from(offset));

            read_labels_recursive(bytes, c, recursions)?;

            trace!("Coming back to {}", position);
            c.set_position(position);
            break;
        }

        else if usize::from(byte) > MAXIMUM_LABEL_LENGTH {
            warn!("Label length octet {} is over the limit", byte);
            return Err(WireError::LabelTooLong { length: usize::from(byte) });
        }

        // Otherwise, treat the byte as the length of a label, and read that
        // many octets.
        else {
            bytes.push(byte);

            let start = bytes.len();
            bytes.resize(start + usize::from(byte), 0);
            c.read_exact(&mut bytes[start ..])?;
        }
    }

    Ok(())
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    // The buffers in the decoding tests contain nothing but the name being
    // decoded. In packets found in the wild, the cursor ranges over the
    // whole datagram, so a record's name can reference octets anywhere
    // before it.

    #[test]
    fn from_string() {
        let subject = Subject::encode("_exampleservice._tcp.local").unwrap();
        assert_eq!(subject.to_string(), "_exampleservice._tcp.local.");
    }

    #[test]
    fn trailing_dot_is_idempotent() {
        let subject = Subject::encode("_exampleservice._tcp.local.").unwrap();
        assert_eq!(subject.to_string(), "_exampleservice._tcp.local.");

        assert_eq!(Subject::encode("_exampleservice._tcp.local").unwrap(), subject);
    }

    #[test]
    fn sixty_three_octet_label() {
        let input = format!("{}.", "q".repeat(63));
        let subject = Subject::encode(&input).unwrap();
        assert_eq!(subject.to_string(), input);
    }

    #[test]
    fn sixty_four_octet_label() {
        let input = format!("{}.", "q".repeat(64));
        assert_eq!(Subject::encode(&input),
                   Err(WireError::LabelTooLong { length: 64 }));
    }

    #[test]
    fn leading_dot() {
        assert_eq!(Subject::encode("._a._b"),
                   Err(WireError::EmptyLabel));
    }

    #[test]
    fn interior_empty_label() {
        assert_eq!(Subject::encode("_exampleservice.._tcp.local"),
                   Err(WireError::EmptyLabel));
    }

    #[test]
    fn root_is_the_empty_string() {
        assert_eq!(Subject::root().to_string(), "");
    }

    #[test]
    fn wire_round_trip() {
        let subject = Subject::encode("_exampleservice._tcp.local").unwrap();

        let mut buf = Vec::new();
        subject.write_to(&mut buf).unwrap();

        assert_eq!(Cursor::new(&*buf).read_subject(), Ok(subject));
    }

    #[test]
    fn one_label() {
        let buf: &[u8] = &[
            0x03,  // label of length 3
            b'o', b'n', b'e',  // label
            0x00,  // end reading
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Ok(Subject::encode("one.").unwrap()));
    }

    #[test]
    fn label_followed_by_pointer() {
        let buf: &[u8] = &[
            0x03,  // label of length 3
            b'o', b'n', b'e',  // label
            0xc0, 0x06,  // skip to position 6 (the next byte)

            0x03,  // label of length 3
            b't', b'w', b'o',  // label
            0x00,  // end reading
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Ok(Subject::encode("one.two.").unwrap()));
    }

    #[test]
    fn pointer_expands_to_the_inline_form() {
        let buf: &[u8] = &[
            0x03,  // label of length 3
            b'o', b'n', b'e',  // label
            0xc0, 0x06,  // skip to position 6

            0x03,
            b't', b'w', b'o',
            0x00,
        ];

        let mut c = Cursor::new(buf);
        let compressed = c.read_subject().unwrap();

        c.set_position(6);
        let inline = c.read_subject().unwrap();

        assert_eq!(compressed.to_string(), "one.two.");
        assert_ne!(compressed, inline);  // different names entirely
        assert_eq!(compressed.as_bytes()[4 ..], *inline.as_bytes());
    }

    #[test]
    fn immediate_recursion() {
        let buf: &[u8] = &[
            0xc0, 0x00,  // skip to position 0
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::TooMuchRecursion(vec![ 0 ])));
    }

    #[test]
    fn mutual_recursion() {
        let buf: &[u8] = &[
            0xc0, 0x02,  // skip to position 2
            0xc0, 0x00,  // skip to position 0
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::TooMuchRecursion(vec![ 2, 0 ])));
    }

    #[test]
    fn too_much_recursion() {
        let buf: &[u8] = &[
            0xc0, 0x02,  // skip to position 2
            0xc0, 0x04,  // skip to position 4
            0xc0, 0x06,  // skip to position 6
            0xc0, 0x08,  // skip to position 8
            0xc0, 0x0A,  // skip to position 10
            0xc0, 0x0C,  // skip to position 12
            0xc0, 0x0E,  // skip to position 14
            0xc0, 0x10,  // skip to position 16
            0x00,        // no label
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::TooMuchRecursion(vec![ 2, 4, 6, 8, 10, 12, 14, 16 ])));
    }

    #[test]
    fn pointer_out_of_bounds() {
        let buf: &[u8] = &[
            0xc0, 0x63,  // skip to position 99, which does not exist
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::OutOfBounds(99)));
    }

    #[test]
    fn overlong_label_on_the_wire() {
        let buf: &[u8] = &[
            0x64,  // label of length 100, with the pointer bits clear
            b'x',
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::LabelTooLong { length: 100 }));
    }

    #[test]
    fn buffer_ends_mid_label() {
        let buf: &[u8] = &[
            0x03,  // label of length 3
            b'o', b'n',  // and then nothing
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::IO));
    }

    #[test]
    fn buffer_ends_before_terminator() {
        let buf: &[u8] = &[
            0x03,
            b'o', b'n', b'e',  // a complete label, but no terminator
        ];

        assert_eq!(Cursor::new(buf).read_subject(),
                   Err(WireError::IO));
    }
}
