//! Pulling Chromecast devices out of decoded mDNS responses.
//!
//! A responder answers the service PTR query with its instance name, and
//! puts the records that make that answer usable — SRV for the hostname
//! and port, TXT for the metadata, A/AAAA for the addresses — in the
//! additional section. This module gathers those pieces back together.

use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

use log::*;

use mdns::record::{Record, SRV};
use mdns::{Response, Subject};

use crate::device::{DeviceID, KnownDevice};


/// Splits a TXT record's octets into the length-prefixed strings of
/// RFC 6763 §6, keeping the ones shaped like `key=value`.
fn txt_entries(message: &[u8]) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut position = 0;

    while position < message.len() {
        let length = usize::from(message[position]);
        position += 1;

        let end = (position + length).min(message.len());
        let text = String::from_utf8_lossy(&message[position .. end]);
        position = end;

        if let Some((key, value)) = text.split_once('=') {
            entries.push((key.to_owned(), value.to_owned()));
        }
    }

    entries
}


/// Builds a device for every instance of the given service that the
/// response describes fully enough. An instance needs a TXT record with a
/// parseable `id` to count at all; everything else may be missing.
pub(crate) fn devices_from_response(service: &Subject, response: &Response) -> Vec<KnownDevice> {
    let mut instances: Vec<&Subject> = Vec::new();
    let mut txts: HashMap<&Subject, &[u8]> = HashMap::new();
    let mut srvs: HashMap<&Subject, &SRV> = HashMap::new();
    let mut v4s: HashMap<&Subject, Ipv4Addr> = HashMap::new();
    let mut v6s: HashMap<&Subject, Ipv6Addr> = HashMap::new();

    for answer in response.answers.iter().chain(&response.additionals) {
        match &answer.record {
            Record::PTR(ptr) if answer.subject == *service => {
                instances.push(&ptr.name);
            }
            Record::TXT(txt) => {
                txts.insert(&answer.subject, &txt.message);
            }
            Record::SRV(srv) => {
                srvs.insert(&answer.subject, srv);
            }
            Record::A(a) => {
                v4s.insert(&answer.subject, a.address);
            }
            Record::AAAA(aaaa) => {
                v6s.insert(&answer.subject, aaaa.address);
            }
            _ => {}
        }
    }

    let mut devices = Vec::new();
    for instance in instances {
        let entries = match txts.get(instance) {
            Some(message)  => txt_entries(message),
            None           => {
                debug!("Instance {} has no TXT record in this response", instance);
                continue;
            }
        };

        let mut id = None;
        let mut friendly_name = String::new();
        let mut model = String::new();

        for (key, value) in entries {
            match key.as_str() {
                "id"  => id = DeviceID::from_hex(&value),
                "fn"  => friendly_name = value,
                "md"  => model = value,
                _     => {}
            }
        }

        let id = match id {
            Some(id)  => id,
            None      => {
                debug!("Instance {} carries no usable id, skipping", instance);
                continue;
            }
        };

        let srv = srvs.get(instance);
        let hostname = srv.map(|srv| srv.target.to_string()).unwrap_or_default();
        let ipv4 = srv.and_then(|srv| v4s.get(&srv.target).copied());
        let ipv6 = srv.and_then(|srv| v6s.get(&srv.target).copied());

        trace!("Response describes device {}", id);
        devices.push(KnownDevice { id, friendly_name, hostname, ipv4, ipv6, model });
    }

    devices
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    use mdns::record::{A, AAAA, PTR, TXT};
    use mdns::Answer;

    fn answer(subject: &str, record: Record) -> Answer {
        Answer {
            subject: Subject::encode(subject).unwrap(),
            class: 0x0001,
            ttl: 120,
            record,
        }
    }

    fn txt_record(strings: &[&str]) -> Record {
        let mut message = Vec::new();
        for string in strings {
            message.push(u8::try_from(string.len()).unwrap());
            message.extend_from_slice(string.as_bytes());
        }
        Record::TXT(TXT { message })
    }

    fn chromecast_response() -> Response {
        Response {
            transaction_id: 0,
            flags: 0x8400,
            answers: vec![
                answer("_googlecast._tcp.local.", Record::PTR(PTR {
                    name: Subject::encode("Kitchen._googlecast._tcp.local.").unwrap(),
                })),
            ],
            additionals: vec![
                answer("Kitchen._googlecast._tcp.local.", Record::SRV(SRV {
                    priority: 0,
                    weight: 0,
                    port: 8009,
                    target: Subject::encode("kitchen.local.").unwrap(),
                })),
                answer("Kitchen._googlecast._tcp.local.", txt_record(&[
                    "id=cafebabecafebabecafebabecafebabe",
                    "fn=Kitchen",
                    "md=Chromecast",
                ])),
                answer("kitchen.local.", Record::A(A {
                    address: Ipv4Addr::new(192, 168, 1, 48),
                })),
                answer("kitchen.local.", Record::AAAA(AAAA {
                    address: Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0x1234),
                })),
            ],
        }
    }

    #[test]
    fn assembles_a_device() {
        let service = Subject::encode("_googlecast._tcp.local.").unwrap();
        let devices = devices_from_response(&service, &chromecast_response());

        assert_eq!(devices, vec![
            KnownDevice {
                id: DeviceID::from_hex("cafebabecafebabecafebabecafebabe").unwrap(),
                friendly_name: String::from("Kitchen"),
                hostname: String::from("kitchen.local."),
                ipv4: Some(Ipv4Addr::new(192, 168, 1, 48)),
                ipv6: Some(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0x1234)),
                model: String::from("Chromecast"),
            },
        ]);
    }

    #[test]
    fn instance_without_an_id_is_skipped() {
        let service = Subject::encode("_googlecast._tcp.local.").unwrap();

        let mut response = chromecast_response();
        response.additionals[1] = answer("Kitchen._googlecast._tcp.local.", txt_record(&[
            "fn=Kitchen",
        ]));

        assert_eq!(devices_from_response(&service, &response), vec![]);
    }

    #[test]
    fn instance_without_a_txt_record_is_skipped() {
        let service = Subject::encode("_googlecast._tcp.local.").unwrap();

        let mut response = chromecast_response();
        response.additionals.remove(1);

        assert_eq!(devices_from_response(&service, &response), vec![]);
    }

    #[test]
    fn missing_addresses_are_simply_absent() {
        let service = Subject::encode("_googlecast._tcp.local.").unwrap();

        let mut response = chromecast_response();
        response.additionals.truncate(3);  // drop the AAAA record

        let devices = devices_from_response(&service, &response);
        assert_eq!(devices[0].ipv4, Some(Ipv4Addr::new(192, 168, 1, 48)));
        assert_eq!(devices[0].ipv6, None);
    }

    #[test]
    fn other_services_are_ignored() {
        let service = Subject::encode("_googlecast._tcp.local.").unwrap();

        let response = Response {
            transaction_id: 0,
            flags: 0x8400,
            answers: vec![
                answer("_printer._tcp.local.", Record::PTR(PTR {
                    name: Subject::encode("Basement._printer._tcp.local.").unwrap(),
                })),
            ],
            additionals: vec![],
        };

        assert_eq!(devices_from_response(&service, &response), vec![]);
    }

    #[test]
    fn txt_entries_split_on_the_first_equals() {
        let entries = txt_entries(b"\x04a=b1\x07key=a=b\x03abc");
        assert_eq!(entries, vec![
            (String::from("a"), String::from("b1")),
            (String::from("key"), String::from("a=b")),
        ]);
    }

    #[test]
    fn txt_entries_survive_a_lying_length() {
        // the last string claims 9 octets but the record ends after 3
        let entries = txt_entries(b"\x04a=b1\x09key=a");
        assert_eq!(entries, vec![
            (String::from("a"), String::from("b1")),
            (String::from("key"), String::from("a")),
        ]);
    }
}
