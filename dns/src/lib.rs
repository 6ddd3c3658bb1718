use std::fmt::Display;

use log::*;

mod constants;
mod name;

pub use constants::{class2str, type2str, CLASS_IN, DNS_HEADER_LEN, TYPE_A, TYPE_AAAA, TYPE_TXT};
pub use name::{decode_name, push_escaped, Name};

use constants::*;

// barebones dns library for passive logging
// it does 1 thing only:
// 	read the question of a query, without following compression pointers

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	#[error("malformed name")]
	MalformedName,
	#[error("truncated packet")]
	TruncatedPacket,
	#[error("no question")]
	NoQuestion,
}

/// Read-only view over a received message.
pub struct Msg<'a> {
	msg: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
	pub name: Name,
	pub qtype: u16,
	pub qclass: u16,
}

// zone file style, "<qname> <CLASS>\t<TYPE>"
impl Display for Question {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} {}\t{}",
			self.name,
			class2str(self.qclass),
			type2str(self.qtype)
		)
	}
}

impl<'a> Msg<'a> {
	/// the first question, right after the header
	pub fn question(&self) -> Result<Question, ParseError> {
		if self.qd_count() < 1 {
			return Err(ParseError::NoQuestion);
		}
		if self.qd_count() > 1 {
			debug!("{} questions, only the first is read", self.qd_count());
		}
		let (name, consumed) = decode_name(self.msg, DNS_HEADER_LEN)?;
		// QTYPE QCLASS
		let offset = DNS_HEADER_LEN + consumed;
		if offset + 4 > self.msg.len() {
			return Err(ParseError::TruncatedPacket);
		}
		Ok(Question {
			name,
			qtype: u16be(&self.msg[offset..offset + 2]),
			qclass: u16be(&self.msg[offset + 2..offset + 4]),
		})
	}

	pub fn id(&self) -> u16 {
		u16be(&self.msg[0..2])
	}
	pub fn qd_count(&self) -> u16 {
		u16be(&self.msg[4..6])
	}
	pub fn an_count(&self) -> u16 {
		u16be(&self.msg[6..8])
	}
	pub fn ns_count(&self) -> u16 {
		u16be(&self.msg[8..10])
	}
	pub fn ar_count(&self) -> u16 {
		u16be(&self.msg[10..12])
	}

	fn get_flag(&self, o_byte: u8, o_bit: u8) -> bool {
		get_bit(self.msg[o_byte as usize], o_bit)
	}

	pub fn qr(&self) -> bool {
		self.get_flag(2, 7)
	}
	pub fn rd(&self) -> bool {
		self.get_flag(2, 0)
	}

	pub fn opcode(&self) -> u8 {
		get_bits(self.msg[2], 3, 4)
	}
	pub fn rcode(&self) -> u8 {
		get_bits(self.msg[3], 0, 4)
	}
}

impl<'a> TryFrom<&'a [u8]> for Msg<'a> {
	type Error = ParseError;
	fn try_from(msg: &'a [u8]) -> Result<Self, Self::Error> {
		if msg.len() < DNS_HEADER_LEN {
			debug!("too short to contain a dns message: {}", msg.len());
			return Err(ParseError::TruncatedPacket);
		}
		Ok(Msg { msg })
	}
}

// mimics dig/drill output
impl<'a> Display for Msg<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(
			f,
			";; ->>HEADER<<- opcode: {}, rcode: {}, id: {}",
			opcode2str(self.opcode()),
			rcode2str(self.rcode()),
			self.id()
		)?;
		write!(f, ";; flags:")?;
		for &(o0, o1, name) in FLAGS {
			if self.get_flag(o0, o1) {
				write!(f, " {name}")?;
			}
		}
		writeln!(
			f,
			"; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
			self.qd_count(),
			self.an_count(),
			self.ns_count(),
			self.ar_count()
		)
	}
}

fn u16be(bytes: &[u8]) -> u16 {
	u16::from_be_bytes([bytes[0], bytes[1]])
}

// I really liked bitfields in C
fn get_bit(b: u8, o: u8) -> bool {
	(b >> o) & 1 == 1
}
fn get_bits(b: u8, o: u8, l: u8) -> u8 {
	(b >> o) & ((1 << l) - 1)
}

#[cfg(test)]
mod tests {
	use super::*;

	// id 0x1234, rd, 1 question
	const HEADER: [u8; 12] = [0x12, 0x34, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];

	fn query(labels: &[&str], qtype: u16, qclass: u16) -> Vec<u8> {
		let mut v = HEADER.to_vec();
		for l in labels {
			v.push(l.len() as u8);
			v.extend_from_slice(l.as_bytes());
		}
		v.push(0);
		v.extend_from_slice(&qtype.to_be_bytes());
		v.extend_from_slice(&qclass.to_be_bytes());
		v
	}

	#[test]
	fn header() {
		let buf = query(&["example", "com"], TYPE_A, CLASS_IN);
		let msg = Msg::try_from(&buf[..]).unwrap();
		assert_eq!(msg.id(), 0x1234);
		assert_eq!(msg.opcode(), 0);
		assert!(msg.rd());
		assert!(!msg.qr());
		assert_eq!(msg.qd_count(), 1);
		assert_eq!(msg.an_count(), 0);
		let s = msg.to_string();
		assert!(s.starts_with(";; ->>HEADER<<- opcode: Query, rcode: NoError, id: 4660\n"));
		assert!(s.contains(";; flags: rd; QUERY: 1, ANSWER: 0"));
	}

	#[test]
	fn question() {
		let buf = query(&["7365637265742031333337", "dnspwn", "karimrahal", "com"], TYPE_A, CLASS_IN);
		let q = Msg::try_from(&buf[..]).unwrap().question().unwrap();
		assert_eq!(q.qtype, TYPE_A);
		assert_eq!(q.qclass, CLASS_IN);
		assert_eq!(
			q.to_string(),
			"7365637265742031333337.dnspwn.karimrahal.com. IN\tA"
		);
	}

	#[test]
	fn question_unknown_type() {
		let buf = query(&["x"], 4242, 3);
		let q = Msg::try_from(&buf[..]).unwrap().question().unwrap();
		assert_eq!(q.to_string(), "x. CH\tTYPE4242");
	}

	#[test]
	fn short_header() {
		assert!(matches!(
			Msg::try_from(&HEADER[..11]),
			Err(ParseError::TruncatedPacket)
		));
	}

	#[test]
	fn no_question() {
		let mut buf = query(&["example", "com"], TYPE_A, CLASS_IN);
		buf[5] = 0;
		let msg = Msg::try_from(&buf[..]).unwrap();
		assert_eq!(msg.question(), Err(ParseError::NoQuestion));
	}

	#[test]
	fn missing_qtype() {
		let buf = query(&["example", "com"], TYPE_A, CLASS_IN);
		let msg = Msg::try_from(&buf[..buf.len() - 2]).unwrap();
		assert_eq!(msg.question(), Err(ParseError::TruncatedPacket));
	}

	#[test]
	fn header_only() {
		let msg = Msg::try_from(&HEADER[..]).unwrap();
		assert_eq!(msg.question(), Err(ParseError::TruncatedPacket));
	}
}
