use std::fmt::{self, Display, Write as _};

use crate::{
	constants::{MAX_LABEL_LEN, MAX_NAME_LEN},
	ParseError,
};

/// A decoded QNAME, labels kept as raw bytes.
///
/// Rendering is done on demand, so the wire form can always be reproduced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Name {
	labels: Vec<Vec<u8>>,
}

impl Name {
	pub fn root() -> Self {
		Self::default()
	}

	pub fn is_root(&self) -> bool {
		self.labels.is_empty()
	}

	pub fn label_count(&self) -> usize {
		self.labels.len()
	}

	pub fn raw_labels(&self) -> impl Iterator<Item = &[u8]> {
		self.labels.iter().map(Vec::as_slice)
	}

	/// escaped display form of each label, in order
	pub fn labels(&self) -> Vec<String> {
		self.labels.iter().map(|l| escape_label(l)).collect()
	}

	/// length-prefixed labels, with the terminating root label
	pub fn to_wire(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
		for l in &self.labels {
			out.push(l.len() as u8);
			out.extend_from_slice(l);
		}
		out.push(0);
		out
	}
}

// FQDN form, "." for root
impl Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.labels.is_empty() {
			return f.write_char('.');
		}
		for l in &self.labels {
			f.write_str(&escape_label(l))?;
			f.write_char('.')?;
		}
		Ok(())
	}
}

/// Decode an uncompressed name starting at `offset`.
///
/// Returns the name and the number of bytes it occupies, terminator included.
/// Compression pointers are not followed: any length byte above 63 is
/// `MalformedName`, as is a name longer than 255 octets on the wire.
pub fn decode_name(msg: &[u8], offset: usize) -> Result<(Name, usize), ParseError> {
	let mut labels = Vec::with_capacity(8);
	let mut pos = offset;
	loop {
		let Some(&label_len) = msg.get(pos) else {
			return Err(ParseError::TruncatedPacket);
		};
		let label_len = label_len as usize;
		if label_len == 0 {
			pos += 1;
			break;
		}
		// 0b11 prefix is a pointer, 0b01 and 0b10 are extended label types
		if label_len > MAX_LABEL_LEN {
			return Err(ParseError::MalformedName);
		}
		let end = pos + 1 + label_len;
		if end > msg.len() {
			return Err(ParseError::TruncatedPacket);
		}
		// + 1 for the terminator still to come
		if end - offset + 1 > MAX_NAME_LEN {
			return Err(ParseError::MalformedName);
		}
		labels.push(msg[pos + 1..end].to_vec());
		pos = end;
	}
	Ok((Name { labels }, pos - offset))
}

fn escape_label(label: &[u8]) -> String {
	let mut s = String::with_capacity(label.len());
	for &b in label {
		match b {
			b'.' | b'\\' => push_escaped(&mut s, b),
			0x21..=0x7e => s.push(b as char),
			_ => push_escaped(&mut s, b),
		}
	}
	s
}

/// `\DDD`, three decimal digits
pub fn push_escaped(s: &mut String, b: u8) {
	let _ = write!(s, "\\{b:03}");
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wire(labels: &[&[u8]]) -> Vec<u8> {
		let mut v = Vec::new();
		for l in labels {
			v.push(l.len() as u8);
			v.extend_from_slice(l);
		}
		v.push(0);
		v
	}

	#[test]
	fn decode_fqdn() {
		let buf = wire(&[b"7365637265742031333337", b"dnspwn", b"karimrahal", b"com"]);
		let (name, consumed) = decode_name(&buf, 0).unwrap();
		assert_eq!(consumed, buf.len());
		assert_eq!(name.label_count(), 4);
		assert_eq!(name.to_string(), "7365637265742031333337.dnspwn.karimrahal.com.");
	}

	#[test]
	fn decode_at_offset() {
		let mut buf = vec![0xaa; 12];
		buf.extend(wire(&[b"example", b"com"]));
		// qtype and qclass following the name must not be consumed
		buf.extend_from_slice(&[0, 1, 0, 1]);
		let (name, consumed) = decode_name(&buf, 12).unwrap();
		assert_eq!(name.to_string(), "example.com.");
		assert_eq!(consumed, 13);
	}

	#[test]
	fn root() {
		let (name, consumed) = decode_name(&[0], 0).unwrap();
		assert!(name.is_root());
		assert_eq!(name, Name::root());
		assert!(name.labels().is_empty());
		assert_eq!(name.to_string(), ".");
		assert_eq!(consumed, 1);
	}

	#[test]
	fn escapes() {
		let buf = wire(&[b"a.b", b"c\\d", b"sp ace", b"\x00\x7f\xff"]);
		let (name, _) = decode_name(&buf, 0).unwrap();
		assert_eq!(
			name.labels(),
			vec!["a\\046b", "c\\092d", "sp\\032ace", "\\000\\127\\255"]
		);
		assert_eq!(name.to_string(), "a\\046b.c\\092d.sp\\032ace.\\000\\127\\255.");
	}

	#[test]
	fn round_trip() {
		let cases: Vec<Vec<&[u8]>> = vec![
			vec![],
			vec![&b"com"[..]],
			vec![&b"www"[..], &b"example"[..], &b"org"[..]],
			vec![&b"\x00\x01\x02"[..], &b"a.b"[..], &[b'x'; 63] as &[u8]],
			vec![&[b'a'; 63] as &[u8], &[b'b'; 63] as &[u8], &[b'c'; 63] as &[u8], &[b'd'; 61] as &[u8]],
		];
		for labels in &cases {
			let buf = wire(labels);
			let (name, consumed) = decode_name(&buf, 0).unwrap();
			assert_eq!(consumed, buf.len());
			assert_eq!(name.to_wire(), buf);
			assert_eq!(name.raw_labels().collect::<Vec<_>>(), *labels);
		}
	}

	#[test]
	fn compression_pointer() {
		let mut buf = wire(&[b"example", b"com"]);
		buf.extend_from_slice(&[3, b'w', b'w', b'w', 0xc0, 0x00]);
		assert_eq!(decode_name(&buf, 13), Err(ParseError::MalformedName));
	}

	#[test]
	fn extended_label_types() {
		assert_eq!(decode_name(&[0x41, 0], 0), Err(ParseError::MalformedName));
		assert_eq!(decode_name(&[0x80, 0], 0), Err(ParseError::MalformedName));
	}

	#[test]
	fn truncated() {
		let buf = wire(&[b"example", b"com"]);
		// mid label
		assert_eq!(decode_name(&buf[..5], 0), Err(ParseError::TruncatedPacket));
		// missing terminator
		assert_eq!(
			decode_name(&buf[..buf.len() - 1], 0),
			Err(ParseError::TruncatedPacket)
		);
		assert_eq!(decode_name(&[], 0), Err(ParseError::TruncatedPacket));
		assert_eq!(decode_name(&buf, buf.len()), Err(ParseError::TruncatedPacket));
	}

	#[test]
	fn too_long() {
		// 4 * 64 + 1 = 257 octets
		let long: &[u8] = &[b'a'; 63];
		let buf = wire(&[long, long, long, long]);
		assert_eq!(decode_name(&buf, 0), Err(ParseError::MalformedName));
	}
}
