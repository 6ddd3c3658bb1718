// extracting the data smuggled in front of a known suffix
//	7365637265742031333337.dnspwn.karimrahal.com.
//	-> secret 1337.dnspwn.karimrahal.com.
// nothing in here is allowed to fail, the input is whatever the sender made up

use std::{borrow::Cow, fmt::Display};

use dns::push_escaped;
use log::*;

/// Normalize a suffix into `.fqdn.` form, empty stays empty.
pub fn normalize_suffix(suffix: &str) -> String {
	if suffix.is_empty() {
		return String::new();
	}
	let mut s = String::with_capacity(suffix.len() + 2);
	if !suffix.starts_with('.') {
		s.push('.');
	}
	s.push_str(suffix);
	if !suffix.ends_with('.') {
		s.push('.');
	}
	s
}

/// Render a decoded qname for the log.
///
/// The part in front of `suffix` is split into its labels, each label is
/// optionally hex decoded, and the labels are joined with a space before
/// the suffix is put back. The suffix is matched in its `.fqdn.` form and
/// ignoring ASCII case; what is put back is the configured spelling. A
/// suffix that doesn't match means the whole name is data and nothing is
/// put back. If that changes nothing, the qname is returned as is.
pub fn parse(qname: &str, suffix: &str, hex_enabled: bool) -> String {
	let suffix = normalize_suffix(suffix);
	let stripped = if suffix.is_empty() {
		None
	} else {
		strip_suffix_ignore_case(qname, &suffix)
	};
	let data = match stripped {
		Some(data) => data,
		None => qname.strip_suffix('.').unwrap_or(qname),
	};

	let mut changed = false;
	let components: Vec<Cow<str>> = data
		.split('.')
		.map(|c| {
			if !hex_enabled {
				return Cow::Borrowed(c);
			}
			let d = best_effort(c, decode_hex);
			changed |= d != c;
			d
		})
		.collect();

	if stripped.is_none() && !changed {
		return qname.to_owned();
	}
	let mut parsed = components.join(" ");
	if stripped.is_some() {
		parsed.push_str(&suffix);
	}
	parsed
}

// resolvers doing 0x20 randomization mix the case of the whole name
fn strip_suffix_ignore_case<'a>(qname: &'a str, suffix: &str) -> Option<&'a str> {
	let at = qname.len().checked_sub(suffix.len())?;
	if !qname.is_char_boundary(at) {
		return None;
	}
	let (data, tail) = qname.split_at(at);
	tail.eq_ignore_ascii_case(suffix).then_some(data)
}

/// Run a fallible decoder, falling back to the input untouched.
pub fn best_effort<'a, E: Display>(
	input: &'a str,
	decode: impl FnOnce(&str) -> Result<String, E>,
) -> Cow<'a, str> {
	match decode(input) {
		Ok(s) => Cow::Owned(s),
		Err(e) => {
			trace!("keeping {input:?} as is: {e}");
			Cow::Borrowed(input)
		}
	}
}

pub fn decode_hex(s: &str) -> Result<String, hex::FromHexError> {
	hex::decode(s).map(|b| render_text(&b))
}

// only printable ascii is kept, every other byte is \DDD,
// so nothing invisible or reordering ends up in the log
fn render_text(b: &[u8]) -> String {
	let mut s = String::with_capacity(b.len());
	for &b in b {
		match b {
			0x20..=0x7e => s.push(b as char),
			_ => push_escaped(&mut s, b),
		}
	}
	s
}
