use std::{io::Write, net::SocketAddr};

use dns::Question;
use serde::Serialize;

use crate::{config::Config, payload, Error};

/// One line of output per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
	pub sender: String,
	pub raw_question: String,
	pub parsed_qname: String,
}

impl Record {
	pub fn new(sender: SocketAddr, q: &Question, config: &Config) -> Self {
		let qname = q.name.to_string();
		Record {
			sender: sender.to_string(),
			raw_question: q.to_string(),
			parsed_qname: payload::parse(&qname, &config.suffix, config.hex_encoded),
		}
	}
}

/// JSON lines, each record written and flushed as a whole.
pub struct JsonlSink<W: Write> {
	w: W,
}

impl<W: Write> JsonlSink<W> {
	pub fn new(w: W) -> Self {
		Self { w }
	}

	pub fn write(&mut self, r: &Record) -> Result<(), Error> {
		let mut line = serde_json::to_vec(r)?;
		line.push(b'\n');
		self.w.write_all(&line).map_err(Error::Output)?;
		self.w.flush().map_err(Error::Output)
	}

	pub fn into_inner(self) -> W {
		self.w
	}
}
