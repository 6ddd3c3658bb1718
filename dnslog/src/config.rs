use clap::Parser;

use crate::payload::normalize_suffix;

#[derive(Parser, Debug)]
#[command(version, about = "Logs DNS queries as JSON lines, optionally hex decoding their payload")]
pub struct Args {
	/// IP address or host name to listen on
	#[arg(short = 'a', long = "address", default_value = "127.0.0.1")]
	pub host: String,

	#[arg(short, long, default_value_t = 53)]
	pub port: u16,

	/// If DNS requests will be hex encoded
	#[arg(short = 'x', long)]
	pub hex_encoded: bool,

	/// Default FQDN suffix of DNS questions (use this when DNS requests are hex encoded)
	#[arg(short, long, default_value = "")]
	pub suffix: String,

	/// Don't answer queries at all
	#[arg(long)]
	pub no_reply: bool,

	/// SO_RCVBUF of the listening socket, in bytes
	#[arg(long)]
	pub recv_buffer: Option<usize>,
}

/// Settled once at startup, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// resolved when binding
	pub host: String,
	pub port: u16,
	/// `.fqdn.` form, or empty
	pub suffix: String,
	pub hex_encoded: bool,
	pub reply: bool,
	pub recv_buffer: Option<usize>,
}

impl From<Args> for Config {
	fn from(args: Args) -> Self {
		Config {
			host: args.host,
			port: args.port,
			suffix: normalize_suffix(&args.suffix),
			hex_encoded: args.hex_encoded,
			reply: !args.no_reply,
			recv_buffer: args.recv_buffer,
		}
	}
}
