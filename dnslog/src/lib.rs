pub mod config;
pub mod listener;
pub mod payload;
pub mod record;

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unable to resolve {0:?}: {1}")]
	Resolve(String, #[source] io::Error),
	#[error("{0:?} resolves to nothing")]
	NoAddress(String),
	#[error("socket error: {0}")]
	Socket(#[from] io::Error),
	#[error("output error: {0}")]
	Output(#[source] io::Error),
	#[error("record encode error: {0}")]
	Encode(#[from] serde_json::Error),
}
