use std::{io::Write, net::SocketAddr, time::Duration};

use dns::{Msg, ParseError};
use hickory_proto::op::{Header, Message, MessageType, ResponseCode};
use log::*;
use socket2::Socket;
use tokio::{
	net::{lookup_host, UdpSocket},
	select,
	sync::oneshot,
	time::sleep,
};

use crate::{
	config::Config,
	record::{JsonlSink, Record},
	Error,
};

pub async fn bind(config: &Config) -> Result<UdpSocket, Error> {
	let addrs: Vec<SocketAddr> = lookup_host((config.host.as_str(), config.port))
		.await
		.map_err(|e| Error::Resolve(config.host.clone(), e))?
		.collect();
	if addrs.is_empty() {
		return Err(Error::NoAddress(config.host.clone()));
	}
	debug!(
		"{} resolves to {}",
		config.host,
		addrs
			.iter()
			.map(SocketAddr::to_string)
			.collect::<Vec<_>>()
			.join(", ")
	);
	// first one that binds wins
	let mut s = UdpSocket::bind(&addrs[..]).await?;
	if let Some(size) = config.recv_buffer {
		// through socket2 to set SO_RCVBUF, then back to tokio
		let s2 = Socket::from(s.into_std()?);
		s2.set_recv_buffer_size(size)?;
		// the kernel is free to adjust it
		debug!("receive buffer: asked {size}, got {}", s2.recv_buffer_size()?);
		s = UdpSocket::from_std(s2.into())?;
	}
	info!("listening on UDP {}", s.local_addr()?);
	Ok(s)
}

/// Log every query received on `s` until `quit_signal` fires.
///
/// Bad datagrams are skipped, only a failing sink stops the loop early.
pub async fn serve<W: Write>(
	mut quit_signal: oneshot::Receiver<()>,
	s: UdpSocket,
	config: &Config,
	mut sink: JsonlSink<W>,
) -> Result<JsonlSink<W>, Error> {
	let mut buf = vec![0u8; 0x1000];
	let mut backoff = Backoff::default();
	loop {
		select! {
			r = s.recv_from(&mut buf) => {
				let (len, addr) = match r {
					Ok(v) => {
						backoff.reset();
						v
					}
					Err(e) => {
						let delay = backoff.next_delay();
						error!("udp recv error: {}, retrying in {:?}", e, delay);
						sleep(delay).await;
						continue;
					}
				};
				trace!("udp recv {} bytes from {}", len, addr);
				match handle(&buf[..len], addr, config) {
					Ok(record) => sink.write(&record)?,
					Err(e) => warn!("dropping query from {}: {}", addr, e),
				}
				if !config.reply {
					continue;
				}
				let Some(resp) = mk_resp(&buf[..len]) else {
					continue;
				};
				match s.send_to(&resp, addr).await {
					Ok(len) => trace!("udp send {} bytes to {}", len, addr),
					Err(e) => error!("udp send error: {}", e),
				}
			}
			// a dropped sender only disables this branch
			Ok(()) = &mut quit_signal => {
				info!("exiting");
				break;
			}
		}
	}
	Ok(sink)
}

const BACKOFF_MIN: Duration = Duration::from_millis(10);
const BACKOFF_MAX: Duration = Duration::from_secs(1);

// keeps a recv error that comes back every time from spinning the loop
#[derive(Default)]
struct Backoff {
	delay: Duration,
}

impl Backoff {
	fn next_delay(&mut self) -> Duration {
		self.delay = (self.delay * 2).clamp(BACKOFF_MIN, BACKOFF_MAX);
		self.delay
	}

	fn reset(&mut self) {
		self.delay = Duration::ZERO;
	}
}

fn handle(buf: &[u8], addr: SocketAddr, config: &Config) -> Result<Record, ParseError> {
	let msg = Msg::try_from(buf)?;
	trace!("dns query from {}:\n{}", addr, msg);
	if msg.qr() {
		debug!("{} sent a response, logging it anyway", addr);
	}
	let q = msg.question()?;
	Ok(Record::new(addr, &q, config))
}

// NXDomain with the question echoed, nothing else
fn mk_resp(q_buf: &[u8]) -> Option<Vec<u8>> {
	let req = Message::from_vec(q_buf)
		.map_err(|e| debug!("not answering, parse error: {}", e))
		.ok()?;
	let qh = req.header();
	if qh.message_type() != MessageType::Query {
		return None;
	}
	let mut h = Header::response_from_request(qh);
	h.set_response_code(ResponseCode::NXDomain);

	let mut resp = Message::new();
	resp.set_header(h);
	if let Some(q) = req.queries().first() {
		resp.add_query(q.to_owned());
	}
	resp.to_vec()
		.map_err(|e| error!("dns response encode error: {}", e))
		.ok()
}
