use std::{future::pending, io, process::ExitCode};

use clap::Parser;
use log::*;
use tokio::{signal::ctrl_c, sync::oneshot, task};

use dnslog::{
	config::{Args, Config},
	listener::{bind, serve},
	record::JsonlSink,
};

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "debug";
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = Args::parse();

	// stdout is reserved for records
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
		.target(env_logger::Target::Stderr)
		.init();

	let config = Config::from(args);
	debug!("{config:?}");

	let s = match bind(&config).await {
		Ok(s) => s,
		Err(e) => {
			error!("failed to bind {} port {}: {e}", config.host, config.port);
			return ExitCode::FAILURE;
		}
	};

	let local = task::LocalSet::new();
	let (abort_tx, abort) = oneshot::channel();
	local.spawn_local(async move {
		match ctrl_c().await {
			Ok(()) => {
				info!("ctrl-c received, shutting down");
				let _ = abort_tx.send(());
			}
			Err(e) => {
				error!("unable to listen for ctrl-c: {e}");
				// keep the sender, the listener runs until killed
				let _tx = abort_tx;
				pending::<()>().await;
			}
		}
	});

	match local
		.run_until(serve(abort, s, &config, JsonlSink::new(io::stdout())))
		.await
	{
		Ok(_) => ExitCode::SUCCESS,
		Err(e) => {
			error!("{e}");
			ExitCode::FAILURE
		}
	}
}
