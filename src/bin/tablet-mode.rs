use std::env;
use std::process::ExitCode;

use tablet_mode_key::config::TriggerConfig;
use tablet_mode_key::session;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TriggerConfig::from_args(env::args().skip(1));
    match session::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
