use chrono::{DateTime, Local};
use clap::Command;
use log::LevelFilter;
use rsakit::cmd::{Cmd, DecryptCmd, EncryptCmd, HashCmd, KeyCmd, SignCmd, VerifyCmd};
use std::time::SystemTime;

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let version = format!(
        "{}-{}",
        clap::crate_version!(),
        DateTime::<Local>::from(SystemTime::now()).format("%Y/%m/%d-%H:%M:%S:%Z")
    );
    let app = Command::new("rsakit")
        .version(version)
        .about("self-contained RSA toolbox: safe-prime keys, OAEP encryption, PSS signatures")
        .subcommand_required(true)
        .subcommand(KeyCmd::cmd())
        .subcommand(EncryptCmd::cmd())
        .subcommand(DecryptCmd::cmd())
        .subcommand(SignCmd::cmd())
        .subcommand(VerifyCmd::cmd())
        .subcommand(HashCmd::cmd())
        .get_matches();

    match app.subcommand() {
        Some((KeyCmd::NAME, m)) => KeyCmd.run(m),
        Some((EncryptCmd::NAME, m)) => EncryptCmd.run(m),
        Some((DecryptCmd::NAME, m)) => DecryptCmd.run(m),
        Some((SignCmd::NAME, m)) => SignCmd.run(m),
        Some((VerifyCmd::NAME, m)) => VerifyCmd.run(m),
        Some((HashCmd::NAME, m)) => HashCmd.run(m),
        Some((name, _)) => panic!("unsupported subcommand {name}"),
        None => unreachable!(),
    }
}
