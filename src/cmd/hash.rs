use crate::cmd::{to_hex, Cmd};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::sha2::{SHA256, SHA512};
use crypto_hash::Digest;
use std::path::PathBuf;

pub struct HashCmd;

impl Cmd for HashCmd {
    const NAME: &'static str = "hash";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("digest a message or file")
            .arg(
                Arg::new("msg")
                    .value_name("MESSAGE")
                    .required(false)
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .help("to specify the message"),
            )
            .arg(
                Arg::new("alg")
                    .long("alg")
                    .short('a')
                    .action(ArgAction::Set)
                    .default_value("sha256")
                    .value_parser(["sha256", "sha512"])
                    .help("to specify the digest algorithm"),
            )
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(false)
                    .help("to specify the input file path"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let data = if let Some(msg) = m.get_one::<String>("msg") {
            msg.clone().into_bytes()
        } else if let Some(path) = m.get_one::<PathBuf>("file") {
            std::fs::read(path).unwrap()
        } else {
            panic!("either a message argument or --file is required");
        };

        let digest = match m.get_one::<String>("alg").map(|x| x.as_str()) {
            Some("sha512") => SHA512::digest(&data),
            _ => SHA256::digest(&data),
        };
        println!("{}", to_hex(&digest));
    }
}
