use crate::cmd::Cmd;
use cipher::rsa::PrivateKey;
use cipher::DefaultRand;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

#[derive(Default)]
pub struct KeyCmd;

impl Cmd for KeyCmd {
    const NAME: &'static str = "key";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("generate an RSA key pair over safe primes")
            .arg(
                Arg::new("bits")
                    .value_name("BITS")
                    .action(ArgAction::Set)
                    .required(true)
                    .value_parser(value_parser!(usize))
                    .help("to specify the public key modulus bits length"),
            )
            .arg(
                Arg::new("output")
                    .long("output")
                    .short('o')
                    .action(ArgAction::Set)
                    .required(false)
                    .value_parser(value_parser!(PathBuf))
                    .help("to specify the output file path to save the key"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let bits = m.get_one::<usize>("bits").copied().unwrap();

        let mut rng = DefaultRand::default();
        let key = PrivateKey::generate(bits, &mut rng).unwrap();

        let private = key.to_base64().unwrap();
        let public = key.public_key().to_base64().unwrap();

        match m.get_one::<PathBuf>("output") {
            Some(path) => {
                std::fs::write(path, &private).unwrap();
                std::fs::write(path.with_extension("pub"), &public).unwrap();
            }
            None => {
                println!("{}", private);
                println!("{}", public);
            }
        }
    }
}
