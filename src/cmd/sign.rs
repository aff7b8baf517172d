use crate::cmd::{from_hex, to_hex, Cmd};
use cipher::rsa::{PrivateKey, PssSign, PssVerify, PublicKey, BBS_P, BBS_Q};
use cipher::{BlumBlumShub, DefaultRand, Sign, Verify};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::sha2::SHA256;
use std::path::PathBuf;

pub struct SignCmd;
pub struct VerifyCmd;

fn msg_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("msg")
            .value_name("MESSAGE")
            .required(false)
            .action(ArgAction::Set)
            .value_parser(value_parser!(String))
            .help("to specify the message"),
    )
    .arg(
        Arg::new("key")
            .short('k')
            .long("key")
            .action(ArgAction::Set)
            .value_parser(value_parser!(PathBuf))
            .required(true)
            .help("to specify the key file path"),
    )
    .arg(
        Arg::new("file")
            .short('f')
            .long("file")
            .action(ArgAction::Set)
            .value_parser(value_parser!(PathBuf))
            .required(false)
            .help("to specify the message file path"),
    )
}

fn fresh_stream() -> BlumBlumShub {
    let mut rng = DefaultRand::default();
    BlumBlumShub::from_entropy(&mut rng, BBS_P, BBS_Q, 16)
}

fn message(m: &ArgMatches) -> Vec<u8> {
    if let Some(msg) = m.get_one::<String>("msg") {
        msg.clone().into_bytes()
    } else if let Some(path) = m.get_one::<PathBuf>("file") {
        std::fs::read(path).unwrap()
    } else {
        panic!("either a message argument or --file is required");
    }
}

impl Cmd for SignCmd {
    const NAME: &'static str = "sign";

    fn cmd() -> Command {
        msg_args(Command::new(Self::NAME).about("RSA-PSS sign a message or file")).arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .action(ArgAction::Set)
                .required(false)
                .value_parser(value_parser!(PathBuf))
                .help("to specify the output file path for the raw signature"),
        )
    }

    fn run(&self, m: &ArgMatches) {
        let blob = std::fs::read_to_string(m.get_one::<PathBuf>("key").unwrap()).unwrap();
        let key = PrivateKey::from_base64(&blob).unwrap();

        let signer = PssSign::new(key, SHA256::new(), fresh_stream()).unwrap();
        let mut signature = vec![];
        signer.sign(&message(m), &mut signature).unwrap();

        match m.get_one::<PathBuf>("output") {
            Some(path) => std::fs::write(path, &signature).unwrap(),
            None => println!("{}", to_hex(&signature)),
        }
    }
}

impl Cmd for VerifyCmd {
    const NAME: &'static str = "verify";

    fn cmd() -> Command {
        msg_args(Command::new(Self::NAME).about("verify an RSA-PSS signature"))
            .arg(
                Arg::new("signature")
                    .long("signature")
                    .short('s')
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(String))
                    .required(false)
                    .help("to specify the signature as hex"),
            )
            .arg(
                Arg::new("sig-file")
                    .long("sig-file")
                    .action(ArgAction::Set)
                    .value_parser(value_parser!(PathBuf))
                    .required(false)
                    .help("to specify the raw signature file path"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let blob = std::fs::read_to_string(m.get_one::<PathBuf>("key").unwrap()).unwrap();
        let key = PublicKey::from_base64(&blob).unwrap();

        let signature = if let Some(hex) = m.get_one::<String>("signature") {
            from_hex(hex)
        } else if let Some(path) = m.get_one::<PathBuf>("sig-file") {
            std::fs::read(path).unwrap()
        } else {
            panic!("either --signature or --sig-file is required");
        };

        let verifier = PssVerify::new(key, SHA256::new(), fresh_stream()).unwrap();
        if verifier.verify(&message(m), &signature) {
            println!("valid");
        } else {
            eprintln!("invalid signature");
            std::process::exit(1);
        }
    }
}
