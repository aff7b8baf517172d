use crate::cmd::{from_hex, to_hex, Cmd};
use cipher::rsa::{ExpVariant, OAEPDecrypt, OAEPEncrypt, PrivateKey, PublicKey, BBS_P, BBS_Q};
use cipher::{BlumBlumShub, Decrypt, DefaultRand, Encrypt};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use crypto_hash::sha2::SHA256;
use std::path::PathBuf;

pub struct EncryptCmd;
pub struct DecryptCmd;

fn io_args(cmd: Command) -> Command {
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
            .help("to specify the input file path"),
    )
    .arg(
        Arg::new("output")
            .long("output")
            .short('o')
            .action(ArgAction::Set)
            .required(false)
            .value_parser(value_parser!(PathBuf))
            .help("to specify the output file path"),
    )
    .arg(
        Arg::new("label")
            .long("label")
            .action(ArgAction::Set)
            .value_parser(value_parser!(String))
            .required(false)
            .help("to specify the OAEP label"),
    )
}

fn fresh_stream() -> BlumBlumShub {
    let mut rng = DefaultRand::default();
    BlumBlumShub::from_entropy(&mut rng, BBS_P, BBS_Q, 16)
}

fn variant_from(name: &str) -> ExpVariant {
    match name {
        "plain" => ExpVariant::Plain,
        "blinded" => ExpVariant::Blinded,
        "crt" => ExpVariant::Crt,
        "crt-blinded" => ExpVariant::CrtBlinded,
        other => panic!("unsupported exponentiation variant `{other}`"),
    }
}

// (input bytes, hex-print instead of raw write)
fn gather_input(m: &ArgMatches, is_hex_input: bool) -> Vec<u8> {
    if let Some(msg) = m.get_one::<String>("msg") {
        if is_hex_input {
            from_hex(msg)
        } else {
            msg.clone().into_bytes()
        }
    } else if let Some(path) = m.get_one::<PathBuf>("file") {
        std::fs::read(path).unwrap()
    } else {
        panic!("either a message argument or --file is required");
    }
}

fn emit_output(m: &ArgMatches, data: &[u8], as_hex: bool) {
    match m.get_one::<PathBuf>("output") {
        Some(path) => std::fs::write(path, data).unwrap(),
        None if as_hex => println!("{}", to_hex(data)),
        None => println!("{}", String::from_utf8_lossy(data)),
    }
}

impl Cmd for EncryptCmd {
    const NAME: &'static str = "encrypt";

    fn cmd() -> Command {
        io_args(Command::new(Self::NAME).about("RSA-OAEP encrypt a message or file"))
    }

    fn run(&self, m: &ArgMatches) {
        let key_path = m.get_one::<PathBuf>("key").cloned().unwrap();
        let blob = std::fs::read_to_string(key_path).unwrap();
        let key = PublicKey::from_base64(&blob).unwrap();

        let label = m.get_one::<String>("label").cloned().unwrap_or_default();
        let oaep = OAEPEncrypt::new(key, SHA256::new(), fresh_stream(), label.as_bytes()).unwrap();

        let data = gather_input(m, false);
        let mut cipher = Vec::with_capacity(1024);
        for block in data.chunks(oaep.max_msg_len().max(1)) {
            oaep.encrypt(block, &mut cipher).unwrap();
        }

        emit_output(m, &cipher, true);
    }
}

impl Cmd for DecryptCmd {
    const NAME: &'static str = "decrypt";

    fn cmd() -> Command {
        io_args(Command::new(Self::NAME).about("RSA-OAEP decrypt a hex message or file"))
            .arg(
                Arg::new("variant")
                    .long("variant")
                    .action(ArgAction::Set)
                    .default_value("crt-blinded")
                    .value_parser(["plain", "blinded", "crt", "crt-blinded"])
                    .help("to specify the private exponentiation variant"),
            )
    }

    fn run(&self, m: &ArgMatches) {
        let key_path = m.get_one::<PathBuf>("key").cloned().unwrap();
        let blob = std::fs::read_to_string(key_path).unwrap();
        let key = PrivateKey::from_base64(&blob).unwrap();

        let label = m.get_one::<String>("label").cloned().unwrap_or_default();
        let variant = variant_from(m.get_one::<String>("variant").unwrap());
        let oaep = OAEPDecrypt::new(key, SHA256::new(), fresh_stream(), label.as_bytes())
            .unwrap()
            .with_variant(variant);

        let data = gather_input(m, m.get_one::<PathBuf>("file").is_none());
        let mut plain = Vec::with_capacity(1024);
        for block in data.chunks(oaep.key_len()) {
            oaep.decrypt(block, &mut plain).unwrap();
        }

        emit_output(m, &plain, false);
    }
}
