use clap::{ArgMatches, Command};

mod key;
pub use key::KeyCmd;

mod crypt;
pub use crypt::{DecryptCmd, EncryptCmd};

mod sign;
pub use sign::{SignCmd, VerifyCmd};

mod hash;
pub use hash::HashCmd;

pub trait Cmd {
    const NAME: &'static str;
    fn cmd() -> Command;
    fn run(&self, m: &ArgMatches);
}

pub(crate) fn to_hex(data: &[u8]) -> String {
    data.iter().map(|x| format!("{:02x}", x)).collect()
}

pub(crate) fn from_hex(s: &str) -> Vec<u8> {
    let s = s.trim();
    assert!(s.len() % 2 == 0, "hex string must have even length");
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..(i + 2)], 16).expect("invalid hex digit"))
        .collect()
}
