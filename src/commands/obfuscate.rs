use super::Host;
use crate::Result;
use crate::obfuscate::{DEFAULT_SHIFT, decrypt, encrypt, is_encrypted};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct EncryptArgs {
    /// Text to obfuscate
    pub text: String,

    /// Byte rotation applied before encoding
    #[arg(long, default_value_t = DEFAULT_SHIFT)]
    pub shift: u8,
}

#[derive(Parser, Debug)]
pub struct DecryptArgs {
    /// Obfuscated text, including its `%%%%%` prefix
    pub text: String,

    /// Byte rotation used when the text was obfuscated
    #[arg(long, default_value_t = DEFAULT_SHIFT)]
    pub shift: u8,
}

pub fn run_encrypt<H: Host>(host: &mut H, args: &EncryptArgs) -> Result<()> {
    if is_encrypted(&args.text) {
        log::warn!("input already looks obfuscated");
    }

    let _ = writeln!(host.output(), "{}", encrypt(&args.text, args.shift));
    Ok(())
}

pub fn run_decrypt<H: Host>(host: &mut H, args: &DecryptArgs) -> Result<()> {
    let text = decrypt(&args.text, args.shift)?;
    let _ = writeln!(host.output(), "{text}");
    Ok(())
}
