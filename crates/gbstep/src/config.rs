use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use typed_builder::TypedBuilder;

/// Environment variable holding the cartridge path used when none is given
/// on the command line.
pub const ROM_ENV: &str = "GBSTEP_ROM";
pub const DEFAULT_STEPS: u64 = 1000;

pub const USAGE: &str = "usage: gbstep [ROM] [--steps N] [--break ADDR]... [--trace] \
[--disasm START:END] [--dump START:LEN]";

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    #[builder(default = DEFAULT_STEPS)]
    pub max_instructions: u64,
    #[builder(default)]
    pub breakpoints: Vec<u16>,
    /// Print every executed instruction.
    #[builder(default)]
    pub trace: bool,
    /// Listing of `[start, end)` printed before execution.
    #[builder(default)]
    pub disassemble: Option<(u16, u16)>,
    /// Hex dump of `len` bytes from `start`, printed after execution.
    #[builder(default)]
    pub dump: Option<(u16, usize)>,
}

impl RunConfig {
    /// Parse the process arguments, falling back to `GBSTEP_ROM` for the
    /// cartridge path.
    pub fn from_env() -> Result<Self> {
        parse_args(std::env::args().skip(1), std::env::var(ROM_ENV).ok())
    }
}

/// Build a `RunConfig` from command-line arguments (without the program
/// name). `env_rom` is used when no positional ROM path is present.
pub fn parse_args<I>(args: I, env_rom: Option<String>) -> Result<RunConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut rom_path = None;
    let mut max_instructions = DEFAULT_STEPS;
    let mut breakpoints = Vec::new();
    let mut trace = false;
    let mut disassemble = None;
    let mut dump = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--steps" => {
                let value = flag_value(&mut args, "--steps")?;
                max_instructions = parse_number(&value)
                    .with_context(|| format!("invalid --steps value '{value}'"))?;
            }
            "--break" => {
                let value = flag_value(&mut args, "--break")?;
                breakpoints.push(
                    parse_address(&value)
                        .with_context(|| format!("invalid --break address '{value}'"))?,
                );
            }
            "--trace" => trace = true,
            "--disasm" => {
                let value = flag_value(&mut args, "--disasm")?;
                let (start, end) = split_pair(&value, "--disasm")?;
                disassemble = Some((parse_address(start)?, parse_address(end)?));
            }
            "--dump" => {
                let value = flag_value(&mut args, "--dump")?;
                let (start, len) = split_pair(&value, "--dump")?;
                let len = usize::try_from(parse_number(len)?)
                    .with_context(|| format!("--dump length '{len}' is too large"))?;
                dump = Some((parse_address(start)?, len));
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            path => {
                if rom_path.is_some() {
                    bail!("unexpected argument '{path}'\n{USAGE}");
                }
                rom_path = Some(PathBuf::from(path));
            }
        }
    }

    let rom_path = match rom_path.or_else(|| env_rom.filter(|p| !p.is_empty()).map(PathBuf::from)) {
        Some(path) => path,
        None => bail!("no ROM path given and {ROM_ENV} is not set\n{USAGE}"),
    };

    Ok(RunConfig::builder()
        .rom_path(rom_path)
        .max_instructions(max_instructions)
        .breakpoints(breakpoints)
        .trace(trace)
        .disassemble(disassemble)
        .dump(dump)
        .build())
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{flag} expects a value\n{USAGE}"))
}

fn split_pair<'a>(value: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    value
        .split_once(':')
        .with_context(|| format!("{flag} expects START:VALUE, got '{value}'"))
}

/// `0x`/`$` prefixed hex, or decimal.
pub fn parse_number(text: &str) -> Result<u64> {
    let text = text.trim();
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'));
    let value = match hex {
        Some(digits) => u64::from_str_radix(digits, 16),
        None => text.parse(),
    };
    value.with_context(|| format!("'{text}' is not a number"))
}

pub fn parse_address(text: &str) -> Result<u16> {
    let value = parse_number(text)?;
    u16::try_from(value).with_context(|| format!("address '{text}' is above 0xFFFF"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn numbers_accept_hex_and_decimal() {
        assert_eq!(parse_number("0x150").unwrap(), 0x150);
        assert_eq!(parse_number("0XFF").unwrap(), 0xFF);
        assert_eq!(parse_number("$C000").unwrap(), 0xC000);
        assert_eq!(parse_number("256").unwrap(), 256);
        assert!(parse_number("0xZZ").is_err());
        assert!(parse_address("0x10000").is_err());
    }

    #[test]
    fn defaults_come_from_builder() {
        let config = RunConfig::builder().rom_path("game.gb").build();
        assert_eq!(config.max_instructions, DEFAULT_STEPS);
        assert!(config.breakpoints.is_empty());
        assert!(!config.trace);
        assert_eq!(config.disassemble, None);
        assert_eq!(config.dump, None);
    }

    #[test]
    fn parses_every_option() {
        let config = parse_args(
            args(&[
                "game.gb", "--steps", "50", "--break", "0x0150", "--break", "$0200", "--trace",
                "--disasm", "0x100:0x110", "--dump", "0xFF40:16",
            ]),
            None,
        )
        .unwrap();

        assert_eq!(config.rom_path, PathBuf::from("game.gb"));
        assert_eq!(config.max_instructions, 50);
        assert_eq!(config.breakpoints, [0x0150, 0x0200]);
        assert!(config.trace);
        assert_eq!(config.disassemble, Some((0x0100, 0x0110)));
        assert_eq!(config.dump, Some((0xFF40, 16)));
    }

    #[test]
    fn rom_path_falls_back_to_environment() {
        let config = parse_args(args(&["--steps", "1"]), Some("last.gb".into())).unwrap();
        assert_eq!(config.rom_path, PathBuf::from("last.gb"));

        let config = parse_args(args(&["new.gb"]), Some("last.gb".into())).unwrap();
        assert_eq!(config.rom_path, PathBuf::from("new.gb"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args(args(&[]), None).is_err());
        assert!(parse_args(args(&[]), Some(String::new())).is_err());
        assert!(parse_args(args(&["a.gb", "b.gb"]), None).is_err());
        assert!(parse_args(args(&["a.gb", "--bogus"]), None).is_err());
        assert!(parse_args(args(&["a.gb", "--steps"]), None).is_err());
        assert!(parse_args(args(&["a.gb", "--disasm", "0x100"]), None).is_err());
    }
}
