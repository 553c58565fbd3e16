//! Command-line arguments for `urlbridge-probe`

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};

/// Help text printed for `--help` and after argument errors.
pub const USAGE: &str = "\
urlbridge-probe - wait for one open-URL Apple Event and report it

USAGE:
    urlbridge-probe [OPTIONS]

OPTIONS:
    --config <PATH>      Config file (TOML or JSON)
    --pid <PID>          Print application info for PID before listening
    --timeout-ms <MS>    How long to wait for a URL (default: config)
    --match <KEY=VALUE>  App criterion checked against the sender, repeatable
                         (display_name, bundle_id, bundle_path, executable_path)
    --json               Print reports as JSON lines
    -h, --help           Show this help message";

/// Parsed `urlbridge-probe` arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeArgs {
    /// `--config`: explicit config file instead of probing.
    pub config_path: Option<PathBuf>,
    /// `--pid`: process to describe before listening.
    pub pid: Option<i32>,
    /// `--timeout-ms`: overrides `wait_timeout_ms`.
    pub timeout_ms: Option<u64>,
    /// `--match` pairs, unparsed.
    pub criteria: Vec<String>,
    /// `--json`: JSON lines instead of text.
    pub json: bool,
    /// `-h`/`--help`.
    pub help: bool,
}

impl ProbeArgs {
    /// Parse arguments, excluding the program name.
    ///
    /// # Errors
    /// An unknown flag, a flag missing its value, or a non-numeric
    /// `--pid`/`--timeout-ms`.
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => parsed.help = true,
                "--json" => parsed.json = true,
                "--config" => parsed.config_path = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--pid" => {
                    let raw = value(&mut args, &arg)?;
                    parsed.pid =
                        Some(raw.parse().with_context(|| format!("invalid --pid value '{raw}'"))?);
                }
                "--timeout-ms" => {
                    let raw = value(&mut args, &arg)?;
                    parsed.timeout_ms = Some(
                        raw.parse().with_context(|| format!("invalid --timeout-ms value '{raw}'"))?,
                    );
                }
                "--match" => parsed.criteria.push(value(&mut args, &arg)?),
                unknown => bail!("unknown argument '{unknown}'"),
            }
        }

        Ok(parsed)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next().ok_or_else(|| anyhow!("{flag} requires a value"))
}
