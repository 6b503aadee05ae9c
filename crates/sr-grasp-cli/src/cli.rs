//! Argument parsing for the `sr-grasp` binary.
//!
//! ```text
//! sr-grasp [--file PATH] <command>
//!
//!   list          – id, quality, and joint count of every grasp
//!   show <id>     – one grasp's pre-grasp and grasp point 0, in degrees
//!   validate      – load the grasp file and report the result
//!   export        – print the stash as a GraspArray in JSON
//!   schema        – print the JSON schema of one grasp file entry
//!   help          – show this list
//! ```

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Show(String),
    Validate,
    Export,
    Schema,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    /// Grasp file override; falls back to the configured default.
    pub file: Option<PathBuf>,
    pub command: Command,
}

/// Parse the process arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<Cli, String>
where
    I: IntoIterator<Item = String>,
{
    let mut file = None;
    let mut positional = Vec::new();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-f" | "--file" => {
                let path = args
                    .next()
                    .ok_or_else(|| format!("{arg} requires a path"))?;
                file = Some(PathBuf::from(path));
            }
            "-h" | "--help" => positional.push("help".to_string()),
            s if s.starts_with('-') => return Err(format!("unknown option: {s}")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("help") => Command::Help,
        Some("list") => Command::List,
        Some("show") => Command::Show(
            positional
                .next()
                .ok_or_else(|| "show requires a grasp id".to_string())?,
        ),
        Some("validate") => Command::Validate,
        Some("export") => Command::Export,
        Some("schema") => Command::Schema,
        Some(other) => return Err(format!("unknown command: {other}")),
    };

    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {extra}"));
    }

    Ok(Cli { file, command })
}
