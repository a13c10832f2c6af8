//! Decode command implementation.
//!
//! Reads captured stdout (file or stdin) and optional stderr, runs the
//! pipeline and prints the payload.

use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::cli::{Cli, DecodeArgs, PayloadFormat};
use crate::decode::RawOutput;
use crate::error::{DigestError, Result};
use crate::pipeline::{Payload, Pipeline};

/// Run the decode command.
pub fn run(cli: &Cli, args: &DecodeArgs) -> Result<()> {
    let config = cli.resolve_config()?;
    let raw = read_raw(args)?;
    debug!(
        operation = %args.operation,
        stdout_bytes = raw.stdout.len(),
        stderr_bytes = raw.stderr.len(),
        exit_code = raw.exit_code,
        "Read raw output"
    );

    let payload = Pipeline::new(&config).run(args.operation, &raw, args.full)?;
    println!("{}", render(&payload, args.format)?);
    Ok(())
}

/// Format a payload for printing.
pub fn render(payload: &Payload, format: PayloadFormat) -> Result<String> {
    let text = match format {
        PayloadFormat::Text => payload.text.clone(),
        PayloadFormat::Json => serde_json::to_string_pretty(&payload.structured)?,
        PayloadFormat::Both => serde_json::to_string_pretty(payload)?,
    };
    Ok(text)
}

fn read_raw(args: &DecodeArgs) -> Result<RawOutput> {
    let stdout = match &args.input {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| DigestError::io("Failed to read stdin", e))?;
            buf
        }
    };
    let stderr = match &args.stderr {
        Some(path) => read_file(path)?,
        None => String::new(),
    };

    Ok(RawOutput::new(stdout)
        .with_stderr(stderr)
        .with_exit_code(args.exit_code))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            DigestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DigestError::io(format!("Failed to read {}", path.display()), e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operation;

    #[test]
    fn test_render_formats() {
        let raw = RawOutput::new("## main\n");
        let payload = Pipeline::default().run(Operation::GitStatus, &raw, true).unwrap();

        assert_eq!(render(&payload, PayloadFormat::Text).unwrap(), "git status ok: main, clean");

        let json: serde_json::Value =
            serde_json::from_str(&render(&payload, PayloadFormat::Json).unwrap()).unwrap();
        assert_eq!(json["branch"], "main");

        let both: serde_json::Value =
            serde_json::from_str(&render(&payload, PayloadFormat::Both).unwrap()).unwrap();
        assert_eq!(both["representation"], "full");
        assert_eq!(both["structured"]["clean"], true);
    }

    #[test]
    fn test_read_file_missing() {
        let err = read_file(Path::new("/nonexistent/stdout.txt")).unwrap_err();
        assert!(matches!(err, DigestError::FileNotFound { .. }));
    }
}
