//! Operations command implementation.

use crate::cli::OperationsArgs;
use crate::error::Result;
use crate::model::Operation;

/// Run the operations command.
pub fn run(args: &OperationsArgs) -> Result<()> {
    if args.json {
        let names: Vec<String> = Operation::ALL.iter().map(ToString::to_string).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    let width = Operation::ALL
        .iter()
        .map(|op| op.to_string().len())
        .max()
        .unwrap_or(0);
    for op in Operation::ALL {
        println!("{:<width$}  {}", op.to_string(), op.description());
    }
    Ok(())
}
