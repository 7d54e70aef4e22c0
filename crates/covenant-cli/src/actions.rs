//! GitHub Actions step outputs.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` using the
//! heredoc form `name<<DELIMITER`, which tolerates any value. Without an
//! output file the legacy `::set-output` workflow command is printed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};

/// Set a step output named `name` to `value`.
pub(crate) fn set_output(output_file: Option<&Path>, name: &str, value: &str) -> Result<()> {
    match output_file {
        Some(path) => {
            let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
            let record = file_command(name, value, &delimiter)?;
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open step output file {}", path.display()))?;
            file.write_all(record.as_bytes())
                .wrap_err_with(|| format!("failed to write step output file {}", path.display()))?;
        }
        None => println!("{}", workflow_command(name, value)),
    }
    Ok(())
}

/// Render a `name<<delimiter` record for the output file.
fn file_command(name: &str, value: &str, delimiter: &str) -> Result<String> {
    if name.contains(delimiter) || value.contains(delimiter) {
        bail!("step output `{name}` collides with its delimiter");
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Render a `::set-output` workflow command with escaped properties.
fn workflow_command(name: &str, value: &str) -> String {
    format!(
        "::set-output name={}::{}",
        escape_property(name),
        escape_data(value)
    )
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
