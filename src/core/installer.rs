use crate::error::{AcgetError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Walk `dir` depth-first and return the first file whose name ends with
/// `suffix`. An empty or missing tree is not an error, just no match.
pub fn find_installer(dir: &Path, suffix: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            if let Some(found) = find_installer(&path, suffix)? {
                return Ok(Some(found));
            }
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(suffix))
        {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Run the installer synchronously, appending any configured extra
/// arguments. A non-zero exit from the child is surfaced to the caller.
pub fn run_installer(installer_path: &Path, extra_args: Option<&str>) -> Result<()> {
    let mut command = Command::new(installer_path);
    if let Some(args) = extra_args {
        command.args(args.split_whitespace());
    }

    println!("Starting the installer with the following command:");
    match extra_args {
        Some(args) => println!("{} {args}", installer_path.display()),
        None => println!("{}", installer_path.display()),
    }

    let status = command.status()?;
    if !status.success() {
        return Err(AcgetError::InstallerFailed {
            code: status.code().unwrap_or(1),
        });
    }

    Ok(())
}
