//! Handing control to the target program

use cloudenv_core::{Error, ResolvedEnvironment, Result};
use std::convert::Infallible;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Find the executable for `program`.
///
/// Anything with more than one path component is used as given; a bare name
/// is searched for in `path` (the `PATH` the program itself will see).
pub fn locate_program(program: &OsStr, path: Option<&OsStr>) -> Result<PathBuf> {
    let display = program.to_string_lossy();
    if program.is_empty() {
        return Err(Error::process_replace(display, "empty program name", None));
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return Ok(candidate.to_path_buf());
    }

    let cwd = std::env::current_dir()
        .map_err(|e| Error::process_replace(display.as_ref(), "cannot read current directory", Some(e)))?;
    which::which_in(program, path, cwd)
        .map_err(|e| Error::process_replace(display, format!("not found in PATH ({e})"), None))
}

/// Replace the current process with `program`.
///
/// The program receives `args` after its own name as argument 0, and exactly
/// the variables of `env`. On success this never returns.
#[cfg(unix)]
pub fn replace_process(
    program: &OsStr,
    args: &[OsString],
    env: &ResolvedEnvironment,
) -> Result<Infallible> {
    use std::os::unix::process::CommandExt;

    let executable = locate_program(program, env.path())?;
    tracing::debug!(
        program = %program.to_string_lossy(),
        executable = %executable.display(),
        variables = env.len(),
        "Replacing process image"
    );

    let error = build_command(&executable, args, env).arg0(program).exec();
    Err(Error::process_replace(
        program.to_string_lossy(),
        "exec failed",
        Some(error),
    ))
}

/// Run `program` as a child and exit with its status.
///
/// Platforms without exec get a new process identity; console control
/// events reach the child through the shared console.
#[cfg(not(unix))]
pub fn replace_process(
    program: &OsStr,
    args: &[OsString],
    env: &ResolvedEnvironment,
) -> Result<Infallible> {
    let executable = locate_program(program, env.path())?;
    tracing::debug!(
        program = %program.to_string_lossy(),
        executable = %executable.display(),
        "Spawning program in place of exec"
    );

    let status = build_command(&executable, args, env)
        .status()
        .map_err(|e| Error::process_replace(program.to_string_lossy(), "failed to spawn", Some(e)))?;
    std::process::exit(status.code().unwrap_or(1));
}

fn build_command(executable: &Path, args: &[OsString], env: &ResolvedEnvironment) -> Command {
    let mut cmd = Command::new(executable);
    cmd.args(args).env_clear().envs(env.iter());
    cmd
}
