use anyhow::{bail, Result};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

pub fn directory(message: &str) -> Result<PathBuf> {
    ask(message, Path::is_dir, "Invalid path or no such directory")
}

pub fn file(message: &str) -> Result<PathBuf> {
    ask(message, Path::is_file, "Invalid path or not a file")
}

/// Keep asking on stderr until a line on stdin names a valid path.
fn ask(message: &str, valid: fn(&Path) -> bool, invalid: &str) -> Result<PathBuf> {
    let stdin = io::stdin();
    let mut stderr = io::stderr();
    loop {
        writeln!(stderr, "{message}:")?;
        stderr.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("input closed while waiting for: {message}");
        }
        let path = PathBuf::from(line.trim());
        if valid(&path) {
            return Ok(path);
        }
        writeln!(stderr, "{invalid}")?;
    }
}
