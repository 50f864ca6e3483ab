pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a request from `--input <file>` if given. Otherwise, when no
/// individual flags were passed, try piped stdin. `None` means the caller
/// should build the request from its flags. Stdin is never touched once a
/// value flag is present.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
    flags_given: bool,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    if flags_given {
        return Ok(None);
    }
    stdin::read_stdin()
}
