use std::path::Path;
use thiserror::Error;

use crate::commands::hidden_command;

#[derive(Error, Debug)]
pub enum WslError {
    /// `wsl.exe -l` could not be started or exited unsuccessfully.
    #[error("Problem occurred when getting wsl distros")]
    ListFailed {
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Run `<wsl_exe> -l` and return its decoded stdout.
///
/// No timeout is applied; callers that cannot tolerate a hung `wsl.exe`
/// should wrap this in `tokio::time::timeout`.
///
/// # Errors
/// Returns [`WslError::ListFailed`] when the process cannot be launched or
/// exits with a non-zero status.
pub async fn list_wsl_distros_raw(wsl_exe: &Path) -> Result<String, WslError> {
    log::debug!("Listing WSL distributions via {}", wsl_exe.display());

    let output = hidden_command(wsl_exe)
        .arg("-l")
        .output()
        .await
        .map_err(|e| WslError::ListFailed { source: Some(e) })?;

    if !output.status.success() {
        log::debug!("{} -l exited with {}", wsl_exe.display(), output.status);
        return Err(WslError::ListFailed { source: None });
    }

    Ok(decode_wsl_output(&output.stdout))
}

/// `wsl.exe` writes UTF-16LE; fall back to UTF-8 for anything that does not
/// decode to readable text.
#[must_use]
pub fn decode_wsl_output(bytes: &[u8]) -> String {
    if bytes.len() >= 2 {
        let bytes = bytes.strip_prefix(&[0xFF, 0xFE]).unwrap_or(bytes);
        let u16_iter = bytes
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]));
        let decoded: String = char::decode_utf16(u16_iter)
            .filter_map(Result::ok)
            .filter(|c| *c != '\0')
            .collect();
        if decoded.chars().any(char::is_alphabetic) {
            return decoded;
        }
    }
    String::from_utf8_lossy(bytes).replace('\0', "")
}
