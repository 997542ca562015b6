mod commands;
mod host;
mod paths;
mod wsl;

pub use commands::{HideWindow, hidden_command};
pub use host::{Platform, WSL_EXE_MIN_BUILD, WindowsHost, parse_windows_build};
pub use paths::{AppPaths, AppPathsError};
pub use wsl::{WslError, decode_wsl_output, list_wsl_distros_raw};
