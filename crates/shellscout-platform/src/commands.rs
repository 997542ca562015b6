use std::ffi::OsStr;
use std::process::Stdio;

#[cfg(windows)]
use std::os::windows::process::CommandExt;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Async command for `program` that runs without a console window on
/// Windows and with stdin detached, for one-shot queries like `wsl.exe -l`.
pub fn hidden_command(program: impl AsRef<OsStr>) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    cmd.hide_window().stdin(Stdio::null());
    cmd
}

/// Suppresses the console window of a spawned process. No-op off Windows.
pub trait HideWindow {
    fn hide_window(&mut self) -> &mut Self;
}

macro_rules! impl_hide_window {
    ($($command:ty),+) => {$(
        impl HideWindow for $command {
            fn hide_window(&mut self) -> &mut Self {
                #[cfg(windows)]
                self.creation_flags(CREATE_NO_WINDOW);
                self
            }
        }
    )+};
}

impl_hide_window!(tokio::process::Command, std::process::Command);
