//! Launch-at-login registration.
//!
//! A small launcher entry pointing at the current executable is written to
//! the platform's per-user autostart location:
//! - Linux: `~/.config/autostart/quickimg.desktop`
//! - macOS: `~/Library/LaunchAgents/com.quickimg.editor.plist`
//! - Windows: `QuickImgEditor.cmd` in the Startup folder

use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const APP_NAME: &str = "QuickImgEditor";

#[cfg(target_os = "macos")]
const ENTRY_FILE_NAME: &str = "com.quickimg.editor.plist";
#[cfg(target_os = "windows")]
const ENTRY_FILE_NAME: &str = "QuickImgEditor.cmd";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const ENTRY_FILE_NAME: &str = "quickimg.desktop";

#[derive(Debug, Clone)]
pub struct StartupRegistration {
    entry_path: PathBuf,
    executable: PathBuf,
}

impl StartupRegistration {
    /// Registration for `executable` inside `autostart_dir`.
    pub fn new(autostart_dir: impl AsRef<Path>, executable: impl Into<PathBuf>) -> Self {
        Self {
            entry_path: autostart_dir.as_ref().join(ENTRY_FILE_NAME),
            executable: executable.into(),
        }
    }

    /// Registration for the running executable in the user's autostart dir.
    pub fn for_current_user() -> anyhow::Result<Self> {
        let executable = std::env::current_exe().context("locate current executable")?;
        let dir = autostart_dir().ok_or_else(|| anyhow!("no autostart directory for this user"))?;
        Ok(Self::new(dir, executable))
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    pub fn is_enabled(&self) -> bool {
        self.entry_path.exists()
    }

    pub fn enable(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.entry_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create autostart dir: {}", parent.display()))?;
        }

        fs::write(&self.entry_path, entry_contents(&self.executable)).with_context(|| {
            format!("write startup entry: {}", self.entry_path.display())
        })?;
        info!(entry = %self.entry_path.display(), "Startup shortcut added");
        Ok(())
    }

    /// Remove the entry. A missing entry is not an error.
    pub fn disable(&self) -> anyhow::Result<()> {
        if !self.entry_path.exists() {
            warn!("Startup shortcut not found");
            return Ok(());
        }

        fs::remove_file(&self.entry_path).with_context(|| {
            format!("remove startup entry: {}", self.entry_path.display())
        })?;
        info!(entry = %self.entry_path.display(), "Startup shortcut removed");
        Ok(())
    }

    pub fn set_enabled(&self, enable: bool) -> anyhow::Result<()> {
        if enable {
            self.enable()
        } else {
            self.disable()
        }
    }
}

/// Best-effort registration update for the current user; failures are
/// logged and otherwise ignored.
pub fn apply(enable: bool) {
    let result = StartupRegistration::for_current_user().and_then(|r| r.set_enabled(enable));
    if let Err(e) = result {
        error!("Startup setting failed: {:#}", e);
    }
}

#[cfg(target_os = "macos")]
fn autostart_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join("Library").join("LaunchAgents"))
}

#[cfg(target_os = "windows")]
fn autostart_dir() -> Option<PathBuf> {
    // config_dir is %APPDATA% (Roaming) on Windows.
    directories::BaseDirs::new().map(|dirs| {
        dirs.config_dir()
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs")
            .join("Startup")
    })
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn autostart_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("autostart"))
}

#[cfg(target_os = "macos")]
fn entry_contents(executable: &Path) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>com.quickimg.editor</string>
    <key>ProgramArguments</key>
    <array>
        <string>{}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#,
        executable.display()
    )
}

#[cfg(target_os = "windows")]
fn entry_contents(executable: &Path) -> String {
    let workdir = executable.parent().unwrap_or(executable);
    format!(
        "@echo off\r\ncd /d \"{}\"\r\nstart \"\" \"{}\"\r\n",
        workdir.display(),
        executable.display()
    )
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn entry_contents(executable: &Path) -> String {
    format!(
        "[Desktop Entry]\nType=Application\nName={APP_NAME}\nExec=\"{}\"\nX-GNOME-Autostart-enabled=true\n",
        executable.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_writes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let reg = StartupRegistration::new(dir.path().join("autostart"), "/opt/quickimg/quickimg");

        assert!(!reg.is_enabled());
        reg.enable().unwrap();
        assert!(reg.is_enabled());

        let contents = std::fs::read_to_string(reg.entry_path()).unwrap();
        assert!(contents.contains("quickimg/quickimg"));
    }

    #[test]
    fn test_disable_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let reg = StartupRegistration::new(dir.path(), "/opt/quickimg/quickimg");

        reg.set_enabled(true).unwrap();
        reg.set_enabled(false).unwrap();
        assert!(!reg.is_enabled());
    }

    #[test]
    fn test_disable_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let reg = StartupRegistration::new(dir.path(), "/opt/quickimg/quickimg");
        assert!(reg.disable().is_ok());
    }
}
