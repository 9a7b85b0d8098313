use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Desktop command that hands a URL to the default browser or app.
fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}

/// Launch the share URL without waiting for the opener to finish
pub fn open_url(url: &str) -> Result<()> {
    let mut command = opener_command(url);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launching {:?}", command.get_program()))?;

    tracing::info!(url, "share target opened");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_passed_as_the_last_argument() {
        let url = "https://wa.me/?text=Invoice%20INV-1";
        let command = opener_command(url);

        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().and_then(|arg| arg.to_str()), Some(url));
    }
}
