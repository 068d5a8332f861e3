use anyhow::{bail, Context, Result};
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::info;
use url::Url;

// Program and leading arguments that hand a URL to the desktop's default browser
#[cfg(target_os = "macos")]
const OPENER: (&str, &[&str]) = ("open", &[]);
#[cfg(windows)]
const OPENER: (&str, &[&str]) = ("rundll32", &["url.dll,FileProtocolHandler"]);
#[cfg(not(any(target_os = "macos", windows)))]
const OPENER: (&str, &[&str]) = ("xdg-open", &[]);

/// Only http(s) links leave the viewer.
pub fn parse_link(link: &str) -> Result<Url> {
    let url = Url::parse(link).with_context(|| format!("invalid link {}", link))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("refusing to open {} link", other),
    }
}

/// Launches the system opener in the background; the viewer does not wait for it.
pub fn open_url(link: &str) -> Result<()> {
    let url = parse_link(link)?;
    let (program, args) = OPENER;

    TokioCommand::new(program)
        .args(args)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run {}", program))?;

    info!(%url, program, "opened link");
    Ok(())
}
