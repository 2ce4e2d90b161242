use super::RenderError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Converts rendered HTML into a PDF by piping it through a `wkhtmltopdf` binary.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    binary: PathBuf,
}

impl WkhtmltopdfConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn convert(&self, html: &str, output: &Path) -> Result<(), RenderError> {
        debug!(binary = %self.binary.display(), output = %output.display(), "spawning pdf converter");

        let mut child = Command::new(&self.binary)
            .args(["--quiet", "--enable-local-file-access", "-"])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is fed from its own thread while this one drains stderr. The child is
        // reaped even when the write fails.
        let stdin = child.stdin.take();
        let (written, result) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(html.as_bytes()),
                None => Ok(()),
            });
            let result = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("pdf input writer panicked")));
            (written, result)
        });

        let result = result?;
        if !result.status.success() {
            return Err(RenderError::Converter {
                status: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        written?;

        Ok(())
    }
}
