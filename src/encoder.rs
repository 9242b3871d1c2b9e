//! # Encoder Pipe
//!
//! Spawns an external video encoder as a child process and feeds it raw PPM frames over its
//! stdin. The caller writes frames, then calls [`EncoderPipe::finish`] to close stdin and wait for
//! the child's exit status.

use crate::errors::EncoderError;
use std::io::Write;
use std::process::{Child, Command, Stdio};

pub struct EncoderPipe {
    command: String,
    child: Child,
}

impl EncoderPipe {
    /// Spawns `command` with `args`, piping stdin. The child is expected to read PPM frames from
    /// stdin until it is closed, then produce the output file itself (the output path is passed as
    /// one of `args`, not handled here).
    pub fn spawn(command: &str, args: &[String]) -> Result<Self, EncoderError> {
        let child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .map_err(|source| EncoderError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(EncoderPipe {
            command: command.to_string(),
            child,
        })
    }

    /// Writes one frame's raw bytes to the child's stdin.
    pub fn write_frame(&mut self, bytes: &[u8]) -> Result<(), EncoderError> {
        let stdin = self
            .child
            .stdin
            .as_mut()
            .expect("stdin was piped at spawn time");
        let wrote = stdin.write(bytes).map_err(|source| EncoderError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        if wrote != bytes.len() {
            return Err(EncoderError::ShortWrite {
                wrote,
                expected: bytes.len(),
            });
        }
        Ok(())
    }

    /// Closes stdin and waits for the child to exit. Errors if the child exited nonzero.
    pub fn finish(mut self) -> Result<(), EncoderError> {
        drop(self.child.stdin.take()); // close stdin so the encoder can flush and exit
        let status = self.child.wait().map_err(|source| EncoderError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        if !status.success() {
            return Err(EncoderError::NonZeroExit {
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}
