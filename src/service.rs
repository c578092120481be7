//! The blocking request loop: read a frame, transcribe it, write one JSON line.
//!
//! One frame is fully processed before the next length prefix is read. The loop
//! moves through [`State`]s and publishes the current one through a [`StateCell`],
//! so an interrupt watcher on another thread can tell whether it is safe to exit
//! immediately.

use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tracing::{error, info, warn};

use crate::Result;
use crate::backend::Backend;
use crate::frame::{Frame, FrameReader};
use crate::response::{ResponseWriter, TranscriptionResult};
use crate::transcriber::Transcriber;

/// Where the service loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    WaitingLength = 0,
    ReadingPayload = 1,
    Transcribing = 2,
    Emitting = 3,
    Stopped = 4,
}

impl State {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::WaitingLength,
            1 => Self::ReadingPayload,
            2 => Self::Transcribing,
            3 => Self::Emitting,
            _ => Self::Stopped,
        }
    }

    /// True while the loop is parked on a read and holds no unfinished response.
    pub fn is_blocked_on_input(self) -> bool {
        matches!(self, Self::WaitingLength | Self::ReadingPayload)
    }
}

/// Shared view of the loop's [`State`].
#[derive(Debug, Clone)]
pub struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(State::WaitingLength as u8)))
    }

    pub fn get(&self) -> State {
        State::from_u8(self.0.load(Ordering::SeqCst))
    }

    fn set(&self, state: State) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable flag asking the loop to stop before it reads another frame.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Request shutdown on behalf of an interrupt.
///
/// Returns `true` when the loop is parked on input and will not see the request until
/// more bytes arrive; the caller then has to end the process itself. Otherwise the loop
/// stops on its own after writing the in-flight response.
pub fn interrupt(shutdown: &Shutdown, state: &StateCell) -> bool {
    shutdown.request();
    state.get().is_blocked_on_input()
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Interrupted,
}

/// Per-run counters, logged when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Length prefixes read.
    pub frames: u64,
    /// Responses with `success: true`.
    pub transcribed: u64,
    /// Responses with `success: false`.
    pub failed: u64,
    /// Truncated payloads.
    pub dropped: u64,
    pub stop_reason: StopReason,
}

/// Owns the transcriber for the lifetime of the process and drives the request loop.
pub struct Service<B: Backend> {
    transcriber: Transcriber<B>,
    shutdown: Shutdown,
    state: StateCell,
}

impl<B: Backend> Service<B> {
    pub fn new(transcriber: Transcriber<B>) -> Self {
        Self {
            transcriber,
            shutdown: Shutdown::new(),
            state: StateCell::new(),
        }
    }

    /// Handle used to request a stop from another thread.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Handle used to observe the loop's state from another thread.
    pub fn state_handle(&self) -> StateCell {
        self.state.clone()
    }

    pub fn transcriber(&self) -> &Transcriber<B> {
        &self.transcriber
    }

    /// Serve frames from `input` until end of stream or a shutdown request.
    ///
    /// Only a failure to write to `output` is returned as an error; input errors end
    /// the loop like end of stream does, and transcription errors become response lines.
    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> Result<Summary> {
        let mut frames = FrameReader::new(input);
        let mut responses = ResponseWriter::new(output);
        let mut summary = Summary {
            frames: 0,
            transcribed: 0,
            failed: 0,
            dropped: 0,
            stop_reason: StopReason::EndOfStream,
        };

        let res = self.serve(&mut frames, &mut responses, &mut summary);
        self.state.set(State::Stopped);
        res?;

        info!(
            frames = summary.frames,
            transcribed = summary.transcribed,
            failed = summary.failed,
            dropped = summary.dropped,
            reason = ?summary.stop_reason,
            "service stopped"
        );
        Ok(summary)
    }

    fn serve<R: Read, W: Write>(
        &self,
        frames: &mut FrameReader<R>,
        responses: &mut ResponseWriter<W>,
        summary: &mut Summary,
    ) -> Result<()> {
        loop {
            // Publish the state before checking the flag; `interrupt` does the reverse,
            // so at least one side always sees the other.
            self.state.set(State::WaitingLength);
            if self.shutdown.is_requested() {
                info!("service interrupted");
                summary.stop_reason = StopReason::Interrupted;
                return Ok(());
            }

            let length = match frames.read_length() {
                Ok(Some(length)) => length,
                Ok(None) => {
                    info!("no more input, exiting");
                    return Ok(());
                }
                Err(err) => {
                    error!(error = %err, "failed to read length prefix; treating as end of input");
                    return Ok(());
                }
            };
            summary.frames += 1;

            self.state.set(State::ReadingPayload);
            info!(bytes = length, "receiving audio");
            let payload = match frames.read_payload(length) {
                Ok(Frame::Complete(payload)) => payload,
                Ok(Frame::Truncated { expected, got }) => {
                    summary.dropped += 1;
                    warn!(expected, got, "incomplete audio data");
                    if self.transcriber.opts().report_truncated {
                        self.state.set(State::Emitting);
                        let result = TranscriptionResult::failure(format!(
                            "incomplete audio data: expected {expected} bytes, got {got}"
                        ));
                        responses.write_result(&result)?;
                        summary.failed += 1;
                    }
                    continue;
                }
                Err(err) => {
                    error!(error = %err, "failed to read audio payload; treating as end of input");
                    return Ok(());
                }
            };

            self.state.set(State::Transcribing);
            let result = self.transcriber.transcribe_bytes(&payload);
            drop(payload);

            self.state.set(State::Emitting);
            if result.is_success() {
                summary.transcribed += 1;
            } else {
                summary.failed += 1;
            }
            responses.write_result(&result)?;
        }
    }
}
