//! Pure transition function of a recording session.
//!
//! The recorder page feeds every user command and every asynchronous
//! completion into [`transition`] and executes the returned effects in order.
//! Nothing here touches a platform handle.

use crate::session::{Checkpoint, Status, StreamFault, StreamHealth};

/// Phase of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture resources held.
    Idle,
    /// Waiting for the user to grant a capture stream.
    Requesting {
        /// Countdown length to run once the stream arrives.
        delay: u32,
        /// A stop arrived while the request was in flight.
        cancel_requested: bool,
    },
    /// Counting down before the encoder starts.
    Countdown {
        /// Seconds left, from `delay` down to 1.
        remaining: u32,
    },
    /// Encoder running.
    Recording,
    /// Encoder stop requested, waiting for its final data.
    Finalizing,
}

impl SessionState {
    /// Short lowercase name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Requesting { .. } => "requesting",
            SessionState::Countdown { .. } => "countdown",
            SessionState::Recording => "recording",
            SessionState::Finalizing => "finalizing",
        }
    }

    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// User asked to record.
    Start {
        /// Countdown length in seconds.
        delay: u32,
    },
    /// User asked to stop.
    Stop,
    /// The capture stream arrived and was validated.
    StreamAcquired(StreamHealth),
    /// The user refused capture.
    StreamDenied,
    /// Acquiring the stream failed for another reason.
    StreamFailed(String),
    /// One countdown second passed; the stream was validated again.
    CountdownElapsed(StreamHealth),
    /// A capture track ended on its own.
    TrackEnded,
    /// The encoder reported that it started.
    EncoderStarted,
    /// The encoder delivered a chunk.
    EncoderData(Vec<u8>),
    /// The encoder finished.
    EncoderStopped,
    /// The encoder failed.
    EncoderFailed(String),
}

/// Side effects requested by a transition, executed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Drop leftovers of the previous session and lock the controls.
    PrepareStart,
    /// Ask the capture source for a stream.
    RequestStream,
    /// Show the live preview and hide the player.
    ShowLive,
    /// Show the countdown status.
    ShowCountdown(u32),
    /// Post a countdown tick one second from now.
    ScheduleTick,
    /// Create and start the encoder.
    StartEncoder,
    /// Start the elapsed-time display.
    StartTimer,
    /// Keep an encoded chunk.
    AppendChunk(Vec<u8>),
    /// Freeze the elapsed-time display.
    StopTimer,
    /// Replace the status line.
    Status(Status),
    /// Ask the encoder for buffered data. Failures are ignored.
    FlushEncoder,
    /// Ask the encoder to stop. Failures are ignored.
    StopEncoder,
    /// Stop every capture track.
    StopTracks,
    /// Build, persist and show the recording.
    Finalize,
    /// Release everything and show `status`.
    Cleanup {
        /// Status shown after cleanup.
        status: Status,
    },
    /// Release everything, ask for a fresh window, close this one.
    RequestReopen,
}

/// Outcome of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the input.
    pub next: SessionState,
    /// Effects to run, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: SessionState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(next: SessionState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }

    fn with(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }

    fn abort(status: Status) -> Self {
        Self::to(SessionState::Idle, vec![Effect::Cleanup { status }])
    }
}

fn finalizing_effects() -> Vec<Effect> {
    vec![
        Effect::Status(Status::ready("Processing...")),
        Effect::StopTimer,
        Effect::FlushEncoder,
        Effect::StopEncoder,
        Effect::StopTracks,
    ]
}

fn fault_status(checkpoint: Checkpoint, fault: StreamFault) -> Status {
    Status::ready(fault.status_text(checkpoint))
}

/// Compute the next state and effects for `input`.
///
/// Inputs that make no sense in the current state are ignored.
pub fn transition(state: &SessionState, input: Input) -> Transition {
    let state = *state;

    match (state, input) {
        (SessionState::Idle, Input::Start { delay }) => Transition::to(
            SessionState::Requesting {
                delay,
                cancel_requested: false,
            },
            vec![Effect::PrepareStart, Effect::RequestStream],
        ),

        (SessionState::Requesting { delay, .. }, Input::Stop) => Transition::stay(
            SessionState::Requesting {
                delay,
                cancel_requested: true,
            },
        ),
        (
            SessionState::Requesting {
                cancel_requested: true,
                ..
            },
            Input::StreamAcquired(_),
        ) => Transition::abort(Status::ready("Recording cancelled")),
        (SessionState::Requesting { .. }, Input::StreamAcquired(StreamHealth::Faulted(fault))) => {
            Transition::abort(fault_status(Checkpoint::AfterAcquire, fault))
        }
        (SessionState::Requesting { delay, .. }, Input::StreamAcquired(StreamHealth::Healthy)) => {
            if delay > 0 {
                Transition::to(
                    SessionState::Countdown { remaining: delay },
                    vec![
                        Effect::ShowLive,
                        Effect::ShowCountdown(delay),
                        Effect::ScheduleTick,
                    ],
                )
            } else {
                Transition::to(
                    SessionState::Recording,
                    vec![Effect::ShowLive, Effect::StartEncoder],
                )
            }
        }
        (SessionState::Requesting { .. }, Input::StreamDenied) => {
            Transition::to(SessionState::Idle, vec![Effect::RequestReopen])
        }
        (SessionState::Requesting { .. }, Input::StreamFailed(_)) => {
            Transition::abort(Status::ready("Failed to start recording"))
        }

        (SessionState::Countdown { .. }, Input::Stop) => {
            Transition::abort(Status::ready("Countdown cancelled"))
        }
        (SessionState::Countdown { .. }, Input::TrackEnded) => {
            Transition::abort(Status::ready("Stream ended by user"))
        }
        (SessionState::Countdown { remaining }, Input::CountdownElapsed(health)) => {
            let checkpoint = if remaining > 1 {
                Checkpoint::Countdown
            } else {
                Checkpoint::BeforeStart
            };

            match health {
                StreamHealth::Faulted(fault) => Transition::abort(fault_status(checkpoint, fault)),
                StreamHealth::Healthy if remaining > 1 => Transition::to(
                    SessionState::Countdown {
                        remaining: remaining - 1,
                    },
                    vec![Effect::ShowCountdown(remaining - 1), Effect::ScheduleTick],
                ),
                StreamHealth::Healthy => {
                    Transition::to(SessionState::Recording, vec![Effect::StartEncoder])
                }
            }
        }

        (SessionState::Recording, Input::EncoderStarted) => Transition::stay(state).with(vec![
            Effect::StartTimer,
            Effect::Status(Status::recording("Recording...")),
        ]),
        (SessionState::Recording | SessionState::Finalizing, Input::EncoderData(chunk)) => {
            if chunk.is_empty() {
                Transition::stay(state)
            } else {
                Transition::stay(state).with(vec![Effect::AppendChunk(chunk)])
            }
        }
        (SessionState::Recording, Input::Stop | Input::TrackEnded) => {
            Transition::to(SessionState::Finalizing, finalizing_effects())
        }
        (SessionState::Recording, Input::EncoderFailed(_)) => {
            let mut effects = finalizing_effects();
            effects.push(Effect::Status(Status::ready("Recording failed")));
            Transition::to(SessionState::Finalizing, effects)
        }
        (SessionState::Recording, Input::EncoderStopped) => Transition::to(
            SessionState::Idle,
            vec![Effect::StopTimer, Effect::StopTracks, Effect::Finalize],
        ),

        (SessionState::Finalizing, Input::EncoderStopped) => {
            Transition::to(SessionState::Idle, vec![Effect::Finalize])
        }
        // The encoder stop is overdue; keep what arrived so far.
        (SessionState::Finalizing, Input::Stop) => Transition::to(
            SessionState::Idle,
            vec![Effect::StopTracks, Effect::Finalize],
        ),
        (SessionState::Finalizing, Input::EncoderFailed(_)) => {
            Transition::abort(Status::ready("Recording failed"))
        }

        _ => Transition::stay(state),
    }
}
