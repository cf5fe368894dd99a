// Load driver for the speechload pressure tester.
//
// This crate provides the HTTP call wrapper for the speech-synthesis
// endpoint, the audio persistence sink, and the batch runner with the
// failure-stopping control loop.

mod client;
mod runner;
mod sink;

pub use client::{ClientError, SpeechClient, SpeechResponse, SPEECH_PATH};
pub use runner::{run, RunConfig};
pub use sink::{AudioSink, DEFAULT_OUTPUT_DIR};
