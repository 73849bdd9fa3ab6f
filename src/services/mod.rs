pub mod score_stream;

pub use score_stream::{
    ScoreStream, ScoreStreamer, SnapshotSink, StreamCanceller, StreamHandle, StreamOutcome,
};
