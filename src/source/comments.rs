//! Comment events
//!
//! Every comment the classifier recognizes is handed, in line order, to at most one
//! [`CommentSink`] registered on the unit. The unit keeps no history of what it sent.

use std::path::PathBuf;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// A recognized comment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    /// The original line, including the comment text.
    pub line: String,
    pub filename: PathBuf,
    /// Zero-based line number.
    pub line_number: usize,
}

/// Consumer of comment events. Implementations must not block.
pub trait CommentSink: Send {
    fn process_comment(&mut self, event: CommentEvent);
}

impl<F> CommentSink for F
where
    F: FnMut(CommentEvent) + Send,
{
    fn process_comment(&mut self, event: CommentEvent) {
        self(event)
    }
}

/// Sink forwarding events over an unbounded tokio channel.
///
/// Sending never blocks; events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<CommentEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<CommentEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl CommentSink for ChannelSink {
    fn process_comment(&mut self, event: CommentEvent) {
        let _ = self.sender.send(event);
    }
}
