use std::borrow::Cow;
use std::io::Write;

use anyhow::Result;
use gif::{Encoder, Repeat};

use super::Frame;

/// An ordered sequence of frames, each with its own delay (hundredths of a
/// second, GIF native units), plus one animation-wide loop policy. Built
/// incrementally, one frame per generation, then serialized in a single
/// shot; there is no streaming encode because the frame count is always
/// known up front.
#[derive(Debug)]
pub struct Animation {
    frames: Vec<(Frame, u16)>,
    endless: bool,
}

impl Animation {
    pub fn new(endless: bool) -> Self {
        Animation {
            frames: Vec::new(),
            endless,
        }
    }

    /// Append a frame. Insertion order is animation-temporal order: frame i
    /// is generation i.
    pub fn push(&mut self, frame: Frame, delay: u16) {
        self.frames.push((frame, delay));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Serialize the whole sequence as a GIF89a stream. Called once, after
    /// every frame is appended. Write failures propagate; there is no
    /// partial recovery; the stream is all-or-nothing.
    ///
    /// The screen descriptor takes the first frame's dimensions and each
    /// frame carries its own two-entry local palette.
    pub fn encode<W: Write>(&self, sink: W) -> Result<()> {
        let Some((first, _)) = self.frames.first() else {
            return Ok(());
        };
        let mut encoder = Encoder::new(sink, first.width(), first.height(), &[])?;
        encoder.set_repeat(if self.endless {
            Repeat::Infinite
        } else {
            Repeat::Finite(1)
        })?;
        for (frame, delay) in &self.frames {
            let palette = frame.palette();
            let mut out = gif::Frame {
                width: frame.width(),
                height: frame.height(),
                buffer: Cow::Borrowed(frame.pixels()),
                delay: *delay,
                ..gif::Frame::default()
            };
            out.palette = Some(vec![
                palette[0].r, palette[0].g, palette[0].b,
                palette[1].r, palette[1].g, palette[1].b,
            ]);
            encoder.write_frame(&out)?;
        }
        Ok(())
    }
}
