use std::io::Write;

use anyhow::Result;
use thiserror::Error;

use crate::color::Rgb;
use crate::life::{seed, Board};
use crate::render::{Animation, Frame};

/// Upper bounds on board dimensions, threaded into validation explicitly so
/// the pipeline never reads process-wide mutable state. Multiple server
/// requests can validate against the same `Limits` concurrently.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_board_width: usize,
    pub max_board_height: usize,
}

/// A parameter a request can fail validation on. The `Display` text is the
/// user-facing message shown by both the CLI and the HTML form.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    #[error("board width must be a positive integer between 1 and {0}")]
    BoardWidth(usize),
    #[error("board height must be a positive integer between 1 and {0}")]
    BoardHeight(usize),
    #[error("GIF width must be a positive integer up to {}", u16::MAX)]
    GifWidth,
    #[error("GIF height must be a positive integer up to {}", u16::MAX)]
    GifHeight,
    #[error("delay must be a positive integer up to {}", u16::MAX)]
    Delay,
    #[error("cell size in pixels must be a positive integer less than 200")]
    CellSize,
    #[error("generation total must be a positive integer")]
    GenTotal,
}

/// One fully validated pipeline invocation. Construct through the `check_*`
/// / `parse_*` validators; the core pipeline assumes every field here is
/// already in range and does not re-validate.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub board_width: usize,
    pub board_height: usize,
    pub gif_width: u16,
    pub gif_height: u16,
    /// Per-frame delay in hundredths of a second (GIF native units).
    pub delay: u16,
    pub cell_size: usize,
    pub generations: u32,
    pub bk_color: Rgb,
    pub fg_color: Rgb,
    pub endless: bool,
    /// Raw `--X,Y.` seed tokens; bad ones are dropped during seeding.
    pub seed: Vec<String>,
}

/// Run the full simulate-and-encode pipeline: seed a fresh board, then
/// alternate render and step for `generations` iterations, then encode.
///
/// Rendering happens before stepping, so frame 0 is always the seed
/// generation itself and the board is stepped `generations - 1` times;
/// there is no trailing step after the last frame.
pub fn run<W: Write>(request: &RenderRequest, sink: W) -> Result<()> {
    let mut board = Board::new(request.board_width, request.board_height);
    seed::apply(&mut board, &request.seed);

    let mut animation = Animation::new(request.endless);
    let palette = [request.bk_color, request.fg_color];
    for generation in 0..request.generations {
        let frame = Frame::render(
            &board,
            request.gif_width,
            request.gif_height,
            request.cell_size,
            palette,
        );
        animation.push(frame, request.delay);
        if generation + 1 < request.generations {
            board.step();
        }
    }
    animation.encode(sink)
}

// Typed range checks, one per numeric field. The CLI funnels clap-parsed
// values through these; the HTML form goes through the `parse_*` wrappers
// below. Everything downstream of a passing check is trusted.

pub fn check_board_width(n: u64, limits: &Limits) -> Result<usize, ParamError> {
    if n >= 1 && n <= limits.max_board_width as u64 {
        Ok(n as usize)
    } else {
        Err(ParamError::BoardWidth(limits.max_board_width))
    }
}

pub fn check_board_height(n: u64, limits: &Limits) -> Result<usize, ParamError> {
    if n >= 1 && n <= limits.max_board_height as u64 {
        Ok(n as usize)
    } else {
        Err(ParamError::BoardHeight(limits.max_board_height))
    }
}

pub fn check_gif_width(n: u64) -> Result<u16, ParamError> {
    u16::try_from(n).ok().filter(|&n| n > 0).ok_or(ParamError::GifWidth)
}

pub fn check_gif_height(n: u64) -> Result<u16, ParamError> {
    u16::try_from(n).ok().filter(|&n| n > 0).ok_or(ParamError::GifHeight)
}

pub fn check_delay(n: u64) -> Result<u16, ParamError> {
    u16::try_from(n).ok().filter(|&n| n > 0).ok_or(ParamError::Delay)
}

pub fn check_cell_size(n: u64) -> Result<usize, ParamError> {
    if (1..200).contains(&n) {
        Ok(n as usize)
    } else {
        Err(ParamError::CellSize)
    }
}

pub fn check_generations(n: u64) -> Result<u32, ParamError> {
    u32::try_from(n).ok().filter(|&n| n > 0).ok_or(ParamError::GenTotal)
}

// String-input wrappers for the form fields: parse failure maps to the same
// error as an out-of-range value.

fn parse_u64(text: &str) -> Option<u64> {
    text.trim().parse().ok()
}

pub fn parse_board_width(text: &str, limits: &Limits) -> Result<usize, ParamError> {
    let n = parse_u64(text).ok_or(ParamError::BoardWidth(limits.max_board_width))?;
    check_board_width(n, limits)
}

pub fn parse_board_height(text: &str, limits: &Limits) -> Result<usize, ParamError> {
    let n = parse_u64(text).ok_or(ParamError::BoardHeight(limits.max_board_height))?;
    check_board_height(n, limits)
}

pub fn parse_gif_width(text: &str) -> Result<u16, ParamError> {
    check_gif_width(parse_u64(text).ok_or(ParamError::GifWidth)?)
}

pub fn parse_gif_height(text: &str) -> Result<u16, ParamError> {
    check_gif_height(parse_u64(text).ok_or(ParamError::GifHeight)?)
}

pub fn parse_delay(text: &str) -> Result<u16, ParamError> {
    check_delay(parse_u64(text).ok_or(ParamError::Delay)?)
}

pub fn parse_cell_size(text: &str) -> Result<usize, ParamError> {
    check_cell_size(parse_u64(text).ok_or(ParamError::CellSize)?)
}

pub fn parse_generations(text: &str) -> Result<u32, ParamError> {
    check_generations(parse_u64(text).ok_or(ParamError::GenTotal)?)
}
