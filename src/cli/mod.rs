use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::color;
use crate::config::Config;
use crate::pipeline::{
    check_board_height, check_board_width, check_cell_size, check_delay, check_generations,
    check_gif_height, check_gif_width, ParamError, RenderRequest,
};

/// Crate version plus the build counter injected by build.rs.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " build ", env!("BUILD_NUMBER"));

#[derive(Debug, Parser)]
#[command(
    name = "life_gif",
    version = VERSION,
    about = "Conway's Game of Life, rendered as an animated GIF"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render an animated GIF to a file or stdout
    Gif(GifArgs),
    /// Serve an HTML form that renders GIFs on demand
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct GifArgs {
    /// Board width in cells [default: from config]
    #[arg(long)]
    pub board_width: Option<u64>,

    /// Board height in cells [default: from config]
    #[arg(long)]
    pub board_height: Option<u64>,

    /// Output width in pixels [default: board width]
    #[arg(long)]
    pub gif_width: Option<u64>,

    /// Output height in pixels [default: board height]
    #[arg(long)]
    pub gif_height: Option<u64>,

    /// Per-frame delay in hundredths of a second [default: from config]
    #[arg(long)]
    pub delay: Option<u64>,

    /// Side of one live cell's square in pixels [default: gif width / 8]
    #[arg(long = "cell-size-in-px")]
    pub cell_size_in_px: Option<u64>,

    /// Number of generations to render [default: from config]
    #[arg(long)]
    pub gen_total: Option<u64>,

    /// Background color name, or "random" [default: from config]
    #[arg(long)]
    pub bk_color: Option<String>,

    /// Foreground color name, or "random" [default: from config]
    #[arg(long)]
    pub fg_color: Option<String>,

    /// Loop the animation forever instead of playing it once
    #[arg(long)]
    pub endless: bool,

    /// Output file; stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Initial live cells as `--X,Y.` tokens; unparseable or out-of-range
    /// tokens are ignored. Must come after every option.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub cells: Vec<String>,
}

impl GifArgs {
    /// Merge explicit options over config defaults into one validated
    /// request. Unset GIF dimensions track the board dimensions, and an
    /// unset cell size defaults to an eighth of the GIF width, so the
    /// default board fills the default frame 8 cells per row.
    pub fn to_request(&self, config: &Config) -> Result<RenderRequest, ParamError> {
        let limits = config.limits();
        let game = &config.game;

        let board_width =
            check_board_width(self.board_width.unwrap_or(game.board_width as u64), &limits)?;
        let board_height =
            check_board_height(self.board_height.unwrap_or(game.board_height as u64), &limits)?;
        let gif_width = check_gif_width(self.gif_width.unwrap_or(board_width as u64))?;
        let gif_height = check_gif_height(self.gif_height.unwrap_or(board_height as u64))?;
        let delay = check_delay(self.delay.unwrap_or(game.delay as u64))?;
        let cell_size =
            check_cell_size(self.cell_size_in_px.unwrap_or(u64::from(gif_width) >> 3))?;
        let generations = check_generations(self.gen_total.unwrap_or(game.gen_total as u64))?;

        Ok(RenderRequest {
            board_width,
            board_height,
            gif_width,
            gif_height,
            delay,
            cell_size,
            generations,
            bk_color: color::resolve(self.bk_color.as_deref().unwrap_or(&game.bk_color)),
            fg_color: color::resolve(self.fg_color.as_deref().unwrap_or(&game.fg_color)),
            endless: self.endless || game.endless,
            seed: self.cells.clone(),
        })
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address [default: from config]
    #[arg(long)]
    pub addr: Option<String>,

    /// Bind port [default: from config]
    #[arg(long)]
    pub port: Option<u16>,

    /// Reject requests for boards wider than this [default: from config]
    #[arg(long)]
    pub max_board_width: Option<usize>,

    /// Reject requests for boards taller than this [default: from config]
    #[arg(long)]
    pub max_board_height: Option<usize>,
}

impl ServeArgs {
    /// Fold CLI overrides into the loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(w) = self.max_board_width {
            config.server.max_board_width = w;
        }
        if let Some(h) = self.max_board_height {
            config.server.max_board_height = h;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    // ── argument parsing ────────────────────────────────────────────────

    #[test]
    fn gif_options_and_cell_tokens_parse() {
        let cli = parse(&[
            "life_gif", "gif", "--board-width", "30", "--gen-total", "5", "--endless",
            "--1,1.", "--2,2.",
        ]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        assert_eq!(args.board_width, Some(30));
        assert_eq!(args.gen_total, Some(5));
        assert!(args.endless);
        assert_eq!(args.cells, vec!["--1,1.", "--2,2."]);
    }

    #[test]
    fn serve_overrides_config() {
        let cli = parse(&["life_gif", "serve", "--port", "9999", "--max-board-width", "64"]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve subcommand");
        };
        let config = args.apply(Config::default());
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.max_board_width, 64);
        assert_eq!(config.server.addr, "localhost");
    }

    // ── request building ────────────────────────────────────────────────

    #[test]
    fn defaults_come_from_config() {
        let cli = parse(&["life_gif", "gif"]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        let request = args.to_request(&Config::default()).unwrap();
        assert_eq!(request.board_width, 200);
        assert_eq!(request.gif_width, 200); // tracks board width
        assert_eq!(request.cell_size, 25); // gif width / 8
        assert_eq!(request.delay, 50);
        assert_eq!(request.generations, 10);
        assert_eq!(request.bk_color, Rgb::new(0xFF, 0xFF, 0xFF));
        assert_eq!(request.fg_color, Rgb::new(0x00, 0x00, 0x00));
        assert!(!request.endless);
    }

    #[test]
    fn explicit_options_win_over_config() {
        let cli = parse(&[
            "life_gif", "gif", "--board-width", "10", "--gif-width", "40",
            "--cell-size-in-px", "4", "--fg-color", "red",
        ]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        let request = args.to_request(&Config::default()).unwrap();
        assert_eq!(request.board_width, 10);
        assert_eq!(request.board_height, 200);
        assert_eq!(request.gif_width, 40);
        assert_eq!(request.cell_size, 4);
        assert_eq!(request.fg_color, Rgb::new(0xFF, 0x00, 0x00));
    }

    #[test]
    fn oversized_board_is_rejected() {
        let cli = parse(&["life_gif", "gif", "--board-width", "100000"]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        let err = args.to_request(&Config::default()).unwrap_err();
        assert_eq!(err, ParamError::BoardWidth(500));
    }

    #[test]
    fn tiny_gif_width_needs_an_explicit_cell_size() {
        // Derived default cell size is gif_width / 8 == 0 here, which the
        // validator rejects rather than silently rendering nothing.
        let cli = parse(&["life_gif", "gif", "--board-width", "4", "--gif-width", "4"]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        assert_eq!(
            args.to_request(&Config::default()).unwrap_err(),
            ParamError::CellSize
        );
    }
}
