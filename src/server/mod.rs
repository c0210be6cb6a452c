mod page;

use std::io::Read;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use crossbeam_channel::bounded;
use tiny_http::{Header, Method, Request, Response, Server};

use crate::color;
use crate::config::Config;
use crate::life::seed;
use crate::pipeline::{
    self, parse_board_height, parse_board_width, parse_cell_size, parse_delay, parse_generations,
    parse_gif_height, parse_gif_width, Limits, ParamError, RenderRequest,
};
use page::FormState;

/// Run the form server until SIGINT/SIGTERM.
///
/// Requests are served sequentially on this thread; the accept loop polls
/// the shutdown channel between requests, so a signal takes effect after
/// the in-flight request finishes rather than cancelling it mid-pipeline.
pub fn run(config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let server = Server::http(&addr).map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    log::info!("life_gif {} listening on http://{addr}/life", crate::cli::VERSION);

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .context("failed to install the shutdown handler")?;

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }
        match server.recv_timeout(Duration::from_millis(250)) {
            Ok(Some(request)) => handle(request, config),
            Ok(None) => {}
            Err(e) => log::warn!("accept failed: {e}"),
        }
    }
    log::info!("life_gif server stopped");
    Ok(())
}

fn handle(mut request: Request, config: &Config) {
    let method = request.method().clone();
    let url = request.url().to_string();
    log::debug!("{method} {url}");

    let response = match (&method, url.as_str()) {
        (Method::Get, "/life") => html(page::render(&FormState::from_defaults(&config.game))),
        (Method::Post, "/life") => {
            let mut body = String::new();
            match request.as_reader().read_to_string(&mut body) {
                Ok(_) => html(page::render(&process(&body, config))),
                Err(e) => {
                    log::warn!("failed to read request body: {e}");
                    Response::from_string("bad request").with_status_code(400)
                }
            }
        }
        _ => Response::from_string("not found").with_status_code(404),
    };

    if let Err(e) = request.respond(response) {
        // A dropped connection only loses this one response.
        log::warn!("failed to answer {method} {url}: {e}");
    }
}

fn html(body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
        .expect("static header");
    Response::from_string(body).with_header(content_type)
}

/// Fill form state from the submitted body, validate, and, if everything
/// checks out, run the pipeline and embed the result. Validation failures
/// re-render the form with the offending values still in place.
fn process(body: &str, config: &Config) -> FormState {
    let mut state = FormState::from_defaults(&config.game);
    for (key, value) in form_urlencoded::parse(body.as_bytes()) {
        match key.as_ref() {
            "board_width" => state.board_width = value.into_owned(),
            "board_height" => state.board_height = value.into_owned(),
            "gif_width" => state.gif_width = value.into_owned(),
            "gif_height" => state.gif_height = value.into_owned(),
            "delay" => state.delay = value.into_owned(),
            "cell_size" => state.cell_size = value.into_owned(),
            "gen_total" => state.gen_total = value.into_owned(),
            "bk_color" => state.bk_color = value.into_owned(),
            "fg_color" => state.fg_color = value.into_owned(),
            "endless" => state.endless = value == "1",
            "initial_state" => state.initial_state = filter_tokens(&value),
            _ => {}
        }
    }

    let request = match build_request(&state, &config.limits()) {
        Ok(request) => request,
        Err(e) => {
            state.error = e.to_string();
            return state;
        }
    };

    // Each request gets its own private board and animation; nothing about
    // a run is shared or reused.
    let mut bytes = Vec::new();
    match pipeline::run(&request, &mut bytes) {
        Ok(()) => state.gif_data = BASE64.encode(&bytes),
        Err(e) => {
            log::error!("pipeline failed: {e:#}");
            state.error = "internal error while encoding the animation".to_string();
        }
    }
    state
}

fn build_request(state: &FormState, limits: &Limits) -> Result<RenderRequest, ParamError> {
    Ok(RenderRequest {
        board_width: parse_board_width(&state.board_width, limits)?,
        board_height: parse_board_height(&state.board_height, limits)?,
        gif_width: parse_gif_width(&state.gif_width)?,
        gif_height: parse_gif_height(&state.gif_height)?,
        delay: parse_delay(&state.delay)?,
        cell_size: parse_cell_size(&state.cell_size)?,
        generations: parse_generations(&state.gen_total)?,
        bk_color: color::resolve(&state.bk_color),
        fg_color: color::resolve(&state.fg_color),
        endless: state.endless,
        seed: state.initial_state.clone(),
    })
}

/// Keep only the whitespace-separated entries that parse as coordinate
/// tokens, the same filter the seed loader applies.
fn filter_tokens(field: &str) -> Vec<String> {
    field
        .split_whitespace()
        .filter(|t| seed::parse_token(t).is_some())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    // ── form decoding ───────────────────────────────────────────────────

    #[test]
    fn submitted_fields_override_defaults() {
        let body = "board_width=12&board_height=8&gif_width=24&gif_height=16&delay=3\
                    &cell_size=2&gen_total=4&bk_color=blue&fg_color=yellow&endless=1\
                    &initial_state=--1%2C1.+--2%2C2.";
        let state = process(body, &config());
        assert!(state.error.is_empty(), "unexpected error: {}", state.error);
        assert_eq!(state.board_width, "12");
        assert_eq!(state.bk_color, "blue");
        assert!(state.endless);
        assert_eq!(state.initial_state, vec!["--1,1.", "--2,2."]);
        assert!(!state.gif_data.is_empty());
    }

    #[test]
    fn missing_fields_keep_defaults() {
        let state = process("board_width=12", &config());
        assert_eq!(state.board_height, "200");
        assert_eq!(state.gen_total, "10");
        assert!(!state.endless);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let state = process("bogus=1&board_width=12", &config());
        assert_eq!(state.board_width, "12");
    }

    // ── validation ──────────────────────────────────────────────────────

    #[test]
    fn invalid_field_reports_error_and_echoes_input() {
        let state = process("board_width=over9000", &config());
        assert_eq!(
            state.error,
            "board width must be a positive integer between 1 and 500"
        );
        assert_eq!(state.board_width, "over9000");
        assert!(state.gif_data.is_empty());
    }

    #[test]
    fn oversized_board_is_rejected() {
        let state = process("board_width=501", &config());
        assert!(state.error.contains("between 1 and 500"));
    }

    // ── pipeline integration ────────────────────────────────────────────

    #[test]
    fn valid_post_produces_base64_gif() {
        let body = "board_width=3&board_height=3&gif_width=3&gif_height=3\
                    &delay=1&cell_size=1&gen_total=1&initial_state=--1%2C1.";
        let state = process(body, &config());
        assert!(state.error.is_empty());
        let bytes = BASE64.decode(state.gif_data.as_bytes()).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
    }

    // ── token filtering ─────────────────────────────────────────────────

    #[test]
    fn filter_tokens_drops_garbage() {
        assert_eq!(
            filter_tokens("--1,1. junk --2,2. --x,y."),
            vec!["--1,1.", "--2,2."]
        );
        assert!(filter_tokens("").is_empty());
    }
}
