use crate::color;
use crate::config::GameConfig;

/// Everything the form page needs to render itself back: the submitted (or
/// default) field values as text, the validation error if any, and the
/// encoded GIF as base64. Field values stay strings so a rejected value is
/// echoed back exactly as the user typed it.
#[derive(Debug, Clone)]
pub struct FormState {
    pub board_width: String,
    pub board_height: String,
    pub gif_width: String,
    pub gif_height: String,
    pub delay: String,
    pub cell_size: String,
    pub gen_total: String,
    pub bk_color: String,
    pub fg_color: String,
    pub endless: bool,
    pub initial_state: Vec<String>,
    pub gif_data: String,
    pub error: String,
}

impl FormState {
    pub fn from_defaults(game: &GameConfig) -> Self {
        FormState {
            board_width: game.board_width.to_string(),
            board_height: game.board_height.to_string(),
            // The form defaults the frame to the board size and one pixel
            // per cell; the user scales up from there.
            gif_width: game.board_width.to_string(),
            gif_height: game.board_height.to_string(),
            delay: game.delay.to_string(),
            cell_size: "1".to_string(),
            gen_total: game.gen_total.to_string(),
            bk_color: game.bk_color.clone(),
            fg_color: game.fg_color.clone(),
            endless: game.endless,
            initial_state: Vec::new(),
            gif_data: String::new(),
            error: String::new(),
        }
    }
}

/// Render the full form page. Every interpolated value goes through
/// `escape`; submitted field contents are untrusted.
pub fn render(state: &FormState) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html>\n<head><title>life_gif</title></head>\n<body>\n");
    page.push_str("<h1>life_gif</h1>\n");
    page.push_str("<form method=\"post\" action=\"/life\">\n<table>\n");

    text_row(&mut page, "Initial state", "initial_state", &state.initial_state.join(" "));
    number_row(&mut page, "Board width", "board_width", &state.board_width);
    number_row(&mut page, "Board height", "board_height", &state.board_height);
    number_row(&mut page, "GIF width", "gif_width", &state.gif_width);
    number_row(&mut page, "GIF height", "gif_height", &state.gif_height);
    number_row(&mut page, "Delay (1/100 s)", "delay", &state.delay);
    number_row(&mut page, "Cell size in pixels", "cell_size", &state.cell_size);
    number_row(&mut page, "Generation total", "gen_total", &state.gen_total);
    color_row(&mut page, "Background color", "bk_color", &state.bk_color);
    color_row(&mut page, "Foreground color", "fg_color", &state.fg_color);

    let checked = if state.endless { " checked" } else { "" };
    page.push_str(&format!(
        "<tr><td><label><input type=\"checkbox\" name=\"endless\" value=\"1\"{checked}> \
         Endless animation</label></td>\
         <td><input type=\"submit\" value=\"Generate\"></td></tr>\n"
    ));
    page.push_str("</table>\n</form>\n");

    if !state.error.is_empty() {
        page.push_str(&format!(
            "<div style=\"background-color:red\"><b>ERROR: {}</b></div>\n",
            escape(&state.error)
        ));
    }
    if !state.gif_data.is_empty() {
        // gif_data is base64 we produced ourselves; it still goes through
        // escape for uniformity (base64 is escape-neutral anyway).
        page.push_str(&format!(
            "<div><img src=\"data:image/gif;base64,{}\" alt=\"animation\"/></div>\n",
            escape(&state.gif_data)
        ));
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn text_row(page: &mut String, label: &str, name: &str, value: &str) {
    input_row(page, label, name, "text", value);
}

fn number_row(page: &mut String, label: &str, name: &str, value: &str) {
    input_row(page, label, name, "number", value);
}

fn input_row(page: &mut String, label: &str, name: &str, kind: &str, value: &str) {
    page.push_str(&format!(
        "<tr><td><b>{label}</b>:</td>\
         <td><input type=\"{kind}\" name=\"{name}\" value=\"{}\"></td></tr>\n",
        escape(value)
    ));
}

fn color_row(page: &mut String, label: &str, name: &str, selected: &str) {
    page.push_str(&format!(
        "<tr><td><b>{label}</b>:</td><td><select name=\"{name}\">\n{}</select></td></tr>\n",
        color_options(selected)
    ));
}

/// One `<option>` per named color plus "random", sorted, with the current
/// selection marked.
fn color_options(selected: &str) -> String {
    let mut names: Vec<&str> = color::NAMED.iter().map(|(n, _)| *n).collect();
    names.push("random");
    names.sort_unstable();
    let mut options = String::new();
    for name in names {
        let marker = if name == selected { " selected" } else { "" };
        options.push_str(&format!("<option value=\"{name}\"{marker}>{name}</option>\n"));
    }
    options
}

/// Minimal HTML attribute/text escaping for untrusted field values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
