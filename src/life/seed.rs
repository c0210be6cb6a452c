use super::Board;

/// Parse one `--X,Y.` coordinate token. `None` for anything malformed:
/// wrong sigils, missing comma, non-numeric or negative coordinates.
pub fn parse_token(token: &str) -> Option<(usize, usize)> {
    let inner = token.strip_prefix("--")?.strip_suffix('.')?;
    let (x, y) = inner.split_once(',')?;
    Some((x.parse().ok()?, y.parse().ok()?))
}

/// Seed the "big bang" generation from an ordered list of coordinate
/// tokens. Seeding is best effort: malformed tokens and coordinates outside
/// the board are dropped without error, so partially bad input still
/// produces a run instead of aborting it.
pub fn apply<S: AsRef<str>>(board: &mut Board, tokens: &[S]) {
    for token in tokens {
        if let Some((x, y)) = parse_token(token.as_ref()) {
            if x < board.width() && y < board.height() {
                board.set_alive(x, y);
            }
        }
    }
}
