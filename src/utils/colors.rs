/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Paint an "#RRGGBB" swatch using a 24-bit ANSI background.
/// Falls back to the plain text when the color is not parseable.
pub fn swatch(hex: &str) -> String {
    let h = hex.trim().trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return hex.to_string();
    }
    let parse = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    match (parse(0), parse(2), parse(4)) {
        (Some(r), Some(g), Some(b)) => format!("\x1b[48;2;{r};{g};{b}m  {RESET} {hex}"),
        _ => hex.to_string(),
    }
}
