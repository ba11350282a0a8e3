//! Terminal detection: whether to color output, and how wide to lay it out.

use std::env;

/// Environment variable that overrides color detection: `always`, `never` or `auto`.
pub const COLOR_ENV: &str = "FORMWORK_COLOR";

/// Narrowest and widest layouts used for rules and labels.
const MIN_LAYOUT_WIDTH: usize = 20;
const MAX_LAYOUT_WIDTH: usize = 60;

/// Whether output should be colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Always,
    Never,
    /// Color only when stdout is a terminal.
    Auto,
}

impl ColorChoice {
    /// Resolves the choice from environment values.
    ///
    /// `FORMWORK_COLOR` wins; then `NO_COLOR` (any value) and `TERM=dumb`
    /// disable color.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(COLOR_ENV).as_deref().map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("always") => return Self::Always,
            Some(v) if v.eq_ignore_ascii_case("never") => return Self::Never,
            _ => {}
        }
        if lookup("NO_COLOR").is_some() || lookup("TERM").as_deref() == Some("dumb") {
            return Self::Never;
        }
        Self::Auto
    }

    /// Resolves the choice from the process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }
}

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns `true` if ANSI colors should be written to stdout.
pub fn supports_color() -> bool {
    match ColorChoice::from_env() {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_tty(),
    }
}

/// Terminal width in columns, or 80 when it cannot be detected.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| usize::from(cols))
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

/// Width for separators and field labels, kept within a readable range.
pub fn layout_width() -> usize {
    clamp_layout_width(terminal_width())
}

fn clamp_layout_width(cols: usize) -> usize {
    cols.clamp(MIN_LAYOUT_WIDTH, MAX_LAYOUT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn color_override_wins() {
        let choice = ColorChoice::from_env_with(env_of(&[
            ("FORMWORK_COLOR", "Always"),
            ("NO_COLOR", "1"),
        ]));
        assert_eq!(choice, ColorChoice::Always);
        let choice = ColorChoice::from_env_with(env_of(&[("FORMWORK_COLOR", "never")]));
        assert_eq!(choice, ColorChoice::Never);
    }

    #[test]
    fn no_color_and_dumb_terminals_disable_color() {
        assert_eq!(
            ColorChoice::from_env_with(env_of(&[("NO_COLOR", "")])),
            ColorChoice::Never
        );
        assert_eq!(
            ColorChoice::from_env_with(env_of(&[("TERM", "dumb")])),
            ColorChoice::Never
        );
        let choice =
            ColorChoice::from_env_with(env_of(&[("FORMWORK_COLOR", "auto"), ("TERM", "xterm")]));
        assert_eq!(choice, ColorChoice::Auto);
    }

    #[test]
    fn layout_width_is_clamped() {
        assert_eq!(clamp_layout_width(5), 20);
        assert_eq!(clamp_layout_width(45), 45);
        assert_eq!(clamp_layout_width(200), 60);
        assert!(layout_width() >= 20);
    }
}
