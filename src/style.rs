use colored::{ColoredString, Colorize};

use crate::filter::Transform;

pub use colored::Color;

/// Terminal styling for one severity level.
///
/// Builds a [`Transform`] that wraps each line in the matching ANSI escape
/// codes. Whether escapes are actually emitted follows `colored`'s global
/// rules (tty detection, `NO_COLOR`, `colored::control` overrides).
#[derive(Debug, Clone, Copy, Default)]
pub struct LineStyle {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl LineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// The line is styled as a whole, trailing newline included; an empty
    /// style leaves the bytes untouched.
    pub fn into_transform(self) -> Transform {
        Box::new(move |line: &[u8]| {
            let text = String::from_utf8_lossy(line);
            let mut styled: ColoredString = text.normal();
            if let Some(color) = self.fg {
                styled = styled.color(color);
            }
            if let Some(color) = self.bg {
                styled = styled.on_color(color);
            }
            if self.bold {
                styled = styled.bold();
            }
            styled.to_string().into_bytes()
        })
    }
}

/// Shorthand for the common foreground-only case.
pub fn color(fg: Color) -> Transform {
    LineStyle::new().fg(fg).into_transform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The colored override is process-global; serialize the tests that
    // toggle it.
    static OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn empty_style_is_identity() {
        let _guard = OVERRIDE_LOCK.lock().expect("override lock");
        colored::control::set_override(true);
        let transform = LineStyle::new().into_transform();
        assert_eq!(transform(b"[WARN] plain\n"), b"[WARN] plain\n");
        colored::control::unset_override();
    }

    #[test]
    fn foreground_color_wraps_the_line() {
        let _guard = OVERRIDE_LOCK.lock().expect("override lock");
        colored::control::set_override(true);
        let transform = color(Color::Yellow);
        let out = String::from_utf8(transform(b"[WARN] foo\n")).expect("styled output is utf-8");
        assert!(out.starts_with("\x1b[33m"));
        assert!(out.contains("[WARN] foo"));
        assert!(out.ends_with("\x1b[0m"));
        colored::control::unset_override();
    }

    #[test]
    fn background_and_bold_change_the_escape_sequence() {
        let _guard = OVERRIDE_LOCK.lock().expect("override lock");
        colored::control::set_override(true);
        let bold = LineStyle::new()
            .fg(Color::Red)
            .bg(Color::Black)
            .bold()
            .into_transform();
        let plain = LineStyle::new().fg(Color::Red).bg(Color::Black).into_transform();
        let bold_out = bold(b"[ERROR] bar\n");
        assert!(String::from_utf8_lossy(&bold_out).contains("[ERROR] bar"));
        assert_ne!(bold_out, plain(b"[ERROR] bar\n"));
        colored::control::unset_override();
    }

    #[test]
    fn disabled_colors_pass_bytes_through() {
        let _guard = OVERRIDE_LOCK.lock().expect("override lock");
        colored::control::set_override(false);
        let transform = color(Color::Red);
        assert_eq!(transform(b"[ERROR] bar\n"), b"[ERROR] bar\n");
        colored::control::unset_override();
    }
}
