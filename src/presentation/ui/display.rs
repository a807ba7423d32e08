use colored::{Color, Colorize};
use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;

use super::status_view::{abbreviate_home, StatusColor, StatusLine};

/// Console output for the CLI
pub struct DisplayHelper {
    pub use_color: bool,
    home: Option<std::path::PathBuf>,
}

impl DisplayHelper {
    pub fn new(use_color: bool) -> Self {
        Self {
            use_color,
            home: std::env::var_os("HOME")
                .filter(|h| !h.is_empty())
                .map(std::path::PathBuf::from),
        }
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// `path` with the home directory shown as `~`
    pub fn format_path(&self, path: &Path) -> String {
        abbreviate_home(path, self.home())
    }

    pub fn success(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "✓".green().bold(), message);
        } else {
            println!("[OK] {}", message);
        }
    }

    /// Errors go to stderr
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "⚠".yellow().bold(), message);
        } else {
            eprintln!("[WARNING] {}", message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.use_color {
            println!("{} {}", "::".blue().bold(), message);
        } else {
            println!("[INFO] {}", message);
        }
    }

    /// Progress bar on stderr, hidden unless stderr is a terminal.
    pub fn create_progress_bar(&self, len: u64, message: &str) -> ProgressBar {
        if !Term::stderr().is_term() {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar().template("{msg}: {pos}/{len}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb
    }

    /// Print status lines; the status column carries the line's color.
    pub fn print_status_lines(&self, lines: &[StatusLine]) {
        for line in lines {
            println!("{}", self.render_line(line));
        }
    }

    pub fn render_line(&self, line: &StatusLine) -> String {
        let status = match (self.use_color, color_of(line.color)) {
            (true, Some(color)) => line.status.color(color).to_string(),
            _ => line.status.clone(),
        };
        format!("{}  {}  {}", line.key, status, line.info)
            .trim_end()
            .to_string()
    }
}

fn color_of(color: StatusColor) -> Option<Color> {
    match color {
        StatusColor::Green => Some(Color::Green),
        StatusColor::Red => Some(Color::Red),
        StatusColor::Yellow => Some(Color::Yellow),
        StatusColor::Plain => None,
    }
}
