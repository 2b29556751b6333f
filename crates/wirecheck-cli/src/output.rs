//! Output formatting and status reporting

use console::{style, Style, Term};
use std::fmt::Write as _;
use wirecheck::ComparisonResult;

/// Writes results to stdout and status lines to stderr
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a result block to stdout, even in quiet mode
    pub fn result(&self, text: &str) {
        let _ = self.out.write_line(text.trim_end_matches('\n'));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }
}

/// Human-readable comparison report
#[must_use]
pub fn render_comparison(result: &ComparisonResult, use_color: bool) -> String {
    let heading = Style::new().bold().underlined();
    let good = Style::new().green();
    let bad = Style::new().red().bold();
    let paint = |s: &Style, text: String| {
        if use_color {
            s.apply_to(text).to_string()
        } else {
            text
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", paint(&heading, "Comparison".to_string()));

    let score = result
        .similarity_score
        .map_or_else(|| "unavailable".to_string(), |s| format!("{s:.4}"));
    let _ = writeln!(out, "  Similarity (SSIM): {score}");
    let _ = writeln!(out, "  Regions:           {}", result.regions.len());
    for (i, region) in result.regions.iter().enumerate() {
        let _ = writeln!(
            out,
            "    #{:<3} x={:<5} y={:<5} {}x{} area={:.0}",
            i + 1,
            region.x,
            region.y,
            region.width,
            region.height,
            region.area
        );
    }

    let _ = writeln!(out, "\n{}", paint(&heading, "Summary".to_string()));
    for (kind, count) in result.summary.iter() {
        let count_text = if count > 0 {
            paint(&bad, count.to_string())
        } else {
            count.to_string()
        };
        let _ = writeln!(out, "  {:<24} {count_text}", kind.label());
    }

    let _ = writeln!(out, "\n{}", paint(&heading, "Artifacts".to_string()));
    let _ = writeln!(out, "  Overlay: {}", result.overlay);
    let heatmap = result
        .heatmap
        .as_ref()
        .map_or_else(|| "skipped".to_string(), ToString::to_string);
    let _ = writeln!(out, "  Heatmap: {heatmap}");

    let _ = writeln!(out, "\n{}", paint(&heading, "Text".to_string()));
    let verdict = if result.font_style_mismatch {
        paint(&bad, "MISMATCH".to_string())
    } else {
        paint(&good, "match".to_string())
    };
    let _ = writeln!(out, "  Wireframe vs live site: {verdict}");
    for (label, text) in [
        ("Wireframe", &result.wireframe_text),
        ("Live site", &result.live_site_text),
    ] {
        let _ = writeln!(out, "  {label}:");
        let text = text.trim();
        if text.is_empty() {
            let _ = writeln!(out, "    (none)");
        }
        for line in text.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}
