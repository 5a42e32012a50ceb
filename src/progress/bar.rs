use super::options::{STEP_PLACEHOLDER, TOTAL_PLACEHOLDER};
use super::{OutputSink, ProgressOptions, RenderingMode, sink_for};
use crate::Result;
use core::fmt::{Debug, Formatter, Write as _};
use core::iter::repeat_n;
use ohno::app_err;
use std::io;

const LOG_TARGET: &str = "  progress";

/// Moves the cursor to the start of the previous line.
pub const CURSOR_UP_LINE: &str = "\x1b[F";

/// Erases from the cursor to the end of the line.
pub const ERASE_TO_EOL: &str = "\x1b[K";

/// Erases from the cursor to the end of the screen.
pub const ERASE_BELOW: &str = "\x1b[J";

/// A text progress bar with an append-only message log.
///
/// ```text
/// [------------------------50%                       ] 2 out of 4 complete (loading)
/// ```
///
/// The bar is redrawn in place on every call to [`render`](Self::render). Messages
/// added with [`log`](Self::log) appear below it: on a plain terminal the whole log
/// is kept under the bar using cursor movement, in a notebook cell only the most
/// recent few are redrawn after each clear.
pub struct ProgressBar<'a> {
    total: u64,
    current: u64,
    options: ProgressOptions,
    status: String,
    messages: Vec<String>,
    mode: RenderingMode,
    sink: Box<dyn OutputSink + 'a>,
    text: String,
    last_length: usize,
}

impl ProgressBar<'static> {
    /// Create a bar over `total` steps with default options, writing to stdout.
    pub fn new(total: u64) -> Result<Self> {
        Self::with_options(total, ProgressOptions::default())
    }

    /// Create a bar writing to stdout, probing the environment for a notebook kernel.
    pub fn with_options(total: u64, options: ProgressOptions) -> Result<Self> {
        let mode = RenderingMode::detect();
        Self::with_sink(total, options, sink_for(mode, io::stdout()))
    }
}

impl<'a> ProgressBar<'a> {
    /// Create a bar that writes to `sink`; the rendering mode is taken from the sink.
    ///
    /// Nothing is emitted until the first render.
    pub fn with_sink(total: u64, options: ProgressOptions, sink: impl OutputSink + 'a) -> Result<Self> {
        if total == 0 {
            return Err(app_err!("progress bar total must be positive"));
        }

        options.validate()?;

        let mode = sink.mode();
        let status = options.status.clone();
        let text = compose_line(0, total, &options, &status);
        let last_length = text.chars().count();

        log::debug!(target: LOG_TARGET, "created progress bar over {total} steps in {mode} mode");

        Ok(Self {
            total,
            current: 0,
            options,
            status,
            messages: Vec::new(),
            mode,
            sink: Box::new(sink),
            text,
            last_length,
        })
    }

    /// Redraw the bar at `step`.
    ///
    /// `status` overrides the configured status for this call only. Steps beyond
    /// `total` are clamped.
    pub fn render(&mut self, step: u64, status: Option<&str>) -> io::Result<()> {
        let status = status.unwrap_or(&self.options.status).to_string();
        self.draw(step, status)
    }

    /// Append a message to the log and redraw with the last step and status.
    pub fn log(&mut self, message: impl Into<String>) -> io::Result<()> {
        self.messages.push(message.into());
        let status = self.status.clone();
        self.draw(self.current, status)
    }

    /// Render the completed bar, then replay the whole message log below it.
    pub fn finalize(&mut self) -> io::Result<()> {
        self.render(self.total, None)?;

        let mut tail = String::new();
        if !(self.mode.is_notebook() && !self.messages.is_empty()) {
            // the cursor is still on the bar line
            tail.push('\n');
            if !self.messages.is_empty() {
                tail.push_str(ERASE_BELOW);
            }
        }

        tail.push('\n');
        for message in &self.messages {
            tail.push_str(message);
            tail.push('\n');
        }

        self.sink.write(&tail)?;
        self.sink.flush()
    }

    fn draw(&mut self, step: u64, status: String) -> io::Result<()> {
        if step > self.total {
            log::debug!(target: LOG_TARGET, "progress step {step} exceeds total {}, clamping", self.total);
        }

        let mut content = String::with_capacity(2 * self.last_length + 2);
        content.push('\r');
        content.extend(repeat_n(' ', self.last_length));

        self.current = step.min(self.total);
        self.text = compose_line(self.current, self.total, &self.options, &status);
        self.last_length = self.text.chars().count();
        self.status = status;

        content.push('\r');
        content.push_str(&self.text);

        if self.mode.is_notebook() {
            self.sink.clear()?;
        }

        self.sink.write(&content)?;

        if !self.messages.is_empty() {
            let region = if self.mode.is_notebook() {
                scrollback_region(&self.messages, self.options.scrollback)
            } else {
                log_region(&self.messages)
            };
            self.sink.write(&region)?;
        }

        self.sink.flush()
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn current(&self) -> u64 {
        self.current
    }

    pub fn percent(&self) -> u64 {
        percent(self.current, self.total)
    }

    /// The most recently rendered line, without erase sequences.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub const fn mode(&self) -> RenderingMode {
        self.mode
    }
}

impl Debug for ProgressBar<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressBar")
            .field("total", &self.total)
            .field("current", &self.current)
            .field("options", &self.options)
            .field("status", &self.status)
            .field("messages", &self.messages)
            .field("mode", &self.mode)
            .field("sink", &"<sink>")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Whole-number percentage of `step` over `total`, rounded down.
#[must_use]
pub fn percent(step: u64, total: u64) -> u64 {
    if total == 0 {
        return 100;
    }
    let scaled = u128::from(step) * 100 / u128::from(total);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// Build the bracketed bar for `percent`, exactly `width` characters wide.
///
/// The percentage text is spliced over the bar starting just before its midpoint.
#[must_use]
pub fn compose_bar(percent: u64, width: usize, fill: char) -> String {
    let inner = width.saturating_sub(2);
    let filled = filled_cells(percent.min(100), inner);

    let mut cells: Vec<char> = Vec::with_capacity(width);
    cells.push('[');
    cells.extend(repeat_n(fill, filled));
    cells.extend(repeat_n(' ', inner - filled));
    cells.push(']');

    let overlay = format!("{percent}%");
    let start = (width / 2).saturating_sub(1);
    for (cell, ch) in cells.iter_mut().skip(start).zip(overlay.chars()) {
        *cell = ch;
    }

    cells.into_iter().collect()
}

/// Build the full line: bar, filled-in label and optional status.
#[must_use]
pub fn compose_line(step: u64, total: u64, options: &ProgressOptions, status: &str) -> String {
    let mut line = compose_bar(percent(step, total), options.bar_width, options.fill_character);
    line.push(' ');
    line.push_str(&fill_template(&options.label_template, step, total));
    if !status.is_empty() {
        let _ = write!(line, " ({status})");
    }
    line
}

/// Substitute `{k}` and `{n}` in a label template.
#[must_use]
pub fn fill_template(template: &str, step: u64, total: u64) -> String {
    template
        .replace(STEP_PLACEHOLDER, &step.to_string())
        .replace(TOTAL_PLACEHOLDER, &total.to_string())
}

/// Number of filled cells out of `inner`, rounding half to even.
fn filled_cells(percent: u64, inner: usize) -> usize {
    let scaled = percent as usize * inner;
    let (quotient, remainder) = (scaled / 100, scaled % 100);
    if remainder > 50 || (remainder == 50 && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

/// Log lines written under the bar, followed by the cursor moves back up to it.
///
/// Multi-line messages occupy one terminal line per line of text.
fn log_region(messages: &[String]) -> String {
    let mut region = String::new();
    let mut lines = 0;
    for line in messages.iter().flat_map(|message| message.split('\n')) {
        region.push('\n');
        region.push_str(line);
        region.push_str(ERASE_TO_EOL);
        lines += 1;
    }
    region.extend(repeat_n(CURSOR_UP_LINE, lines));
    region
}

/// The last `lines` messages, oldest first, on the lines after the bar.
fn scrollback_region(messages: &[String], lines: usize) -> String {
    let mut region = String::from("\n");
    for message in &messages[messages.len().saturating_sub(lines)..] {
        region.push_str(message);
        region.push('\n');
    }
    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::sink::{CLEAR_CELL, NotebookSink, PlainSink};

    fn bar_part(text: &str, width: usize) -> String {
        text.chars().take(width).collect()
    }

    fn output(buf: &[u8]) -> String {
        String::from_utf8(buf.to_vec()).unwrap()
    }

    #[test]
    fn test_percent_embedded_for_every_step() {
        for total in [1_u64, 3, 7, 48, 100, 250] {
            for step in 0..=total {
                let expected = step * 100 / total;
                let bar = compose_bar(percent(step, total), 50, '-');
                assert_eq!(bar.chars().count(), 50, "total={total} step={step}");
                assert!(bar.starts_with('[') && bar.ends_with(']'), "{bar}");
                assert!(bar.contains(&format!("{expected}%")), "total={total} step={step}: {bar}");
            }
        }
    }

    #[test]
    fn test_bar_width_fixed_across_widths() {
        for width in [7, 8, 10, 31, 50, 80] {
            for pct in [0, 1, 9, 10, 50, 99, 100] {
                let bar = compose_bar(pct, width, '#');
                assert_eq!(bar.chars().count(), width, "width={width} pct={pct}: {bar}");
                assert!(bar.ends_with(']'), "width={width} pct={pct}: {bar}");
            }
        }
    }

    #[test]
    fn test_overlay_position() {
        assert_eq!(compose_bar(0, 10, '-'), "[   0%   ]");
        assert_eq!(compose_bar(100, 10, '-'), "[---100%-]");
        assert_eq!(compose_bar(50, 10, '='), "[===50%  ]");
    }

    #[test]
    fn test_multibyte_fill() {
        let bar = compose_bar(100, 12, '█');
        assert_eq!(bar.chars().count(), 12);
        assert_eq!(bar, "[████100%██]");
    }

    #[test]
    fn test_filled_cells_rounds_half_to_even() {
        assert_eq!(filled_cells(0, 48), 0);
        assert_eq!(filled_cells(100, 48), 48);
        assert_eq!(filled_cells(50, 5), 2);
        assert_eq!(filled_cells(50, 7), 4);
        assert_eq!(filled_cells(29, 48), 14);
    }

    #[test]
    fn test_zero_then_total_fills_bar() {
        let mut buf = Vec::new();
        let mut bar = ProgressBar::with_sink(9, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
        bar.render(0, None).unwrap();
        assert_eq!(bar.percent(), 0);
        bar.render(9, None).unwrap();

        let rendered = bar_part(bar.text(), 50);
        let cells: Vec<char> = rendered.chars().collect();
        assert_eq!(rendered, format!("[{}100%{}]", "-".repeat(23), "-".repeat(21)));
        assert!(cells[1..24].iter().all(|&c| c == '-'));
        assert!(cells[28..49].iter().all(|&c| c == '-'));
    }

    #[test]
    fn test_template_placeholders() {
        let mut buf = Vec::new();
        let options = ProgressOptions::default().label_template("{k}/{n}");
        let mut bar = ProgressBar::with_sink(4, options, PlainSink::new(&mut buf)).unwrap();
        bar.render(2, None).unwrap();
        assert!(bar.text().contains("2/4"), "{}", bar.text());
        assert!(bar.text().ends_with("] 2/4"), "{}", bar.text());
        assert!(bar.text().contains("50%"));
    }

    #[test]
    fn test_default_label() {
        let mut buf = Vec::new();
        let mut bar = ProgressBar::with_sink(10, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
        bar.render(3, None).unwrap();
        assert!(bar.text().ends_with("] 3 out of 10 complete"), "{}", bar.text());
    }

    #[test]
    fn test_status_override_and_default() {
        let mut buf = Vec::new();
        let options = ProgressOptions::default().status("warming up");
        let mut bar = ProgressBar::with_sink(10, options, PlainSink::new(&mut buf)).unwrap();

        bar.render(1, None).unwrap();
        assert!(bar.text().ends_with(" (warming up)"), "{}", bar.text());

        bar.render(2, Some("loading")).unwrap();
        assert!(bar.text().ends_with("2 out of 10 complete (loading)"), "{}", bar.text());

        bar.render(3, Some("")).unwrap();
        assert!(bar.text().ends_with("3 out of 10 complete"), "{}", bar.text());
    }

    #[test]
    fn test_first_render_erases_initial_length() {
        let mut buf = Vec::new();
        let initial = compose_line(0, 4, &ProgressOptions::default(), "").chars().count();
        {
            let mut bar = ProgressBar::with_sink(4, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.render(1, None).unwrap();
        }
        let out = output(&buf);
        let expected_prefix = format!("\r{}\r[", " ".repeat(initial));
        assert!(out.starts_with(&expected_prefix), "{out:?}");
    }

    #[test]
    fn test_same_step_twice_is_idempotent() {
        let mut buf = Vec::new();
        let (first, second) = {
            let mut bar = ProgressBar::with_sink(5, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.render(2, None).unwrap();
            let first = bar.text().to_string();
            bar.render(2, None).unwrap();
            (first, bar.text().to_string())
        };
        assert_eq!(first, second);

        let out = output(&buf);
        assert_eq!(out.matches(first.as_str()).count(), 2);
        let erase = format!("\r{}\r{first}", " ".repeat(first.chars().count()));
        assert!(out.ends_with(&erase), "{out:?}");
    }

    #[test]
    fn test_step_beyond_total_is_clamped() {
        let mut buf = Vec::new();
        let mut bar = ProgressBar::with_sink(4, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
        bar.render(10, None).unwrap();
        assert_eq!(bar.current(), 4);
        assert_eq!(bar.percent(), 100);
        assert_eq!(bar_part(bar.text(), 50).chars().count(), 50);
        assert!(bar.text().contains("4 out of 4 complete"));
    }

    #[test]
    fn test_zero_total_rejected() {
        let mut buf = Vec::new();
        let err = ProgressBar::with_sink(0, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap_err();
        assert!(err.to_string().contains("positive"), "{err}");
    }

    #[test]
    fn test_log_keeps_order_and_finalize_replays() {
        let mut buf = Vec::new();
        {
            let mut bar = ProgressBar::with_sink(3, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.render(1, None).unwrap();
            bar.log("a").unwrap();
            bar.log("b").unwrap();
            assert_eq!(bar.messages(), ["a", "b"]);
            bar.finalize().unwrap();
            assert_eq!(bar.messages(), ["a", "b"]);
        }

        let out = output(&buf);
        assert!(out.ends_with(&format!("\n{ERASE_BELOW}\na\nb\n")), "{out:?}");
        let final_bar = out.rfind("100%").unwrap();
        let replay = out.rfind("\na\nb\n").unwrap();
        assert!(final_bar < replay);
    }

    #[test]
    fn test_log_rerenders_last_step_and_status() {
        let mut buf = Vec::new();
        let mut bar = ProgressBar::with_sink(10, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
        bar.render(7, Some("busy")).unwrap();
        let before = bar.text().to_string();
        bar.log("note").unwrap();
        assert_eq!(bar.text(), before);
        assert_eq!(bar.current(), 7);
    }

    #[test]
    fn test_plain_log_region_moves_cursor_back() {
        let mut buf = Vec::new();
        {
            let mut bar = ProgressBar::with_sink(10, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.log("first").unwrap();
            bar.log("second").unwrap();
        }
        let out = output(&buf);
        let expected_tail = format!("\nfirst{ERASE_TO_EOL}\nsecond{ERASE_TO_EOL}{CURSOR_UP_LINE}{CURSOR_UP_LINE}");
        assert!(out.ends_with(&expected_tail), "{out:?}");
        assert!(!out.contains(CLEAR_CELL));
    }

    #[test]
    fn test_finalize_without_messages() {
        let mut buf = Vec::new();
        {
            let mut bar = ProgressBar::with_sink(2, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.finalize().unwrap();
        }
        let out = output(&buf);
        assert!(out.ends_with("2 out of 2 complete\n\n"), "{out:?}");
    }

    #[test]
    fn test_notebook_clears_and_shows_scrollback() {
        let mut buf = Vec::new();
        {
            let options = ProgressOptions::default().scrollback(2);
            let mut bar = ProgressBar::with_sink(10, options, NotebookSink::new(&mut buf)).unwrap();
            assert_eq!(bar.mode(), RenderingMode::InteractiveNotebook);
            bar.render(5, None).unwrap();
            bar.log("m1").unwrap();
            bar.log("m2").unwrap();
            bar.log("m3").unwrap();
        }

        let out = output(&buf);
        assert_eq!(out.matches(CLEAR_CELL).count(), 4);
        let last_frame = out.rsplit(CLEAR_CELL).next().unwrap();
        assert!(last_frame.ends_with("5 out of 10 complete\nm2\nm3\n"), "{last_frame:?}");
        assert!(!last_frame.contains("m1"));
        assert!(!out.contains(CURSOR_UP_LINE));
    }

    #[test]
    fn test_notebook_finalize_replays_full_log() {
        let mut buf = Vec::new();
        {
            let options = ProgressOptions::default().scrollback(1);
            let mut bar = ProgressBar::with_sink(2, options, NotebookSink::new(&mut buf)).unwrap();
            bar.log("x").unwrap();
            bar.log("y").unwrap();
            bar.finalize().unwrap();
        }

        let out = output(&buf);
        let last_frame = out.rsplit(CLEAR_CELL).next().unwrap();
        assert!(last_frame.ends_with("2 out of 2 complete\ny\n\nx\ny\n"), "{last_frame:?}");
    }

    #[test]
    fn test_percent_near_u64_max() {
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
        assert_eq!(percent(u64::MAX / 2, u64::MAX), 49);
        assert_eq!(percent(u64::MAX / 10, u64::MAX / 10), 100);

        let total = u64::MAX / 10;
        let mut buf = Vec::new();
        let mut bar = ProgressBar::with_sink(total, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
        bar.render(total, None).unwrap();
        assert_eq!(bar.percent(), 100);
        assert!(bar_part(bar.text(), 50).contains("100%"), "{}", bar.text());
    }

    #[test]
    fn test_plain_multiline_message_moves_up_per_line() {
        let mut buf = Vec::new();
        {
            let mut bar = ProgressBar::with_sink(10, ProgressOptions::default(), PlainSink::new(&mut buf)).unwrap();
            bar.render(3, None).unwrap();
            bar.log("first\nsecond").unwrap();
            bar.log("third").unwrap();
        }

        let out = output(&buf);
        let frame = out.rsplit('\r').next().unwrap();
        assert_eq!(frame.matches('\n').count(), 3, "{frame:?}");
        assert_eq!(frame.matches(CURSOR_UP_LINE).count(), 3, "{frame:?}");
        let expected_tail = format!(
            "\nfirst{ERASE_TO_EOL}\nsecond{ERASE_TO_EOL}\nthird{ERASE_TO_EOL}{CURSOR_UP_LINE}{CURSOR_UP_LINE}{CURSOR_UP_LINE}"
        );
        assert!(frame.ends_with(&expected_tail), "{frame:?}");
    }

    #[test]
    fn test_notebook_default_scrollback_is_five() {
        let mut buf = Vec::new();
        {
            let mut bar = ProgressBar::with_sink(10, ProgressOptions::default(), NotebookSink::new(&mut buf)).unwrap();
            bar.render(4, None).unwrap();
            for i in 1..=7 {
                bar.log(format!("m{i}")).unwrap();
            }
        }

        let out = output(&buf);
        let last_frame = out.rsplit(CLEAR_CELL).next().unwrap();
        assert!(last_frame.ends_with("4 out of 10 complete\nm3\nm4\nm5\nm6\nm7\n"), "{last_frame:?}");
        assert!(!last_frame.contains("m1"));
        assert!(!last_frame.contains("m2"));
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(fill_template("{k} out of {n} complete", 3, 9), "3 out of 9 complete");
        assert_eq!(fill_template("{k}{k}/{n}", 1, 2), "11/2");
        assert_eq!(fill_template("static", 1, 2), "static");
    }
}
