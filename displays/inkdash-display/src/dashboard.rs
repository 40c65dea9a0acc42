//! Two-column dashboard composer
//!
//! A frame is drawn in two passes over the same canvas:
//!
//! 1. Black plane: titles, subheaders, body text and the status line.
//!    Transmitted without a refresh.
//! 2. Yellow plane: the double rule under each column title. Transmitted
//!    with a refresh, which makes both planes visible at once.
//!
//! Columns sit side by side `column_width` pixels apart.

use inkdash_core::config::{ClockConfig, DashboardConfig, LayoutConfig};
use inkdash_core::{Canvas, Color, Font, Line, PixelBuffer, TextStyle, Wrap};

use crate::backend::{DisplayError, PanelBackend};
use crate::content::{content_lines, ContentLine, Panel, PanelBody};
use crate::status::{status_line, Readings};

/// Placeholder for a column without content
pub const NO_DATA: &str = "No data";

/// Prefix of the fetch error message
pub const ERROR_PREFIX: &str = "Error: ";

/// Everything shown on one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dashboard<'a> {
    /// Left and right columns
    pub panels: [Panel<'a>; 2],
    /// Status line inputs
    pub readings: Readings,
}

/// Lays out a [`Dashboard`] and sends it to a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Composer {
    layout: LayoutConfig,
    clock: ClockConfig,
}

impl Composer {
    /// Composer with explicit geometry and clock
    pub const fn new(layout: LayoutConfig, clock: ClockConfig) -> Self {
        Self { layout, clock }
    }

    /// Composer for a loaded configuration
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.layout, config.clock)
    }

    /// Page geometry
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Draw both planes and transmit them, refreshing once at the end
    pub fn render<B, F, P>(
        &self,
        dashboard: &Dashboard<'_>,
        canvas: &mut Canvas<B>,
        font: &mut F,
        panel: &mut P,
    ) -> Result<(), DisplayError<P::Error>>
    where
        B: PixelBuffer,
        F: Font,
        P: PanelBackend,
    {
        let expected = panel.plane_len();
        let actual = canvas.buffer().len();
        if expected != actual {
            return Err(DisplayError::BufferSize { expected, actual });
        }

        self.draw_text_layer(dashboard, canvas, font);
        panel
            .write_black_plane(canvas.buffer(), false)
            .map_err(DisplayError::Panel)?;

        self.draw_accent_layer(dashboard, canvas);
        panel
            .write_yellow_plane(canvas.buffer(), true)
            .map_err(DisplayError::Panel)
    }

    /// Clear the canvas and draw everything that goes on the black plane
    pub fn draw_text_layer<B: PixelBuffer, F: Font>(
        &self,
        dashboard: &Dashboard<'_>,
        canvas: &mut Canvas<B>,
        font: &mut F,
    ) {
        canvas.fill(Color::White);
        for (i, panel) in dashboard.panels.iter().enumerate() {
            self.draw_column(panel, self.column_x(i), canvas, font);
        }

        let status = status_line(&dashboard.readings, &self.clock);
        canvas.text(
            font,
            &status,
            self.layout.status_x as i32,
            self.layout.status_y as i32,
            Color::Black,
            TextStyle::new(1, self.layout.status_spacing),
        );
    }

    /// Clear the canvas and draw everything that goes on the yellow plane
    ///
    /// Only columns that show a document get the title rule.
    pub fn draw_accent_layer<B: PixelBuffer>(
        &self,
        dashboard: &Dashboard<'_>,
        canvas: &mut Canvas<B>,
    ) {
        canvas.fill(Color::White);
        for (i, panel) in dashboard.panels.iter().enumerate() {
            if !matches!(panel.body(), PanelBody::Document { .. }) {
                continue;
            }
            let x = self.column_x(i) + self.layout.margin as i32;
            let y = self.layout.separator_y as i32;
            let length = self.layout.max_width as i32 + 1;
            canvas.hline(x, y, length, Color::Black);
            canvas.hline(x, y + 1, length, Color::Black);
        }
    }

    fn column_x(&self, index: usize) -> i32 {
        index as i32 * self.layout.column_width as i32
    }

    fn draw_column<B: PixelBuffer, F: Font>(
        &self,
        panel: &Panel<'_>,
        column_x: i32,
        canvas: &mut Canvas<B>,
        font: &mut F,
    ) {
        let layout = &self.layout;
        let x = column_x + layout.margin as i32;
        let top = layout.content_top as i32;
        let body_style = TextStyle::new(1, layout.body_spacing);

        let (title, rest) = match panel.body() {
            PanelBody::Error(err) => {
                let chars = ERROR_PREFIX.chars().chain(err.chars());
                canvas.glyphs(font, chars, x, top, Color::Black, body_style);
                return;
            }
            PanelBody::Empty => {
                canvas.glyphs(font, NO_DATA.chars(), x, top, Color::Black, body_style);
                return;
            }
            PanelBody::Document { title, rest } => (title, rest),
        };

        let title_style = TextStyle::new(layout.title_scale, layout.title_spacing);
        let mut y = layout.title_top as i32;
        for line in self.wrap(title, title_style, font) {
            draw_bold(canvas, font, &line, x, y, title_style);
            y += layout.title_line_height as i32;
        }

        let bottom = layout.content_bottom as i32;
        let subheader_style = TextStyle::new(1, layout.subheader_spacing);
        let mut y = top;
        for content in content_lines(rest) {
            let (text, style, line_height, bold) = match content {
                ContentLine::Blank => {
                    y += layout.blank_line_gap as i32;
                    continue;
                }
                ContentLine::Subheader(text) => {
                    (text, subheader_style, layout.subheader_line_height, true)
                }
                ContentLine::Body(text) => (text, body_style, layout.body_line_height, false),
            };
            if y > bottom {
                break;
            }

            for line in self.wrap(text, style, font) {
                if y > bottom {
                    break;
                }
                if bold {
                    draw_bold(canvas, font, &line, x, y, style);
                } else {
                    canvas.glyphs(font, line.chars(), x, y, Color::Black, style);
                }
                y += line_height as i32;
            }
        }
    }

    fn wrap<'t, F: Font>(&self, text: &'t str, style: TextStyle, font: &F) -> Wrap<'t, F::Metrics> {
        Wrap::new(text, self.layout.max_width as u32, style, font.metrics())
            .with_lookback(self.layout.lookback as u32)
    }
}

fn draw_bold<B: PixelBuffer, F: Font>(
    canvas: &mut Canvas<B>,
    font: &mut F,
    line: &Line<'_>,
    x: i32,
    y: i32,
    style: TextStyle,
) {
    canvas.glyphs(font, line.chars(), x, y, Color::Black, style);
    canvas.glyphs(font, line.chars(), x + 1, y, Color::Black, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdash_core::CellMetrics;
    use std::vec;
    use std::vec::Vec;

    /// Records every glyph and marks its top-left pixel
    #[derive(Default)]
    struct RecordingFont {
        draws: Vec<(char, i32, i32, u8)>,
    }

    impl RecordingFont {
        /// Glyphs drawn inside the column starting at `column_x`
        fn column(&self, column_x: i32) -> impl Iterator<Item = &(char, i32, i32, u8)> {
            self.draws
                .iter()
                .filter(move |d| (column_x..column_x + 400).contains(&d.1))
        }

        /// Characters drawn on row `y` of a column, in drawing order
        fn text_at(&self, column_x: i32, y: i32) -> std::string::String {
            self.column(column_x)
                .filter(|d| d.2 == y)
                .map(|d| d.0)
                .collect()
        }

        /// Distinct content rows of a column
        fn rows(&self, column_x: i32) -> Vec<i32> {
            let mut rows: Vec<i32> = self
                .column(column_x)
                .map(|d| d.2)
                .filter(|y| (90..460).contains(y))
                .collect();
            rows.sort_unstable();
            rows.dedup();
            rows
        }
    }

    impl Font for RecordingFont {
        type Metrics = CellMetrics;

        fn cell_size(&self) -> (u16, u16) {
            (16, 16)
        }

        fn metrics(&self) -> CellMetrics {
            CellMetrics::default()
        }

        fn draw_char<B: PixelBuffer>(
            &mut self,
            c: char,
            x: i32,
            y: i32,
            canvas: &mut Canvas<B>,
            color: Color,
            scale: u8,
        ) {
            self.draws.push((c, x, y, scale));
            canvas.set_pixel(x, y, color);
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Rejected;

    #[derive(Default)]
    struct MockPanel {
        writes: Vec<(&'static str, Vec<u8>, bool)>,
        fail: bool,
    }

    impl PanelBackend for MockPanel {
        type Error = Rejected;

        fn size(&self) -> (u16, u16) {
            (800, 480)
        }

        fn write_black_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Rejected> {
            if self.fail {
                return Err(Rejected);
            }
            self.writes.push(("black", data.to_vec(), refresh));
            Ok(())
        }

        fn write_yellow_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Rejected> {
            self.writes.push(("yellow", data.to_vec(), refresh));
            Ok(())
        }
    }

    fn canvas() -> Canvas<Vec<u8>> {
        Canvas::new(vec![0u8; 800 * 480 / 8], 800, 480).unwrap()
    }

    fn ink(plane: &[u8], x: i32, y: i32) -> bool {
        let canvas = Canvas::new(plane.to_vec(), 800, 480).unwrap();
        canvas.pixel(x, y) == Some(Color::Black)
    }

    fn dashboard<'a>(left: Panel<'a>, right: Panel<'a>) -> Dashboard<'a> {
        Dashboard {
            panels: [left, right],
            readings: Readings::default(),
        }
    }

    fn render_text(dashboard: &Dashboard<'_>) -> RecordingFont {
        let mut font = RecordingFont::default();
        Composer::default().draw_text_layer(dashboard, &mut canvas(), &mut font);
        font
    }

    #[test]
    fn test_two_pass_order() {
        let dash = dashboard(
            Panel::new("INFO 1", Some("# Weather\nSunny")),
            Panel::new("INFO 2", Some("Quiet day")),
        );
        let mut panel = MockPanel::default();
        let mut font = RecordingFont::default();
        Composer::default()
            .render(&dash, &mut canvas(), &mut font, &mut panel)
            .unwrap();

        assert_eq!(panel.writes.len(), 2);
        let (name, black, refresh) = &panel.writes[0];
        assert_eq!((*name, *refresh), ("black", false));
        let (name, yellow, refresh) = &panel.writes[1];
        assert_eq!((*name, *refresh), ("yellow", true));

        // Title ink only on black, rules only on yellow
        assert!(ink(black, 20, 30));
        assert!(!ink(yellow, 20, 30));
        assert!(!ink(black, 20, 65));
        for (x, y) in [(20, 65), (380, 65), (20, 66), (420, 66), (780, 65)] {
            assert!(ink(yellow, x, y), "({x}, {y})");
        }
        assert!(!ink(yellow, 19, 65));
        assert!(!ink(yellow, 381, 65));
        assert!(!ink(yellow, 20, 67));
    }

    #[test]
    fn test_titles() {
        let font = render_text(&dashboard(
            Panel::new("INFO 1", Some("# Weather\nSunny")),
            Panel::new("INFO 2", Some("Quiet day")),
        ));
        // Bold titles are drawn twice
        assert_eq!(font.text_at(0, 30), "WeatherWeather");
        assert_eq!(font.text_at(400, 30), "INFO 2INFO 2");
        assert!(font
            .draws
            .iter()
            .filter(|d| d.2 == 30)
            .all(|d| d.3 == 2));
        assert_eq!(font.text_at(0, 90), "Sunny");
        assert_eq!(font.text_at(400, 90), "Quiet day");
    }

    #[test]
    fn test_bold_is_offset_by_one() {
        let font = render_text(&dashboard(
            Panel::new("A", Some("# T")),
            Panel::default(),
        ));
        let title: Vec<_> = font.draws.iter().filter(|d| d.2 == 30).collect();
        assert_eq!(title.len(), 2);
        assert_eq!((title[0].1, title[1].1), (20, 21));
    }

    #[test]
    fn test_placeholders() {
        let font = render_text(&dashboard(
            Panel::new("INFO 1", None),
            Panel {
                default_title: "INFO 2",
                content: Some("ignored"),
                error: Some("timeout"),
            },
        ));
        assert_eq!(font.text_at(0, 90), "No data");
        assert_eq!(font.text_at(400, 90), "Error: timeout");
        // No titles without a document
        assert!(font.draws.iter().all(|d| d.2 != 30));
    }

    #[test]
    fn test_no_rule_without_document() {
        let dash = dashboard(Panel::new("INFO 1", None), Panel::failed("INFO 2", "x"));
        let mut canvas = canvas();
        Composer::default().draw_accent_layer(&dash, &mut canvas);
        assert!(canvas.buffer().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_line_advances() {
        let font = render_text(&dashboard(
            Panel::new("INFO 1", Some("one\ntwo\n\nthree\n## Sub\nfour")),
            Panel::default(),
        ));
        // 28 px body rows, 10 px blank gap, 32 px subheader row
        assert_eq!(font.rows(0), vec![90, 118, 156, 184, 216]);
        assert_eq!(font.text_at(0, 184), "SubSub");
        assert_eq!(font.text_at(0, 216), "four");
    }

    #[test]
    fn test_body_wraps_within_column() {
        let long = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let font = render_text(&dashboard(Panel::new("INFO 1", Some(long)), Panel::default()));
        assert!(font
            .column(0)
            .filter(|d| d.2 >= 90)
            .all(|d| d.1 >= 20 && d.1 + 8 <= 380));
        assert_eq!(font.rows(0), vec![90, 118]);
    }

    #[test]
    fn test_stops_at_bottom() {
        let mut text = std::string::String::new();
        for _ in 0..40 {
            text.push_str("line\n");
        }
        let font = render_text(&dashboard(Panel::new("INFO 1", Some(&text)), Panel::default()));
        let rows = font.rows(0);
        // 90 + 13 * 28 = 454 is the first row past 440
        assert_eq!(rows.len(), 13);
        assert_eq!(rows.last(), Some(&426));
    }

    #[test]
    fn test_status_line() {
        let mut dash = dashboard(Panel::default(), Panel::default());
        dash.readings = Readings {
            time: Some(0),
            temperature: Some(20.0),
            ..Readings::default()
        };
        let font = render_text(&dash);
        assert_eq!(font.text_at(0, 460), "1970-01-01 08:00:00 | 20.0°C");
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let dash = Dashboard::default();
        let mut small = Canvas::new(vec![0u8; 8], 8, 8).unwrap();
        let mut panel = MockPanel::default();
        assert_eq!(
            Composer::default().render(&dash, &mut small, &mut RecordingFont::default(), &mut panel),
            Err(DisplayError::BufferSize {
                expected: 48_000,
                actual: 8
            })
        );
        assert!(panel.writes.is_empty());
    }

    #[test]
    fn test_panel_error_stops_render() {
        let dash = Dashboard::default();
        let mut panel = MockPanel {
            fail: true,
            ..MockPanel::default()
        };
        assert_eq!(
            Composer::default().render(&dash, &mut canvas(), &mut RecordingFont::default(), &mut panel),
            Err(DisplayError::Panel(Rejected))
        );
        assert!(panel.writes.is_empty());
    }
}
