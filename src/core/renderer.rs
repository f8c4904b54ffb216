/// Terminal view of a session. Pure: everything drawn comes from `Session`.
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::core::round::Artwork;
use crate::core::session::{RoundStatus, Session, MSG_LOADING};

pub const TITLE: &str = "¿Quién es este Pokémon?";
pub const PLACEHOLDER: &str = "Escribe el nombre...";
pub const GUESS_LABEL: &str = "¡Adivinar!";
pub const NEW_ROUND_LABEL: &str = "Nuevo Pokémon";
pub const LOAD_FAILED: &str = "No se pudo cargar el Pokémon.";

/// Night-sky panel behind the artwork so a black silhouette stays visible
pub const BACKDROP: Color = Color::Rgb(38, 44, 92);
pub const SILHOUETTE: Color = Color::Rgb(8, 8, 12);

/// Streak at which the score starts burning
const FLAME_STREAK: u32 = 2;

/// Pixels with less alpha than this are treated as background
const ALPHA_CUTOFF: u8 = 128;

/// Cursor position for the input line, if the caller wants to show one
pub fn render(frame: &mut Frame, session: &Session) -> Option<(u16, u16)> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(TITLE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    render_stage(frame, chunks[1], session);
    let cursor = render_input(frame, chunks[2], session);

    frame.render_widget(
        Paragraph::new(session.feedback.message())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        chunks[3],
    );
    frame.render_widget(Paragraph::new(stats_line(session)).alignment(Alignment::Center), chunks[4]);
    frame.render_widget(
        Paragraph::new(format!("[Enter] {GUESS_LABEL}   [F2] {NEW_ROUND_LABEL}   [Esc] Salir"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        chunks[5],
    );

    cursor
}

fn render_stage(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BACKDROP));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &session.status {
        RoundStatus::Loading => frame.render_widget(centered_text(vec![Line::from(MSG_LOADING)]), inner),
        RoundStatus::Failed { reason } => frame.render_widget(
            centered_text(vec![
                Line::from(LOAD_FAILED),
                Line::styled(reason.as_str(), Style::default().fg(Color::Gray)),
                Line::from(format!("[F2] {NEW_ROUND_LABEL}")),
            ]),
            inner,
        ),
        RoundStatus::Ready => {
            if let Some(round) = &session.round {
                frame.render_widget(Silhouette::new(&round.artwork, session.revealed), inner);
            }
        }
        RoundStatus::Idle => {}
    }
}

fn centered_text(lines: Vec<Line<'_>>) -> Paragraph<'_> {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).bg(BACKDROP))
}

fn render_input(frame: &mut Frame, area: Rect, session: &Session) -> Option<(u16, u16)> {
    let solved = session.has_guessed_correctly;
    let title = if solved {
        format!(" {GUESS_LABEL} ✔ ")
    } else {
        format!(" {GUESS_LABEL} ")
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    let text = if session.input.is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(session.input.as_str())
    };
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);

    if solved || session.is_loading() || inner.width == 0 {
        return None;
    }
    let typed = session.input.chars().count() as u16;
    Some((inner.x + typed.min(inner.width - 1), inner.y))
}

fn stats_line(session: &Session) -> Line<'static> {
    let score = format!("Puntaje: {}", session.score);
    let score = if session.streak >= FLAME_STREAK {
        Span::styled(
            format!("🔥 {score}"),
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(score)
    };
    Line::from(vec![
        score,
        Span::raw("    "),
        Span::raw(format!("Racha: {}", session.streak)),
        Span::raw("    "),
        Span::raw(format!("Intentos: {}", session.attempts)),
    ])
}

/// Artwork drawn with half-block cells: two vertical pixels per terminal cell.
/// Unrevealed, every opaque pixel is painted `SILHOUETTE`.
pub struct Silhouette<'a> {
    artwork: &'a Artwork,
    revealed: bool,
}

impl<'a> Silhouette<'a> {
    pub fn new(artwork: &'a Artwork, revealed: bool) -> Self {
        Self { artwork, revealed }
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let image = self.artwork.image();
        if x >= image.width() || y >= image.height() {
            return None;
        }
        let [r, g, b, a] = image.get_pixel(x, y).0;
        if a < ALPHA_CUTOFF {
            None
        } else if self.revealed {
            Some(Color::Rgb(r, g, b))
        } else {
            Some(SILHOUETTE)
        }
    }
}

/// Largest size that fits `area` in pixels (each row holds two) keeping the aspect ratio
fn fit(image_w: u32, image_h: u32, area: Rect) -> (u32, u32) {
    if image_w == 0 || image_h == 0 || area.width == 0 || area.height == 0 {
        return (0, 0);
    }
    let avail_w = area.width as f64;
    let avail_h = area.height as f64 * 2.0;
    let scale = (avail_w / image_w as f64).min(avail_h / image_h as f64);
    let w = ((image_w as f64 * scale).floor() as u32).max(1);
    let h = ((image_h as f64 * scale).floor() as u32).max(1);
    (w, h)
}

/// Symbol, foreground, background for one cell
pub fn half_block(top: Option<Color>, bottom: Option<Color>, backdrop: Color) -> (&'static str, Color, Color) {
    match (top, bottom) {
        (Some(top), Some(bottom)) => ("▀", top, bottom),
        (Some(top), None) => ("▀", top, backdrop),
        (None, Some(bottom)) => ("▄", bottom, backdrop),
        (None, None) => (" ", backdrop, backdrop),
    }
}

impl Widget for Silhouette<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (src_w, src_h) = (self.artwork.width(), self.artwork.height());
        let (out_w, out_h) = fit(src_w, src_h, area);
        if out_w == 0 {
            return;
        }
        let rows = out_h.div_ceil(2);
        let left = area.x + ((area.width as u32 - out_w) / 2) as u16;
        let top = area.y + ((area.height as u32 - rows) / 2) as u16;

        let sample = |px: u32, py: u32| -> Option<Color> {
            if py >= out_h {
                return None;
            }
            self.pixel(px * src_w / out_w, py * src_h / out_h)
        };

        for row in 0..rows {
            for col in 0..out_w {
                let (symbol, fg, bg) = half_block(sample(col, row * 2), sample(col, row * 2 + 1), BACKDROP);
                if let Some(cell) = buf.cell_mut((left + col as u16, top + row as u16)) {
                    cell.set_symbol(symbol).set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::round::{CreatureId, CreatureRecord, Round};
    use image::{Rgba, RgbaImage};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(session: &Session) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        terminal.draw(|f| {
            render(f, session);
        })
        .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn solid(w: u32, h: u32) -> Artwork {
        Artwork::new(RgbaImage::from_pixel(w, h, Rgba([200, 40, 40, 255])))
    }

    fn ready_session(name: &str) -> Session {
        let mut session = Session::new();
        session.begin_loading();
        session.publish_round(Round::new(
            CreatureId::new(25).unwrap(),
            CreatureRecord { name: name.into(), artwork_url: "https://img.example/25.png".into() },
            solid(8, 8),
            "https://cries.example/",
        ));
        session
    }

    #[test]
    fn loading_screen_shows_loading_text() {
        let mut session = Session::new();
        session.begin_loading();
        let screen = screen(&session);
        assert!(screen.contains(TITLE));
        assert!(screen.contains(MSG_LOADING));
        assert!(screen.contains(PLACEHOLDER));
    }

    #[test]
    fn stats_and_feedback_follow_the_session() {
        let mut session = ready_session("pikachu");
        session.apply_guess("raichu");
        let text = screen(&session);
        assert!(text.contains("¡Incorrecto! Intenta de nuevo."));
        assert!(text.contains("Puntaje: 0"));
        assert!(text.contains("Intentos: 1"));

        session.apply_guess("pikachu");
        let text = screen(&session);
        assert!(text.contains("¡Correcto!"));
        assert!(text.contains("Puntaje: 1"));
        assert!(text.contains("Intentos: 2"));
    }

    #[test]
    fn failed_load_offers_a_retry() {
        let mut session = Session::new();
        session.begin_loading();
        session.fail_round("request to creature provider failed");
        let text = screen(&session);
        assert!(text.contains(LOAD_FAILED));
        assert!(text.contains("request to creature provider failed"));
        assert!(!text.contains(MSG_LOADING));
    }

    #[test]
    fn score_burns_from_second_streak() {
        let mut session = ready_session("pikachu");
        session.score = 2;
        session.streak = 2;
        let line = stats_line(&session);
        assert_eq!(line.spans[0].style.fg, Some(Color::LightRed));

        session.streak = 1;
        let line = stats_line(&session);
        assert_eq!(line.spans[0].style.fg, None);
    }

    #[test]
    fn silhouette_hides_colours_until_revealed() {
        let artwork = solid(2, 2);
        let area = Rect::new(0, 0, 2, 1);

        let mut hidden = Buffer::empty(area);
        Silhouette::new(&artwork, false).render(area, &mut hidden);
        assert_eq!(hidden[(0, 0)].symbol(), "▀");
        assert_eq!(hidden[(0, 0)].fg, SILHOUETTE);
        assert_eq!(hidden[(0, 0)].bg, SILHOUETTE);

        let mut shown = Buffer::empty(area);
        Silhouette::new(&artwork, true).render(area, &mut shown);
        assert_eq!(shown[(1, 0)].fg, Color::Rgb(200, 40, 40));
    }

    #[test]
    fn transparent_pixels_use_the_backdrop() {
        assert_eq!(half_block(None, None, BACKDROP), (" ", BACKDROP, BACKDROP));
        assert_eq!(half_block(None, Some(Color::Red), BACKDROP), ("▄", Color::Red, BACKDROP));
        assert_eq!(half_block(Some(Color::Red), None, BACKDROP), ("▀", Color::Red, BACKDROP));
    }

    #[test]
    fn fit_keeps_aspect_ratio_with_two_pixels_per_row() {
        // 40 columns x 10 rows holds 40x20 pixels.
        assert_eq!(fit(100, 100, Rect::new(0, 0, 40, 10)), (20, 20));
        assert_eq!(fit(200, 100, Rect::new(0, 0, 40, 10)), (40, 20));
        assert_eq!(fit(10, 10, Rect::new(0, 0, 0, 10)), (0, 0));
    }
}
