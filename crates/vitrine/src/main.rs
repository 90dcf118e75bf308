mod logging;
mod page;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use glam::Vec2;
use log::{debug, error, info, warn};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Margin, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Paragraph,
};
use vitrine_config::{Config, SectionConfig};
use vitrine_core::{CancellationToken, FrameLoop, hsl_to_rgb};
use vitrine_effects::{
    BranchField, HalfBlocks, PixelCanvas, RevealEvent, RevealObserver, Surface2d, TrailHost,
    Viewport,
};

use crate::page::{PageLayout, SectionLayout};

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i64 = 3;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    logging::init(config.log_level());
    if let Some(err) = load_error {
        warn!("{err}; using the default configuration");
    }

    let terminal = ratatui::init();
    execute!(io::stdout(), EnableMouseCapture)?;
    let result = App::new(config).run(terminal);
    if let Err(err) = execute!(io::stdout(), DisableMouseCapture) {
        warn!("failed to release the mouse: {err}");
    }
    ratatui::restore();
    result
}

/// Branch field and the raster it paints, behind the hero section.
#[derive(Debug)]
struct Hero {
    /// Index of the hero section.
    index: usize,
    field: BranchField,
    canvas: PixelCanvas,
}

/// The main application which holds the page and its effects.
#[derive(Debug)]
pub struct App {
    config: Config,
    /// Cancelled to quit the application.
    token: CancellationToken,
    rows: u16,
    layout: PageLayout,
    /// First page row shown at the top of the terminal.
    scroll: u32,
    hero: Option<Hero>,
    trail: TrailHost,
    /// Additive raster the trail renders into, covering the terminal.
    overlay: PixelCanvas,
    reveal: Option<RevealObserver>,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
            rows: 0,
            layout: PageLayout::default(),
            scroll: 0,
            hero: None,
            trail: TrailHost::new(),
            overlay: PixelCanvas::new(Viewport::default()),
            reveal: None,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.setup(size.width, size.height);

        let budget = self.config.frame_budget();
        let mut frames = FrameLoop::new(self.token.clone());
        let total = frames.run(|_| -> color_eyre::Result<()> {
            let started = Instant::now();
            self.advance_effects();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(budget.saturating_sub(started.elapsed()))
        })?;
        info!("stopped after {total} frames");
        Ok(())
    }

    /// Lay out the page and start every effect for a terminal of
    /// `columns` x `rows` cells.
    fn setup(&mut self, columns: u16, rows: u16) {
        self.rows = rows;
        self.layout = PageLayout::new(&self.config.sections, columns, rows);
        let viewport = Viewport::from_cells(columns, rows);

        self.hero = self.load_hero(viewport);
        self.overlay = PixelCanvas::new(viewport);
        self.load_trail();
        self.reveal = RevealObserver::observe(
            self.config.reveal.clone(),
            self.layout.bounds(&self.config.sections),
        );
        self.update_reveal();
    }

    fn load_hero(&self, viewport: Viewport) -> Option<Hero> {
        let Some(index) = self.config.sections.iter().position(|section| section.hero) else {
            warn!("no hero section configured, branch field disabled");
            return None;
        };
        let settings = self.config.branches.clone();
        let background = settings.background();
        Some(Hero {
            index,
            field: BranchField::new(settings, viewport),
            canvas: PixelCanvas::filled(viewport, background),
        })
    }

    /// Attach the pointer trail. Failure only costs the trail.
    fn load_trail(&mut self) {
        let settings = &self.config.trail;
        if !settings.enabled {
            info!("pointer trail disabled");
            return;
        }
        if let Err(err) = self.trail.init(settings, &self.overlay, settings.early_start) {
            error!("pointer trail unavailable: {err}");
        }
    }

    /// Advance the branch field and the trail by one frame.
    fn advance_effects(&mut self) {
        if let Some(hero) = &mut self.hero {
            hero.field.advance_frame(&mut hero.canvas);
        }
        self.trail.advance_frame(&mut self.overlay);
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        for layout in &self.layout.sections {
            let Some(rect) = self.screen_rect(layout, area) else {
                continue;
            };
            // Rows of the section scrolled off the top of the screen.
            let clipped = self.scroll.saturating_sub(layout.top);
            let section = &self.config.sections[layout.index];

            if let Some(hero) = self.hero.as_ref().filter(|hero| hero.index == layout.index) {
                frame.render_widget(
                    HalfBlocks::new(&hero.canvas).row_offset(clipped as usize),
                    rect,
                );
            }
            if !self.is_revealed(&section.id) {
                continue;
            }

            let clipped = u16::try_from(clipped).unwrap_or(u16::MAX);
            if section.hero {
                let text = Paragraph::new(hero_text(section, layout))
                    .alignment(Alignment::Center)
                    .scroll((clipped, 0));
                frame.render_widget(text, rect);
            } else {
                let text = Paragraph::new(section_text(section, layout)).scroll((clipped, 0));
                frame.render_widget(text, rect.inner(Margin::new(page::MARGIN, 0)));
            }
        }

        frame.render_widget(HalfBlocks::new(&self.overlay).additive(true), area);

        if area.height > 0 {
            let help = Line::from(vec![
                "q".bold().fg(accent()),
                " quit  ".dark_gray(),
                "↑↓".bold().fg(accent()),
                " scroll  ".dark_gray(),
                "mouse".bold().fg(accent()),
                " trail".dark_gray(),
            ])
            .centered();
            let bottom = Rect::new(area.x, area.bottom() - 1, area.width, 1);
            frame.render_widget(help, bottom);
        }
    }

    /// Screen area showing the visible part of a section.
    fn screen_rect(&self, layout: &SectionLayout, area: Rect) -> Option<Rect> {
        let window_end = self.scroll + u32::from(area.height);
        let start = layout.top.max(self.scroll);
        let end = (layout.top + layout.height).min(window_end);
        if end <= start {
            return None;
        }
        let y = area.y + (start - self.scroll) as u16;
        Some(Rect::new(area.x, y, area.width, (end - start) as u16))
    }

    fn is_revealed(&self, id: &str) -> bool {
        self.reveal
            .as_ref()
            .is_none_or(|observer| observer.is_revealed(id))
    }

    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Waits at most `timeout` for the first event, then drains whatever
    /// else is already queued so pointer moves never lag behind frames.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        let mut wait = timeout;
        while event::poll(wait)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(columns, rows) => self.on_resize(columns, rows),
                _ => {}
            }
            wait = Duration::ZERO;
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = i64::from(self.rows.max(1));
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-page),
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => self.scroll_by(page),
            (_, KeyCode::Home) => self.scroll_to(0),
            (_, KeyCode::End) => self.scroll_to(self.layout.max_scroll(self.rows)),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.trail.on_pointer_move(cell_center(mouse.column, mouse.row));
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll_by(-WHEEL_ROWS),
            _ => {}
        }
    }

    /// Follow a terminal size change. Repeated calls with the same size
    /// leave every effect as it was.
    fn on_resize(&mut self, columns: u16, rows: u16) {
        self.rows = rows;
        self.layout = PageLayout::new(&self.config.sections, columns, rows);
        let viewport = Viewport::from_cells(columns, rows);

        if let Some(hero) = &mut self.hero {
            hero.canvas.resize(viewport);
            hero.field.resize(viewport);
        }
        self.trail.on_resize(viewport, &mut self.overlay);
        if let Some(observer) = &mut self.reveal {
            observer.relayout(self.layout.bounds(&self.config.sections));
        }
        debug!("resized to {columns}x{rows} cells");

        self.scroll = self.scroll.min(self.layout.max_scroll(rows));
        self.update_reveal();
    }

    fn scroll_by(&mut self, rows: i64) {
        let target = (i64::from(self.scroll) + rows).max(0);
        self.scroll_to(u32::try_from(target).unwrap_or(u32::MAX));
    }

    fn scroll_to(&mut self, row: u32) {
        let row = row.min(self.layout.max_scroll(self.rows));
        if row != self.scroll {
            self.scroll = row;
            self.update_reveal();
        }
    }

    fn update_reveal(&mut self) {
        let Some(observer) = &mut self.reveal else {
            return;
        };
        for event in observer.on_scroll(self.scroll, u32::from(self.rows)) {
            match event {
                RevealEvent::Revealed(id) => debug!("section `{id}` revealed"),
                RevealEvent::Concealed(id) => debug!("section `{id}` concealed"),
            }
        }
    }

    /// Cancel the frame loop to quit the application.
    fn quit(&mut self) {
        self.token.cancel();
    }
}

/// Pixel at the center of a terminal cell.
fn cell_center(column: u16, row: u16) -> Vec2 {
    Vec2::new(f32::from(column) + 0.5, f32::from(row) * 2.0 + 1.0)
}

fn accent() -> Color {
    hsl_to_rgb(270.0, 0.8, 0.75)
}

/// Title and body centered vertically within the hero section.
fn hero_text<'a>(section: &'a SectionConfig, layout: &'a SectionLayout) -> Vec<Line<'a>> {
    let block = 2 + layout.lines.len() as u32;
    let padding = layout.height.saturating_sub(block) / 2;
    let mut lines: Vec<Line> = (0..padding).map(|_| Line::default()).collect();
    lines.push(Line::from(section.title.as_str()).bold().fg(Color::White));
    lines.push(Line::default());
    lines.extend(
        layout
            .lines
            .iter()
            .map(|line| Line::from(line.as_str()).fg(Color::Gray)),
    );
    lines
}

fn section_text<'a>(section: &'a SectionConfig, layout: &'a SectionLayout) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::default(),
        Line::from(section.title.as_str()).bold().fg(accent()),
        Line::default(),
    ];
    lines.extend(
        layout
            .lines
            .iter()
            .map(|line| Line::from(line.as_str()).style(Style::new().fg(Color::Gray))),
    );
    lines
}
