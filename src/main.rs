mod app;
mod event;
mod logging;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use keystride::config::Config;
use keystride::generator::mixed::MixedWords;
use keystride::generator::passage::PassageSource;
use keystride::generator::{Difficulty, WordSource};
use keystride::session::KeyInput;
use keystride::session::result::format_clock;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::high_scores::HighScoresView;
use ui::components::stats_sidebar::{StatsSidebar, accuracy_color, phase_label};
use ui::components::typing_area::TypingArea;
use ui::layout::AppLayout;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keystride", version, about = "Timed terminal typing test")]
struct Cli {
    #[arg(short, long, help = "Test length in seconds")]
    duration: Option<u32>,

    #[arg(short, long, help = "Number of words per test")]
    words: Option<usize>,

    #[arg(long, value_enum, help = "Share of programming words mixed in")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, value_name = "FILE", help = "Type a passage from a text file")]
    passage: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_name = "FILE", help = "Write logs here instead of the data directory")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(words) = self.words {
            config.word_count = words;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(ref theme) = self.theme {
            config.theme = theme.clone();
        }
        config.normalize();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = logging::init(cli.log_file.clone())?;
    info!(log = %log_path.display(), "keystride starting");

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "unreadable config, using defaults");
        Config::default()
    });
    // Write the defaults out on first run so there is a file to edit
    if !Config::config_path().exists()
        && let Err(e) = config.save()
    {
        warn!(error = %e, "could not write default config");
    }
    cli.apply(&mut config);

    let source: Box<dyn WordSource> = match cli.passage {
        Some(ref path) => Box::new(PassageSource::from_file(path)?),
        None => Box::new(MixedWords::new(config.word_count, config.difficulty)?),
    };

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, source, theme)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            info!("keystride exiting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::HighScores => handle_high_scores_key(app, key),
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.end_test(),
        KeyCode::Tab => app.toggle_pause(),
        KeyCode::Backspace => app.type_key(KeyInput::Backspace),
        KeyCode::Char(ch) => app.type_key(KeyInput::Char(ch)),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_test(),
        KeyCode::Char('h') => app.go_to_high_scores(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_high_scores_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_result(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Result => render_result(frame, app),
        AppScreen::HighScores => render_high_scores(frame, app),
    }
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);
    let test = &app.test;

    let header_style = Style::default().bg(colors.header_bg);
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " keystride ",
            Style::default()
                .fg(colors.fg)
                .bg(colors.header_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " {} | {} | {} WPM | ",
                app.category(),
                format_clock(u64::from(test.time_left())),
                test.wpm()
            ),
            Style::default().fg(colors.pending).bg(colors.header_bg),
        ),
        Span::styled(
            format!("{}%", test.accuracy()),
            Style::default()
                .fg(accuracy_color(test.accuracy(), colors))
                .bg(colors.header_bg),
        ),
        Span::styled(
            format!(" | {}", phase_label(test.phase())),
            Style::default().fg(colors.pending).bg(colors.header_bg),
        ),
    ]))
    .style(header_style);
    frame.render_widget(header, app_layout.header);

    frame.render_widget(TypingArea::new(test, app.theme), app_layout.main);

    if let Some(sidebar) = app_layout.sidebar {
        frame.render_widget(
            StatsSidebar::new(test, app.best_score(), app.theme),
            sidebar,
        );
    }

    render_footer(
        frame,
        app,
        " [Tab] Pause/resume  [Esc] End test  [Ctrl-C] Quit ",
        app_layout.footer,
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    if let Some(ref result) = app.last_result {
        let popup = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(Dashboard::new(result, app.last_rank, app.theme), popup);
    }
    if app.status.is_some() {
        let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
        render_footer(frame, app, "", footer);
    }
}

fn render_high_scores(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let popup = ui::layout::centered_rect(70, 80, area);
    frame.render_widget(
        HighScoresView::new(&app.high_scores, app.category(), app.theme),
        popup,
    );
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hint: &str, area: Rect) {
    let colors = &app.theme.colors;
    let line = match app.status {
        Some(ref status) => Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.warning),
        )),
        None => Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(colors.pending),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
