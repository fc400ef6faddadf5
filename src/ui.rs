use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rose_report::{AnalysisReport, BucketStat};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Contestants,
    Week1Eliminations,
    EliminationRates,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Contestants => Page::Week1Eliminations,
            Page::Week1Eliminations => Page::EliminationRates,
            Page::EliminationRates => Page::Contestants,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Contestants => Page::EliminationRates,
            Page::Week1Eliminations => Page::Contestants,
            Page::EliminationRates => Page::Week1Eliminations,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Contestants => "Contestants",
            Page::Week1Eliminations => "Week 1 Eliminations",
            Page::EliminationRates => "Elimination Rates",
        }
    }
}

pub struct App {
    pub report: AnalysisReport,
    pub current_page: Page,
    pub contestants_state: TableState,
    pub week1_state: TableState,
    pub rates_state: TableState,
}

impl App {
    pub fn new(report: AnalysisReport) -> Self {
        let mut contestants_state = TableState::default();
        if !report.contestants.is_empty() {
            contestants_state.select(Some(0));
        }

        let mut week1_state = TableState::default();
        if !report.week1_eliminations.is_empty() {
            week1_state.select(Some(0));
        }

        let mut rates_state = TableState::default();
        if !report.by_state.is_empty() {
            rates_state.select(Some(0));
        }

        Self {
            report,
            current_page: Page::Contestants,
            contestants_state,
            week1_state,
            rates_state,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn current_len(&self) -> usize {
        match self.current_page {
            Page::Contestants => self.report.contestants.len(),
            Page::Week1Eliminations => self.report.week1_eliminations.len(),
            Page::EliminationRates => self.report.by_state.len(),
        }
    }

    fn current_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Contestants => &mut self.contestants_state,
            Page::Week1Eliminations => &mut self.week1_state,
            Page::EliminationRates => &mut self.rates_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.current_len();
        if len == 0 {
            return;
        }
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                let next = i + 20;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let state = self.current_state();
        let i = match state.selected() {
            Some(i) => {
                if i < 20 {
                    0
                } else {
                    i - 20
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.current_len() > 0 {
            self.current_state().select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.current_len();
        if len > 0 {
            self.current_state().select(Some(len - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Char('1') => app.current_page = Page::Contestants,
                KeyCode::Char('2') => app.current_page = Page::Week1Eliminations,
                KeyCode::Char('3') => app.current_page = Page::EliminationRates,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.select_first(),
                KeyCode::End => app.select_last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Contestants => {
            render_contestant_table(f, chunks[1], " Contestants ", true, app)
        }
        Page::Week1Eliminations => {
            render_contestant_table(f, chunks[1], " Eliminated in Week 1 ", false, app)
        }
        Page::EliminationRates => render_rates(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = vec![
        (Page::Contestants, "Contestants"),
        (Page::Week1Eliminations, "Week 1"),
        (Page::EliminationRates, "Rates"),
    ];

    let mut tab_spans = vec![];
    for (i, (page, name)) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(*name, style));
    }

    let with_income = app
        .report
        .contestants
        .iter()
        .filter(|r| r.median_household_income.is_some())
        .count();

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Total: {}", app.report.contestants.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("🌹 Week 1: {}", app.report.week1_eliminations.len()),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("💰 {}", with_income),
        Style::default().fg(Color::Green),
    ));

    let header_text = vec![Line::from(tab_spans)];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_contestant_table(f: &mut Frame, area: Rect, title: &str, all: bool, app: &mut App) {
    let header_cells = ["Name", "Age", "Hometown", "Income", "Elim Week", "Season"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let records = if all {
        &app.report.contestants
    } else {
        &app.report.week1_eliminations
    };

    let rows = records.iter().map(|record| {
        let color = match record.contestant.elim_week {
            Some(1) => Color::Red,
            None => Color::Green,
            Some(_) => Color::White,
        };

        let cells = vec![
            Cell::from(truncate(&record.contestant.name, 22)),
            Cell::from(
                record
                    .contestant
                    .age
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::from(truncate(&record.contestant.hometown, 30)),
            Cell::from(format_income(record.median_household_income)),
            Cell::from(
                record
                    .contestant
                    .elim_week
                    .map(|w| w.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )
            .style(Style::default().fg(color)),
            Cell::from(record.contestant.season.to_string()),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(5),
            Constraint::Length(32),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    let state = if all {
        &mut app.contestants_state
    } else {
        &mut app.week1_state
    };
    f.render_stateful_widget(table, area, state);
}

fn render_rates(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // State table
            Constraint::Percentage(55), // Age and income charts
        ])
        .split(area);

    render_state_rates_table(f, chunks[0], app);

    let chart_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_rate_chart(f, chart_chunks[0], " Week-1 Elim % by Age Range ", &app.report.by_age);
    render_rate_chart(
        f,
        chart_chunks[1],
        " Week-1 Elim % by Household Income ",
        &app.report.by_income,
    );
}

fn render_state_rates_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["State", "Total", "Week 1", "Elim %"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.report.by_state.iter().map(|stat| {
        let color = if stat.percent_eliminated_week1 >= 50.0 {
            Color::Red
        } else {
            Color::White
        };

        let cells = vec![
            Cell::from(truncate(&stat.label, 18)),
            Cell::from(stat.total_count.to_string()),
            Cell::from(stat.eliminated_week1_count.to_string()),
            Cell::from(format!("{:.1}%", stat.percent_eliminated_week1))
                .style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Week-1 Elim % by Home State "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.rates_state);
}

fn render_rate_chart(f: &mut Frame, area: Rect, title: &str, stats: &[BucketStat]) {
    if stats.is_empty() {
        let empty = Paragraph::new("no data")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = stats
        .iter()
        .map(|stat| {
            Bar::default()
                .label(Line::from(stat.label.clone()))
                .value(stat.percent_eliminated_week1.round() as u64)
                .text_value(format!("{:.0}%", stat.percent_eliminated_week1))
                .style(Style::default().fg(Color::Magenta))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(11)
        .bar_gap(2)
        .max(100);

    f.render_widget(chart, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &mut App) {
    let total = app.current_len();
    let selected = app.current_state().selected().map(|i| i + 1).unwrap_or(0);

    let status_spans = vec![
        Span::styled(
            format!(" {} - Row: {}/{} ", app.current_page.title(), selected, total),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Tab/1-3", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" Fast | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_text = vec![Line::from(status_spans)];

    let status_bar = Paragraph::new(status_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn format_income(income: Option<f64>) -> String {
    match income {
        Some(value) => format!("${:.0}", value),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
