//! End-to-end form behavior: events in, rendered frames and queued calls out.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::TestBackend, Terminal};
use simdash::api::types::{Candidate, ChartResponse, SimulationOption};
use simdash::app::{App, FormField, PendingRequest};
use simdash::config::Config;
use simdash::events::Event;
use simdash::form::FormDefaults;
use simdash::tasks::ApiMessage;
use simdash::ui::components::{DropdownState, LookupToken};

const WIDTH: u16 = 100;
const HEIGHT: u16 = 40;

fn new_app() -> App {
    let defaults = FormDefaults {
        start_date: "2021-05-01".to_string(),
        end_date: "2024-05-01".to_string(),
        initial_investment: "0".to_string(),
        monthly_investment: "500".to_string(),
        tickers: vec!["TSLA".to_string(), "NVDA".to_string()],
    };
    let mut app = App::with_defaults(Config::default(), defaults);
    assert_eq!(app.take_pending(), vec![PendingRequest::FetchSimulations]);
    app
}

fn terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(WIDTH, HEIGHT)).expect("test terminal")
}

fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) {
    terminal.draw(|frame| app.view(frame)).expect("draw");
}

fn press(app: &mut App, code: KeyCode) {
    app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn click(app: &mut App, column: u16, row: u16) {
    app.update(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for row in buffer.content().chunks(buffer.area.width as usize) {
        for cell in row {
            text.push_str(cell.symbol());
        }
        text.push('\n');
    }
    text
}

/// Focus the ticker field, type `query` and answer the latest lookup.
fn search(app: &mut App, query: &str, results: &[(&str, &str)]) -> LookupToken {
    while app.focus() != FormField::Tickers {
        press(app, KeyCode::Tab);
    }
    for c in query.chars() {
        press(app, KeyCode::Char(c));
    }
    let token = match app.take_pending().pop() {
        Some(PendingRequest::Lookup(request)) => request.token,
        other => panic!("Expected lookup, got {:?}", other),
    };
    app.handle_api_message(ApiMessage::TickersSearched {
        token,
        result: Ok(results
            .iter()
            .map(|(symbol, name)| Candidate::new(*symbol, *name))
            .collect()),
    });
    token
}

#[test]
fn test_initial_frame_shows_form() {
    let mut app = new_app();
    let mut terminal = terminal();
    draw(&mut terminal, &mut app);

    let text = screen_text(&terminal);
    assert!(text.contains("Start date"));
    assert!(text.contains("Monthly investment"));
    assert!(text.contains("TSLA"));
    assert!(text.contains("Loading simulations..."));
}

#[test]
fn test_dropdown_renders_candidates() {
    let mut app = new_app();
    let mut terminal = terminal();
    search(&mut app, "MS", &[("MSFT", "Microsoft"), ("MSTR", "MicroStrategy")]);
    draw(&mut terminal, &mut app);

    let text = screen_text(&terminal);
    assert!(text.contains("MSFT - Microsoft"));
    assert!(text.contains("MSTR - MicroStrategy"));
}

#[test]
fn test_click_outside_hides_dropdown_and_keeps_query() {
    let mut app = new_app();
    let mut terminal = terminal();
    search(&mut app, "MS", &[("MSFT", "Microsoft")]);
    draw(&mut terminal, &mut app);
    assert!(app.tickers().search().is_dropdown_visible());

    // Bottom-right corner is the hint bar, outside every registered region
    click(&mut app, WIDTH - 1, HEIGHT - 1);

    assert_eq!(app.tickers().search().state(), DropdownState::Dismissed);
    assert_eq!(app.tickers().search().query(), "MS");
    draw(&mut terminal, &mut app);
    assert!(!screen_text(&terminal).contains("MSFT - Microsoft"));
}

#[test]
fn test_click_inside_field_keeps_dropdown() {
    let mut app = new_app();
    let mut terminal = terminal();
    search(&mut app, "MS", &[("MSFT", "Microsoft")]);
    draw(&mut terminal, &mut app);

    // Top border of the ticker field: header (1) plus two input rows (3 each)
    click(&mut app, 1, 7);
    assert!(app.tickers().search().is_dropdown_visible());
    assert_eq!(app.focus(), FormField::Tickers);
}

#[test]
fn test_clicking_candidate_adds_ticker() {
    let mut app = new_app();
    let mut terminal = terminal();
    search(&mut app, "MS", &[("MSFT", "Microsoft")]);
    draw(&mut terminal, &mut app);

    // Field border at 7, input rows 8-10, dropdown border at 11, first row at 12
    click(&mut app, 5, 12);

    assert_eq!(app.tickers().selected_tickers(), vec!["TSLA", "NVDA", "MSFT"]);
    assert_eq!(app.tickers().search().query(), "");
    assert_eq!(app.tickers().search().state(), DropdownState::Idle);
}

#[test]
fn test_result_after_dismiss_stays_hidden() {
    let mut app = new_app();
    let mut terminal = terminal();
    search(&mut app, "A", &[("A", "Agilent")]);
    press(&mut app, KeyCode::Char('A'));
    let token = match app.take_pending().pop() {
        Some(PendingRequest::Lookup(request)) => request.token,
        other => panic!("Expected lookup, got {:?}", other),
    };
    draw(&mut terminal, &mut app);

    click(&mut app, WIDTH - 1, HEIGHT - 1);
    app.handle_api_message(ApiMessage::TickersSearched {
        token,
        result: Ok(vec![Candidate::new("AAPL", "Apple Inc.")]),
    });

    assert!(!app.tickers().search().is_dropdown_visible());
    assert_eq!(app.tickers().search().candidates()[0].symbol, "AAPL");
}

#[test]
fn test_full_run_renders_results() {
    let mut app = new_app();
    let mut terminal = terminal();
    app.handle_api_message(ApiMessage::SimulationsFetched(Ok(vec![SimulationOption {
        id: "dca".to_string(),
        name: "Dollar Cost Averaging".to_string(),
    }])));

    while app.focus() != FormField::Simulations {
        press(&mut app, KeyCode::Tab);
    }
    press(&mut app, KeyCode::Char(' '));
    app.update(Event::Key(KeyEvent::new(
        KeyCode::Char('r'),
        KeyModifiers::CONTROL,
    )));

    let request = match app.take_pending().as_slice() {
        [PendingRequest::Simulate(request)] => request.clone(),
        other => panic!("Expected simulate, got {:?}", other),
    };
    assert_eq!(request.simulations, vec!["dca"]);
    draw(&mut terminal, &mut app);
    assert!(screen_text(&terminal).contains("Running simulation..."));

    let chart: ChartResponse = serde_json::from_value(serde_json::json!({
        "data": [{"name": "DCA", "x": ["2021-05-01", "2024-05-01"], "y": [500.0, 19876.5]}],
        "layout": {"title": "Portfolio growth"}
    }))
    .expect("chart json");
    app.handle_api_message(ApiMessage::SimulationFinished(Ok(chart
        .try_into()
        .expect("chart with data"))));
    draw(&mut terminal, &mut app);

    let text = screen_text(&terminal);
    assert!(text.contains("Portfolio growth"));
    assert!(text.contains("19,876.50"));
    assert!(!app.loading().is_active());
}

#[test]
fn test_app_registers_one_click_away_listener() {
    let app = new_app();
    assert_eq!(app.router().listener_count(), 1);
}
