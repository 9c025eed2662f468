mod loading;
mod quiz;
mod url_entry;

use ratatui::{prelude::*, widgets::{Block, Paragraph}};

use crate::app::{App, Notice, Screen};
use crate::session::QuizController;

pub fn render(frame: &mut Frame, app: &App, quiz: &QuizController) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);

    match app.screen {
        Screen::UrlEntry => url_entry::render(frame, chunks[0], app, quiz),
        Screen::Loading(stage) => loading::render(frame, chunks[0], app, stage),
        Screen::Quiz => quiz::render(frame, chunks[0], app, quiz),
    }

    render_notice(frame, chunks[1], app.notice());
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let (text, color) = match notice {
        Notice::Info(text) => (text.as_str(), Color::Green),
        Notice::Error(text) => (text.as_str(), Color::Red),
    };
    let widget = Paragraph::new(text).alignment(Alignment::Center).fg(color);
    frame.render_widget(widget, area);
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::App;
    use crate::session::QuizController;

    /// Draw one frame and return the screen contents, one string per row.
    pub fn draw(app: &App, quiz: &QuizController) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal
            .draw(|frame| super::render(frame, app, quiz))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    pub fn screen_contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|row| row.contains(needle))
    }
}
