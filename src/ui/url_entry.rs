use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::session::QuizController;

pub fn render(frame: &mut Frame, area: Rect, app: &App, quiz: &QuizController) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .margin(2)
    .split(area);

    let title = vec![
        Line::from(Span::styled(
            "VIDEO QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(
            "Paste a YouTube video link to generate comprehension questions from its transcript."
                .fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[1]);

    render_input(frame, chunks[2], app.url_input());
    render_controls(frame, chunks[3], !quiz.is_empty());
}

fn render_input(frame: &mut Frame, area: Rect, input: &str) {
    let line = Line::from(vec![
        Span::styled(input, Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" YouTube Video URL ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, has_quiz: bool) {
    let text = if has_quiz {
        "enter generate questions  ·  esc back to quiz"
    } else {
        "enter generate questions  ·  esc quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{draw, screen_contains};
    use crate::app::App;
    use crate::session::QuizController;

    #[test]
    fn test_renders_input_and_error() {
        let mut app = App::new();
        let mut quiz = QuizController::new();
        app.handle_paste("https://example.com/video");
        app.handle_key(
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Enter,
                crossterm::event::KeyModifiers::NONE,
            ),
            &mut quiz,
        );

        let rows = draw(&app, &quiz);
        assert!(screen_contains(&rows, "YouTube Video URL"));
        assert!(screen_contains(&rows, "https://example.com/video"));
        assert!(screen_contains(&rows, "Invalid YouTube URL"));
        assert!(screen_contains(&rows, "esc quit"));
    }
}
