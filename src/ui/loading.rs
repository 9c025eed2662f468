use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::pipeline::Stage;

pub fn render(frame: &mut Frame, area: Rect, app: &App, stage: Stage) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}  {}", app.spinner_frame(), stage.label()),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(""),
        Line::from(app.url_input().fg(Color::DarkGray)),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);
}
