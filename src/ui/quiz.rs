use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{QuestionView, Verdict};
use crate::session::{QuizController, Score};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &App, quiz: &QuizController) {
    let Ok(view) = quiz.view_state(app.current_question()) else {
        let waiting = Paragraph::new("No questions loaded. Press n to open a video.")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Progress
        Constraint::Length(5), // Question text
        Constraint::Min(10),   // Options
        Constraint::Length(2), // Feedback
        Constraint::Length(1), // Controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], app.current_question(), quiz.score());
    render_question_text(frame, chunks[1], view.prompt);
    render_options(frame, chunks[2], &view, app.cursor());
    render_feedback(frame, chunks[3], view.verdict.as_ref());
    render_controls(frame, chunks[4], view.locked);
}

fn render_progress(frame: &mut Frame, area: Rect, current: usize, score: Score) {
    let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let position = Paragraph::new(format!("Question {} of {}", current + 1, score.total))
        .style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(position, chunks[0]);

    let tally = Paragraph::new(format!(
        "Score {} / {}  ·  {} answered",
        score.correct, score.total, score.graded
    ))
    .alignment(Alignment::Right)
    .fg(Color::DarkGray);
    frame.render_widget(tally, chunks[1]);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, view: &QuestionView<'_>, cursor: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(view.options.len() * 2);

    for (index, option) in view.options.iter().enumerate() {
        let is_cursor = index == cursor && !view.locked;
        let is_selected = view.selected == Some(option.as_str());

        let style = option_style(view, option, is_cursor, is_selected);
        let marker = if is_cursor { ">" } else { " " };
        let radio = if is_selected { "(•)" } else { "( )" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", marker), style),
            Span::styled(format!("{} {}. ", radio, label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let title = if view.locked { " Options (locked) " } else { " Options " };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn option_style(view: &QuestionView<'_>, option: &str, is_cursor: bool, is_selected: bool) -> Style {
    if let Some(verdict) = &view.verdict {
        return if option == verdict.correct_option {
            Style::default().fg(Color::Green).bold()
        } else if is_selected {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
    }

    match (is_cursor, is_selected) {
        (true, _) => Style::default().fg(Color::Yellow).bold(),
        (false, true) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::Gray),
    }
}

fn render_feedback(frame: &mut Frame, area: Rect, verdict: Option<&Verdict>) {
    let Some(verdict) = verdict else {
        return;
    };

    let line = if verdict.is_correct {
        Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                "Incorrect. The correct answer is: ",
                Style::default().fg(Color::Red),
            ),
            Span::styled(
                verdict.correct_option.as_str(),
                Style::default().fg(Color::Red).bold(),
            ),
        ])
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_controls(frame: &mut Frame, area: Rect, locked: bool) {
    let text = if locked {
        "h/l question  ·  r reset all  ·  n new video  ·  q quit"
    } else {
        "j/k move  ·  space select  ·  enter submit  ·  h/l question  ·  r reset all  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
