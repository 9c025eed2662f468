use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::QuestionPhase;
use crate::pipeline::{PipelineEvent, Stage};
use crate::session::QuizController;
use crate::sources::VideoId;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    UrlEntry,
    Loading(Stage),
    Quiz,
}

/// One-line message shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Start generating a quiz for this link.
    Generate(String),
}

/// Screen and cursor state. Quiz progress lives in [`QuizController`].
pub struct App {
    pub screen: Screen,
    url_input: String,
    notice: Option<Notice>,
    current_question: usize,
    cursor: usize,
    spinner: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::UrlEntry,
            url_input: String::new(),
            notice: None,
            current_question: 0,
            cursor: 0,
            spinner: 0,
        }
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn spinner_frame(&self) -> char {
        SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()]
    }

    pub fn tick(&mut self) {
        self.spinner = self.spinner.wrapping_add(1);
    }

    /// Put `url` in the input box and submit it as if Enter was pressed.
    pub fn submit_url(&mut self, url: &str) -> Action {
        self.url_input = url.trim().to_string();
        self.start_generation()
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.screen == Screen::UrlEntry {
            self.notice = None;
            self.url_input.push_str(text.trim());
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, quiz: &mut QuizController) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.screen {
            Screen::UrlEntry => self.handle_url_key(key.code, quiz),
            Screen::Loading(_) => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
                _ => Action::None,
            },
            Screen::Quiz => self.handle_quiz_key(key.code, quiz),
        }
    }

    pub fn handle_pipeline_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Stage(stage) => {
                if matches!(self.screen, Screen::Loading(_)) {
                    self.screen = Screen::Loading(stage);
                }
            }
            PipelineEvent::Loaded { questions } => {
                self.screen = Screen::Quiz;
                self.current_question = 0;
                self.cursor = 0;
                self.url_input.clear();
                self.notice = Some(Notice::Info(format!("{} questions generated!", questions)));
            }
            PipelineEvent::Failed(err) => {
                self.screen = Screen::UrlEntry;
                self.notice = Some(Notice::Error(err.to_string()));
            }
        }
    }

    fn handle_url_key(&mut self, key: KeyCode, quiz: &QuizController) -> Action {
        match key {
            KeyCode::Enter => self.start_generation(),
            KeyCode::Esc if !quiz.is_empty() => {
                self.notice = None;
                self.screen = Screen::Quiz;
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            KeyCode::Backspace => {
                self.notice = None;
                self.url_input.pop();
                Action::None
            }
            KeyCode::Char(c) => {
                self.notice = None;
                self.url_input.push(c);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn start_generation(&mut self) -> Action {
        let url = self.url_input.trim().to_string();
        if url.is_empty() {
            return Action::None;
        }

        match VideoId::from_url(&url) {
            Ok(_) => {
                self.notice = None;
                self.screen = Screen::Loading(Stage::FetchingTranscript);
                Action::Generate(url)
            }
            Err(e) => {
                self.notice = Some(Notice::Error(format!("Invalid YouTube URL: {}", e)));
                Action::None
            }
        }
    }

    fn handle_quiz_key(&mut self, key: KeyCode, quiz: &mut QuizController) -> Action {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(quiz, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(quiz, 1),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => self.focus_question(quiz, 1),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                self.focus_question(quiz, -1)
            }
            KeyCode::Char(' ') => self.select_at_cursor(quiz),
            KeyCode::Char(c @ '1'..='4') => {
                self.cursor = c as usize - '1' as usize;
                self.select_at_cursor(quiz);
            }
            KeyCode::Enter => self.submit_current(quiz),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                quiz.reset_all();
                self.cursor = 0;
                self.notice = Some(Notice::Info("All answers reset.".to_string()));
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.notice = None;
                self.url_input.clear();
                self.screen = Screen::UrlEntry;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
            _ => {}
        }
        Action::None
    }

    fn option_count(&self, quiz: &QuizController) -> usize {
        quiz.view_state(self.current_question)
            .map(|view| view.options.len())
            .unwrap_or(0)
    }

    fn move_cursor(&mut self, quiz: &QuizController, step: isize) {
        let count = self.option_count(quiz);
        if count == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + step).rem_euclid(count as isize) as usize;
    }

    fn focus_question(&mut self, quiz: &QuizController, step: isize) {
        if quiz.is_empty() {
            return;
        }
        let last = quiz.len() as isize - 1;
        self.current_question = (self.current_question as isize + step).clamp(0, last) as usize;
        self.notice = None;
        // Land on the stored answer when revisiting a question.
        self.cursor = quiz
            .view_state(self.current_question)
            .ok()
            .and_then(|view| view.selected_index())
            .unwrap_or(0);
    }

    fn select_at_cursor(&mut self, quiz: &mut QuizController) {
        let option = match quiz.view_state(self.current_question) {
            Ok(view) => match view.options.get(self.cursor) {
                Some(option) => option.clone(),
                None => return,
            },
            Err(e) => {
                self.notice = Some(Notice::Error(e.to_string()));
                return;
            }
        };

        self.notice = quiz
            .select(self.current_question, &option)
            .err()
            .map(|e| Notice::Error(e.to_string()));
    }

    fn submit_current(&mut self, quiz: &mut QuizController) {
        match quiz.submit(self.current_question) {
            Ok(_) => {
                self.notice = None;
                let next_open = (self.current_question + 1..quiz.len()).find(|&index| {
                    quiz.phase(index).is_ok_and(|phase| phase != QuestionPhase::Graded)
                });
                if next_open.is_some() {
                    self.notice = Some(Notice::Info("Press l or → for the next question.".to_string()));
                }
            }
            Err(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
