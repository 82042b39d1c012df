//! The rendering contract with the surrounding page.
//!
//! A [`Surface`] is whatever owns the element IDs of the page template: the DOM
//! in the browser, a terminal in the native client, or [`MemorySurface`] in
//! tests and headless runs.

use hashbrown::HashMap;

use crate::api::Action;
use crate::controls::ButtonView;
use crate::render::Fragment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    OnlineCount,
    OpsPerSecond,
    DemoCounter,
    TotalPlayers,
    ActiveGames,
    HighScore,
    ServerUptime,
    Leaderboard,
    ChatMessages,
    StartButton,
    StopButton,
    LoadButton,
}

impl ElementId {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementId::OnlineCount => "online-count",
            ElementId::OpsPerSecond => "ops-per-second",
            ElementId::DemoCounter => "demo-counter",
            ElementId::TotalPlayers => "total-players",
            ElementId::ActiveGames => "active-games",
            ElementId::HighScore => "high-score",
            ElementId::ServerUptime => "server-uptime",
            ElementId::Leaderboard => "leaderboard",
            ElementId::ChatMessages => "chat-messages",
            ElementId::StartButton => "start-btn",
            ElementId::StopButton => "stop-btn",
            ElementId::LoadButton => "load-btn",
        }
    }

    /// The control that triggers `action`.
    pub fn button(action: Action) -> ElementId {
        match action {
            Action::Load => ElementId::LoadButton,
            Action::Start => ElementId::StartButton,
            Action::Stop => ElementId::StopButton,
        }
    }
}

pub trait Surface {
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Replaces every child of `id` with `content` in one swap.
    fn replace_children(&mut self, id: ElementId, content: Fragment);

    /// Forces the scroll position of `id` to its maximum.
    fn scroll_to_end(&mut self, id: ElementId);

    fn apply_button(&mut self, id: ElementId, view: &ButtonView);

    /// Blocking, user-visible notice (an `alert` in the browser).
    fn notify(&mut self, notice: &str);
}

/// In-memory surface that records what was written to it.
#[derive(Debug, Default)]
pub struct MemorySurface {
    texts: HashMap<ElementId, String>,
    content: HashMap<ElementId, Fragment>,
    replacements: HashMap<ElementId, usize>,
    scrolls: HashMap<ElementId, usize>,
    buttons: HashMap<ElementId, ButtonView>,
    notices: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.texts.get(&id).map(String::as_str)
    }

    pub fn content(&self, id: ElementId) -> Option<&Fragment> {
        self.content.get(&id)
    }

    /// How many times `id`'s children were replaced.
    pub fn replacements(&self, id: ElementId) -> usize {
        self.replacements.get(&id).copied().unwrap_or(0)
    }

    pub fn scrolls(&self, id: ElementId) -> usize {
        self.scrolls.get(&id).copied().unwrap_or(0)
    }

    pub fn button(&self, id: ElementId) -> Option<&ButtonView> {
        self.buttons.get(&id)
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, id: ElementId, text: &str) {
        self.texts.insert(id, text.to_string());
    }

    fn replace_children(&mut self, id: ElementId, content: Fragment) {
        self.content.insert(id, content);
        *self.replacements.entry(id).or_insert(0) += 1;
    }

    fn scroll_to_end(&mut self, id: ElementId) {
        *self.scrolls.entry(id).or_insert(0) += 1;
    }

    fn apply_button(&mut self, id: ElementId, view: &ButtonView) {
        self.buttons.insert(id, view.clone());
    }

    fn notify(&mut self, notice: &str) {
        self.notices.push(notice.to_string());
    }
}
