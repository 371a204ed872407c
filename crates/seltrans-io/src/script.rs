use seltrans_types::{ControlKind, Rect};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// One line of a host script, e.g.
/// `{"event": "select", "text": "hello", "rect": {"left": 10, "top": 20, "width": 40, "height": 16}}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Select {
        text: String,
        rect: ScriptRect,
    },
    ClearSelection,
    PointerUp {
        #[serde(default)]
        target: Option<Target>,
    },
    Click {
        #[serde(default)]
        target: Option<Target>,
    },
    Scroll {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    Resize {
        width: f64,
        height: f64,
    },
    /// Pause the script, letting debounces and replies settle
    Wait {
        ms: u64,
    },
}

/// Document-space rectangle as written in scripts
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScriptRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<ScriptRect> for Rect {
    fn from(r: ScriptRect) -> Self {
        Rect::new(r.left, r.top, r.width, r.height)
    }
}

/// What an event lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Trigger,
    Popup,
    Page,
}

impl Target {
    /// The control this target names, `None` for the page itself
    pub fn control(self) -> Option<ControlKind> {
        match self {
            Target::Trigger => Some(ControlKind::Trigger),
            Target::Popup => Some(ControlKind::Popup),
            Target::Page => None,
        }
    }
}

/// Parses one script line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ScriptEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Pulls events from a line-oriented script. Malformed lines are logged
/// and skipped.
pub struct ScriptReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin> ScriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Next event, or `None` at end of input
    pub async fn next_event(&mut self) -> anyhow::Result<Option<ScriptEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            match parse_line(&line) {
                Ok(Some(event)) => return Ok(Some(event)),
                Ok(None) => {}
                Err(e) => tracing::warn!(line = self.line_no, "Skipping malformed script line: {e}"),
            }
        }

        tracing::info!("Script input ended after {} lines", self.line_no);
        Ok(None)
    }
}
