//! Custom TUI widgets

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// A colored badge for an action status
pub struct StatusBadge<'a> {
    status: &'a str,
}

impl<'a> StatusBadge<'a> {
    pub fn new(status: &'a str) -> Self {
        Self { status }
    }

    pub fn to_span(&self) -> Span<'static> {
        let color = match self.status {
            "Done" => Color::Green,
            "In Progress" => Color::Yellow,
            "To Do" => Color::LightRed,
            _ => Color::Gray,
        };

        Span::styled(
            format!(" {} ", self.status),
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )
    }
}

/// A progress bar for the action closure rate
pub struct ClosureBar {
    progress: f64,
    label: Option<String>,
}

impl ClosureBar {
    pub fn new(progress: f64) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

impl Widget for ClosureBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let filled = ((area.width as f64 - 2.0) * self.progress) as u16;

        // Draw border
        buf.set_string(area.x, area.y, "[", Style::default());
        buf.set_string(area.x + area.width - 1, area.y, "]", Style::default());

        // Draw filled portion
        for x in 0..filled {
            buf.set_string(
                area.x + 1 + x,
                area.y,
                "█",
                Style::default().fg(Color::Green),
            );
        }

        // Draw empty portion
        for x in filled..(area.width - 2) {
            buf.set_string(
                area.x + 1 + x,
                area.y,
                "░",
                Style::default().fg(Color::DarkGray),
            );
        }

        // Draw label if present
        if let Some(label) = self.label {
            let label_x = area.x + (area.width - label.len() as u16) / 2;
            buf.set_string(label_x, area.y, &label, Style::default().fg(Color::White));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_bar_clamps() {
        let bar = ClosureBar::new(1.5).with_label("all done");
        assert!(bar.progress >= 0.0 && bar.progress <= 1.0);
    }

    #[test]
    fn test_status_badge() {
        let badge = StatusBadge::new("In Progress");
        let span = badge.to_span();
        assert!(span.content.contains("In Progress"));
    }
}
