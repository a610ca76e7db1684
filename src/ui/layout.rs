use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub sidebar_area: Rect,
    pub detail_area: Rect,
    pub keybindings_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: widget sidebar (30%) | focused widget detail (70%)
pub fn create_layout(area: Rect) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    let keybindings_area = main_chunks[0];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Widget sidebar
            Constraint::Percentage(70), // Detail pane
        ])
        .split(main_chunks[1]);

    MainLayout {
        sidebar_area: horizontal[0],
        detail_area: horizontal[1],
        keybindings_area,
    }
}

/// Create centered modal area (for forms and the ringing dialog)
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(16),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert!(layout.sidebar_area.width > 0);
        assert!(layout.detail_area.width > layout.sidebar_area.width);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area);

        assert!(modal.width < area.width);
        assert!(modal.height < area.height);
        assert_eq!(modal.height, 16);
    }
}
