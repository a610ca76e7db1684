use crate::app::AppState;
use crate::clock::{AlarmDialog, AlarmForm, RingSession};
use crate::domain::Widget;
use crate::ui::{
    layout::create_modal_area,
    styles::{hint_style, modal_bg_style, modal_title_style, ringing_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn form_field<'a>(label: &'a str, value: &'a str, editing: bool) -> Vec<Line<'a>> {
    let header = if editing {
        format!("{}: (editing)", label)
    } else {
        format!("{}:", label)
    };

    let mut value_spans = vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
    ];
    if editing {
        value_spans.push(Span::styled("█", modal_title_style()));
    }

    vec![Line::raw(header), Line::from(value_spans), Line::raw("")]
}

/// Render the alarm create/edit form
pub fn render_alarm_form(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(Widget::Clock(clock)) = app.selected_widget() else {
        return;
    };
    let Some(dialog) = &clock.dialog else {
        return;
    };

    let (title_text, form): (&str, &AlarmForm) = match dialog {
        AlarmDialog::Creating(form) => (" Add Alarm ", form),
        AlarmDialog::Editing { form, .. } => (" Edit Alarm ", form),
    };

    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let meridiem = form.meridiem.to_tag();
    let mut lines = vec![Line::raw("")];
    lines.extend(form_field("Label", &form.label, form.editing_field == 0));
    lines.extend(form_field("Hour (1-12)", &form.hours, form.editing_field == 1));
    lines.extend(form_field("Minute (0-59)", &form.minutes, form.editing_field == 2));
    lines.extend(form_field("AM/PM (Space)", meridiem, form.editing_field == 3));
    lines.extend(form_field(
        "Repeat (Once, Weekend, or e.g. Mon, Wed)",
        &form.recurrence,
        form.editing_field == 4,
    ));
    lines.extend(form_field("Ringtone", &form.ringtone, form.editing_field == 5));
    lines.push(Line::styled(
        "Tab next field  ·  Ctrl+R import ringtone  ·  Enter save  ·  Esc cancel",
        hint_style(),
    ));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the ringtone import path prompt
pub fn render_ringtone_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(prompt) = &app.ringtone_prompt else {
        return;
    };

    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw("Path to an audio file to import:"),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(prompt.buffer.as_str(), modal_title_style()),
            Span::styled("█", modal_title_style()),
        ]),
        Line::raw(""),
        Line::styled("Enter import  ·  Esc cancel", hint_style()),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Import Ringtone ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the ringing alarm modal
pub fn render_ringing_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let ringing = app
        .widgets
        .iter()
        .filter_map(Widget::as_clock)
        .find_map(|clock| match &clock.session {
            RingSession::Ringing { alarm_id, label } => {
                let time = clock
                    .alarms
                    .iter()
                    .find(|a| a.id == *alarm_id)
                    .map(|a| a.time.to_string())
                    .unwrap_or_default();
                Some((label.clone(), time))
            }
            RingSession::Idle => None,
        });

    let Some((label, time)) = ringing else {
        return;
    };

    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled("  ⏰  ALARM  ⏰", ringing_style())),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(label, modal_title_style()),
            Span::raw("  "),
            Span::raw(time),
        ]),
        Line::raw(""),
        Line::styled("  s stop  ·  z sleep 10 min  ·  +/- volume", hint_style()),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Ringing ", modal_title_style()))
            .style(modal_bg_style()),
    );

    f.render_widget(paragraph, modal_area);
}

/// Render the clear-dashboard confirmation
pub fn render_confirm_clear(f: &mut Frame, area: Rect) {
    let modal_area = create_modal_area(area);
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw("  Remove every widget from the dashboard?"),
        Line::raw(""),
        Line::styled("  y yes  ·  n / Esc no", hint_style()),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Clear Dashboard ", modal_title_style()))
            .style(modal_bg_style()),
    );

    f.render_widget(paragraph, modal_area);
}
