// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Layout, panel, footer, help, and style helpers used by TUI rendering.
fn stack_main_panes_vertically(area: Rect) -> bool {
    area.width < 90
}

fn footer_uses_compact_mode(area: Rect) -> bool {
    area.width < 120
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Functions,
    Diagram,
    Links,
}

impl Focus {
    fn cycle(self) -> Self {
        match self {
            Self::Functions => Self::Diagram,
            Self::Diagram => Self::Links,
            Self::Links => Self::Functions,
        }
    }

    fn cycle_back(self) -> Self {
        match self {
            Self::Functions => Self::Links,
            Self::Diagram => Self::Functions,
            Self::Links => Self::Diagram,
        }
    }
}

fn panel_border_style(active: Focus, panel: Focus) -> Style {
    if active != panel {
        return Style::default();
    }

    Style::default().fg(FOCUS_COLOR)
}

fn cursor_highlight_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn diagram_view_title(key: Option<&str>, zoom: Zoom, is_focused: bool) -> Line<'static> {
    let key_color = if is_focused { Color::White } else { Color::Gray };
    Line::from(vec![
        Span::raw("─[2]─ Diagram ".to_owned()),
        Span::styled(format!("[{zoom}]"), Style::default().fg(Color::LightGreen)),
        Span::raw(" ".to_owned()),
        Span::styled(key.unwrap_or("—").to_owned(), Style::default().fg(key_color)),
        Span::raw(" ".to_owned()),
    ])
}

fn render_function_list(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let mut items = Vec::<ListItem<'static>>::new();
    let mut cursor_row = None;
    let mut function_count = 0usize;
    for group in app.visible_groups() {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("▾ {}", group.package_name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))));
        for record in group.records {
            if function_count == app.list_cursor {
                cursor_row = Some(items.len());
            }
            let is_active = app.active_item.as_ref() == Some(record.key());
            let (marker, name_style) = if is_active {
                ("▶ ", Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(Color::White))
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(FOCUS_COLOR)),
                Span::styled(record.display_name(), name_style),
            ];
            if let Some(excerpt) = record.comment_excerpt(COMMENT_EXCERPT_CHARS) {
                spans.push(Span::styled(
                    format!("  {excerpt}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            items.push(ListItem::new(Line::from(spans)));
            function_count += 1;
        }
    }
    if items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "No matching functions",
            Style::default().fg(Color::DarkGray),
        ))));
    }

    let query = app.navigator.search_query();
    let suffix = if query.is_empty() {
        format!("({function_count})")
    } else {
        format!("/{query} ({function_count})")
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Functions", '1', Some(&suffix)))
                .border_style(panel_border_style(app.focus, Focus::Functions)),
        )
        .highlight_style(cursor_highlight_style(app.focus == Focus::Functions));
    app.list_state.select(cursor_row);
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_diagram(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    app.diagram_viewport_height = area.height.saturating_sub(2);
    let title = diagram_view_title(
        app.navigator.current().map(FunctionKey::as_str),
        app.navigator.zoom(),
        app.focus == Focus::Diagram,
    );
    let diagram = Paragraph::new(diagram_text(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(panel_border_style(app.focus, Focus::Diagram)),
        )
        .scroll((app.diagram_scroll, 0));
    frame.render_widget(diagram, area);
}

fn diagram_text(app: &App) -> Text<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    if app.navigator.current().is_none() {
        return welcome_text(app);
    }
    if let Some(message) = &app.render_error {
        return Text::from(vec![
            Line::from(Span::styled(
                "Diagram rendering failed",
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )),
            Line::from(message.clone()),
            Line::from(String::new()),
            Line::from(Span::styled("The function list and links still work.", dim)),
        ]);
    }
    if app.rendering {
        return Text::from(Line::from(Span::styled("Rendering…", dim)));
    }

    let lines = app
        .diagram_lines
        .iter()
        .map(|line| {
            let style = if line.contains('↗') {
                Style::default().fg(Color::Cyan)
            } else if line.contains('↺') {
                dim
            } else {
                Style::default()
            };
            Line::from(Span::styled(line.clone(), style))
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn welcome_text(app: &App) -> Text<'static> {
    let dataset = app.navigator.dataset();
    let packages = dataset.packages().len();
    let key_style = help_key_style();
    Text::from(vec![
        Line::from(Span::styled("Call-flow catalogue", help_header_style())),
        Line::from(format!("{} functions in {packages} packages", dataset.len())),
        Line::from(String::new()),
        help_kv("Enter", "open the function under the cursor", 5, key_style),
        help_kv("m", "open the entry point", 5, key_style),
        help_kv("/", "search functions", 5, key_style),
        help_kv("#", "go to a #fragment", 5, key_style),
        help_kv("?", "all keys", 5, key_style),
    ])
}

fn render_info(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let text = match &app.info {
        Some(info) => {
            let description = match &info.description {
                Some(description) => Line::from(description.clone()),
                None => Line::from(Span::styled(
                    "No description",
                    dim.add_modifier(Modifier::ITALIC),
                )),
            };
            Text::from(vec![
                Line::from(Span::styled(
                    info.title.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                description,
                Line::from(String::new()),
                Line::from(vec![
                    Span::styled("Package: ", dim),
                    Span::raw(info.package_name.clone()),
                ]),
                Line::from(vec![Span::styled("File: ", dim), Span::raw(info.file_name.clone())]),
            ])
        }
        None => Text::from(Line::from(Span::styled("No function selected", dim))),
    };
    let info = Paragraph::new(text)
        .style(Style::default().fg(INFO_COLOR))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("─ Info "));
    frame.render_widget(info, area);
}

fn render_links(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let items = app
        .links
        .iter()
        .map(|entry| {
            let style = match entry {
                LinkEntry::Diagram { .. } => Style::default().fg(Color::Cyan),
                LinkEntry::Callee { resolved: Some(_), .. } => Style::default().fg(Color::White),
                LinkEntry::Callee { resolved: None, .. } => Style::default().fg(Color::DarkGray),
                LinkEntry::Caller(_) => Style::default().fg(Color::LightBlue),
            };
            ListItem::new(Line::from(Span::styled(entry.text(), style)))
        })
        .collect::<Vec<_>>();

    let diagram_links = app.label_links.len();
    let callees = app.relations.callees.len();
    let mut suffix = format!("{diagram_links} diagram · {callees} calls");
    if app.show_callers {
        suffix.push_str(&format!(" · {} callers", app.relations.callers.len()));
    }
    let cursor = (!app.links.is_empty()).then_some(app.links_cursor);
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Links", '3', Some(&suffix)))
                .border_style(panel_border_style(app.focus, Focus::Links)),
        )
        .highlight_style(cursor_highlight_style(app.focus == Focus::Links));
    app.links_state.select(cursor);
    frame.render_stateful_widget(list, area, &mut app.links_state);
}

fn toast_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Cyan,
        Severity::Success => Color::LightGreen,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::LightRed,
    }
}

fn push_toast_spans(spans: &mut Vec<Span<'static>>, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };
    if toast.expires_at <= Instant::now() {
        return;
    }
    spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(
        format!("{}: ", footer_label_ucfirst(toast.severity.as_str())),
        Style::default().fg(toast_color(toast.severity)),
    ));
    spans.push(Span::raw(toast.message.clone()));
}

fn footer_help_line(app: &App, compact: bool) -> Line<'static> {
    let mut spans = vec![Span::styled(
        app.breadcrumb.to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    let fragment = app.navigator.location().channel().read();
    spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled(format!("#{fragment}"), Style::default().fg(FOOTER_KEY_COLOR)));

    if !compact {
        match app.focus {
            Focus::Functions => push_footer_entry(&mut spans, "OPEN", "Enter"),
            Focus::Diagram => push_footer_entry(&mut spans, "SCROLL", "j/k"),
            Focus::Links => push_footer_entry(&mut spans, "FOLLOW", "Enter"),
        }
        push_footer_entry(&mut spans, "BACK", "⌫");
        push_footer_entry(&mut spans, "ZOOM", "+/-/0");
        push_footer_entry(&mut spans, "SEARCH", "/");
        push_footer_entry(&mut spans, "YANK", "y");
    }
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");
    push_toast_spans(&mut spans, app);

    Line::from(spans)
}

fn search_footer_line(app: &App) -> Line<'static> {
    let query = app.navigator.search_query();
    let mut spans = vec![
        Span::styled(
            "/".to_owned(),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw(query.to_owned()),
        Span::raw("   "),
    ];
    if !query.is_empty() {
        let matches = app.navigator.visible_keys().len();
        spans.push(Span::styled(matches.to_string(), Style::default().fg(Color::LightGreen)));
    }

    push_footer_entry_with_separator(&mut spans, "Accept", "Enter", " | ");
    push_footer_entry_with_separator(&mut spans, "Clear", "Esc", " | ");
    push_toast_spans(&mut spans, app);

    Line::from(spans)
}

fn prompt_footer_line(app: &App, input: &str) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            "#".to_owned(),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw(input.to_owned()),
        Span::raw("   "),
    ];
    push_footer_entry_with_separator(&mut spans, "Go", "Enter", " | ");
    push_footer_entry_with_separator(&mut spans, "Cancel", "Esc", " | ");
    push_toast_spans(&mut spans, app);

    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab/Shift-Tab", "cycle focus between list, diagram and links"),
            ("1/2/3", "focus list / diagram / links"),
            ("Backspace", "back to the previous function"),
            ("+ - 0", "zoom in / out / reset"),
            ("h", "home (welcome view)"),
            ("m", "open the entry point"),
            ("#", "go to a #fragment"),
            ("y", "yank the #fragment link (OSC 52)"),
            ("?", "toggle this help"),
            ("q", "quit"),
        ],
    ),
    (
        "Functions",
        &[
            ("j/k, ↑/↓", "move"),
            ("g/G", "first / last"),
            ("Enter", "open"),
            ("/", "search (Enter keeps the filter, Esc clears)"),
        ],
    ),
    ("Diagram", &[("j/k, PgUp/PgDn", "scroll"), ("Enter", "focus links")]),
    ("Links", &[("j/k, ↑/↓", "move"), ("Enter", "follow")]),
];

fn render_help(frame: &mut Frame<'_>, app: &App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = HELP_SECTIONS
        .iter()
        .flat_map(|(_, keys)| keys.iter())
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (idx, (section, keys)) in HELP_SECTIONS.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(String::new()));
        }
        lines.push(Line::from(Span::styled(format!("--- {section} ---"), header_style)));
        for (key, desc) in keys.iter() {
            lines.push(help_kv(key, desc, key_col_width, key_style));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Help (Esc/? to close) "))
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    push_footer_entry_with_separator(spans, label, value, " | ");
}

fn push_footer_entry_with_separator(
    spans: &mut Vec<Span<'static>>,
    label: &str,
    value: &str,
    separator: &'static str,
) {
    if !spans.is_empty() {
        spans.push(Span::styled(separator.to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
