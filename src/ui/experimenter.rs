use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{body_and_legend, centered, render_legend, render_message, title_style};
use crate::app::App;
use crate::flow::{AuthField, ExportStatus, Page};

const PANEL_WIDTH: u16 = 64;

pub fn render_auth(app: &App, f: &mut Frame) {
    let Page::Auth(form) = &app.page else {
        return;
    };
    let (body, legend) = body_and_legend(f.area());
    let panel = centered(body, PANEL_WIDTH, 13);
    f.render_widget(Block::default().borders(Borders::ALL), panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(panel);

    f.render_widget(
        Paragraph::new(Span::styled("Вход", title_style())).alignment(Alignment::Center),
        chunks[0],
    );

    let field = |label: &str, value: String, focused: bool| {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(label.to_string()),
        )
    };
    f.render_widget(
        field("Логин", form.login_display(), form.focus == AuthField::Login),
        chunks[2],
    );
    f.render_widget(
        field("Пароль", form.password_display(), form.focus == AuthField::Password),
        chunks[3],
    );

    if form.failed {
        f.render_widget(
            Paragraph::new(Span::styled(
                "Неверный логин или пароль",
                Style::default().fg(Color::Red),
            ))
            .alignment(Alignment::Center),
            chunks[4],
        );
    }

    render_legend(
        f,
        legend,
        &[
            ("(esc) назад", true),
            ("(tab) поле", true),
            ("(f2) показать пароль", true),
            ("(enter) войти", form.can_submit()),
        ],
    );
}

pub fn render_test_list(app: &App, f: &mut Frame) {
    let Page::TestList { selected } = &app.page else {
        return;
    };
    let (body, legend) = body_and_legend(f.area());
    if !app.store.is_authenticated() {
        render_message(f, body, "Вы не авторизованы", "");
        return;
    }

    let runs = app.store.runs();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(body);

    f.render_widget(
        Paragraph::new(Span::styled(format!("Ваши тесты: {}", runs.len()), title_style())),
        chunks[0],
    );

    let rows: Vec<Row> = runs
        .iter()
        .map(|run| {
            let data = if run.has_data() { "есть данные" } else { "—" };
            Row::new(vec![
                Cell::from(format!("{}. {}", run.id, run.name)),
                Cell::from(run.created_at.format("%H:%M:%S").to_string()),
                Cell::from(data),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(10),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["Тест", "Создан", "Данные"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(Block::default().borders(Borders::ALL))
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    if !runs.is_empty() {
        state.select(Some((*selected).min(runs.len() - 1)));
    }
    f.render_stateful_widget(table, chunks[1], &mut state);

    render_legend(
        f,
        legend,
        &[
            ("(c) создать", true),
            ("(d) удалить", !runs.is_empty()),
            ("(enter) посмотреть", !runs.is_empty()),
            ("(l) выйти из аккаунта", true),
        ],
    );
}

pub fn render_test_detail(app: &App, f: &mut Frame) {
    let Page::TestDetail { id, status } = &app.page else {
        return;
    };
    let Some(run) = app.store.run(*id) else {
        return;
    };
    let (body, legend) = body_and_legend(f.area());
    let panel = centered(body, PANEL_WIDTH, 12);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(" Информация о тесте "),
        panel,
    );

    let mut lines = vec![
        Line::raw(format!("Название: {}", run.name)),
        Line::raw("Токен: ..."),
        Line::raw(""),
    ];
    if run.has_data() {
        lines.push(Line::styled("(e) Получить данные", title_style()));
    } else {
        lines.push(Line::raw("Нет данных"));
    }
    match status {
        Some(ExportStatus::Written(path)) => lines.push(Line::styled(
            format!("Сохранено: {}", path.display()),
            Style::default().fg(Color::Green),
        )),
        Some(ExportStatus::Failed(e)) => lines.push(Line::styled(
            format!("Ошибка: {}", e),
            Style::default().fg(Color::Red),
        )),
        None => {}
    }

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(1)])
        .split(panel);
    f.render_widget(
        Paragraph::new(lines).wrap(ratatui::widgets::Wrap { trim: true }),
        inner[0],
    );

    render_legend(f, legend, &[("(esc) назад", true)]);
}
