use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{body_and_legend, centered, render_legend, render_message, title_style};
use crate::app::App;
use crate::assets;
use crate::flow::{calibration::COMPLETION_STEP, Corner, Page, ResultsVariant};
use crate::presenters::{PlacementPhase, Position};

const REGISTER_LABEL: &str = "[ Зарегистрироваться ]";
const ACCENT: Color = Color::Rgb(126, 168, 230);

pub fn render_start(_app: &App, f: &mut Frame) {
    let (body, legend) = body_and_legend(f.area());
    render_message(
        f,
        body,
        "Приветствуем в нашем приложении\nдля изучения UX!",
        "Далее Вам будет предложено пройти 2 задания по выбору подходящего места для кнопки \
         в интерфейсе, а также мы проверим вашу реакцию на различные рекламные баннеры",
    );
    render_legend(
        f,
        legend,
        &[("(enter) начать", true), ("(p) профиль", true), ("(esc) выход", true)],
    );
}

pub fn render_enter_name(app: &App, f: &mut Frame) {
    let Page::EnterName(field) = &app.page else {
        return;
    };
    let (body, legend) = body_and_legend(f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    render_message(
        f,
        chunks[0],
        "Но для начала нам нужно\nузнать Вас поближе\nи откалибровать айтрекер",
        "Введите свое имя",
    );

    let input = Paragraph::new(Line::from(vec![
        Span::raw(field.value().to_string()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, centered(chunks[1], 34, 3));

    render_legend(
        f,
        legend,
        &[("(esc) назад", true), ("(enter) далее", !field.is_blank())],
    );
}

pub fn render_calibration(app: &App, f: &mut Frame) {
    let Page::Calibration(calibration) = &app.page else {
        return;
    };
    let area = f.area();

    match calibration.corner() {
        Some(corner) => {
            // cat and dot travel together to the target corner
            let marker = Line::from(vec![
                Span::styled("●", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::raw(" =^.^="),
            ]);
            let width = marker.width() as u16;
            let x = match corner {
                Corner::TopLeft | Corner::BottomLeft => area.x,
                Corner::TopRight | Corner::BottomRight => area.right().saturating_sub(width),
            };
            let y = match corner {
                Corner::TopLeft | Corner::TopRight => area.y,
                Corner::BottomLeft | Corner::BottomRight => area.bottom().saturating_sub(1),
            };
            let rect = Rect::new(x, y, width.min(area.width), 1);
            f.render_widget(Paragraph::new(marker), rect);
        }
        None => {
            let (body, legend) = body_and_legend(area);
            if calibration.step() == COMPLETION_STEP {
                render_message(
                    f,
                    body,
                    "Калибровка завершена!",
                    "Теперь приступим к выполнению заданий",
                );
            } else {
                render_message(
                    f,
                    body,
                    "Приступим к калибровке айтрекера",
                    "Сейчас в разных частях экрана будет появляться красная точка. \
                     Смотрите на нее до тех пор, пока она не пропадет",
                );
            }
            render_legend(f, legend, &[("(←) назад", true), ("(→) далее", true)]);
        }
    }
}

pub fn render_task_hub(app: &App, f: &mut Frame) {
    let Page::TaskHub { is_first_task } = &app.page else {
        return;
    };
    let (body, legend) = body_and_legend(f.area());
    if *is_first_task {
        render_message(
            f,
            body,
            "Форма для регистрации",
            "Давайте представим, что вы хотите зарегистрироваться на некотором сайте. \
             В серой зоне Вам необходимо расположить кнопку регистрации среди остальных \
             типичных элементов формы регистрации. На следующей странице прочитайте задание, \
             подумайте, куда бы хотели расположить элемент, а затем нажмите кнопку \"Начать\". \
             После нажатия кнопки смотрите в нужную Вам точку в течение 5 секунд. Учитывайте, \
             что в располагаемой точке будет находиться середина элемента",
        );
        render_legend(f, legend, &[("(←) назад", true), ("(→) далее", true)]);
    } else {
        render_message(
            f,
            body,
            "Захват внимания",
            "Сейчас перед Вами на несколько секунд будут появляться различные рекламные \
             баннеры. От Вас не требуется каких-то специфических действий. После этого \
             задания мы покажем, насколько сильно рекламные баннеры захватили Ваше внимание \
             (с помощью саккад)",
        );
        render_legend(f, legend, &[("(→) далее", true)]);
    }
}

fn registration_form() -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Text::from(vec![
        Line::styled("Форма для регистрации", bold.fg(Color::White)),
        Line::raw(""),
        Line::raw("[ G  Вход с помощью Google ]"),
        Line::raw(""),
        Line::styled("Имя ____________________", bold),
        Line::raw(""),
        Line::styled("Фамилия ________________", bold),
        Line::raw(""),
        Line::styled("01.01.1975           [▦]", bold),
        Line::raw(""),
        Line::styled("Пол:   ○ Мужской  ○ Женский", bold),
    ])
    .alignment(Alignment::Center)
}

pub fn render_task1(app: &App, f: &mut Frame) {
    let Page::Task1 { task, .. } = &app.page else {
        return;
    };
    let area = f.area();
    let (body, legend) = body_and_legend(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(body);

    let form = Paragraph::new(registration_form())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().bg(Color::Rgb(40, 40, 40)));
    f.render_widget(form, columns[1]);

    let mut prompt = vec![
        Line::raw("Расположите, где считаете нужным,"),
        Line::styled("кнопку регистрации", title_style()),
        Line::raw(""),
    ];
    match task.phase() {
        PlacementPhase::NotStarted => {
            prompt.push(Line::styled(REGISTER_LABEL, Style::default().fg(ACCENT)));
            prompt.push(Line::raw(""));
            prompt.push(Line::styled(
                "[ Начать ] (s)",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
        PlacementPhase::Running => {
            let secs = task.seconds_left().unwrap_or_default();
            prompt.push(Line::styled(
                format!("{} сек", secs),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        }
        PlacementPhase::Finished => {}
    }
    let prompt = Paragraph::new(Text::from(prompt).alignment(Alignment::Center))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(prompt, centered(columns[0], 30, 9));

    if let Some(pos) = task.frozen() {
        render_overlay_button(f, area, pos);
        render_legend(f, legend, &[("(→) далее", true)]);
    }
}

/// Overlay button centred on the frozen position, kept on screen
fn render_overlay_button(f: &mut Frame, area: Rect, pos: Position) {
    let rect = overlay_rect(area, pos);
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Span::styled(
            REGISTER_LABEL,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        rect,
    );
}

fn overlay_rect(area: Rect, pos: Position) -> Rect {
    let width = (REGISTER_LABEL.width() as u16).min(area.width);
    let x = pos
        .x
        .saturating_sub(width / 2)
        .min(area.right().saturating_sub(width))
        .max(area.x);
    let y = pos.y.min(area.bottom().saturating_sub(1)).max(area.y);
    Rect::new(x, y, width, area.height.min(1))
}

pub fn render_task2(app: &App, f: &mut Frame) {
    let Page::Task2 { show, .. } = &app.page else {
        return;
    };
    let area = f.area();
    let Some(banner) = app.banners.get(show.current()) else {
        return;
    };
    let width = banner.lines().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let height = banner.lines().count() as u16 + 2;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {}/{} ", show.current() + 1, show.len()));
    let widget = Paragraph::new(*banner).block(block);
    f.render_widget(widget, centered(area, width, height));
}

pub fn render_final(_app: &App, f: &mut Frame) {
    let (body, legend) = body_and_legend(f.area());
    render_message(
        f,
        body,
        "Спасибо за участие!",
        "На этом задания подошли к концу. Вы можете пройти тестирование еще раз \
         или посмотреть визуализацию своих результатов.",
    );
    render_legend(f, legend, &[("(a) ещё раз", true), ("(r) результаты", true)]);
}

pub fn render_results(app: &App, f: &mut Frame) {
    let Page::Results(variant) = &app.page else {
        return;
    };
    let area = f.area();
    if !crate::flow::has_current_data(&app.store) {
        render_message(f, area, "Нет данных", "");
        return;
    }

    let (body, legend) = body_and_legend(area);
    let art = assets::results_art(*variant);
    let width = art.lines().map(|l| l.width()).max().unwrap_or(0) as u16 + 4;
    let height = art.lines().count() as u16 + 2;
    let title = match variant {
        ResultsVariant::Map => " Тепловая карта ",
        ResultsVariant::Saccade => " Саккады ",
    };
    let widget = Paragraph::new(art).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, centered(body, width, height));

    render_legend(
        f,
        legend,
        &[
            ("(←) назад", true),
            ("(→) далее", *variant == ResultsVariant::Map),
        ],
    );
}
