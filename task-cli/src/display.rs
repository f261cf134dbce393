use task_cli::{Status, Task};

const HEADERS: [&str; 3] = ["ID", "Description", "Status"];

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Done => "✔",
        Status::InProgress => "⏳",
        Status::Todo => "❌",
    }
}

/// Renders tasks as a plain-text table, or a notice when there are none.
pub fn render_tasks<'a>(tasks: impl Iterator<Item = &'a Task>) -> String {
    let rows: Vec<[String; 3]> = tasks
        .map(|task| {
            [
                task.id().to_string(),
                task.description().to_string(),
                format!("{} {}", status_icon(task.status()), task.status()),
            ]
        })
        .collect();
    if rows.is_empty() {
        return "No tasks found".to_string();
    }

    let width = |column: usize| {
        rows.iter()
            .map(|row| row[column].chars().count())
            .chain([HEADERS[column].len()])
            .max()
            .unwrap_or_default()
    };
    let (id_width, description_width) = (width(0), width(1));
    let line = |cells: [&str; 3]| {
        format!(
            "{:<id_width$}  {:<description_width$}  {}",
            cells[0], cells[1], cells[2]
        )
    };

    let mut lines = vec![
        line(HEADERS),
        line(["-".repeat(id_width).as_str(), "-".repeat(description_width).as_str(), "------"]),
    ];
    lines.extend(
        rows.iter()
            .map(|row| line([row[0].as_str(), row[1].as_str(), row[2].as_str()])),
    );
    lines.join("\n")
}
