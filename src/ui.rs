use crate::events::Notification;
use crate::models::StateResponse;
use crate::progression::badge_icon;

pub fn render_index(state: &StateResponse, notifications: &[Notification]) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &state.date)
        .replace("{{LEVEL}}", &state.level.to_string())
        .replace("{{STREAK}}", &state.streak.to_string())
        .replace("{{FLAME}}", state.streak_tier.icon())
        .replace("{{PROGRESS}}", &state.progress_percent.to_string())
        .replace("{{TOTAL}}", &state.total_completed_tasks.to_string())
        .replace("{{TASKS}}", &render_tasks(state))
        .replace("{{BADGES}}", &render_badges(state))
        .replace("{{WEEK}}", &render_week(state))
        .replace("{{NOTIFICATIONS}}", &render_notifications(notifications))
}

fn render_tasks(state: &StateResponse) -> String {
    if state.tasks.is_empty() {
        return r#"<p class="empty">No tasks yet today.</p>"#.to_string();
    }

    state
        .tasks
        .iter()
        .map(|view| {
            let done = view.task.is_completed();
            format!(
                r#"<div class="task-row">
  <div><div class="task-name">{name}</div><div class="meta">{status}</div></div>
  <form method="post" action="/tasks/{id}/complete"><button class="btn-done" type="submit"{disabled}>{label}</button></form>
</div>"#,
                name = escape(&view.task.name),
                status = escape(&view.status),
                id = view.task.id,
                disabled = if done { " disabled" } else { "" },
                label = if done { "Done ✓" } else { "Done" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_badges(state: &StateResponse) -> String {
    if state.badges.is_empty() {
        return r#"<p class="empty">Finish a task to earn your first badge.</p>"#.to_string();
    }

    state
        .badges
        .iter()
        .map(|badge| {
            let icon = badge_icon(badge).unwrap_or("🏅");
            format!(r#"<span class="badge">{icon} {}</span>"#, escape(badge))
        })
        .collect()
}

fn render_week(state: &StateResponse) -> String {
    let max = state.week.iter().map(|point| point.on_time).max().unwrap_or(0).max(1);
    state
        .week
        .iter()
        .map(|point| {
            let height = point.on_time * 100 / max;
            format!(
                r#"<div class="bar"><span class="fill" style="height:{height}%"></span><span class="count">{}</span><span class="day">{}</span></div>"#,
                point.on_time, point.day
            )
        })
        .collect()
}

fn render_notifications(notifications: &[Notification]) -> String {
    notifications
        .iter()
        .rev()
        .take(5)
        .map(|n| {
            format!(
                r#"<li><strong>{}</strong> {}</li>"#,
                n.title,
                escape(&n.message)
            )
        })
        .collect()
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta http-equiv="refresh" content="60" />
  <title>Daily Habit Tracker</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #cba86a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    .subtitle, .meta, .empty {
      margin: 0;
      color: #5f5c57;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .task-row {
      display: flex;
      justify-content: space-between;
      align-items: center;
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
      margin-bottom: 8px;
    }

    .task-name {
      font-weight: 700;
    }

    button, input {
      border-radius: 999px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 10px 16px;
      font-size: 1rem;
    }

    button {
      background: var(--accent-2);
      color: white;
      cursor: pointer;
    }

    button[disabled] {
      opacity: 0.5;
      cursor: default;
    }

    .badge {
      display: inline-block;
      background: white;
      border-radius: 999px;
      padding: 6px 12px;
      margin: 0 6px 6px 0;
    }

    .week {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 10px;
      height: 160px;
      align-items: end;
    }

    .bar {
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
      height: 100%;
      gap: 4px;
    }

    .bar .fill {
      width: 100%;
      background: var(--accent);
      border-radius: 6px;
      min-height: 2px;
    }

    .btn-reset {
      background: #b44;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Daily Habit Tracker</h1>
      <p class="subtitle">{{DATE}}. Tasks clear at midnight; finish them before their deadline to keep the streak.</p>
    </header>

    <section class="panel">
      <div class="stat"><span class="label">Level</span><span class="value">{{LEVEL}}</span></div>
      <div class="stat"><span class="label">Streak</span><span class="value">{{FLAME}} {{STREAK}}</span></div>
      <div class="stat"><span class="label">Today</span><span class="value">{{PROGRESS}}%</span></div>
      <div class="stat"><span class="label">Completed</span><span class="value">{{TOTAL}}</span></div>
    </section>

    <section>
      <h2>Today's tasks</h2>
      {{TASKS}}
      <form method="post" action="/tasks">
        <input name="name" placeholder="Task name" required />
        <input name="deadline" type="time" required />
        <button type="submit">Create task</button>
      </form>
    </section>

    <section>
      <h2>Badges</h2>
      {{BADGES}}
    </section>

    <section>
      <h2>This week</h2>
      <div class="week">{{WEEK}}</div>
    </section>

    <section>
      <h2>Recent</h2>
      <ul>{{NOTIFICATIONS}}</ul>
    </section>

    <form method="post" action="/reset" onsubmit="return confirm('Reset all data?');">
      <input type="hidden" name="confirm" value="true" />
      <button class="btn-reset" type="submit">Reset everything</button>
    </form>
  </main>
</body>
</html>
"#;
