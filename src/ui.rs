use crate::achievements::{Achievement, AchievementBook};
use crate::calendar::MonthView;
use crate::format::{format_clock, format_duration};
use crate::journal::TodaySummary;
use crate::records::local_date_of;
use crate::themes::Theme;
use crate::timer::{TimerPhase, TimerSnapshot, CATEGORIES, QUICK_SUMMARIES};
use chrono::{Local, TimeZone};
use std::fmt::Write;

pub struct IndexPage<'a> {
    pub theme: &'static Theme,
    pub view: &'a MonthView,
    pub summary: TodaySummary,
    pub timer: TimerSnapshot,
    pub achievements: &'a AchievementBook,
}

/// Fragments carrying user text are substituted last, and `escape_html`
/// neutralises braces, so user text never forms a placeholder.
pub fn render_index(page: &IndexPage<'_>) -> String {
    INDEX_HTML
        .replace("{{THEME}}", page.theme.id)
        .replace("{{MONTH}}", &page.view.month)
        .replace("{{TOTAL}}", &page.summary.total_count.to_string())
        .replace("{{TODAY_COUNT}}", &page.summary.today_count.to_string())
        .replace("{{TODAY_MESSAGE}}", page.summary.message)
        .replace("{{CALENDAR}}", &render_calendar(page.view))
        .replace("{{SELECTED}}", &page.view.selected_date)
        .replace("{{UNLOCKED}}", &page.achievements.unlocked_count().to_string())
        .replace("{{ACHIEVEMENT_TOTAL}}", &page.achievements.all().len().to_string())
        .replace("{{ACHIEVEMENTS}}", &render_achievements(page.achievements.all()))
        .replace("{{TIMER}}", &render_timer(&page.timer))
        .replace("{{RECORDS}}", &render_records(page.view))
}

fn render_calendar(view: &MonthView) -> String {
    let mut html = String::new();
    for week in view.weeks() {
        html.push_str("<tr>");
        for day in week {
            let mut classes = vec!["day"];
            if !day.is_current_month {
                classes.push("other-month");
            }
            if day.is_today {
                classes.push("today");
            }
            if day.is_selected {
                classes.push("selected");
            }
            let badge = if day.mistake_count > 0 {
                format!(r#"<span class="badge">{}</span>"#, day.mistake_count)
            } else {
                String::new()
            };
            let _ = write!(
                html,
                r#"<td><form method="post" action="/calendar/select"><input type="hidden" name="date" value="{date}" /><button class="{classes}" type="submit">{dom}{badge}</button></form></td>"#,
                date = day.date,
                classes = classes.join(" "),
                dom = day.day_of_month,
            );
        }
        html.push_str("</tr>");
    }
    html
}

fn render_records(view: &MonthView) -> String {
    if view.selected_records.is_empty() {
        return r#"<p class="hint">No mistakes recorded on this day.</p>"#.to_string();
    }
    let mut html = String::from("<ul class=\"records\">");
    for record in &view.selected_records {
        let started = Local
            .timestamp_millis_opt(record.start_time)
            .single()
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default();
        let duration = record
            .duration
            .map(format_duration)
            .unwrap_or_else(|| "in progress".to_string());
        let _ = write!(
            html,
            r#"<li><strong>{category}</strong> <span class="muted">{started} · {duration}</span><p>{summary}</p></li>"#,
            category = escape_html(&record.category),
            summary = escape_html(&record.summary),
        );
    }
    html.push_str("</ul>");
    html
}

fn render_timer(timer: &TimerSnapshot) -> String {
    let Some(session) = &timer.session else {
        return r#"<form method="post" action="/timer/open"><button class="primary" type="submit">Start a mistake timer</button></form>"#.to_string();
    };

    let started_on = local_date_of(session.start_time);
    let clock = format!(
        r#"<div class="clock" id="clock" data-start="{start}" data-running="{running}">{elapsed}</div><p class="muted">Started {started_on}</p>"#,
        start = session.start_time,
        running = timer.phase == TimerPhase::Running,
        elapsed = format_clock(session.elapsed_seconds),
    );

    match timer.phase {
        TimerPhase::Running => format!(
            r#"{clock}<div class="row"><form method="post" action="/timer/stop"><button class="primary" type="submit">Stop</button></form><form method="post" action="/timer/discard"><button type="submit">Cancel</button></form></div>"#
        ),
        _ => {
            let categories: String = CATEGORIES
                .iter()
                .map(|category| {
                    let selected = if *category == session.category { " selected" } else { "" };
                    let category = escape_html(category);
                    format!(r#"<option value="{category}"{selected}>{category}</option>"#)
                })
                .collect();
            let quick: String = QUICK_SUMMARIES
                .iter()
                .map(|summary| {
                    let summary = escape_html(summary);
                    format!(r#"<option value="{summary}"></option>"#)
                })
                .collect();
            format!(
                r#"{clock}<form method="post" action="/timer/save" class="save"><label>Category <select name="category">{categories}</select></label><label>Summary <input name="summary" list="quick-summaries" value="{draft}" placeholder="What happened?" /></label><datalist id="quick-summaries">{quick}</datalist><button class="primary" type="submit">Save</button></form><form method="post" action="/timer/discard"><button type="submit">Discard</button></form>"#,
                draft = escape_html(&session.draft_summary),
            )
        }
    }
}

fn render_achievements(achievements: &[Achievement]) -> String {
    achievements
        .iter()
        .map(|achievement| {
            format!(
                r#"<li class="{state}"><strong>{name}</strong><span class="muted">{description}</span></li>"#,
                state = if achievement.unlocked { "unlocked" } else { "locked" },
                name = achievement.name,
                description = achievement.description,
            )
        })
        .collect()
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mistake Journal</title>
  <style>
    :root, .theme-default { --bg: #f5f6fb; --card: #ffffff; --ink: #22223b; --muted: #7a7a90; --accent: #4f46e5; --mark: #ef4444; }
    .theme-dark { --bg: #111827; --card: #1f2937; --ink: #f3f4f6; --muted: #9ca3af; --accent: #818cf8; --mark: #f87171; }
    .theme-pastel { --bg: #fdf2f8; --card: #fffafd; --ink: #4a3f55; --muted: #a08aa8; --accent: #c084fc; --mark: #f472b6; }
    .theme-nature { --bg: #f0fdf4; --card: #ffffff; --ink: #1f3b2c; --muted: #6b8f71; --accent: #15803d; --mark: #b45309; }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 24px;
    }

    header { grid-column: 1 / -1; }
    h1 { margin: 0; }

    .card {
      background: var(--card);
      border-radius: 18px;
      padding: 20px;
      box-shadow: 0 12px 32px rgba(0, 0, 0, 0.08);
    }

    .muted, .hint { color: var(--muted); font-size: 0.9rem; }
    .row { display: flex; gap: 10px; }

    button {
      border: 1px solid var(--muted);
      background: transparent;
      color: var(--ink);
      border-radius: 10px;
      padding: 8px 14px;
      cursor: pointer;
    }

    button.primary { background: var(--accent); border-color: var(--accent); color: white; }

    table { width: 100%; border-collapse: collapse; }
    th { color: var(--muted); font-weight: 500; padding: 4px; }
    td { padding: 2px; }
    td form { margin: 0; }

    .day { width: 100%; height: 56px; position: relative; text-align: left; vertical-align: top; }
    .day.other-month { opacity: 0.45; }
    .day.today { border: 2px solid var(--accent); }
    .day.selected { box-shadow: 0 0 0 2px var(--accent); }

    .badge {
      position: absolute;
      bottom: 4px;
      right: 4px;
      background: var(--mark);
      color: white;
      border-radius: 999px;
      font-size: 0.75rem;
      padding: 0 6px;
    }

    .clock { font-size: 2.4rem; font-variant-numeric: tabular-nums; }
    .save { display: grid; gap: 10px; margin-bottom: 10px; }
    .records, .achievements { list-style: none; padding: 0; display: grid; gap: 10px; }
    .achievements li { display: grid; }
    .achievements .locked { opacity: 0.4; }
  </style>
</head>
<body class="theme-{{THEME}}">
  <main class="app">
    <header>
      <h1>Mistake Journal</h1>
      <p class="muted">Log the little slips, look back, and grow. {{TOTAL}} recorded so far.</p>
    </header>

    <section class="card">
      <div class="row">
        <form method="post" action="/calendar/prev"><button type="submit">&lsaquo;</button></form>
        <h2 style="margin: 0 auto;">{{MONTH}}</h2>
        <form method="post" action="/calendar/next"><button type="submit">&rsaquo;</button></form>
      </div>
      <table>
        <thead><tr><th>Sun</th><th>Mon</th><th>Tue</th><th>Wed</th><th>Thu</th><th>Fri</th><th>Sat</th></tr></thead>
        <tbody>{{CALENDAR}}</tbody>
      </table>
    </section>

    <section class="card">
      <h2>Timer</h2>
      {{TIMER}}
      <h2>Today</h2>
      <p>{{TODAY_COUNT}} today. {{TODAY_MESSAGE}}</p>
      <h2>{{SELECTED}}</h2>
      {{RECORDS}}
    </section>

    <section class="card">
      <h2>Achievements ({{UNLOCKED}}/{{ACHIEVEMENT_TOTAL}})</h2>
      <ul class="achievements">{{ACHIEVEMENTS}}</ul>
    </section>
  </main>

  <script>
    const clock = document.getElementById('clock');
    if (clock && clock.dataset.running === 'true') {
      const start = Number(clock.dataset.start);
      const pad = (value) => String(value).padStart(2, '0');
      setInterval(() => {
        const secs = Math.max(0, Math.floor((Date.now() - start) / 1000));
        clock.textContent = `${pad(Math.floor(secs / 3600))}:${pad(Math.floor((secs % 3600) / 60))}:${pad(secs % 60)}`;
      }, 1000);
    }
  </script>
</body>
</html>
"#;
