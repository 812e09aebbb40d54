//! Server-side HTML for the dashboard page.

use std::fmt::Write;

use crate::conversation::{Message, Role};
use crate::dashboard::{self, Accent, Difficulty};
use crate::responder::QUICK_SUGGESTIONS;
use crate::view::ViewState;

struct Palette {
    page: &'static str,
    card: &'static str,
    text: &'static str,
    muted: &'static str,
    border: &'static str,
    soft: &'static str,
}

const LIGHT: Palette = Palette {
    page: "linear-gradient(135deg, #e0f2fe, #eff6ff, #cffafe)",
    card: "#ffffff",
    text: "#111827",
    muted: "#4b5563",
    border: "#e5e7eb",
    soft: "#f9fafb",
};

const DARK: Palette = Palette {
    page: "linear-gradient(135deg, #111827, #1f2937, #111827)",
    card: "#1f2937",
    text: "#f9fafb",
    muted: "#9ca3af",
    border: "#374151",
    soft: "#374151",
};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn accent_color(accent: Accent) -> &'static str {
    match accent {
        Accent::Blue => "#2563eb",
        Accent::Green => "#16a34a",
        Accent::Red => "#dc2626",
        Accent::Orange => "#ea580c",
        Accent::Purple => "#9333ea",
    }
}

fn difficulty_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "#15803d",
        Difficulty::Moderate => "#a16207",
        Difficulty::Tough => "#b91c1c",
    }
}

/// Renders the full page. `session` is embedded for the page script; without
/// one the script creates a session and reloads.
pub fn render_dashboard(view: &ViewState, messages: &[Message], session: Option<&str>) -> String {
    let p = if view.is_dark() { &DARK } else { &LIGHT };
    let mut html = String::with_capacity(16 * 1024);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>AI Result Analyzer</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 0; background: {page}; color: {text}; min-height: 100vh; }}
        main {{ max-width: 1440px; margin: 0 auto; padding: 24px 32px; }}
        nav {{ background: {card}; border-bottom: 1px solid {border}; padding: 12px 32px; display: flex; align-items: center; justify-content: space-between; }}
        select, input {{ background: {soft}; color: {text}; border: 1px solid {border}; border-radius: 8px; padding: 8px 12px; }}
        button {{ border: none; border-radius: 8px; padding: 10px 18px; cursor: pointer; color: white; background: #2563eb; }}
        .card {{ background: {card}; border-radius: 12px; padding: 24px; margin-top: 32px; box-shadow: 0 1px 2px rgba(0,0,0,0.08); }}
        .grid {{ display: grid; gap: 24px; }}
        .muted {{ color: {muted}; font-size: 14px; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ padding: 10px 16px; text-align: left; border-bottom: 1px solid {border}; font-size: 14px; }}
        th {{ background: {soft}; color: {muted}; font-size: 12px; }}
        .bar {{ background: #2563eb; border-radius: 8px 8px 0 0; width: 48px; margin: 0 auto; }}
        .chat {{ position: fixed; background: {card}; border: 1px solid {border}; border-radius: 16px; display: flex; flex-direction: column; box-shadow: 0 20px 40px rgba(0,0,0,0.25); }}
        .chat.small {{ right: 24px; bottom: 24px; width: 380px; height: 540px; }}
        .chat.max {{ inset: 16px; }}
        .chat-head {{ background: linear-gradient(90deg, #2563eb, #1d4ed8); color: white; padding: 16px 20px; border-radius: 16px 16px 0 0; display: flex; justify-content: space-between; }}
        .chat-body {{ flex: 1; overflow-y: auto; padding: 16px; background: {soft}; }}
        .msg {{ max-width: 85%; border-radius: 16px; padding: 12px 16px; margin: 8px 0; font-size: 14px; }}
        .msg.user {{ background: #2563eb; color: white; margin-left: auto; }}
        .msg.bot {{ background: {card}; border: 1px solid {border}; }}
        .stat {{ display: flex; justify-content: space-between; background: rgba(37,99,235,0.1); border-radius: 8px; padding: 6px 12px; margin-top: 6px; font-size: 12px; }}
        .chip {{ background: rgba(37,99,235,0.1); color: #2563eb; border-radius: 999px; padding: 6px 12px; font-size: 12px; }}
        .fab {{ position: fixed; right: 24px; bottom: 24px; width: 56px; height: 56px; border-radius: 50%; font-size: 22px; }}
    </style>
</head>
<body>
"#,
        page = p.page,
        text = p.text,
        card = p.card,
        border = p.border,
        soft = p.soft,
        muted = p.muted,
    );

    render_navbar(&mut html, view);
    html.push_str("<main>\n");
    render_header(&mut html);
    render_kpis(&mut html);
    render_charts(&mut html, p);
    render_insights(&mut html);
    render_subjects(&mut html);
    render_quick_actions(&mut html);
    html.push_str("</main>\n");
    render_chat(&mut html, view, messages);
    render_script(&mut html, session);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_navbar(html: &mut String, view: &ViewState) {
    let header = dashboard::header();
    let profile = dashboard::profile();
    let filters = dashboard::filters();

    let _ = write!(html, "<nav>\n<strong>🎓 {}</strong>\n<div>", escape(header.brand));
    let _ = write!(html, r#"<select onchange="act('select_semester', this.value)">"#);
    for semester in &filters.semesters {
        let selected = if *semester == view.semester { " selected" } else { "" };
        let _ = write!(html, "<option{selected}>{}</option>", escape(semester));
    }
    html.push_str("</select> ");
    let _ = write!(html, r#"<select onchange="act('select_department', this.value)">"#);
    for department in &filters.departments {
        let selected = if *department == view.department { " selected" } else { "" };
        let _ = write!(html, "<option{selected}>{}</option>", escape(department));
    }
    html.push_str("</select></div>\n");

    let (icon, title) = if view.is_dark() {
        ("☀", "Switch to Light Mode")
    } else {
        ("☾", "Switch to Dark Mode")
    };
    let _ = write!(
        html,
        r#"<div><button title="{title}" onclick="act('toggle_theme')">{icon}</button> <span>{}</span> <span class="muted">{}</span> <b>{}</b></div>
</nav>
"#,
        escape(profile.name),
        escape(profile.role),
        escape(profile.initials),
    );
}

fn render_header(html: &mut String) {
    let header = dashboard::header();
    let _ = write!(
        html,
        "<div class=\"card\"><h1>{}</h1><p class=\"muted\">{}</p></div>\n",
        escape(header.title),
        escape(header.subtitle)
    );
}

fn render_kpis(html: &mut String) {
    html.push_str("<div class=\"grid\" style=\"grid-template-columns: repeat(5, 1fr);\">\n");
    for kpi in dashboard::kpis() {
        let _ = write!(
            html,
            "<div class=\"card\" style=\"border-left: 4px solid {};\"><p class=\"muted\">{}</p><p style=\"font-size: 24px; margin: 0;\">{}</p></div>\n",
            accent_color(kpi.accent),
            escape(kpi.title),
            escape(&kpi.value)
        );
    }
    html.push_str("</div>\n");
}

fn render_charts(html: &mut String, p: &Palette) {
    let charts = dashboard::charts();
    let peak = charts
        .grade_distribution
        .iter()
        .map(|b| b.students)
        .max()
        .unwrap_or(1)
        .max(1);

    html.push_str("<div class=\"grid\" style=\"grid-template-columns: 1fr 1fr;\">\n");
    html.push_str("<div class=\"card\"><h3>Grade Distribution</h3><div style=\"display: flex; align-items: flex-end; height: 300px; gap: 12px;\">");
    for bucket in &charts.grade_distribution {
        let height = bucket.students * 260 / peak;
        let _ = write!(
            html,
            "<div style=\"flex: 1; text-align: center;\" title=\"{} students\"><div class=\"bar\" style=\"height: {height}px;\"></div><span class=\"muted\">{}</span></div>",
            bucket.students,
            escape(bucket.grade)
        );
    }
    html.push_str("</div></div>\n");

    let total: u32 = charts.pass_fail.iter().map(|s| s.value).sum();
    let _ = write!(html, "<div class=\"card\"><h3>Pass vs Fail</h3><div style=\"display: flex; height: 40px; border-radius: 8px; overflow: hidden; border: 1px solid {};\">", p.border);
    for slice in &charts.pass_fail {
        let percent = if total > 0 {
            f64::from(slice.value) * 100.0 / f64::from(total)
        } else {
            0.0
        };
        let _ = write!(
            html,
            "<div style=\"width: {percent:.1}%; background: {}; color: white; text-align: center; line-height: 40px;\">{} {percent:.1}%</div>",
            slice.color,
            escape(slice.name)
        );
    }
    html.push_str("</div></div>\n</div>\n");
}

fn render_insights(html: &mut String) {
    html.push_str("<div class=\"card\"><h3>✨ AI Insights</h3><div class=\"grid\" style=\"grid-template-columns: repeat(3, 1fr);\">\n");
    for insight in dashboard::insights() {
        let _ = write!(
            html,
            "<div style=\"border: 1px solid {0}; border-radius: 8px; padding: 16px;\"><p class=\"muted\">{1}</p><p style=\"color: {0};\">{2}</p><p class=\"muted\">{3}</p></div>\n",
            accent_color(insight.accent),
            escape(insight.title),
            escape(insight.value),
            escape(insight.description)
        );
    }
    html.push_str("</div></div>\n");
}

fn render_subjects(html: &mut String) {
    html.push_str("<div class=\"card\"><h3>Subject-wise Performance</h3><table><thead><tr><th>Subject Code</th><th>Subject Name</th><th>Pass %</th><th>Fail %</th><th>Difficulty</th></tr></thead><tbody>\n");
    for subject in dashboard::subjects() {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td style=\"color: #16a34a;\">{}%</td><td style=\"color: #dc2626;\">{}%</td><td><span style=\"color: {};\">{}</span></td></tr>\n",
            escape(subject.code),
            escape(subject.name),
            subject.pass_percent,
            subject.fail_percent,
            difficulty_color(subject.difficulty),
            subject.difficulty.label()
        );
    }
    html.push_str("</tbody></table></div>\n");
}

fn render_quick_actions(html: &mut String) {
    html.push_str(
        r#"<div class="card"><h3>Quick Actions</h3>
<a href="/api/reports/summary.csv"><button>⬇ Download Summary</button></a>
<a href="/api/reports/subjects.csv"><button style="background: #16a34a;">📄 Export Subjects CSV</button></a>
<button style="background: #9333ea;" onclick="act('open_chat')">💬 Ask AI Chatbot</button>
</div>
"#,
    );
}

fn render_message(html: &mut String, message: &Message) {
    let class = match message.role {
        Role::User => "user",
        Role::Bot => "bot",
    };
    let _ = write!(html, "<div class=\"msg {class}\"><p>{}</p>", escape(&message.text));
    if let Some(stats) = &message.stats {
        for stat in stats {
            let _ = write!(
                html,
                "<div class=\"stat\"><span>{}</span><b>{}</b></div>",
                escape(&stat.label),
                escape(&stat.value)
            );
        }
    }
    if let Some(rows) = &message.table {
        html.push_str("<table><thead><tr><th>Name</th><th>Roll No</th><th>SGPA</th></tr></thead><tbody>");
        for row in rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&row.name),
                escape(&row.roll_no),
                escape(&row.sgpa)
            );
        }
        html.push_str("</tbody></table>");
    }
    html.push_str("</div>\n");
}

fn render_chat(html: &mut String, view: &ViewState, messages: &[Message]) {
    if !view.chat.open {
        html.push_str("<button class=\"fab\" title=\"Open assistant\" onclick=\"act('open_chat')\">💬</button>\n");
        return;
    }

    let size = if view.chat.maximized { "max" } else { "small" };
    let (max_icon, max_title) = if view.chat.maximized {
        ("🗗", "Restore")
    } else {
        ("🗖", "Maximize")
    };
    let _ = write!(
        html,
        r#"<div class="chat {size}">
<div class="chat-head"><div><b>AI Academic Assistant</b><br><small>Result Insights Bot</small></div>
<div><button title="{max_title}" onclick="act('toggle_maximized')">{max_icon}</button> <button title="Close" onclick="act('close_chat')">✕</button></div></div>
<div class="chat-body" id="chat-body">
"#
    );
    for message in messages {
        render_message(html, message);
    }
    html.push_str("</div>\n<div style=\"padding: 12px 16px;\">");
    for suggestion in QUICK_SUGGESTIONS {
        let escaped = escape(suggestion);
        let _ = write!(
            html,
            "<button class=\"chip\" onclick=\"document.getElementById('chat-input').value = '{escaped}'\">{escaped}</button> "
        );
    }
    html.push_str(
        r#"</div>
<div style="padding: 16px; display: flex; gap: 8px;">
<input id="chat-input" style="flex: 1;" placeholder="Ask for result insights…" onkeypress="if (event.key === 'Enter') send()">
<button onclick="send()">➤</button>
</div>
</div>
"#,
    );
}

fn render_script(html: &mut String, session: Option<&str>) {
    let session = session.map(escape).unwrap_or_default();
    let _ = write!(
        html,
        r#"<script>
    const sessionId = '{session}';

    async function ensureSession() {{
        if (sessionId) return;
        const response = await fetch('/api/sessions', {{ method: 'POST' }});
        const data = await response.json();
        window.location.replace('/?session=' + data.id);
    }}

    function restart() {{
        window.location.replace('/');
    }}

    async function act(action, value) {{
        const body = value === undefined ? {{ action }} : {{ action, value }};
        const response = await fetch('/api/sessions/' + sessionId + '/view', {{
            method: 'POST',
            headers: {{ 'Content-Type': 'application/json' }},
            body: JSON.stringify(body)
        }});
        if (response.status === 404) return restart();
        window.location.reload();
    }}

    async function send() {{
        const input = document.getElementById('chat-input');
        const text = input.value;
        if (!text.trim()) return;
        input.value = '';
        const posted = await fetch('/api/sessions/' + sessionId + '/messages', {{
            method: 'POST',
            headers: {{ 'Content-Type': 'application/json' }},
            body: JSON.stringify({{ text }})
        }});
        if (posted.status === 404 || posted.status === 409) return restart();
        if (!posted.ok) return window.location.reload();
        for (;;) {{
            await new Promise(resolve => setTimeout(resolve, 200));
            const response = await fetch('/api/sessions/' + sessionId + '/messages');
            if (!response.ok) return restart();
            const data = await response.json();
            if (data.status.state === 'idle' && data.status.queued === 0) break;
        }}
        window.location.reload();
    }}

    const body = document.getElementById('chat-body');
    if (body) body.scrollTop = body.scrollHeight;
    ensureSession();
</script>
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Conversation;
    use crate::responder::classify;
    use crate::view::ViewAction;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_closed_chat_shows_launcher_only() {
        let html = render_dashboard(&ViewState::default(), &[], Some("abc"));
        assert!(html.contains("Result Analysis Dashboard"));
        assert!(html.contains("87.2%"));
        assert!(html.contains("Discrete Mathematics"));
        assert!(html.contains("class=\"fab\""));
        assert!(!html.contains("id=\"chat-body\""));
        assert!(html.contains("const sessionId = 'abc';"));
    }

    #[test]
    fn test_script_checks_post_status() {
        let html = render_dashboard(&ViewState::default(), &[], Some("abc"));
        assert!(html.contains("if (posted.status === 404 || posted.status === 409) return restart();"));
        assert!(html.contains("if (!posted.ok) return window.location.reload();"));
        assert!(html.contains("if (!response.ok) return restart();"));
    }

    #[test]
    fn test_open_chat_renders_messages_and_tables() {
        let view = ViewState::default().apply(ViewAction::OpenChat).unwrap();
        let mut conversation = Conversation::seeded();
        conversation.push(Message::user("<script>failed</script>"));
        conversation.push(Message::bot(classify("failed")));

        let html = render_dashboard(&view, conversation.messages(), Some("abc"));
        assert!(html.contains("chat small"));
        assert!(html.contains("Rahul Krishnan"));
        assert!(html.contains("&lt;script&gt;failed&lt;/script&gt;"));
        assert!(html.contains("10 SGPA students"));
    }

    #[test]
    fn test_dark_theme_palette() {
        let view = ViewState::default().apply(ViewAction::ToggleTheme).unwrap();
        let html = render_dashboard(&view, &[], None);
        assert!(html.contains(DARK.card));
        assert!(html.contains("Switch to Light Mode"));
    }

    #[test]
    fn test_selected_options_marked() {
        let view = ViewState::default()
            .apply(ViewAction::SelectDepartment("Civil Engineering".to_string()))
            .unwrap();
        let html = render_dashboard(&view, &[], None);
        assert!(html.contains("<option selected>Civil Engineering</option>"));
        assert!(html.contains("<option selected>Semester 3</option>"));
    }
}
