//! HTML rendering of the landing page and the view pages
//!
//! Pages embed the first result of their view and re-query
//! `/api/views/{slug}` whenever a dropdown changes. Plotly.js comes from its
//! CDN.

use crate::dataset::DashboardData;
use crate::options::FilterKind;
use crate::views::{CauseRow, DASHBOARD_TITLE, NavLink, TableColumn, ViewBody, ViewFilters, ViewKind, ViewResult};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

const STYLE: &str = r#"
body { margin: 0; background: black; color: white; font-family: Arial, Helvetica, sans-serif; }
.bar { display: flex; align-items: center; gap: 40px; padding: 30px 40px; background: black; }
.filter { display: flex; align-items: center; gap: 20px; }
.filter select { width: 300px; padding: 8px; background: fuchsia; color: black; font-weight: bold; border: none; border-radius: 4px; }
.nav { margin-left: auto; display: flex; gap: 20px; }
.button { display: inline-block; padding: 10px 20px; background: fuchsia; color: white; border-radius: 6px; font-size: 16px; font-weight: bold; text-decoration: none; }
h1, h2 { text-align: center; color: fuchsia; margin: 20px 0; }
h2 { font-size: 40px; }
#chart { width: 90vw; height: 75vh; margin: 0 auto 40px auto; }
table { margin: 0 auto 40px auto; border-collapse: collapse; width: 90vw; }
th { background: fuchsia; color: white; font-weight: bold; text-align: left; padding: 8px; }
td { background: black; color: white; text-align: left; padding: 8px; border-bottom: 1px solid #333; }
.landing { min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; }
.landing h3 { color: white; margin: 20px 0; }
"#;

const SCRIPT: &str = r#"
(function () {
  const state = window.DASHBOARD;
  const chart = document.getElementById('chart');

  function renderTable(body) {
    const table = document.createElement('table');
    const head = table.createTHead().insertRow();
    body.columns.forEach(function (column) {
      const th = document.createElement('th');
      th.textContent = column.name;
      head.appendChild(th);
    });
    const tbody = table.createTBody();
    body.rows.forEach(function (row) {
      const tr = tbody.insertRow();
      body.columns.forEach(function (column) {
        tr.insertCell().textContent = row[column.id];
      });
    });
    chart.replaceChildren(table);
  }

  function render(result) {
    if (result.body.type === 'figure') {
      Plotly.react(chart, result.body.figure.data, result.body.figure.layout, { responsive: true });
    } else {
      renderTable(result.body);
    }
  }

  function refresh() {
    const params = new URLSearchParams();
    document.querySelectorAll('select[data-filter]').forEach(function (select) {
      if (select.value) { params.set(select.name, select.value); }
    });
    const query = params.toString();
    history.replaceState(null, '', window.location.pathname + (query ? '?' + query : ''));
    fetch('/api/views/' + state.view + (query ? '?' + query : ''))
      .then(function (response) { return response.json(); })
      .then(function (result) {
        if (result.error) { console.error(result.error); return; }
        render(result);
      });
  }

  document.querySelectorAll('select[data-filter]').forEach(function (select) {
    select.addEventListener('change', refresh);
  });
  render(state.initial);
})();
"#;

/// Escape text for HTML content and attribute values
#[must_use]
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// JSON that is safe inside a `<script>` element
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn document(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n{head_extra}</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

fn link_button(link: &NavLink) -> String {
    format!(
        "<a class=\"button\" href=\"{}\">{}</a>",
        escape_html(link.href),
        escape_html(link.label)
    )
}

/// A dropdown with its empty choice first and the current selection marked
#[must_use]
pub fn render_select(filter: FilterKind, options: &[String], selected: Option<&str>) -> String {
    let selected = selected.map(str::trim).filter(|s| !s.is_empty());
    let mut html = format!(
        "<div class=\"filter\"><label for=\"filtro-{param}\">{label}:</label>\
         <select id=\"filtro-{param}\" name=\"{param}\" data-filter>",
        param = filter.param(),
        label = escape_html(filter.label()),
    );
    html.push_str(&format!(
        "<option value=\"\"{}>{}</option>",
        if selected.is_none() { " selected" } else { "" },
        escape_html(filter.placeholder())
    ));
    for option in options {
        let mark = if selected == Some(option.as_str()) { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{value}\"{mark}>{value}</option>",
            value = escape_html(option)
        ));
    }
    html.push_str("</select></div>");
    html
}

/// Server-side rendering of the cause table, replaced by the script on change
#[must_use]
pub fn render_table(columns: &[TableColumn], rows: &[CauseRow]) -> String {
    let mut html = String::from("<table><thead><tr>");
    for column in columns {
        html.push_str(&format!("<th>{}</th>", escape_html(column.name)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.codigo),
            escape_html(&row.causa),
            row.casos
        ));
    }
    html.push_str("</tbody></table>");
    html
}

/// Title page with the entry link into the tour
#[must_use]
pub fn landing_page() -> String {
    let entry = NavLink {
        href: ViewKind::TOUR[0].path(),
        label: "Ingresar",
    };
    let body = format!(
        "<div class=\"landing\">\n<h1>{title}</h1>\n\
         <h3>Aplicación web interactiva para el análisis de mortalidad en Colombia</h3>\n\
         <p>{entry}</p>\n</div>\n",
        title = escape_html(DASHBOARD_TITLE),
        entry = link_button(&entry),
    );
    document(DASHBOARD_TITLE, "", &body)
}

/// Page of one view with its dropdowns, navigation and first result
pub fn view_page(data: &DashboardData, result: &ViewResult, filters: &ViewFilters) -> serde_json::Result<String> {
    let view = result.view;

    let mut bar = String::from("<div class=\"bar\">");
    for filter in view.filters() {
        bar.push_str(&render_select(
            *filter,
            data.options(view.table(), *filter),
            filters.get(*filter),
        ));
    }
    bar.push_str("<div class=\"nav\">");
    if let Some(previous) = view.previous() {
        bar.push_str(&link_button(&previous));
    }
    bar.push_str(&link_button(&view.next()));
    bar.push_str("</div></div>\n");

    let content = match &result.body {
        ViewBody::Table { columns, rows } => render_table(columns, rows),
        ViewBody::Figure { .. } => String::new(),
    };

    let state = serde_json::json!({ "view": view.slug(), "initial": result });
    let body = format!(
        "{bar}<h2>{heading}</h2>\n<div id=\"chart\">{content}</div>\n\
         <script>window.DASHBOARD = {state};</script>\n<script>{SCRIPT}</script>\n",
        heading = escape_html(view.heading()),
        state = script_json(&serde_json::to_string(&state)?),
    );
    let head = format!("<script src=\"{PLOTLY_CDN}\"></script>\n");

    Ok(document(&format!("{} | {DASHBOARD_TITLE}", view.heading()), &head, &body))
}
