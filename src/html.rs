//! Standalone HTML rendition of a [`PageView`], wired to the TableFilter widget.

use crate::i18n::{t, t_with_args};
use crate::loader::{self, DataSource};
use crate::pager::PAGE_SIZE;
use crate::render::{PageView, RowView, SelectOption, TableBody, ViewRenderer, COLUMNS};
use crate::state::{Action, ViewState, ViewStore};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

const TABLEFILTER_BASE: &str = "https://cdn.jsdelivr.net/npm/tablefilter@2.5.0/dist/tablefilter/";

/// Keeps the document for the most recent view.
pub struct HtmlExporter {
    generated_at: String,
    document: String,
}

impl HtmlExporter {
    pub fn new(generated_at: impl Into<String>) -> Self {
        Self {
            generated_at: generated_at.into(),
            document: String::new(),
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }
}

impl ViewRenderer for HtmlExporter {
    fn render(&mut self, view: &PageView) -> Result<()> {
        self.document = render_document(view, &self.generated_at);
        Ok(())
    }
}

/// Loads `source`, applies `actions`, and writes the resulting page to `output`.
///
/// A failed load still writes the error page before returning the error.
pub async fn export(source: &DataSource, actions: Vec<Action>, output: &Path) -> Result<()> {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let mut store = ViewStore::new(ViewState::loading(), HtmlExporter::new(generated_at))?;

    let result = loader::load(source).await;
    let failure = result.as_ref().err().map(|e| e.to_string());
    store.dispatch(Action::Loaded(result))?;
    for action in actions {
        store.dispatch(action)?;
    }

    tokio::fs::write(output, store.renderer().document())
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), "html export written");

    if let Some(message) = failure {
        bail!("{} ({})", t_with_args("status_load_failed", &[("source", &source.to_string())]), message);
    }
    println!("Wrote {}", output.display());
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_document(view: &PageView, generated_at: &str) -> String {
    let title = html_escape(&t("app_title"));
    let (total_videos, total_runtime) = match &view.summary {
        Some(summary) => (summary.total_videos.to_string(), summary.total_runtime.clone()),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <script src="{base}tablefilter.js"></script>
</head>
<body>
<div class="container my-4">
    <h1>{title}</h1>
    <p class="text-muted">{generated}</p>
    <div class="row mb-3">
        <div class="col">{total_videos_label}: <strong id="totalVideos">{total_videos}</strong></div>
        <div class="col">{total_runtime_label}: <strong id="totalRuntime">{total_runtime}</strong></div>
    </div>
    <div class="row g-2 mb-3">
        <div class="col-md-3"><select id="yearFilter" class="form-select" multiple>{year_options}</select></div>
        <div class="col-md-3"><select id="formatFilter" class="form-select" multiple>{format_options}</select></div>
        <div class="col-md-4"><input id="searchInput" class="form-control" type="text" placeholder="{placeholder}" value="{search}"></div>
        <div class="col-md-2"><button id="resetFilters" class="btn btn-outline-secondary w-100">{reset}</button></div>
    </div>
    <table id="gamesTable" class="table table-striped">
        <thead><tr>{header}</tr></thead>
        <tbody>
{body}        </tbody>
    </table>
    <div class="d-flex align-items-center gap-3">
        <button id="prevPage" class="btn btn-sm btn-outline-secondary"{prev_disabled}>{previous}</button>
        <span id="pageInfo">{page_info}</span>
        <button id="nextPage" class="btn btn-sm btn-outline-secondary"{next_disabled}>{next}</button>
        <span id="itemCount" class="ms-auto">{item_count}</span>
    </div>
</div>
{script}
</body>
</html>
"#,
        lang = html_escape(&t("html_lang")),
        base = TABLEFILTER_BASE,
        generated = html_escape(&t_with_args("export_generated", &[("time", generated_at)])),
        total_videos_label = html_escape(&t("total_videos")),
        total_runtime_label = html_escape(&t("total_runtime")),
        year_options = options_html(&view.year_options, "all_years"),
        format_options = options_html(&view.format_options, "all_formats"),
        placeholder = html_escape(&t("search_placeholder")),
        search = html_escape(&view.search),
        reset = html_escape(&t("button_reset")),
        header = COLUMNS
            .iter()
            .map(|key| format!("<th>{}</th>", html_escape(&t(key))))
            .collect::<String>(),
        body = body_html(&view.body),
        prev_disabled = if view.previous_enabled { "" } else { " disabled" },
        next_disabled = if view.next_enabled { "" } else { " disabled" },
        previous = html_escape(&t("button_previous")),
        next = html_escape(&t("button_next")),
        page_info = html_escape(&view.page_info()),
        item_count = html_escape(&view.item_count_text()),
        script = if matches!(view.body, TableBody::Rows(_)) {
            tablefilter_script()
        } else {
            String::new()
        },
    )
}

fn options_html(options: &[SelectOption], all_key: &str) -> String {
    options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                html_escape(&option.value),
                if option.selected { " selected" } else { "" },
                html_escape(&option.label(all_key))
            )
        })
        .collect()
}

fn body_html(body: &TableBody) -> String {
    let colspan = COLUMNS.len();
    match body {
        TableBody::Loading => format!(
            "            <tr><td colspan=\"{}\" class=\"text-center\">{}</td></tr>\n",
            colspan,
            html_escape(&t("loading"))
        ),
        TableBody::Failed(_) => format!(
            "            <tr><td colspan=\"{}\" class=\"text-center text-danger\">{}</td></tr>\n",
            colspan,
            html_escape(&t("load_error"))
        ),
        TableBody::NoResults => format!(
            "            <tr><td colspan=\"{}\" class=\"text-center\">{}</td></tr>\n",
            colspan,
            html_escape(&t("no_results"))
        ),
        TableBody::Rows(rows) => rows.iter().map(row_html).collect(),
    }
}

fn row_html(row: &RowView) -> String {
    let cell = |key: &str, content: String| {
        format!("<td data-label=\"{}\">{}</td>", html_escape(&t(key)), content)
    };
    let link = |text: &str, href: &str| {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            html_escape(href),
            html_escape(text)
        )
    };
    let tags: String = row
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="badge bg-secondary">{}</span>"#, html_escape(tag)))
        .collect();

    let cells = [
        cell("column_year", html_escape(&row.year)),
        cell("column_rank", html_escape(&row.rank)),
        cell("column_title", link(&row.title.text, &row.title.href)),
        cell("column_channel", link(&row.channel.text, &row.channel.href)),
        cell("column_tags", tags),
        cell("column_runtime", html_escape(&row.run_time)),
        cell("column_uploaded", html_escape(&row.upload_date)),
        cell("column_format", html_escape(&row.format)),
    ];
    format!("            <tr>{}</tr>\n", cells.concat())
}

/// Init script for the external TableFilter widget; its paging matches ours.
fn tablefilter_script() -> String {
    format!(
        r#"<script>
    var tf = new TableFilter('gamesTable', {{
        base_path: '{base}',
        col_0: 'select',
        col_1: 'select',
        col_7: 'select',
        alternate_rows: true,
        rows_counter: true,
        btn_reset: true,
        status_bar: true,
        msg_filter: 'Filtering...',
        paging: {{
            results_per_page: {page_size},
            css: {{
                page_btn: 'btn btn-sm btn-outline-secondary',
                page_btn_active: 'active',
                page_btn_disabled: 'disabled'
            }}
        }}
    }});
    tf.init();
</script>"#,
        base = TABLEFILTER_BASE,
        page_size = PAGE_SIZE
    )
}
