use super::report::views::{BarLayout, KeywordDetail};
use super::view::DashboardView;
use super::{FilterOptions, SpeechFilter};
use serde_json::Value;

const TITLE: &str = "国会ダッシュボード";

const STYLE: &str = r#"
body { font-family: "Hiragino Sans", "Noto Sans JP", sans-serif; margin: 0; color: #222; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 300px; background: #f8f9fa; padding: 1.5rem; box-sizing: border-box; }
.sidebar label { display: block; margin-top: 1rem; font-weight: bold; }
.sidebar input, .sidebar select { width: 100%; box-sizing: border-box; }
.main { flex: 1; padding: 1.5rem 2rem; overflow-x: auto; }
.main-header { background: linear-gradient(90deg, #1f4e79, #2e5c8a); color: white;
  padding: 1.5rem; border-radius: 10px; margin-bottom: 2rem; text-align: center; }
.metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.metric-container { background: #f8f9fa; padding: 1rem; border-radius: 8px;
  border-left: 4px solid #1f4e79; }
.metric-value { font-size: 1.6rem; font-weight: bold; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.chart { width: 100%; }
.notice { background: #fff3cd; padding: 1rem; border-radius: 8px; }
.info { background: #e7f1fb; padding: 1rem; border-radius: 8px; }
table { border-collapse: collapse; width: 100%; font-size: 0.9rem; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4rem; text-align: left; vertical-align: top; }
.vega-embed svg text { writing-mode: horizontal-tb !important; direction: ltr !important; }
footer { text-align: center; color: #666; padding: 2rem; }
"#;

/// Renders the full dashboard page. Charts are drawn client side by vega-embed.
pub fn render_page(view: &DashboardView) -> String {
    let mut html = String::with_capacity(32 * 1024);
    let mut scripts = String::new();

    html.push_str(&format!(
        "<!DOCTYPE html><html lang=\"ja\"><head><meta charset=\"utf-8\">\
         <title>{TITLE}</title><style>{STYLE}</style>\
         <script src=\"https://cdn.jsdelivr.net/npm/vega@5\"></script>\
         <script src=\"https://cdn.jsdelivr.net/npm/vega-lite@5\"></script>\
         <script src=\"https://cdn.jsdelivr.net/npm/vega-embed@6\"></script>\
         </head><body class=\"notranslate\"><div class=\"layout\">"
    ));

    render_sidebar(&mut html, view);

    html.push_str("<main class=\"main\">");
    html.push_str(&format!(
        "<div class=\"main-header\"><h1>🏛️ {TITLE}</h1>\
         <p>国会会議録から議論の全体像を可視化 ({} 件中 {} 件を表示)</p></div>",
        view.total_rows, view.filtered_rows
    ));

    render_metrics(&mut html, view);

    if view.filtered_rows == 0 {
        html.push_str(
            "<p class=\"notice\">⚠️ 選択された条件に該当するデータがありません。\
             フィルタ条件を見直してください。</p>",
        );
    } else {
        render_keywords(&mut html, &mut scripts, view);
        render_volume(&mut html, &mut scripts, view);
        render_latest(&mut html, view);
        if view.query.display.show_debug {
            render_debug(&mut html, view);
        }
    }

    html.push_str(
        "<footer><p>📊 <strong>国会ダッシュボード</strong> | \
         データソース: 国会会議録検索システム API</p></footer></main></div>",
    );
    html.push_str(&format!("<script>{scripts}</script></body></html>"));
    html
}

fn render_sidebar(html: &mut String, view: &DashboardView) {
    let filter = &view.query.filter;
    let options = &view.options;
    let display = &view.query.display;

    html.push_str(
        "<aside class=\"sidebar\"><form id=\"filters\" method=\"get\" action=\"/\">\
         <h2>🔍 フィルタ設定</h2>",
    );
    render_date_inputs(html, filter, options);

    html.push_str("<label for=\"house\">🏛️ 院選択</label>");
    render_multi_select(html, "house", &options.houses, &filter.houses);
    html.push_str("<label for=\"committee\">📋 委員会選択</label>");
    render_multi_select(html, "committee", &options.committees, &filter.committees);
    html.push_str("<label for=\"speaker\">👤 発言者選択</label>");
    render_multi_select(html, "speaker", &options.speakers, &filter.speakers);

    html.push_str(&format!(
        "<label for=\"q\">🔎 キーワード検索</label>\
         <input id=\"q\" name=\"q\" type=\"text\" value=\"{}\" \
         placeholder=\"例: 税制 消費税（スペース区切り）\">",
        escape(&filter.keywords.join(" "))
    ));

    html.push_str(&format!(
        "<h3>📊 表示設定</h3>\
         <label><input type=\"checkbox\" name=\"debug\" value=\"on\"{}> デバッグ情報を表示</label>\
         <label for=\"chart_height\">チャート高さ ({})</label>\
         <input id=\"chart_height\" name=\"chart_height\" type=\"range\" min=\"300\" max=\"800\" \
         step=\"50\" value=\"{}\">\
         <label for=\"max_items\">最大表示項目数 ({})</label>\
         <input id=\"max_items\" name=\"max_items\" type=\"range\" min=\"10\" max=\"50\" \
         step=\"5\" value=\"{}\">\
         <p><button type=\"submit\">適用</button></p></form></aside>",
        if display.show_debug { " checked" } else { "" },
        display.chart_height,
        display.chart_height,
        display.max_items,
        display.max_items
    ));
}

fn render_date_inputs(html: &mut String, filter: &SpeechFilter, options: &FilterOptions) {
    let (Some(min), Some(max)) = (options.date_min, options.date_max) else {
        html.push_str("<p class=\"notice\">日付データが不正です</p>");
        return;
    };

    let from = filter.from.unwrap_or(min);
    let until = filter.until.unwrap_or(max);
    html.push_str(&format!(
        "<label for=\"from\">📅 期間選択</label>\
         <input id=\"from\" name=\"from\" type=\"date\" min=\"{min}\" max=\"{max}\" value=\"{from}\">\
         <input id=\"until\" name=\"until\" type=\"date\" min=\"{min}\" max=\"{max}\" value=\"{until}\">"
    ));
}

fn render_multi_select(html: &mut String, name: &str, options: &[String], selected: &[String]) {
    html.push_str(&format!(
        "<select id=\"{name}\" name=\"{name}\" multiple size=\"{}\">",
        options.len().clamp(2, 8)
    ));
    for option in options {
        let mark = if selected.contains(option) {
            " selected"
        } else {
            ""
        };
        let value = escape(option);
        html.push_str(&format!("<option value=\"{value}\"{mark}>{value}</option>"));
    }
    html.push_str("</select>");
}

fn render_metrics(html: &mut String, view: &DashboardView) {
    let metrics = &view.report.metrics;
    let tiles = [
        ("📝 総発言数", format!("{}件", group_digits(metrics.speeches))),
        ("👥 発言者数", format!("{}人", group_digits(metrics.speakers))),
        ("📊 総文字数", format!("{}文字", group_digits(metrics.characters))),
        ("🏢 政党数", group_digits(metrics.parties)),
    ];

    html.push_str("<section class=\"metrics\">");
    for (label, value) in tiles {
        html.push_str(&format!(
            "<div class=\"metric-container\"><div>{label}</div>\
             <div class=\"metric-value\">{value}</div></div>"
        ));
    }
    html.push_str("</section><hr>");
}

fn render_keywords(html: &mut String, scripts: &mut String, view: &DashboardView) {
    html.push_str("<h2>🔤 議論されているキーワード</h2>");
    let Some(keyword_chart) = &view.charts.keywords else {
        html.push_str(
            "<p class=\"info\">ℹ️ キーワードが抽出できませんでした。\
             データの内容やフィルタ条件を確認してください。</p><hr>",
        );
        return;
    };

    html.push_str("<div class=\"columns\"><div><h3>📈 頻出キーワード Top30</h3>");
    embed_chart(html, scripts, "chart-keywords", keyword_chart);
    html.push_str("</div><div><h3>🎯 キーワード詳細</h3>");
    if let Some(detail) = &view.report.keyword_detail {
        render_keyword_detail(html, detail);
    }
    html.push_str("</div></div>");

    html.push_str("<h3>🔥 政党×主要キーワード ヒートマップ</h3>");
    match &view.charts.heatmap {
        Some(chart) => embed_chart(html, scripts, "chart-heatmap", chart),
        None => html.push_str("<p class=\"info\">ℹ️ ヒートマップ用のデータが不足しています。</p>"),
    }
    html.push_str("<hr>");
}

fn render_keyword_detail(html: &mut String, detail: &KeywordDetail) {
    html.push_str(
        "<label for=\"term\">詳細を見るキーワードを選択</label>\
         <select id=\"term\" name=\"term\" form=\"filters\" onchange=\"this.form.submit()\">",
    );
    for candidate in &detail.candidates {
        let mark = if *candidate == detail.term {
            " selected"
        } else {
            ""
        };
        let value = escape(candidate);
        html.push_str(&format!("<option value=\"{value}\"{mark}>{value}</option>"));
    }
    html.push_str("</select>");

    html.push_str(&format!(
        "<p><strong>キーワード「{}」の使用例:</strong></p>",
        escape(&detail.term)
    ));
    for example in &detail.examples {
        let date = example
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        html.push_str(&format!(
            "<blockquote><strong>{}</strong> ({}) - {}<br>\"{}\"</blockquote>",
            escape(&example.speaker),
            escape(&example.party),
            date,
            escape(&example.excerpt)
        ));
    }
}

fn render_volume(html: &mut String, scripts: &mut String, view: &DashboardView) {
    let max_items = view.query.display.max_items;
    html.push_str("<h2>📊 発言量分析</h2><div class=\"columns\">");

    html.push_str(&format!("<div><h3>👤 議員別発言量 Top{max_items}</h3>"));
    if let Some(chart) = &view.charts.speakers {
        embed_chart(html, scripts, "chart-speakers", chart);
    }
    html.push_str("</div><div><h3>🏢 政党別発言数</h3>");
    if let Some(chart) = &view.charts.parties {
        embed_chart(html, scripts, "chart-parties", chart);
    }
    if view.report.party_layout == BarLayout::Horizontal {
        html.push_str("<p><small>政党名が長いため横棒グラフで表示しています</small></p>");
    }
    html.push_str("</div></div><h3>📈 発言数の推移（日別）</h3>");

    match &view.charts.timeline {
        Some(chart) => embed_chart(html, scripts, "chart-timeline", chart),
        None => html.push_str(
            "<p class=\"info\">ℹ️ 日付データが不足しているため時系列分析をスキップします</p>",
        ),
    }
    html.push_str("<hr>");
}

fn render_latest(html: &mut String, view: &DashboardView) {
    html.push_str(
        "<h2>📰 最新の発言</h2><table><thead><tr><th>日付</th><th>院</th><th>委員会</th>\
         <th>発言者</th><th>政党</th><th>発言内容</th></tr></thead><tbody>",
    );
    for speech in &view.report.latest {
        let date = speech
            .date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        html.push_str(&format!(
            "<tr><td>{date}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&speech.house),
            escape(&speech.committee),
            escape(&speech.speaker),
            escape(&speech.party),
            escape(&speech.speech)
        ));
    }
    html.push_str("</tbody></table>");
}

fn render_debug(html: &mut String, view: &DashboardView) {
    let heatmap = &view.report.heatmap;
    html.push_str(&format!(
        "<details open><summary>🐛 ヒートマップ デバッグ情報</summary>\
         <p>ヒートマップデータ行数: {}</p><p>キーワード数: {}</p><p>政党数: {}</p><ul>",
        heatmap.cells.len(),
        heatmap.terms.len(),
        heatmap.parties.len()
    ));
    for cell in heatmap.cells.iter().take(10) {
        html.push_str(&format!(
            "<li>{} × {}: {}</li>",
            escape(&cell.party),
            escape(&cell.term),
            cell.count
        ));
    }
    html.push_str("</ul></details>");
}

fn embed_chart(html: &mut String, scripts: &mut String, id: &str, spec: &Value) {
    html.push_str(&format!("<div id=\"{id}\" class=\"chart\"></div>"));
    scripts.push_str(&format!(
        "vegaEmbed('#{id}', {}, {{\"actions\": false}});",
        script_safe_json(spec)
    ));
}

/// JSON that cannot terminate the surrounding `<script>` element.
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

pub(crate) fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn group_digits(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
