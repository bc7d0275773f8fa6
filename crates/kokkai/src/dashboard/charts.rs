//! Vega-Lite specifications for the dashboard charts. The page hands them to
//! vega-embed; the JSON API exposes them unchanged.

use super::keywords::TermCount;
use super::report::views::{BarLayout, DailyVolume, Heatmap, PartyVolume, SpeakerVolume};
use serde::Serialize;
use serde_json::{json, Value};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const KEYWORD_CHART_TERMS: usize = 20;

/// Horizontal axis labels, no label truncation, no view border.
fn theme() -> Value {
    json!({
        "axis": {
            "labelAngle": 0,
            "labelLimit": 0,
            "labelFontSize": 10,
            "titleFontSize": 12,
            "grid": true,
            "tickSize": 5
        },
        "header": { "labelAngle": 0 },
        "view": { "strokeWidth": 0 },
        "legend": { "labelFontSize": 10, "titleFontSize": 12 },
        "title": { "fontSize": 14, "fontWeight": "bold" }
    })
}

fn spec<T: Serialize>(values: &[T], height: u32, mark: Value, encoding: Value) -> Value {
    json!({
        "$schema": SCHEMA,
        "config": theme(),
        "data": { "values": values },
        "mark": mark,
        "encoding": encoding,
        "width": "container",
        "height": height
    })
}

pub fn keyword_bar(top: &[TermCount], height: u32) -> Value {
    let shown = &top[..top.len().min(KEYWORD_CHART_TERMS)];
    spec(
        shown,
        height,
        json!("bar"),
        json!({
            "x": { "field": "count", "type": "quantitative", "title": "出現回数" },
            "y": { "field": "term", "type": "nominal", "sort": "-x", "title": "キーワード" },
            "color": {
                "field": "count",
                "type": "quantitative",
                "scale": { "scheme": "blues" },
                "legend": null
            },
            "tooltip": [
                { "field": "term", "type": "nominal" },
                { "field": "count", "type": "quantitative" }
            ]
        }),
    )
}

pub fn heatmap(heatmap: &Heatmap) -> Value {
    let longest_term = heatmap
        .terms
        .iter()
        .map(|term| term.chars().count())
        .max()
        .unwrap_or(0);
    let label_angle = if longest_term > 3 { -45 } else { 0 };
    let width = (heatmap.terms.len() as u32 * 40).max(600);
    let height = (heatmap.parties.len() as u32 * 35).max(300);

    let mut value = spec(
        &heatmap.cells,
        height,
        json!({ "type": "rect", "stroke": "white", "strokeWidth": 1 }),
        json!({
            "x": {
                "field": "term",
                "type": "ordinal",
                "title": "キーワード",
                "sort": heatmap.terms,
                "axis": { "labelAngle": label_angle, "labelLimit": 0, "labelFontSize": 9 }
            },
            "y": {
                "field": "party",
                "type": "ordinal",
                "title": "政党",
                "sort": heatmap.parties,
                "axis": { "labelLimit": 0, "labelFontSize": 9 }
            },
            "color": {
                "field": "count",
                "type": "quantitative",
                "title": "発言頻度",
                "scale": { "type": "sqrt", "range": ["#f7f7f7", "#2166ac"] }
            },
            "tooltip": [
                { "field": "party", "type": "nominal", "title": "政党" },
                { "field": "term", "type": "nominal", "title": "キーワード" },
                { "field": "count", "type": "quantitative", "title": "頻度" }
            ]
        }),
    );
    value["width"] = json!(width);
    value
}

pub fn speaker_bar(ranking: &[SpeakerVolume], height: u32) -> Value {
    spec(
        ranking,
        height,
        json!("bar"),
        json!({
            "x": { "field": "char_count", "type": "quantitative", "title": "発言文字数" },
            "y": { "field": "speaker", "type": "nominal", "sort": "-x", "title": "議員名" },
            "color": {
                "field": "party",
                "type": "nominal",
                "title": "政党",
                "scale": { "scheme": "category20" }
            },
            "tooltip": [
                { "field": "speaker", "type": "nominal" },
                { "field": "party", "type": "nominal" },
                { "field": "char_count", "type": "quantitative" }
            ]
        }),
    )
}

pub fn party_bar(stats: &[PartyVolume], layout: BarLayout, height: u32) -> Value {
    let color = json!({
        "field": "speech_count",
        "type": "quantitative",
        "scale": { "scheme": "viridis" },
        "legend": null
    });
    let tooltip = json!([
        { "field": "party", "type": "nominal" },
        { "field": "speech_count", "type": "quantitative" },
        { "field": "char_count", "type": "quantitative" }
    ]);

    match layout {
        BarLayout::Horizontal => spec(
            stats,
            height.max(stats.len() as u32 * 30),
            json!("bar"),
            json!({
                "x": { "field": "speech_count", "type": "quantitative", "title": "発言数" },
                "y": {
                    "field": "party",
                    "type": "ordinal",
                    "title": "政党",
                    "sort": "-x",
                    "axis": { "labelLimit": 200, "labelFontSize": 10 }
                },
                "color": color,
                "tooltip": tooltip
            }),
        ),
        BarLayout::Vertical => spec(
            stats,
            height,
            json!("bar"),
            json!({
                "x": {
                    "field": "party",
                    "type": "nominal",
                    "title": "政党",
                    "sort": "-y",
                    "axis": { "labelAngle": -45, "labelLimit": 0, "labelFontSize": 10 }
                },
                "y": { "field": "speech_count", "type": "quantitative", "title": "発言数" },
                "color": color,
                "tooltip": tooltip
            }),
        ),
    }
}

pub fn timeline(days: &[DailyVolume], height: u32) -> Value {
    spec(
        days,
        height,
        json!({ "type": "line", "point": true }),
        json!({
            "x": { "field": "date", "type": "temporal", "title": "日付" },
            "y": { "field": "speech_count", "type": "quantitative", "title": "発言数" },
            "tooltip": [
                { "field": "date", "type": "temporal" },
                { "field": "speech_count", "type": "quantitative" },
                { "field": "char_count", "type": "quantitative" }
            ]
        }),
    )
}
