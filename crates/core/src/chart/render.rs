//! HTML rendering sink for chart descriptions (ECharts in the browser).

use crate::chart::description::{ChartDescription, ChartKind, Page, Series, SeriesData};
use anyhow::Context;
use askama::Template;
use serde_json::{json, Value};

pub const ECHARTS_SRC: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    title: &'a str,
    echarts_src: &'a str,
    charts: Vec<RenderedChart>,
}

struct RenderedChart {
    id: String,
    option_json: String,
}

/// Writes `page` as a standalone HTML document to `out`.
pub fn render_page<W: std::io::Write>(page: &Page, out: &mut W) -> anyhow::Result<()> {
    let html = render_page_string(page)?;
    out.write_all(html.as_bytes())
        .context("failed to write rendered page")?;
    Ok(())
}

pub fn render_page_string(page: &Page) -> anyhow::Result<String> {
    let charts = page
        .charts
        .iter()
        .map(|chart| {
            let option = echarts_option(chart);
            let option_json =
                serde_json::to_string(&option).context("failed to serialize chart option")?;
            Ok(RenderedChart {
                id: chart.id.clone(),
                option_json: escape_script(&option_json),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    DashboardTemplate {
        title: &page.title,
        echarts_src: ECHARTS_SRC,
        charts,
    }
    .render()
    .context("failed to render dashboard template")
}

/// Maps a chart description onto an ECharts `option` object.
pub fn echarts_option(chart: &ChartDescription) -> Value {
    let opts = chart.options;
    let trigger = if chart.kind == ChartKind::Line { "axis" } else { "item" };
    let series: Vec<Value> = chart.series.iter().map(|s| series_option(chart, s)).collect();
    let mut option = json!({
        "title": {
            "text": chart.title,
            "subtext": chart.subtitle.clone().unwrap_or_default(),
        },
        "tooltip": {
            "trigger": trigger,
        },
        "legend": { "show": opts.show_legend, "top": "bottom" },
        "toolbox": {
            "show": opts.show_toolbox,
            "feature": { "saveAsImage": {}, "dataView": { "readOnly": true }, "restore": {} },
        },
        "series": series,
    });

    if chart.kind != ChartKind::Pie {
        option["xAxis"] = json!({ "type": "category", "data": chart.x_axis });
        option["yAxis"] = json!({ "type": "value" });
    }

    option
}

fn series_option(chart: &ChartDescription, series: &Series) -> Value {
    let opts = chart.options;
    let data = match &series.data {
        SeriesData::Values(values) => json!(values),
        SeriesData::Named(values) => json!(values),
    };

    let mut out = json!({
        "name": series.name,
        "data": data,
        "label": { "show": opts.show_point_labels, "position": "bottom" },
    });

    match chart.kind {
        ChartKind::Line => {
            out["type"] = json!("line");
            out["smooth"] = json!(opts.smooth);
        }
        ChartKind::Scatter => {
            out["type"] = json!("scatter");
            out["symbolSize"] = json!(12);
        }
        ChartKind::Pie => {
            out["type"] = json!("pie");
            let (inner, outer) = series.ring.unwrap_or((0, 70));
            out["radius"] = json!([format!("{inner}%"), format!("{outer}%")]);
            out["label"] = json!({ "show": opts.show_point_labels, "formatter": "{b}: {c}" });
        }
    }

    if opts.mark_average && chart.kind != ChartKind::Pie {
        out["markLine"] = json!({
            "data": [{ "name": "Avg", "type": "average" }],
            "label": { "show": true, "formatter": "{a}: {b}" },
        });
    }

    out
}

// Keeps a JSON literal from closing the surrounding <script> element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\!--")
}
