//! Plotly-compatible chart documents.

use serde_json::{json, Value};

use crate::plot::{Annotation, FilledPolygon, PlotDescription};

fn line_trace(start: (f64, f64), end: (f64, f64), color: &str) -> Value {
    json!({
        "type": "scatter",
        "mode": "lines",
        "x": [start.0, end.0],
        "y": [start.1, end.1],
        "line": { "color": color, "width": 2 },
        "showlegend": false,
    })
}

fn fill_trace(polygon: &FilledPolygon) -> Value {
    let mut x: Vec<f64> = polygon.vertices.iter().map(|p| p.x).collect();
    let mut y: Vec<f64> = polygon.vertices.iter().map(|p| p.y).collect();
    if let (Some(&x0), Some(&y0)) = (x.first(), y.first()) {
        x.push(x0);
        y.push(y0);
    }
    let line = match &polygon.line_color {
        Some(color) => json!({ "color": color, "width": 1 }),
        None => json!({ "width": 0 }),
    };
    json!({
        "type": "scatter",
        "mode": "lines",
        "x": x,
        "y": y,
        "fill": "toself",
        "fillcolor": polygon.fill_color,
        "line": line,
        "hoverinfo": "skip",
        "showlegend": false,
    })
}

fn annotation(a: &Annotation) -> Value {
    let text = if a.style.bold {
        format!("<b>{}</b>", a.text)
    } else {
        a.text.clone()
    };
    json!({
        "x": a.x,
        "y": a.y,
        "text": text,
        "showarrow": false,
        "textangle": a.style.angle,
        "xanchor": a.style.x_anchor,
        "yanchor": a.style.y_anchor,
        "font": { "size": a.style.size, "color": a.style.color },
    })
}

/// Render a plot as a Plotly figure: `{ "data": [...], "layout": {...} }`.
///
/// Fills come first so lines draw on top of them. The y axis is locked to
/// the x axis scale.
pub fn to_chart_spec(plot: &PlotDescription) -> Value {
    let data: Vec<Value> = plot
        .fills
        .iter()
        .map(fill_trace)
        .chain(
            plot.line_segments
                .iter()
                .map(|(a, b)| line_trace((a.x, a.y), (b.x, b.y), &plot.line_color)),
        )
        .collect();

    json!({
        "data": data,
        "layout": {
            "title": { "text": plot.title },
            "xaxis": { "title": { "text": plot.x_title }, "range": plot.axis_ranges.x },
            "yaxis": {
                "title": { "text": plot.y_title },
                "range": plot.axis_ranges.y,
                "scaleanchor": "x",
                "scaleratio": 1,
            },
            "annotations": plot.annotations.iter().map(annotation).collect::<Vec<_>>(),
            "showlegend": false,
        },
    })
}
